use std::collections::HashMap;

use colored::Colorize;
use dialoguer::Input;
use thiserror::Error;
use tracing::debug;

use crate::command::catalog::{CommandSpec, ParamSpec, Relay};
use crate::command::options::{Flag, ParsedOptions};
use crate::command::template::ParamValue;
use crate::config::AppConfig;
use crate::executor::{CommandExecutor, CommandResult, ExecutorError};

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),

    #[error("Command exited with code {exit_code}")]
    ExternalCommandFailed {
        command: String,
        exit_code: u32,
        stderr: String,
    },

    #[error("Confirmation prompt failed: {0}")]
    ConfirmationFailed(String),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
}

/// What one invocation is asked to do, decided once before anything runs.
/// Help wins over show, show wins over execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Help,
    Show,
    Execute,
}

pub fn decide_mode(opts: &ParsedOptions) -> Mode {
    if opts.help {
        Mode::Help
    } else if opts.show {
        Mode::Show
    } else {
        Mode::Execute
    }
}

/// The terminal states of a dispatched operation. All of them map to exit
/// code zero; failures travel as `DispatchError` instead.
#[derive(Debug)]
pub enum DispatchOutcome {
    Help { text: String },
    Preview { command: String },
    Executed { command: String, result: CommandResult },
    Streamed { command: String },
    Cancelled { command: String },
}

/// Confirmation seam for destructive operations. Production uses the
/// interactive terminal prompt; tests script the answer.
pub trait ConfirmPrompt: Send {
    fn confirm(&mut self, command: &str) -> DispatchResult<bool>;
}

/// Interactive prompt. Only the literal answer `yes` lets a destructive
/// operation proceed; anything else, including an empty line, declines.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&mut self, command: &str) -> DispatchResult<bool> {
        eprintln!("{} {}", "About to run:".yellow().bold(), command);
        let answer: String = Input::<String>::new()
            .with_prompt("Type 'yes' to continue")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DispatchError::ConfirmationFailed(e.to_string()))?;
        Ok(answer.trim() == "yes")
    }
}

/// Run one catalog operation end to end: decide the mode, resolve and
/// validate parameters, render the command line, and either print, confirm
/// or execute it. Validation always happens before the executor is touched.
pub async fn dispatch(
    spec: &CommandSpec,
    opts: &ParsedOptions,
    config: &AppConfig,
    executor: &mut (dyn CommandExecutor + Send),
    prompt: &mut dyn ConfirmPrompt,
) -> DispatchResult<DispatchOutcome> {
    let mode = decide_mode(opts);
    if mode == Mode::Help {
        return Ok(DispatchOutcome::Help {
            text: spec.help_text(config),
        });
    }

    let values = resolve_params(spec, opts, config);
    validate(spec, &values)?;
    let command = spec.render(&values);

    if mode == Mode::Show {
        return Ok(DispatchOutcome::Preview { command });
    }

    if spec.destructive && !prompt.confirm(&command)? {
        return Ok(DispatchOutcome::Cancelled { command });
    }

    debug!("Running: {}", command);
    match spec.relay {
        Relay::Capture => {
            let result = executor.execute_command(&command).await?;
            if !result.is_success() {
                let exit_code = result.output.exit_code;
                let stderr = result.output.to_stderr_string().unwrap_or_default();
                return Err(DispatchError::ExternalCommandFailed {
                    command,
                    exit_code,
                    stderr,
                });
            }
            Ok(DispatchOutcome::Executed { command, result })
        }
        Relay::Stream => {
            let exit_code = executor.stream_command(&command).await?;
            if exit_code != 0 {
                return Err(DispatchError::ExternalCommandFailed {
                    command,
                    exit_code,
                    stderr: String::new(),
                });
            }
            Ok(DispatchOutcome::Streamed { command })
        }
    }
}

/// Resolve each declared parameter from, in order, its explicit flag, its
/// positional slot, then its configured default.
fn resolve_params(
    spec: &CommandSpec,
    opts: &ParsedOptions,
    config: &AppConfig,
) -> HashMap<&'static str, ParamValue> {
    let mut values = HashMap::new();
    for param in spec.params {
        if let Some(value) = resolve_param(param, opts, config) {
            values.insert(param.name, value);
        }
    }
    values
}

fn resolve_param(
    param: &ParamSpec,
    opts: &ParsedOptions,
    config: &AppConfig,
) -> Option<ParamValue> {
    match param.flag {
        Some(Flag::Follow) => return Some(ParamValue::Toggle(opts.follow)),
        Some(Flag::Filters) => {
            return if opts.filters.is_empty() {
                None
            } else {
                Some(ParamValue::List(opts.filters.clone()))
            };
        }
        _ => {}
    }

    let flagged = match param.flag {
        // The parser already substituted the configured region.
        Some(Flag::Region) => Some(opts.region.clone()),
        Some(Flag::Cluster) => opts.cluster.clone(),
        Some(Flag::InstanceId) => opts.instance_id.clone(),
        Some(Flag::LogGroup) => opts.log_group.clone(),
        _ => None,
    };

    flagged
        .or_else(|| param.positional.and_then(|idx| opts.positionals.get(idx).cloned()))
        .or_else(|| param.default.resolve(config))
        .map(ParamValue::Text)
}

fn validate(
    spec: &CommandSpec,
    values: &HashMap<&'static str, ParamValue>,
) -> DispatchResult<()> {
    for param in spec.params.iter().filter(|p| p.required) {
        match values.get(param.name) {
            Some(value) if !value.is_empty() => {}
            _ => return Err(DispatchError::MissingRequiredParameter(param.name)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::catalog::find;
    use crate::command::options::parse_options;
    use crate::executor::mock::MockExecutor;

    fn config() -> AppConfig {
        AppConfig::from_vars(Vec::new())
    }

    fn parse(spec: &CommandSpec, tokens: &[&str]) -> ParsedOptions {
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        parse_options(&tokens, &spec.flag_set(), &config()).unwrap()
    }

    /// Scripted confirmation. `answer: None` panics when consulted, which
    /// is exactly what non-destructive paths should guarantee.
    struct ScriptedPrompt {
        answer: Option<bool>,
        asked: Vec<String>,
    }

    impl ScriptedPrompt {
        fn silent() -> Self {
            Self {
                answer: None,
                asked: Vec::new(),
            }
        }

        fn answering(answer: bool) -> Self {
            Self {
                answer: Some(answer),
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&mut self, command: &str) -> DispatchResult<bool> {
            self.asked.push(command.to_string());
            match self.answer {
                Some(answer) => Ok(answer),
                None => panic!("unexpected confirmation prompt for: {command}"),
            }
        }
    }

    #[test]
    fn test_help_beats_show_beats_execute() {
        let spec = find("eks", "ls").unwrap();
        let both = parse(spec, &["-h", "--show"]);
        assert_eq!(decide_mode(&both), Mode::Help);
        let show = parse(spec, &["--show"]);
        assert_eq!(decide_mode(&show), Mode::Show);
        let plain = parse(spec, &[]);
        assert_eq!(decide_mode(&plain), Mode::Execute);
    }

    #[tokio::test]
    async fn test_help_never_touches_the_executor_or_validation() {
        // ec2 stop requires an instance id; help must not care.
        let spec = find("ec2", "stop").unwrap();
        let opts = parse(spec, &["-h"]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Help { text } => assert!(text.contains("awskit ec2 stop")),
            other => panic!("expected help, got {other:?}"),
        }
        assert_eq!(executor.call_count(), 0);
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    async fn test_show_previews_without_executing_or_confirming() {
        let spec = find("ec2", "stop").unwrap();
        let opts = parse(spec, &["--show", "-i", "i-0abc"]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Preview { command } => assert_eq!(
                command,
                "aws ec2 stop-instances --instance-ids i-0abc --region us-east-1 --output json"
            ),
            other => panic!("expected preview, got {other:?}"),
        }
        assert_eq!(executor.call_count(), 0);
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    async fn test_preview_and_execution_render_the_same_command() {
        let spec = find("eks", "describe").unwrap();
        let preview_opts = parse(spec, &["--show", "staging"]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let previewed = match dispatch(spec, &preview_opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => command,
            other => panic!("expected preview, got {other:?}"),
        };

        executor.respond_success(&previewed, "{}");
        let exec_opts = parse(spec, &["staging"]);
        let executed = match dispatch(spec, &exec_opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Executed { command, .. } => command,
            other => panic!("expected execution, got {other:?}"),
        };

        assert_eq!(previewed, executed);
        assert_eq!(executor.commands, vec![previewed]);
    }

    #[tokio::test]
    async fn test_missing_required_parameter_fails_before_any_call() {
        let spec = find("ec2", "stop").unwrap();
        let opts = parse(spec, &[]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let err = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::MissingRequiredParameter("instance-id")
        ));
        assert_eq!(executor.call_count(), 0);
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    async fn test_defaults_fill_region_and_cluster_when_nothing_is_given() {
        let spec = find("eks", "update-kubeconfig").unwrap();
        let opts = parse(spec, &[]);
        let expected = "aws eks update-kubeconfig --name main --region us-east-1";
        let mut executor = MockExecutor::new();
        executor.respond_success(expected, "Updated context");
        let mut prompt = ScriptedPrompt::silent();

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Executed { command, .. } => assert_eq!(command, expected),
            other => panic!("expected execution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_positional_beats_default_and_flag_beats_positional() {
        let spec = find("eks", "describe").unwrap();
        let mut prompt = ScriptedPrompt::silent();

        let positional = parse(spec, &["--show", "staging"]);
        let mut executor = MockExecutor::new();
        match dispatch(spec, &positional, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => {
                assert!(command.contains("--name staging"), "{command}")
            }
            other => panic!("expected preview, got {other:?}"),
        }

        let flagged = parse(spec, &["--show", "-c", "prod", "staging"]);
        match dispatch(spec, &flagged, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => {
                assert!(command.contains("--name prod"), "{command}");
                assert!(!command.contains("staging"), "{command}");
            }
            other => panic!("expected preview, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_explicit_region_and_cluster_render_exactly_once() {
        let spec = find("eks", "update-kubeconfig").unwrap();
        let opts = parse(spec, &["--show", "--region", "us-east-1", "--cluster", "demo"]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let command = match dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => command,
            other => panic!("expected preview, got {other:?}"),
        };

        assert_eq!(command.matches("--region us-east-1").count(), 1);
        assert_eq!(command.matches("--name demo").count(), 1);
        assert_eq!(command.matches("--region").count(), 1);
        assert!(!command.contains("main"), "{command}");
    }

    #[tokio::test]
    async fn test_declined_confirmation_cancels_without_calling() {
        let spec = find("ec2", "stop").unwrap();
        let opts = parse(spec, &["-i", "i-0abc"]);
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::answering(false);

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Cancelled { .. }));
        assert_eq!(executor.call_count(), 0);
        assert_eq!(prompt.asked.len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_destructive_operation_executes() {
        let spec = find("rds", "stop").unwrap();
        let opts = parse(spec, &["-i", "mydb"]);
        let expected =
            "aws rds stop-db-instance --db-instance-identifier mydb --region us-east-1 --output json";
        let mut executor = MockExecutor::new();
        executor.respond_success(expected, "{}");
        let mut prompt = ScriptedPrompt::answering(true);

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Executed { .. }));
        assert_eq!(executor.commands, vec![expected.to_string()]);
        assert_eq!(prompt.asked, vec![expected.to_string()]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_becomes_external_command_failed() {
        let spec = find("eks", "ls").unwrap();
        let opts = parse(spec, &[]);
        let expected = "aws eks list-clusters --region us-east-1 --output json";
        let mut executor = MockExecutor::new();
        executor.respond(expected, "", "AccessDeniedException", 254);
        let mut prompt = ScriptedPrompt::silent();

        let err = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap_err();

        match err {
            DispatchError::ExternalCommandFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 254);
                assert!(stderr.contains("AccessDenied"));
            }
            other => panic!("expected external failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interactive_operations_take_the_stream_path() {
        let spec = find("ec2", "connect").unwrap();
        let opts = parse(spec, &["-i", "i-0abc"]);
        let expected = "aws ssm start-session --target i-0abc --region us-east-1";
        let mut executor = MockExecutor::new();
        executor.stream_exit(expected, 0);
        let mut prompt = ScriptedPrompt::silent();

        let outcome = dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Streamed { .. }));
        assert!(executor.commands.is_empty());
        assert_eq!(executor.streamed, vec![expected.to_string()]);
    }

    #[tokio::test]
    async fn test_log_tail_renders_group_default_and_follow_switch() {
        let spec = find("ec2", "logs").unwrap();
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let followed = parse(spec, &["--show", "-f"]);
        match dispatch(spec, &followed, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => assert_eq!(
                command,
                "aws logs tail /aws/ec2/instance --follow --region us-east-1"
            ),
            other => panic!("expected preview, got {other:?}"),
        }

        let plain = parse(spec, &["--show"]);
        match dispatch(spec, &plain, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => {
                assert!(!command.contains("--follow"), "{command}")
            }
            other => panic!("expected preview, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_filters_spread_into_the_rendered_command() {
        let spec = find("ec2", "ls").unwrap();
        let opts = parse(
            spec,
            &[
                "--show",
                "--filters",
                "Name=instance-state-name,Values=running",
                "Name=tag:env,Values=prod",
            ],
        );
        let mut executor = MockExecutor::new();
        let mut prompt = ScriptedPrompt::silent();

        let command = match dispatch(spec, &opts, &config(), &mut executor, &mut prompt)
            .await
            .unwrap()
        {
            DispatchOutcome::Preview { command } => command,
            other => panic!("expected preview, got {other:?}"),
        };

        assert!(
            command.contains(
                "--filters Name=instance-state-name,Values=running Name=tag:env,Values=prod"
            ),
            "{command}"
        );
        assert!(command.ends_with("--output table"), "{command}");
    }
}
