use tracing::debug;

use super::error::CliError;
use super::ui;
use crate::command::catalog::{self, CommandSpec, OutputMode, Relay};
use crate::command::dispatch::{
    decide_mode, dispatch, DispatchError, DispatchOutcome, Mode, TerminalPrompt,
};
use crate::command::options::parse_options;
use crate::config::AppConfig;
use crate::executor::{CommandResult, LocalCommandExecutor};

/// Glue for one catalog operation: look it up, parse the raw arguments
/// against its flag set, dispatch, and relay whatever comes back.
/// Validation failures print the usage line to stderr before surfacing.
pub async fn run_operation(
    service: &'static str,
    verb: &str,
    tokens: &[String],
    config: &AppConfig,
) -> Result<(), CliError> {
    let spec = catalog::find(service, verb)?;
    let opts = match parse_options(tokens, &spec.flag_set(), config) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", ui::format_warning(&format!("Usage: {}", spec.usage())));
            return Err(e.into());
        }
    };

    let mut executor = LocalCommandExecutor::new();
    let mut prompt = TerminalPrompt;

    // A spinner only makes sense for quiet captured runs; confirmation
    // prompts and streamed sessions own the terminal.
    let spinner = if decide_mode(&opts) == Mode::Execute
        && spec.relay == Relay::Capture
        && !spec.destructive
    {
        Some(ui::create_spinner(&format!(
            "Running aws {} {}...",
            spec.aws_service, spec.aws_operation
        )))
    } else {
        None
    };

    let outcome = dispatch(spec, &opts, config, &mut executor, &mut prompt).await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    match outcome {
        Ok(outcome) => {
            report(spec, outcome);
            Ok(())
        }
        Err(DispatchError::MissingRequiredParameter(name)) => {
            eprintln!("{}", ui::format_warning(&format!("Usage: {}", spec.usage())));
            Err(DispatchError::MissingRequiredParameter(name).into())
        }
        Err(DispatchError::ExternalCommandFailed {
            command,
            exit_code,
            stderr,
        }) => {
            if !stderr.trim().is_empty() {
                eprintln!("{}", stderr.trim_end());
            }
            Err(DispatchError::ExternalCommandFailed {
                command,
                exit_code,
                stderr,
            }
            .into())
        }
        Err(e) => Err(e.into()),
    }
}

fn report(spec: &CommandSpec, outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Help { text } => println!("{text}"),
        DispatchOutcome::Preview { command } => println!("{command}"),
        DispatchOutcome::Executed { command, result } => {
            debug!("Finished: {} ({:?})", command, result.duration());
            relay_output(spec, &result);
        }
        DispatchOutcome::Streamed { command } => {
            debug!("Stream closed: {}", command);
        }
        DispatchOutcome::Cancelled { .. } => {
            println!("{}", ui::format_warning("Cancelled - nothing was run"));
        }
    }
}

/// Print the child's stdout. JSON bodies get pretty-printed, falling back
/// to the raw text when they do not parse; a formatting problem never fails
/// a call that succeeded. Stderr from successful runs is relayed as-is.
fn relay_output(spec: &CommandSpec, result: &CommandResult) {
    match result.output.to_stdout_string() {
        Ok(stdout) => {
            let trimmed = stdout.trim_end();
            if !trimmed.is_empty() {
                match spec.output {
                    OutputMode::Json => match result.parse_json::<serde_json::Value>() {
                        Ok(value) => println!(
                            "{}",
                            serde_json::to_string_pretty(&value)
                                .unwrap_or_else(|_| trimmed.to_string())
                        ),
                        Err(_) => println!("{trimmed}"),
                    },
                    OutputMode::Text => println!("{trimmed}"),
                }
            }
        }
        Err(e) => {
            tracing::warn!("Could not decode command output: {}", e);
        }
    }
    if let Ok(stderr) = result.output.to_stderr_string() {
        let trimmed = stderr.trim_end();
        if !trimmed.is_empty() {
            eprintln!("{trimmed}");
        }
    }
}
