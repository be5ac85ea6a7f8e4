use clap::Args;

use super::common;
use super::error::CliError;
use super::ui;
use crate::command::catalog;
use crate::config::AppConfig;

/// Shared surface of the nine service subcommands. Clap stops at the verb;
/// everything after it goes to the operation's own option parser untouched,
/// hyphens included — clap's own help flag must stay unregistered here or it
/// would intercept `-h` before the operation parser sees it.
#[derive(Debug, Args)]
#[command(disable_help_flag = true)]
pub struct ServiceArgs {
    /// Operation verb, e.g. `ls`; omit to see the service's verbs
    pub verb: Option<String>,

    /// Operation arguments; `awskit <service> <verb> -h` lists them
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl ServiceArgs {
    pub async fn run(&self, service: &'static str, config: &AppConfig) -> Result<(), CliError> {
        match &self.verb {
            Some(verb) => common::run_operation(service, verb, &self.args, config).await,
            None => {
                println!("Usage: awskit {service} <verb> [options]");
                println!(
                    "{} {}",
                    ui::format_header("Verbs:"),
                    ui::format_highlight(&catalog::verbs_for(service).join(", "))
                );
                Ok(())
            }
        }
    }
}
