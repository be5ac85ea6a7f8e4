use clap::{Args, Subcommand};
use colored::Colorize;
use semver::Version;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};

use super::error::CliError;
use super::ui;
use crate::config::{AppConfig, AutoInstall};
use crate::executor::LocalCommandExecutor;
use crate::toolkit::{
    extra_path_dir, install_dir, path_hint, EnsureOutcome, HostPlatform, Tool, ToolError,
    ToolManager, ToolState,
};

#[derive(Debug, Args)]
pub struct Tools {
    #[command(subcommand)]
    command: ToolsCommand,
}

#[derive(Debug, Subcommand)]
enum ToolsCommand {
    /// Show each tool's install state, version and auto-install toggle
    Status,

    /// Install missing tools; with no names, every tool is ensured
    Ensure {
        /// Tool names (kubectl, krew, helm, kustomize, tfenv, packer, fzf)
        tools: Vec<String>,
    },
}

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Tool")]
    tool: &'static str,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Auto-install")]
    auto: &'static str,
}

impl Tools {
    pub async fn run(&self, config: &AppConfig) -> Result<(), CliError> {
        // Detect cannot fail here: run() already refused unknown hosts.
        let platform = HostPlatform::detect()?;
        let mut executor = LocalCommandExecutor::new();
        let mut manager = ToolManager::new(&mut executor, platform, &config.auto_install);

        match &self.command {
            ToolsCommand::Status => status(&mut manager).await,
            ToolsCommand::Ensure { tools } => ensure(&mut manager, tools).await,
        }
    }
}

async fn status(manager: &mut ToolManager<'_>) -> Result<(), CliError> {
    let mut rows = Vec::new();
    for tool in Tool::ALL {
        let status = manager.status(tool).await?;
        let (state, version) = match status.state {
            ToolState::Installed { version } => (
                ui::format_success("installed"),
                version
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ToolState::Outdated { version, minimum } => (
                ui::format_warning("outdated"),
                format!("{version} (want {minimum})"),
            ),
            ToolState::Missing => (format!("{}", "missing".red()), String::new()),
        };
        rows.push(ToolRow {
            tool: tool.name(),
            state,
            version,
            auto: if status.auto_install { "on" } else { "off" },
        });
    }

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_GREEN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    println!("{}", table);
    Ok(())
}

async fn ensure(manager: &mut ToolManager<'_>, names: &[String]) -> Result<(), CliError> {
    let targets: Vec<Tool> = if names.is_empty() {
        Tool::ALL.to_vec()
    } else {
        names
            .iter()
            .map(|name| Tool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.clone())))
            .collect::<Result<_, ToolError>>()?
    };

    let mut installed_any = false;
    let mut installed_krew = false;
    for tool in targets {
        let pb = ui::create_spinner(&format!("Checking {}...", tool.name()));
        let outcome = manager.ensure(tool).await;
        pb.finish_and_clear();

        match outcome? {
            EnsureOutcome::AlreadyInstalled { version } => {
                println!("{} {}", ui::format_success("ok"), describe(tool, version));
            }
            EnsureOutcome::Installed { version } => {
                installed_any = true;
                installed_krew |= tool == Tool::Krew;
                println!(
                    "{} {}",
                    ui::format_success("installed"),
                    describe(tool, version)
                );
            }
            EnsureOutcome::Outdated { version, minimum } => {
                println!(
                    "{} {} {} (want {})",
                    ui::format_warning("outdated"),
                    tool.name(),
                    version,
                    minimum
                );
            }
            EnsureOutcome::SkippedDisabled => {
                println!(
                    "{} {} is missing and {} disables its install",
                    ui::format_warning("skipped"),
                    tool.name(),
                    AutoInstall::toggle_var(tool.name()),
                );
            }
        }
    }

    if installed_any {
        let path_var = std::env::var("PATH").unwrap_or_default();
        if let Some(hint) = path_hint(&path_var, &install_dir()?) {
            println!("{}", ui::format_warning(&hint));
        }
        if installed_krew {
            if let Some(krew_dir) = extra_path_dir(Tool::Krew) {
                if let Some(hint) = path_hint(&path_var, &krew_dir) {
                    println!("{}", ui::format_warning(&hint));
                }
            }
        }
    }
    Ok(())
}

fn describe(tool: Tool, version: Option<Version>) -> String {
    match version {
        Some(v) => format!("{} {}", tool.name(), v),
        None => tool.name().to_string(),
    }
}
