mod error;
mod install;
mod platform;
mod probe;

pub use error::{ToolError, ToolResult};
pub use install::{extra_path_dir, install_dir, path_hint};
pub use platform::{HostArch, HostOs, HostPlatform};

use semver::Version;
use tracing::{debug, warn};

use crate::config::AutoInstall;
use crate::executor::CommandExecutor;
use install::ToolInstaller;
use probe::ToolProbe;

/// The companion tools this binary can check and install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Kubectl,
    Krew,
    Helm,
    Kustomize,
    Tfenv,
    Packer,
    Fzf,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Kubectl,
        Tool::Krew,
        Tool::Helm,
        Tool::Kustomize,
        Tool::Tfenv,
        Tool::Packer,
        Tool::Fzf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Kubectl => "kubectl",
            Tool::Krew => "krew",
            Tool::Helm => "helm",
            Tool::Kustomize => "kustomize",
            Tool::Tfenv => "tfenv",
            Tool::Packer => "packer",
            Tool::Fzf => "fzf",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        let name = name.to_ascii_lowercase();
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Versions we warn below. Older installs keep working; the manager
    /// never reinstalls over an existing binary.
    pub fn minimum_version(self) -> Option<&'static str> {
        match self {
            Tool::Kubectl => Some(">=1.27.0"),
            Tool::Helm => Some(">=3.12.0"),
            Tool::Packer => Some(">=1.9.0"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolState {
    /// Probe succeeded. Version is None when the output defied parsing.
    Installed { version: Option<Version> },
    /// Installed but below the expected minimum.
    Outdated {
        version: Version,
        minimum: &'static str,
    },
    Missing,
}

#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: Tool,
    pub state: ToolState,
    pub auto_install: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyInstalled { version: Option<Version> },
    Installed { version: Option<Version> },
    Outdated {
        version: Version,
        minimum: &'static str,
    },
    SkippedDisabled,
}

/// Probes and installs companion tools through the shared executor.
pub struct ToolManager<'a> {
    executor: &'a mut (dyn CommandExecutor + Send),
    platform: HostPlatform,
    auto_install: &'a AutoInstall,
}

impl<'a> ToolManager<'a> {
    pub fn new(
        executor: &'a mut (dyn CommandExecutor + Send),
        platform: HostPlatform,
        auto_install: &'a AutoInstall,
    ) -> Self {
        Self {
            executor,
            platform,
            auto_install,
        }
    }

    pub async fn status(&mut self, tool: Tool) -> ToolResult<ToolStatus> {
        let state = ToolProbe::new(self.executor).state(tool).await?;
        Ok(ToolStatus {
            tool,
            state,
            auto_install: self.auto_install.enabled(tool.name()),
        })
    }

    /// Make one tool usable: present tools are left alone, outdated ones
    /// reported, missing ones installed unless their toggle says not to.
    pub async fn ensure(&mut self, tool: Tool) -> ToolResult<EnsureOutcome> {
        match ToolProbe::new(self.executor).state(tool).await? {
            ToolState::Installed { version } => {
                debug!("{} is already installed", tool.name());
                Ok(EnsureOutcome::AlreadyInstalled { version })
            }
            ToolState::Outdated { version, minimum } => {
                warn!(
                    "{} {} is older than the expected {}",
                    tool.name(),
                    version,
                    minimum
                );
                Ok(EnsureOutcome::Outdated { version, minimum })
            }
            ToolState::Missing => {
                if !self.auto_install.enabled(tool.name()) {
                    debug!("{} is missing and auto-install is off", tool.name());
                    return Ok(EnsureOutcome::SkippedDisabled);
                }
                ToolInstaller::new(self.executor, self.platform)
                    .install(tool)
                    .await?;
                match ToolProbe::new(self.executor).state(tool).await? {
                    ToolState::Installed { version } => Ok(EnsureOutcome::Installed { version }),
                    ToolState::Outdated { version, .. } => Ok(EnsureOutcome::Installed {
                        version: Some(version),
                    }),
                    // Tools probed through kubectl's plugin lookup stay
                    // invisible until PATH carries their directory, and
                    // PATH is never edited here. Count the install as done
                    // and let the printed hint close the gap.
                    ToolState::Missing if extra_path_dir(tool).is_some() => {
                        Ok(EnsureOutcome::Installed { version: None })
                    }
                    ToolState::Missing => Err(ToolError::InstallationError(format!(
                        "{} is still not runnable after install; is {} on your PATH?",
                        tool.name(),
                        install_dir()?,
                    ))),
                }
            }
        }
    }
}
