use lazy_static::lazy_static;
use regex::Regex;
use semver::{Version, VersionReq};
use serde::Deserialize;
use tracing::debug;

use super::error::ToolResult;
use super::{Tool, ToolState};
use crate::executor::CommandExecutor;

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"(\d+\.\d+\.\d+)").unwrap();
}

/// kubectl emits its client version as JSON; the other tools print free
/// text we scrape with the regex above.
#[derive(Debug, Deserialize)]
struct KubectlVersionJson {
    #[serde(rename = "clientVersion")]
    client_version: KubectlClientVersion,
}

#[derive(Debug, Deserialize)]
struct KubectlClientVersion {
    #[serde(rename = "gitVersion")]
    git_version: String,
}

pub struct ToolProbe<'a> {
    executor: &'a mut (dyn CommandExecutor + Send),
}

impl<'a> ToolProbe<'a> {
    pub fn new(executor: &'a mut (dyn CommandExecutor + Send)) -> Self {
        Self { executor }
    }

    /// The command whose success means "installed".
    pub fn probe_command(tool: Tool) -> &'static str {
        match tool {
            Tool::Kubectl => "kubectl version --client --output=json",
            Tool::Krew => "kubectl krew version",
            Tool::Helm => "helm version --short",
            Tool::Kustomize => "kustomize version",
            Tool::Tfenv => "tfenv --version",
            Tool::Packer => "packer --version",
            Tool::Fzf => "fzf --version",
        }
    }

    /// Probe one tool: a failed probe means missing, a succeeding one is
    /// checked against the tool's minimum version when it has one. A
    /// version we cannot parse still counts as installed.
    pub async fn state(&mut self, tool: Tool) -> ToolResult<ToolState> {
        let result = self
            .executor
            .execute_command(Self::probe_command(tool))
            .await?;
        if !result.is_success() {
            return Ok(ToolState::Missing);
        }

        let stdout = result.output.to_stdout_string()?;
        let version = extract_version(tool, &stdout);
        debug!("{} probe found version {:?}", tool.name(), version);

        if let (Some(found), Some(minimum)) = (version.as_ref(), tool.minimum_version()) {
            let req = VersionReq::parse(minimum).unwrap(); // static requirement
            if !req.matches(found) {
                return Ok(ToolState::Outdated {
                    version: found.clone(),
                    minimum,
                });
            }
        }
        Ok(ToolState::Installed { version })
    }
}

fn extract_version(tool: Tool, stdout: &str) -> Option<Version> {
    match tool {
        Tool::Kubectl => serde_json::from_str::<KubectlVersionJson>(stdout)
            .ok()
            .and_then(|v| first_semver(&v.client_version.git_version)),
        _ => first_semver(stdout),
    }
}

fn first_semver(text: &str) -> Option<Version> {
    VERSION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Version::parse(m.as_str()).ok())
}
