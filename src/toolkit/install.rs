use tracing::info;

use super::error::{ToolError, ToolResult};
use super::platform::HostPlatform;
use super::Tool;
use crate::executor::CommandExecutor;

const PACKER_VERSION: &str = "1.11.2";

pub struct ToolInstaller<'a> {
    executor: &'a mut (dyn CommandExecutor + Send),
    platform: HostPlatform,
}

impl<'a> ToolInstaller<'a> {
    pub fn new(executor: &'a mut (dyn CommandExecutor + Send), platform: HostPlatform) -> Self {
        Self { executor, platform }
    }

    /// Run the tool's install recipe, stopping at the first failing step.
    pub async fn install(&mut self, tool: Tool) -> ToolResult<()> {
        let dir = install_dir()?;
        info!("Installing {} into {}", tool.name(), dir);
        for command in install_commands(tool, self.platform, &dir) {
            let result = self.executor.execute_command(&command).await?;
            if !result.is_success() {
                return Err(ToolError::InstallationError(format!(
                    "Failed to execute: {command}"
                )));
            }
        }
        Ok(())
    }
}

/// Tools land in `~/.local/bin`. Nothing here ever edits the caller's
/// shell profile; PATH advice is printed, not applied.
pub fn install_dir() -> ToolResult<String> {
    let home = dirs::home_dir().ok_or_else(|| {
        ToolError::InstallationError("cannot determine the home directory".to_string())
    })?;
    Ok(home.join(".local").join("bin").display().to_string())
}

/// The shell steps that install one tool on one platform. Everything runs
/// through `sh -c`, so `$HOME` and `$(mktemp -d)` expand at run time.
pub fn install_commands(tool: Tool, platform: HostPlatform, dir: &str) -> Vec<String> {
    let os = platform.os_token();
    let arch = platform.arch_token();
    let mut commands = vec![format!("mkdir -p {dir}")];
    match tool {
        Tool::Kubectl => {
            commands.push(format!(
                "curl -fsSL -o {dir}/kubectl \"https://dl.k8s.io/release/$(curl -fsSL https://dl.k8s.io/release/stable.txt)/bin/{os}/{arch}/kubectl\""
            ));
            commands.push(format!("chmod +x {dir}/kubectl"));
        }
        Tool::Krew => {
            let asset = format!("krew-{os}_{arch}");
            commands.push(format!(
                "cd \"$(mktemp -d)\" && curl -fsSLO \"https://github.com/kubernetes-sigs/krew/releases/latest/download/{asset}.tar.gz\" && tar zxf \"{asset}.tar.gz\" && ./{asset} install krew"
            ));
            // kubectl discovers plugins through PATH; link the bootstrap
            // result next to the other managed binaries.
            commands.push(format!(
                "ln -sf \"$HOME/.krew/bin/kubectl-krew\" {dir}/kubectl-krew"
            ));
        }
        Tool::Helm => {
            commands.push(format!(
                "curl -fsSL https://raw.githubusercontent.com/helm/helm/main/scripts/get-helm-3 | HELM_INSTALL_DIR={dir} USE_SUDO=false bash"
            ));
        }
        Tool::Kustomize => {
            commands.push(format!(
                "cd {dir} && curl -fsSL \"https://raw.githubusercontent.com/kubernetes-sigs/kustomize/master/hack/install_kustomize.sh\" | bash"
            ));
        }
        Tool::Tfenv => {
            commands.push(
                "test -d \"$HOME/.tfenv\" || git clone --depth=1 https://github.com/tfutils/tfenv.git \"$HOME/.tfenv\""
                    .to_string(),
            );
            commands.push(format!("ln -sf \"$HOME/.tfenv/bin/tfenv\" {dir}/tfenv"));
            commands.push(format!(
                "ln -sf \"$HOME/.tfenv/bin/terraform\" {dir}/terraform"
            ));
        }
        Tool::Packer => {
            commands.push(format!(
                "cd \"$(mktemp -d)\" && curl -fsSL -o packer.zip \"https://releases.hashicorp.com/packer/{PACKER_VERSION}/packer_{PACKER_VERSION}_{os}_{arch}.zip\" && unzip -o packer.zip && install -m 0755 packer {dir}/packer"
            ));
        }
        Tool::Fzf => {
            commands.push(
                "test -d \"$HOME/.fzf\" || git clone --depth 1 https://github.com/junegunn/fzf.git \"$HOME/.fzf\""
                    .to_string(),
            );
            commands.push("\"$HOME/.fzf/install\" --bin".to_string());
            commands.push(format!("ln -sf \"$HOME/.fzf/bin/fzf\" {dir}/fzf"));
        }
    }
    commands
}

/// Hint to print when `dir` is not on the supplied PATH value.
pub fn path_hint(path_var: &str, dir: &str) -> Option<String> {
    if path_var.split(':').any(|entry| entry == dir) {
        None
    } else {
        Some(format!(
            "Add {dir} to your PATH to use the installed tools"
        ))
    }
}

/// Some tools keep their own bin directory next to the symlinked one.
pub fn extra_path_dir(tool: Tool) -> Option<String> {
    match tool {
        Tool::Krew => {
            dirs::home_dir().map(|home| home.join(".krew").join("bin").display().to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::MockExecutor;

    fn linux() -> HostPlatform {
        HostPlatform::from_parts("linux", "x86_64").unwrap()
    }

    fn mac() -> HostPlatform {
        HostPlatform::from_parts("macos", "aarch64").unwrap()
    }

    #[test]
    fn test_every_tool_has_a_recipe_on_every_platform() {
        for platform in [linux(), mac()] {
            for tool in Tool::ALL {
                let commands = install_commands(tool, platform, "/home/u/.local/bin");
                assert!(commands.len() >= 2, "{:?} has no steps", tool);
                assert_eq!(commands[0], "mkdir -p /home/u/.local/bin");
                assert!(
                    commands.iter().any(|c| c.contains(tool.name())),
                    "{:?} recipe never names the tool: {:?}",
                    tool,
                    commands
                );
            }
        }
    }

    #[test]
    fn test_download_urls_track_the_platform() {
        let kubectl = install_commands(Tool::Kubectl, mac(), "/tmp/bin");
        assert!(kubectl[1].contains("/bin/darwin/arm64/kubectl"), "{}", kubectl[1]);

        let krew = install_commands(Tool::Krew, mac(), "/tmp/bin");
        assert!(krew[1].contains("krew-darwin_arm64.tar.gz"), "{}", krew[1]);

        let packer = install_commands(Tool::Packer, linux(), "/tmp/bin");
        assert!(
            packer[1].contains("packer_1.11.2_linux_amd64.zip"),
            "{}",
            packer[1]
        );
    }

    #[test]
    fn test_krew_recipe_links_the_plugin_into_the_install_dir() {
        let commands = install_commands(Tool::Krew, linux(), "/home/u/.local/bin");
        let link = commands.last().unwrap();
        assert!(link.starts_with("ln -sf"), "{link}");
        assert!(link.contains(".krew/bin/kubectl-krew"), "{link}");
        assert!(link.contains("/home/u/.local/bin/kubectl-krew"), "{link}");
    }

    #[test]
    fn test_path_hint_only_when_dir_is_absent() {
        assert_eq!(path_hint("/usr/bin:/home/u/.local/bin", "/home/u/.local/bin"), None);
        let hint = path_hint("/usr/bin:/bin", "/home/u/.local/bin").unwrap();
        assert!(hint.contains("/home/u/.local/bin"));
    }

    #[tokio::test]
    async fn test_install_stops_at_the_first_failing_step() {
        let dir = install_dir().unwrap();
        let commands = install_commands(Tool::Kubectl, linux(), &dir);
        let mut executor = MockExecutor::new();
        executor.respond_success(&commands[0], "");
        executor.respond(&commands[1], "", "curl: (6) could not resolve host", 6);

        let err = ToolInstaller::new(&mut executor, linux())
            .install(Tool::Kubectl)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::InstallationError(_)));
        assert_eq!(executor.commands.len(), 2);
    }
}
