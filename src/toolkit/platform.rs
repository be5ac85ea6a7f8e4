use super::error::{ToolError, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArch {
    X86_64,
    Aarch64,
}

/// The host this binary runs on. Install recipes exist for Linux and macOS
/// on x86_64/aarch64; anything else refuses up front rather than failing
/// halfway through a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: HostOs,
    pub arch: HostArch,
}

impl HostPlatform {
    pub fn detect() -> ToolResult<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn from_parts(os: &str, arch: &str) -> ToolResult<Self> {
        let os = match os {
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            other => return Err(ToolError::UnsupportedHost(format!("OS '{other}'"))),
        };
        let arch = match arch {
            "x86_64" => HostArch::X86_64,
            "aarch64" => HostArch::Aarch64,
            other => {
                return Err(ToolError::UnsupportedHost(format!(
                    "architecture '{other}'"
                )))
            }
        };
        Ok(Self { os, arch })
    }

    /// OS token as release assets spell it (`linux`, `darwin`).
    pub fn os_token(&self) -> &'static str {
        match self.os {
            HostOs::Linux => "linux",
            HostOs::MacOs => "darwin",
        }
    }

    /// Architecture token as release assets spell it (`amd64`, `arm64`).
    pub fn arch_token(&self) -> &'static str {
        match self.arch {
            HostArch::X86_64 => "amd64",
            HostArch::Aarch64 => "arm64",
        }
    }
}
