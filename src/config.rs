use std::collections::HashMap;
use std::env;

/// Builtin fallback when `AWSKIT_DEFAULT_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Builtin fallback when `AWSKIT_DEFAULT_CLUSTER` is unset.
pub const DEFAULT_CLUSTER: &str = "main";

const REGION_VAR: &str = "AWSKIT_DEFAULT_REGION";
const CLUSTER_VAR: &str = "AWSKIT_DEFAULT_CLUSTER";
const INSTALL_VAR_PREFIX: &str = "AWSKIT_INSTALL_";

/// Process-wide configuration, read from the environment exactly once at
/// startup and passed by reference into every handler. Handlers never look
/// up environment variables themselves.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default AWS region substituted when `-r/--region` is absent.
    pub region: String,
    /// Default cluster name substituted when `-c/--cluster` and the
    /// positional form are both absent.
    pub cluster: String,
    /// Per-tool auto-install toggles.
    pub auto_install: AutoInstall,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build the config from an explicit variable list. Tests use this to
    /// avoid mutating the process environment.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut region = None;
        let mut cluster = None;
        let mut overrides = HashMap::new();

        for (key, value) in vars {
            if key == REGION_VAR {
                if !value.trim().is_empty() {
                    region = Some(value.trim().to_string());
                }
            } else if key == CLUSTER_VAR {
                if !value.trim().is_empty() {
                    cluster = Some(value.trim().to_string());
                }
            } else if let Some(tool) = key.strip_prefix(INSTALL_VAR_PREFIX) {
                overrides.insert(tool.to_ascii_uppercase(), parse_toggle(&value));
            }
        }

        Self {
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            cluster: cluster.unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            auto_install: AutoInstall { overrides },
        }
    }
}

/// Auto-install toggles: every tool defaults to enabled, individual tools
/// are switched off with `AWSKIT_INSTALL_<TOOL>=false`.
#[derive(Debug, Clone, Default)]
pub struct AutoInstall {
    overrides: HashMap<String, bool>,
}

impl AutoInstall {
    pub fn enabled(&self, tool_name: &str) -> bool {
        self.overrides
            .get(&tool_name.to_ascii_uppercase())
            .copied()
            .unwrap_or(true)
    }

    /// Environment variable controlling a tool's toggle, for hint messages.
    pub fn toggle_var(tool_name: &str) -> String {
        format!("{}{}", INSTALL_VAR_PREFIX, tool_name.to_ascii_uppercase())
    }
}

fn parse_toggle(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builtin_fallbacks_apply() {
        let config = AppConfig::from_vars(vars(&[("HOME", "/root")]));
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.cluster, DEFAULT_CLUSTER);
    }

    #[test]
    fn test_environment_overrides_fallbacks() {
        let config = AppConfig::from_vars(vars(&[
            ("AWSKIT_DEFAULT_REGION", "eu-central-1"),
            ("AWSKIT_DEFAULT_CLUSTER", "staging"),
        ]));
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.cluster, "staging");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_vars(vars(&[("AWSKIT_DEFAULT_REGION", "  ")]));
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_install_toggles_default_to_enabled() {
        let config = AppConfig::from_vars(vars(&[]));
        assert!(config.auto_install.enabled("kubectl"));
        assert!(config.auto_install.enabled("fzf"));
    }

    #[test]
    fn test_falsy_toggle_values_disable() {
        for falsy in ["0", "false", "no", "off", "False", " NO "] {
            let config = AppConfig::from_vars(vars(&[("AWSKIT_INSTALL_HELM", falsy)]));
            assert!(!config.auto_install.enabled("helm"), "value {:?}", falsy);
            assert!(config.auto_install.enabled("kubectl"));
        }
    }

    #[test]
    fn test_truthy_toggle_values_stay_enabled() {
        for truthy in ["1", "true", "yes", "on", "anything"] {
            let config = AppConfig::from_vars(vars(&[("AWSKIT_INSTALL_HELM", truthy)]));
            assert!(config.auto_install.enabled("helm"), "value {:?}", truthy);
        }
    }

    #[test]
    fn test_toggle_var_names_are_uppercased() {
        assert_eq!(AutoInstall::toggle_var("kubectl"), "AWSKIT_INSTALL_KUBECTL");
    }
}
