use thiserror::Error;

use crate::config::AppConfig;

/// Fixed default CloudWatch log group used when an operation recognizes
/// `-g/--log-group` but the caller does not supply one.
pub const DEFAULT_LOG_GROUP: &str = "/aws/ec2/instance";

/// The recognized command-line flags. Which of them apply to a given
/// operation is decided by its catalog entry; the parser itself only knows
/// names, aliases and arities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Region,
    Cluster,
    InstanceId,
    LogGroup,
    Follow,
    Filters,
    Help,
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Presence toggles a boolean.
    Boolean,
    /// Consumes exactly one following token.
    Value,
    /// Consumes every following token until the next option or a bare `--`.
    Greedy,
}

impl Flag {
    pub fn long(self) -> &'static str {
        match self {
            Flag::Region => "region",
            Flag::Cluster => "cluster",
            Flag::InstanceId => "instance-id",
            Flag::LogGroup => "log-group",
            Flag::Follow => "follow",
            Flag::Filters => "filters",
            Flag::Help => "help",
            Flag::Show => "show",
        }
    }

    pub fn short(self) -> Option<char> {
        match self {
            Flag::Region => Some('r'),
            Flag::Cluster => Some('c'),
            Flag::InstanceId => Some('i'),
            Flag::LogGroup => Some('g'),
            Flag::Follow => Some('f'),
            Flag::Help => Some('h'),
            Flag::Filters | Flag::Show => None,
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Flag::Region | Flag::Cluster | Flag::InstanceId | Flag::LogGroup => Arity::Value,
            Flag::Filters => Arity::Greedy,
            Flag::Follow | Flag::Help | Flag::Show => Arity::Boolean,
        }
    }

    /// How the flag is shown in error and help messages, e.g. `-r/--region`.
    pub fn display(self) -> String {
        match self.short() {
            Some(c) => format!("-{}/--{}", c, self.long()),
            None => format!("--{}", self.long()),
        }
    }
}

/// The set of flags one operation recognizes. `-r/--region`, `-h/--help`
/// and `--show` are accepted by every operation and are always members.
#[derive(Debug, Clone)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new<I>(operation_flags: I) -> Self
    where
        I: IntoIterator<Item = Flag>,
    {
        let mut flags = vec![Flag::Region, Flag::Help, Flag::Show];
        for flag in operation_flags {
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }
        Self { flags }
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Match a `-x` or `--xxx` token against the set.
    fn resolve(&self, token: &str) -> Option<Flag> {
        if let Some(long) = token.strip_prefix("--") {
            return self.flags.iter().copied().find(|f| f.long() == long);
        }
        let mut chars = token.strip_prefix('-')?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.flags.iter().copied().find(|f| f.short() == Some(c)),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Option {flag} requires a value")]
    MissingValue { flag: String },

    #[error("Unknown option: {token}")]
    UnknownOption { token: String },
}

/// Normalized record of one invocation's flags and values.
///
/// `region` is always populated (explicit flag, else the configured
/// default), and `log_group` is always populated when the operation
/// recognizes `-g`. Cluster and instance identifiers hold only explicitly
/// flagged values; their defaults are applied during parameter resolution
/// so a positional value can still win over a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptions {
    pub region: String,
    pub cluster: Option<String>,
    pub instance_id: Option<String>,
    pub log_group: Option<String>,
    pub follow: bool,
    pub filters: Vec<String>,
    pub help: bool,
    pub show: bool,
    pub positionals: Vec<String>,
}

/// Parse a raw argument list against the operation's flag set.
///
/// Tokens are scanned left to right. A token starting with `-` must match
/// the flag set (else `UnknownOption`); a value-taking flag must be
/// followed by a token that does not itself start with `-` (else
/// `MissingValue`; values that look like options have to be quoted by the
/// caller, a known limitation). Everything after a bare `--` is appended
/// verbatim to the positionals.
pub fn parse_options(
    tokens: &[String],
    flags: &FlagSet,
    config: &AppConfig,
) -> Result<ParsedOptions, OptionsError> {
    let mut region = None;
    let mut cluster = None;
    let mut instance_id = None;
    let mut log_group = None;
    let mut follow = false;
    let mut filters = Vec::new();
    let mut help = false;
    let mut show = false;
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];

        if token == "--" {
            positionals.extend(tokens[i + 1..].iter().cloned());
            break;
        }

        if token.len() > 1 && token.starts_with('-') {
            let flag = flags
                .resolve(token)
                .ok_or_else(|| OptionsError::UnknownOption {
                    token: token.clone(),
                })?;

            match flag.arity() {
                Arity::Boolean => {
                    match flag {
                        Flag::Follow => follow = true,
                        Flag::Help => help = true,
                        Flag::Show => show = true,
                        _ => unreachable!("only boolean flags reach here"),
                    }
                    i += 1;
                }
                Arity::Value => {
                    let value = match tokens.get(i + 1) {
                        Some(next) if !looks_like_option(next) => next.clone(),
                        _ => {
                            return Err(OptionsError::MissingValue {
                                flag: flag.display(),
                            })
                        }
                    };
                    match flag {
                        Flag::Region => region = Some(value),
                        Flag::Cluster => cluster = Some(value),
                        Flag::InstanceId => instance_id = Some(value),
                        Flag::LogGroup => log_group = Some(value),
                        _ => unreachable!("only value flags reach here"),
                    }
                    i += 2;
                }
                Arity::Greedy => {
                    let mut consumed = Vec::new();
                    let mut j = i + 1;
                    while let Some(next) = tokens.get(j) {
                        if looks_like_option(next) || next == "--" {
                            break;
                        }
                        consumed.push(next.clone());
                        j += 1;
                    }
                    if consumed.is_empty() {
                        return Err(OptionsError::MissingValue {
                            flag: flag.display(),
                        });
                    }
                    filters = consumed;
                    i = j;
                }
            }
        } else {
            positionals.push(token.clone());
            i += 1;
        }
    }

    Ok(ParsedOptions {
        region: region.unwrap_or_else(|| config.region.clone()),
        cluster,
        instance_id,
        log_group: if flags.contains(Flag::LogGroup) {
            log_group.or_else(|| Some(DEFAULT_LOG_GROUP.to_string()))
        } else {
            log_group
        },
        follow,
        filters,
        help,
        show,
        positionals,
    })
}

fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}
