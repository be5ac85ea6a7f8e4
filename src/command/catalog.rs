use thiserror::Error;

use crate::command::options::{Flag, FlagSet};
use crate::command::template::{self, ParamValue, Piece};
use crate::config::AppConfig;

use std::collections::HashMap;

const DOCS_BASE: &str = "https://awscli.amazonaws.com/v2/documentation/api/latest/reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Relay stdout as-is (tables, kubeconfig messages, passwords).
    Text,
    /// Ask the AWS CLI for JSON and pretty-print the relayed body.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    /// Capture stdout/stderr, relay after the child exits.
    Capture,
    /// Hand the terminal to the child (interactive sessions, log tails).
    Stream,
}

/// Where a parameter's value comes from when neither a flag nor a
/// positional supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    None,
    ConfiguredRegion,
    ConfiguredCluster,
    Fixed(&'static str),
}

impl DefaultValue {
    pub fn resolve(self, config: &AppConfig) -> Option<String> {
        match self {
            DefaultValue::None => None,
            DefaultValue::ConfiguredRegion => Some(config.region.clone()),
            DefaultValue::ConfiguredCluster => Some(config.cluster.clone()),
            DefaultValue::Fixed(value) => Some(value.to_string()),
        }
    }
}

/// One parameter of an operation: how it is supplied (flag and/or
/// positional index), what fills it when absent, and whether validation
/// insists on it.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub flag: Option<Flag>,
    pub positional: Option<usize>,
    pub default: DefaultValue,
    pub required: bool,
}

/// A complete description of one `awskit <service> <verb>` operation.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub service: &'static str,
    pub verb: &'static str,
    pub summary: &'static str,
    pub aws_service: &'static str,
    pub aws_operation: &'static str,
    pub params: &'static [ParamSpec],
    pub template: &'static [Piece],
    pub output: OutputMode,
    pub relay: Relay,
    pub destructive: bool,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown {service} operation '{verb}' (available: {available})")]
    UnknownOperation {
        service: String,
        verb: String,
        available: String,
    },
}

const REGION: ParamSpec = ParamSpec {
    name: "region",
    flag: Some(Flag::Region),
    positional: None,
    default: DefaultValue::ConfiguredRegion,
    required: true,
};

const CLUSTER: ParamSpec = ParamSpec {
    name: "cluster",
    flag: Some(Flag::Cluster),
    positional: Some(0),
    default: DefaultValue::ConfiguredCluster,
    required: true,
};

const INSTANCE_ID: ParamSpec = ParamSpec {
    name: "instance-id",
    flag: Some(Flag::InstanceId),
    positional: Some(0),
    default: DefaultValue::None,
    required: true,
};

const FILTERS: ParamSpec = ParamSpec {
    name: "filters",
    flag: Some(Flag::Filters),
    positional: None,
    default: DefaultValue::None,
    required: false,
};

// The option parser fills the fixed default for -g, so no catalog default.
const LOG_GROUP: ParamSpec = ParamSpec {
    name: "log-group",
    flag: Some(Flag::LogGroup),
    positional: None,
    default: DefaultValue::None,
    required: true,
};

const FOLLOW: ParamSpec = ParamSpec {
    name: "follow",
    flag: Some(Flag::Follow),
    positional: None,
    default: DefaultValue::None,
    required: false,
};

const REPOSITORY: ParamSpec = ParamSpec {
    name: "repository",
    flag: None,
    positional: Some(0),
    default: DefaultValue::None,
    required: true,
};

const SERVICE_ARN: ParamSpec = ParamSpec {
    name: "service-arn",
    flag: None,
    positional: Some(0),
    default: DefaultValue::None,
    required: true,
};

const S3_PATH: ParamSpec = ParamSpec {
    name: "path",
    flag: None,
    positional: Some(0),
    default: DefaultValue::None,
    required: false,
};

const S3_PATH_REQUIRED: ParamSpec = ParamSpec {
    name: "path",
    flag: None,
    positional: Some(0),
    default: DefaultValue::None,
    required: true,
};

const REGION_FLAG: Piece = Piece::Flagged {
    flag: "--region",
    param: "region",
};

pub static CATALOG: &[CommandSpec] = &[
    CommandSpec {
        service: "eks",
        verb: "ls",
        summary: "list EKS clusters in the region",
        aws_service: "eks",
        aws_operation: "list-clusters",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "eks",
        verb: "describe",
        summary: "describe one EKS cluster",
        aws_service: "eks",
        aws_operation: "describe-cluster",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--name",
                param: "cluster",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "eks",
        verb: "update-kubeconfig",
        summary: "write a kubeconfig entry for an EKS cluster",
        aws_service: "eks",
        aws_operation: "update-kubeconfig",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--name",
                param: "cluster",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "eks",
        verb: "nodegroups",
        summary: "list the managed node groups of a cluster",
        aws_service: "eks",
        aws_operation: "list-nodegroups",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--cluster-name",
                param: "cluster",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "eks",
        verb: "enable-auto-mode",
        summary: "turn EKS Auto Mode on (compute, load balancing, storage)",
        aws_service: "eks",
        aws_operation: "update-cluster-config",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--name",
                param: "cluster",
            },
            REGION_FLAG,
            Piece::Lit(r#"--compute-config '{"enabled":true}'"#),
            Piece::Lit(r#"--kubernetes-network-config '{"elasticLoadBalancing":{"enabled":true}}'"#),
            Piece::Lit(r#"--storage-config '{"blockStorage":{"enabled":true}}'"#),
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "eks",
        verb: "disable-auto-mode",
        summary: "turn EKS Auto Mode off",
        aws_service: "eks",
        aws_operation: "update-cluster-config",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--name",
                param: "cluster",
            },
            REGION_FLAG,
            Piece::Lit(r#"--compute-config '{"enabled":false}'"#),
            Piece::Lit(r#"--kubernetes-network-config '{"elasticLoadBalancing":{"enabled":false}}'"#),
            Piece::Lit(r#"--storage-config '{"blockStorage":{"enabled":false}}'"#),
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: true,
    },
    CommandSpec {
        service: "ecr",
        verb: "ls",
        summary: "list ECR repositories",
        aws_service: "ecr",
        aws_operation: "describe-repositories",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ecr",
        verb: "login",
        summary: "print a registry login password (pipe into docker login)",
        aws_service: "ecr",
        aws_operation: "get-login-password",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ecr",
        verb: "images",
        summary: "list images in a repository",
        aws_service: "ecr",
        aws_operation: "list-images",
        params: &[REPOSITORY, REGION],
        template: &[
            Piece::Flagged {
                flag: "--repository-name",
                param: "repository",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ec2",
        verb: "ls",
        summary: "table of instances with state, name and private IP",
        aws_service: "ec2",
        aws_operation: "describe-instances",
        params: &[REGION, FILTERS],
        template: &[
            REGION_FLAG,
            Piece::Repeated {
                flag: "--filters",
                param: "filters",
            },
            Piece::Lit(
                "--query 'Reservations[].Instances[].{Id:InstanceId,Type:InstanceType,State:State.Name,Name:Tags[?Key==`Name`]|[0].Value,Ip:PrivateIpAddress}' --output table",
            ),
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ec2",
        verb: "start",
        summary: "start a stopped instance",
        aws_service: "ec2",
        aws_operation: "start-instances",
        params: &[INSTANCE_ID, REGION],
        template: &[
            Piece::Flagged {
                flag: "--instance-ids",
                param: "instance-id",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ec2",
        verb: "stop",
        summary: "stop a running instance",
        aws_service: "ec2",
        aws_operation: "stop-instances",
        params: &[INSTANCE_ID, REGION],
        template: &[
            Piece::Flagged {
                flag: "--instance-ids",
                param: "instance-id",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: true,
    },
    CommandSpec {
        service: "ec2",
        verb: "connect",
        summary: "open an interactive SSM session on an instance",
        aws_service: "ssm",
        aws_operation: "start-session",
        params: &[INSTANCE_ID, REGION],
        template: &[
            Piece::Flagged {
                flag: "--target",
                param: "instance-id",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Text,
        relay: Relay::Stream,
        destructive: false,
    },
    CommandSpec {
        service: "ec2",
        verb: "logs",
        summary: "tail a CloudWatch log group",
        aws_service: "logs",
        aws_operation: "tail",
        params: &[LOG_GROUP, FOLLOW, REGION],
        template: &[
            Piece::Value { param: "log-group" },
            Piece::Switch {
                flag: "--follow",
                param: "follow",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Text,
        relay: Relay::Stream,
        destructive: false,
    },
    CommandSpec {
        service: "vpc",
        verb: "ls",
        summary: "table of VPCs",
        aws_service: "ec2",
        aws_operation: "describe-vpcs",
        params: &[REGION],
        template: &[
            REGION_FLAG,
            Piece::Lit(
                "--query 'Vpcs[].{Id:VpcId,Cidr:CidrBlock,Default:IsDefault,Name:Tags[?Key==`Name`]|[0].Value}' --output table",
            ),
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "vpc",
        verb: "subnets",
        summary: "table of subnets",
        aws_service: "ec2",
        aws_operation: "describe-subnets",
        params: &[REGION, FILTERS],
        template: &[
            REGION_FLAG,
            Piece::Repeated {
                flag: "--filters",
                param: "filters",
            },
            Piece::Lit(
                "--query 'Subnets[].{Id:SubnetId,Vpc:VpcId,Cidr:CidrBlock,Az:AvailabilityZone,Public:MapPublicIpOnLaunch}' --output table",
            ),
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "rds",
        verb: "ls",
        summary: "table of database instances",
        aws_service: "rds",
        aws_operation: "describe-db-instances",
        params: &[REGION],
        template: &[
            REGION_FLAG,
            Piece::Lit(
                "--query 'DBInstances[].{Id:DBInstanceIdentifier,Engine:Engine,Class:DBInstanceClass,Status:DBInstanceStatus,Endpoint:Endpoint.Address}' --output table",
            ),
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "rds",
        verb: "start",
        summary: "start a stopped database instance",
        aws_service: "rds",
        aws_operation: "start-db-instance",
        params: &[INSTANCE_ID, REGION],
        template: &[
            Piece::Flagged {
                flag: "--db-instance-identifier",
                param: "instance-id",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "rds",
        verb: "stop",
        summary: "stop a running database instance",
        aws_service: "rds",
        aws_operation: "stop-db-instance",
        params: &[INSTANCE_ID, REGION],
        template: &[
            Piece::Flagged {
                flag: "--db-instance-identifier",
                param: "instance-id",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: true,
    },
    CommandSpec {
        service: "ecs",
        verb: "ls",
        summary: "list ECS clusters",
        aws_service: "ecs",
        aws_operation: "list-clusters",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ecs",
        verb: "services",
        summary: "list services in a cluster",
        aws_service: "ecs",
        aws_operation: "list-services",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--cluster",
                param: "cluster",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "ecs",
        verb: "tasks",
        summary: "list running tasks in a cluster",
        aws_service: "ecs",
        aws_operation: "list-tasks",
        params: &[CLUSTER, REGION],
        template: &[
            Piece::Flagged {
                flag: "--cluster",
                param: "cluster",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "apprunner",
        verb: "ls",
        summary: "list App Runner services",
        aws_service: "apprunner",
        aws_operation: "list-services",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "apprunner",
        verb: "pause",
        summary: "pause an App Runner service",
        aws_service: "apprunner",
        aws_operation: "pause-service",
        params: &[SERVICE_ARN, REGION],
        template: &[
            Piece::Flagged {
                flag: "--service-arn",
                param: "service-arn",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: true,
    },
    CommandSpec {
        service: "apprunner",
        verb: "resume",
        summary: "resume a paused App Runner service",
        aws_service: "apprunner",
        aws_operation: "resume-service",
        params: &[SERVICE_ARN, REGION],
        template: &[
            Piece::Flagged {
                flag: "--service-arn",
                param: "service-arn",
            },
            REGION_FLAG,
        ],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "s3",
        verb: "ls",
        summary: "list buckets or a bucket path",
        aws_service: "s3",
        aws_operation: "ls",
        params: &[S3_PATH, REGION],
        template: &[Piece::Value { param: "path" }, REGION_FLAG],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "s3",
        verb: "du",
        summary: "recursive, summarized listing of a bucket path",
        aws_service: "s3",
        aws_operation: "ls",
        params: &[S3_PATH_REQUIRED, REGION],
        template: &[
            Piece::Value { param: "path" },
            Piece::Lit("--recursive --summarize --human-readable"),
            REGION_FLAG,
        ],
        output: OutputMode::Text,
        relay: Relay::Capture,
        destructive: false,
    },
    CommandSpec {
        service: "sts",
        verb: "whoami",
        summary: "show the caller identity",
        aws_service: "sts",
        aws_operation: "get-caller-identity",
        params: &[REGION],
        template: &[REGION_FLAG],
        output: OutputMode::Json,
        relay: Relay::Capture,
        destructive: false,
    },
];

/// Look up the catalog entry for `<service> <verb>`, listing the service's
/// verbs on a miss.
pub fn find(service: &str, verb: &str) -> Result<&'static CommandSpec, CatalogError> {
    CATALOG
        .iter()
        .find(|spec| spec.service == service && spec.verb == verb)
        .ok_or_else(|| CatalogError::UnknownOperation {
            service: service.to_string(),
            verb: verb.to_string(),
            available: verbs_for(service).join(", "),
        })
}

pub fn entries() -> &'static [CommandSpec] {
    CATALOG
}

pub fn verbs_for(service: &str) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|spec| spec.service == service)
        .map(|spec| spec.verb)
        .collect()
}

impl CommandSpec {
    /// The flags this operation accepts, universal ones included.
    pub fn flag_set(&self) -> FlagSet {
        FlagSet::new(self.params.iter().filter_map(|p| p.flag))
    }

    pub fn render(&self, values: &HashMap<&'static str, ParamValue>) -> String {
        template::render(
            self.aws_service,
            self.aws_operation,
            self.template,
            values,
            self.output == OutputMode::Json,
        )
    }

    pub fn docs_url(&self) -> String {
        format!("{}/{}/{}.html", DOCS_BASE, self.aws_service, self.aws_operation)
    }

    /// `awskit <service> <verb> <required> [optional] [options]`.
    pub fn usage(&self) -> String {
        let mut positionals: Vec<&ParamSpec> = self
            .params
            .iter()
            .filter(|p| p.positional.is_some())
            .collect();
        positionals.sort_by_key(|p| p.positional);

        let mut line = format!("awskit {} {}", self.service, self.verb);
        for param in positionals {
            if param.required && param.default == DefaultValue::None {
                line.push_str(&format!(" <{}>", param.name));
            } else {
                line.push_str(&format!(" [{}]", param.name));
            }
        }
        line.push_str(" [options]");
        line
    }

    /// Full `-h` text: summary, usage, option lines with live defaults, a
    /// confirmation note for destructive operations, and the AWS CLI
    /// reference link.
    pub fn help_text(&self, config: &AppConfig) -> String {
        let mut ordered: Vec<Flag> = self
            .params
            .iter()
            .filter_map(|p| p.flag)
            .filter(|f| *f != Flag::Region)
            .collect();
        ordered.push(Flag::Region);
        ordered.push(Flag::Show);
        ordered.push(Flag::Help);

        let lines: Vec<(String, String)> = ordered
            .into_iter()
            .map(|flag| (option_column(flag), flag_help(flag, config)))
            .collect();
        let width = lines.iter().map(|(col, _)| col.len()).max().unwrap_or(0);

        let mut text = format!(
            "awskit {} {} - {}\n\nUsage:\n  {}\n\nOptions:\n",
            self.service,
            self.verb,
            self.summary,
            self.usage()
        );
        for (col, help) in lines {
            text.push_str(&format!("  {:<width$}  {}\n", col, help, width = width));
        }
        if self.destructive {
            text.push_str("\nAsks for confirmation before running.\n");
        }
        text.push_str(&format!("\nDocs: {}\n", self.docs_url()));
        text
    }
}

fn option_column(flag: Flag) -> String {
    let value = match flag.arity() {
        crate::command::options::Arity::Boolean => "",
        crate::command::options::Arity::Value => " <value>",
        crate::command::options::Arity::Greedy => " <name=value>...",
    };
    match flag.short() {
        Some(c) => format!("-{}, --{}{}", c, flag.long(), value),
        None => format!("    --{}{}", flag.long(), value),
    }
}

fn flag_help(flag: Flag, config: &AppConfig) -> String {
    match flag {
        Flag::Region => format!("AWS region (default: {})", config.region),
        Flag::Cluster => format!("cluster name (default: {})", config.cluster),
        Flag::InstanceId => "instance identifier".to_string(),
        Flag::LogGroup => format!(
            "CloudWatch log group (default: {})",
            crate::command::options::DEFAULT_LOG_GROUP
        ),
        Flag::Follow => "keep the log stream open".to_string(),
        Flag::Filters => "AWS filters, consumed until the next option".to_string(),
        Flag::Help => "show this help".to_string(),
        Flag::Show => "print the aws command line instead of running it".to_string(),
    }
}
