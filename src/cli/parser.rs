use super::{list, services, tools};
use clap::{ArgAction, Parser, Subcommand};

const VERSION_INFO: &str = env!("AWSKIT_BUILD_VERSION");

#[derive(Parser, Debug)]
#[command(name = "awskit")]
#[command(about = "AWS CLI wrapper with defaults, previews and tool setup", long_about = None, version = VERSION_INFO)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Amazon EKS clusters
    Eks(services::ServiceArgs),

    /// Amazon ECR registries
    Ecr(services::ServiceArgs),

    /// Amazon EC2 instances
    Ec2(services::ServiceArgs),

    /// Amazon VPC networking
    Vpc(services::ServiceArgs),

    /// Amazon RDS databases
    Rds(services::ServiceArgs),

    /// Amazon ECS clusters
    Ecs(services::ServiceArgs),

    /// AWS App Runner services
    Apprunner(services::ServiceArgs),

    /// Amazon S3 buckets
    S3(services::ServiceArgs),

    /// AWS STS identity
    Sts(services::ServiceArgs),

    /// Check or install companion developer tools
    Tools(tools::Tools),

    /// List every operation with the aws command it runs
    List(list::List),
}
