use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "paramguard",
    version,
    about = "Whitelist filtering for untrusted, nested request parameters"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter request parameters against a whitelist and print the result
    Permit(PermitArgs),
    /// Reject parameters that contain keys outside the whitelist
    Check(CheckArgs),
    /// Print a required parameter, or reject the request when it is missing
    Require(RequireArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Request parameters as a JSON object ("-" reads stdin)
    #[arg(long, default_value = "-")]
    pub params: String,

    /// YAML config (`strong_parameters: {strict, forbidden_status}`)
    #[arg(long, env = "PARAMGUARD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PermitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Filter list as YAML or JSON
    #[arg(long)]
    pub filters: PathBuf,

    /// Validate exact keys before filtering
    #[arg(long)]
    pub strict: bool,

    /// Require this top-level key and filter its value instead of the whole body
    #[arg(long)]
    pub require: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Filter list as YAML or JSON
    #[arg(long)]
    pub filters: PathBuf,

    /// Require this top-level key and check its value instead of the whole body
    #[arg(long)]
    pub require: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RequireArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Key that must be present and not blank
    #[arg(long)]
    pub key: String,
}
