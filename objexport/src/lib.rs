//! Library module for the objexport binary.
//!
//! Holds the CLI definition and the harness that turns parsed flags into an
//! [`ExportConfig`], a message table and an authenticated schema source,
//! then calls [`objexport_core::run`]. `main.rs` only parses, sets up
//! logging, and maps the outcome to output and an exit code.

pub mod command;
pub mod render;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser};
use objexport_core::{ExportConfig, LogFormat};
use objexport_core::auth::ExplicitCredentials;
use objexport_core::messages::{
    COMMAND_DESCRIPTION, FILTER_FLAG_DESCRIPTION, FORCE_FLAG_DESCRIPTION,
    OUTPUT_FLAG_DESCRIPTION, SPLIT_FLAG_DESCRIPTION, default_message,
};

/// CLI argument structure
#[derive(Parser)]
#[command(name = "objexport")]
#[command(about = default_message(COMMAND_DESCRIPTION))]
#[command(version)]
#[command(long_about = "
objexport - sobject schema export

Connects to an already-authorized org, lists every sobject with the global
describe call, optionally filters them by name or label, describes each
remaining object, and writes the describe documents as YAML.

EXAMPLES:
  objexport --target-org admin@acme.org
  objexport -u acme --filter account --output account-schema.yaml
  objexport -u acme --split --output schema/
  objexport -u acme --json > schema.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub org: OrgArgs,

    /// Output file (or directory with --split)
    #[arg(short = 'o', long, value_name = "PATH", help = default_message(OUTPUT_FLAG_DESCRIPTION))]
    pub output: Option<PathBuf>,

    /// Name/label substring filter
    #[arg(short = 'i', long, value_name = "TEXT", help = default_message(FILTER_FLAG_DESCRIPTION))]
    pub filter: Option<String>,

    /// Overwrite flag (accepted; output is always overwritten)
    #[arg(short = 'f', long, help = default_message(FORCE_FLAG_DESCRIPTION))]
    pub force: bool,

    /// One file per object
    #[arg(short = 's', long, help = default_message(SPLIT_FLAG_DESCRIPTION))]
    pub split: bool,

    /// Print the collected descriptions as a JSON result document
    #[arg(long, help = "Format output as JSON; progress lines are suppressed")]
    pub json: bool,

    /// YAML file overriding user-facing messages
    #[arg(long, value_name = "FILE", help = "YAML file overriding built-in user-facing messages")]
    pub messages: Option<PathBuf>,
}

/// Org selection and connection flags
///
/// Not `Debug`: it holds the raw access token.
#[derive(Args)]
pub struct OrgArgs {
    /// Username or alias of the org to export
    #[arg(
        short = 'u',
        long = "target-org",
        alias = "targetusername",
        env = "SF_TARGET_ORG",
        value_name = "ORG",
        help = "Username or alias of the target org (defaults to the configured default org)"
    )]
    pub target_org: Option<String>,

    /// Instance URL used together with --access-token
    #[arg(
        long,
        env = "SF_INSTANCE_URL",
        value_name = "URL",
        help = "Org instance URL; use together with --access-token to skip auth files"
    )]
    pub instance_url: Option<String>,

    /// Access token used together with --instance-url
    #[arg(
        long,
        env = "SF_ACCESS_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN",
        help = "Access token (session id); never logged"
    )]
    pub access_token: Option<String>,

    /// REST API version
    #[arg(
        long,
        env = "SF_API_VERSION",
        value_name = "VERSION",
        help = "REST API version, e.g. 60.0 (defaults to the org auth's version or 60.0)"
    )]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds
    #[arg(
        long,
        default_value = "120",
        value_name = "SECS",
        help = "Timeout in seconds for each describe request"
    )]
    pub timeout: u64,

    /// Auth directory
    #[arg(
        long,
        env = "OBJEXPORT_AUTH_DIR",
        value_name = "DIR",
        help = "Directory holding org auth files (default: ~/.sfdx)"
    )]
    pub auth_dir: Option<PathBuf>,
}

/// Verbosity and log format flags
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,

    /// Log record format
    #[arg(
        long,
        default_value = "text",
        value_name = "FORMAT",
        value_parser = LogFormat::from_str,
        help = "Log format on stderr: text or json"
    )]
    pub log_format: LogFormat,
}

impl Cli {
    /// Export settings described by the flags.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            output: self.output.clone(),
            filter: self.filter.clone(),
            force: self.force,
            split: self.split,
            target_org: self.org.target_org.clone(),
        }
    }
}

impl OrgArgs {
    /// Explicit credentials from `--access-token`/`--instance-url` (or env).
    pub fn explicit_credentials(&self) -> ExplicitCredentials {
        ExplicitCredentials::new(self.access_token.clone(), self.instance_url.clone())
    }

    /// Request timeout as a duration.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
