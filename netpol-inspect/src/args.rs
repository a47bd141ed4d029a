use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Explains the effect of Kubernetes network policies on running pods.
#[derive(Debug, Parser)]
#[clap(name = "netpol-inspect", version, about)]
pub struct Args {
    #[clap(
        long,
        default_value = "netpol_inspect=info,warn",
        env = "NETPOL_INSPECT_LOG"
    )]
    pub log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain", env = "NETPOL_INSPECT_LOG_FORMAT")]
    pub log_format: kubert::LogFormat,

    /// Namespace to look in, if needed
    #[clap(long, short = 'n', default_value = "default", global = true)]
    pub namespace: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints information about the effect of a network policy in the cluster
    Describe {
        /// Name of the NetworkPolicy resource
        name: String,
    },

    /// Prints information about the effect of a network policy manifest
    Apply {
        /// Path to a network policy file
        #[clap(long, short = 'f')]
        file: PathBuf,
    },
}
