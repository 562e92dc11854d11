//! Subcommands and their arguments.

use chatrig_core::Mode;
use clap::{Subcommand, ValueEnum};

/// Which services `start` and `restart` bring up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Front-end (and proxy, when credentials enable it)
    #[default]
    Simple,
    /// Background gateway plus the full front-end stack
    Full,
    /// Gateway in the foreground, nothing else
    Gateway,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Simple => Self::Simple,
            ModeArg::Full => Self::Full,
            ModeArg::Gateway => Self::Gateway,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize configuration and start the stack
    Start {
        #[arg(value_enum, default_value_t)]
        mode: ModeArg,
    },

    /// Stop the stack and any tracked gateway process
    Stop,

    /// Report which services are running
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop, then start again
    Restart {
        #[arg(value_enum, default_value_t)]
        mode: ModeArg,
    },

    /// Open the chat front-end in a browser
    Open,

    /// Follow the stack's container logs
    Logs,

    /// Show resolved paths for every chatrig file
    Paths,
}
