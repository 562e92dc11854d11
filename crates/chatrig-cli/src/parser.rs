//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Bring up and tear down the local chat stack.
#[derive(Parser)]
#[command(name = "chatrig")]
#[command(about = "Bring up and tear down a local chat front-end, proxy and gateway")]
#[command(version)]
pub struct Cli {
    /// Credential file read before every other source
    #[arg(long, global = true, env = "CHATRIG_SECRETS_FILE")]
    pub secrets: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ModeArg;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn start_defaults_to_simple_mode() {
        let cli = Cli::try_parse_from(["chatrig", "start"]).unwrap();
        match cli.command {
            Some(Commands::Start { mode }) => assert_eq!(mode, ModeArg::Simple),
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn start_takes_mode_as_positional_argument() {
        let cli = Cli::try_parse_from(["chatrig", "start", "full"]).unwrap();
        match cli.command {
            Some(Commands::Start { mode }) => assert_eq!(mode, ModeArg::Full),
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn mode_and_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatrig",
            "restart",
            "gateway",
            "--secrets",
            "/tmp/s.env",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.secrets, Some(PathBuf::from("/tmp/s.env")));
        match cli.command {
            Some(Commands::Restart { mode }) => assert_eq!(mode, ModeArg::Gateway),
            _ => panic!("expected restart"),
        }
    }

    #[test]
    fn status_accepts_json_flag() {
        let cli = Cli::try_parse_from(["chatrig", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status { json: true })));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["chatrig", "start", "turbo"]).is_err());
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["chatrig"]).unwrap();
        assert!(cli.command.is_none());
    }
}
