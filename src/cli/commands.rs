//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - chat: interactive terminal chat (default)
//! - serve: browser chat front end
//! - ask: one-shot question
//! - category: local category table lookup

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bistro - a restaurant recommendation agent
#[derive(Parser, Debug)]
#[command(name = "bistro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal chat (default)
    Chat,

    /// Serve the browser chat front end
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question and exit
    Ask {
        /// The question to ask
        message: String,
    },

    /// Look up a restaurant category id locally
    Category {
        /// Category name or pattern, e.g. "pizza"
        query: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (chat mode)
        let cli = Cli::try_parse_from(["bistro"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["bistro", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["bistro", "-c", "/path/to/bistro.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/bistro.yml")));
    }

    #[test]
    fn test_chat_command() {
        let cli = Cli::try_parse_from(["bistro", "chat"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Chat)));
    }

    #[test]
    fn test_serve_command_defaults() {
        let cli = Cli::try_parse_from(["bistro", "serve"]).unwrap();
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_serve_command_overrides() {
        let cli = Cli::try_parse_from(["bistro", "serve", "--host", "0.0.0.0", "-p", "3000"]).unwrap();
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(3000));
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_ask_command() {
        let cli = Cli::try_parse_from(["bistro", "ask", "Where is Haarlem?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { message }) => {
                assert_eq!(message, "Where is Haarlem?");
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_category_command() {
        let cli = Cli::try_parse_from(["bistro", "category", "pizza"]).unwrap();
        match cli.command {
            Some(Commands::Category { query }) => {
                assert_eq!(query, "pizza");
            }
            _ => panic!("Expected category command"),
        }
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["bistro", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
