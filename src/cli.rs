//! Command-line interface definitions for the news agent.
//!
//! Configuration can come from flags or environment variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the news agent.
///
/// # Examples
///
/// ```sh
/// # Default wiring: Reuters + comp.lang.python.announce, printed and saved to news.html
/// news_agent run
///
/// # Custom wiring, tolerating sources that are down
/// news_agent run --config agent.yaml --keep-going
///
/// # Just print the latest postings of one group
/// news_agent group nntp.aioe.org comp.lang.python.announce --count 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch every configured source and render to every configured destination
    Run {
        /// YAML file describing sources and destinations (built-in defaults when omitted)
        #[arg(short, long, env = "NEWS_AGENT_CONFIG")]
        config: Option<PathBuf>,

        /// Skip sources that fail instead of aborting the whole run
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Print the most recent postings of a single newsgroup
    Group {
        /// News server, optionally with :port
        server: String,

        /// Newsgroup name
        group: String,

        /// How many of the newest postings to show
        #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,
    },

    /// Print the built-in default configuration as YAML
    DefaultConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["news_agent", "run"]);
        match cli.command {
            Command::Run { keep_going, .. } => assert!(!keep_going),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_with_config_and_keep_going() {
        let cli = Cli::parse_from(["news_agent", "run", "-c", "agent.yaml", "--keep-going"]);
        assert_eq!(
            cli.command,
            Command::Run {
                config: Some(PathBuf::from("agent.yaml")),
                keep_going: true,
            }
        );
    }

    #[test]
    fn test_group_command() {
        let cli = Cli::parse_from([
            "news_agent",
            "group",
            "nntp.aioe.org",
            "comp.lang.python.announce",
            "-n",
            "5",
        ]);
        assert_eq!(
            cli.command,
            Command::Group {
                server: "nntp.aioe.org".into(),
                group: "comp.lang.python.announce".into(),
                count: 5,
            }
        );
    }

    #[test]
    fn test_group_count_defaults_to_ten() {
        let cli = Cli::parse_from(["news_agent", "group", "s", "g"]);
        assert!(matches!(cli.command, Command::Group { count: 10, .. }));
    }

    #[test]
    fn test_group_rejects_zero_count() {
        assert!(Cli::try_parse_from(["news_agent", "group", "s", "g", "-n", "0"]).is_err());
    }

    #[test]
    fn test_default_config_command() {
        let cli = Cli::parse_from(["news_agent", "default-config"]);
        assert_eq!(cli.command, Command::DefaultConfig);
    }
}
