use std::path::PathBuf;

use campaign_core::ExtractionStrategy;
use clap::{Args, Parser, Subcommand, ValueEnum};

use super::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "campaign")]
#[command(about = "Compose, send and track bulk email campaigns")]
pub struct Cli {
    /// RON settings file (defaults to ./campaign.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the settings file
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Where log records go
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Use the in-memory backend instead of HTTP (send and test only)
    #[arg(long, global = true)]
    pub simulate: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a campaign and follow it until it finishes
    Send(SendArgs),
    /// Send a single test message
    Test(TestArgs),
    /// Show the stored state of a campaign
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Sender address
    #[arg(long)]
    pub from: String,

    /// Sender display name
    #[arg(long, default_value = "")]
    pub from_name: String,

    #[arg(long)]
    pub subject: String,

    /// Message body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the message body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Treat the body as HTML
    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub compose: ComposeArgs,

    /// File with recipient addresses, or `-` for stdin
    #[arg(long)]
    pub recipients: PathBuf,

    /// Answer yes to the large-campaign confirmation
    #[arg(long)]
    pub yes: bool,

    #[arg(long, value_enum, default_value_t = StrategyArg::Scan)]
    pub strategy: StrategyArg,

    /// Milliseconds between status queries
    #[arg(long)]
    pub interval_ms: Option<u64>,

    #[arg(long)]
    pub max_recipients: Option<usize>,

    #[arg(long)]
    pub warn_threshold: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct TestArgs {
    #[command(flatten)]
    pub compose: ComposeArgs,

    /// Test recipient; the sender address when omitted
    #[arg(long, default_value = "")]
    pub to: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub campaign_id: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Scan,
    Delimited,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Scan => ExtractionStrategy::Scan,
            StrategyArg::Delimited => ExtractionStrategy::Delimited,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command, LogTarget, StrategyArg};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_send_with_global_flags() {
        let cli = Cli::try_parse_from([
            "campaign",
            "send",
            "--from",
            "news@example.com",
            "--subject",
            "Hello",
            "--recipients",
            "-",
            "--yes",
            "--strategy",
            "delimited",
            "--simulate",
            "--log",
            "terminal",
        ])
        .unwrap();
        assert!(cli.simulate);
        assert_eq!(cli.log, LogTarget::Terminal);
        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert!(args.yes);
        assert_eq!(args.strategy, StrategyArg::Delimited);
        assert_eq!(args.recipients.to_str(), Some("-"));
        assert_eq!(args.compose.from_name, "");
    }

    #[test]
    fn body_and_body_file_conflict() {
        let parsed = Cli::try_parse_from([
            "campaign",
            "test",
            "--from",
            "a@x.com",
            "--subject",
            "s",
            "--body",
            "hi",
            "--body-file",
            "body.txt",
        ]);
        assert!(parsed.is_err());
    }
}
