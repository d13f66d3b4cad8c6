//! Command-line definitions and handlers.
//!
//! - `lansweep [PREFIX]` - sweep hosts 1-255 of a /24 (prompts when no prefix)
//! - `lansweep host <ADDRESS>` - scan a single host

mod host;
mod interrupt;
mod sweep;

pub use host::{run_host, HostCommand};
pub use interrupt::{ctrl_c_signals, install as install_interrupt_handler, watch_interrupts};
pub use sweep::{read_prefix, SweepCommand};

use crate::config::AppSettings;
use crate::error::{CliResult, ConfigError};
use crate::scanner::ScannerConfig;
use crate::types::PortRange;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// lansweep - local network sweeper.
///
/// Probes TCP ports on every host of a /24 and reports which accept a
/// connection, then looks up known vulnerabilities for each live host.
#[derive(Parser, Debug)]
#[command(name = "lansweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sweep a /24 for open TCP ports", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Network prefix to sweep, e.g. 10.100.10.0/24 or 192.168.1.
    #[arg(value_name = "PREFIX")]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub options: ScanOptions,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a single host instead of a whole network
    Host(HostCommand),
}

/// Options shared by every command. Unset values fall back to the settings
/// file, then to built-in defaults.
#[derive(Args, Debug, Default)]
pub struct ScanOptions {
    /// Connection timeout in milliseconds
    #[arg(short = 't', long, global = true, value_name = "MS",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long, global = true, value_name = "N",
          value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Number of hosts scanned at once
    #[arg(long, global = true, value_name = "N",
          value_parser = clap::value_parser!(u8).range(1..))]
    pub host_concurrency: Option<u8>,

    /// Ports to scan, e.g. "1-1023" or "443"
    #[arg(short = 'p', long, global = true, value_name = "START-END")]
    pub ports: Option<PortRange>,

    /// Rate limit in probes per second (0 = unlimited)
    #[arg(short = 'r', long = "rate", global = true, value_name = "PPS")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Skip the vulnerability reporting stage
    #[arg(long, global = true)]
    pub no_report: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars and the banner
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Everything a command needs once settings and flags are merged.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scanner: ScannerConfig,
    pub host_concurrency: usize,
    pub output: OutputFormat,
    pub report: bool,
    pub quiet: bool,
    /// When the process started, for the elapsed-time line.
    pub started: Instant,
}

impl RunConfig {
    /// Progress bars are only drawn for interactive plain output.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output == OutputFormat::Plain
    }

    /// Create a progress bar under `multi`, or a hidden one.
    pub(crate) fn progress_bar(&self, multi: &MultiProgress, template: &str) -> ProgressBar {
        if !self.show_progress() {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(template)
            .map(|s| s.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        multi.add(ProgressBar::new(0).with_style(style))
    }

    /// Print the elapsed-time line. Goes to stderr for machine-readable
    /// formats so stdout stays parseable.
    pub fn finish(&self) {
        let elapsed = self.started.elapsed();
        if self.output == OutputFormat::Plain {
            crate::output::print_elapsed(elapsed);
        } else {
            eprintln!(
                "Time to complete operation: {}",
                crate::output::format_elapsed(elapsed)
            );
        }
    }
}

impl ScanOptions {
    /// Load the settings file and apply command-line overrides on top.
    pub fn resolve(&self, started: Instant) -> CliResult<RunConfig> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => match AppSettings::load() {
                Err(ConfigError::DirectoryNotFound) => {
                    debug!("no configuration directory, using defaults");
                    AppSettings::default()
                }
                other => other?,
            },
        };
        self.merge(&settings, started)
    }

    fn merge(&self, settings: &AppSettings, started: Instant) -> CliResult<RunConfig> {
        let mut scanner = settings.validate()?;
        if let Some(ports) = self.ports {
            scanner = scanner.with_ports(ports);
        }
        if let Some(ms) = self.timeout {
            scanner = scanner.with_timeout(Duration::from_millis(ms));
        }
        if let Some(n) = self.concurrency {
            scanner = scanner.with_concurrency(usize::from(n));
        }
        if let Some(rate) = self.rate_limit {
            scanner = scanner.with_rate_limit(rate);
        }

        let output = self
            .output
            .or_else(|| OutputFormat::from_str(&settings.output, true).ok())
            .unwrap_or_default();

        let run = RunConfig {
            scanner,
            host_concurrency: self
                .host_concurrency
                .map_or(settings.host_concurrency, usize::from),
            output,
            report: !self.no_report,
            quiet: self.quiet,
            started,
        };
        debug!(?run, "configuration resolved");
        Ok(run)
    }
}

/// A fully validated command, ready to run.
#[derive(Debug)]
pub enum Job {
    Sweep(SweepCommand),
    Host(Ipv4Addr),
}

/// A job plus the configuration it runs with.
#[derive(Debug)]
pub struct Prepared {
    pub job: Job,
    pub run: RunConfig,
}

impl Cli {
    /// Load configuration and validate the target, prompting for a prefix
    /// when none was given. Must run before the interrupt handler is
    /// installed so Ctrl-C at the prompt exits the process.
    pub async fn prepare(self, started: Instant) -> CliResult<Prepared> {
        let run = self.options.resolve(started)?;
        let job = match self.command {
            Some(Commands::Host(cmd)) => Job::Host(cmd.target()?),
            None => {
                let prefix = match self.prefix {
                    Some(prefix) => prefix,
                    None => read_prefix().await?,
                };
                Job::Sweep(SweepCommand::new(&prefix)?)
            }
        };
        Ok(Prepared { job, run })
    }
}

impl Prepared {
    /// Run the job until it completes or `cancel` fires.
    pub async fn execute(&self, cancel: &CancellationToken) -> CliResult<()> {
        match &self.job {
            Job::Sweep(cmd) => cmd.execute(&self.run, cancel).await,
            Job::Host(address) => run_host(*address, &self.run, cancel).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::types::NetworkPrefix;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lansweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_prefix() {
        let cli = parse(&["192.168.1.0/24", "-c", "64", "-vv"]);
        assert_eq!(cli.prefix.as_deref(), Some("192.168.1.0/24"));
        assert!(cli.command.is_none());
        assert_eq!(cli.options.concurrency, Some(64));
        assert_eq!(cli.options.verbose, 2);
    }

    #[test]
    fn test_host_subcommand_with_global_flags() {
        let cli = parse(&["host", "10.0.0.5", "-p", "20-25", "-o", "json"]);
        match cli.command {
            Some(Commands::Host(ref cmd)) => assert_eq!(cmd.address, "10.0.0.5"),
            None => panic!("expected host subcommand"),
        }
        assert_eq!(cli.options.ports.map(|p| p.len()), Some(6));
        assert_eq!(cli.options.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_invalid_flags_rejected() {
        assert!(Cli::try_parse_from(["lansweep", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["lansweep", "-p", "90-10"]).is_err());
        assert!(Cli::try_parse_from(["lansweep", "-o", "xml"]).is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings {
            timeout_ms: 300,
            concurrency: 100,
            output: "csv".to_string(),
            ..Default::default()
        };
        let cli = parse(&["-c", "20", "--host-concurrency", "4", "--no-report"]);
        let run = cli.options.merge(&settings, Instant::now()).unwrap();

        assert_eq!(run.scanner.concurrency, 20);
        assert_eq!(run.scanner.timeout, Duration::from_millis(300));
        assert_eq!(run.host_concurrency, 4);
        assert_eq!(run.output, OutputFormat::Csv);
        assert!(!run.report);
        assert!(!run.show_progress());
    }

    #[tokio::test]
    async fn test_prepare_validates_target_first() {
        let prepared = parse(&["10.1.2.0/24", "--config", "/nonexistent/lansweep.json"])
            .prepare(Instant::now())
            .await;
        assert!(matches!(prepared, Err(CliError::Config(_))));

        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();
        let config = settings.to_str().unwrap();

        let prepared = parse(&["10.1.2.0/24", "--config", config])
            .prepare(Instant::now())
            .await
            .unwrap();
        assert!(matches!(
            prepared.job,
            Job::Sweep(ref cmd) if cmd.prefix() == NetworkPrefix::new(10, 1, 2)
        ));

        let prepared = parse(&["host", "10.1.2.9", "--config", config])
            .prepare(Instant::now())
            .await
            .unwrap();
        assert!(matches!(prepared.job, Job::Host(addr) if addr == Ipv4Addr::new(10, 1, 2, 9)));

        let err = parse(&["not-a-prefix", "--config", config])
            .prepare(Instant::now())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ScanOptions {
            config: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        let err = options.resolve(Instant::now()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
