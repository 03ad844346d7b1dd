use anyhow::Context;
use bubbletea_rs::Program;
use clap::{Parser, ValueEnum};
use square_countdown::config::{self, Config, Palette, RearmPolicy};
use square_countdown::App;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rearm {
    /// Keep the running countdown
    Ignore,
    /// Start over with the new duration
    Restart,
}

impl From<Rearm> for RearmPolicy {
    fn from(rearm: Rearm) -> Self {
        match rearm {
            Rearm::Ignore => RearmPolicy::Ignore,
            Rearm::Restart => RearmPolicy::Restart,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Countdown timer drawn as grids of colored squares")]
struct Cli {
    /// Squares per grid row
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    columns: u16,

    /// Milliseconds between countdown ticks
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Upper bound of the hours stepper (minutes and seconds stop at 59)
    #[arg(long, default_value_t = config::DEFAULT_HOURS_MAX)]
    hours_max: u32,

    /// What GO does while a countdown is running
    #[arg(long, value_enum, default_value_t = Rearm::Ignore)]
    rearm: Rearm,

    /// Hours grid color
    #[arg(long, default_value = "#00FF00")]
    hours_color: String,

    /// Minutes grid color
    #[arg(long, default_value = "#0000FF")]
    minutes_color: String,

    /// Seconds grid color
    #[arg(long, default_value = "#FF0000")]
    seconds_color: String,

    /// Write logs to this file (filter with RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            columns: usize::from(self.columns),
            tick_interval: Duration::from_millis(self.tick_ms),
            hours_max: self.hours_max,
            rearm: self.rearm.into(),
            palette: Palette {
                hours: self.hours_color.clone(),
                minutes: self.minutes_color.clone(),
                seconds: self.seconds_color.clone(),
            },
        }
    }
}

// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.config();
    tracing::info!(?config, "starting");
    config::install(config);

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;

    tracing::info!("exited");
    Ok(())
}
