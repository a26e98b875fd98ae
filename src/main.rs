use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::{run_pipeline, FailurePolicy, SqliteWarehouse};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and activity logs into a star-schema warehouse")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the song files, then the log files, into the warehouse.
    Run {
        /// Path to the SQLite warehouse database file.
        #[clap(long = "db", value_parser = parse_path)]
        db_path: Option<PathBuf>,

        /// Root directory of the song metadata files.
        #[clap(long, value_parser = parse_path)]
        song_data: Option<PathBuf>,

        /// Root directory of the activity log files.
        #[clap(long, value_parser = parse_path)]
        log_data: Option<PathBuf>,

        /// Path to a TOML config file. Its values override the CLI arguments.
        #[clap(long, value_parser = parse_path)]
        config: Option<PathBuf>,

        /// What to do when a file fails to load.
        #[clap(long, value_enum, default_value_t = FailurePolicy::Abort)]
        failure_policy: FailurePolicy,

        /// Seconds of slack when matching a play's length to a song duration.
        #[clap(long, default_value_t = 0.0)]
        duration_tolerance: f64,

        /// Show a progress bar instead of per-file log lines.
        #[clap(long)]
        progress_bar: bool,
    },

    /// Drop and recreate every warehouse table.
    CreateTables {
        #[clap(long = "db", value_parser = parse_path)]
        db_path: PathBuf,
    },

    /// Print the row count of every warehouse table.
    Stats {
        #[clap(long = "db", value_parser = parse_path)]
        db_path: PathBuf,
    },
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Run {
            db_path,
            song_data,
            log_data,
            config,
            failure_policy,
            duration_tolerance,
            progress_bar,
        } => {
            let file_config = match &config {
                Some(path) => {
                    info!("Loading config from {:?}", path);
                    Some(FileConfig::load(path)?)
                }
                None => None,
            };
            let cli_config = CliConfig {
                db_path,
                song_data,
                log_data,
                failure_policy,
                duration_tolerance,
                progress_bar,
            };
            let app_config = AppConfig::resolve(&cli_config, file_config)?;

            info!("Warehouse: {:?}", app_config.db_path);
            info!("Song data: {:?}", app_config.song_data);
            info!("Log data: {:?}", app_config.log_data);
            info!(
                "Failure policy: {:?}, duration tolerance: {}s",
                app_config.failure_policy, app_config.duration_tolerance
            );

            run_pipeline(&app_config)?;
        }
        Command::CreateTables { db_path } => {
            SqliteWarehouse::recreate(&db_path)?;
            info!("Warehouse tables created at {:?}", db_path);
        }
        Command::Stats { db_path } => {
            if !db_path.exists() {
                anyhow::bail!("Warehouse database does not exist: {:?}", db_path);
            }
            let counts = SqliteWarehouse::open(&db_path)?.counts()?;
            println!("songs      {}", counts.songs);
            println!("artists    {}", counts.artists);
            println!("users      {}", counts.users);
            println!("time       {}", counts.time);
            println!("songplays  {}", counts.songplays);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Err(err) = run(cli_args.command) {
        error!("{:#}", err);
        return Err(err);
    }
    Ok(())
}
