//! tlweb: run the TeslaLogger admin server on its own
//!
//! State introspection starts out empty; the charging endpoints talk to the
//! configured database.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use config::{Environment, File};
use mimalloc::MiMalloc;
use tlweb_core::store::MySqlStore;
use tlweb_core::{Config, MemoryState, ServerState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config files to merge, later files win. Missing files are skipped
    #[arg(short, long, default_values_os_t = vec![PathBuf::from("config.toml")])]
    config: Vec<PathBuf>,

    /// Set the output style of the logs
    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Listen on this port instead of the configured one
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, ValueEnum)]
enum Output {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    set_up_logger(&args.output);

    let mut cfg = init_config(&args.config);
    if let Some(port) = args.port {
        cfg.port = port;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.workers.max(1))
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(err = %e, "failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    let state = Arc::new(ServerState::new(
        Arc::new(MemoryState::new()),
        Arc::new(MySqlStore::new(cfg.database_url.clone())),
    ));

    info!(port = cfg.port, workers = cfg.workers, "starting admin server");
    match runtime.block_on(tlweb_core::run(cfg.port, state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(err = %e, "admin server cannot start");
            ExitCode::FAILURE
        }
    }
}

fn set_up_logger(output: &Output) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match output {
        Output::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .flatten_event(true)
                .init();
        }
        Output::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .init();
        }
    };
}

fn init_config(paths: &[PathBuf]) -> Config {
    let files = paths
        .iter()
        .filter(|path| path.is_file())
        .inspect(|path| info!("found config file {}", path.display()))
        .map(|path| File::from(path.as_path()))
        .collect::<Vec<_>>();

    if files.is_empty() {
        info!("found no config files to load");
    }

    config::Config::builder()
        .add_source(files)
        .add_source(Environment::with_prefix("TLWEB").try_parsing(true))
        .build()
        .and_then(|cfg| cfg.try_deserialize::<Config>())
        .unwrap_or_else(|e| {
            error!(err = %e, "failed to load config, using defaults");
            Config::default()
        })
}
