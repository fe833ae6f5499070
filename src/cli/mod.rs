use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::server;

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve(ServeOpts),
}

#[derive(Args)]
struct ServeOpts {
    /// Port to listen on.
    #[clap(long = "port", default_value = "8000", env = "PORT")]
    port: u16,

    /// Directory where the collection files are stored.
    ///
    /// If this is not set, records are kept in memory and lost when the
    /// process exits.
    #[clap(long = "data-dir", env = "DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl From<ServeOpts> for server::Options {
    fn from(opts: ServeOpts) -> Self {
        Self {
            port: opts.port,
            data_dir: opts.data_dir,
        }
    }
}

pub async fn run_with_sys_args() -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;

    let cli = Cli::parse();

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(fmt_layer).init();

    match cli.command {
        Commands::Serve(opts) => server::serve(opts.into()).await,
    }
}
