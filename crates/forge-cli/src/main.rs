mod output;
mod root;
mod session;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "forge",
    about = "Generate one new tool idea and append it to the project's idea history",
    version
)]
struct Cli {
    /// Project root (default: auto-detect from .forge/ or .git/)
    #[arg(long, env = "FORGE_ROOT")]
    root: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the accepted record; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(session::run(&root)));

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
