mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cmd;
use demazure_engine::{ElementCache, FileStore};
use tracing::Level;

fn main() -> Result<()> {
    let cmd = Cmd::parse();

    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cmd.in_memory {
        cli::run(&mut ElementCache::in_memory(), cmd.action, &mut out)
    } else {
        tracing::info!(path = %cmd.cache.display(), "opening element cache");
        let store = FileStore::open(&cmd.cache)?;
        cli::run(&mut ElementCache::new(store), cmd.action, &mut out)
    }
}
