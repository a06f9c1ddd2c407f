mod client;
mod commands;
mod config;
mod error;
mod render;
#[cfg(test)]
mod test_support;

use clap::Parser;
use engine::ExpenseStore;

use crate::{client::HttpStore, error::Result, render::Renderer};

#[tokio::main]
async fn main() -> Result<()> {
    let args = config::Args::parse();
    let settings = config::load(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_ledger={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let remote = HttpStore::new(&settings.base_url, settings.timeout())?;
    let store = ExpenseStore::new(remote);
    if let Err(err) = store.initialize().await {
        tracing::error!("failed to load data from {}: {err}", settings.base_url);
        return Err(err.into());
    }

    let renderer = Renderer::new(settings.currency_symbol.as_str());
    let output = commands::run(&store, args.command, &renderer, args.json).await?;
    print!("{output}");
    Ok(())
}
