//! guildscope - read-only reports on a Discord guild

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod permissions;
mod reporters;
mod session;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = cli::run(cli).await {
        eprintln!("{} {}", "❌ Error:".red(), err);
        if let Some(help) = cli::error_help(&err) {
            println!("{}", help);
        }
        std::process::exit(1);
    }
}

/// `warn` unless `RUST_LOG` says otherwise; `--debug` raises our own
/// modules to `debug`.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
