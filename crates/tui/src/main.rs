//! `waveportal`: wave at the Wave Portal contract from the terminal.

#[macro_use]
extern crate tracing;

mod args;
mod handler;
mod tui;
mod utils;

use args::Args;
use clap::Parser;
use eyre::Result;
use waveportal::{Controller, wallet};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    handler::install();

    let args = Args::parse();
    let log_file = args.log_file();
    utils::subscriber(&log_file)?;
    info!(log_file = %log_file.display(), "starting waveportal");

    let wallet = wallet::detect(args.rpc_url.as_deref(), args.poll_interval());
    tui::run(Controller::new(wallet)).await
}
