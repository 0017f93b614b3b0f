// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use moodle_dl::{cli::Cli, error::AppError, logging, run_from_cli};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| clap::crate_name!().to_string());
    let after_help = format!(
        "Examples:\n  # discover enrolled courses and download all of them\n  {bin}\n\n  # download two specific courses into ./notes\n  {bin} 1234 5678 -o notes\n\nCredentials come from MOODLE_USERNAME / MOODLE_PASSWORD, the config file or a prompt.",
        bin = bin_name
    );
    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init(args.log_level.into());
    log::info!("{} {} started", clap::crate_name!(), clap::crate_version!());

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        token.store(true, Ordering::Relaxed);
        log::warn!("interrupt received, stopping after the current file");
        println!(
            "\n{} Stopping after the current file, press {} again to quit now.",
            "[!]".yellow(),
            "Ctrl+C".yellow()
        );
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} Aborted by user.", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    if let Err(e) = run_from_cli(args, cancellation_token).await {
        log::error!("run ended with error: {}", e);
        match e {
            AppError::UserInterrupt => println!("\n{} Interrupted, partial downloads are kept.", "[!]".yellow()),
            e => eprintln!("\n{} {}", "[X]".red(), format!("Error: {}", e).red()),
        }
    }
    log::info!("finished");
}
