mod cli;
mod console;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use timehook_engine::{spawn_run, Gateway, ReqwestTransport};
use timehook_logging::{hook_debug, hook_info};

use crate::cli::Cli;

const KEY_ENV: &str = "TIMEHOOK_KEY";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("Warning: {err:#}");
    }

    let Some(api_key) = cli.api_key() else {
        println!("{KEY_ENV} environment variable not defined");
        return ExitCode::FAILURE;
    };

    match run(&cli, api_key).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("\n[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let settings = cli.log_settings();
    let file = settings.file.as_deref().unwrap_or_else(|| Path::new("-"));
    timehook_logging::initialize(&settings)
        .with_context(|| format!("can not open log file {}", file.display()))
}

/// Drives one webhook to completion; `Ok(true)` only if the webhook succeeded.
async fn run(cli: &Cli, api_key: String) -> anyhow::Result<bool> {
    let transport =
        ReqwestTransport::new(cli.transport_settings()).context("can not build HTTP client")?;
    let gateway = Gateway::new(cli.api_settings(api_key), Arc::new(transport));
    hook_info!(
        "Scheduling {} in {}s via {}",
        cli.url,
        cli.delay,
        cli.api_url
    );

    let mut handle = spawn_run(gateway, cli.registration(), cli.run_settings());
    let mut console = console::Console::stdio();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(event) => console.show(&event)?,
                None => break,
            },
            _ = &mut ctrl_c, if !interrupted => {
                hook_debug!("Interrupt received, cancelling run");
                interrupted = true;
                handle.cancel();
            }
        }
    }

    Ok(console.outcome().is_some_and(|outcome| outcome.succeeded))
}
