//! faxwire CLI: send a PDF as a fax and track the transmission to completion.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use faxwire::config::load_config;
use faxwire::{FaxStatus, FaxWorkflow, FaxwireError, ReqwestGateway};

#[derive(Parser)]
#[command(name = "faxwire")]
#[command(about = "Send a PDF as a fax and track the transmission")]
struct Cli {
    /// Recipient fax number: optional '+', then digits. Falls back to the
    /// configured recipient.
    recipient: Option<String>,

    /// Path to the PDF document. Falls back to the configured path.
    pdf: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            tracing::info!(status = %outcome, "fax transmission finished");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> faxwire::Result<FaxStatus> {
    let config = load_config()?;

    let recipient = cli
        .recipient
        .or_else(|| config.recipient.clone())
        .ok_or_else(|| {
            FaxwireError::Other(anyhow!(
                "no recipient given; pass it as the first argument or set FAXWIRE_RECIPIENT"
            ))
        })?;

    let pdf = cli
        .pdf
        .or_else(|| config.pdf_file_path.clone())
        .ok_or_else(|| {
            FaxwireError::Other(anyhow!(
                "no document given; pass the PDF path as the second argument or set FAXWIRE_PDF_FILE_PATH"
            ))
        })?;

    let gateway = ReqwestGateway::new(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            interrupt.cancel();
        }
    });

    let workflow = FaxWorkflow::new(gateway, config.faxline_id.clone(), config.poll)
        .with_cancellation(cancel);

    let report = workflow
        .run(&recipient, &pdf, |status| println!("{status}"))
        .await?;

    Ok(report.outcome)
}
