use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{Effect, FormController, HttpClassifier, SelectedImage};
use shared::domain::ClassificationResult;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod session;

use config::load_settings;
use session::Session;

#[derive(Parser, Debug)]
#[command(about = "Classify images with a remote CIFAR-10 classifier")]
struct Args {
    /// Base URL of the classification service; `/classify-image` is appended.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Settings file (defaults to ./classifier.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one image and print the result.
    Classify { path: PathBuf },
    /// Select, remove and submit images from a prompt.
    Interactive,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref(), args.server_url)?;
    let classifier = HttpClassifier::new(&settings.classifier_url)?;
    info!(endpoint = %classifier.endpoint(), "using classification endpoint");
    let controller = FormController::new(Arc::new(classifier));

    match args.command {
        Command::Classify { path } => classify_once(controller, path).await,
        Command::Interactive => {
            let mut session = Session::new(controller, io::stdout());
            session.run(BufReader::new(tokio::io::stdin())).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn classify_once(mut controller: FormController, path: PathBuf) -> Result<ExitCode> {
    let image = SelectedImage::from_path(&path).await?;
    controller.select(image);
    for effect in controller.submit().await {
        if let Effect::Warn(message) = effect {
            eprintln!("warning: {message}");
        }
    }

    let result = controller.state().result();
    if let Some(text) = result.display_text() {
        println!("{text}");
    }
    Ok(match result {
        ClassificationResult::Success { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
