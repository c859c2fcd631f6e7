#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;

use intellilabel::app::{IntelliLabelApp, APP_TITLE};
use intellilabel::{BuiltinModel, Classifier, ModelManager};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force a fresh download of the model files
    #[arg(short, long)]
    fresh: bool,
}

async fn ensure_model_downloaded(fresh: bool) -> anyhow::Result<()> {
    let manager = ModelManager::new_default()?;
    let model = BuiltinModel::DistilBertGithubIssues;

    if fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(model)?;
    }

    if !manager.is_model_downloaded(model) {
        info!("Downloading model (takes ~1 min)...");
        manager.download_model(model).await?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    intellilabel::init_logger();
    let args = Args::parse();

    // The runtime only drives the one-time model fetch; the UI itself is
    // synchronous.
    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(ensure_model_downloaded(args.fresh))
        .context("model download failed")?;

    info!("Building classifier...");
    let classifier = Arc::new(
        Classifier::builder()
            .with_model(BuiltinModel::DistilBertGithubIssues)?
            .build()?,
    );
    info!("Classifier ready; starting UI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(IntelliLabelApp::new(classifier)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed to start: {e}"))?;

    Ok(())
}
