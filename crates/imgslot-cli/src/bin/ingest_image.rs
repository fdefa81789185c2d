use anyhow::{bail, Context, Result};
use clap::Parser;
use imgslot_cli::{init_tracing, read_input, LoggingListener};
use imgslot_core::{
    AssetMetadata, ErrorMetadata, FieldConfig, FieldValue, PipelineOutcome, PipelineSettings,
};
use imgslot_pipeline::{PipelineComponents, PipelineController};
use imgslot_storage::create_storage;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ingest_image")]
#[command(about = "Validate, resize and store an image, printing its variant record")]
struct Args {
    /// Image file to ingest
    file: PathBuf,

    /// Alternative text describing the image
    #[arg(long)]
    alt: String,

    /// Name prefix for the stored variants (e.g. event-hackfest)
    #[arg(long)]
    prefix: String,

    /// MIME type, if the file extension is missing or misleading
    #[arg(long, value_name = "TYPE")]
    mime: Option<String>,

    /// User recorded as the creator in the metadata record
    #[arg(long, value_name = "UUID")]
    created_by: Option<Uuid>,
}

#[derive(Serialize)]
struct IngestOutput<'a> {
    image: &'a imgslot_core::ProcessedImage,
    metadata: AssetMetadata,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let settings = PipelineSettings::from_env().context("Invalid pipeline settings")?;
    let storage = create_storage(&settings)
        .await
        .context("Failed to initialize storage")?;

    let config = FieldConfig::builder(&args.prefix).build()?;
    let controller = PipelineController::new(
        config,
        PipelineComponents::new(storage, &settings),
        Arc::new(LoggingListener),
    );
    controller.set_alt_text(args.alt.clone());

    let raw = read_input(&args.file, args.mime.as_deref()).await?;
    let filename = raw
        .filename
        .clone()
        .unwrap_or_else(|| args.file.display().to_string());

    match controller.select_file(raw).await {
        PipelineOutcome::Updated(FieldValue::Processed(image)) => {
            let metadata = AssetMetadata::from_processed(&image, filename, &args.alt, args.created_by)?;
            let output = IngestOutput {
                image: &image,
                metadata,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        PipelineOutcome::Rejected(err) | PipelineOutcome::Failed(err) => {
            bail!("{} ({}): {}", err.client_message(), err.error_code(), err)
        }
        other => bail!("Unexpected pipeline outcome: {:?}", other),
    }
}
