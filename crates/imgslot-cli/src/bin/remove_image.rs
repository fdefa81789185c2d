use anyhow::{Context, Result};
use clap::Parser;
use imgslot_cli::init_tracing;
use imgslot_core::PipelineSettings;
use imgslot_processing::DeletionResolver;
use imgslot_storage::create_storage;

#[derive(Parser, Debug)]
#[command(name = "remove_image")]
#[command(about = "Delete every stored variant of an image by one of its URLs")]
struct Args {
    /// Public URL of any variant
    url: String,

    /// Print the paths that would be removed without removing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let settings = PipelineSettings::from_env().context("Invalid pipeline settings")?;
    let storage = create_storage(&settings)
        .await
        .context("Failed to initialize storage")?;
    let resolver = DeletionResolver::new(storage);

    let paths = resolver.resolve_paths(&args.url);
    if paths.is_empty() {
        println!("URL was not issued by this storage, nothing to remove");
        return Ok(());
    }

    if args.dry_run {
        for path in &paths {
            println!("{}", path);
        }
        return Ok(());
    }

    resolver
        .resolve_and_delete(&args.url)
        .await
        .context("Failed to remove image variants")?;
    println!("Removed {} candidate paths", paths.len());
    Ok(())
}
