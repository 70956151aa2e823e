mod client;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer_types::PhotoManifest;

use client::{file_name_from_url, ApiClient};

/// Wayfarer Photo Uploader
///
/// Reads the photo manifest written by wayfarer-seed and uploads each photo
/// to a running Wayfarer instance over its HTTP API, assigning it as the
/// profile picture of the user it was generated for.
#[derive(Parser, Debug)]
#[command(name = "wayfarer-upload")]
#[command(about = "Upload sample photos to a running Wayfarer instance", long_about = None)]
struct Args {
    /// Base URL of the running application
    #[arg(long, default_value = "http://localhost:9000")]
    base_url: String,

    /// Path to the photo manifest written by wayfarer-seed
    #[arg(short, long, default_value = "photo_manifest.json")]
    manifest: PathBuf,

    /// Admin auth cookie value
    #[arg(long, env = "WAYFARER_ADMIN_COOKIE", hide_env_values = true)]
    cookie: String,

    /// Photos already present in the target instance; server-assigned photo
    /// ids continue after this offset
    #[arg(long, default_value_t = 1)]
    existing_photos: i64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Statistics collected during the upload run
#[derive(Debug, Default)]
struct UploadStats {
    photos_processed: usize,
    photos_uploaded: usize,
    profile_pictures_set: usize,
    errors: Vec<String>,
}

impl UploadStats {
    fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }

    fn display(&self) {
        println!();
        println!("Upload Summary");
        println!("==============");
        println!();
        println!("Photos processed: {}", self.photos_processed);
        println!("Photos uploaded: {}", self.photos_uploaded);
        println!("Profile pictures set: {}", self.profile_pictures_set);

        if !self.errors.is_empty() {
            println!();
            println!("Errors encountered: {}", self.errors.len());
            for (i, error) in self.errors.iter().enumerate() {
                println!("  {}. {}", i + 1, error);
            }
        }
    }
}

fn read_manifest(path: &PathBuf) -> Result<PhotoManifest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.verbose {
        "wayfarer_upload=debug"
    } else {
        "wayfarer_upload=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Wayfarer Photo Uploader");
    println!("=======================");
    println!();
    println!("Target: {}", args.base_url);
    println!("Manifest: {}", args.manifest.display());
    println!();

    let manifest = read_manifest(&args.manifest)?;
    if manifest.is_empty() {
        println!("Manifest is empty - nothing to upload.");
        return Ok(());
    }
    println!(
        "Found {} photos for {} users",
        manifest.len(),
        manifest.assignment_count()
    );

    let client = ApiClient::new(&args.base_url, &args.cookie)?;
    let mut stats = UploadStats::default();
    let mut next_photo_id = args.existing_photos;

    for (url, user_ids) in manifest.iter() {
        stats.photos_processed += 1;

        let bytes = match client.download_photo(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("Failed to get photo {url}: {e:#}");
                tracing::error!("{message}");
                stats.record_error(message);
                continue;
            }
        };

        let file_name = file_name_from_url(url);
        for &user_id in user_ids {
            match client
                .upload_photo(bytes.clone(), file_name, user_id)
                .await
            {
                Ok(()) => {
                    stats.photos_uploaded += 1;
                    next_photo_id += 1;
                    tracing::debug!("uploaded {url} for user {user_id} as photo {next_photo_id}");

                    if let Err(e) = client.set_profile_photo(next_photo_id, user_id).await {
                        let message =
                            format!("Failed to make profile picture {url} for user {user_id}: {e:#}");
                        tracing::error!("{message}");
                        stats.record_error(message);
                    } else {
                        stats.profile_pictures_set += 1;
                    }
                }
                Err(e) => {
                    let message = format!("Failed to upload photo {url} for user {user_id}: {e:#}");
                    tracing::error!("{message}");
                    stats.record_error(message);
                }
            }
        }
    }

    stats.display();

    if !stats.errors.is_empty() {
        bail!("{} of {} uploads failed", stats.errors.len(), manifest.assignment_count());
    }

    println!();
    println!("Upload completed successfully!");
    Ok(())
}
