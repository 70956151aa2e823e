use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wayfarer_seed::config::Settings;
use wayfarer_seed::destinations::load_destinations_file;
use wayfarer_seed::fetch::ReferenceClient;
use wayfarer_seed::generate::{self, Counts};
use wayfarer_seed::manifest::{build_manifest, write_manifest};
use wayfarer_seed::script::{render_downs, render_script, render_ups};
use wayfarer_seed::stats::SeedStats;
use wayfarer_seed::verify;

/// Wayfarer Seed Data Generator
///
/// Fetches reference data (countries, synthetic personas) from public APIs,
/// combines it with a static destinations CSV, and writes a SQL migration
/// script that populates the Wayfarer database, plus a photo manifest
/// side-file for the uploader.
#[derive(Parser, Debug)]
#[command(name = "wayfarer-seed")]
#[command(about = "Generate a seed-data migration script for the Wayfarer database", long_about = None)]
struct Args {
    /// Number of synthetic users to generate (the persona API caps a batch at 5000)
    #[arg(long, default_value_t = 5000)]
    users: u32,

    /// Number of trips to generate
    #[arg(long, default_value_t = 500)]
    trips: u32,

    /// Number of treasure hunts to generate
    #[arg(long, default_value_t = 200)]
    hunts: u32,

    /// Path to the destinations CSV
    #[arg(long, default_value = "Destinations.csv")]
    destinations: PathBuf,

    /// Output path for the SQL migration script
    #[arg(short, long, default_value = "seed.sql")]
    out: PathBuf,

    /// Output path for the photo manifest side-file
    #[arg(long, default_value = "photo_manifest.json")]
    manifest: PathBuf,

    /// How many generated users receive a profile photo
    #[arg(long, default_value_t = 50)]
    photo_sample: usize,

    /// Random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Dry-run the script against an in-memory copy of the application schema
    #[arg(long)]
    verify: bool,

    /// Skip the confirmation prompt when overwriting an existing script
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.verbose {
        "wayfarer_seed=debug"
    } else {
        "wayfarer_seed=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    println!("Wayfarer Seed Data Generator");
    println!("============================");
    println!();
    println!("Users: {}", args.users);
    println!("Trips: {}", args.trips);
    println!("Treasure hunts: {}", args.hunts);
    println!("Destinations CSV: {}", args.destinations.display());
    println!("Output: {}", args.out.display());
    println!();

    // The script replaces any previous output; make that explicit.
    if args.out.exists() && !args.yes {
        println!(
            "{} already exists and will be replaced.",
            args.out.display()
        );
        println!("Do you want to continue? (y/N): ");

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read user input")?;

        let input = input.trim().to_lowercase();
        if input != "y" && input != "yes" {
            println!("Generation cancelled.");
            return Ok(());
        }
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let client = ReferenceClient::new(&settings.api)?;
    let catalog = client.fetch_countries().await?;
    let personas = client.fetch_personas(args.users).await?;

    let destinations = load_destinations_file(
        &args.destinations,
        &catalog,
        settings.existing.destinations,
        &mut rng,
    )?;
    tracing::info!("loaded {} destinations", destinations.len());

    let batch = generate::generate(
        &catalog,
        &personas,
        destinations,
        Counts {
            trips: args.trips,
            treasure_hunts: args.hunts,
        },
        &settings.existing,
        Utc::now().date_naive(),
        &mut rng,
    )?;

    let report = if args.verify {
        tracing::info!("verifying script against the application schema");
        let report = verify::run(&render_ups(&batch), &render_downs(), &settings.existing)?;
        tracing::info!("verification passed");
        Some(report)
    } else {
        None
    };

    let script = render_script(&batch);
    fs::write(&args.out, &script)
        .with_context(|| format!("Failed to write script to {}", args.out.display()))?;

    let manifest = build_manifest(&personas, &batch.users, args.photo_sample);
    write_manifest(&manifest, &args.manifest)?;

    SeedStats::collect(&batch, &manifest).display(report.as_ref());

    tracing::info!("seed script written to {}", args.out.display());
    Ok(())
}
