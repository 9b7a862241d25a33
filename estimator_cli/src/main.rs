//! # Timberline CLI
//!
//! Command-line front end for the deck and fence estimator. Human-readable
//! tables by default, JSON with `--json` for scripts and LLM tooling.

mod cli;
mod config;

use std::process::ExitCode;

use clap::Parser;
use estimator_assist::chat::APOLOGY;
use estimator_assist::{
    AssistSettings, ChatAssistant, GeminiClient, ImageCache, ImageGenerator, ProductImageService,
};
use estimator_core::file_io::write_atomic;
use estimator_core::materials::{catalog, find_product, products_for_usage, LumberProduct};
use estimator_core::pdf::render_estimate_pdf;
use estimator_core::{EstimateResult, ProjectEstimate, Session};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, OutputArgs};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estimator=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> EstimateResult<()> {
    if let Commands::InitConfig { path } = &cli.command {
        AppConfig::default().save(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let mut session = Session::with_settings(config.estimator.clone());

    match cli.command {
        Commands::Deck { dims, output } => {
            let deck = dims.apply(&session.settings.deck);
            let estimate = session.estimate_deck(deck)?;
            emit_estimate(estimate, &output)?;
        }
        Commands::Fence { dims, output } => {
            let fence = dims.apply(&session.settings.fence);
            let estimate = session.estimate_fence(fence)?;
            emit_estimate(estimate, &output)?;
        }
        Commands::Catalog { usage, id } => match (id, usage) {
            (Some(id), _) => print_products(&[find_product(&id)?]),
            (None, Some(tag)) => print_products(&products_for_usage(&tag)),
            (None, None) => print_products(&catalog().iter().collect::<Vec<_>>()),
        },
        Commands::Ask { message } => {
            if let Some(reply) = ask(&config.assist, &message.join(" ")).await {
                println!("{}", reply);
            }
        }
        Commands::Image { product_id } => {
            let product = find_product(&product_id)?;
            let generator = match GeminiClient::from_settings(&config.assist) {
                Ok(client) => ImageGenerator::new(client),
                Err(e) => {
                    warn!(error = %e, "image generation disabled");
                    ImageGenerator::disabled()
                }
            };
            let cache = ImageCache::new(config.assist.cache_dir.clone());
            let service = ProductImageService::new(generator, cache.clone());

            let source = service.image_for(product).await;
            if source.starts_with("data:") {
                println!("Generated image cached at {}", cache.entry_path(&product.id).display());
            } else {
                println!("Static image: {}", source);
            }
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

/// One-shot question to the assistant.
///
/// A missing API key is treated like any other backend failure: logged,
/// then answered with the fixed apology.
async fn ask(settings: &AssistSettings, message: &str) -> Option<String> {
    match GeminiClient::from_settings(settings) {
        Ok(client) => ChatAssistant::new(client).send(message).await,
        Err(_) if message.trim().is_empty() => None,
        Err(e) => {
            warn!(error = %e, "chat assistant unavailable");
            Some(APOLOGY.to_string())
        }
    }
}

fn emit_estimate(estimate: &ProjectEstimate, output: &OutputArgs) -> EstimateResult<()> {
    if output.json {
        println!("{}", estimate.to_json_pretty()?);
    } else {
        print_estimate(estimate);
    }

    if let Some(path) = &output.pdf {
        let title = output
            .title
            .clone()
            .unwrap_or_else(|| format!("{} {}", estimate.dimensions, estimate.project_type.display_name()));
        let bytes = render_estimate_pdf(estimate, &title)?;
        write_atomic(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "pdf exported");
        if !output.json {
            println!();
            println!("PDF written to {}", path.display());
        }
    }
    Ok(())
}

fn print_estimate(estimate: &ProjectEstimate) {
    let name_width = estimate
        .materials
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0)
        .max("Material".len());

    println!("═══════════════════════════════════════");
    println!("  {} MATERIAL LIST", estimate.project_type.display_name().to_uppercase());
    println!("═══════════════════════════════════════");
    println!();
    println!("Dimensions:   {}", estimate.dimensions);
    println!("Waste factor: {:.0}%", estimate.waste_factor * 100.0);
    println!();
    println!("  {:<width$}  {:>6}  Unit", "Material", "Qty", width = name_width);
    for item in &estimate.materials {
        println!(
            "  {:<width$}  {:>6}  {}",
            item.name,
            item.quantity,
            item.unit,
            width = name_width
        );
        println!("      {}", item.description);
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  {} line items (estimate {})", estimate.materials.len(), estimate.id);
    println!("═══════════════════════════════════════");
}

fn print_products(products: &[&LumberProduct]) {
    if products.is_empty() {
        println!("No matching products.");
        return;
    }
    for product in products {
        println!("{}  {}", product.id, product.name);
        println!("    Grade:      {}", product.grade.display_name());
        println!("    Dimensions: {}", product.dimensions);
        println!("    Usage:      {}", product.usage.join(", "));
        println!("    {}", product.description);
        println!();
    }
}
