use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Timberline - deck and fence lumber estimates
#[derive(Parser)]
#[command(name = "estimator")]
#[command(about = "Itemized lumber lists for decks and privacy fences")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ./estimator.json when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate materials for a deck
    Deck {
        #[command(flatten)]
        dims: DeckArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Estimate materials for a privacy fence
    Fence {
        #[command(flatten)]
        dims: FenceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List catalog products
    Catalog {
        /// Only products tagged with this usage (e.g. Decks, Fence Posts, Privacy Fences)
        #[arg(long)]
        usage: Option<String>,

        /// Show a single product by id
        #[arg(long)]
        id: Option<String>,
    },
    /// Ask the lumber project assistant a question
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Resolve the display image for a catalog product
    Image {
        /// Catalog product id
        product_id: String,
    },
    /// Write a configuration file with default settings
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

/// Deck inputs; anything omitted comes from the configuration
#[derive(Args, Debug, Default)]
pub struct DeckArgs {
    /// Deck width along the house (ft)
    #[arg(long)]
    pub width: Option<f64>,

    /// Deck depth away from the house (ft)
    #[arg(long)]
    pub depth: Option<f64>,

    /// Support post spacing (ft)
    #[arg(long)]
    pub post_spacing: Option<f64>,

    /// Include perimeter railings
    #[arg(long)]
    pub railings: Option<bool>,

    /// Add a mid rail (only with railings)
    #[arg(long)]
    pub mid_rail: Option<bool>,

    /// Include the ledger board
    #[arg(long)]
    pub ledger: Option<bool>,

    /// Decking product id
    #[arg(long)]
    pub decking: Option<String>,
}

/// Fence inputs; anything omitted comes from the configuration
#[derive(Args, Debug, Default)]
pub struct FenceArgs {
    /// Total fence length (ft)
    #[arg(long)]
    pub length: Option<f64>,

    /// Fence height: 4, 6 or 8 (ft)
    #[arg(long)]
    pub height: Option<u8>,

    /// Post spacing (ft)
    #[arg(long)]
    pub post_spacing: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Print the estimate as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also export the material list as a PDF
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Title printed on the PDF
    #[arg(long)]
    pub title: Option<String>,
}
