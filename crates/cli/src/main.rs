//! Comforty CLI - catalog inspection and checkout quotes.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! comforty catalog products --search chair --tag featured
//!
//! # List categories
//! comforty catalog categories
//!
//! # Report documents rejected at ingestion
//! comforty catalog validate
//!
//! # Price a cart with a discount
//! comforty quote --discount 20 chair-1:2 sofa-7
//! ```
//!
//! The catalog is read from Sanity (`SANITY_*` variables) unless
//! `--fixture` / `CATALOG_FIXTURE` points at a JSON export.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::CatalogSource;

#[derive(Parser)]
#[command(name = "comforty")]
#[command(author, version, about = "Comforty storefront tools")]
struct Cli {
    /// Read the catalog from a JSON file of raw documents instead of Sanity
    #[arg(long, global = true, env = "CATALOG_FIXTURE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Price a cart: subtotal, discount and total
    Quote {
        /// Absolute discount amount
        #[arg(short, long, default_value = "0")]
        discount: String,

        /// Line items as `<product-id>[:<quantity>]`
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,

        /// Only products carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// List categories
    Categories,
    /// Report documents that fail ingestion
    Validate,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comforty=info,comforty_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let source = CatalogSource::resolve(cli.fixture)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Products { search, tag } => {
                commands::catalog::products(&source, search, tag).await?;
            }
            CatalogAction::Categories => commands::catalog::categories(&source).await?,
            CatalogAction::Validate => commands::catalog::validate(&source).await?,
        },
        Commands::Quote { discount, items } => {
            commands::quote::quote(&source, &discount, &items).await?;
        }
    }
    Ok(())
}
