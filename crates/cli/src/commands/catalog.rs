//! Catalog inspection commands.

use std::io::Write;

use comforty_storefront::catalog::ProductFilter;
use comforty_storefront::sanity::conversions::catalog_from_values;

use super::{CatalogSource, CliError};

/// List products matching the filter.
pub async fn products(
    source: &CatalogSource,
    search: Option<String>,
    tag: Option<String>,
) -> Result<(), CliError> {
    let catalog = source.catalog().await?;
    let products = catalog.search(&ProductFilter { search, tag }).await?;

    let mut out = std::io::stdout().lock();
    for product in &products {
        let tags = if product.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", product.tags.join(", "))
        };
        writeln!(
            out,
            "{:<24} {:<32} {:>10} {:>5} in stock{tags}",
            product.id.as_str(),
            product.title,
            product.price.to_string(),
            product.inventory
        )?;
    }
    tracing::info!("{} product(s)", products.len());
    Ok(())
}

/// List categories.
pub async fn categories(source: &CatalogSource) -> Result<(), CliError> {
    let catalog = source.catalog().await?;
    let categories = catalog.categories().await?;

    let mut out = std::io::stdout().lock();
    for category in categories.iter() {
        writeln!(
            out,
            "{:<24} {:<32} {:>4} product(s)",
            category.id.as_str(),
            category.title,
            category.product_count
        )?;
    }
    Ok(())
}

/// Ingest the raw documents and report every rejection.
///
/// Fails when at least one document is rejected.
pub async fn validate(source: &CatalogSource) -> Result<(), CliError> {
    let documents = source.raw_documents().await?;
    let (products, categories) = catalog_from_values(documents);

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "products:   {} accepted, {} rejected",
        products.records.len(),
        products.rejected.len()
    )?;
    writeln!(
        out,
        "categories: {} accepted, {} rejected",
        categories.records.len(),
        categories.rejected.len()
    )?;
    for rejected in products.rejected.iter().chain(&categories.rejected) {
        writeln!(
            out,
            "  {}: {}",
            rejected.id.as_deref().unwrap_or("<no id>"),
            rejected.error
        )?;
    }

    let total = products.rejected.len() + categories.rejected.len();
    if total > 0 {
        return Err(CliError::Rejected(total));
    }
    Ok(())
}
