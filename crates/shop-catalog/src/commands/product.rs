//! Product commands

use crate::Shop;
use anyhow::Result;
use colored::Colorize;
use shop_core::NewProduct;

pub async fn list(shop: &Shop, all: bool) -> Result<()> {
    let products = shop.catalog.products(!all).await?;

    if products.is_empty() {
        println!("{}", "No products".dimmed());
        return Ok(());
    }

    for product in products {
        let price = match shop.catalog.get_price(product.id, None).await {
            Ok(price) => price.to_string(),
            Err(e) if e.is_not_found() => "-".to_string(),
            Err(e) => return Err(e.into()),
        };
        let name = if product.is_active {
            product.name.normal()
        } else {
            product.name.dimmed()
        };
        println!("  {:<24} {:<32} {}", product.slug.cyan(), name, price);
    }

    Ok(())
}

pub async fn add(
    shop: &Shop,
    name: &str,
    slug: &str,
    ordering: u32,
    description: Option<String>,
    inactive: bool,
) -> Result<()> {
    let mut product = NewProduct::new(name, slug).ordering(ordering);
    if let Some(description) = description {
        product = product.description(description);
    }
    if inactive {
        product = product.inactive();
    }

    let product = shop.catalog.create_product(product).await?;
    println!("{} Created product {} ({})", "✓".green(), product.name, product.id);
    Ok(())
}

pub async fn show(shop: &Shop, slug: &str) -> Result<()> {
    let product = shop.catalog.product_by_slug(slug).await?;

    println!("{} {}", product.name.bold(), format!("({})", product.slug).dimmed());
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    println!(
        "  active: {}, ordering: {}",
        product.is_active, product.ordering
    );

    let prices = shop.catalog.get_prices(product.id).await?;
    for entry in &prices.entries {
        let normal = entry
            .prices
            .normal
            .as_ref()
            .map(|p| p.amount.to_string())
            .unwrap_or_else(|| "-".to_string());
        match entry.prices.sale {
            Some(ref sale) => println!(
                "  {} {} {}",
                entry.currency.cyan(),
                normal.strikethrough(),
                sale.amount.to_string().green()
            ),
            None => println!("  {} {}", entry.currency.cyan(), normal),
        }
    }

    Ok(())
}

pub async fn delete(shop: &Shop, slug: &str) -> Result<()> {
    let product = shop.catalog.product_by_slug(slug).await?;
    shop.catalog.delete_product(product.id).await?;
    println!("{} Deleted product {}", "✓".green(), product.name);
    Ok(())
}
