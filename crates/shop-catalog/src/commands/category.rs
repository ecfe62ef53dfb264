//! Category commands

use crate::Shop;
use anyhow::Result;
use colored::Colorize;
use shop_core::{CategoryFilter, NewCategory};

pub async fn list(shop: &Shop, filter: CategoryFilter) -> Result<()> {
    let categories = shop.catalog.categories(filter).await?;

    if categories.is_empty() {
        println!("{}", "No categories".dimmed());
        return Ok(());
    }

    for category in categories {
        let label = shop.catalog.category_label(&category).await?;
        let products = shop.catalog.products_in_category(category.id).await?;
        let marker = if category.is_internal { " (internal)" } else { "" };
        println!(
            "  {:<24} {}{} {}",
            category.slug.cyan(),
            label,
            marker.dimmed(),
            format!("[{} products]", products.len()).dimmed()
        );
    }

    Ok(())
}

pub async fn add(
    shop: &Shop,
    name: &str,
    slug: &str,
    parent: Option<&str>,
    internal: bool,
    ordering: u32,
) -> Result<()> {
    let mut category = NewCategory::new(name, slug).ordering(ordering);
    if let Some(parent) = parent {
        let parent = shop.catalog.category_by_slug(parent).await?;
        category = category.parent(parent.id);
    }
    if internal {
        category = category.internal();
    }

    let category = shop.catalog.create_category(category).await?;
    println!(
        "{} Created category {} ({})",
        "✓".green(),
        shop.catalog.category_label(&category).await?,
        category.id
    );
    Ok(())
}

pub async fn assign(shop: &Shop, product: &str, category: &str) -> Result<()> {
    let product = shop.catalog.product_by_slug(product).await?;
    let category = shop.catalog.category_by_slug(category).await?;
    shop.catalog.assign_category(product.id, category.id).await?;
    println!(
        "{} {} is now in {}",
        "✓".green(),
        product.name,
        category.name
    );
    Ok(())
}

pub async fn delete(shop: &Shop, slug: &str) -> Result<()> {
    let category = shop.catalog.category_by_slug(slug).await?;
    let children = shop.catalog.children(category.id).await?;
    shop.catalog.delete_category(category.id).await?;

    println!("{} Deleted category {}", "✓".green(), category.name);
    for child in children {
        println!("  {} also removed {}", "•".dimmed(), child.name);
    }
    Ok(())
}
