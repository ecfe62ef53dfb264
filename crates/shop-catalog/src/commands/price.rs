//! Price commands

use crate::Shop;
use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use rust_decimal::Decimal;
use shop_core::{NewProductPrice, RecordId};

pub struct AddPrice {
    pub slug: String,
    pub currency: String,
    pub amount: Decimal,
    pub sale: bool,
    pub tax_class: Option<RecordId>,
    pub excluding_tax: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

pub async fn list(shop: &Shop, slug: &str) -> Result<()> {
    let product = shop.catalog.product_by_slug(slug).await?;
    let now = Utc::now();

    for price in shop.catalog.price_history(product.id).await? {
        let line = format!(
            "  #{:<5} {:<20} from {} until {}",
            price.id,
            price.to_string(),
            price.valid_from.format("%Y-%m-%d %H:%M"),
            price
                .valid_until
                .map(|u| u.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
        if price.is_active_at(now) {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }

    Ok(())
}

pub async fn add(shop: &Shop, options: AddPrice) -> Result<()> {
    let product = shop.catalog.product_by_slug(&options.slug).await?;

    let mut price = NewProductPrice::new(product.id, options.currency, options.amount);
    if options.sale {
        price = price.sale();
    }
    if let Some(tax_class) = options.tax_class {
        price = price.tax_class(tax_class);
    }
    if options.excluding_tax {
        price = price.excluding_tax();
    }
    if let Some(from) = options.valid_from {
        price = price.valid_from(from);
    }
    if let Some(until) = options.valid_until {
        price = price.valid_until(until);
    }

    let price = shop.catalog.add_price(price).await?;
    println!(
        "{} Added price {} to {} (#{})",
        "✓".green(),
        price,
        product.name,
        price.id
    );
    Ok(())
}

pub async fn get(shop: &Shop, slug: &str, currency: Option<&str>) -> Result<()> {
    let product = shop.catalog.product_by_slug(slug).await?;
    let price = shop.catalog.get_price(product.id, currency).await?;
    let unit_price = shop.catalog.unit_price(product.id, currency).await?;

    let label = if price.is_sale {
        "sale".green()
    } else {
        "normal".normal()
    };
    println!("{} {} ({})", price.currency, unit_price, label);
    Ok(())
}

pub async fn delete(shop: &Shop, id: RecordId) -> Result<()> {
    let price = shop.catalog.delete_price(id).await?;
    println!("{} Deleted price #{} ({})", "✓".green(), price.id, price);
    Ok(())
}
