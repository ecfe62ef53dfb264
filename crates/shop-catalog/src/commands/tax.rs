//! Tax class commands

use crate::Shop;
use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use shop_core::NewTaxClass;

pub async fn list(shop: &Shop) -> Result<()> {
    for tax_class in shop.catalog.tax_classes().await? {
        println!(
            "  #{:<5} {} {}",
            tax_class.id,
            tax_class,
            format!("priority {}", tax_class.priority).dimmed()
        );
    }
    Ok(())
}

pub async fn add(shop: &Shop, name: &str, rate: Decimal, priority: i32) -> Result<()> {
    let mut tax_class = NewTaxClass::new(name, rate);
    tax_class.priority = priority;

    let tax_class = shop.catalog.create_tax_class(tax_class).await?;
    println!("{} Created tax class {} (#{})", "✓".green(), tax_class, tax_class.id);
    Ok(())
}
