//! Shop CLI
//!
//! Manage the product catalogue and look up prices from the command line.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use shop_catalog::commands::{self, price::AddPrice};
use shop_catalog::Shop;
use shop_core::{CategoryFilter, RecordId, ShopSettings};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shop catalogue - products, categories and prices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to config/shop.toml when present)
    #[arg(short, long, global = true, env = "SHOP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage product prices
    Price {
        #[command(subcommand)]
        action: PriceAction,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage tax classes
    Tax {
        #[command(subcommand)]
        action: TaxAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products with their current price
    List {
        /// Include inactive products
        #[arg(short, long)]
        all: bool,
    },
    /// Add a new product
    Add {
        name: String,
        slug: String,
        #[arg(short, long, default_value_t = 0)]
        ordering: u32,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        inactive: bool,
    },
    /// Show a product and its price sets
    Show { slug: String },
    /// Delete a product and its prices
    Delete { slug: String },
}

#[derive(Subcommand)]
enum PriceAction {
    /// List every price record of a product
    List { slug: String },
    /// Add a price to a product
    Add {
        slug: String,
        currency: String,
        amount: Decimal,
        /// Mark as sale price
        #[arg(long)]
        sale: bool,
        /// Tax class id
        #[arg(long)]
        tax_class: Option<RecordId>,
        /// The amount does not contain tax
        #[arg(long)]
        excluding_tax: bool,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        valid_from: Option<DateTime<Utc>>,
        /// RFC 3339 timestamp
        #[arg(long)]
        valid_until: Option<DateTime<Utc>>,
    },
    /// Show the applicable price of a product
    Get {
        slug: String,
        /// Defaults to the shop's default currency
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Delete a price record
    Delete { id: RecordId },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List {
        #[arg(short, long, value_enum, default_value_t = Visibility::All)]
        filter: Visibility,
    },
    /// Add a new category
    Add {
        name: String,
        slug: String,
        /// Slug of a top level parent category
        #[arg(short, long)]
        parent: Option<String>,
        /// Hide from the storefront
        #[arg(long)]
        internal: bool,
        #[arg(short, long, default_value_t = 0)]
        ordering: u32,
    },
    /// Put a product into a category
    Assign { product: String, category: String },
    /// Delete a category and its children
    Delete { slug: String },
}

#[derive(Subcommand)]
enum TaxAction {
    /// List tax classes
    List,
    /// Add a tax class
    Add {
        name: String,
        /// Rate in percent
        rate: Decimal,
        #[arg(short, long, default_value_t = 0)]
        priority: i32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Visibility {
    All,
    Active,
    Public,
}

impl From<Visibility> for CategoryFilter {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::All => CategoryFilter::All,
            Visibility::Active => CategoryFilter::Active,
            Visibility::Public => CategoryFilter::Public,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "shop_catalog=debug,shop_core=debug"
    } else {
        "shop_catalog=warn"
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = run(cli).await;

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    let settings =
        ShopSettings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!("Using database at {}", settings.database.path);

    let shop = Shop::open(settings).await?;

    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::List { all } => commands::product::list(&shop, all).await,
            ProductAction::Add {
                name,
                slug,
                ordering,
                description,
                inactive,
            } => commands::product::add(&shop, &name, &slug, ordering, description, inactive).await,
            ProductAction::Show { slug } => commands::product::show(&shop, &slug).await,
            ProductAction::Delete { slug } => commands::product::delete(&shop, &slug).await,
        },
        Commands::Price { action } => match action {
            PriceAction::List { slug } => commands::price::list(&shop, &slug).await,
            PriceAction::Add {
                slug,
                currency,
                amount,
                sale,
                tax_class,
                excluding_tax,
                valid_from,
                valid_until,
            } => {
                commands::price::add(
                    &shop,
                    AddPrice {
                        slug,
                        currency,
                        amount,
                        sale,
                        tax_class,
                        excluding_tax,
                        valid_from,
                        valid_until,
                    },
                )
                .await
            }
            PriceAction::Get { slug, currency } => {
                commands::price::get(&shop, &slug, currency.as_deref()).await
            }
            PriceAction::Delete { id } => commands::price::delete(&shop, id).await,
        },
        Commands::Category { action } => match action {
            CategoryAction::List { filter } => {
                commands::category::list(&shop, filter.into()).await
            }
            CategoryAction::Add {
                name,
                slug,
                parent,
                internal,
                ordering,
            } => {
                commands::category::add(&shop, &name, &slug, parent.as_deref(), internal, ordering)
                    .await
            }
            CategoryAction::Assign { product, category } => {
                commands::category::assign(&shop, &product, &category).await
            }
            CategoryAction::Delete { slug } => commands::category::delete(&shop, &slug).await,
        },
        Commands::Tax { action } => match action {
            TaxAction::List => commands::tax::list(&shop).await,
            TaxAction::Add {
                name,
                rate,
                priority,
            } => commands::tax::add(&shop, &name, rate, priority).await,
        },
    }
}
