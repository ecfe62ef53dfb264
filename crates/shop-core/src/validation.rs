//! Field validation and category nesting rules

use crate::error::{Result, ShopError};
use crate::ShopSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use shop_types::{Category, NewCategory, NewProduct, NewProductPrice, NewTaxClass, RecordId};

pub const NAME_MAX_LENGTH: usize = 100;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));
static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

pub fn validate_slug(slug: &str) -> Result<()> {
    if !SLUG_RE.is_match(slug) {
        return Err(ShopError::validation(
            "slug",
            "must consist of letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ShopError::validation("name", "must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ShopError::validation(
            "name",
            format!("must be at most {} characters", NAME_MAX_LENGTH),
        ));
    }
    Ok(())
}

pub fn validate_currency_code(currency: &str) -> Result<()> {
    if !CURRENCY_RE.is_match(currency) {
        return Err(ShopError::validation(
            "currency",
            format!("{} is not a three letter currency code", currency),
        ));
    }
    Ok(())
}

pub fn validate_product(product: &NewProduct) -> Result<()> {
    validate_name(&product.name)?;
    validate_slug(&product.slug)
}

pub fn validate_category(category: &NewCategory) -> Result<()> {
    validate_name(&category.name)?;
    validate_slug(&category.slug)
}

pub fn validate_tax_class(tax_class: &NewTaxClass) -> Result<()> {
    validate_name(&tax_class.name)?;
    if tax_class.rate.is_sign_negative() {
        return Err(ShopError::validation("rate", "must not be negative"));
    }
    Ok(())
}

pub fn validate_price(price: &NewProductPrice, settings: &ShopSettings) -> Result<()> {
    if !settings.is_known_currency(&price.price.currency) {
        return Err(ShopError::UnknownCurrency(price.price.currency.clone()));
    }
    if price.price.amount.is_sign_negative() {
        return Err(ShopError::validation("amount", "must not be negative"));
    }
    if let Some(until) = price.price.valid_until {
        if until < price.price.valid_from {
            return Err(ShopError::validation(
                "valid_until",
                "must not be earlier than valid_from",
            ));
        }
    }
    Ok(())
}

/// Enforce single level nesting for a category about to be saved
///
/// `category_id` is `None` for categories that are not stored yet,
/// `has_children` tells whether other categories already point at it.
pub fn check_parent(
    category_id: Option<RecordId>,
    parent: Option<&Category>,
    has_children: bool,
) -> Result<()> {
    let Some(parent) = parent else {
        return Ok(());
    };

    if category_id == Some(parent.id) {
        return Err(ShopError::InvalidParent(format!(
            "category {} cannot be its own parent",
            parent.slug
        )));
    }
    if !parent.is_top_level() {
        return Err(ShopError::InvalidParent(format!(
            "{} is itself nested and cannot have children",
            parent.slug
        )));
    }
    if has_children {
        return Err(ShopError::InvalidParent(
            "a category with children cannot be nested".to_string(),
        ));
    }
    Ok(())
}
