//! Price types

use crate::{RecordId, TaxClass};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields shared by every price record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub currency: String,
    pub amount: Decimal,
    /// Whether `amount` already contains tax
    pub tax_included: bool,
    pub tax_class_id: Option<RecordId>,
    pub is_active: bool,
    pub is_sale: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl Price {
    pub fn new(currency: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency: currency.into(),
            amount,
            tax_included: true,
            tax_class_id: None,
            is_active: true,
            is_sale: false,
            valid_from: Utc::now(),
            valid_until: None,
        }
    }

    /// True when the record is enabled and `at` lies inside its validity window
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active
            && self.valid_from <= at
            && self.valid_until.map(|until| until >= at).unwrap_or(true)
    }

    pub fn unit_price_incl_tax(&self, tax: Option<&TaxClass>) -> Decimal {
        if self.tax_included {
            return self.amount;
        }
        self.amount * tax_factor(tax)
    }

    pub fn unit_price_excl_tax(&self, tax: Option<&TaxClass>) -> Decimal {
        if !self.tax_included {
            return self.amount;
        }
        self.amount / tax_factor(tax)
    }

    /// Unit price as presented to customers
    pub fn unit_price(&self, tax: Option<&TaxClass>, includes_tax: bool) -> Decimal {
        if includes_tax {
            self.unit_price_incl_tax(tax)
        } else {
            self.unit_price_excl_tax(tax)
        }
    }
}

fn tax_factor(tax: Option<&TaxClass>) -> Decimal {
    let rate = tax.map(|t| t.rate).unwrap_or(Decimal::ZERO);
    Decimal::ONE + rate / Decimal::ONE_HUNDRED
}

/// A price attached to exactly one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: RecordId,
    pub product_id: RecordId,
    #[serde(flatten)]
    pub price: Price,
}

impl std::ops::Deref for ProductPrice {
    type Target = Price;

    fn deref(&self) -> &Price {
        &self.price
    }
}

impl std::ops::DerefMut for ProductPrice {
    fn deref_mut(&mut self) -> &mut Price {
        &mut self.price
    }
}

impl std::fmt::Display for ProductPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.price.currency, self.price.amount)?;
        if self.price.is_sale {
            write!(f, " (sale)")?;
        }
        Ok(())
    }
}

/// Price creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductPrice {
    pub product_id: RecordId,
    #[serde(flatten)]
    pub price: Price,
}

impl NewProductPrice {
    pub fn new(product_id: RecordId, currency: impl Into<String>, amount: Decimal) -> Self {
        Self {
            product_id,
            price: Price::new(currency, amount),
        }
    }

    pub fn sale(mut self) -> Self {
        self.price.is_sale = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.price.is_active = false;
        self
    }

    pub fn valid_from(mut self, from: DateTime<Utc>) -> Self {
        self.price.valid_from = from;
        self
    }

    pub fn valid_until(mut self, until: DateTime<Utc>) -> Self {
        self.price.valid_until = Some(until);
        self
    }

    pub fn tax_class(mut self, tax_class_id: RecordId) -> Self {
        self.price.tax_class_id = Some(tax_class_id);
        self
    }

    pub fn excluding_tax(mut self) -> Self {
        self.price.tax_included = false;
        self
    }

    pub fn into_price(self, id: RecordId) -> ProductPrice {
        ProductPrice {
            id,
            product_id: self.product_id,
            price: self.price,
        }
    }
}
