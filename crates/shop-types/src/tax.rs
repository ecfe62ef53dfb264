//! Tax types

use crate::RecordId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax classification referenced by prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClass {
    pub id: RecordId,
    pub name: String,
    /// Percentage, e.g. `7.7` for 7.7%
    pub rate: Decimal,
    pub priority: i32,
}

impl std::fmt::Display for TaxClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}%)", self.name, self.rate)
    }
}

/// Tax class creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaxClass {
    pub name: String,
    pub rate: Decimal,
    pub priority: i32,
}

impl NewTaxClass {
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
            priority: 0,
        }
    }

    pub fn into_tax_class(self, id: RecordId) -> TaxClass {
        TaxClass {
            id,
            name: self.name,
            rate: self.rate,
            priority: self.priority,
        }
    }
}
