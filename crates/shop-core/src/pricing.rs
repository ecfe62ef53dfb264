//! Price set computation and resolution
//!
//! For every configured currency the most recent active record wins. When
//! that record is a sale, the most recent active non-sale record becomes the
//! normal price next to it.

use crate::error::{Result, ShopError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_types::{ProductPrice, RecordId};

/// Normal and sale price of one currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSet {
    pub normal: Option<ProductPrice>,
    pub sale: Option<ProductPrice>,
}

impl PriceSet {
    /// Pick the latest active record for `currency` out of `history`
    ///
    /// Recency is the record id; the order of `history` does not matter.
    pub fn from_history(
        history: &[ProductPrice],
        currency: &str,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        let mut candidates: Vec<&ProductPrice> = history
            .iter()
            .filter(|p| p.currency == currency && p.is_active_at(at))
            .collect();
        candidates.sort_by(|a, b| b.id.cmp(&a.id));

        let latest = *candidates.first()?;
        if !latest.is_sale {
            return Some(Self {
                normal: Some(latest.clone()),
                sale: None,
            });
        }

        let normal = candidates.iter().find(|p| !p.is_sale).map(|p| (*p).clone());
        Some(Self {
            normal,
            sale: Some(latest.clone()),
        })
    }

    /// Sale price first, then the normal price
    pub fn effective(&self) -> Option<&ProductPrice> {
        self.sale.as_ref().or(self.normal.as_ref())
    }

    pub fn is_on_sale(&self) -> bool {
        self.sale.is_some()
    }
}

/// Price set of a single currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPrices {
    pub currency: String,
    #[serde(flatten)]
    pub prices: PriceSet,
}

/// All price sets of a product, in configured currency order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrices {
    pub product_id: RecordId,
    pub entries: Vec<CurrencyPrices>,
}

impl ProductPrices {
    /// Build price sets for `currencies`; currencies without an active price are left out
    pub fn compute(
        product_id: RecordId,
        history: &[ProductPrice],
        currencies: &[String],
        at: DateTime<Utc>,
    ) -> Self {
        let entries = currencies
            .iter()
            .filter_map(|currency| {
                PriceSet::from_history(history, currency, at).map(|prices| CurrencyPrices {
                    currency: currency.clone(),
                    prices,
                })
            })
            .collect();

        Self {
            product_id,
            entries,
        }
    }

    pub fn get(&self, currency: &str) -> Option<&PriceSet> {
        self.entries
            .iter()
            .find(|e| e.currency == currency)
            .map(|e| &e.prices)
    }

    /// The price that applies in `currency`
    pub fn resolve(&self, currency: &str) -> Result<&ProductPrice> {
        self.get(currency)
            .and_then(PriceSet::effective)
            .ok_or_else(|| ShopError::PriceNotFound {
                product_id: self.product_id,
                currency: currency.to_string(),
            })
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.currency.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use shop_types::NewProductPrice;

    fn currencies() -> Vec<String> {
        vec!["CHF".to_string(), "EUR".to_string()]
    }

    fn price(currency: &str, cents: i64) -> NewProductPrice {
        NewProductPrice::new(1, currency, Decimal::new(cents, 2))
            .valid_from(Utc::now() - Duration::days(1))
    }

    #[test]
    fn test_sale_preferred_over_normal() {
        let history = vec![
            price("CHF", 2000).into_price(1),
            price("CHF", 1500).sale().into_price(2),
        ];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());

        let set = prices.get("CHF").unwrap();
        assert_eq!(set.normal.as_ref().unwrap().id, 1);
        assert_eq!(set.sale.as_ref().unwrap().id, 2);
        assert_eq!(prices.resolve("CHF").unwrap().amount, Decimal::new(1500, 2));
    }

    #[test]
    fn test_normal_price_without_sale() {
        let history = vec![price("EUR", 1800).into_price(1)];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());

        let set = prices.get("EUR").unwrap();
        assert!(!set.is_on_sale());
        assert_eq!(prices.resolve("EUR").unwrap().id, 1);
    }

    #[test]
    fn test_newer_normal_price_hides_older_sale() {
        let history = vec![
            price("CHF", 1500).sale().into_price(1),
            price("CHF", 2000).into_price(2),
        ];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());

        let set = prices.get("CHF").unwrap();
        assert_eq!(set.sale, None);
        assert_eq!(prices.resolve("CHF").unwrap().id, 2);
    }

    #[test]
    fn test_sale_only_falls_back_to_sale() {
        let history = vec![price("CHF", 900).sale().into_price(4)];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());

        let set = prices.get("CHF").unwrap();
        assert_eq!(set.normal, None);
        assert_eq!(prices.resolve("CHF").unwrap().id, 4);
    }

    #[test]
    fn test_missing_currency_is_not_found() {
        let history = vec![price("CHF", 1000).into_price(1)];
        let prices = ProductPrices::compute(7, &history, &currencies(), Utc::now());

        let err = prices.resolve("EUR").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            ShopError::PriceNotFound { product_id: 7, ref currency } if currency == "EUR"
        ));
        assert_eq!(prices.currencies().collect::<Vec<_>>(), vec!["CHF"]);
    }

    #[test]
    fn test_inactive_and_expired_prices_are_skipped() {
        let now = Utc::now();
        let history = vec![
            price("CHF", 1000).into_price(1),
            price("CHF", 500).sale().inactive().into_price(2),
            price("CHF", 700)
                .valid_until(now - Duration::hours(1))
                .into_price(3),
            price("CHF", 600)
                .valid_from(now + Duration::days(1))
                .into_price(4),
        ];
        let prices = ProductPrices::compute(1, &history, &currencies(), now);

        assert_eq!(prices.resolve("CHF").unwrap().id, 1);
    }

    #[test]
    fn test_unconfigured_currency_is_ignored() {
        let history = vec![price("USD", 1000).into_price(1)];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());
        assert!(prices.is_empty());
    }

    #[test]
    fn test_cached_form_round_trips() {
        let history = vec![
            price("CHF", 2000).into_price(1),
            price("CHF", 1500).sale().into_price(2),
        ];
        let prices = ProductPrices::compute(1, &history, &currencies(), Utc::now());

        let bytes = serde_json::to_vec(&prices).unwrap();
        let back: ProductPrices = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, prices);
    }
}
