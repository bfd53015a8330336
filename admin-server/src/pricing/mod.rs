//! Order pricing
//!
//! Pure money calculation over in-memory snapshots. All arithmetic is done
//! in `Decimal`, converted to `f64` only at the storage boundary.

use std::collections::HashMap;

use rust_decimal::prelude::*;
use shared::models::{Customer, CustomerType, OrderLineInput, Product};
use thiserror::Error;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Flat order-level GST rate (18%).
///
/// Deliberately order-level: per-product `gst` percentages are stored in the
/// catalog but not consulted here, matching the established order math.
const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Pricing failure; any unresolvable product aborts the whole calculation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Product {0} not found")]
    ProductNotFound(i64),
}

/// One priced order line
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Calculator output: priced lines plus order totals
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub total_amount: f64,
    pub gst_amount: f64,
    pub net_amount: f64,
}

/// Convert f64 to Decimal for calculation
///
/// Catalog prices are validated finite at the API boundary. If NaN/Infinity
/// somehow reaches here, logs an error and returns ZERO to avoid silent
/// corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Resolve the unit price tier for an order.
///
/// Dealers buy at `dealer_price`; any other tier, or no customer at all,
/// pays `end_user_price`. Resolved once per order.
fn unit_price_for(product: &Product, customer: Option<&Customer>) -> f64 {
    match customer.map(|c| c.customer_type) {
        Some(CustomerType::Dealer) => product.dealer_price,
        _ => product.end_user_price,
    }
}

/// Price an order from its requested lines and catalog snapshot.
///
/// - `total_amount` = Σ(unit_price × quantity)
/// - `gst_amount` = total_amount × 18%
/// - `net_amount` = total_amount + gst_amount
///
/// Fails fast: a missing product id aborts the whole calculation with no
/// partial output.
pub fn price_order(
    lines: &[OrderLineInput],
    customer: Option<&Customer>,
    products: &HashMap<i64, Product>,
) -> Result<PricedOrder, PricingError> {
    let mut items = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;

    for line in lines {
        let product = products
            .get(&line.product_id)
            .ok_or(PricingError::ProductNotFound(line.product_id))?;

        let unit_price = to_decimal(unit_price_for(product, customer));
        let total_price = unit_price * Decimal::from(line.quantity);
        subtotal += total_price;

        items.push(PricedItem {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: to_f64(unit_price),
            total_price: to_f64(total_price),
        });
    }

    let gst = (subtotal * GST_RATE)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let net = subtotal + gst;

    Ok(PricedOrder {
        items,
        total_amount: to_f64(subtotal),
        gst_amount: to_f64(gst),
        net_amount: to_f64(net),
    })
}
