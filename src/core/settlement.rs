//! Settlement arithmetic.
//!
//! The amount payable for a delivery is weight times dry-rubber fraction times unit
//! price, summed over the two feedstock streams:
//!
//! `total = liquid_weight * tsc * liquid_price + coagulum_weight * drc * coagulum_price`
//!
//! Stored quantities have two fractional digits. Inputs are quantized to that scale
//! when they enter the ledger; the products and sum are exact decimal arithmetic and
//! only the final total is rounded, half away from zero.

use crate::{
    entities::transaction,
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits of every stored weight, fraction, price and total.
pub const SCALE: u32 = 2;

/// Rounds a value to the stored scale, half away from zero.
#[must_use]
pub fn quantize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates a weight, fraction or price that must be strictly positive once stored.
///
/// Returns the quantized value.
pub fn positive(field: &'static str, value: Decimal) -> Result<Decimal> {
    let stored = quantize(value);
    if stored <= Decimal::ZERO {
        return Err(Error::InvalidQuantity {
            field,
            value: value.to_string(),
            requirement: "must be greater than zero",
        });
    }
    Ok(stored)
}

/// Validates a quantity that may be zero but not negative. Returns the quantized value.
pub fn non_negative(field: &'static str, value: Decimal) -> Result<Decimal> {
    let stored = quantize(value);
    if stored < Decimal::ZERO {
        return Err(Error::InvalidQuantity {
            field,
            value: value.to_string(),
            requirement: "must not be negative",
        });
    }
    Ok(stored)
}

fn stream_amount(weight: Decimal, fraction: Decimal, price: Decimal) -> Option<Decimal> {
    weight.checked_mul(fraction)?.checked_mul(price)
}

/// Computes the rounded settlement total from the two feedstock streams.
///
/// # Errors
/// Returns `InvalidQuantity` if the product overflows the decimal range.
pub fn settlement_total(
    liquid_weight: Decimal,
    tsc: Decimal,
    liquid_price: Decimal,
    coagulum_weight: Decimal,
    drc: Decimal,
    coagulum_price: Decimal,
) -> Result<Decimal> {
    let exact = stream_amount(liquid_weight, tsc, liquid_price)
        .zip(stream_amount(coagulum_weight, drc, coagulum_price))
        .and_then(|(liquid, coagulum)| liquid.checked_add(coagulum))
        .ok_or_else(|| Error::InvalidQuantity {
            field: "total",
            value: "overflow".to_string(),
            requirement: "must fit the decimal range",
        })?;
    Ok(quantize(exact))
}

/// Recomputes the total of a transaction from its own captured fields and price snapshot.
pub fn transaction_total(model: &transaction::Model) -> Result<Decimal> {
    settlement_total(
        model.liquid_weight,
        model.tsc,
        model.liquid_price,
        model.coagulum_weight,
        model.drc,
        model.coagulum_price,
    )
}
