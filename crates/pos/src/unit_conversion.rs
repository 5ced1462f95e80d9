//! Packaging-chain arithmetic for multi-unit products.
//!
//! A chain runs from the largest unit (e.g. Box) to the smallest (e.g. Piece).
//! Unit `i` declares how many of unit `i + 1` it holds; the last unit declares 0.
//! Results are always recomputed from the top of the chain.

use crate::domain::{requests::unit::UnitInput, response::unit::UnitBreakdown};
use shared::errors::ServiceError;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UnitConversionError {
    #[error("initial_quantity: Initial quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("total_purchase_price: Total purchase price cannot be negative")]
    NegativePurchasePrice,

    #[error("units: At least one unit is required")]
    EmptyChain,

    #[error("units[{0}].sub_units_per_this_unit: Must be greater than zero")]
    ZeroSubUnits(usize),
}

impl From<UnitConversionError> for ServiceError {
    fn from(err: UnitConversionError) -> Self {
        ServiceError::Validation(vec![err.to_string()])
    }
}

pub fn calculate_unit_chain(
    initial_quantity: f64,
    total_purchase_price: f64,
    units: &[UnitInput],
) -> Result<Vec<UnitBreakdown>, UnitConversionError> {
    if !(initial_quantity.is_finite() && initial_quantity > 0.0) {
        return Err(UnitConversionError::NonPositiveQuantity);
    }
    if !(total_purchase_price.is_finite() && total_purchase_price >= 0.0) {
        return Err(UnitConversionError::NegativePurchasePrice);
    }
    if units.is_empty() {
        return Err(UnitConversionError::EmptyChain);
    }

    let last = units.len() - 1;
    let mut breakdown = Vec::with_capacity(units.len());
    let mut total_quantity = initial_quantity;
    let mut cost_per_unit = total_purchase_price / initial_quantity;

    for (index, unit) in units.iter().enumerate() {
        if index > 0 {
            let per_parent = f64::from(units[index - 1].sub_units_per_this_unit);
            total_quantity *= per_parent;
            cost_per_unit /= per_parent;
        }

        if index < last && unit.sub_units_per_this_unit == 0 {
            return Err(UnitConversionError::ZeroSubUnits(index));
        }

        breakdown.push(UnitBreakdown {
            unit_name: unit.unit_name.trim().to_string(),
            total_quantity,
            cost_per_unit,
        });
    }

    Ok(breakdown)
}

/// How many of the last unit one of each unit contains.
pub fn base_conversion_factors(units: &[UnitInput]) -> Vec<f64> {
    let mut factors = vec![1.0; units.len()];

    for index in (0..units.len().saturating_sub(1)).rev() {
        factors[index] = factors[index + 1] * f64::from(units[index].sub_units_per_this_unit);
    }

    factors
}

/// Field-level problems with a chain, as `units[i].field: message` lines.
/// An empty result means the chain can be committed.
pub fn validate_unit_chain(units: &[UnitInput], known_barcodes: &HashSet<String>) -> Vec<String> {
    if units.is_empty() {
        return vec![UnitConversionError::EmptyChain.to_string()];
    }

    let last = units.len() - 1;
    let mut errors = Vec::new();
    let mut seen_names = HashSet::new();
    let mut seen_barcodes = HashSet::new();

    for (index, unit) in units.iter().enumerate() {
        let name = unit.unit_name.trim();
        if name.is_empty() {
            errors.push(format!("units[{index}].unit_name: Unit name is required"));
        } else if !seen_names.insert(name.to_lowercase()) {
            errors.push(format!(
                "units[{index}].unit_name: Unit name '{name}' is used more than once"
            ));
        }

        let barcode = unit.barcode.trim();
        if barcode.is_empty() {
            errors.push(format!("units[{index}].barcode: Barcode is required"));
        } else if !seen_barcodes.insert(barcode.to_string()) {
            errors.push(format!(
                "units[{index}].barcode: Barcode '{barcode}' is used by another unit"
            ));
        } else if known_barcodes.contains(barcode) {
            errors.push(format!(
                "units[{index}].barcode: Barcode '{barcode}' already belongs to a product"
            ));
        }

        if index < last && unit.sub_units_per_this_unit == 0 {
            errors.push(UnitConversionError::ZeroSubUnits(index).to_string());
        }

        if !(unit.selling_price.is_finite() && unit.selling_price > 0.0) {
            errors.push(format!(
                "units[{index}].selling_price: Selling price must be greater than zero"
            ));
        }
    }

    errors
}
