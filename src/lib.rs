//! UK PAYE take-home pay calculation.
//!
//! [`engine::calculate`] turns a [`engine::CalculationInput`] into a
//! [`engine::TaxResult`]; the component calculators it uses are public too.

pub mod engine;
