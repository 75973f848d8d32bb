pub mod eac;
pub mod individual;

use anyhow::Error;

use crate::error::CalculationError;
use crate::CalcConfig;

/// Rejects transactions for any security other than the single supported
/// symbol before they reach the calculator.
fn check_symbol(symbol: &Option<String>, config: &CalcConfig) -> Result<(), Error> {
    match symbol {
        Some(s) if *s != config.supported_symbol => Err(CalculationError::UnsupportedSymbol {
            symbol: s.clone(),
            supported: config.supported_symbol.clone(),
        }
        .into()),
        _ => Ok(()),
    }
}
