use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of a calculation run. All of these are fatal: a partial tax
/// report risks silent under-reporting, so no degraded result is ever
/// returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Unsupported symbol \"{symbol}\". Only {supported} transactions are supported.")]
    UnsupportedSymbol { symbol: String, supported: String },

    #[error(
        "Couldn't match the purchase of {quantity} shares on {purchase_date} to any vest record"
    )]
    LotReconciliation {
        purchase_date: NaiveDate,
        quantity: Decimal,
    },

    #[error(
        "Couldn't match sell to a lot: {requested} shares disposed on {sale_date}, {available} remaining in all lots"
    )]
    InsufficientLotInventory {
        sale_date: NaiveDate,
        requested: Decimal,
        available: Decimal,
    },

    #[error("No USD/EUR reference rate resolvable for {date}")]
    CurrencyConversion { date: NaiveDate },
}
