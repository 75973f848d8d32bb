use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Error};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CalculationError;

/// Longest gap tolerated when falling back from a non-trading day to the
/// nearest prior reference rate.
const MAX_FALLBACK_DAYS: i64 = 7;

/// Historical USD/EUR conversion as seen by the calculator. Implementations
/// are synchronous and side-effect-free; rate loading happens before the
/// calculation runs.
pub trait CurrencyConverter {
    fn usd_to_eur(&self, amount: Decimal, date: NaiveDate) -> Result<Decimal, CalculationError>;
}

/// Daily ECB reference rates (USD per EUR) loaded from a prefetched
/// `eurofxref-hist.csv` export.
pub struct EcbRates {
    rates: BTreeMap<NaiveDate, Decimal>,
}

#[derive(Debug, Deserialize)]
struct EcbRateRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "USD")]
    usd: String,
}

impl EcbRates {
    pub fn from_csv_path(path: &Path) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Error reading rate file {:?}", path))?;

        let mut rates = BTreeMap::new();
        for record in rdr.deserialize::<EcbRateRecord>() {
            let record = record.with_context(|| format!("Malformed rate row in {:?}", path))?;
            // Holidays appear as N/A in the historical export.
            if record.usd.trim().is_empty() || record.usd.trim() == "N/A" {
                continue;
            }
            let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
                .map_err(|e| anyhow!("Invalid rate date {}: {}", record.date, e))?;
            let rate = Decimal::from_str_exact(record.usd.trim())
                .map_err(|e| anyhow!("Invalid USD rate {}: {}", record.usd, e))?;
            rates.insert(date, rate);
        }

        if rates.is_empty() {
            return Err(anyhow!("Rate file {:?} contains no usable USD rates", path));
        }

        Ok(Self { rates })
    }

    pub fn from_rates(rates: BTreeMap<NaiveDate, Decimal>) -> Self {
        Self { rates }
    }

    /// USD-per-EUR rate for the given date, falling back to the nearest prior
    /// trading day within `MAX_FALLBACK_DAYS`.
    fn rate_for(&self, date: NaiveDate) -> Result<Decimal, CalculationError> {
        match self.rates.range(..=date).next_back() {
            Some((found, rate)) if (date - *found).num_days() <= MAX_FALLBACK_DAYS => Ok(*rate),
            _ => Err(CalculationError::CurrencyConversion { date }),
        }
    }
}

impl CurrencyConverter for EcbRates {
    fn usd_to_eur(&self, amount: Decimal, date: NaiveDate) -> Result<Decimal, CalculationError> {
        Ok(amount / self.rate_for(date)?)
    }
}

/// Converts at one fixed USD-per-EUR rate for every date. A rate of 1 gives
/// identity conversion, which the calculation tests rely on.
pub struct FixedRate(pub Decimal);

impl CurrencyConverter for FixedRate {
    fn usd_to_eur(&self, amount: Decimal, _date: NaiveDate) -> Result<Decimal, CalculationError> {
        Ok(amount / self.0)
    }
}
