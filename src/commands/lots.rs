use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Error};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculator::{build_lots, filter_stock_transactions};
use crate::parser::{eac::parse_eac_history, individual::parse_individual_history};
use crate::CalcConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LotRow {
    symbol: String,
    quantity: Decimal,
    purchase_date: NaiveDate,
    #[serde(rename = "PurchasePriceUSD")]
    purchase_price_usd: Decimal,
}

/// Prints the reconstructed acquisition-lot ledger as CSV on stdout.
pub fn lots(individual: &PathBuf, eac: &PathBuf, config: &CalcConfig) -> Result<(), Error> {
    let individual_input = fs::read_to_string(individual)
        .with_context(|| format!("Error reading file {:?}", individual))?;
    let eac_input =
        fs::read_to_string(eac).with_context(|| format!("Error reading file {:?}", eac))?;

    let individual_history = parse_individual_history(&individual_input, config)?;
    let eac_history = parse_eac_history(&eac_input, config)?;

    let stock_transactions = filter_stock_transactions(&individual_history);
    let lots = build_lots(&stock_transactions, &eac_history, config)?;

    let mut wtr = csv::Writer::from_writer(io::stdout());
    for lot in lots {
        wtr.serialize(LotRow {
            symbol: lot.symbol,
            quantity: lot.quantity,
            purchase_date: lot.purchase_date,
            purchase_price_usd: lot.purchase_price_usd,
        })?;
    }
    wtr.flush()?;

    Ok(())
}
