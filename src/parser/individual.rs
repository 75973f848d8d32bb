use anyhow::{anyhow, Error};
use serde::Deserialize;

use crate::models::{
    parse_quantity_str, parse_symbol_str, parse_transaction_dates, parse_usd_str,
    IndividualAction, IndividualTransaction,
};
use crate::CalcConfig;

#[derive(Debug, Deserialize)]
struct IndividualExport {
    #[serde(rename = "Transactions")]
    transactions: Vec<IndividualRow>,
}

#[derive(Debug, Deserialize)]
struct IndividualRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "Symbol", default)]
    symbol: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Quantity", default)]
    quantity: String,
    #[serde(rename = "Price", default)]
    price: String,
    #[serde(rename = "FeesAndCommissions", alias = "Fees & Comm", default)]
    fees: String,
    #[serde(rename = "Amount", default)]
    amount: String,
}

pub fn parse_individual_history(
    input: &str,
    config: &CalcConfig,
) -> Result<Vec<IndividualTransaction>, Error> {
    let export: IndividualExport = serde_json::from_str(input)?;

    let mut history: Vec<IndividualTransaction> = Vec::new();
    for row in export.transactions {
        let (date, as_of_date) = parse_transaction_dates(&row.date).map_err(|e| anyhow!(e))?;
        let action = IndividualAction::from_broker_str(&row.action)
            .ok_or_else(|| anyhow!("Unknown transaction action: {}", row.action))?;

        let transaction = IndividualTransaction {
            date,
            as_of_date,
            action,
            symbol: parse_symbol_str(&row.symbol),
            description: row.description.clone(),
            quantity: parse_quantity_str(&row.quantity).map_err(|e| anyhow!(e))?,
            price_usd: parse_usd_str(&row.price).map_err(|e| anyhow!(e))?,
            fees_usd: parse_usd_str(&row.fees).map_err(|e| anyhow!(e))?,
            amount_usd: parse_usd_str(&row.amount).map_err(|e| anyhow!(e))?,
        };
        super::check_symbol(&transaction.symbol, config)?;
        history.push(transaction);
    }

    Ok(history)
}
