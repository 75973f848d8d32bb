use anyhow::{anyhow, Error};
use serde::Deserialize;

use crate::models::{
    parse_date_str, parse_quantity_str, parse_symbol_str, parse_usd_str, EacAction,
    EacTransaction, LapseDetails,
};
use crate::CalcConfig;

// Schwab Equity Award Center JSON export. Every transaction carries the
// common columns plus zero or more detail rows; only Lapse details feed the
// lot reconstruction.
#[derive(Debug, Deserialize)]
struct EacExport {
    #[serde(rename = "Transactions")]
    transactions: Vec<EacRow>,
}

#[derive(Debug, Deserialize)]
struct EacRow {
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
    #[serde(rename = "FeesAndCommissions", default)]
    fees: String,
    #[serde(rename = "Amount", default)]
    amount: String,
    #[serde(rename = "TransactionDetails", default)]
    transaction_details: Vec<EacDetailRow>,
}

#[derive(Debug, Deserialize)]
struct EacDetailRow {
    #[serde(rename = "Details")]
    details: EacDetailFields,
}

// One struct covers all detail-row shapes; rows of other actions simply leave
// the lapse fields empty.
#[derive(Debug, Default, Deserialize)]
struct EacDetailFields {
    #[serde(rename = "AwardDate", default)]
    award_date: String,
    #[serde(rename = "AwardId", default)]
    award_id: String,
    #[serde(rename = "FairMarketValuePrice", default)]
    fair_market_value_price: String,
    #[serde(rename = "SalePrice", default)]
    sale_price: String,
    #[serde(rename = "SharesSoldWithheldForTaxes", default)]
    shares_sold_withheld_for_taxes: String,
    #[serde(rename = "NetSharesDeposited", default)]
    net_shares_deposited: String,
    #[serde(rename = "Taxes", default)]
    taxes: String,
}

pub fn parse_eac_history(input: &str, config: &CalcConfig) -> Result<Vec<EacTransaction>, Error> {
    let export: EacExport = serde_json::from_str(input)?;

    let mut history: Vec<EacTransaction> = Vec::new();
    for row in export.transactions {
        let date = parse_date_str(&row.date).map_err(|e| anyhow!(e))?;

        let action = match row.action.as_str() {
            "Deposit" => EacAction::Deposit,
            "Sale" => EacAction::Sale,
            "Lapse" => EacAction::Lapse(parse_lapse_details(&row)?),
            "Exercise and Sell" => EacAction::ExerciseAndSell,
            "Sell to Cover" => EacAction::SellToCover,
            other => return Err(anyhow!("Unknown EAC transaction action: {}", other)),
        };

        let transaction = EacTransaction {
            date,
            action,
            symbol: parse_symbol_str(&row.symbol),
            description: row.description.clone(),
            quantity: parse_quantity_str(&row.quantity).map_err(|e| anyhow!(e))?,
            fees_usd: parse_usd_str(&row.fees).map_err(|e| anyhow!(e))?,
            amount_usd: parse_usd_str(&row.amount).map_err(|e| anyhow!(e))?,
        };
        super::check_symbol(&transaction.symbol, config)?;
        history.push(transaction);
    }

    Ok(history)
}

fn parse_lapse_details(row: &EacRow) -> Result<LapseDetails, Error> {
    let details = row
        .transaction_details
        .first()
        .map(|d| &d.details)
        .ok_or_else(|| anyhow!("Lapse transaction on {} has no detail row", row.date))?;

    Ok(LapseDetails {
        award_date: parse_date_str(&details.award_date).map_err(|e| anyhow!(e))?,
        award_id: details.award_id.trim().to_string(),
        fmv_usd: parse_usd_str(&details.fair_market_value_price)
            .map_err(|e| anyhow!(e))?
            .ok_or_else(|| anyhow!("Lapse transaction on {} has no fair market value", row.date))?,
        sale_price_usd: parse_usd_str(&details.sale_price).map_err(|e| anyhow!(e))?,
        shares_sold: parse_quantity_str(&details.shares_sold_withheld_for_taxes)
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default(),
        shares_deposited: parse_quantity_str(&details.net_shares_deposited)
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default(),
        total_taxes_usd: parse_usd_str(&details.taxes).map_err(|e| anyhow!(e))?,
    })
}
