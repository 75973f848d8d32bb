use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::calculator::{build_lots, calculate_cost_bases, create_tax_report, filter_stock_transactions};
use crate::parser::{eac::parse_eac_history, individual::parse_individual_history};
use crate::rates::EcbRates;
use crate::CalcConfig;

fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

pub fn report(
    individual: &PathBuf,
    eac: &PathBuf,
    rates: &PathBuf,
    out: &PathBuf,
    config: &CalcConfig,
) -> Result<(), Error> {
    let individual_input = fs::read_to_string(individual)
        .with_context(|| format!("Error reading file {:?}", individual))?;
    let eac_input =
        fs::read_to_string(eac).with_context(|| format!("Error reading file {:?}", eac))?;

    let individual_history = parse_individual_history(&individual_input, config)?;
    let eac_history = parse_eac_history(&eac_input, config)?;
    let converter = EcbRates::from_csv_path(rates)?;

    let stock_transactions = filter_stock_transactions(&individual_history);
    let lots = build_lots(&stock_transactions, &eac_history, config)?;
    let with_cost_basis = calculate_cost_bases(&stock_transactions, &lots)?;
    let tax_report = create_tax_report(&with_cost_basis, &converter)?;

    let mut wtr = csv::Writer::from_path(out)
        .with_context(|| format!("Error creating report file {:?}", out))?;

    let mut total_quantity = dec!(0);
    let mut total_gain = dec!(0);
    let mut total_loss = dec!(0);

    for row in &tax_report {
        let mut csv_row = row.clone();
        csv_row.sale_price_eur = round_price(csv_row.sale_price_eur);
        csv_row.sale_fees_eur = round_price(csv_row.sale_fees_eur);
        csv_row.purchase_price_eur = round_price(csv_row.purchase_price_eur);

        total_quantity += row.quantity;
        total_gain += row.capital_gain_eur;
        total_loss += row.capital_loss_eur;

        wtr.serialize(csv_row)?;
    }

    if !total_quantity.is_zero() {
        wtr.write_record(&[
            String::from(""),
            total_quantity.to_string(),
            String::from(""),
            String::from(""),
            String::from(""),
            String::from(""),
            String::from(""),
            String::from(""),
            String::from(""),
            total_gain.to_string(),
            total_loss.to_string(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}
