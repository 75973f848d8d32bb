#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rsu_tax_calculator::models::{
    EacAction, EacTransaction, IndividualAction, IndividualTransaction, LapseDetails, Lot,
};
use rsu_tax_calculator::CalcConfig;

pub fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn default_config() -> CalcConfig {
    CalcConfig::default()
}

pub fn sell(date: NaiveDate, quantity: Decimal, price_usd: Decimal) -> IndividualTransaction {
    sell_with_fees(date, quantity, price_usd, dec!(0))
}

pub fn sell_with_fees(
    date: NaiveDate,
    quantity: Decimal,
    price_usd: Decimal,
    fees_usd: Decimal,
) -> IndividualTransaction {
    IndividualTransaction {
        date,
        as_of_date: None,
        action: IndividualAction::Sale,
        symbol: Some("U".to_string()),
        description: "UNITY SOFTWARE INC".to_string(),
        quantity: Some(quantity),
        price_usd: Some(price_usd),
        fees_usd: Some(fees_usd),
        amount_usd: Some(quantity * price_usd - fees_usd),
    }
}

pub fn spa(date: NaiveDate, as_of_date: Option<NaiveDate>, quantity: Decimal) -> IndividualTransaction {
    IndividualTransaction {
        date,
        as_of_date,
        action: IndividualAction::SecurityPurchase,
        symbol: Some("U".to_string()),
        description: "SPA UNITY SOFTWARE INC".to_string(),
        quantity: Some(quantity),
        price_usd: None,
        fees_usd: None,
        amount_usd: None,
    }
}

pub fn transfer(date: NaiveDate, quantity: Decimal) -> IndividualTransaction {
    IndividualTransaction {
        date,
        as_of_date: None,
        action: IndividualAction::SecurityTransfer,
        symbol: Some("U".to_string()),
        description: "TRANSFER OF SECURITY".to_string(),
        quantity: Some(quantity),
        price_usd: None,
        fees_usd: None,
        amount_usd: None,
    }
}

pub fn journal(date: NaiveDate) -> IndividualTransaction {
    IndividualTransaction {
        date,
        as_of_date: None,
        action: IndividualAction::Journal,
        symbol: None,
        description: "JOURNALED FUNDS".to_string(),
        quantity: None,
        price_usd: None,
        fees_usd: None,
        amount_usd: Some(dec!(100)),
    }
}

pub fn lapse(date: NaiveDate, shares_deposited: Decimal, fmv_usd: Decimal) -> EacTransaction {
    EacTransaction {
        date,
        action: EacAction::Lapse(LapseDetails {
            award_date: date,
            award_id: "C123456".to_string(),
            fmv_usd,
            sale_price_usd: None,
            shares_sold: dec!(0),
            shares_deposited,
            total_taxes_usd: None,
        }),
        symbol: Some("U".to_string()),
        description: "Restricted Stock Lapse".to_string(),
        quantity: Some(shares_deposited),
        fees_usd: None,
        amount_usd: None,
    }
}

pub fn lot(quantity: Decimal, purchase_date: NaiveDate, purchase_price_usd: Decimal) -> Lot {
    Lot {
        symbol: "U".to_string(),
        quantity,
        purchase_date,
        purchase_price_usd,
    }
}
