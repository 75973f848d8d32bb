use std::io::Write;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

use rsu_tax_calculator::commands::report::report;
use rsu_tax_calculator::CalcConfig;

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

const INDIVIDUAL_HISTORY: &str = r#"{
  "Transactions": [
    {
      "Date": "08/30/2021 as of 08/27/2021",
      "Action": "Buy",
      "Symbol": "U",
      "Description": "SPA UNITY SOFTWARE INC",
      "Quantity": "42"
    },
    {
      "Date": "10/28/2021",
      "Action": "Sell",
      "Symbol": "U",
      "Description": "UNITY SOFTWARE INC",
      "Quantity": "42",
      "Price": "$56.00",
      "FeesAndCommissions": "$0.50",
      "Amount": "$2,351.50"
    }
  ]
}"#;

const EAC_HISTORY: &str = r#"{
  "Transactions": [
    {
      "Date": "08/25/2021",
      "Action": "Lapse",
      "Symbol": "U",
      "Description": "Restricted Stock Lapse",
      "Quantity": "64",
      "TransactionDetails": [
        {
          "Details": {
            "AwardDate": "09/01/2020",
            "AwardId": "C654321",
            "FairMarketValuePrice": "$47.00",
            "SharesSoldWithheldForTaxes": "22",
            "NetSharesDeposited": "42",
            "Taxes": "$1,034.00"
          }
        }
      ]
    }
  ]
}"#;

const RATES: &str = "Date,USD\n2021-08-25,1.0\n2021-10-28,1.0\n";

#[test]
fn report_command_writes_the_full_pipeline_output() {
    let individual = write_temp(".json", INDIVIDUAL_HISTORY);
    let eac = write_temp(".json", EAC_HISTORY);
    let rates = write_temp(".csv", RATES);
    let out = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp output file");

    report(
        &individual.path().to_path_buf(),
        &eac.path().to_path_buf(),
        &rates.path().to_path_buf(),
        &out.path().to_path_buf(),
        &CalcConfig::default(),
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(out.path()).unwrap();
    assert_eq!(
        rdr.headers().unwrap(),
        &csv::StringRecord::from(vec![
            "Symbol",
            "Quantity",
            "SaleDate",
            "PurchaseDate",
            "SalePriceEUR",
            "SaleFeesEUR",
            "PurchasePriceEUR",
            "PurchaseFeesEUR",
            "DeemedAcquisitionCostEUR",
            "CapitalGainEUR",
            "CapitalLossEUR",
        ])
    );

    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2, "one sale row plus the totals row");

    let row = &records[0];
    assert_eq!(&row[0], "U");
    assert_eq!(row[1].parse::<Decimal>().unwrap(), dec!(42));
    assert_eq!(&row[2], "2021-10-28");
    assert_eq!(&row[3], "2021-08-25");
    assert_eq!(row[4].parse::<Decimal>().unwrap(), dec!(56));
    assert_eq!(row[5].parse::<Decimal>().unwrap(), dec!(0.5));
    assert_eq!(row[6].parse::<Decimal>().unwrap(), dec!(47));
    // 42 * 56 - 0.5 - 42 * 47 = 377.5
    assert_eq!(row[9].parse::<Decimal>().unwrap(), dec!(377.5));
    assert_eq!(row[10].parse::<Decimal>().unwrap(), dec!(0));

    let totals = &records[1];
    assert_eq!(totals[1].parse::<Decimal>().unwrap(), dec!(42));
    assert_eq!(totals[9].parse::<Decimal>().unwrap(), dec!(377.5));
    assert_eq!(totals[10].parse::<Decimal>().unwrap(), dec!(0));
}

#[test]
fn report_command_fails_when_a_purchase_has_no_vest_record() {
    let individual = write_temp(".json", INDIVIDUAL_HISTORY);
    let eac = write_temp(".json", r#"{"Transactions": []}"#);
    let rates = write_temp(".csv", RATES);
    let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

    let err = report(
        &individual.path().to_path_buf(),
        &eac.path().to_path_buf(),
        &rates.path().to_path_buf(),
        &out.path().to_path_buf(),
        &CalcConfig::default(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("vest record"));
}
