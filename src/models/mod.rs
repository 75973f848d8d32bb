use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Action kinds observed in the Schwab individual-account history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndividualAction {
    Sale,
    /// ESPP share purchase, reported by the broker as "Buy" with an "SPA" description.
    SecurityPurchase,
    Deposit,
    SecurityTransfer,
    Journal,
    ExerciseAndSell,
    SellToCover,
}

impl IndividualAction {
    pub fn from_broker_str(s: &str) -> Option<Self> {
        match s {
            "Sell" => Some(Self::Sale),
            "Buy" => Some(Self::SecurityPurchase),
            "Deposit" => Some(Self::Deposit),
            "Security Transfer" => Some(Self::SecurityTransfer),
            "Journal" => Some(Self::Journal),
            "Exercise and Sell" => Some(Self::ExerciseAndSell),
            "Sell to Cover" => Some(Self::SellToCover),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndividualTransaction {
    pub date: NaiveDate,
    /// Settlement reference date, present when the broker reports "MM/DD/YYYY as of MM/DD/YYYY".
    pub as_of_date: Option<NaiveDate>,
    pub action: IndividualAction,
    pub symbol: Option<String>,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub price_usd: Option<Decimal>,
    pub fees_usd: Option<Decimal>,
    pub amount_usd: Option<Decimal>,
}

impl IndividualTransaction {
    /// True for the actions that move share inventory and matter for cost-basis tracking.
    pub fn is_stock_transaction(&self) -> bool {
        matches!(
            self.action,
            IndividualAction::Sale
                | IndividualAction::SecurityPurchase
                | IndividualAction::SecurityTransfer
        )
    }

    /// Reference date used when pairing an ESPP purchase with vest records.
    pub fn reference_date(&self) -> NaiveDate {
        self.as_of_date.unwrap_or(self.date)
    }
}

/// Action kinds observed in the Equity Award Center history, each carrying its
/// action-specific detail where the engine consumes one.
#[derive(Debug, Clone, PartialEq)]
pub enum EacAction {
    Deposit,
    Sale,
    /// RSU vest. The fair-market-value price here is authoritative for lot pricing.
    Lapse(LapseDetails),
    ExerciseAndSell,
    SellToCover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LapseDetails {
    pub award_date: NaiveDate,
    pub award_id: String,
    pub fmv_usd: Decimal,
    pub sale_price_usd: Option<Decimal>,
    pub shares_sold: Decimal,
    pub shares_deposited: Decimal,
    pub total_taxes_usd: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EacTransaction {
    pub date: NaiveDate,
    pub action: EacAction,
    pub symbol: Option<String>,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub fees_usd: Option<Decimal>,
    pub amount_usd: Option<Decimal>,
}

impl EacTransaction {
    pub fn lapse_details(&self) -> Option<&LapseDetails> {
        match &self.action {
            EacAction::Lapse(details) => Some(details),
            _ => None,
        }
    }
}

/// A batch of shares acquired together at one effective price, priced from the
/// vest record rather than the broker's purchase row.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub symbol: String,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
    pub purchase_price_usd: Decimal,
}

/// The portion of one disposal matched against one lot. A disposal spanning
/// lot boundaries yields several of these, all pointing at the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionWithCostBasis {
    pub transaction: IndividualTransaction,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
    pub purchase_price_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxSaleOfSecurity {
    pub symbol: String,
    pub quantity: Decimal,
    pub sale_date: NaiveDate,
    pub purchase_date: NaiveDate,
    #[serde(rename = "SalePriceEUR")]
    pub sale_price_eur: Decimal,
    #[serde(rename = "SaleFeesEUR")]
    pub sale_fees_eur: Decimal,
    #[serde(rename = "PurchasePriceEUR")]
    pub purchase_price_eur: Decimal,
    #[serde(rename = "PurchaseFeesEUR")]
    pub purchase_fees_eur: Decimal,
    #[serde(rename = "DeemedAcquisitionCostEUR")]
    pub deemed_acquisition_cost_eur: Decimal,
    #[serde(rename = "CapitalGainEUR")]
    pub capital_gain_eur: Decimal,
    #[serde(rename = "CapitalLossEUR")]
    pub capital_loss_eur: Decimal,
}

pub fn parse_date_str(s: &str) -> Result<NaiveDate, String> {
    let date_formats = ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d", "%y-%m-%d"];

    let trimmed = s.trim();
    for format in &date_formats {
        if let Ok(parsed_date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(parsed_date);
        }
    }

    Err(format!("Invalid date format: {}", s))
}

/// Parses "MM/DD/YYYY" or "MM/DD/YYYY as of MM/DD/YYYY" into the transaction
/// date and the optional as-of date.
pub fn parse_transaction_dates(s: &str) -> Result<(NaiveDate, Option<NaiveDate>), String> {
    match s.split_once(" as of ") {
        Some((date, as_of)) => Ok((parse_date_str(date)?, Some(parse_date_str(as_of)?))),
        None => Ok((parse_date_str(s)?, None)),
    }
}

/// Parses "$1,234.56" style amounts. Empty fields mean the column does not
/// apply to the row and become None.
pub fn parse_usd_str(s: &str) -> Result<Option<Decimal>, String> {
    let cleaned = s.trim().replace('$', "").replace(',', "");
    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str_exact(&cleaned)
        .map(Some)
        .map_err(|e| format!("Invalid USD amount: {}\nError: {}", s, e))
}

pub fn parse_quantity_str(s: &str) -> Result<Option<Decimal>, String> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str_exact(&cleaned)
        .map(Some)
        .map_err(|e| format!("Invalid quantity: {}\nError: {}", s, e))
}

pub fn parse_symbol_str(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
