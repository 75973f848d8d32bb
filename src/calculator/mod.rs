use core::cmp::min;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::CalculationError;
use crate::models::{
    EacTransaction, IndividualAction, IndividualTransaction, LapseDetails, Lot,
    TaxSaleOfSecurity, TransactionWithCostBasis,
};
use crate::rates::CurrencyConverter;
use crate::CalcConfig;

/// Projects the full account history down to the transactions that move share
/// inventory: sales, ESPP purchases and outbound security transfers.
/// Relative order is preserved.
pub fn filter_stock_transactions(history: &[IndividualTransaction]) -> Vec<IndividualTransaction> {
    history
        .iter()
        .filter(|t| t.is_stock_transaction())
        .cloned()
        .collect()
}

/// Reconciles ESPP purchase records with RSU lapse records into acquisition lots.
///
/// The broker's purchase rows carry no trustworthy per-share price; the lapse
/// rows carry the fair-market-value price actually used for tax purposes. Each
/// purchase is explained by the lapse record(s) whose deposited share count
/// adds up to the purchase quantity, dated within `lot_match_window_days` days
/// at or before the purchase's reference date. Lots resolving to the same
/// vest date and price are merged.
pub fn build_lots(
    stock_transactions: &[IndividualTransaction],
    eac_history: &[EacTransaction],
    config: &CalcConfig,
) -> Result<Vec<Lot>, CalculationError> {
    let lapses: Vec<(NaiveDate, &LapseDetails)> = eac_history
        .iter()
        .filter_map(|t| t.lapse_details().map(|d| (t.date, d)))
        .collect();
    let mut consumed = vec![false; lapses.len()];

    let mut lots: Vec<Lot> = Vec::new();
    for purchase in stock_transactions
        .iter()
        .filter(|t| t.action == IndividualAction::SecurityPurchase)
    {
        let quantity = purchase.quantity.unwrap_or(dec!(0));
        let reference_date = purchase.reference_date();

        let candidates: Vec<usize> = lapses
            .iter()
            .enumerate()
            .filter(|(i, (lapse_date, _))| {
                let offset = (reference_date - *lapse_date).num_days();
                !consumed[*i] && offset >= 0 && offset <= config.lot_match_window_days
            })
            .map(|(i, _)| i)
            .collect();

        let matched = match_purchase_to_lapses(quantity, &lapses, &candidates);
        let Some(matched) = matched else {
            return Err(CalculationError::LotReconciliation {
                purchase_date: purchase.date,
                quantity,
            });
        };

        let (vest_date, _) = lapses[matched[0]];
        let price = lapses[matched[0]].1.fmv_usd;
        for i in matched {
            consumed[i] = true;
        }

        match lots
            .iter_mut()
            .find(|l| l.purchase_date == vest_date && l.purchase_price_usd == price)
        {
            Some(lot) => lot.quantity += quantity,
            None => lots.push(Lot {
                symbol: purchase
                    .symbol
                    .clone()
                    .unwrap_or_else(|| config.supported_symbol.clone()),
                quantity,
                purchase_date: vest_date,
                purchase_price_usd: price,
            }),
        }
    }

    Ok(lots)
}

/// Picks the lapse record(s) explaining one purchase: a single record with the
/// exact deposited quantity, or failing that a same-date same-price group
/// whose deposited quantities sum to it.
fn match_purchase_to_lapses(
    quantity: Decimal,
    lapses: &[(NaiveDate, &LapseDetails)],
    candidates: &[usize],
) -> Option<Vec<usize>> {
    if let Some(&exact) = candidates
        .iter()
        .find(|&&i| lapses[i].1.shares_deposited == quantity)
    {
        return Some(vec![exact]);
    }

    let mut groups: Vec<((NaiveDate, Decimal), Vec<usize>)> = Vec::new();
    for &i in candidates {
        let key = (lapses[i].0, lapses[i].1.fmv_usd);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(i),
            None => groups.push((key, vec![i])),
        }
    }
    groups
        .into_iter()
        .find(|(_, members)| {
            members
                .iter()
                .map(|&i| lapses[i].1.shares_deposited)
                .sum::<Decimal>()
                == quantity
        })
        .map(|(_, members)| members)
}

/// Matches disposals against acquisition lots in FIFO order.
///
/// Disposals are processed in date order regardless of the order they arrive
/// in. Sales emit one attribution record per lot they draw from; security
/// transfers retire inventory without producing output; purchases are skipped.
/// Lot state is an owned working copy scoped to this call; the caller's lots
/// are never mutated.
pub fn calculate_cost_bases(
    stock_transactions: &[IndividualTransaction],
    lots: &[Lot],
) -> Result<Vec<TransactionWithCostBasis>, CalculationError> {
    let mut sorted_lots: Vec<&Lot> = lots.iter().collect();
    sorted_lots.sort_by_key(|l| l.purchase_date);
    let mut remaining: Vec<Decimal> = sorted_lots.iter().map(|l| l.quantity).collect();

    let mut disposals: Vec<&IndividualTransaction> = stock_transactions.iter().collect();
    disposals.sort_by_key(|t| t.date);

    let mut result: Vec<TransactionWithCostBasis> = Vec::new();
    let mut cursor = 0;
    for transaction in disposals {
        let reported = match transaction.action {
            IndividualAction::Sale => true,
            IndividualAction::SecurityTransfer => false,
            _ => continue,
        };
        let requested = transaction.quantity.unwrap_or(dec!(0)).abs();
        let available: Decimal = remaining.iter().copied().sum();

        let mut to_retire = requested;
        while to_retire > dec!(0) {
            while cursor < sorted_lots.len() && remaining[cursor].is_zero() {
                cursor += 1;
            }
            if cursor == sorted_lots.len() {
                return Err(CalculationError::InsufficientLotInventory {
                    sale_date: transaction.date,
                    requested,
                    available,
                });
            }

            let taken = min(to_retire, remaining[cursor]);
            remaining[cursor] -= taken;
            to_retire -= taken;

            if reported {
                result.push(TransactionWithCostBasis {
                    transaction: transaction.clone(),
                    quantity: taken,
                    purchase_date: sorted_lots[cursor].purchase_date,
                    purchase_price_usd: sorted_lots[cursor].purchase_price_usd,
                });
            }
        }
    }

    Ok(result)
}

/// Converts matched cost bases to home-currency gain/loss rows, one per
/// attribution, in input order. A single unresolvable rate fails the whole
/// report.
pub fn create_tax_report(
    transactions_with_cost_basis: &[TransactionWithCostBasis],
    converter: &dyn CurrencyConverter,
) -> Result<Vec<TaxSaleOfSecurity>, CalculationError> {
    let mut report: Vec<TaxSaleOfSecurity> = Vec::new();

    for entry in transactions_with_cost_basis {
        let transaction = &entry.transaction;
        let sale_price_eur =
            converter.usd_to_eur(transaction.price_usd.unwrap_or(dec!(0)), transaction.date)?;
        let sale_fees_eur =
            converter.usd_to_eur(transaction.fees_usd.unwrap_or(dec!(0)), transaction.date)?;
        let purchase_price_eur =
            converter.usd_to_eur(entry.purchase_price_usd, entry.purchase_date)?;

        // Reserved for the deemed-acquisition-cost provision, not yet implemented.
        let purchase_fees_eur = dec!(0);
        let deemed_acquisition_cost_eur = dec!(0);

        let net_sale_proceeds = entry.quantity * sale_price_eur - sale_fees_eur;
        let net_acquisition_cost = entry.quantity * purchase_price_eur - purchase_fees_eur;
        let diff = (net_sale_proceeds - net_acquisition_cost)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        report.push(TaxSaleOfSecurity {
            symbol: transaction.symbol.clone().unwrap_or_default(),
            quantity: entry.quantity,
            sale_date: transaction.date,
            purchase_date: entry.purchase_date,
            sale_price_eur,
            sale_fees_eur,
            purchase_price_eur,
            purchase_fees_eur,
            deemed_acquisition_cost_eur,
            capital_gain_eur: if diff >= dec!(0) { diff } else { dec!(0) },
            capital_loss_eur: if diff >= dec!(0) { dec!(0) } else { -diff },
        });
    }

    Ok(report)
}
