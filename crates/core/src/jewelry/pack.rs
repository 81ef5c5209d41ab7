//! The jewelry rule processor.
//!
//! Walks every line of a transaction exactly once, in the order supplied,
//! classifying each by its own smart code and emitting matched debit/credit
//! pairs. Running totals accumulate as lines are processed because later
//! lines depend on them: a percentage making charge resolves against metal
//! value sold so far, a zero-amount tax line is computed from revenue so
//! far, and the closing cash line nets everything out.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::classify::{JewelryLineKind, JewelryTxnKind};
use super::costing::{self, CostingError, MakingCharge, Purity};
use crate::finance::context::{AccountRole, FinanceContext, GlAccount};
use crate::finance::entry::GlEntry;
use crate::finance::rounding::{half_split, round_money};
use crate::rules::error::DispatchError;
use crate::rules::processor::{RuleOutcome, RuleProcessor};
use crate::smartcode::SmartCode;
use crate::transaction::types::{TransactionHeader, TransactionLine};

/// Rule processor for the jewelry domain.
///
/// Stateless: safe to share across threads and transactions.
#[derive(Debug, Default, Clone, Copy)]
pub struct JewelryPack;

impl JewelryPack {
    /// Creates the pack.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RuleProcessor for JewelryPack {
    fn process(
        &self,
        header: &TransactionHeader,
        lines: &[TransactionLine],
        context: &FinanceContext,
    ) -> RuleOutcome {
        let Ok(code) = SmartCode::parse(&header.smart_code) else {
            return RuleOutcome::from_error(DispatchError::MalformedCode {
                code: header.smart_code.clone(),
            });
        };
        let Some(kind) = JewelryTxnKind::from_code(&code) else {
            return RuleOutcome::from_error(DispatchError::UnsupportedTransaction {
                code: header.smart_code.clone(),
            });
        };

        match kind {
            JewelryTxnKind::PosSale => pos_sale(header, lines, context),
            JewelryTxnKind::ExchangeIntake => exchange_intake(lines, context),
            JewelryTxnKind::JobworkIssue => jobwork_issue(lines, context),
            JewelryTxnKind::JobworkReceipt => jobwork_receipt(lines, context),
            JewelryTxnKind::MeltRecon => melt_recon(lines, context),
        }
    }
}

/// Domain payload of item-bearing lines (item, exchange, melt).
#[derive(Debug, Deserialize)]
struct ItemPayload {
    net_weight: Option<Decimal>,
    purity_karat: Option<Decimal>,
    purity_factor: Option<Decimal>,
    rate_per_gram: Option<Decimal>,
    making: Option<MakingCharge>,
    book_value: Option<Decimal>,
}

/// Domain payload of standalone making-charge lines.
#[derive(Debug, Deserialize)]
struct MakingPayload {
    #[serde(flatten)]
    charge: MakingCharge,
    net_weight: Option<Decimal>,
}

/// Running totals of a retail sale.
#[derive(Debug, Default)]
struct SaleState {
    /// Everything credited so far (revenue, tax, rounding gains).
    credits: Decimal,
    /// Non-cash debits so far (old metal, rounding losses).
    non_cash_debits: Decimal,
    /// Metal value sold so far; percentage making charges resolve here.
    metal_total: Decimal,
    /// Revenue so far; default-rate tax lines resolve here.
    revenue_total: Decimal,
}

fn pos_sale(
    header: &TransactionHeader,
    lines: &[TransactionLine],
    context: &FinanceContext,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::new();
    let mut state = SaleState::default();

    for line in lines {
        let kind = match classify_line(line) {
            Ok(kind) => kind,
            Err(error) => {
                outcome.errors.push(error);
                continue;
            }
        };
        let result = match kind {
            JewelryLineKind::Item => sale_item(line, context, &mut state, &mut outcome.entries),
            JewelryLineKind::Making => sale_making(line, context, &mut state, &mut outcome.entries),
            JewelryLineKind::Stone => sale_stone(line, context, &mut state, &mut outcome.entries),
            JewelryLineKind::Tax => {
                sale_tax(header, line, context, &mut state, &mut outcome.entries)
            }
            JewelryLineKind::Exchange => {
                sale_exchange(line, context, &mut state, &mut outcome.entries)
            }
            JewelryLineKind::Adjustment => {
                sale_adjustment(line, context, &mut state, &mut outcome.entries)
            }
        };
        if let Err(error) = result {
            outcome.errors.push(error);
        }
    }

    // Closing cash/bank line: header total minus any old-metal adjustment,
    // expressed as credits accumulated minus non-cash debits.
    let net_cash = state.credits - state.non_cash_debits;
    if !net_cash.is_zero() {
        match account(context, AccountRole::Cash) {
            Ok(cash) => {
                let entry = if net_cash > Decimal::ZERO {
                    GlEntry::debit(cash, net_cash, &header.smart_code, None)
                } else {
                    GlEntry::credit(cash, -net_cash, &header.smart_code, None)
                };
                outcome.entries.push(entry);
            }
            Err(error) => outcome.errors.push(error),
        }
    }

    outcome
}

fn sale_item(
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let payload: ItemPayload = parse_payload(line)?;
    let (weight, metal) = line_metal_value(line, &payload)?;

    let sales = account(context, AccountRole::SalesRevenue)?;
    entries.push(GlEntry::credit(
        sales,
        metal,
        &line.smart_code,
        Some(line.line_number),
    ));
    state.metal_total += metal;
    state.revenue_total += metal;
    state.credits += metal;

    if let Some(charge) = payload.making {
        let labor = costing::making_charge_value(charge, weight, metal)
            .map_err(|error| invalid_value(line.line_number, error))?;
        if labor > Decimal::ZERO {
            let making = account(context, AccountRole::MakingRevenue)?;
            entries.push(GlEntry::credit(
                making,
                labor,
                &line.smart_code,
                Some(line.line_number),
            ));
            state.revenue_total += labor;
            state.credits += labor;
        }
    }
    Ok(())
}

fn sale_making(
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let labor = standalone_making_value(line, state.metal_total)?;
    if labor > Decimal::ZERO {
        let making = account(context, AccountRole::MakingRevenue)?;
        entries.push(GlEntry::credit(
            making,
            labor,
            &line.smart_code,
            Some(line.line_number),
        ));
        state.revenue_total += labor;
        state.credits += labor;
    }
    Ok(())
}

fn sale_stone(
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let amount = line.line_amount;
    if amount <= Decimal::ZERO {
        return Err(DispatchError::InvalidValue {
            line_number: line.line_number,
            detail: format!("gemstone line amount must be positive, got {amount}"),
        });
    }
    let gemstone = account(context, AccountRole::GemstoneRevenue)?;
    entries.push(GlEntry::credit(
        gemstone,
        amount,
        &line.smart_code,
        Some(line.line_number),
    ));
    state.revenue_total += amount;
    state.credits += amount;
    Ok(())
}

fn sale_tax(
    header: &TransactionHeader,
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let amount = if line.line_amount.is_zero() {
        // A tax line without an amount is computed from the profile's
        // default rate over revenue accumulated so far.
        round_money(state.revenue_total * context.tax_profile.default_rate / Decimal::from(100))
    } else {
        line.line_amount
    };
    if amount < Decimal::ZERO {
        return Err(DispatchError::InvalidValue {
            line_number: line.line_number,
            detail: format!("tax line amount must not be negative, got {amount}"),
        });
    }

    let place_of_supply = header
        .metadata
        .get("place_of_supply")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(&context.home_jurisdiction);

    if place_of_supply == context.home_jurisdiction {
        let [first_account, second_account] = &context.tax_profile.same_jurisdiction_accounts;
        let (first, second) = half_split(amount);
        entries.push(GlEntry::credit(
            first_account,
            first,
            &line.smart_code,
            Some(line.line_number),
        ));
        entries.push(GlEntry::credit(
            second_account,
            second,
            &line.smart_code,
            Some(line.line_number),
        ));
    } else {
        entries.push(GlEntry::credit(
            &context.tax_profile.cross_jurisdiction_account,
            amount,
            &line.smart_code,
            Some(line.line_number),
        ));
    }
    state.credits += amount;
    Ok(())
}

fn sale_exchange(
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let payload: ItemPayload = parse_payload(line)?;
    let (_, value) = line_metal_value(line, &payload)?;

    let old_metal = account(context, AccountRole::OldMetalInventory)?;
    entries.push(GlEntry::debit(
        old_metal,
        value,
        &line.smart_code,
        Some(line.line_number),
    ));
    state.non_cash_debits += value;
    Ok(())
}

fn sale_adjustment(
    line: &TransactionLine,
    context: &FinanceContext,
    state: &mut SaleState,
    entries: &mut Vec<GlEntry>,
) -> Result<(), DispatchError> {
    let amount = line.line_amount;
    if amount > Decimal::ZERO {
        let gain = account(context, AccountRole::RoundingGain)?;
        entries.push(GlEntry::credit(
            gain,
            amount,
            &line.smart_code,
            Some(line.line_number),
        ));
        state.credits += amount;
    } else if amount < Decimal::ZERO {
        let loss = account(context, AccountRole::RoundingLoss)?;
        entries.push(GlEntry::debit(
            loss,
            -amount,
            &line.smart_code,
            Some(line.line_number),
        ));
        state.non_cash_debits += -amount;
    }
    Ok(())
}

fn exchange_intake(lines: &[TransactionLine], context: &FinanceContext) -> RuleOutcome {
    let mut outcome = RuleOutcome::new();

    for line in lines {
        let result = classify_line(line).and_then(|kind| match kind {
            JewelryLineKind::Exchange => {
                let payload: ItemPayload = parse_payload(line)?;
                let (_, value) = line_metal_value(line, &payload)?;
                let old_metal = account(context, AccountRole::OldMetalInventory)?;
                let liability = account(context, AccountRole::ExchangeLiability)?;
                outcome.entries.push(GlEntry::debit(
                    old_metal,
                    value,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                outcome.entries.push(GlEntry::credit(
                    liability,
                    value,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                Ok(())
            }
            _ => Err(unsupported_line(line)),
        });
        if let Err(error) = result {
            outcome.errors.push(error);
        }
    }

    outcome
}

fn jobwork_issue(lines: &[TransactionLine], context: &FinanceContext) -> RuleOutcome {
    let mut outcome = RuleOutcome::new();

    for line in lines {
        let result = classify_line(line).and_then(|kind| match kind {
            JewelryLineKind::Item => {
                let payload: ItemPayload = parse_payload(line)?;
                let (_, value) = line_metal_value(line, &payload)?;
                let wip = account(context, AccountRole::JobworkWip)?;
                let inventory = account(context, AccountRole::MetalInventory)?;
                outcome.entries.push(GlEntry::debit(
                    wip,
                    value,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                outcome.entries.push(GlEntry::credit(
                    inventory,
                    value,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                Ok(())
            }
            _ => Err(unsupported_line(line)),
        });
        if let Err(error) = result {
            outcome.errors.push(error);
        }
    }

    outcome
}

fn jobwork_receipt(lines: &[TransactionLine], context: &FinanceContext) -> RuleOutcome {
    let mut outcome = RuleOutcome::new();
    let mut metal_total = Decimal::ZERO;

    for line in lines {
        let result = classify_line(line).and_then(|kind| match kind {
            JewelryLineKind::Item => {
                let payload: ItemPayload = parse_payload(line)?;
                let (weight, metal) = line_metal_value(line, &payload)?;
                let labor = match payload.making {
                    Some(charge) => costing::making_charge_value(charge, weight, metal)
                        .map_err(|error| invalid_value(line.line_number, error))?,
                    None => Decimal::ZERO,
                };

                let finished = account(context, AccountRole::FinishedInventory)?;
                let wip = account(context, AccountRole::JobworkWip)?;
                outcome.entries.push(GlEntry::debit(
                    finished,
                    metal + labor,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                outcome.entries.push(GlEntry::credit(
                    wip,
                    metal,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                if labor > Decimal::ZERO {
                    let payable = account(context, AccountRole::MakingPayable)?;
                    outcome.entries.push(GlEntry::credit(
                        payable,
                        labor,
                        &line.smart_code,
                        Some(line.line_number),
                    ));
                }
                metal_total += metal;
                Ok(())
            }
            JewelryLineKind::Making => {
                let labor = standalone_making_value(line, metal_total)?;
                if labor > Decimal::ZERO {
                    let finished = account(context, AccountRole::FinishedInventory)?;
                    let payable = account(context, AccountRole::MakingPayable)?;
                    outcome.entries.push(GlEntry::debit(
                        finished,
                        labor,
                        &line.smart_code,
                        Some(line.line_number),
                    ));
                    outcome.entries.push(GlEntry::credit(
                        payable,
                        labor,
                        &line.smart_code,
                        Some(line.line_number),
                    ));
                }
                Ok(())
            }
            _ => Err(unsupported_line(line)),
        });
        if let Err(error) = result {
            outcome.errors.push(error);
        }
    }

    outcome
}

fn melt_recon(lines: &[TransactionLine], context: &FinanceContext) -> RuleOutcome {
    let mut outcome = RuleOutcome::new();

    for line in lines {
        let result = classify_line(line).and_then(|kind| match kind {
            JewelryLineKind::Item => {
                let payload: ItemPayload = parse_payload(line)?;
                let book_value = require(payload.book_value, line.line_number, "book_value")?;
                if book_value <= Decimal::ZERO {
                    return Err(DispatchError::InvalidValue {
                        line_number: line.line_number,
                        detail: format!("book value must be positive, got {book_value}"),
                    });
                }
                let (_, recovered) = line_metal_value(line, &payload)?;

                let scrap = account(context, AccountRole::ScrapInventory)?;
                let inventory = account(context, AccountRole::MetalInventory)?;
                outcome.entries.push(GlEntry::debit(
                    scrap,
                    recovered,
                    &line.smart_code,
                    Some(line.line_number),
                ));
                outcome.entries.push(GlEntry::credit(
                    inventory,
                    book_value,
                    &line.smart_code,
                    Some(line.line_number),
                ));

                // Gain and loss are mutually exclusive; exact equality
                // emits neither.
                let difference = recovered - book_value;
                if difference > Decimal::ZERO {
                    let gain = account(context, AccountRole::MeltGain)?;
                    outcome.entries.push(GlEntry::credit(
                        gain,
                        difference,
                        &line.smart_code,
                        Some(line.line_number),
                    ));
                } else if difference < Decimal::ZERO {
                    let loss = account(context, AccountRole::MeltLoss)?;
                    outcome.entries.push(GlEntry::debit(
                        loss,
                        -difference,
                        &line.smart_code,
                        Some(line.line_number),
                    ));
                }
                Ok(())
            }
            _ => Err(unsupported_line(line)),
        });
        if let Err(error) = result {
            outcome.errors.push(error);
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn classify_line(line: &TransactionLine) -> Result<JewelryLineKind, DispatchError> {
    let code = SmartCode::parse(&line.smart_code).map_err(|_| DispatchError::MalformedCode {
        code: line.smart_code.clone(),
    })?;
    JewelryLineKind::from_code(&code).ok_or_else(|| unsupported_line(line))
}

fn unsupported_line(line: &TransactionLine) -> DispatchError {
    DispatchError::UnsupportedLine {
        line_number: line.line_number,
        code: line.smart_code.clone(),
    }
}

fn parse_payload<T: DeserializeOwned>(line: &TransactionLine) -> Result<T, DispatchError> {
    serde_json::from_value(line.payload.clone()).map_err(|error| DispatchError::InvalidValue {
        line_number: line.line_number,
        detail: format!("payload: {error}"),
    })
}

fn require<T>(value: Option<T>, line_number: u32, field: &'static str) -> Result<T, DispatchError> {
    value.ok_or(DispatchError::MissingField { line_number, field })
}

fn invalid_value(line_number: u32, error: CostingError) -> DispatchError {
    DispatchError::InvalidValue {
        line_number,
        detail: error.to_string(),
    }
}

/// Resolves the metal inputs of a line and computes its value.
///
/// An explicit purity factor wins over karat when both are present. Missing
/// market inputs are hard failures - there is no fallback rate.
fn line_metal_value(
    line: &TransactionLine,
    payload: &ItemPayload,
) -> Result<(Decimal, Decimal), DispatchError> {
    let weight = require(payload.net_weight, line.line_number, "net_weight")?;
    let purity = match (payload.purity_factor, payload.purity_karat) {
        (Some(factor), _) => Purity::Factor(factor),
        (None, Some(karat)) => Purity::Karat(karat),
        (None, None) => {
            return Err(DispatchError::MissingField {
                line_number: line.line_number,
                field: "purity_karat",
            });
        }
    };
    let rate = require(payload.rate_per_gram, line.line_number, "rate_per_gram")?;

    let value = costing::metal_value(weight, purity, rate)
        .map_err(|error| invalid_value(line.line_number, error))?;
    Ok((weight, value))
}

fn standalone_making_value(
    line: &TransactionLine,
    metal_total: Decimal,
) -> Result<Decimal, DispatchError> {
    let payload: MakingPayload = parse_payload(line)?;
    let weight = match payload.charge {
        MakingCharge::PerGram { .. } => require(payload.net_weight, line.line_number, "net_weight")?,
        _ => Decimal::ONE,
    };
    costing::making_charge_value(payload.charge, weight, metal_total)
        .map_err(|error| invalid_value(line.line_number, error))
}

fn account(
    context: &FinanceContext,
    role: AccountRole,
) -> Result<&GlAccount, DispatchError> {
    context
        .account(role)
        .ok_or(DispatchError::MissingAccount { role })
}
