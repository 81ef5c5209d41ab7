//! Property-based tests for the jewelry pack.
//!
//! - Every successful run balances within the context tolerance, over
//!   randomized retail sales (weights, purities, rates, labor, tax).
//! - Melt gain and loss postings are mutually exclusive and exhaustive.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use tessera_shared::config::FinanceDefaults;
use tessera_shared::types::{OrganizationId, TransactionId, TransactionLineId};

use super::pack::JewelryPack;
use crate::finance::balance::validate_balance;
use crate::finance::context::{AccountRole, FinanceContext, GlAccount, TaxProfile};
use crate::rules::processor::RuleProcessor;
use crate::transaction::types::{TransactionHeader, TransactionLine, TransactionStatus};

/// Strategy for net weights: 0.01 to 500.00 grams.
fn weight() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|centigrams| Decimal::new(centigrams, 2))
}

/// Strategy for purity karat: whole karats 1 to 24.
fn karat() -> impl Strategy<Value = Decimal> {
    (1i64..=24i64).prop_map(Decimal::from)
}

/// Strategy for metal rates: 1.00 to 10,000.00 per gram.
fn rate() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for per-gram labor rates: 0.00 to 1,000.00.
fn labor_rate() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for tax amounts: 0.00 (default-rate path) to 10,000.00.
fn tax_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn context() -> FinanceContext {
    FinanceContext::new(
        OrganizationId::new(),
        "INR",
        "KA",
        TaxProfile {
            default_rate: dec!(3),
            same_jurisdiction_accounts: [
                GlAccount::new("2301", "Tax Payable - Central"),
                GlAccount::new("2302", "Tax Payable - State"),
            ],
            cross_jurisdiction_account: GlAccount::new("2303", "Tax Payable - Interstate"),
        },
        &FinanceDefaults::default(),
    )
    .with_account(AccountRole::Cash, GlAccount::new("1000", "Cash on Hand"))
    .with_account(AccountRole::SalesRevenue, GlAccount::new("4100", "Metal Sales"))
    .with_account(AccountRole::MakingRevenue, GlAccount::new("4200", "Making Charges"))
    .with_account(AccountRole::OldMetalInventory, GlAccount::new("1320", "Old Metal Inventory"))
    .with_account(AccountRole::MetalInventory, GlAccount::new("1310", "Metal Inventory"))
    .with_account(AccountRole::ScrapInventory, GlAccount::new("1340", "Scrap Inventory"))
    .with_account(AccountRole::MeltGain, GlAccount::new("4920", "Melt Gain"))
    .with_account(AccountRole::MeltLoss, GlAccount::new("5920", "Melt Loss"))
}

fn header(smart_code: &str, place_of_supply: &str) -> TransactionHeader {
    let now = Utc::now();
    TransactionHeader {
        id: TransactionId::new(),
        organization_id: OrganizationId::new(),
        transaction_type: "jewelry".to_string(),
        smart_code: smart_code.to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        total_amount: Decimal::ZERO,
        status: TransactionStatus::Confirmed,
        reference_entity: None,
        metadata: json!({ "place_of_supply": place_of_supply }),
        created_at: now,
        updated_at: now,
    }
}

fn line(number: u32, smart_code: &str, amount: Decimal, payload: serde_json::Value) -> TransactionLine {
    TransactionLine {
        id: TransactionLineId::new(),
        transaction_id: TransactionId::new(),
        line_number: number,
        entity_id: None,
        quantity: dec!(1),
        unit_amount: amount,
        line_amount: amount,
        smart_code: smart_code.to_string(),
        payload,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* retail sale with random weights, purities, rates, labor,
    /// and tax, a successful run SHALL balance within 0.01.
    #[test]
    fn prop_retail_sale_balances(
        net_weight in weight(),
        purity in karat(),
        metal_rate in rate(),
        labor in labor_rate(),
        tax in tax_amount(),
        home in proptest::bool::ANY,
    ) {
        let ctx = context();
        let place = if home { "KA" } else { "MH" };
        let header = header("TESSERA.JEWELRY.POS.SALE.TXN.v1", place);
        let lines = vec![
            line(1, "TESSERA.JEWELRY.POS.LINE.ITEM.v1", Decimal::ZERO, json!({
                "net_weight": net_weight.to_string(),
                "purity_karat": purity.to_string(),
                "rate_per_gram": metal_rate.to_string(),
                "making": {"charge_type": "per_gram", "rate": labor.to_string()},
            })),
            line(2, "TESSERA.JEWELRY.POS.LINE.TAX.v1", tax, json!({})),
        ];

        let outcome = JewelryPack::new().process(&header, &lines, &ctx);
        prop_assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

        let check = validate_balance(&outcome.entries, ctx.balance_tolerance);
        prop_assert!(check.is_balanced, "difference: {}", check.difference);
    }

    /// *For any* sale that takes in old metal, the closing cash debit SHALL
    /// shrink by exactly the old-metal value and the set SHALL balance.
    #[test]
    fn prop_sale_with_exchange_balances(
        net_weight in weight(),
        purity in karat(),
        metal_rate in rate(),
        old_weight in weight(),
        old_rate in rate(),
    ) {
        let ctx = context();
        let header = header("TESSERA.JEWELRY.POS.SALE.TXN.v1", "KA");
        let lines = vec![
            line(1, "TESSERA.JEWELRY.POS.LINE.ITEM.v1", Decimal::ZERO, json!({
                "net_weight": net_weight.to_string(),
                "purity_karat": purity.to_string(),
                "rate_per_gram": metal_rate.to_string(),
            })),
            line(2, "TESSERA.JEWELRY.POS.LINE.EXCHANGE.v1", Decimal::ZERO, json!({
                "net_weight": old_weight.to_string(),
                "purity_factor": "0.75",
                "rate_per_gram": old_rate.to_string(),
            })),
        ];

        let outcome = JewelryPack::new().process(&header, &lines, &ctx);
        prop_assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

        let check = validate_balance(&outcome.entries, ctx.balance_tolerance);
        prop_assert!(check.is_balanced, "difference: {}", check.difference);
    }

    /// *For any* melt reconciliation, gain and loss SHALL be mutually
    /// exclusive (never both posted) and the set SHALL balance.
    #[test]
    fn prop_melt_gain_loss_exclusive(
        net_weight in weight(),
        metal_rate in rate(),
        book in (100i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    ) {
        let ctx = context();
        let header = header("TESSERA.JEWELRY.MELT.RECON.TXN.v1", "KA");
        let lines = vec![
            line(1, "TESSERA.JEWELRY.MELT.LINE.ITEM.v1", Decimal::ZERO, json!({
                "book_value": book.to_string(),
                "net_weight": net_weight.to_string(),
                "purity_factor": "0.75",
                "rate_per_gram": metal_rate.to_string(),
            })),
        ];

        let outcome = JewelryPack::new().process(&header, &lines, &ctx);
        prop_assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

        let gain: Decimal = outcome.entries.iter()
            .filter(|e| e.account_code == "4920")
            .map(|e| e.credit)
            .sum();
        let loss: Decimal = outcome.entries.iter()
            .filter(|e| e.account_code == "5920")
            .map(|e| e.debit)
            .sum();
        prop_assert!(
            gain.is_zero() || loss.is_zero(),
            "gain {gain} and loss {loss} posted together"
        );

        let check = validate_balance(&outcome.entries, ctx.balance_tolerance);
        prop_assert!(check.is_balanced, "difference: {}", check.difference);
    }
}
