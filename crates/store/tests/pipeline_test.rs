//! Integration tests driving the full substrate pipeline:
//! organization -> entities -> transaction -> dispatch -> balance check.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use tessera_core::entity::{DynamicValue, EntityService, NewEntity};
use tessera_core::finance::{
    AccountRole, FinanceContext, FinanceContextResolver, GlAccount, StaticContextResolver,
    TaxProfile, validate_balance,
};
use tessera_core::jewelry::{self, JewelryPack};
use tessera_core::rules::RuleRegistry;
use tessera_core::store::TransactionStore;
use tessera_core::transaction::{
    NewTransaction, NewTransactionLine, TransactionService, TransactionStatus, build_reversal,
};
use tessera_shared::config::FinanceDefaults;
use tessera_shared::types::OrganizationId;
use tessera_store::MemoryStore;

fn finance_context(organization: OrganizationId, home: &str) -> FinanceContext {
    FinanceContext::new(
        organization,
        "INR",
        home,
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
    .with_account(
        AccountRole::OldMetalInventory,
        GlAccount::new("1320", "Old Metal Inventory"),
    )
}

fn item_line(number: u32) -> NewTransactionLine {
    NewTransactionLine {
        line_number: number,
        entity_id: None,
        quantity: dec!(1),
        unit_amount: dec!(50833.33),
        line_amount: dec!(50833.33),
        smart_code: "TESSERA.JEWELRY.POS.LINE.ITEM.v1".to_string(),
        payload: json!({
            "net_weight": "10",
            "purity_karat": "22",
            "rate_per_gram": "5000",
            "making": {"charge_type": "per_gram", "rate": "500"}
        }),
    }
}

fn tax_line(number: u32) -> NewTransactionLine {
    NewTransactionLine {
        line_number: number,
        entity_id: None,
        quantity: dec!(1),
        unit_amount: dec!(1525),
        line_amount: dec!(1525),
        smart_code: "TESSERA.JEWELRY.POS.LINE.TAX.v1".to_string(),
        payload: json!({}),
    }
}

fn sale(total: Decimal, place_of_supply: &str) -> NewTransaction {
    NewTransaction {
        transaction_type: "pos_sale".to_string(),
        smart_code: "TESSERA.JEWELRY.POS.SALE.TXN.v1".to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        total_amount: total,
        reference_entity: None,
        metadata: json!({ "place_of_supply": place_of_supply }),
    }
}

#[test]
fn test_full_pipeline_sale_to_balanced_entries() {
    // Entity side: organization, customer, product with dynamic attributes.
    let mut entities = EntityService::new(MemoryStore::new());
    let org = entities
        .create_organization("Aurora Jewels", Some("AUR"), json!({}))
        .unwrap();
    let customer = entities
        .create_entity(
            org,
            NewEntity {
                entity_type: "customer".to_string(),
                name: "R. Sharma".to_string(),
                code: None,
                smart_code: "TESSERA.JEWELRY.CRM.CUSTOMER.ENT.v1".to_string(),
                metadata: json!({}),
            },
        )
        .unwrap();
    entities
        .set_dynamic_field(
            org,
            customer,
            "loyalty_tier",
            DynamicValue::Text("gold".to_string()),
            None,
        )
        .unwrap();

    // Transaction side: header + lines, confirmed then posted.
    let mut transactions = TransactionService::new(entities.into_store());
    let txn = transactions
        .create_transaction(org, sale(dec!(52358.33), "KA"))
        .unwrap();
    transactions.add_line(org, txn, item_line(1)).unwrap();
    transactions.add_line(org, txn, tax_line(2)).unwrap();

    let recon = transactions
        .line_reconciliation(org, txn, dec!(0.01))
        .unwrap();
    assert!(recon.within_tolerance, "difference: {}", recon.difference);

    transactions
        .update_status(org, txn, TransactionStatus::Confirmed)
        .unwrap();

    // Rule side: resolve context, dispatch, validate balance.
    let mut registry = RuleRegistry::new();
    registry.register(jewelry::DOMAIN, Box::new(JewelryPack::new()));

    let mut resolver = StaticContextResolver::new();
    resolver.insert(finance_context(org, "KA"));
    let context = resolver.resolve(org).unwrap();

    let store = transactions.into_store();
    let header = store.header(org, txn).unwrap().unwrap();
    let lines = store.lines(org, txn).unwrap();

    let result = registry.dispatch(&header, &lines, &context);
    assert!(result.is_clean(), "errors: {:?}", result.errors);

    let check = validate_balance(&result.entries, context.balance_tolerance);
    assert!(check.is_balanced, "difference: {}", check.difference);

    // Cash collects item revenue plus tax.
    let cash: Decimal = result
        .entries
        .iter()
        .filter(|e| e.account_code == "1000")
        .map(|e| e.debit)
        .sum();
    assert_eq!(cash, dec!(52358.33));
}

#[test]
fn test_identical_transactions_in_different_organizations_stay_isolated() {
    let mut transactions = TransactionService::new(MemoryStore::new());
    let org_a = OrganizationId::new();
    let org_b = OrganizationId::new();

    let txn_a = transactions
        .create_transaction(org_a, sale(dec!(52358.33), "KA"))
        .unwrap();
    let txn_b = transactions
        .create_transaction(org_b, sale(dec!(52358.33), "KA"))
        .unwrap();
    for (org, txn) in [(org_a, txn_a), (org_b, txn_b)] {
        transactions.add_line(org, txn, item_line(1)).unwrap();
        transactions.add_line(org, txn, tax_line(2)).unwrap();
    }

    // Context resolution is strictly keyed by organization id; org B is
    // home in a different jurisdiction.
    let mut resolver = StaticContextResolver::new();
    resolver.insert(finance_context(org_a, "KA"));
    resolver.insert(finance_context(org_b, "MH"));

    let mut registry = RuleRegistry::new();
    registry.register(jewelry::DOMAIN, Box::new(JewelryPack::new()));

    let store = transactions.into_store();
    let mut tax_accounts = Vec::new();
    for (org, txn) in [(org_a, txn_a), (org_b, txn_b)] {
        let context = resolver.resolve(org).unwrap();
        let header = store.header(org, txn).unwrap().unwrap();
        let lines = store.lines(org, txn).unwrap();

        let result = registry.dispatch(&header, &lines, &context);
        assert!(result.is_clean(), "errors: {:?}", result.errors);
        assert!(validate_balance(&result.entries, context.balance_tolerance).is_balanced);

        let mut codes: Vec<String> = result
            .entries
            .iter()
            .filter(|e| e.account_code.starts_with("23"))
            .map(|e| e.account_code.clone())
            .collect();
        codes.sort();
        tax_accounts.push(codes);
    }

    // Same content, different tenants: org A (sale at home) splits the tax
    // across the two same-jurisdiction accounts, org B (sale away from its
    // home jurisdiction) posts it to the interstate account.
    assert_eq!(tax_accounts[0], vec!["2301".to_string(), "2302".to_string()]);
    assert_eq!(tax_accounts[1], vec!["2303".to_string()]);
}

#[test]
fn test_posted_header_is_corrected_by_reversal() {
    let mut transactions = TransactionService::new(MemoryStore::new());
    let org = OrganizationId::new();
    let txn = transactions
        .create_transaction(org, sale(dec!(52358.33), "KA"))
        .unwrap();
    transactions.add_line(org, txn, item_line(1)).unwrap();
    transactions.add_line(org, txn, tax_line(2)).unwrap();
    transactions
        .update_status(org, txn, TransactionStatus::Confirmed)
        .unwrap();
    transactions
        .update_status(org, txn, TransactionStatus::Posted)
        .unwrap();

    // Posted headers reject further edits...
    assert!(transactions.add_line(org, txn, tax_line(3)).is_err());
    assert!(
        transactions
            .update_status(org, txn, TransactionStatus::Cancelled)
            .is_err()
    );

    // ...so the correction is a compensating transaction.
    let header = transactions.store().header(org, txn).unwrap().unwrap();
    let lines = transactions.store().lines(org, txn).unwrap();
    let (reversal, reversal_lines) = build_reversal(&header, &lines, "pricing error").unwrap();

    assert_eq!(reversal.total_amount, dec!(-52358.33));
    let reversal_txn = transactions.create_transaction(org, reversal).unwrap();
    for line in reversal_lines {
        transactions.add_line(org, reversal_txn, line).unwrap();
    }

    let recon = transactions
        .line_reconciliation(org, reversal_txn, dec!(0.01))
        .unwrap();
    assert!(recon.within_tolerance);
}

#[test]
fn test_dynamic_data_round_trips_through_the_store() {
    let mut entities = EntityService::new(MemoryStore::new());
    let org = entities
        .create_organization("Aurora Jewels", None, json!({}))
        .unwrap();
    let product = entities
        .create_entity(
            org,
            NewEntity {
                entity_type: "product".to_string(),
                name: "22K Bangle".to_string(),
                code: Some("BNG-001".to_string()),
                smart_code: "TESSERA.JEWELRY.PRODUCT.BANGLE.ENT.v1".to_string(),
                metadata: json!({}),
            },
        )
        .unwrap();

    entities
        .set_dynamic_field(org, product, "purity_karat", DynamicValue::Number(dec!(22)), None)
        .unwrap();
    entities
        .set_dynamic_field(
            org,
            product,
            "hallmarked",
            DynamicValue::Boolean(true),
            Some("TESSERA.JEWELRY.PRODUCT.HALLMARK.FIELD.v1".to_string()),
        )
        .unwrap();

    let data = entities.dynamic_data(org, product).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data["purity_karat"].as_number(), Some(dec!(22)));
    assert_eq!(data["hallmarked"], DynamicValue::Boolean(true));

    // The same entity id under a different organization resolves to nothing.
    let other_org = entities
        .create_organization("Other Tenant", None, json!({}))
        .unwrap();
    assert!(entities.dynamic_data(other_org, product).is_err());
}
