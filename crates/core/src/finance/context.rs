//! Per-organization finance context.
//!
//! The context is read-only input supplied by an organization configuration
//! service: base currency, home jurisdiction, tax profile, and the mapping
//! from ledger roles to GL accounts. Resolution is strictly keyed by
//! organization id - two organizations never share a context.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::config::FinanceDefaults;
use tessera_shared::types::OrganizationId;
use tessera_shared::{AppError, AppResult};

/// A GL account reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlAccount {
    /// Account code in the organization's chart of accounts.
    pub code: String,
    /// Display name.
    pub name: String,
}

impl GlAccount {
    /// Creates an account reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Ledger roles that rule processors post to.
///
/// The finance context maps each role an organization uses to a concrete
/// account; processors never hard-code account numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Cash or bank clearing account.
    Cash,
    /// Metal sales revenue.
    SalesRevenue,
    /// Making / labor charge revenue.
    MakingRevenue,
    /// Gemstone sales revenue.
    GemstoneRevenue,
    /// New metal inventory.
    MetalInventory,
    /// Old metal taken in exchange.
    OldMetalInventory,
    /// Finished goods inventory.
    FinishedInventory,
    /// Recovered scrap inventory.
    ScrapInventory,
    /// Work-in-progress with job workers.
    JobworkWip,
    /// Making charges payable to job workers.
    MakingPayable,
    /// Liability owed to customers for exchanged metal.
    ExchangeLiability,
    /// Rounding adjustments in the organization's favor.
    RoundingGain,
    /// Rounding adjustments against the organization.
    RoundingLoss,
    /// Melt recovery above book value.
    MeltGain,
    /// Melt recovery below book value.
    MeltLoss,
}

/// Tax configuration for an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Default tax rate in percent, applied when a tax line carries no amount.
    pub default_rate: Decimal,
    /// The two accounts a same-jurisdiction tax amount is split across.
    pub same_jurisdiction_accounts: [GlAccount; 2],
    /// The single account a cross-jurisdiction tax amount posts to.
    pub cross_jurisdiction_account: GlAccount,
}

/// Read-only per-organization finance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceContext {
    /// The organization this context belongs to.
    pub organization_id: OrganizationId,
    /// ISO 4217 base currency code.
    pub base_currency: String,
    /// The organization's home jurisdiction code.
    pub home_jurisdiction: String,
    /// Tax configuration.
    pub tax_profile: TaxProfile,
    /// Role-to-account mapping.
    pub gl_accounts: HashMap<AccountRole, GlAccount>,
    /// Balance tolerance in minor currency units (debits vs credits).
    pub balance_tolerance: Decimal,
}

impl FinanceContext {
    /// Creates a context with defaults from engine configuration and an
    /// empty account map.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        base_currency: impl Into<String>,
        home_jurisdiction: impl Into<String>,
        tax_profile: TaxProfile,
        defaults: &FinanceDefaults,
    ) -> Self {
        Self {
            organization_id,
            base_currency: base_currency.into(),
            home_jurisdiction: home_jurisdiction.into(),
            tax_profile,
            gl_accounts: HashMap::new(),
            balance_tolerance: defaults.balance_tolerance,
        }
    }

    /// Maps a ledger role to an account (builder style).
    #[must_use]
    pub fn with_account(mut self, role: AccountRole, account: GlAccount) -> Self {
        self.gl_accounts.insert(role, account);
        self
    }

    /// Looks up the account mapped to a role.
    #[must_use]
    pub fn account(&self, role: AccountRole) -> Option<&GlAccount> {
        self.gl_accounts.get(&role)
    }
}

/// External collaborator supplying finance contexts.
///
/// Resolution is strictly keyed by organization id; implementations must not
/// fall back to another tenant's configuration.
pub trait FinanceContextResolver {
    /// Resolves the finance context for an organization.
    ///
    /// # Errors
    ///
    /// Returns not-found when no context is configured for the organization.
    fn resolve(&self, organization: OrganizationId) -> AppResult<FinanceContext>;
}

/// In-memory resolver for tests and static wiring.
#[derive(Debug, Default)]
pub struct StaticContextResolver {
    contexts: HashMap<OrganizationId, FinanceContext>,
}

impl StaticContextResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a context under its organization id.
    pub fn insert(&mut self, context: FinanceContext) {
        self.contexts.insert(context.organization_id, context);
    }
}

impl FinanceContextResolver for StaticContextResolver {
    fn resolve(&self, organization: OrganizationId) -> AppResult<FinanceContext> {
        self.contexts.get(&organization).cloned().ok_or_else(|| {
            AppError::NotFound(format!("no finance context for organization {organization}"))
        })
    }
}
