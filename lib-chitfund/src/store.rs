//! Fund persistence abstraction
//!
//! The engine never touches storage directly. It loads a [`FundLedger`]
//! through [`FundStore`] and writes back through a single
//! [`FundStore::commit`] call per logical operation.

use std::cell::{Cell, RefCell};
use tracing::warn;

use crate::errors::{FundError, FundResult};
use crate::types::{Fund, FundLedger, FundState, Member, Transaction};

/// One entity write inside a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOp {
    Fund(Fund),
    Members(Vec<Member>),
    Transactions(Vec<Transaction>),
    State(FundState),
}

impl CommitOp {
    pub fn entity(&self) -> &'static str {
        match self {
            CommitOp::Fund(_) => "fund",
            CommitOp::Members(_) => "members",
            CommitOp::Transactions(_) => "transactions",
            CommitOp::State(_) => "state",
        }
    }
}

/// Trait for fund storage operations
///
/// One store instance serves exactly one fund.
pub trait FundStore {
    fn load_fund(&self) -> FundResult<Fund>;

    fn load_members(&self) -> FundResult<Vec<Member>>;

    fn load_transactions(&self) -> FundResult<Vec<Transaction>>;

    fn load_state(&self) -> FundResult<FundState>;

    /// Persist a group of entity writes.
    ///
    /// Implementations must not leave a partially written entity behind.
    fn commit(&self, ops: Vec<CommitOp>) -> FundResult<()>;

    /// Load all four entities.
    ///
    /// Fund metadata is mandatory. Members, transactions and state fall back
    /// to empty values when missing or unreadable.
    fn load_ledger(&self) -> FundResult<FundLedger> {
        let fund = self.load_fund()?;

        let members = self.load_members().unwrap_or_else(|e| {
            warn!(fund = %fund.name, error = %e, "members unavailable, starting with an empty roster");
            Vec::new()
        });
        let transactions = self.load_transactions().unwrap_or_else(|e| {
            warn!(fund = %fund.name, error = %e, "transactions unavailable, starting with an empty log");
            Vec::new()
        });
        let state = self.load_state().unwrap_or_else(|e| {
            warn!(fund = %fund.name, error = %e, "state unavailable, starting from round 0");
            FundState::default()
        });

        Ok(FundLedger {
            fund,
            members,
            transactions,
            state,
        })
    }
}

/// In-process store, used for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryFundStore {
    fund: RefCell<Option<Fund>>,
    members: RefCell<Option<Vec<Member>>>,
    transactions: RefCell<Option<Vec<Transaction>>>,
    state: RefCell<Option<FundState>>,
    commits: Cell<usize>,
    fail_commits: Cell<bool>,
}

impl MemoryFundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a full ledger
    pub fn with_ledger(ledger: &FundLedger) -> Self {
        let store = Self::new();
        *store.fund.borrow_mut() = Some(ledger.fund.clone());
        *store.members.borrow_mut() = Some(ledger.members.clone());
        *store.transactions.borrow_mut() = Some(ledger.transactions.clone());
        *store.state.borrow_mut() = Some(ledger.state.clone());
        store
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }

    /// Make every following commit fail, simulating an unwritable medium
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.set(fail);
    }
}

impl FundStore for MemoryFundStore {
    fn load_fund(&self) -> FundResult<Fund> {
        self.fund
            .borrow()
            .clone()
            .ok_or_else(|| FundError::persistence("memory:fund", "no fund stored"))
    }

    fn load_members(&self) -> FundResult<Vec<Member>> {
        self.members
            .borrow()
            .clone()
            .ok_or_else(|| FundError::persistence("memory:members", "no members stored"))
    }

    fn load_transactions(&self) -> FundResult<Vec<Transaction>> {
        self.transactions
            .borrow()
            .clone()
            .ok_or_else(|| FundError::persistence("memory:transactions", "no transactions stored"))
    }

    fn load_state(&self) -> FundResult<FundState> {
        self.state
            .borrow()
            .clone()
            .ok_or_else(|| FundError::persistence("memory:state", "no state stored"))
    }

    fn commit(&self, ops: Vec<CommitOp>) -> FundResult<()> {
        if self.fail_commits.get() {
            return Err(FundError::persistence("memory", "commit rejected"));
        }
        for op in ops {
            match op {
                CommitOp::Fund(fund) => *self.fund.borrow_mut() = Some(fund),
                CommitOp::Members(members) => *self.members.borrow_mut() = Some(members),
                CommitOp::Transactions(txs) => *self.transactions.borrow_mut() = Some(txs),
                CommitOp::State(state) => *self.state.borrow_mut() = Some(state),
            }
        }
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DurationUnit, FundTerms};

    fn ledger() -> FundLedger {
        FundLedger::new(
            "Test",
            FundTerms::new(100, DurationUnit::Weekly, 4),
            &["Asha".to_string(), "Ben".to_string()],
        )
    }

    #[test]
    fn test_load_ledger_roundtrip() {
        let original = ledger();
        let store = MemoryFundStore::with_ledger(&original);
        assert_eq!(store.load_ledger().unwrap(), original);
    }

    #[test]
    fn test_load_ledger_requires_fund() {
        let store = MemoryFundStore::new();
        assert!(matches!(store.load_ledger(), Err(FundError::Persistence { .. })));
    }

    #[test]
    fn test_load_ledger_falls_back_for_missing_collections() {
        let store = MemoryFundStore::new();
        store
            .commit(vec![CommitOp::Fund(ledger().fund)])
            .unwrap();

        let loaded = store.load_ledger().unwrap();
        assert!(loaded.members.is_empty());
        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.state, FundState::default());
    }

    #[test]
    fn test_failed_commit_writes_nothing() {
        let original = ledger();
        let store = MemoryFundStore::with_ledger(&original);
        store.set_fail_commits(true);

        let result = store.commit(vec![CommitOp::Members(Vec::new())]);
        assert!(result.is_err());
        assert_eq!(store.load_members().unwrap(), original.members);
        assert_eq!(store.commit_count(), 0);
    }
}
