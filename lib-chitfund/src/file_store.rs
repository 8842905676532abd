//! JSON file store
//!
//! Each fund lives in its own directory holding four files:
//! `fund.json`, `members.json`, `transactions.json` and `state.json`.
//!
//! Commits are staged: every entity is serialized first, then written to a
//! `*.json.tmp` sibling, and only when all temp files are durable are they
//! renamed over the live files. A failure before the rename phase leaves the
//! live files untouched.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{FundError, FundResult};
use crate::store::{CommitOp, FundStore};
use crate::types::{Fund, FundState, Member, Transaction};

pub const FUND_FILE: &str = "fund.json";
pub const MEMBERS_FILE: &str = "members.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";
pub const STATE_FILE: &str = "state.json";

/// File-backed store for a single fund directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, op: &CommitOp) -> PathBuf {
        let file = match op {
            CommitOp::Fund(_) => FUND_FILE,
            CommitOp::Members(_) => MEMBERS_FILE,
            CommitOp::Transactions(_) => TRANSACTIONS_FILE,
            CommitOp::State(_) => STATE_FILE,
        };
        self.dir.join(file)
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> FundResult<T> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path).map_err(|e| FundError::persistence(path.display().to_string(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| FundError::persistence(path.display().to_string(), e))
    }
}

fn serialize(op: &CommitOp) -> serde_json::Result<Vec<u8>> {
    match op {
        CommitOp::Fund(fund) => serde_json::to_vec_pretty(fund),
        CommitOp::Members(members) => serde_json::to_vec_pretty(members),
        CommitOp::Transactions(txs) => serde_json::to_vec_pretty(txs),
        CommitOp::State(state) => serde_json::to_vec_pretty(state),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

/// Write bytes to the temp sibling of `path` and sync it
fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let tmp = temp_path(path);
    let mut f = fs::File::create(&tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    Ok(tmp)
}

impl FundStore for JsonFileStore {
    fn load_fund(&self) -> FundResult<Fund> {
        self.read(FUND_FILE)
    }

    fn load_members(&self) -> FundResult<Vec<Member>> {
        self.read(MEMBERS_FILE)
    }

    fn load_transactions(&self) -> FundResult<Vec<Transaction>> {
        self.read(TRANSACTIONS_FILE)
    }

    fn load_state(&self) -> FundResult<FundState> {
        self.read(STATE_FILE)
    }

    fn commit(&self, ops: Vec<CommitOp>) -> FundResult<()> {
        let dir = self.dir.display().to_string();

        let mut encoded = Vec::with_capacity(ops.len());
        for op in &ops {
            let bytes = serialize(op).map_err(|e| FundError::persistence(&dir, e))?;
            encoded.push((self.path_for(op), bytes));
        }

        fs::create_dir_all(&self.dir).map_err(|e| FundError::persistence(&dir, e))?;

        let mut staged = Vec::with_capacity(encoded.len());
        for (path, bytes) in &encoded {
            match stage(path, bytes) {
                Ok(tmp) => staged.push((tmp, path.clone())),
                Err(e) => {
                    for (tmp, _) in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(FundError::persistence(path.display().to_string(), e));
                }
            }
        }

        for (tmp, path) in &staged {
            fs::rename(tmp, path).map_err(|e| FundError::persistence(path.display().to_string(), e))?;
        }

        // Sync directory for durability on POSIX systems
        if let Ok(d) = fs::File::open(&self.dir) {
            let _ = d.sync_all();
        }

        debug!(
            dir = %dir,
            entities = ?ops.iter().map(CommitOp::entity).collect::<Vec<_>>(),
            "committed fund entities"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DurationUnit, FundLedger, FundTerms};
    use tempfile::TempDir;

    fn ledger() -> FundLedger {
        FundLedger::new(
            "Savings",
            FundTerms::new(250, DurationUnit::Monthly, 12),
            &["Asha".to_string(), "Ben".to_string()],
        )
    }

    fn commit_all(store: &JsonFileStore, ledger: &FundLedger) {
        store
            .commit(vec![
                CommitOp::Fund(ledger.fund.clone()),
                CommitOp::Members(ledger.members.clone()),
                CommitOp::Transactions(ledger.transactions.clone()),
                CommitOp::State(ledger.state.clone()),
            ])
            .unwrap();
    }

    #[test]
    fn test_commit_writes_all_files() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("Savings"));
        commit_all(&store, &ledger());

        for file in [FUND_FILE, MEMBERS_FILE, TRANSACTIONS_FILE, STATE_FILE] {
            assert!(store.dir().join(file).exists(), "{} missing", file);
            assert!(!store.dir().join(file).with_extension("json.tmp").exists());
        }
        assert_eq!(store.load_ledger().unwrap(), ledger());
    }

    #[test]
    fn test_fund_json_field_names() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        commit_all(&store, &ledger());

        let raw = fs::read_to_string(tmp.path().join(FUND_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["fundName"], "Savings");
        assert_eq!(value["contributionAmount"], 250);
        assert_eq!(value["durationType"], "Monthly");
        assert_eq!(value["durationCount"], 12);
        assert_eq!(value["totalRounds"], 2);
    }

    #[test]
    fn test_missing_fund_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert!(matches!(store.load_ledger(), Err(FundError::Persistence { .. })));
    }

    #[test]
    fn test_malformed_members_fall_back_to_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        commit_all(&store, &ledger());
        fs::write(tmp.path().join(MEMBERS_FILE), "{not json").unwrap();
        fs::remove_file(tmp.path().join(TRANSACTIONS_FILE)).unwrap();

        let loaded = store.load_ledger().unwrap();
        assert!(loaded.members.is_empty());
        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.fund.name, "Savings");
    }

    #[test]
    fn test_malformed_fund_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        commit_all(&store, &ledger());
        fs::write(tmp.path().join(FUND_FILE), "[]").unwrap();

        assert!(matches!(store.load_fund(), Err(FundError::Persistence { .. })));
    }
}
