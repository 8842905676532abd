//! Fund Registry
//!
//! Maps fund names to directories under a base directory, one subdirectory
//! per fund. The directory name is the fund name, so names must be safe
//! path components and unique.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::FundEngine;
use crate::errors::{FundError, FundResult};
use crate::file_store::{JsonFileStore, FUND_FILE};
use crate::store::FundStore;
use crate::types::{validate_roster, Amount, DurationUnit, FundPhase, FundTerms};

/// Longest accepted fund name
pub const MAX_FUND_NAME_LEN: usize = 64;

/// One line of the fund listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundSummary {
    pub name: String,
    pub contribution_amount: Amount,
    pub duration_unit: DurationUnit,
    pub duration_count: u32,
    pub members: usize,
    pub current_round: u32,
    pub total_rounds: u32,
    pub phase: FundPhase,
}

/// Check that a fund name can be used as a directory name
pub fn validate_fund_name(name: &str) -> FundResult<()> {
    let invalid = |reason: &str| FundError::InvalidFundName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name != name.trim() {
        return Err(invalid("name cannot start or end with whitespace"));
    }
    if name.chars().count() > MAX_FUND_NAME_LEN {
        return Err(invalid("name is too long"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    if name.contains('\0') || name.chars().any(char::is_control) {
        return Err(invalid("name cannot contain control characters"));
    }
    if name == "." || name == ".." || name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    Ok(())
}

/// Directory-backed registry of funds
#[derive(Debug, Clone)]
pub struct FundRegistry {
    base_dir: PathBuf,
}

impl FundRegistry {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory a fund with this name lives in (whether or not it exists)
    pub fn fund_dir(&self, name: &str) -> FundResult<PathBuf> {
        validate_fund_name(name)?;
        Ok(self.base_dir.join(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.fund_dir(name)
            .map(|dir| dir.join(FUND_FILE).is_file())
            .unwrap_or(false)
    }

    /// Names of all funds, sorted. A missing base directory means no funds.
    pub fn list_funds(&self) -> FundResult<Vec<String>> {
        let base = self.base_dir.display().to_string();
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FundError::persistence(base, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FundError::persistence(&base, e))?;
            let path = entry.path();
            if !path.is_dir() || !path.join(FUND_FILE).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve an existing fund to its directory
    pub fn resolve(&self, name: &str) -> FundResult<PathBuf> {
        let dir = self.fund_dir(name)?;
        if !dir.join(FUND_FILE).is_file() {
            return Err(FundError::InvalidFundName {
                name: name.to_string(),
                reason: "no such fund".to_string(),
            });
        }
        Ok(dir)
    }

    /// Create a fund directory and its initial records
    pub fn create_fund(
        &self,
        name: &str,
        terms: FundTerms,
        roster: &[String],
    ) -> FundResult<FundEngine<JsonFileStore>> {
        self.create_fund_with(name, terms, roster, JsonFileStore::new)
    }

    /// Create a fund whose records go through the store built for its directory.
    ///
    /// A directory without `fund.json` is not a fund and may be reused. If
    /// the initial commit fails, a directory made by this call is removed.
    pub(crate) fn create_fund_with<S, F>(
        &self,
        name: &str,
        terms: FundTerms,
        roster: &[String],
        make_store: F,
    ) -> FundResult<FundEngine<S>>
    where
        S: FundStore,
        F: FnOnce(PathBuf) -> S,
    {
        let dir = self.fund_dir(name)?;
        if dir.join(FUND_FILE).is_file() {
            return Err(FundError::InvalidFundName {
                name: name.to_string(),
                reason: "a fund with this name already exists".to_string(),
            });
        }
        terms.validate()?;
        validate_roster(roster)?;

        let created_dir = !dir.exists();
        fs::create_dir_all(&dir).map_err(|e| FundError::persistence(dir.display().to_string(), e))?;
        debug!(dir = %dir.display(), reused = !created_dir, "fund directory ready");

        FundEngine::create(make_store(dir.clone()), name, terms, roster).map_err(|e| {
            if created_dir {
                if let Err(cleanup) = fs::remove_dir_all(&dir) {
                    warn!(dir = %dir.display(), error = %cleanup, "could not remove fund directory");
                }
            }
            e
        })
    }

    /// Load an existing fund
    pub fn open_fund(&self, name: &str) -> FundResult<FundEngine<JsonFileStore>> {
        let dir = self.resolve(name)?;
        FundEngine::open(JsonFileStore::new(dir))
    }

    /// Summaries of every readable fund; unreadable funds are skipped
    pub fn summaries(&self) -> FundResult<Vec<FundSummary>> {
        let mut summaries = Vec::new();
        for name in self.list_funds()? {
            let store = JsonFileStore::new(self.base_dir.join(&name));
            match store.load_ledger() {
                Ok(ledger) => summaries.push(FundSummary {
                    name,
                    contribution_amount: ledger.fund.contribution_amount,
                    duration_unit: ledger.fund.duration_unit,
                    duration_count: ledger.fund.duration_count,
                    members: ledger.members.len(),
                    current_round: ledger.state.current_round,
                    total_rounds: ledger.fund.total_rounds,
                    phase: ledger.phase(),
                }),
                Err(e) => warn!(fund = %name, error = %e, "skipping unreadable fund"),
            }
        }
        Ok(summaries)
    }
}
