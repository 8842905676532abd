//! Fund data model
//!
//! The four persisted entities (Fund, Member, Transaction, FundState) and the
//! in-memory [`FundLedger`] that groups them for one fund.
//!
//! Field names on disk follow the established JSON layout (`fundName`,
//! `userID`, `currentRoundContributions`, ...), so every struct carries
//! explicit serde renames.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{FundError, FundResult};

/// Contribution and payout amounts, in minor currency units
pub type Amount = u64;

/// Sequential member identifier, unique within a fund (starts at 1)
pub type MemberId = u32;

/// Sequential transaction identifier, unique within a fund life (starts at 1)
pub type TransactionId = u32;

// =============================================================================
// FUND
// =============================================================================

/// Contribution cadence of a fund. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Weekly,
    Monthly,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Weekly => write!(f, "Weekly"),
            DurationUnit::Monthly => write!(f, "Monthly"),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = FundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" | "w" | "1" => Ok(DurationUnit::Weekly),
            "monthly" | "month" | "m" | "2" => Ok(DurationUnit::Monthly),
            other => Err(FundError::InvalidTerms(format!(
                "unknown duration unit '{}', expected Weekly or Monthly",
                other
            ))),
        }
    }
}

/// The editable terms of a fund, collected at creation and on edit-and-restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundTerms {
    pub contribution_amount: Amount,
    pub duration_unit: DurationUnit,
    pub duration_count: u32,
}

impl FundTerms {
    pub fn new(contribution_amount: Amount, duration_unit: DurationUnit, duration_count: u32) -> Self {
        Self {
            contribution_amount,
            duration_unit,
            duration_count,
        }
    }

    /// Check that amount and duration are both positive
    pub fn validate(&self) -> FundResult<()> {
        if self.contribution_amount == 0 {
            return Err(FundError::InvalidTerms(
                "contribution amount must be greater than zero".to_string(),
            ));
        }
        if self.duration_count == 0 {
            return Err(FundError::InvalidTerms(
                "duration count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fund metadata (`fund.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    #[serde(rename = "fundName")]
    pub name: String,
    #[serde(rename = "contributionAmount")]
    pub contribution_amount: Amount,
    #[serde(rename = "durationType")]
    pub duration_unit: DurationUnit,
    #[serde(rename = "durationCount")]
    pub duration_count: u32,
    #[serde(rename = "totalRounds")]
    pub total_rounds: u32,
}

impl Fund {
    pub fn new(name: impl Into<String>, terms: FundTerms, total_rounds: u32) -> Self {
        Self {
            name: name.into(),
            contribution_amount: terms.contribution_amount,
            duration_unit: terms.duration_unit,
            duration_count: terms.duration_count,
            total_rounds,
        }
    }

    pub fn terms(&self) -> FundTerms {
        FundTerms::new(self.contribution_amount, self.duration_unit, self.duration_count)
    }
}

// =============================================================================
// MEMBER
// =============================================================================

/// A fund participant (`members.json` entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "userID")]
    pub id: MemberId,
    pub name: String,
    /// Lifetime net: +contribution per deposit, -pool per payout received
    pub balance: i64,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: 0,
        }
    }

    /// Case-insensitive exact name match
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Payout,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "Deposit"),
            TransactionKind::Payout => write!(f, "Payout"),
        }
    }
}

/// Append-only log entry (`transactions.json` entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "transactionID")]
    pub id: TransactionId,
    #[serde(rename = "userID")]
    pub member_id: MemberId,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// 1-based round the transaction belongs to
    pub round: u32,
}

// =============================================================================
// FUND STATE
// =============================================================================

/// Round progress (`state.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundState {
    /// Completed rounds; 0 means no payout has happened yet
    #[serde(rename = "currentRound")]
    pub current_round: u32,
    /// Members who deposited in the round in progress
    #[serde(rename = "currentRoundContributions")]
    pub contributed_this_round: BTreeSet<MemberId>,
    /// Members who already won a payout in this fund life
    #[serde(rename = "winners")]
    pub paid_members: BTreeSet<MemberId>,
}

impl FundState {
    /// Enrollment stays open until the first contribution of the fund life
    pub fn enrollment_open(&self) -> bool {
        self.current_round == 0 && self.contributed_this_round.is_empty()
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Lifecycle phase derived from the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundPhase {
    Active,
    Completed,
}

impl fmt::Display for FundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundPhase::Active => write!(f, "Active"),
            FundPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// All four entities of one fund, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundLedger {
    pub fund: Fund,
    pub members: Vec<Member>,
    pub transactions: Vec<Transaction>,
    pub state: FundState,
}

impl FundLedger {
    /// Fresh ledger: members numbered from 1, no transactions, round 0
    pub fn new(name: impl Into<String>, terms: FundTerms, roster: &[String]) -> Self {
        let members = build_roster(roster);
        let total_rounds = members.len() as u32;
        Self {
            fund: Fund::new(name, terms, total_rounds),
            members,
            transactions: Vec::new(),
            state: FundState::default(),
        }
    }

    /// An empty roster counts as Active only while enrollment is open.
    pub fn phase(&self) -> FundPhase {
        if self.members.is_empty() && self.state.enrollment_open() {
            return FundPhase::Active;
        }
        let all_paid = self
            .members
            .iter()
            .all(|m| self.state.paid_members.contains(&m.id));
        if self.state.current_round >= self.fund.total_rounds || all_paid {
            FundPhase::Completed
        } else {
            FundPhase::Active
        }
    }

    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.matches_name(name))
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn next_member_id(&self) -> MemberId {
        self.members.len() as MemberId + 1
    }

    pub fn next_transaction_id(&self) -> TransactionId {
        self.transactions.len() as TransactionId + 1
    }

    /// 1-based number of the round in progress
    pub fn active_round(&self) -> u32 {
        self.state.current_round + 1
    }

    /// Contribution amount times member count
    pub fn pool(&self) -> FundResult<Amount> {
        self.fund
            .contribution_amount
            .checked_mul(self.members.len() as Amount)
            .ok_or(FundError::Overflow)
    }

    pub fn round_fully_funded(&self) -> bool {
        self.state.contributed_this_round.len() == self.members.len()
    }
}

fn build_roster(names: &[String]) -> Vec<Member> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Member::new(i as MemberId + 1, name.trim()))
        .collect()
}

/// Check a prospective roster: names non-blank and unique ignoring case
pub fn validate_roster(names: &[String]) -> FundResult<()> {
    for (i, name) in names.iter().enumerate() {
        validate_member_name(name)?;
        let lowered = name.trim().to_lowercase();
        if names[..i].iter().any(|n| n.trim().to_lowercase() == lowered) {
            return Err(FundError::DuplicateMemberName(name.trim().to_string()));
        }
    }
    Ok(())
}

pub fn validate_member_name(name: &str) -> FundResult<()> {
    if name.trim().is_empty() {
        return Err(FundError::InvalidMemberName(
            "member name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> FundTerms {
        FundTerms::new(100, DurationUnit::Monthly, 3)
    }

    #[test]
    fn test_duration_unit_parsing() {
        assert_eq!("weekly".parse::<DurationUnit>().unwrap(), DurationUnit::Weekly);
        assert_eq!("Monthly".parse::<DurationUnit>().unwrap(), DurationUnit::Monthly);
        assert_eq!("2".parse::<DurationUnit>().unwrap(), DurationUnit::Monthly);
        assert!("yearly".parse::<DurationUnit>().is_err());
    }

    #[test]
    fn test_terms_validation() {
        assert!(terms().validate().is_ok());
        assert!(FundTerms::new(0, DurationUnit::Weekly, 1).validate().is_err());
        assert!(FundTerms::new(10, DurationUnit::Weekly, 0).validate().is_err());
    }

    #[test]
    fn test_new_ledger_sequences_members() {
        let roster = vec!["Asha".to_string(), "Ben".to_string(), "Chitra".to_string()];
        let ledger = FundLedger::new("Test", terms(), &roster);

        assert_eq!(ledger.fund.total_rounds, 3);
        let ids: Vec<MemberId> = ledger.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ledger.next_member_id(), 4);
        assert_eq!(ledger.next_transaction_id(), 1);
        assert_eq!(ledger.pool().unwrap(), 300);
        assert_eq!(ledger.phase(), FundPhase::Active);
    }

    #[test]
    fn test_member_lookup_is_case_insensitive() {
        let roster = vec!["Asha".to_string()];
        let ledger = FundLedger::new("Test", terms(), &roster);

        assert_eq!(ledger.member_by_name("ASHA").map(|m| m.id), Some(1));
        assert!(ledger.member_by_name("Ash").is_none());
    }

    #[test]
    fn test_phase_completed_when_rounds_exhausted() {
        let roster = vec!["Asha".to_string()];
        let mut ledger = FundLedger::new("Test", terms(), &roster);
        ledger.state.current_round = 1;
        assert_eq!(ledger.phase(), FundPhase::Completed);
    }

    #[test]
    fn test_empty_roster_phase_follows_rounds_after_enrollment() {
        let mut ledger = FundLedger::new("Test", terms(), &[]);
        assert_eq!(ledger.phase(), FundPhase::Active);

        ledger.fund.total_rounds = 3;
        ledger.state.current_round = 3;
        assert_eq!(ledger.phase(), FundPhase::Completed);

        ledger.state.current_round = 1;
        assert_eq!(ledger.phase(), FundPhase::Completed);
    }

    #[test]
    fn test_roster_validation() {
        assert!(validate_roster(&["A".to_string(), "B".to_string()]).is_ok());
        assert!(matches!(
            validate_roster(&["Ann".to_string(), "ann ".to_string()]),
            Err(FundError::DuplicateMemberName(_))
        ));
        assert!(matches!(
            validate_roster(&["  ".to_string()]),
            Err(FundError::InvalidMemberName(_))
        ));
    }

    #[test]
    fn test_state_json_layout() {
        let mut state = FundState::default();
        state.current_round = 1;
        state.contributed_this_round.insert(2);
        state.paid_members.insert(3);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentRound"], 1);
        assert_eq!(json["currentRoundContributions"], serde_json::json!([2]));
        assert_eq!(json["winners"], serde_json::json!([3]));
    }

    #[test]
    fn test_transaction_json_layout() {
        let tx = Transaction {
            id: 1,
            member_id: 2,
            amount: 100,
            kind: TransactionKind::Deposit,
            round: 1,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["transactionID"], 1);
        assert_eq!(json["userID"], 2);
        assert_eq!(json["type"], "Deposit");
    }
}
