//! Fund Engine Errors
//!
//! Contributions and payouts on an empty roster fail with
//! [`FundError::NoMembers`] before any round or duplicate check runs.

use thiserror::Error;

/// Error during fund operations
#[derive(Error, Debug)]
pub enum FundError {
    #[error("Enrollment is closed: contributions have already begun in this fund")]
    EnrollmentClosed,

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Member '{name}' has already contributed in round {round}")]
    DuplicateContribution { name: String, round: u32 },

    #[error("Round incomplete: {contributed} of {required} members have contributed")]
    RoundIncomplete { contributed: usize, required: usize },

    #[error("All members have already received a payout")]
    AllMembersPaid,

    #[error("All rounds completed: round {current_round} of {total_rounds}")]
    RoundsExhausted { current_round: u32, total_rounds: u32 },

    #[error("Invalid fund name '{name}': {reason}")]
    InvalidFundName { name: String, reason: String },

    #[error("A member named '{0}' already exists")]
    DuplicateMemberName(String),

    #[error("Invalid member name: {0}")]
    InvalidMemberName(String),

    #[error("Invalid fund terms: {0}")]
    InvalidTerms(String),

    /// Checked first by `collect_contribution` and `payout_money`
    #[error("Fund has no members")]
    NoMembers,

    #[error("Fund is still active: round {current_round} of {total_rounds}")]
    FundNotCompleted { current_round: u32, total_rounds: u32 },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Persistence failure on {path}: {reason}")]
    Persistence { path: String, reason: String },
}

impl FundError {
    /// Errors that mean the fund has reached its `Completed` phase
    pub fn is_completion(&self) -> bool {
        matches!(self, FundError::AllMembersPaid | FundError::RoundsExhausted { .. })
    }

    pub(crate) fn persistence(path: impl Into<String>, reason: impl ToString) -> Self {
        FundError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for fund operations
pub type FundResult<T> = Result<T, FundError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_contribution_message() {
        let err = FundError::DuplicateContribution {
            name: "Alice".to_string(),
            round: 2,
        };
        assert_eq!(
            err.to_string(),
            "Member 'Alice' has already contributed in round 2"
        );
    }

    #[test]
    fn test_completion_errors() {
        assert!(FundError::AllMembersPaid.is_completion());
        assert!(FundError::RoundsExhausted { current_round: 3, total_rounds: 3 }.is_completion());
        assert!(!FundError::EnrollmentClosed.is_completion());
        assert!(!FundError::RoundIncomplete { contributed: 1, required: 3 }.is_completion());
    }
}
