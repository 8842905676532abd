//! Fund Engine
//!
//! Round/payout state machine for a single fund.
//!
//! # Rounds
//!
//! A round is one deposit from every member followed by one payout of the
//! pool (`contribution_amount * member_count`) to a member drawn uniformly
//! from those who have not been paid yet in this fund life.
//!
//! # Commit boundary
//!
//! Every mutating operation works on a copy of the ledger, validates before
//! touching anything, persists the affected entities with one
//! [`FundStore::commit`], and only then replaces the in-memory ledger. A
//! failed commit therefore leaves the engine exactly as it was.
//!
//! # Phases
//!
//! `Active` until `current_round >= total_rounds` or every member has been
//! paid, then `Completed`. From `Completed` the only valid transitions are
//! [`CompletionAction`]s.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::errors::{FundError, FundResult};
use crate::store::{CommitOp, FundStore};
use crate::types::{
    validate_member_name, validate_roster, Amount, Fund, FundLedger, FundPhase, FundState,
    FundTerms, Member, Transaction, TransactionKind,
};

/// Result of a successful contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionReceipt {
    pub transaction: Transaction,
    pub member: Member,
    /// Every member has now deposited in this round; payout may proceed
    pub round_complete: bool,
    /// Members still expected to deposit this round
    pub pending: usize,
}

/// Result of a successful payout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutReceipt {
    pub transaction: Transaction,
    pub winner: Member,
    pub pool: Amount,
    /// 1-based round that was just closed
    pub round: u32,
    /// The fund entered its `Completed` phase with this payout
    pub fund_completed: bool,
}

/// Transitions offered once a fund is completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionAction {
    /// Clear transactions and round state; keep fund terms and members
    RestartPreservingMembers,
    /// Replace terms and roster wholesale, then start over
    EditAndRestart { terms: FundTerms, roster: Vec<String> },
    /// Stop operating the fund; records stay on storage
    EndFund,
}

/// What the caller should do after a completion transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The fund is active again at round 0
    Restarted,
    /// Terminal; no further operations on this fund
    Ended,
}

/// Entities touched by an operation
#[derive(Debug, Clone, Copy)]
enum Entity {
    Fund,
    Members,
    Transactions,
    State,
}

fn to_signed(amount: Amount) -> FundResult<i64> {
    i64::try_from(amount).map_err(|_| FundError::Overflow)
}

/// Engine operating one fund through a [`FundStore`]
pub struct FundEngine<S: FundStore> {
    store: S,
    ledger: FundLedger,
}

impl<S: FundStore> FundEngine<S> {
    /// Create a brand new fund and persist all four entities
    pub fn create(store: S, name: &str, terms: FundTerms, roster: &[String]) -> FundResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FundError::InvalidFundName {
                name: name.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }
        terms.validate()?;
        validate_roster(roster)?;

        let mut engine = Self {
            store,
            ledger: FundLedger::new(name, terms, &[]),
        };
        let ledger = FundLedger::new(name, terms, roster);
        engine.commit(
            ledger,
            &[Entity::Fund, Entity::Members, Entity::Transactions, Entity::State],
        )?;

        info!(
            fund = %engine.ledger.fund.name,
            members = engine.ledger.members.len(),
            contribution = terms.contribution_amount,
            "fund created"
        );
        Ok(engine)
    }

    /// Load an existing fund
    pub fn open(store: S) -> FundResult<Self> {
        let ledger = store.load_ledger()?;
        debug!(
            fund = %ledger.fund.name,
            round = ledger.state.current_round,
            total_rounds = ledger.fund.total_rounds,
            "fund loaded"
        );
        Ok(Self { store, ledger })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &FundLedger {
        &self.ledger
    }

    pub fn fund(&self) -> &Fund {
        &self.ledger.fund
    }

    pub fn members(&self) -> &[Member] {
        &self.ledger.members
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn state(&self) -> &FundState {
        &self.ledger.state
    }

    pub fn phase(&self) -> FundPhase {
        self.ledger.phase()
    }

    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.ledger.member_by_name(name)
    }

    /// Members who have not deposited in the round in progress
    pub fn pending_contributors(&self) -> Vec<&Member> {
        let contributed = &self.ledger.state.contributed_this_round;
        self.ledger
            .members
            .iter()
            .filter(|m| !contributed.contains(&m.id))
            .collect()
    }

    /// Members who may still win a payout in this fund life
    pub fn eligible_members(&self) -> Vec<&Member> {
        let paid = &self.ledger.state.paid_members;
        self.ledger
            .members
            .iter()
            .filter(|m| !paid.contains(&m.id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Enrollment
    // ------------------------------------------------------------------

    /// Enroll a new member.
    ///
    /// Only possible before the first contribution of the fund life.
    pub fn add_member(&mut self, name: &str) -> FundResult<Member> {
        if !self.ledger.state.enrollment_open() {
            return Err(FundError::EnrollmentClosed);
        }
        validate_member_name(name)?;
        let name = name.trim();
        if self.ledger.member_by_name(name).is_some() {
            return Err(FundError::DuplicateMemberName(name.to_string()));
        }

        let mut next = self.ledger.clone();
        let member = Member::new(next.next_member_id(), name);
        next.members.push(member.clone());
        next.fund.total_rounds = next.members.len() as u32;

        self.commit(next, &[Entity::Fund, Entity::Members])?;

        info!(
            fund = %self.ledger.fund.name,
            member_id = member.id,
            member = %member.name,
            total_rounds = self.ledger.fund.total_rounds,
            "member enrolled"
        );
        Ok(member)
    }

    // ------------------------------------------------------------------
    // Contributions
    // ------------------------------------------------------------------

    /// Record one member's deposit for the round in progress
    pub fn collect_contribution(&mut self, member_name: &str) -> FundResult<ContributionReceipt> {
        if self.ledger.members.is_empty() {
            return Err(FundError::NoMembers);
        }

        let current_round = self.ledger.state.current_round;
        let total_rounds = self.ledger.fund.total_rounds;
        if current_round >= total_rounds {
            info!(fund = %self.ledger.fund.name, current_round, total_rounds, "fund completed");
            return Err(FundError::RoundsExhausted {
                current_round,
                total_rounds,
            });
        }

        let member = self
            .ledger
            .member_by_name(member_name)
            .cloned()
            .ok_or_else(|| FundError::MemberNotFound(member_name.to_string()))?;

        if self.ledger.state.contributed_this_round.contains(&member.id) {
            return Err(FundError::DuplicateContribution {
                name: member.name,
                round: self.ledger.active_round(),
            });
        }

        let amount = self.ledger.fund.contribution_amount;
        let credit = to_signed(amount)?;

        let mut next = self.ledger.clone();
        let transaction = Transaction {
            id: next.next_transaction_id(),
            member_id: member.id,
            amount,
            kind: TransactionKind::Deposit,
            round: next.active_round(),
        };
        next.transactions.push(transaction.clone());

        let entry = next
            .members
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| FundError::MemberNotFound(member.name.clone()))?;
        entry.balance = entry.balance.checked_add(credit).ok_or(FundError::Overflow)?;
        let member = entry.clone();

        next.state.contributed_this_round.insert(member.id);

        self.commit(next, &[Entity::Transactions, Entity::Members, Entity::State])?;

        let round_complete = self.ledger.round_fully_funded();
        let pending = self.ledger.members.len() - self.ledger.state.contributed_this_round.len();

        info!(
            fund = %self.ledger.fund.name,
            round = transaction.round,
            member = %member.name,
            amount,
            pending,
            "contribution recorded"
        );
        if round_complete {
            info!(fund = %self.ledger.fund.name, round = transaction.round, "round fully funded");
        }

        Ok(ContributionReceipt {
            transaction,
            member,
            round_complete,
            pending,
        })
    }

    // ------------------------------------------------------------------
    // Payout
    // ------------------------------------------------------------------

    /// Pay the pool to a randomly drawn eligible member and advance the round.
    ///
    /// The draw is uniform over members not yet paid in this fund life.
    pub fn payout_money<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FundResult<PayoutReceipt> {
        if self.ledger.members.is_empty() {
            return Err(FundError::NoMembers);
        }
        self.ensure_active()?;

        if !self.ledger.round_fully_funded() {
            return Err(FundError::RoundIncomplete {
                contributed: self.ledger.state.contributed_this_round.len(),
                required: self.ledger.members.len(),
            });
        }

        let eligible: Vec<Member> = self.eligible_members().into_iter().cloned().collect();
        if eligible.is_empty() {
            info!(fund = %self.ledger.fund.name, "all members paid, fund completed");
            return Err(FundError::AllMembersPaid);
        }

        let pick = rng.gen_range(0..eligible.len());
        let winner_id = eligible[pick].id;
        let pool = self.ledger.pool()?;
        let debit = to_signed(pool)?;

        let mut next = self.ledger.clone();
        let round = next.active_round();
        let transaction = Transaction {
            id: next.next_transaction_id(),
            member_id: winner_id,
            amount: pool,
            kind: TransactionKind::Payout,
            round,
        };
        next.transactions.push(transaction.clone());

        let entry = next
            .members
            .iter_mut()
            .find(|m| m.id == winner_id)
            .ok_or_else(|| FundError::MemberNotFound(winner_id.to_string()))?;
        entry.balance = entry.balance.checked_sub(debit).ok_or(FundError::Overflow)?;
        let winner = entry.clone();

        next.state.paid_members.insert(winner_id);
        next.state.contributed_this_round.clear();
        next.state.current_round += 1;

        self.commit(next, &[Entity::Transactions, Entity::Members, Entity::State])?;

        info!(
            fund = %self.ledger.fund.name,
            round,
            winner = %winner.name,
            pool,
            eligible = eligible.len(),
            "payout distributed"
        );

        let fund_completed = self.phase() == FundPhase::Completed;
        if fund_completed {
            info!(
                fund = %self.ledger.fund.name,
                rounds = self.ledger.state.current_round,
                "fund completed"
            );
        }

        Ok(PayoutReceipt {
            transaction,
            winner,
            pool,
            round,
            fund_completed,
        })
    }

    // ------------------------------------------------------------------
    // Completion transitions
    // ------------------------------------------------------------------

    /// Dispatch a completion menu choice
    pub fn apply(&mut self, action: CompletionAction) -> FundResult<LifecycleOutcome> {
        match action {
            CompletionAction::RestartPreservingMembers => self.restart_preserving_members(),
            CompletionAction::EditAndRestart { terms, roster } => self.edit_and_restart(terms, &roster),
            CompletionAction::EndFund => self.end_fund(),
        }
    }

    /// Start a new fund life with the same terms and roster
    pub fn restart_preserving_members(&mut self) -> FundResult<LifecycleOutcome> {
        self.ensure_completed()?;

        let mut next = self.ledger.clone();
        next.transactions.clear();
        next.state = FundState::default();

        self.commit(next, &[Entity::Transactions, Entity::State])?;

        info!(
            fund = %self.ledger.fund.name,
            members = self.ledger.members.len(),
            "fund restarted with existing members"
        );
        Ok(LifecycleOutcome::Restarted)
    }

    /// Start a new fund life with new terms and a fresh roster
    pub fn edit_and_restart(&mut self, terms: FundTerms, roster: &[String]) -> FundResult<LifecycleOutcome> {
        self.ensure_completed()?;
        terms.validate()?;
        validate_roster(roster)?;

        let next = FundLedger::new(self.ledger.fund.name.clone(), terms, roster);

        self.commit(
            next,
            &[Entity::Fund, Entity::Members, Entity::Transactions, Entity::State],
        )?;

        info!(
            fund = %self.ledger.fund.name,
            members = self.ledger.members.len(),
            contribution = terms.contribution_amount,
            "fund edited and restarted"
        );
        Ok(LifecycleOutcome::Restarted)
    }

    /// Stop operating the fund. Storage is left as is.
    pub fn end_fund(&self) -> FundResult<LifecycleOutcome> {
        self.ensure_completed()?;
        info!(fund = %self.ledger.fund.name, "fund ended");
        Ok(LifecycleOutcome::Ended)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_completed(&self) -> FundResult<()> {
        if self.phase() != FundPhase::Completed {
            return Err(FundError::FundNotCompleted {
                current_round: self.ledger.state.current_round,
                total_rounds: self.ledger.fund.total_rounds,
            });
        }
        Ok(())
    }

    fn ensure_active(&self) -> FundResult<()> {
        if self.phase() == FundPhase::Active {
            return Ok(());
        }
        let current_round = self.ledger.state.current_round;
        let total_rounds = self.ledger.fund.total_rounds;
        if current_round >= total_rounds {
            Err(FundError::RoundsExhausted {
                current_round,
                total_rounds,
            })
        } else {
            Err(FundError::AllMembersPaid)
        }
    }

    fn commit(&mut self, next: FundLedger, entities: &[Entity]) -> FundResult<()> {
        let ops = entities
            .iter()
            .map(|entity| match entity {
                Entity::Fund => CommitOp::Fund(next.fund.clone()),
                Entity::Members => CommitOp::Members(next.members.clone()),
                Entity::Transactions => CommitOp::Transactions(next.transactions.clone()),
                Entity::State => CommitOp::State(next.state.clone()),
            })
            .collect();

        if let Err(e) = self.store.commit(ops) {
            warn!(fund = %self.ledger.fund.name, error = %e, "commit failed, in-memory ledger unchanged");
            return Err(e);
        }
        self.ledger = next;
        Ok(())
    }
}
