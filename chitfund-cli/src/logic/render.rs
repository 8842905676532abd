//! Pure rendering of fund data for display
//!
//! Builds strings and JSON values; printing happens in the command layer.

use lib_chitfund::{FundLedger, FundSummary};
use serde_json::{json, Value};

/// Fund listing as a fixed-width table
pub fn summaries_table(summaries: &[FundSummary]) -> String {
    let mut result = format!(
        "{:<24} {:>12} {:<10} {:>8} {:>9} {:<9}\n",
        "FUND", "CONTRIBUTION", "CADENCE", "MEMBERS", "ROUND", "PHASE"
    );
    for s in summaries {
        result.push_str(&format!(
            "{:<24} {:>12} {:<10} {:>8} {:>9} {:<9}\n",
            s.name,
            s.contribution_amount,
            format!("{} x{}", s.duration_unit, s.duration_count),
            s.members,
            format!("{}/{}", s.current_round, s.total_rounds),
            s.phase.to_string(),
        ));
    }
    result
}

pub fn summaries_value(summaries: &[FundSummary]) -> Value {
    json!(summaries)
}

/// Round progress of one fund
pub fn status_value(ledger: &FundLedger) -> Value {
    let contributed: Vec<&str> = ledger
        .members
        .iter()
        .filter(|m| ledger.state.contributed_this_round.contains(&m.id))
        .map(|m| m.name.as_str())
        .collect();
    let pending: Vec<&str> = ledger
        .members
        .iter()
        .filter(|m| !ledger.state.contributed_this_round.contains(&m.id))
        .map(|m| m.name.as_str())
        .collect();
    let winners: Vec<&str> = ledger
        .members
        .iter()
        .filter(|m| ledger.state.paid_members.contains(&m.id))
        .map(|m| m.name.as_str())
        .collect();

    json!({
        "fund": ledger.fund.name,
        "phase": ledger.phase().to_string(),
        "contribution": ledger.fund.contribution_amount,
        "cadence": format!("{} x{}", ledger.fund.duration_unit, ledger.fund.duration_count),
        "rounds_completed": ledger.state.current_round,
        "total_rounds": ledger.fund.total_rounds,
        "pool": ledger.pool().ok(),
        "contributed": contributed,
        "pending": pending,
        "winners": winners,
    })
}

/// Members with balances and round flags
pub fn members_table(ledger: &FundLedger) -> String {
    let mut result = format!(
        "{:>4} {:<24} {:>12} {:<12} {:<4}\n",
        "ID", "NAME", "BALANCE", "CONTRIBUTED", "PAID"
    );
    for m in &ledger.members {
        let contributed = ledger.state.contributed_this_round.contains(&m.id);
        let paid = ledger.state.paid_members.contains(&m.id);
        result.push_str(&format!(
            "{:>4} {:<24} {:>12} {:<12} {:<4}\n",
            m.id,
            m.name,
            m.balance,
            if contributed { "yes" } else { "no" },
            if paid { "yes" } else { "no" },
        ));
    }
    result
}

/// Transaction log with member names resolved
pub fn history_table(ledger: &FundLedger) -> String {
    let mut result = format!(
        "{:>4} {:>6} {:<8} {:<24} {:>12}\n",
        "TX", "ROUND", "TYPE", "MEMBER", "AMOUNT"
    );
    for tx in &ledger.transactions {
        let name = ledger
            .member(tx.member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{}", tx.member_id));
        result.push_str(&format!(
            "{:>4} {:>6} {:<8} {:<24} {:>12}\n",
            tx.id,
            tx.round,
            tx.kind.to_string(),
            name,
            tx.amount
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_chitfund::{DurationUnit, FundPhase, FundTerms, Transaction, TransactionKind};

    fn ledger() -> FundLedger {
        let mut ledger = FundLedger::new(
            "Family",
            FundTerms::new(100, DurationUnit::Monthly, 3),
            &["Asha".to_string(), "Ben".to_string()],
        );
        ledger.state.contributed_this_round.insert(1);
        ledger.members[0].balance = 100;
        ledger.transactions.push(Transaction {
            id: 1,
            member_id: 1,
            amount: 100,
            kind: TransactionKind::Deposit,
            round: 1,
        });
        ledger
    }

    #[test]
    fn test_status_value() {
        let status = status_value(&ledger());
        assert_eq!(status["fund"], "Family");
        assert_eq!(status["pool"], 200);
        assert_eq!(status["contributed"], json!(["Asha"]));
        assert_eq!(status["pending"], json!(["Ben"]));
        assert_eq!(status["phase"], "Active");
    }

    #[test]
    fn test_members_table() {
        let table = members_table(&ledger());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Asha"));
        assert!(lines[1].contains("yes"));
    }

    #[test]
    fn test_history_table_resolves_names() {
        let table = history_table(&ledger());
        assert!(table.contains("Deposit"));
        assert!(table.contains("Asha"));
    }

    #[test]
    fn test_summaries_table() {
        let summary = FundSummary {
            name: "Family".to_string(),
            contribution_amount: 100,
            duration_unit: DurationUnit::Weekly,
            duration_count: 4,
            members: 2,
            current_round: 1,
            total_rounds: 2,
            phase: FundPhase::Active,
        };
        let table = summaries_table(&[summary.clone()]);
        assert!(table.contains("Family"));
        assert!(table.contains("1/2"));
        assert_eq!(summaries_value(&[summary])[0]["name"], "Family");
    }
}
