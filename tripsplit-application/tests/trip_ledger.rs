use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use tripsplit_application::{
    ExpenseDraft, ExpenseValidationError, LedgerError, SettlementDraft, SettlementId,
    SettlementRequestError, TripLedger, TripSnapshot, TripSnapshotSource,
};
use tripsplit_domain::{Expense, Money, PaymentMethod, Settlement, SettlementTransitionError};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

fn money(value: i64) -> Money {
    Money::from_i64(value)
}

#[fixture]
fn ledger() -> TripLedger {
    let mut ledger = TripLedger::new("Goa", ["Alice", "Bob", "Carl"]);
    ledger
        .add_expense(
            ExpenseDraft::fair("Villa", money(300), "Alice", ["Alice", "Bob", "Carl"]),
            at(1),
        )
        .expect("valid expense");
    ledger
}

fn transfers(ledger: &TripLedger) -> Vec<(String, String, Money)> {
    ledger
        .suggested_transactions()
        .into_iter()
        .map(|t| (t.from.to_string(), t.to.to_string(), t.amount))
        .collect()
}

#[rstest]
fn suggestions_follow_participant_order(ledger: TripLedger) {
    assert_eq!(
        transfers(&ledger),
        vec![
            ("Bob".to_string(), "Alice".to_string(), money(100)),
            ("Carl".to_string(), "Alice".to_string(), money(100)),
        ]
    );
}

#[rstest]
fn pending_request_does_not_move_balances(mut ledger: TripLedger) {
    let before = transfers(&ledger);

    ledger
        .request_settlement(SettlementDraft::new("Bob", "Alice", money(100)), at(2))
        .expect("valid request");

    assert_eq!(transfers(&ledger), before);
}

#[rstest]
fn marking_paid_settles_the_payer(mut ledger: TripLedger) {
    let id = ledger
        .request_settlement(SettlementDraft::new("Bob", "Alice", money(100)), at(2))
        .expect("valid request");

    ledger
        .mark_paid(id, at(3), Some("upi-receipt.png".to_string()))
        .expect("pending settlement can be paid");

    let balances = ledger.balances();
    assert_eq!(balances[0].owed, money(200));
    assert_eq!(balances[0].net, money(100));
    assert_eq!(balances[1].paid, money(100));
    assert!(balances[1].net.is_zero());
    assert_eq!(
        transfers(&ledger),
        vec![("Carl".to_string(), "Alice".to_string(), money(100))]
    );

    let settlement = ledger.settlement(id).expect("settlement kept");
    assert_eq!(settlement.paid_at(), Some(at(3)));
    assert_eq!(settlement.proof(), Some("upi-receipt.png"));
}

#[rstest]
fn paid_is_terminal(mut ledger: TripLedger) {
    let id = ledger
        .record_payment(SettlementDraft::new("Bob", "Alice", money(100)), at(2), None)
        .expect("valid payment");

    assert_eq!(
        ledger.mark_paid(id, at(3), None),
        Err(LedgerError::Transition(SettlementTransitionError::AlreadyPaid {
            from: "Bob".to_string(),
            to: "Alice".to_string(),
        }))
    );
}

#[rstest]
fn unknown_settlement_is_reported(mut ledger: TripLedger) {
    assert_eq!(
        ledger.mark_paid(SettlementId(42), at(3), None),
        Err(LedgerError::UnknownSettlement(SettlementId(42)))
    );
    assert_eq!(
        ledger.delete_settlement(SettlementId(42)),
        Err(LedgerError::UnknownSettlement(SettlementId(42)))
    );
}

#[rstest]
fn invalid_drafts_are_rejected(mut ledger: TripLedger) {
    assert_eq!(
        ledger.request_settlement(SettlementDraft::new("Bob", "Bob", money(10)), at(2)),
        Err(LedgerError::InvalidSettlement(
            SettlementRequestError::SelfPayment("Bob".to_string())
        ))
    );
    assert_eq!(
        ledger.add_expense(
            ExpenseDraft::custom("Boat", money(100), "Bob", [("Bob", money(10))]),
            at(2)
        ),
        Err(LedgerError::InvalidExpense(
            ExpenseValidationError::CustomSplitMismatch {
                shares: money(10),
                amount: money(100),
            }
        ))
    );
    assert_eq!(ledger.expenses().count(), 1);
    assert_eq!(ledger.settlements().count(), 0);
}

#[rstest]
fn report_flags_tracked_suggestions(mut ledger: TripLedger) {
    ledger
        .request_settlement(SettlementDraft::new("Carl", "Alice", money(100)), at(2))
        .expect("valid request");

    let report = ledger.report();

    let flags: Vec<(&str, bool)> = report
        .suggestions
        .iter()
        .map(|s| (s.transfer.from, s.tracked))
        .collect();
    assert_eq!(flags, vec![("Bob", false), ("Carl", true)]);
    assert_eq!(report.untracked_suggestions().count(), 1);
    assert_eq!(report.pending.len(), 1);
    assert!(report.paid.is_empty());
    assert!(!report.is_fully_settled());

    let outstanding: Vec<(&str, &str, Money)> = report
        .outstanding
        .iter()
        .map(|t| (t.from, t.to, t.amount))
        .collect();
    assert_eq!(outstanding, vec![("Bob", "Alice", money(100))]);
}

#[rstest]
fn settling_everything_empties_the_report(mut ledger: TripLedger) {
    for payer in ["Bob", "Carl"] {
        ledger
            .record_payment(SettlementDraft::new(payer, "Alice", money(100)), at(2), None)
            .expect("valid payment");
    }

    let report = ledger.report();

    assert!(report.is_fully_settled());
    assert!(report.outstanding.is_empty());
    assert!(report.balances.iter().all(|b| b.net.is_zero()));
    assert_eq!(report.paid.len(), 2);
}

#[rstest]
fn removing_expense_recomputes_balances(mut ledger: TripLedger) {
    let id = ledger
        .add_expense(
            ExpenseDraft::fair("Snacks", money(30), "Bob", ["Bob", "Carl"]),
            at(2),
        )
        .expect("valid expense");

    let removed = ledger.remove_expense(id).expect("expense exists");

    assert_eq!(removed.title(), "Snacks");
    assert_eq!(removed.created_at(), Some(at(2)));
    assert_eq!(transfers(&ledger).len(), 2);
}

#[rstest]
fn deleting_pending_settlement_untracks_suggestion(mut ledger: TripLedger) {
    let id = ledger
        .request_settlement(SettlementDraft::new("Carl", "Alice", money(100)), at(2))
        .expect("valid request");

    let deleted = ledger.delete_settlement(id).expect("settlement exists");

    assert_eq!(deleted.from(), "Carl");
    assert_eq!(ledger.settlements().count(), 0);
    assert!(ledger.report().suggestions.iter().all(|s| !s.tracked));
    assert_eq!(
        ledger.delete_settlement(id),
        Err(LedgerError::UnknownSettlement(id))
    );
}

#[rstest]
fn expense_log_lists_newest_first(mut ledger: TripLedger) {
    let boat = ledger
        .add_expense(
            ExpenseDraft::fair("Boat", money(90), "Bob", ["Alice", "Bob", "Carl"])
                .paid_with(PaymentMethod::Upi),
            at(5),
        )
        .expect("valid expense");
    let snacks = ledger
        .add_expense(
            ExpenseDraft::fair("Snacks", money(30), "Carl", ["Bob", "Carl"]),
            at(5),
        )
        .expect("valid expense");

    let titles: Vec<&str> = ledger
        .expenses_newest_first()
        .into_iter()
        .map(|(_, expense)| expense.title())
        .collect();
    assert_eq!(titles, vec!["Snacks", "Boat", "Villa"]);

    let boat = ledger.expense(boat).expect("expense kept");
    assert_eq!(boat.payment_method(), PaymentMethod::Upi);
    assert_eq!(boat.created_at(), Some(at(5)));

    let report = ledger.report();
    let ids: Vec<_> = report.expenses.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids.first(), Some(&snacks));
    assert_eq!(ids.len(), 3);
}

#[test]
fn expense_without_timestamp_sorts_last() {
    let snapshot = TripSnapshot {
        name: "Manali".to_string(),
        participants: vec!["A".to_string(), "B".to_string()],
        expenses: vec![
            Expense::fair(money(10), "A", ["A", "B"]).with_title("Undated"),
            Expense::fair(money(20), "B", ["A", "B"])
                .with_title("Dated")
                .with_created_at(at(1)),
        ],
        settlements: Vec::new(),
    };

    let ledger = TripLedger::from_snapshot(snapshot);
    let titles: Vec<&str> = ledger
        .expenses_newest_first()
        .into_iter()
        .map(|(_, expense)| expense.title())
        .collect();

    assert_eq!(titles, vec!["Dated", "Undated"]);
}

#[test]
fn snapshot_keeps_stored_shares() {
    let snapshot = TripSnapshot {
        name: "Manali".to_string(),
        participants: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        expenses: vec![Expense::fair_with_stored_share(
            money(90),
            "A",
            ["A", "B"],
            money(30),
        )],
        settlements: vec![Settlement::pending("B", "A", money(30), at(1))],
    };

    let ledger = TripLedger::from_snapshot(snapshot.load().expect("in-memory snapshot"));

    assert_eq!(ledger.name(), "Manali");
    let balances = ledger.balances();
    assert_eq!(balances[1].owed, money(30));
    assert!(ledger.outstanding_transactions().is_empty());
    assert_eq!(ledger.pending_settlements().count(), 1);
}
