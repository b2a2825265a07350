use crate::{
    error::LedgerError,
    model::{ExpenseDraft, ExpenseId, SettlementDraft, SettlementId, TripSnapshot},
    report::{SettlementReport, SuggestedTransfer},
};
use chrono::{DateTime, Utc};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use tripsplit_domain::{
    Balance, BalanceCalculator, DebtSimplifier, Expense, OutstandingNetter, Settlement,
    TransactionSuggestion,
};

/// Records of one trip and the queries over them.
///
/// Only records are stored. Balances and transfers are recomputed from the
/// records on every query, so there is no derived state to drift.
#[derive(Debug, Clone, PartialEq)]
pub struct TripLedger {
    name: String,
    participants: Vec<String>,
    expenses: IndexMap<ExpenseId, Expense, FxBuildHasher>,
    settlements: IndexMap<SettlementId, Settlement, FxBuildHasher>,
    next_expense_id: u64,
    next_settlement_id: u64,
}

impl TripLedger {
    pub fn new<I>(name: impl Into<String>, participants: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            participants: participants.into_iter().map(Into::into).collect(),
            expenses: IndexMap::default(),
            settlements: IndexMap::default(),
            next_expense_id: 1,
            next_settlement_id: 1,
        }
    }

    /// Rebuild a ledger from stored records.
    ///
    /// Records are trusted as stored: nothing is re-validated and stored
    /// per-person shares are kept.
    pub fn from_snapshot(snapshot: TripSnapshot) -> Self {
        let TripSnapshot {
            name,
            participants,
            expenses,
            settlements,
        } = snapshot;

        let mut ledger = Self::new(name, participants);
        for expense in expenses {
            ledger.insert_expense(expense);
        }
        for settlement in settlements {
            ledger.insert_settlement(settlement);
        }

        tracing::debug!(
            trip = %ledger.name,
            participant_count = ledger.participants.len(),
            expense_count = ledger.expenses.len(),
            settlement_count = ledger.settlements.len(),
            "Ledger restored from snapshot"
        );
        ledger
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&id)
    }

    pub fn expenses(&self) -> impl Iterator<Item = (ExpenseId, &Expense)> + '_ {
        self.expenses.iter().map(|(id, expense)| (*id, expense))
    }

    /// Expense log, newest first.
    ///
    /// Expenses without a timestamp come last. Equal timestamps list the most
    /// recently added expense first.
    pub fn expenses_newest_first(&self) -> Vec<(ExpenseId, &Expense)> {
        let mut log: Vec<_> = self.expenses().collect();
        log.sort_by(|(a_id, a), (b_id, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b_id.cmp(a_id))
        });
        log
    }

    pub fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.get(&id)
    }

    pub fn settlements(&self) -> impl Iterator<Item = (SettlementId, &Settlement)> + '_ {
        self.settlements.iter().map(|(id, settlement)| (*id, settlement))
    }

    pub fn pending_settlements(&self) -> impl Iterator<Item = (SettlementId, &Settlement)> + '_ {
        self.settlements().filter(|(_, settlement)| !settlement.is_paid())
    }

    pub fn paid_settlements(&self) -> impl Iterator<Item = (SettlementId, &Settlement)> + '_ {
        self.settlements().filter(|(_, settlement)| settlement.is_paid())
    }

    pub fn add_expense(
        &mut self,
        draft: ExpenseDraft,
        created_at: DateTime<Utc>,
    ) -> Result<ExpenseId, LedgerError> {
        let expense = draft.validate(&self.participants)?.with_created_at(created_at);
        let id = self.insert_expense(expense);
        tracing::info!(trip = %self.name, expense = %id, "Expense recorded");
        Ok(id)
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let expense = self
            .expenses
            .shift_remove(&id)
            .ok_or(LedgerError::UnknownExpense(id))?;
        tracing::info!(trip = %self.name, expense = %id, "Expense removed");
        Ok(expense)
    }

    /// Track a transfer that still has to be paid.
    pub fn request_settlement(
        &mut self,
        draft: SettlementDraft,
        created_at: DateTime<Utc>,
    ) -> Result<SettlementId, LedgerError> {
        draft.validate(&self.participants)?;
        let settlement = Settlement::pending(draft.from, draft.to, draft.amount, created_at);
        let id = self.insert_settlement(settlement);
        tracing::info!(trip = %self.name, settlement = %id, "Settlement requested");
        Ok(id)
    }

    /// Record a transfer that already happened.
    pub fn record_payment(
        &mut self,
        draft: SettlementDraft,
        created_at: DateTime<Utc>,
        proof: Option<String>,
    ) -> Result<SettlementId, LedgerError> {
        draft.validate(&self.participants)?;
        let mut settlement = Settlement::paid(draft.from, draft.to, draft.amount, created_at);
        if let Some(proof) = proof {
            settlement = settlement.with_proof(proof);
        }
        let id = self.insert_settlement(settlement);
        tracing::info!(trip = %self.name, settlement = %id, "Payment recorded");
        Ok(id)
    }

    pub fn mark_paid(
        &mut self,
        id: SettlementId,
        paid_at: DateTime<Utc>,
        proof: Option<String>,
    ) -> Result<(), LedgerError> {
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(LedgerError::UnknownSettlement(id))?;

        if let Err(err) = settlement.mark_paid(paid_at, proof) {
            tracing::warn!(trip = %self.name, settlement = %id, "Settlement already paid");
            return Err(err.into());
        }

        tracing::info!(trip = %self.name, settlement = %id, "Settlement marked as paid");
        Ok(())
    }

    pub fn delete_settlement(&mut self, id: SettlementId) -> Result<Settlement, LedgerError> {
        let settlement = self
            .settlements
            .shift_remove(&id)
            .ok_or(LedgerError::UnknownSettlement(id))?;
        tracing::info!(trip = %self.name, settlement = %id, "Settlement deleted");
        Ok(settlement)
    }

    pub fn balances(&self) -> Vec<Balance<'_>> {
        BalanceCalculator.calculate(
            self.participants.iter().map(String::as_str),
            self.expenses.values(),
            self.settlements.values(),
        )
    }

    /// Greedy plan that would bring every balance to zero.
    pub fn suggested_transactions(&self) -> Vec<TransactionSuggestion<'_>> {
        DebtSimplifier.simplify(&self.balances())
    }

    /// What each pair still owes directly, net of every tracked settlement.
    pub fn outstanding_transactions(&self) -> Vec<TransactionSuggestion<'_>> {
        OutstandingNetter.net(self.expenses.values(), self.settlements.values())
    }

    pub fn report(&self) -> SettlementReport<'_> {
        let balances = self.balances();
        let suggestions = DebtSimplifier
            .simplify(&balances)
            .into_iter()
            .map(|transfer| SuggestedTransfer::reconcile(transfer, self.settlements.values()))
            .collect();

        SettlementReport {
            expenses: self.expenses_newest_first(),
            balances,
            suggestions,
            outstanding: self.outstanding_transactions(),
            pending: self.pending_settlements().collect(),
            paid: self.paid_settlements().collect(),
        }
    }

    fn insert_expense(&mut self, expense: Expense) -> ExpenseId {
        let id = ExpenseId(self.next_expense_id);
        self.next_expense_id += 1;
        self.expenses.insert(id, expense);
        id
    }

    fn insert_settlement(&mut self, settlement: Settlement) -> SettlementId {
        let id = SettlementId(self.next_settlement_id);
        self.next_settlement_id += 1;
        self.settlements.insert(id, settlement);
        id
    }
}
