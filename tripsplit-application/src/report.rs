use crate::model::{ExpenseId, SettlementId};
use tripsplit_domain::{Balance, Expense, Settlement, TransactionSuggestion};

/// A greedy suggestion, flagged when a pending settlement already covers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestedTransfer<'a> {
    pub transfer: TransactionSuggestion<'a>,
    pub tracked: bool,
}

impl<'a> SuggestedTransfer<'a> {
    /// Marks `transfer` as tracked when a pending settlement has the same
    /// parties and an amount within the settle tolerance.
    pub fn reconcile<'s, I>(transfer: TransactionSuggestion<'a>, pending: I) -> Self
    where
        I: IntoIterator<Item = &'s Settlement>,
    {
        let tracked = pending.into_iter().any(|settlement| {
            !settlement.is_paid()
                && settlement.from() == transfer.from
                && settlement.to() == transfer.to
                && settlement.amount().approx_eq(transfer.amount)
        });
        Self { transfer, tracked }
    }
}

/// Everything a trip overview shows, computed from one consistent view of the ledger.
#[derive(Debug)]
pub struct SettlementReport<'a> {
    /// Newest first.
    pub expenses: Vec<(ExpenseId, &'a Expense)>,
    pub balances: Vec<Balance<'a>>,
    pub suggestions: Vec<SuggestedTransfer<'a>>,
    pub outstanding: Vec<TransactionSuggestion<'a>>,
    pub pending: Vec<(SettlementId, &'a Settlement)>,
    pub paid: Vec<(SettlementId, &'a Settlement)>,
}

impl<'a> SettlementReport<'a> {
    /// No transfer left to suggest and nothing waiting to be paid.
    pub fn is_fully_settled(&self) -> bool {
        self.suggestions.is_empty() && self.pending.is_empty()
    }

    pub fn untracked_suggestions(&self) -> impl Iterator<Item = &SuggestedTransfer<'a>> + '_ {
        self.suggestions.iter().filter(|suggestion| !suggestion.tracked)
    }
}
