use crate::model::{Balance, Expense, Money, Settlement};
use fxhash::FxHashMap;

/// Balance calculation service
pub struct BalanceCalculator;

#[derive(Clone, Copy, Default)]
struct Totals {
    paid: Money,
    owed: Money,
}

impl BalanceCalculator {
    /// Calculate what each participant paid, owes, and their net position
    ///
    /// Recomputes from the given records on every call.
    ///
    /// # Arguments
    /// * `participants` - Trip members; the result follows this order
    /// * `expenses` - Recorded expenses
    /// * `settlements` - Tracked settlements; only paid ones affect balances
    ///
    /// # Returns
    /// One balance per participant. A paid settlement counts as an extra payment
    /// for its sender and an extra liability for its receiver. Names that appear
    /// in records but not in `participants` are not reported.
    pub fn calculate<'p, 'r, P, E, S>(
        &self,
        participants: P,
        expenses: E,
        settlements: S,
    ) -> Vec<Balance<'p>>
    where
        P: IntoIterator<Item = &'p str>,
        E: IntoIterator<Item = &'r Expense>,
        S: IntoIterator<Item = &'r Settlement>,
    {
        let mut totals: FxHashMap<&'r str, Totals> = FxHashMap::default();
        let mut expense_count = 0usize;
        let mut paid_settlement_count = 0usize;

        for expense in expenses {
            expense_count += 1;
            totals.entry(expense.paid_by()).or_default().paid += expense.amount();
            for member in expense.members() {
                totals.entry(member).or_default().owed += expense.share_of(member);
            }
        }

        for settlement in settlements.into_iter().filter(|s| s.is_paid()) {
            paid_settlement_count += 1;
            totals.entry(settlement.from()).or_default().paid += settlement.amount();
            totals.entry(settlement.to()).or_default().owed += settlement.amount();
        }

        let balances: Vec<Balance<'p>> = participants
            .into_iter()
            .map(|name| {
                let Totals { paid, owed } = totals.get(name).copied().unwrap_or_default();
                Balance::new(name, paid, owed)
            })
            .collect();

        tracing::debug!(
            participant_count = balances.len(),
            expense_count,
            paid_settlement_count,
            "Balances computed"
        );

        balances
    }
}
