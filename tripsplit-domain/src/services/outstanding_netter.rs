use crate::model::{Expense, Money, Settlement, TransactionSuggestion};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;

/// Ordered `(debtor, creditor)` pairs in first-seen order.
type PairAmounts<'a> = IndexMap<(&'a str, &'a str), Money, FxBuildHasher>;

/// Pairwise outstanding-debt service
///
/// Answers "how much does A still owe B directly" from the expenses each
/// person paid for, unlike [`DebtSimplifier`](super::DebtSimplifier) which
/// only looks at net balances.
pub struct OutstandingNetter;

impl OutstandingNetter {
    /// Calculate the outstanding amount for every pair of participants
    ///
    /// # Arguments
    /// * `expenses` - Recorded expenses
    /// * `settlements` - Tracked settlements, paid or pending
    ///
    /// # Returns
    /// One transfer per pair that still owes more than [`Money::SHARE_EPSILON`],
    /// oriented from debtor to creditor and sorted by descending amount. Ties
    /// keep the order in which the pair was first seen.
    pub fn net<'a, E, S>(&self, expenses: E, settlements: S) -> Vec<TransactionSuggestion<'a>>
    where
        E: IntoIterator<Item = &'a Expense>,
        S: IntoIterator<Item = &'a Settlement>,
    {
        let mut owed = Self::direct_debts(expenses);
        Self::subtract_settlements(&mut owed, settlements);

        let mut netted = Self::net_opposite_directions(&owed);
        netted.sort_by(|a, b| b.amount.cmp(&a.amount));

        tracing::debug!(
            directed_pair_count = owed.len(),
            outstanding_count = netted.len(),
            "Outstanding pairs netted"
        );

        netted
    }

    fn direct_debts<'a, E>(expenses: E) -> PairAmounts<'a>
    where
        E: IntoIterator<Item = &'a Expense>,
    {
        let mut owed = PairAmounts::default();
        for expense in expenses {
            let payer = expense.paid_by();
            for name in expense.members().filter(|name| *name != payer) {
                let share = expense.share_of(name);
                if share.exceeds_share_epsilon() {
                    *owed.entry((name, payer)).or_insert(Money::ZERO) += share;
                }
            }
        }
        owed
    }

    fn subtract_settlements<'a, S>(owed: &mut PairAmounts<'a>, settlements: S)
    where
        S: IntoIterator<Item = &'a Settlement>,
    {
        for settlement in settlements {
            let Some(remaining) = owed.get_mut(&(settlement.from(), settlement.to())) else {
                continue;
            };
            let left = *remaining - settlement.amount();
            *remaining = if left.exceeds_share_epsilon() {
                left
            } else {
                Money::ZERO
            };
        }
    }

    fn net_opposite_directions<'a>(owed: &PairAmounts<'a>) -> Vec<TransactionSuggestion<'a>> {
        // Keyed by (lower, higher) name; positive means lower owes higher.
        let mut pair_totals = PairAmounts::default();
        for (&(from, to), &amount) in owed {
            if !amount.exceeds_share_epsilon() {
                continue;
            }
            let (key, delta) = if from < to {
                ((from, to), amount)
            } else {
                ((to, from), -amount)
            };
            *pair_totals.entry(key).or_insert(Money::ZERO) += delta;
        }

        pair_totals
            .into_iter()
            .filter(|(_, total)| total.abs().exceeds_share_epsilon())
            .map(|((lower, higher), total)| {
                if total.is_positive() {
                    TransactionSuggestion {
                        from: lower,
                        to: higher,
                        amount: total,
                    }
                } else {
                    TransactionSuggestion {
                        from: higher,
                        to: lower,
                        amount: total.abs(),
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};

    const NO_SETTLEMENTS: &[Settlement] = &[];

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[fixture]
    fn netter() -> OutstandingNetter {
        OutstandingNetter
    }

    fn suggestion<'a>(from: &'a str, to: &'a str, amount: i64) -> TransactionSuggestion<'a> {
        TransactionSuggestion {
            from,
            to,
            amount: Money::from_i64(amount),
        }
    }

    #[rstest]
    fn custom_split_excludes_payer_share(netter: OutstandingNetter) {
        let expenses = vec![Expense::custom(
            Money::from_i64(100),
            "A",
            ["A", "B"],
            [("A", Money::from_i64(30)), ("B", Money::from_i64(70))],
        )];

        let outstanding = netter.net(&expenses, NO_SETTLEMENTS);

        assert_eq!(outstanding, vec![suggestion("B", "A", 70)]);
    }

    #[rstest]
    fn opposite_debts_collapse_into_one_direction(netter: OutstandingNetter) {
        let expenses = vec![
            Expense::fair(Money::from_i64(100), "Alice", ["Alice", "Bob"]),
            Expense::fair(Money::from_i64(60), "Bob", ["Alice", "Bob"]),
        ];

        let outstanding = netter.net(&expenses, NO_SETTLEMENTS);

        assert_eq!(outstanding, vec![suggestion("Bob", "Alice", 20)]);
    }

    #[rstest]
    fn equal_opposite_debts_cancel(netter: OutstandingNetter) {
        let expenses = vec![
            Expense::fair(Money::from_i64(80), "Alice", ["Alice", "Bob"]),
            Expense::fair(Money::from_i64(80), "Bob", ["Alice", "Bob"]),
        ];

        assert!(netter.net(&expenses, NO_SETTLEMENTS).is_empty());
    }

    #[rstest]
    #[case::pending_counts(false)]
    #[case::paid_counts(true)]
    fn tracked_settlements_reduce_pair(netter: OutstandingNetter, #[case] paid: bool) {
        let expenses = vec![Expense::fair(
            Money::from_i64(300),
            "Alice",
            ["Alice", "Bob", "Carl"],
        )];
        let settlement = if paid {
            Settlement::paid("Bob", "Alice", Money::from_i64(40), at(1))
        } else {
            Settlement::pending("Bob", "Alice", Money::from_i64(40), at(1))
        };
        let settlements = vec![settlement];

        let outstanding = netter.net(&expenses, &settlements);

        assert_eq!(
            outstanding,
            vec![suggestion("Carl", "Alice", 100), suggestion("Bob", "Alice", 60)]
        );
    }

    #[rstest]
    fn overpayment_never_creates_reverse_debt(netter: OutstandingNetter) {
        let expenses = vec![Expense::fair(
            Money::from_i64(100),
            "Alice",
            ["Alice", "Bob"],
        )];
        let settlements = vec![Settlement::paid("Bob", "Alice", Money::from_i64(80), at(1))];

        assert!(netter.net(&expenses, &settlements).is_empty());
    }

    #[rstest]
    fn settlement_for_unknown_pair_is_ignored(netter: OutstandingNetter) {
        let expenses = vec![Expense::fair(
            Money::from_i64(100),
            "Alice",
            ["Alice", "Bob"],
        )];
        let settlements = vec![Settlement::paid("Alice", "Bob", Money::from_i64(30), at(1))];

        assert_eq!(
            netter.net(&expenses, &settlements),
            vec![suggestion("Bob", "Alice", 50)]
        );
    }

    #[rstest]
    fn tiny_shares_are_skipped(netter: OutstandingNetter) {
        let expenses = vec![Expense::custom(
            Money::new(1, 2),
            "A",
            ["A", "B"],
            [("B", Money::new(9, 3))],
        )];

        assert!(netter.net(&expenses, NO_SETTLEMENTS).is_empty());
    }

    #[rstest]
    fn sorted_by_descending_amount_with_stable_ties(netter: OutstandingNetter) {
        let expenses = vec![
            Expense::fair(Money::from_i64(20), "Dana", ["Dana", "Eve"]),
            Expense::fair(Money::from_i64(90), "Alice", ["Alice", "Bob", "Carl"]),
        ];

        let outstanding = netter.net(&expenses, NO_SETTLEMENTS);

        assert_eq!(
            outstanding,
            vec![
                suggestion("Bob", "Alice", 30),
                suggestion("Carl", "Alice", 30),
                suggestion("Eve", "Dana", 10),
            ]
        );
    }
}
