use crate::model::{Balance, Money, TransactionSuggestion};

/// Greedy settlement planner over net balances.
///
/// Debtors and creditors are matched with two cursors in balance order, so the
/// plan is deterministic and holds at most `debtors + creditors - 1` transfers.
/// It is not guaranteed to be the global minimum.
pub struct DebtSimplifier;

struct Position<'a> {
    name: &'a str,
    amount: Money,
}

impl DebtSimplifier {
    /// Suggest transfers that bring every balance to zero
    ///
    /// Transfers of [`Money::SETTLE_EPSILON`] or less are not emitted, and any
    /// residue left below that threshold is dropped as rounding noise.
    pub fn simplify<'a>(&self, balances: &[Balance<'a>]) -> Vec<TransactionSuggestion<'a>> {
        let mut debtors: Vec<Position<'a>> = balances
            .iter()
            .filter(|balance| balance.net.is_negative())
            .map(|balance| Position {
                name: balance.name,
                amount: -balance.net,
            })
            .collect();
        let mut creditors: Vec<Position<'a>> = balances
            .iter()
            .filter(|balance| balance.net.is_positive())
            .map(|balance| Position {
                name: balance.name,
                amount: balance.net,
            })
            .collect();

        let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];
            let settle_amount = debtor.amount.min(creditor.amount);

            if settle_amount.is_significant() {
                transactions.push(TransactionSuggestion {
                    from: debtor.name,
                    to: creditor.name,
                    amount: settle_amount,
                });
            }

            debtor.amount -= settle_amount;
            creditor.amount -= settle_amount;

            if debtor.amount < Money::SETTLE_EPSILON {
                i += 1;
            }
            if creditor.amount < Money::SETTLE_EPSILON {
                j += 1;
            }
        }

        let residue: Money = debtors
            .iter()
            .chain(&creditors)
            .map(|position| position.amount)
            .sum();
        if !residue.is_zero() {
            tracing::debug!(
                residue = %residue,
                transaction_count = transactions.len(),
                "Dropped rounding residue while simplifying debts"
            );
        }

        transactions
    }
}
