use crate::{
    error::{ExpenseValidationError, SettlementRequestError},
    model::{ExpenseDraft, SettlementDraft, SplitDraft},
};
use fxhash::FxHashSet;
use tripsplit_domain::{Expense, Money};

impl ExpenseDraft {
    /// Check the draft against the trip roster and record it as an expense
    ///
    /// Fair splits get their per-person share fixed here. Custom shares must
    /// cover only split members and add up to the amount within
    /// [`Money::SETTLE_EPSILON`].
    pub fn validate(self, participants: &[String]) -> Result<Expense, ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_bounds() {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }
        if self.split_between.is_empty() {
            return Err(ExpenseValidationError::EmptySplit);
        }
        ensure_participant(participants, &self.paid_by)
            .map_err(ExpenseValidationError::UnknownParticipant)?;

        let mut members: FxHashSet<&str> = FxHashSet::default();
        for member in &self.split_between {
            ensure_participant(participants, member)
                .map_err(ExpenseValidationError::UnknownParticipant)?;
            if !members.insert(member.as_str()) {
                return Err(ExpenseValidationError::DuplicateMember(member.clone()));
            }
        }

        let expense = match self.split {
            SplitDraft::Fair => Expense::fair(self.amount, self.paid_by, self.split_between),
            SplitDraft::Custom(shares) => {
                let mut named: FxHashSet<&str> = FxHashSet::default();
                for (name, share) in &shares {
                    if !members.contains(name.as_str()) {
                        return Err(ExpenseValidationError::ShareOutsideSplit(name.clone()));
                    }
                    if !named.insert(name.as_str()) {
                        return Err(ExpenseValidationError::DuplicateMember(name.clone()));
                    }
                    if share.is_negative() {
                        return Err(ExpenseValidationError::NegativeShare {
                            name: name.clone(),
                            share: *share,
                        });
                    }
                }

                let total: Money = shares.iter().map(|(_, share)| *share).sum();
                if (total - self.amount).abs() > Money::SETTLE_EPSILON {
                    return Err(ExpenseValidationError::CustomSplitMismatch {
                        shares: total,
                        amount: self.amount,
                    });
                }
                Expense::custom(self.amount, self.paid_by, self.split_between, shares)
            }
        };

        Ok(expense
            .with_title(self.title)
            .with_payment_method(self.payment_method))
    }
}

impl SettlementDraft {
    pub fn validate(&self, participants: &[String]) -> Result<(), SettlementRequestError> {
        if self.from == self.to {
            return Err(SettlementRequestError::SelfPayment(self.from.clone()));
        }
        if !self.amount.is_positive() {
            return Err(SettlementRequestError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_bounds() {
            return Err(SettlementRequestError::AmountTooLarge(self.amount));
        }
        ensure_participant(participants, &self.from)
            .map_err(SettlementRequestError::UnknownParticipant)?;
        ensure_participant(participants, &self.to)
            .map_err(SettlementRequestError::UnknownParticipant)?;
        Ok(())
    }
}

fn ensure_participant(participants: &[String], name: &str) -> Result<(), String> {
    if participants.iter().any(|participant| participant == name) {
        Ok(())
    } else {
        Err(name.to_string())
    }
}
