use std::fmt;
use tripsplit_domain::{Expense, Money, PaymentMethod, Settlement};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettlementId(pub u64);

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SplitDraft {
    Fair,
    Custom(Vec<(String, Money)>),
}

/// Expense as entered, before it is checked against the trip.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: Money,
    pub paid_by: String,
    pub split_between: Vec<String>,
    pub split: SplitDraft,
    pub payment_method: PaymentMethod,
}

impl ExpenseDraft {
    pub fn fair<I>(
        title: impl Into<String>,
        amount: Money,
        paid_by: impl Into<String>,
        split_between: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            title: title.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.into_iter().map(Into::into).collect(),
            split: SplitDraft::Fair,
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn custom<I, K>(
        title: impl Into<String>,
        amount: Money,
        paid_by: impl Into<String>,
        shares: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, Money)>,
        K: Into<String>,
    {
        let shares: Vec<(String, Money)> = shares
            .into_iter()
            .map(|(name, share)| (name.into(), share))
            .collect();
        Self {
            title: title.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: shares.iter().map(|(name, _)| name.clone()).collect(),
            split: SplitDraft::Custom(shares),
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn paid_with(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementDraft {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

impl SettlementDraft {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Money) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Point-in-time copy of a trip's stored records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripSnapshot {
    pub name: String,
    pub participants: Vec<String>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}
