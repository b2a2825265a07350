use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use rust_decimal::Decimal;
use thiserror::Error;

/// Currency amount in exact decimal precision.
///
/// Amounts are compared against two tolerances inherited from the float-based
/// bookkeeping this model replaces:
/// - [`Money::SETTLE_EPSILON`] (0.01) decides whether a balance is settled and
///   whether a transfer is worth suggesting.
/// - [`Money::SHARE_EPSILON`] (0.009) decides whether a direct share or a
///   netted pair still counts as outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const SETTLE_EPSILON: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));
    pub const SHARE_EPSILON: Money = Money(Decimal::from_parts(9, 0, 0, false, 3));
    /// Largest magnitude accepted from outside input (10^15).
    ///
    /// Far below `Decimal::MAX`, so sums over any realistic number of records
    /// cannot overflow.
    pub const MAX_AMOUNT: Money = Money(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    /// Creates an amount from a mantissa and a decimal scale (`new(1250, 2)` is 12.50).
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// `true` when the magnitude does not exceed [`Money::MAX_AMOUNT`].
    pub fn is_within_bounds(self) -> bool {
        self.abs() <= Self::MAX_AMOUNT
    }

    /// Equal share of this amount for `count` people.
    ///
    /// A zero count yields zero instead of panicking; callers are expected to
    /// reject empty splits before they get here.
    pub fn split_evenly(self, count: usize) -> Self {
        let Ok(count) = u64::try_from(count) else {
            return Self::ZERO;
        };
        self.0
            .checked_div(Decimal::from(count))
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    /// `true` when both amounts differ by less than [`Money::SETTLE_EPSILON`].
    pub fn approx_eq(self, other: Money) -> bool {
        (self - other).abs() < Self::SETTLE_EPSILON
    }

    /// `true` when the magnitude is below [`Money::SETTLE_EPSILON`].
    pub fn is_settled(self) -> bool {
        self.abs() < Self::SETTLE_EPSILON
    }

    /// `true` when the amount is large enough to be worth a transfer.
    pub fn is_significant(self) -> bool {
        self > Self::SETTLE_EPSILON
    }

    pub fn exceeds_share_epsilon(self) -> bool {
        self > Self::SHARE_EPSILON
    }

    /// Rounds half away from zero to `dp` decimal places.
    pub fn round_dp(self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Upi,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Upi => write!(f, "UPI"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitType {
    Fair,
    Custom,
}

/// How an expense is divided among the people it was split between.
#[derive(Clone, Debug, PartialEq)]
enum Split {
    /// Equal division; the per-person share is fixed when the expense is recorded.
    Fair { per_person: Money },
    /// Explicit shares keyed by participant name.
    Custom { shares: FxHashMap<String, Money> },
}

impl Split {
    fn split_type(&self) -> SplitType {
        match self {
            Split::Fair { .. } => SplitType::Fair,
            Split::Custom { .. } => SplitType::Custom,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    title: String,
    amount: Money,
    paid_by: String,
    split_between: Vec<String>,
    split: Split,
    payment_method: PaymentMethod,
    created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Records an equally split expense, fixing the per-person share now.
    pub fn fair<S, I>(amount: Money, paid_by: S, split_between: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let split_between: Vec<String> = split_between.into_iter().map(Into::into).collect();
        let per_person = amount.split_evenly(split_between.len());
        Self::with_split(amount, paid_by, split_between, Split::Fair { per_person })
    }

    /// Restores an equally split expense with a share computed when it was first recorded.
    pub fn fair_with_stored_share<S, I>(
        amount: Money,
        paid_by: S,
        split_between: I,
        per_person: Money,
    ) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let split_between = split_between.into_iter().map(Into::into).collect();
        Self::with_split(amount, paid_by, split_between, Split::Fair { per_person })
    }

    pub fn custom<S, I, C, K>(amount: Money, paid_by: S, split_between: I, shares: C) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
        C: IntoIterator<Item = (K, Money)>,
        K: Into<String>,
    {
        let split_between = split_between.into_iter().map(Into::into).collect();
        let shares = shares
            .into_iter()
            .map(|(name, share)| (name.into(), share))
            .collect();
        Self::with_split(amount, paid_by, split_between, Split::Custom { shares })
    }

    fn with_split(
        amount: Money,
        paid_by: impl Into<String>,
        split_between: Vec<String>,
        split: Split,
    ) -> Self {
        Self {
            title: String::new(),
            amount,
            paid_by: paid_by.into(),
            split_between,
            split,
            payment_method: PaymentMethod::default(),
            created_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_by(&self) -> &str {
        &self.paid_by
    }

    pub fn split_between(&self) -> &[String] {
        &self.split_between
    }

    pub fn split_type(&self) -> SplitType {
        self.split.split_type()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Stored equal share; zero for custom splits.
    pub fn per_person_amount(&self) -> Money {
        match &self.split {
            Split::Fair { per_person } => *per_person,
            Split::Custom { .. } => Money::ZERO,
        }
    }

    /// Share owed by `name`, assuming `name` is one of the split members.
    ///
    /// A custom split without an entry for `name` contributes nothing.
    pub fn share_of(&self, name: &str) -> Money {
        match &self.split {
            Split::Fair { per_person } => *per_person,
            Split::Custom { shares } => shares.get(name).copied().unwrap_or(Money::ZERO),
        }
    }

    /// Split members with repeated names yielded once, in first-seen order.
    pub fn members(&self) -> impl Iterator<Item = &str> + '_ {
        self.split_between
            .iter()
            .enumerate()
            .filter(|(idx, member)| !self.split_between[..*idx].contains(member))
            .map(|(_, member)| member.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementStatus {
    Pending,
    Paid { paid_at: DateTime<Utc> },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettlementTransitionError {
    #[error("settlement from {from} to {to} is already paid")]
    AlreadyPaid { from: String, to: String },
}

/// A recorded payment between two participants.
///
/// Parties and amount are fixed at creation. The status only moves from
/// [`SettlementStatus::Pending`] to [`SettlementStatus::Paid`].
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    from: String,
    to: String,
    amount: Money,
    status: SettlementStatus,
    created_at: DateTime<Utc>,
    proof: Option<String>,
}

impl Settlement {
    pub fn pending(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::restore(from, to, amount, SettlementStatus::Pending, created_at)
    }

    /// A payment that was already made when it got recorded.
    pub fn paid(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::restore(
            from,
            to,
            amount,
            SettlementStatus::Paid {
                paid_at: created_at,
            },
            created_at,
        )
    }

    pub fn restore(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Money,
        status: SettlementStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            status,
            created_at,
            proof: None,
        }
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = Some(proof.into());
        self
    }

    pub fn mark_paid(
        &mut self,
        paid_at: DateTime<Utc>,
        proof: Option<String>,
    ) -> Result<(), SettlementTransitionError> {
        if self.is_paid() {
            return Err(SettlementTransitionError::AlreadyPaid {
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }

        self.status = SettlementStatus::Paid { paid_at };
        if proof.is_some() {
            self.proof = proof;
        }
        Ok(())
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.status, SettlementStatus::Paid { .. })
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            SettlementStatus::Paid { paid_at } => Some(paid_at),
            SettlementStatus::Pending => None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn proof(&self) -> Option<&str> {
        self.proof.as_deref()
    }
}

/// What one participant paid, what they owe, and the difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance<'a> {
    pub name: &'a str,
    pub paid: Money,
    pub owed: Money,
    pub net: Money,
}

impl<'a> Balance<'a> {
    pub fn new(name: &'a str, paid: Money, owed: Money) -> Self {
        Self {
            name,
            paid,
            owed,
            net: paid - owed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionSuggestion<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: Money,
}
