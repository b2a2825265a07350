use crate::model::{ExpenseId, SettlementId};
use thiserror::Error;
use tripsplit_domain::{Money, SettlementTransitionError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseValidationError {
    #[error("expense amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Money),
    #[error("expense amount {0} is too large")]
    AmountTooLarge(Money),
    #[error("expense must be split between at least one participant")]
    EmptySplit,
    #[error("{0} is not a participant of this trip")]
    UnknownParticipant(String),
    #[error("{0} appears more than once in the split")]
    DuplicateMember(String),
    #[error("custom share for {name} must not be negative (got {share})")]
    NegativeShare { name: String, share: Money },
    #[error("custom share given for {0}, who is not part of the split")]
    ShareOutsideSplit(String),
    #[error("custom amounts ({shares}) don't match total ({amount})")]
    CustomSplitMismatch { shares: Money, amount: Money },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementRequestError {
    #[error("{0} cannot pay themselves")]
    SelfPayment(String),
    #[error("settlement amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Money),
    #[error("settlement amount {0} is too large")]
    AmountTooLarge(Money),
    #[error("{0} is not a participant of this trip")]
    UnknownParticipant(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidExpense(#[from] ExpenseValidationError),
    #[error(transparent)]
    InvalidSettlement(#[from] SettlementRequestError),
    #[error(transparent)]
    Transition(#[from] SettlementTransitionError),
    #[error("expense {0} not found")]
    UnknownExpense(ExpenseId),
    #[error("settlement {0} not found")]
    UnknownSettlement(SettlementId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot '{path}': {message}")]
    Read { path: String, message: String },
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("invalid amount {value} in {context}")]
    InvalidAmount { context: String, value: String },
    #[error("invalid timestamp {value} in {context}")]
    InvalidTimestamp { context: String, value: i64 },
}
