#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Balance, Expense, Money, PaymentMethod, Settlement, SettlementStatus,
    SettlementTransitionError, SplitType, TransactionSuggestion,
};
pub use services::{BalanceCalculator, DebtSimplifier, OutstandingNetter};
