pub mod balance_calculator;
pub mod debt_simplifier;
pub mod outstanding_netter;

pub use balance_calculator::BalanceCalculator;
pub use debt_simplifier::DebtSimplifier;
pub use outstanding_netter::OutstandingNetter;
