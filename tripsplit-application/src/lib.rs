#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger;
pub mod model;
pub mod ports;
pub mod report;
pub mod validation;

pub use error::{ExpenseValidationError, LedgerError, SettlementRequestError, SnapshotError};
pub use ledger::TripLedger;
pub use model::{ExpenseDraft, ExpenseId, SettlementDraft, SettlementId, SplitDraft, TripSnapshot};
pub use ports::TripSnapshotSource;
pub use report::{SettlementReport, SuggestedTransfer};
