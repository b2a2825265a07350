use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::PathBuf};
use tripsplit_application::{SnapshotError, TripSnapshot, TripSnapshotSource};
use tripsplit_domain::{Expense, Money, PaymentMethod, Settlement, SettlementStatus};

/// Trip snapshot stored as a JSON document on disk.
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TripSnapshotSource for JsonSnapshotSource {
    fn load(&self) -> Result<TripSnapshot, SnapshotError> {
        let source = fs::read_to_string(&self.path).map_err(|err| SnapshotError::Read {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })?;
        parse_snapshot(&source)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripDocument {
    #[serde(default)]
    name: String,
    participants: Vec<String>,
    #[serde(default)]
    expenses: Vec<ExpenseDocument>,
    #[serde(default)]
    settlements: Vec<SettlementDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseDocument {
    #[serde(default)]
    title: String,
    amount: f64,
    paid_by: String,
    split_between: Vec<String>,
    #[serde(default)]
    per_person_amount: Option<f64>,
    #[serde(default)]
    split_type: Option<SplitTypeDocument>,
    #[serde(default)]
    custom_splits: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    payment_method: Option<PaymentMethodDocument>,
    #[serde(default)]
    created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SplitTypeDocument {
    Fair,
    Custom,
}

#[derive(Debug, Deserialize)]
enum PaymentMethodDocument {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettlementDocument {
    from: String,
    to: String,
    amount: f64,
    #[serde(default)]
    is_paid: bool,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    paid_at: Option<i64>,
    #[serde(default)]
    proof_image_url: Option<String>,
}

/// Parse a trip document into a snapshot.
///
/// Keys follow the stored record layout (`paidBy`, `splitBetween`,
/// `perPersonAmount`, `customSplits`, `isPaid`, ...), with amounts as JSON
/// numbers and timestamps as Unix milliseconds. A fair expense without a
/// stored `perPersonAmount` gets its share derived once here.
pub fn parse_snapshot(source: &str) -> Result<TripSnapshot, SnapshotError> {
    let document: TripDocument =
        serde_json::from_str(source).map_err(|err| SnapshotError::Malformed(err.to_string()))?;

    let expenses = document
        .expenses
        .into_iter()
        .enumerate()
        .map(|(idx, expense)| to_expense(idx, expense))
        .collect::<Result<Vec<_>, _>>()?;
    let settlements = document
        .settlements
        .into_iter()
        .enumerate()
        .map(|(idx, settlement)| to_settlement(idx, settlement))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        trip = %document.name,
        expense_count = expenses.len(),
        settlement_count = settlements.len(),
        "Parsed trip snapshot"
    );

    Ok(TripSnapshot {
        name: document.name,
        participants: document.participants,
        expenses,
        settlements,
    })
}

fn to_expense(idx: usize, document: ExpenseDocument) -> Result<Expense, SnapshotError> {
    let context = format!("expenses[{idx}]");
    let amount = to_money(&context, document.amount)?;

    let expense = match document.split_type.unwrap_or(SplitTypeDocument::Fair) {
        SplitTypeDocument::Fair => match document.per_person_amount {
            Some(per_person) => Expense::fair_with_stored_share(
                amount,
                document.paid_by,
                document.split_between,
                to_money(&context, per_person)?,
            ),
            None => Expense::fair(amount, document.paid_by, document.split_between),
        },
        SplitTypeDocument::Custom => {
            let shares = document
                .custom_splits
                .unwrap_or_default()
                .into_iter()
                .map(|(name, share)| Ok((name, to_money(&context, share)?)))
                .collect::<Result<Vec<_>, SnapshotError>>()?;
            Expense::custom(amount, document.paid_by, document.split_between, shares)
        }
    };

    let payment_method = match document.payment_method {
        Some(PaymentMethodDocument::Upi) => PaymentMethod::Upi,
        Some(PaymentMethodDocument::Cash) | None => PaymentMethod::Cash,
    };
    let mut expense = expense
        .with_title(document.title)
        .with_payment_method(payment_method);
    if let Some(created_at) = document.created_at {
        expense = expense.with_created_at(to_timestamp(&context, created_at)?);
    }
    Ok(expense)
}

fn to_settlement(idx: usize, document: SettlementDocument) -> Result<Settlement, SnapshotError> {
    let context = format!("settlements[{idx}]");
    let amount = to_money(&context, document.amount)?;
    let created_at = match document.created_at {
        Some(millis) => to_timestamp(&context, millis)?,
        None => DateTime::<Utc>::UNIX_EPOCH,
    };

    let status = if document.is_paid {
        let paid_at = match document.paid_at {
            Some(millis) => to_timestamp(&context, millis)?,
            None => created_at,
        };
        SettlementStatus::Paid { paid_at }
    } else {
        SettlementStatus::Pending
    };

    let settlement = Settlement::restore(document.from, document.to, amount, status, created_at);
    Ok(match document.proof_image_url {
        Some(proof) => settlement.with_proof(proof),
        None => settlement,
    })
}

/// Amounts outside [`Money::MAX_AMOUNT`] are rejected here so that later sums cannot overflow.
fn to_money(context: &str, value: f64) -> Result<Money, SnapshotError> {
    Decimal::from_f64(value)
        .map(Money::from_decimal)
        .filter(|amount| amount.is_within_bounds())
        .ok_or_else(|| SnapshotError::InvalidAmount {
            context: context.to_string(),
            value: value.to_string(),
        })
}

fn to_timestamp(context: &str, millis: i64) -> Result<DateTime<Utc>, SnapshotError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| SnapshotError::InvalidTimestamp {
        context: context.to_string(),
        value: millis,
    })
}
