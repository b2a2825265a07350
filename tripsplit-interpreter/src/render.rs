use crate::config::InterpreterConfig;
use tripsplit_application::SettlementReport;
use tripsplit_domain::{Expense, Money, Settlement, SettlementStatus, SplitType};

/// Plain-text rendering of a trip report.
pub struct ReportRenderer<'c> {
    config: &'c InterpreterConfig,
}

impl<'c> ReportRenderer<'c> {
    pub fn new(config: &'c InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, trip: &str, report: &SettlementReport<'_>) -> String {
        let mut lines = vec![format!("Trip: {trip}"), String::new()];

        lines.push("Expenses".to_string());
        if report.expenses.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (id, expense) in &report.expenses {
            lines.push(format!("  {id} {}", self.expense(expense)));
        }

        lines.push(String::new());
        lines.push("Balances".to_string());
        let width = report
            .balances
            .iter()
            .map(|balance| balance.name.chars().count())
            .max()
            .unwrap_or(0);
        for balance in &report.balances {
            lines.push(format!(
                "  {:<width$}  paid {}  owed {}  net {}",
                balance.name,
                self.money(balance.paid),
                self.money(balance.owed),
                self.signed(balance.net),
            ));
        }

        lines.push(String::new());
        lines.push("Suggested transactions".to_string());
        if report.suggestions.is_empty() {
            lines.push("  (none)".to_string());
        }
        for suggestion in &report.suggestions {
            let transfer = &suggestion.transfer;
            let marker = if suggestion.tracked { " (tracked)" } else { "" };
            lines.push(format!(
                "  {} -> {}: {}{marker}",
                transfer.from,
                transfer.to,
                self.money(transfer.amount)
            ));
        }

        lines.push(String::new());
        lines.push("Outstanding".to_string());
        if report.outstanding.is_empty() {
            lines.push("  (none)".to_string());
        }
        for transfer in &report.outstanding {
            lines.push(format!(
                "  {} owes {} {}",
                transfer.from,
                transfer.to,
                self.money(transfer.amount)
            ));
        }

        let mut log: Vec<_> = report.pending.iter().chain(&report.paid).collect();
        log.sort_by_key(|(id, _)| *id);
        if !log.is_empty() {
            lines.push(String::new());
            lines.push("Settlements".to_string());
            for (id, settlement) in log {
                lines.push(format!("  {id} {}", self.settlement(settlement)));
            }
        }

        if report.is_fully_settled() {
            lines.push(String::new());
            lines.push("All settled!".to_string());
        }

        lines.join("\n")
    }

    fn expense(&self, expense: &Expense) -> String {
        let title = match expense.title() {
            "" => "(untitled)",
            title => title,
        };
        let date = expense
            .created_at()
            .map(|created_at| created_at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let count = expense.split_between().len();
        let people = if count == 1 { "person" } else { "people" };
        let share = match expense.split_type() {
            SplitType::Fair => format!("{} each", self.money(expense.per_person_amount())),
            SplitType::Custom => "custom split".to_string(),
        };
        format!(
            "{title} ({date}): {} paid {} by {}, {count} {people}, {share}",
            expense.paid_by(),
            self.money(expense.amount()),
            expense.payment_method(),
        )
    }

    fn settlement(&self, settlement: &Settlement) -> String {
        let state = match settlement.status() {
            SettlementStatus::Pending => "pending".to_string(),
            SettlementStatus::Paid { paid_at } => {
                format!("paid {}", paid_at.format("%Y-%m-%d %H:%M"))
            }
        };
        let proof = settlement
            .proof()
            .map(|proof| format!(" [{proof}]"))
            .unwrap_or_default();
        format!(
            "{} -> {} {} {state}{proof}",
            settlement.from(),
            settlement.to(),
            self.money(settlement.amount())
        )
    }

    fn money(&self, amount: Money) -> String {
        let scale = self.config.display_scale as usize;
        let rounded = amount.round_dp(self.config.display_scale);
        if rounded.is_zero() {
            format!("{}{:.scale$}", self.config.currency, Money::ZERO.as_decimal())
        } else if rounded.is_negative() {
            format!("-{}{:.scale$}", self.config.currency, (-rounded).as_decimal())
        } else {
            format!("{}{:.scale$}", self.config.currency, rounded.as_decimal())
        }
    }

    fn signed(&self, amount: Money) -> String {
        if amount.round_dp(self.config.display_scale).is_positive() {
            format!("+{}", self.money(amount))
        } else {
            self.money(amount)
        }
    }
}
