use crate::domain::group::Group;
use crate::domain::money::{Amount, TOLERANCE, approximately_equal, round_minor_unit};
use crate::domain::{ExpenseId, GroupId, UserId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    Equal,
    Percentage,
    Exact,
}

/// One participant's share of an expense. `percentage` is only carried for
/// percentage-strategy expenses, as an audit trail of the requested weights.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ExpenseSplit {
    pub user_id: UserId,
    pub amount: Decimal,
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub title: String,
    pub description: Option<String>,
    pub amount: Amount,
    pub currency: String,
    pub paid_by: UserId,
    pub split_strategy: SplitStrategy,
    pub splits: Vec<ExpenseSplit>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Checks the expense against its group: payer and every split user must
    /// be members, and the split set must reconcile with the total.
    ///
    /// Called on creation and again on every update, so a stored expense
    /// never violates the reconciliation invariant.
    pub fn validate(&self, group: &Group) -> Result<()> {
        if !group.is_member(&self.paid_by) {
            return Err(LedgerError::ValidationError(format!(
                "payer {} is not a member of group {}",
                self.paid_by, group.id
            )));
        }
        for split in &self.splits {
            if !group.is_member(&split.user_id) {
                return Err(LedgerError::ValidationError(format!(
                    "split user {} is not a member of group {}",
                    split.user_id, group.id
                )));
            }
        }
        self.validate_reconciliation()
    }

    fn validate_reconciliation(&self) -> Result<()> {
        if self.splits.is_empty() {
            return Err(LedgerError::ValidationError(
                "expense has no splits".to_string(),
            ));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.splits.len());
        for split in &self.splits {
            if seen.contains(&split.user_id.as_str()) {
                return Err(LedgerError::ValidationError(format!(
                    "duplicate split user {}",
                    split.user_id
                )));
            }
            seen.push(&split.user_id);
        }

        let total = self.amount.value();
        match self.split_strategy {
            SplitStrategy::Equal => {
                // Equal shares may drift by a minor unit in aggregate; each
                // share must still sit within tolerance of the even share.
                let even = total / Decimal::from(self.splits.len() as u64);
                for split in &self.splits {
                    if !approximately_equal(split.amount, round_minor_unit(even), TOLERANCE) {
                        return Err(LedgerError::ValidationError(format!(
                            "equal split share {} deviates from even share of {}",
                            split.amount, total
                        )));
                    }
                }
                Ok(())
            }
            SplitStrategy::Percentage => {
                let pct_sum: Decimal = self
                    .splits
                    .iter()
                    .map(|s| s.percentage.unwrap_or(Decimal::ZERO))
                    .sum();
                if !approximately_equal(pct_sum, Decimal::from(100), TOLERANCE) {
                    return Err(LedgerError::ValidationError(format!(
                        "percentages sum to {pct_sum}, expected 100"
                    )));
                }
                self.validate_split_sum(total)
            }
            SplitStrategy::Exact => self.validate_split_sum(total),
        }
    }

    fn validate_split_sum(&self, total: Decimal) -> Result<()> {
        let sum: Decimal = self.splits.iter().map(|s| s.amount).sum();
        if approximately_equal(sum, total, TOLERANCE) {
            Ok(())
        } else {
            Err(LedgerError::ValidationError(format!(
                "splits sum to {sum}, expected {total}"
            )))
        }
    }
}
