use crate::domain::money::Amount;
use crate::domain::{GroupId, SettlementId, UserId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Completed,
    Cancelled,
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Completed => "completed",
            SettlementStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A directed debt-clearing record from `from_user_id` to `to_user_id`.
///
/// State machine: `Pending -> Completed` or `Pending -> Cancelled`. Both
/// targets are terminal; any transition out of a terminal state fails with
/// `InvalidStateTransition` and leaves the record untouched.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Settlement {
    pub id: SettlementId,
    pub group_id: GroupId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub amount: Amount,
    pub currency: String,
    pub status: SettlementStatus,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Settlement {
    pub fn new(
        id: SettlementId,
        group_id: GroupId,
        from_user_id: UserId,
        to_user_id: UserId,
        amount: Amount,
        currency: String,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if from_user_id == to_user_id {
            return Err(LedgerError::ValidationError(
                "a settlement needs two distinct users".to_string(),
            ));
        }
        Ok(Self {
            id,
            group_id,
            from_user_id,
            to_user_id,
            amount,
            currency,
            status: SettlementStatus::Pending,
            created_at: now,
            settled_at: None,
        })
    }

    /// `Pending -> Completed`, stamping the completion time.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.transition(SettlementStatus::Completed)?;
        self.settled_at = Some(at);
        Ok(())
    }

    /// `Pending -> Cancelled`. Not reachable from any current flow, but the
    /// state machine supports it.
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(SettlementStatus::Cancelled)
    }

    fn transition(&mut self, to: SettlementStatus) -> Result<()> {
        if self.status != SettlementStatus::Pending {
            return Err(LedgerError::InvalidStateTransition(format!(
                "settlement {} is {}, cannot become {to}",
                self.id, self.status
            )));
        }
        self.status = to;
        Ok(())
    }
}
