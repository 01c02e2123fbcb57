use crate::domain::balance::{Balance, compute_group_balances};
use crate::domain::event::{EventKind, OutboundNotification};
use crate::domain::expense::{Expense, SplitStrategy};
use crate::domain::group::{Group, GroupMember, MemberRole};
use crate::domain::money::{Amount, DEFAULT_CURRENCY};
use crate::domain::ports::{
    ExpenseStoreBox, GroupStoreBox, NotificationDispatcherBox, SettlementStoreBox,
};
use crate::domain::settlement::Settlement;
use crate::domain::split::compute_splits;
use crate::domain::{GroupId, UserId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

/// The identity fields of a user joining a group; role and join time are
/// decided by the engine.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
}

impl MemberProfile {
    fn into_member(self, role: MemberRole, now: DateTime<Utc>) -> GroupMember {
        GroupMember {
            user_id: self.user_id,
            display_name: self.display_name,
            email: self.email,
            joined_at: now,
            role,
        }
    }
}

/// Everything needed to record an expense. Splits are not supplied directly;
/// the engine computes them from the strategy, participants, and weights.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub group_id: GroupId,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub paid_by: UserId,
    pub split_strategy: SplitStrategy,
    pub participants: Vec<UserId>,
    pub weights: Option<Vec<Decimal>>,
    pub category: String,
    pub date: Option<DateTime<Utc>>,
    pub created_by: UserId,
}

/// The main entry point for shared-expense tracking.
///
/// Owns the storage and notification ports and sequences every mutation
/// through them. All computation (splits, balances, settlement transitions)
/// lives in the domain layer; the engine validates against the group,
/// persists, and emits events.
pub struct LedgerEngine {
    group_store: GroupStoreBox,
    expense_store: ExpenseStoreBox,
    settlement_store: SettlementStoreBox,
    notifier: NotificationDispatcherBox,
}

impl LedgerEngine {
    pub fn new(
        group_store: GroupStoreBox,
        expense_store: ExpenseStoreBox,
        settlement_store: SettlementStoreBox,
        notifier: NotificationDispatcherBox,
    ) -> Self {
        Self {
            group_store,
            expense_store,
            settlement_store,
            notifier,
        }
    }

    // Groups

    pub async fn create_group(
        &self,
        name: String,
        description: Option<String>,
        creator: MemberProfile,
    ) -> Result<Group> {
        let now = Utc::now();
        let group = Group::new(
            Uuid::new_v4().to_string(),
            name,
            description,
            creator.into_member(MemberRole::Admin, now),
            now,
        );
        self.group_store.store(group.clone()).await?;
        tracing::debug!(group_id = %group.id, "group created");
        Ok(group)
    }

    pub async fn add_member(&self, group_id: &str, profile: MemberProfile) -> Result<Group> {
        let mut group = self.active_group(group_id).await?;
        let now = Utc::now();
        let user_id = profile.user_id.clone();
        group.add_member(profile.into_member(MemberRole::Member, now), now)?;
        self.group_store.store(group.clone()).await?;

        self.notify(OutboundNotification::new(
            user_id,
            EventKind::MemberAdded,
            "Added to Group",
            "You have been added to a new expense group",
            json!({ "groupId": group_id }),
        ))
        .await;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group> {
        self.group(group_id).await
    }

    pub async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<Group> {
        let mut group = self.active_group(group_id).await?;
        group.remove_member(user_id, Utc::now())?;
        self.group_store.store(group.clone()).await?;
        Ok(group)
    }

    /// Soft-deletes the group and tells every member.
    pub async fn close_group(&self, group_id: &str) -> Result<Group> {
        let mut group = self.active_group(group_id).await?;
        group.close(Utc::now());
        self.group_store.store(group.clone()).await?;

        for member in &group.members {
            self.notify(OutboundNotification::new(
                member.user_id.clone(),
                EventKind::GroupClosed,
                "Group Closed",
                format!("The group \"{}\" has been closed", group.name),
                json!({ "groupId": group_id }),
            ))
            .await;
        }
        Ok(group)
    }

    // Expenses

    pub async fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense> {
        let group = self.active_group(&draft.group_id).await?;
        let expense = Self::build_expense(Uuid::new_v4().to_string(), &draft, Utc::now())?;
        expense.validate(&group)?;
        self.expense_store.append(expense.clone()).await?;
        tracing::debug!(expense_id = %expense.id, group_id = %group.id, "expense recorded");

        for member in &group.members {
            if member.user_id != expense.created_by {
                self.notify(OutboundNotification::new(
                    member.user_id.clone(),
                    EventKind::ExpenseAdded,
                    "New Expense Added",
                    format!("{} - {} {}", expense.title, expense.currency, expense.amount),
                    json!({ "groupId": expense.group_id, "expenseId": expense.id }),
                ))
                .await;
            }
        }
        Ok(expense)
    }

    /// Replaces an expense's content, re-validating the reconciliation
    /// invariant against the stored group. Identity and creation audit
    /// fields are preserved.
    pub async fn update_expense(&self, expense_id: &str, draft: ExpenseDraft) -> Result<Expense> {
        let existing = self
            .expense_store
            .get(expense_id)
            .await?
            .ok_or_else(|| LedgerError::NotFoundError(format!("expense {expense_id}")))?;
        if existing.group_id != draft.group_id {
            return Err(LedgerError::ValidationError(
                "an expense cannot move between groups".to_string(),
            ));
        }

        let group = self.active_group(&draft.group_id).await?;
        let mut updated = Self::build_expense(existing.id.clone(), &draft, Utc::now())?;
        updated.created_by = existing.created_by;
        updated.created_at = existing.created_at;
        updated.validate(&group)?;
        self.expense_store.update(updated.clone()).await?;
        Ok(updated)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<()> {
        if self.expense_store.get(expense_id).await?.is_none() {
            return Err(LedgerError::NotFoundError(format!("expense {expense_id}")));
        }
        self.expense_store.remove(expense_id).await
    }

    /// Recomputes the group's balances from its full expense history.
    pub async fn group_balances(&self, group_id: &str) -> Result<Vec<Balance>> {
        // Closed groups keep their history readable.
        self.group(group_id).await?;
        let expenses = self.expense_store.list_by_group(group_id).await?;
        Ok(compute_group_balances(&expenses, group_id))
    }

    // Settlements

    pub async fn create_settlement(
        &self,
        group_id: &str,
        from_user_id: UserId,
        to_user_id: UserId,
        amount: Decimal,
        currency: Option<String>,
    ) -> Result<Settlement> {
        let group = self.group(group_id).await?;
        for user_id in [&from_user_id, &to_user_id] {
            if !group.is_member(user_id) {
                return Err(LedgerError::ValidationError(format!(
                    "user {user_id} is not a member of group {group_id}"
                )));
            }
        }

        let settlement = Settlement::new(
            Uuid::new_v4().to_string(),
            group_id.to_string(),
            from_user_id,
            to_user_id.clone(),
            Amount::new(amount)?,
            currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            Utc::now(),
        )?;
        self.settlement_store.append(settlement.clone()).await?;

        self.notify(OutboundNotification::new(
            to_user_id,
            EventKind::SettlementRequest,
            "Settlement Request",
            format!("Settlement request for {} {}", settlement.currency, settlement.amount),
            json!({ "settlementId": settlement.id, "groupId": group_id }),
        ))
        .await;
        Ok(settlement)
    }

    /// Marks a pending settlement as completed. Emits no event; only
    /// creation notifies.
    pub async fn complete_settlement(&self, settlement_id: &str) -> Result<Settlement> {
        let mut settlement = self.settlement(settlement_id).await?;
        settlement.complete(Utc::now())?;
        self.settlement_store.update(settlement.clone()).await?;
        Ok(settlement)
    }

    pub async fn cancel_settlement(&self, settlement_id: &str) -> Result<Settlement> {
        let mut settlement = self.settlement(settlement_id).await?;
        settlement.cancel()?;
        self.settlement_store.update(settlement.clone()).await?;
        Ok(settlement)
    }

    // Helpers

    fn build_expense(id: String, draft: &ExpenseDraft, now: DateTime<Utc>) -> Result<Expense> {
        let splits = compute_splits(
            draft.amount,
            draft.split_strategy,
            &draft.participants,
            draft.weights.as_deref(),
        )?;
        Ok(Expense {
            id,
            group_id: draft.group_id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            amount: Amount::new(draft.amount)?,
            currency: draft
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            paid_by: draft.paid_by.clone(),
            split_strategy: draft.split_strategy,
            splits,
            category: draft.category.clone(),
            date: draft.date.unwrap_or(now),
            created_by: draft.created_by.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn group(&self, group_id: &str) -> Result<Group> {
        self.group_store
            .get(group_id)
            .await?
            .ok_or_else(|| LedgerError::NotFoundError(format!("group {group_id}")))
    }

    async fn active_group(&self, group_id: &str) -> Result<Group> {
        let group = self.group(group_id).await?;
        if !group.is_active {
            return Err(LedgerError::ValidationError(format!(
                "group {group_id} is closed"
            )));
        }
        Ok(group)
    }

    async fn settlement(&self, settlement_id: &str) -> Result<Settlement> {
        self.settlement_store
            .get(settlement_id)
            .await?
            .ok_or_else(|| LedgerError::NotFoundError(format!("settlement {settlement_id}")))
    }

    async fn notify(&self, notification: OutboundNotification) {
        if let Err(err) = self.notifier.dispatch(notification).await {
            tracing::warn!("notification dispatch failed: {err}");
        }
    }
}
