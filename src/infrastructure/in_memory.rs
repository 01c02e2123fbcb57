use crate::domain::event::OutboundNotification;
use crate::domain::expense::Expense;
use crate::domain::group::Group;
use crate::domain::ports::{
    ExpenseStore, GroupStore, NotificationDispatcher, SettlementStore,
};
use crate::domain::settlement::Settlement;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory group store.
///
/// Uses `Arc<RwLock<HashMap>>` for shared concurrent access. Suitable for
/// tests and the CLI; a real deployment plugs a document store into the same
/// port.
#[derive(Default, Clone)]
pub struct InMemoryGroupStore {
    groups: Arc<RwLock<HashMap<String, Group>>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn store(&self, group: Group) -> Result<()> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get(&self, group_id: &str) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }
}

/// A thread-safe in-memory expense store.
#[derive(Default, Clone)]
pub struct InMemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn append(&self, expense: Expense) -> Result<()> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn get(&self, expense_id: &str) -> Result<Option<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(expense_id).cloned())
    }

    async fn update(&self, expense: Expense) -> Result<()> {
        self.append(expense).await
    }

    async fn remove(&self, expense_id: &str) -> Result<()> {
        let mut expenses = self.expenses.write().await;
        expenses.remove(expense_id);
        Ok(())
    }

    async fn list_by_group(&self, group_id: &str) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        let mut matching: Vec<Expense> = expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        // Newest first, ties broken by id so listings are stable.
        matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }
}

/// A thread-safe in-memory settlement store.
#[derive(Default, Clone)]
pub struct InMemorySettlementStore {
    settlements: Arc<RwLock<HashMap<String, Settlement>>>,
}

impl InMemorySettlementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn append(&self, settlement: Settlement) -> Result<()> {
        let mut settlements = self.settlements.write().await;
        settlements.insert(settlement.id.clone(), settlement);
        Ok(())
    }

    async fn get(&self, settlement_id: &str) -> Result<Option<Settlement>> {
        let settlements = self.settlements.read().await;
        Ok(settlements.get(settlement_id).cloned())
    }

    async fn update(&self, settlement: Settlement) -> Result<()> {
        self.append(settlement).await
    }
}

/// Captures every dispatched notification; the assertion side of engine
/// tests.
#[derive(Default, Clone)]
pub struct RecordingDispatcher {
    sent: Arc<RwLock<Vec<OutboundNotification>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OutboundNotification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, notification: OutboundNotification) -> Result<()> {
        let mut sent = self.sent.write().await;
        sent.push(notification);
        Ok(())
    }
}

/// Logs notifications instead of delivering them. The CLI's dispatcher.
#[derive(Default, Clone)]
pub struct TracingDispatcher;

impl TracingDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn dispatch(&self, notification: OutboundNotification) -> Result<()> {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}
