use crate::domain::event::OutboundNotification;
use crate::domain::expense::Expense;
use crate::domain::group::Group;
use crate::domain::settlement::Settlement;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn store(&self, group: Group) -> Result<()>;
    async fn get(&self, group_id: &str) -> Result<Option<Group>>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn append(&self, expense: Expense) -> Result<()>;
    async fn get(&self, expense_id: &str) -> Result<Option<Expense>>;
    async fn update(&self, expense: Expense) -> Result<()>;
    async fn remove(&self, expense_id: &str) -> Result<()>;
    async fn list_by_group(&self, group_id: &str) -> Result<Vec<Expense>>;
}

#[async_trait]
pub trait SettlementStore: Send + Sync {
    async fn append(&self, settlement: Settlement) -> Result<()>;
    async fn get(&self, settlement_id: &str) -> Result<Option<Settlement>>;
    async fn update(&self, settlement: Settlement) -> Result<()>;
}

/// Delivery side of the notification pipeline. The engine treats dispatch as
/// fire-and-forget: errors from implementations are logged and swallowed,
/// never surfaced to the engine's caller.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: OutboundNotification) -> Result<()>;
}

pub type GroupStoreBox = Box<dyn GroupStore>;
pub type ExpenseStoreBox = Box<dyn ExpenseStore>;
pub type SettlementStoreBox = Box<dyn SettlementStore>;
pub type NotificationDispatcherBox = Box<dyn NotificationDispatcher>;
