use crate::domain::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ExpenseAdded,
    MemberAdded,
    SettlementRequest,
    GroupClosed,
}

/// A notification payload handed to the dispatcher port.
///
/// The engine only builds these; delivery (push tokens, retries, inboxes) is
/// entirely the dispatcher's problem.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OutboundNotification {
    pub recipient: UserId,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub data: Value,
}

impl OutboundNotification {
    pub fn new(
        recipient: UserId,
        kind: EventKind,
        title: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            data,
        }
    }
}
