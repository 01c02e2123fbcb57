use crate::domain::{GroupId, UserId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GroupMember {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
    pub role: MemberRole,
}

/// An expense-sharing group.
///
/// Invariants: at least one member holds the `Admin` role, and every
/// `user_id` appears at most once. Both are enforced by the mutating
/// methods, so a `Group` obtained through them is always consistent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<GroupMember>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Group {
    /// Creates a group with its creator as the sole admin.
    pub fn new(
        id: GroupId,
        name: String,
        description: Option<String>,
        mut creator: GroupMember,
        now: DateTime<Utc>,
    ) -> Self {
        creator.role = MemberRole::Admin;
        Self {
            id,
            name,
            description,
            created_by: creator.user_id.clone(),
            members: vec![creator],
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    pub fn member(&self, user_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some()
    }

    fn admin_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == MemberRole::Admin)
            .count()
    }

    pub fn add_member(&mut self, member: GroupMember, now: DateTime<Utc>) -> Result<()> {
        if self.is_member(&member.user_id) {
            return Err(LedgerError::ValidationError(format!(
                "user {} is already a member of group {}",
                member.user_id, self.id
            )));
        }
        self.members.push(member);
        self.updated_at = now;
        Ok(())
    }

    /// Removes a member. Refuses to drop the last admin, which would leave
    /// the group unmanageable.
    pub fn remove_member(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        let member = self.member(user_id).ok_or_else(|| {
            LedgerError::NotFoundError(format!("user {user_id} in group {}", self.id))
        })?;
        if member.role == MemberRole::Admin && self.admin_count() == 1 {
            return Err(LedgerError::ValidationError(format!(
                "cannot remove the last admin of group {}",
                self.id
            )));
        }
        self.members.retain(|m| m.user_id != user_id);
        self.updated_at = now;
        Ok(())
    }

    /// Soft-deletes the group; existing records stay readable.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, role: MemberRole) -> GroupMember {
        GroupMember {
            user_id: user_id.to_string(),
            display_name: user_id.to_uppercase(),
            email: format!("{user_id}@example.com"),
            joined_at: Utc::now(),
            role,
        }
    }

    fn group() -> Group {
        Group::new(
            "g1".to_string(),
            "Trip".to_string(),
            None,
            member("alice", MemberRole::Member),
            Utc::now(),
        )
    }

    #[test]
    fn test_creator_becomes_admin() {
        let group = group();
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].role, MemberRole::Admin);
        assert_eq!(group.created_by, "alice");
        assert!(group.is_active);
    }

    #[test]
    fn test_add_member_rejects_duplicate() {
        let mut group = group();
        group
            .add_member(member("bob", MemberRole::Member), Utc::now())
            .unwrap();
        let result = group.add_member(member("bob", MemberRole::Member), Utc::now());
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn test_remove_member() {
        let mut group = group();
        group
            .add_member(member("bob", MemberRole::Member), Utc::now())
            .unwrap();
        group.remove_member("bob", Utc::now()).unwrap();
        assert!(!group.is_member("bob"));
    }

    #[test]
    fn test_remove_last_admin_refused() {
        let mut group = group();
        group
            .add_member(member("bob", MemberRole::Member), Utc::now())
            .unwrap();
        let result = group.remove_member("alice", Utc::now());
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
        assert!(group.is_member("alice"));
    }

    #[test]
    fn test_remove_unknown_member() {
        let mut group = group();
        assert!(matches!(
            group.remove_member("mallory", Utc::now()),
            Err(LedgerError::NotFoundError(_))
        ));
    }

    #[test]
    fn test_close() {
        let mut group = group();
        group.close(Utc::now());
        assert!(!group.is_active);
    }
}
