//! crates/dashboard_core/src/capability.rs
//!
//! The one place that decides which dashboard affordances a user gets.
//! Views ask `allows` instead of comparing role strings themselves.

use crate::domain::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewItems,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl Capability {
    /// Capabilities that change the item collection.
    pub const MUTATIONS: [Capability; 3] =
        [Capability::CreateItem, Capability::UpdateItem, Capability::DeleteItem];
}

impl Role {
    pub fn grants(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Viewer => capability == Capability::ViewItems,
        }
    }
}

/// Whether `user` may use `capability`. Without a user nothing is allowed.
pub fn allows(user: Option<&User>, capability: Capability) -> bool {
    user.is_some_and(|u| u.role.grants(capability))
}

/// Whether `user` may use any mutation at all (form and Actions column).
pub fn can_mutate(user: Option<&User>) -> bool {
    Capability::MUTATIONS.iter().any(|c| allows(user, *c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "1".into(),
            username: "u".into(),
            email: String::new(),
            country: None,
            role,
            extra: Default::default(),
        }
    }

    #[test]
    fn admin_gets_every_capability() {
        let admin = user(Role::Admin);
        for cap in Capability::MUTATIONS {
            assert!(allows(Some(&admin), cap));
        }
        assert!(can_mutate(Some(&admin)));
    }

    #[test]
    fn viewer_only_reads() {
        let viewer = user(Role::Viewer);
        assert!(allows(Some(&viewer), Capability::ViewItems));
        for cap in Capability::MUTATIONS {
            assert!(!allows(Some(&viewer), cap));
        }
        assert!(!can_mutate(Some(&viewer)));
    }

    #[test]
    fn nobody_gets_nothing() {
        assert!(!allows(None, Capability::ViewItems));
        assert!(!can_mutate(None));
    }
}
