//! Ownership and role decisions for mutating routes. Pure predicates, no
//! I/O: callers fetch the target resource first, so a missing resource is a
//! 404 before authorization is ever evaluated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of account roles. Checked at compile time everywhere a route
/// cares about authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor making a request, resolved upstream by the JWT
/// middleware.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

/// Owner or admin may mutate; everyone else is denied. Used identically for
/// update and delete on bootcamps, courses and reviews.
pub fn can_mutate(principal: &Principal, owner_id: Uuid) -> bool {
    principal.role == Role::Admin || principal.id == owner_id
}

/// One published bootcamp per non-admin account. `existing_owner_ids` are
/// the owner ids of bootcamps already published.
pub fn can_publish_new_bootcamp(principal: &Principal, existing_owner_ids: &[Uuid]) -> bool {
    principal.role == Role::Admin || !existing_owner_ids.contains(&principal.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn owner_can_mutate_own_resource() {
        let p = principal(Role::User);
        assert!(can_mutate(&p, p.id));
    }

    #[test]
    fn non_owner_cannot_mutate() {
        let p = principal(Role::Publisher);
        assert!(!can_mutate(&p, Uuid::new_v4()));
    }

    #[test]
    fn admin_can_mutate_regardless_of_ownership() {
        let p = principal(Role::Admin);
        assert!(can_mutate(&p, Uuid::new_v4()));
    }

    #[test]
    fn first_bootcamp_is_allowed() {
        let p = principal(Role::Publisher);
        assert!(can_publish_new_bootcamp(&p, &[Uuid::new_v4()]));
    }

    #[test]
    fn second_bootcamp_is_denied_for_non_admin() {
        let p = principal(Role::Publisher);
        assert!(!can_publish_new_bootcamp(&p, &[Uuid::new_v4(), p.id]));
    }

    #[test]
    fn admin_may_publish_any_number() {
        let p = principal(Role::Admin);
        assert!(can_publish_new_bootcamp(&p, &[p.id]));
    }

    #[test]
    fn role_round_trips_from_text() {
        assert_eq!(Role::try_from("publisher".to_string()).unwrap(), Role::Publisher);
        assert!(Role::try_from("superuser".to_string()).is_err());
    }
}
