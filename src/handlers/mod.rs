pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod health;
pub mod reviews;
pub mod users;

use crate::access::{Principal, Role};
use crate::error::ApiError;

/// Role gate used by handlers whose route is limited to certain account
/// roles (e.g. only publishers and admins may create bootcamps).
pub fn authorize_roles(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "User role {} is not authorized to access this route",
            principal.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn role_gate_allows_listed_roles_only() {
        let publisher = Principal {
            id: Uuid::new_v4(),
            role: Role::Publisher,
        };
        assert!(authorize_roles(&publisher, &[Role::Publisher, Role::Admin]).is_ok());
        assert!(authorize_roles(&publisher, &[Role::Admin]).is_err());
    }
}
