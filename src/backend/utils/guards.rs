// src/backend/utils/guards.rs
// Caller resolution and named guards for `#[query(guard = "...")]`.
// IC guards must return Result<(), String>.

use crate::error::PageError;
use crate::models::common::UserRole;
use crate::services::session::SessionContext;

/// Session for the current canister caller.
pub fn caller_session() -> SessionContext {
    SessionContext::from_caller(ic_cdk::caller())
}

fn check_admin(session: &SessionContext) -> Result<(), PageError> {
    match session.require_user()?.role {
        UserRole::Admin => Ok(()),
        _ => Err(PageError::NotAuthorized("admin only".to_string())),
    }
}

pub fn admin_guard() -> Result<(), String> {
    check_admin(&caller_session()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::SessionUser;
    use candid::Principal;

    fn session(role: UserRole) -> SessionContext {
        SessionContext::resolved(Some(SessionUser {
            principal: Principal::from_slice(&[4; 29]),
            role,
        }))
    }

    #[test]
    fn admin_check_by_role() {
        assert!(check_admin(&session(UserRole::Admin)).is_ok());
        assert!(matches!(
            check_admin(&session(UserRole::Producer)),
            Err(PageError::NotAuthorized(_))
        ));
        assert_eq!(
            check_admin(&SessionContext::resolved(None)),
            Err(PageError::NotAuthenticated)
        );
    }
}
