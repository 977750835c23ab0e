// src/backend/services/session.rs
// Caller identity, resolved once per call and passed down explicitly.

use crate::error::PageError;
use crate::models::common::{PrincipalId, UserRole};
use crate::storage::config;
use candid::{CandidType, Principal};
use serde::Deserialize;

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub principal: PrincipalId,
    pub role: UserRole,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Identity not yet resolved; callers must not redirect yet.
    Loading,
    Anonymous,
    SignedIn(SessionUser),
}

/// What a page should do with the current session.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum SessionGate {
    Pending,
    RedirectToLogin,
    Ready(SessionUser),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    state: SessionState,
}

impl SessionContext {
    pub fn loading() -> Self {
        Self {
            state: SessionState::Loading,
        }
    }

    pub fn resolved(user: Option<SessionUser>) -> Self {
        let mut session = Self::loading();
        session.resolve(user);
        session
    }

    /// Leaves `Loading` once the identity provider has answered.
    pub fn resolve(&mut self, user: Option<SessionUser>) {
        self.state = match user {
            Some(user) => SessionState::SignedIn(user),
            None => SessionState::Anonymous,
        };
    }

    /// Resolves a canister caller. The anonymous principal is signed out;
    /// roles come from the admin/producer configuration.
    pub fn from_caller(caller: Principal) -> Self {
        if caller == Principal::anonymous() {
            return Self::resolved(None);
        }
        let role = if caller == config::get_admin_principal() {
            UserRole::Admin
        } else if config::is_producer(&caller) {
            UserRole::Producer
        } else {
            UserRole::Member
        };
        Self::resolved(Some(SessionUser {
            principal: caller,
            role,
        }))
    }

    pub fn gate(&self) -> SessionGate {
        match &self.state {
            SessionState::Loading => SessionGate::Pending,
            SessionState::Anonymous => SessionGate::RedirectToLogin,
            SessionState::SignedIn(user) => SessionGate::Ready(user.clone()),
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            SessionState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn require_user(&self) -> Result<&SessionUser, PageError> {
        self.user().ok_or(PageError::NotAuthenticated)
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::Anonymous;
    }

    /// Owners manage their own pages; admins manage every page.
    pub fn can_manage(&self, owner: &PrincipalId) -> bool {
        match self.user() {
            Some(user) => user.role == UserRole::Admin || &user.principal == owner,
            None => false,
        }
    }

    pub fn ensure_can_manage(&self, owner: &PrincipalId) -> Result<&SessionUser, PageError> {
        let user = self.require_user()?;
        if self.can_manage(owner) {
            Ok(user)
        } else {
            Err(PageError::NotAuthorized(format!(
                "{} does not own this page",
                user.principal
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::init::InitArgs;

    fn principal(byte: u8) -> Principal {
        Principal::from_slice(&[byte; 29])
    }

    #[test]
    fn loading_session_does_not_redirect() {
        let mut session = SessionContext::loading();
        assert_eq!(session.gate(), SessionGate::Pending);
        assert!(session.user().is_none());

        session.resolve(None);
        assert_eq!(session.gate(), SessionGate::RedirectToLogin);
    }

    #[test]
    fn anonymous_caller_is_signed_out() {
        let session = SessionContext::from_caller(Principal::anonymous());
        assert_eq!(session.require_user().unwrap_err(), PageError::NotAuthenticated);
    }

    #[test]
    fn roles_come_from_config() {
        config::init_config(InitArgs {
            admin_principal: principal(1),
            producer_principals: vec![principal(2)],
            site_origin: "https://anikod.example".to_string(),
            draft_ttl_secs: None,
        })
        .unwrap();

        let role = |p| SessionContext::from_caller(p).user().map(|u| u.role);
        assert_eq!(role(principal(1)), Some(UserRole::Admin));
        assert_eq!(role(principal(2)), Some(UserRole::Producer));
        assert_eq!(role(principal(3)), Some(UserRole::Member));
    }

    #[test]
    fn only_owner_or_admin_can_manage() {
        let owner = principal(5);
        let member = SessionContext::resolved(Some(SessionUser {
            principal: principal(6),
            role: UserRole::Member,
        }));
        let admin = SessionContext::resolved(Some(SessionUser {
            principal: principal(7),
            role: UserRole::Admin,
        }));
        let own = SessionContext::resolved(Some(SessionUser {
            principal: owner,
            role: UserRole::Producer,
        }));

        assert!(matches!(member.ensure_can_manage(&owner), Err(PageError::NotAuthorized(_))));
        assert!(admin.can_manage(&owner));
        assert!(own.can_manage(&owner));
    }

    #[test]
    fn sign_out_drops_the_user() {
        let mut session = SessionContext::resolved(Some(SessionUser {
            principal: principal(8),
            role: UserRole::Member,
        }));
        session.sign_out();
        assert_eq!(session.gate(), SessionGate::RedirectToLogin);
        assert!(!session.can_manage(&principal(8)));
    }
}
