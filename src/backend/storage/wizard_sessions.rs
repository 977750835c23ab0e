// src/backend/storage/wizard_sessions.rs
use crate::error::PageError;
use crate::models::common::{PrincipalId, TimestampNs};
use crate::services::wizard::WizardController;
use std::cell::RefCell;
use std::collections::HashMap;

/// One caller's wizard in progress.
#[derive(Clone, Debug)]
pub struct WizardSession {
    pub controller: WizardController,
    pub last_touched: TimestampNs,
}

thread_local! {
    // Heap only: drafts are never autosaved and an upgrade discards them.
    // Key: owner principal, Value: WizardSession
    static WIZARD_SESSIONS: RefCell<HashMap<PrincipalId, WizardSession>> = RefCell::new(HashMap::new());
}

/// Starts (or restarts) the caller's wizard.
pub fn start(owner: PrincipalId, controller: WizardController, now: TimestampNs) {
    WIZARD_SESSIONS.with(|map| {
        map.borrow_mut().insert(
            owner,
            WizardSession {
                controller,
                last_touched: now,
            },
        );
    });
}

pub fn with_session<F, R>(owner: &PrincipalId, f: F) -> Result<R, PageError>
where
    F: FnOnce(&WizardController) -> Result<R, PageError>,
{
    WIZARD_SESSIONS.with(|map| {
        let borrowed_map = map.borrow();
        let session = borrowed_map.get(owner).ok_or(PageError::SessionNotFound)?;
        f(&session.controller)
    })
}

/// Runs `f` against the caller's wizard and marks the session as active.
pub fn with_session_mut<F, R>(owner: &PrincipalId, now: TimestampNs, f: F) -> Result<R, PageError>
where
    F: FnOnce(&mut WizardController) -> Result<R, PageError>,
{
    WIZARD_SESSIONS.with(|map| {
        let mut borrowed_map = map.borrow_mut();
        let session = borrowed_map.get_mut(owner).ok_or(PageError::SessionNotFound)?;
        session.last_touched = now;
        f(&mut session.controller)
    })
}

/// Removes and returns the caller's wizard.
pub fn take(owner: &PrincipalId) -> Result<WizardController, PageError> {
    WIZARD_SESSIONS.with(|map| {
        map.borrow_mut()
            .remove(owner)
            .map(|session| session.controller)
            .ok_or(PageError::SessionNotFound)
    })
}

pub fn discard(owner: &PrincipalId) -> bool {
    WIZARD_SESSIONS.with(|map| map.borrow_mut().remove(owner).is_some())
}

/// Drops sessions idle for longer than `ttl_ns`. Returns how many were dropped.
pub fn purge_idle(now: TimestampNs, ttl_ns: u64) -> usize {
    WIZARD_SESSIONS.with(|map| {
        let mut borrowed_map = map.borrow_mut();
        let before = borrowed_map.len();
        borrowed_map.retain(|_, session| now.saturating_sub(session.last_touched) <= ttl_ns);
        before - borrowed_map.len()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::wizard::WizardStep;
    use candid::Principal;

    fn principal(byte: u8) -> Principal {
        Principal::from_slice(&[byte; 29])
    }

    #[test]
    fn missing_session_is_an_error() {
        assert_eq!(
            with_session(&principal(1), |w| Ok(w.step())).unwrap_err(),
            PageError::SessionNotFound
        );
        assert!(take(&principal(1)).is_err());
    }

    #[test]
    fn sessions_are_per_owner() {
        start(principal(1), WizardController::new(), 0);
        start(principal(2), WizardController::new(), 0);
        with_session_mut(&principal(1), 5, |w| Ok(w.go_next())).unwrap();

        assert_eq!(with_session(&principal(1), |w| Ok(w.step())).unwrap(), WizardStep::Info);
        assert_eq!(with_session(&principal(2), |w| Ok(w.step())).unwrap(), WizardStep::Template);

        assert!(discard(&principal(2)));
        assert!(!discard(&principal(2)));
        assert_eq!(take(&principal(1)).unwrap().step(), WizardStep::Info);
        assert!(take(&principal(1)).is_err());
    }

    #[test]
    fn purge_drops_only_idle_sessions() {
        start(principal(1), WizardController::new(), 0);
        start(principal(2), WizardController::new(), 0);
        with_session_mut(&principal(2), 90, |_| Ok(())).unwrap();

        assert_eq!(purge_idle(100, 50), 1);
        assert!(with_session(&principal(1), |_| Ok(())).is_err());
        assert!(with_session(&principal(2), |_| Ok(())).is_ok());
    }
}
