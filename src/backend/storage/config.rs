// src/backend/storage/config.rs
use crate::models::init::InitArgs;
use crate::storage::memory::{get_memory, Memory};
use crate::storage::storable::Cbor;
use crate::utils::log;
use candid::Principal;
use ic_stable_structures::memory_manager::MemoryId;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

// Define Memory IDs for config cells (ensure these are unique)
const ADMIN_PRINCIPAL_MEM_ID: MemoryId = MemoryId::new(25);
const PRODUCER_PRINCIPALS_MEM_ID: MemoryId = MemoryId::new(26);
const SITE_ORIGIN_MEM_ID: MemoryId = MemoryId::new(27);
const DRAFT_TTL_MEM_ID: MemoryId = MemoryId::new(28);

// Default values (used until init args are applied)
const DEFAULT_ADMIN_PRINCIPAL: Principal = Principal::management_canister();
const DEFAULT_SITE_ORIGIN: &str = "https://anikod.com";
pub const DEFAULT_DRAFT_TTL_SECS: u64 = 2 * 60 * 60; // 2 hours

thread_local! {
    static ADMIN_PRINCIPAL: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(ADMIN_PRINCIPAL_MEM_ID), Cbor(DEFAULT_ADMIN_PRINCIPAL))
            .expect("Failed to initialize admin principal stable cell")
    );

    static PRODUCER_PRINCIPALS: RefCell<StableCell<Cbor<Vec<Principal>>, Memory>> = RefCell::new(
        StableCell::init(get_memory(PRODUCER_PRINCIPALS_MEM_ID), Cbor(Vec::new()))
            .expect("Failed to initialize producer principals stable cell")
    );

    static SITE_ORIGIN: RefCell<StableCell<Cbor<String>, Memory>> = RefCell::new(
        StableCell::init(get_memory(SITE_ORIGIN_MEM_ID), Cbor(DEFAULT_SITE_ORIGIN.to_string()))
            .expect("Failed to initialize site origin stable cell")
    );

    static DRAFT_TTL_SECS: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_memory(DRAFT_TTL_MEM_ID), DEFAULT_DRAFT_TTL_SECS)
            .expect("Failed to initialize draft ttl stable cell")
    );
}

/// Applies InitArgs. Called from the canister's init hook only.
pub fn init_config(args: InitArgs) -> Result<(), String> {
    let ttl = args.draft_ttl_secs.unwrap_or(DEFAULT_DRAFT_TTL_SECS);
    let origin = args.site_origin.trim_end_matches('/').to_string();
    if origin.is_empty() {
        return Err("site_origin must not be empty".to_string());
    }

    ADMIN_PRINCIPAL
        .with(|cell| cell.borrow_mut().set(Cbor(args.admin_principal)))
        .map_err(|e| format!("Failed to set admin principal: {:?}", e))?;
    PRODUCER_PRINCIPALS
        .with(|cell| cell.borrow_mut().set(Cbor(args.producer_principals.clone())))
        .map_err(|e| format!("Failed to set producer principals: {:?}", e))?;
    SITE_ORIGIN
        .with(|cell| cell.borrow_mut().set(Cbor(origin.clone())))
        .map_err(|e| format!("Failed to set site origin: {:?}", e))?;
    DRAFT_TTL_SECS
        .with(|cell| cell.borrow_mut().set(ttl))
        .map_err(|e| format!("Failed to set draft ttl: {:?}", e))?;

    log::info(format!(
        "Configuration initialized: Admin={}, Producers={}, Origin={}, DraftTtl={}s",
        args.admin_principal,
        args.producer_principals.len(),
        origin,
        ttl
    ));
    Ok(())
}

pub fn get_admin_principal() -> Principal {
    ADMIN_PRINCIPAL.with(|cell| cell.borrow().get().0)
}

pub fn is_producer(principal: &Principal) -> bool {
    PRODUCER_PRINCIPALS.with(|cell| cell.borrow().get().0.contains(principal))
}

pub fn get_site_origin() -> String {
    SITE_ORIGIN.with(|cell| cell.borrow().get().0.clone())
}

pub fn get_draft_ttl_secs() -> u64 {
    DRAFT_TTL_SECS.with(|cell| *cell.borrow().get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_before_init() {
        assert_eq!(get_admin_principal(), Principal::management_canister());
        assert_eq!(get_site_origin(), DEFAULT_SITE_ORIGIN);
        assert_eq!(get_draft_ttl_secs(), DEFAULT_DRAFT_TTL_SECS);
    }

    #[test]
    fn init_config_persists_values() {
        let admin = Principal::from_slice(&[1; 29]);
        let producer = Principal::from_slice(&[2; 29]);
        init_config(InitArgs {
            admin_principal: admin,
            producer_principals: vec![producer],
            site_origin: "https://memorial.example/".to_string(),
            draft_ttl_secs: Some(60),
        })
        .unwrap();

        assert_eq!(get_admin_principal(), admin);
        assert!(is_producer(&producer));
        assert!(!is_producer(&admin));
        assert_eq!(get_site_origin(), "https://memorial.example");
        assert_eq!(get_draft_ttl_secs(), 60);
    }

    #[test]
    fn empty_origin_is_rejected() {
        let err = init_config(InitArgs {
            admin_principal: Principal::anonymous(),
            producer_principals: vec![],
            site_origin: "/".to_string(),
            draft_ttl_secs: None,
        });
        assert!(err.is_err());
    }
}
