// src/backend/models/init.rs
use candid::{CandidType, Principal};
use serde::Deserialize;

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct InitArgs {
    pub admin_principal: Principal,
    pub producer_principals: Vec<Principal>,
    /// Origin used for public links, e.g. "https://anikod.co.il".
    pub site_origin: String,
    /// Idle time after which an unsaved wizard session is discarded.
    pub draft_ttl_secs: Option<u64>,
}
