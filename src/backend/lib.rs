// src/backend/lib.rs

pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use crate::api::*;
use crate::error::PageError;
use crate::metrics::PageMetrics;
use crate::models::common::*;
use crate::models::init::InitArgs;
use crate::models::page_record::PageRecord;
use crate::models::template::TemplateSummary;
use crate::services::media_validator::MediaBatchOutcome;
use crate::services::session::SessionGate;
use crate::services::wizard::{CheckoutHandoff, WizardStep};
use crate::storage::config;
use crate::utils::log;

#[ic_cdk::init]
fn init(args: InitArgs) {
    if let Err(e) = config::init_config(args) {
        ic_cdk::trap(&format!("Invalid init args: {}", e));
    }
    services::scheduler::start_session_purge_timer();
    log::info("Anikod backend canister initialized.");
}

// Config cells live in stable memory; only the timer needs re-arming.
#[ic_cdk::post_upgrade]
fn post_upgrade() {
    services::scheduler::start_session_purge_timer();
    log::info("Anikod backend canister upgraded.");
}

// Export Candid interface
ic_cdk::export_candid!();
