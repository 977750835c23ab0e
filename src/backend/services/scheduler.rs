// src/backend/services/scheduler.rs
// Periodic housekeeping driven by ic-cdk-timers.

use crate::metrics;
use crate::models::common::TimestampNs;
use crate::storage::{config, wizard_sessions};
use crate::utils::log;
use crate::utils::time::get_current_time_ns;
use ic_cdk_timers::TimerId;
use std::time::Duration;

const PURGE_INTERVAL_SECS: u64 = 15 * 60;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Arms the idle-wizard purge. Timers do not survive upgrades, so this runs
/// from both init and post_upgrade.
pub fn start_session_purge_timer() -> TimerId {
    ic_cdk_timers::set_timer_interval(Duration::from_secs(PURGE_INTERVAL_SECS), || {
        purge_idle_sessions(get_current_time_ns());
    })
}

/// Discards wizard sessions idle longer than the configured draft TTL.
pub fn purge_idle_sessions(now: TimestampNs) -> usize {
    let ttl_ns = config::get_draft_ttl_secs().saturating_mul(NANOS_PER_SEC);
    let purged = wizard_sessions::purge_idle(now, ttl_ns);
    metrics::record_purge(purged, now);
    if purged > 0 {
        log::info(format!("⚙️ SCHEDULER: discarded {} idle wizard session(s)", purged));
    }
    purged
}
