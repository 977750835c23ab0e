// src/backend/storage/metrics.rs
use crate::metrics::PageMetrics;
use crate::storage::memory::{get_metrics_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

type StorablePageMetrics = Cbor<PageMetrics>;

thread_local! {
    /// Global page metrics
    static METRICS_CELL: RefCell<StableCell<StorablePageMetrics, Memory>> = RefCell::new(
        StableCell::init(get_metrics_memory(), Cbor(PageMetrics::default()))
            .expect("Failed to initialize metrics stable cell")
    );
}

pub fn get_metrics() -> PageMetrics {
    METRICS_CELL.with(|cell| cell.borrow().get().0.clone())
}

/// Applies `update_fn` to a copy of the metrics and writes it back.
pub fn update_metrics<F>(update_fn: F) -> Result<(), String>
where
    F: FnOnce(&mut PageMetrics),
{
    METRICS_CELL.with(|cell| {
        let mut metrics = cell.borrow().get().0.clone();
        update_fn(&mut metrics);
        cell.borrow_mut()
            .set(Cbor(metrics))
            .map_err(|e| format!("Failed to update metrics: {:?}", e))?;
        Ok(())
    })
}
