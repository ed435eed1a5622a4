use tracing::{info, warn};

use crate::events::InventoryChange;

/// Trait for inventory change observation
pub trait InventoryObserver {
    /// Called after a change has been applied in memory
    fn on_change(&self, change: &InventoryChange);
}

/// Logs every change through `tracing` as a JSON field
#[derive(Debug)]
pub struct ChangeLogger;

impl InventoryObserver for ChangeLogger {
    fn on_change(&self, change: &InventoryChange) {
        match serde_json::to_string(change) {
            Ok(json) => info!(change = %json, "book {}", change.verb()),
            Err(e) => warn!(isbn = change.isbn(), error = %e, "book {}", change.verb()),
        }
    }
}
