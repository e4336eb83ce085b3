use serde::{Deserialize, Serialize};

use stockcast_core::ItemName;

/// Projected stock for one item first drops below its low-stock threshold.
///
/// At most one is produced per simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub item: ItemName,
    /// 1-based forecast period of the first crossing.
    pub week: usize,
    /// Raw (unfloored) projected level in that period.
    pub projected_level: f64,
    pub threshold: f64,
    pub subject: String,
    pub message: String,
}

impl AlertEvent {
    pub fn new(item: ItemName, week: usize, projected_level: f64, threshold: f64) -> Self {
        let subject = format!("Low Stock Alert: {item}");
        let message = format!(
            "Stock for {item} is low! Expected depletion by Week {week}. Please restock soon."
        );
        Self {
            item,
            week,
            projected_level,
            threshold,
            subject,
            message,
        }
    }
}
