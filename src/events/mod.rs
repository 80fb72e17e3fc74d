use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::services::promising::AtpStatus;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// An availability check was answered for a single context
    AtpComputed {
        material_id: String,
        requested_qty: f64,
        available_qty: f64,
        status: AtpStatus,
        atp_date: NaiveDate,
    },
    /// The capable-to-promise path produced a future promise date
    ShortfallPromised {
        material_id: String,
        shortfall_qty: f64,
        days_needed: i64,
        atp_date: NaiveDate,
    },
    /// A batch availability check completed over the seeded contexts
    AtpBatchComputed { total: usize, unavailable: usize },
}

/// Processes events from the channel until all senders are dropped
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Event processor started");

    while let Some(event) = rx.recv().await {
        match event {
            Event::AtpComputed {
                material_id,
                requested_qty,
                available_qty,
                status,
                atp_date,
            } => {
                info!(
                    %material_id,
                    requested_qty,
                    available_qty,
                    status = %status,
                    %atp_date,
                    "ATP check recorded"
                );
            }
            Event::ShortfallPromised {
                material_id,
                shortfall_qty,
                days_needed,
                atp_date,
            } => {
                handle_shortfall_promised(&material_id, shortfall_qty, days_needed, atp_date);
            }
            Event::AtpBatchComputed { total, unavailable } => {
                info!(total, unavailable, "ATP batch check recorded");
            }
        }
    }

    info!("Event processor stopped; channel closed");
}

fn handle_shortfall_promised(
    material_id: &str,
    shortfall_qty: f64,
    days_needed: i64,
    atp_date: NaiveDate,
) {
    warn!(
        %material_id,
        shortfall_qty,
        days_needed,
        %atp_date,
        "Demand exceeds available supply; promised via capacity heuristic"
    );
}
