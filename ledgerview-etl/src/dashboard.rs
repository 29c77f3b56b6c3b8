//! Fetch the profit & loss dataset and turn it into dashboard view models.

use ledgerview_core::DashboardSnapshot;

use crate::client::EtlApi;

/// Load a fresh snapshot. Any failure yields the empty snapshot so the
/// caller can show "no data" instead of an error.
pub async fn load_snapshot<A: EtlApi>(api: &A) -> DashboardSnapshot {
    match api.profit_loss_data().await {
        Ok(envelope) => match envelope.into_payload() {
            Ok(dataset) => {
                tracing::info!(
                    "Loaded profit & loss data: {} periods, {} sections, {} records",
                    dataset.periods.len(),
                    dataset.sections.len(),
                    dataset.summary.total_records
                );
                DashboardSnapshot::from_dataset(dataset)
            }
            Err(message) => {
                tracing::warn!("Failed to load profit & loss data: {}", message);
                DashboardSnapshot::empty()
            }
        },
        Err(e) => {
            tracing::error!("Error loading profit & loss data: {}", e);
            DashboardSnapshot::empty()
        }
    }
}
