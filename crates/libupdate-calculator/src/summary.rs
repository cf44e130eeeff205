// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::types::{FleetSummary, HostSummary, UpdateResult, timestamp_now};

/// folds per-host results into a fleet report, keeping the input host order.
pub fn summarize(results: &[UpdateResult]) -> FleetSummary {
    FleetSummary {
        generated_at: timestamp_now(),
        total_hosts: results.len(),
        hosts_with_updates: results.iter().filter(|r| r.update_count() > 0).count(),
        total_updates: results.iter().map(UpdateResult::update_count).sum(),
        hosts: results
            .iter()
            .map(|r| HostSummary {
                host_id: r.host_id.clone(),
                profile: r.profile.clone(),
                update_count: r.update_count(),
            })
            .collect(),
    }
}
