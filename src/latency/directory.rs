use std::collections::HashMap;

use tracing::warn;

use super::{DailyLatencies, DataCenter};

/// Data centers keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DataCenterDirectory {
    by_id: HashMap<String, DataCenter>,
}

impl DataCenterDirectory {
    /// Index a listing. A repeated id replaces the earlier entry.
    pub fn from_list(data_centers: Vec<DataCenter>) -> Self {
        let by_id = data_centers
            .into_iter()
            .map(|dc| (dc.dc_id.clone(), dc))
            .collect();
        DataCenterDirectory { by_id }
    }

    pub fn get(&self, dc_id: &str) -> Option<&DataCenter> {
        self.by_id.get(dc_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// A latency sample with both ends resolved to data centers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLatency {
    pub from: DataCenter,
    pub to: DataCenter,
    pub value: f64,
}

/// Outcome of resolving a batch of samples.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub latencies: Vec<ResolvedLatency>,
    /// Samples dropped because an endpoint id is not in the directory.
    pub skipped: usize,
}

/// Resolve `from`/`to` ids of every sample in every day, preserving order.
pub fn resolve(directory: &DataCenterDirectory, days: &[DailyLatencies]) -> Resolution {
    let mut resolution = Resolution::default();

    for sample in days.iter().flat_map(|day| day.latencies.iter()) {
        match (directory.get(&sample.from), directory.get(&sample.to)) {
            (Some(from), Some(to)) => resolution.latencies.push(ResolvedLatency {
                from: from.clone(),
                to: to.clone(),
                value: sample.value,
            }),
            (from, _) => {
                let missing = if from.is_none() { &sample.from } else { &sample.to };
                warn!(
                    dc_id = %missing,
                    from = %sample.from,
                    to = %sample.to,
                    "Unknown data center in latency sample"
                );
                resolution.skipped += 1;
            }
        }
    }

    resolution
}
