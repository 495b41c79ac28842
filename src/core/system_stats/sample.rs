use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// One timestamped, named measurement handed to the shared queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub metric: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Sample {
    pub fn new(metric: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            metric: metric.into(),
            value,
            timestamp,
            labels: BTreeMap::new(),
        }
    }
}

/// Producer side of the shared, bounded sample queue. Owned and closed by the consumer.
pub type SampleQueue = mpsc::Sender<Sample>;
