//! The `system` input: host load, CPU count, uptime and logged-in users.
//!
//! One [`SystemStats`] owns one background task. Each tick it computes a
//! [`FieldSet`] from a [`MetricSource`](crate::platform::MetricSource) and pushes one
//! [`Sample`] per field onto the shared queue, every sample named `system_<field>`.

mod collector;
mod emitter;
mod fields;
mod sample;

/// Collector identifier, also the metric name prefix
pub const INPUT_NAME: &str = "system";

pub use collector::SystemStats;
pub use emitter::{emit, emit_at, gather_once, metric_name, report_cycle, CycleError, EmitError};
pub use fields::{gather_fields, FieldSet, GatherError};
pub use sample::{Sample, SampleQueue};
