//! Sample emission and the per-cycle error boundary.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;

use super::fields::{gather_fields, FieldSet, GatherError};
use super::sample::{Sample, SampleQueue};
use super::INPUT_NAME;
use crate::platform::MetricSource;

/// Panic text of a send racing the consumer closing the queue
const CLOSED_CHANNEL: &str = "closed channel";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("send on closed sample queue")]
    QueueClosed,
}

/// Anything that ends a gather cycle early.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Gather(#[from] GatherError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    /// A panic or cancelled task inside the cycle
    #[error("gather metrics panic: {0}")]
    Unexpected(String),
}

impl CycleError {
    fn from_join(err: JoinError) -> Self {
        if err.is_panic() {
            CycleError::Unexpected(panic_message(err.into_panic()))
        } else {
            CycleError::Unexpected(err.to_string())
        }
    }

    /// The consumer dropped the queue while a send was in flight.
    pub fn is_shutdown_race(&self) -> bool {
        match self {
            CycleError::Emit(EmitError::QueueClosed) => true,
            CycleError::Unexpected(msg) => msg.contains(CLOSED_CHANNEL),
            CycleError::Gather(_) => false,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Prefix a field name with the collector identifier.
pub fn metric_name(field: &str) -> String {
    format!("{}_{}", INPUT_NAME, field)
}

/// Push one sample per field, all stamped with `timestamp`, in field order.
///
/// Each send waits for queue capacity. Returns the number of samples sent.
pub async fn emit_at(
    fields: &FieldSet,
    timestamp: DateTime<Utc>,
    queue: &SampleQueue,
) -> Result<usize, EmitError> {
    let entries = fields.entries();
    let count = entries.len();

    for (field, value) in entries {
        queue
            .send(Sample::new(metric_name(field), value, timestamp))
            .await
            .map_err(|_| EmitError::QueueClosed)?;
    }

    Ok(count)
}

/// Emit with a timestamp taken now, after the fields are complete.
pub async fn emit(fields: &FieldSet, queue: &SampleQueue) -> Result<usize, EmitError> {
    emit_at(fields, Utc::now(), queue).await
}

/// One full gather cycle: query, compute, emit.
///
/// The OS queries run on the blocking pool and emission runs in its own task, so a
/// panic in either comes back as [`CycleError::Unexpected`] instead of ending the
/// caller. The source stays usable after a panic.
pub async fn gather_once<S: MetricSource + 'static>(
    source: &Arc<Mutex<S>>,
    collect_user_number: bool,
    queue: &SampleQueue,
) -> Result<usize, CycleError> {
    let source = Arc::clone(source);
    let fields = tokio::task::spawn_blocking(move || {
        let mut source = source.lock();
        gather_fields(&mut *source, collect_user_number)
    })
    .await
    .map_err(CycleError::from_join)??;

    let queue = queue.clone();
    let sent = tokio::spawn(async move { emit(&fields, &queue).await })
        .await
        .map_err(CycleError::from_join)??;

    Ok(sent)
}

/// Report a cycle outcome to the log. Nothing escapes to the caller.
pub fn report_cycle(outcome: &Result<usize, CycleError>) {
    match outcome {
        Ok(count) => log::trace!("{} cycle emitted {} samples", INPUT_NAME, count),
        Err(e) if e.is_shutdown_race() => {}
        Err(e) => log::error!("{}", e),
    }
}
