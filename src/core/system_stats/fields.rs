//! Field computation for one gather cycle.
//!
//! Load average and CPU count are required; a failure there aborts the cycle.
//! Uptime and the logged-in user count are best-effort and only drop their own field.

use thiserror::Error;

use crate::platform::{LoadAverage, MetricSource, SourceError};

/// Failure that aborts a gather cycle before any sample is produced.
#[derive(Error, Debug)]
pub enum GatherError {
    #[error("failed to gather system load: {0}")]
    LoadAverage(SourceError),

    #[error("failed to gather cpu number: {0}")]
    CpuCount(SourceError),

    #[error("cpu number reported as zero, cannot normalize load")]
    ZeroCpus,
}

/// Values computed in one gather cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub n_cpus: usize,
    pub load_norm_1: f64,
    pub load_norm_5: f64,
    pub load_norm_15: f64,
    pub uptime: Option<u64>,
    pub n_users: Option<usize>,
}

impl FieldSet {
    fn new(load: LoadAverage, n_cpus: usize) -> Self {
        let cpus = n_cpus as f64;
        Self {
            load1: load.one,
            load5: load.five,
            load15: load.fifteen,
            n_cpus,
            load_norm_1: load.one / cpus,
            load_norm_5: load.five / cpus,
            load_norm_15: load.fifteen / cpus,
            uptime: None,
            n_users: None,
        }
    }

    /// Field name and value pairs, in emission order. Absent optional fields are skipped.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![
            ("load1", self.load1),
            ("load5", self.load5),
            ("load15", self.load15),
            ("n_cpus", self.n_cpus as f64),
            ("load_norm_1", self.load_norm_1),
            ("load_norm_5", self.load_norm_5),
            ("load_norm_15", self.load_norm_15),
        ];
        if let Some(uptime) = self.uptime {
            entries.push(("uptime", uptime as f64));
        }
        if let Some(n_users) = self.n_users {
            entries.push(("n_users", n_users as f64));
        }
        entries
    }
}

/// Run the OS queries of one cycle and compute its fields.
pub fn gather_fields<S: MetricSource + ?Sized>(
    source: &mut S,
    collect_user_number: bool,
) -> Result<FieldSet, GatherError> {
    let load = match source.load_average() {
        Ok(load) => load,
        Err(SourceError::Unsupported(what)) => {
            log::debug!("Load average not supported ({}), reporting zeros", what);
            LoadAverage::default()
        }
        Err(e) => return Err(GatherError::LoadAverage(e)),
    };

    let n_cpus = source.logical_cpus().map_err(GatherError::CpuCount)?;
    if n_cpus == 0 {
        return Err(GatherError::ZeroCpus);
    }

    let mut fields = FieldSet::new(load, n_cpus);

    match source.uptime() {
        Ok(uptime) => fields.uptime = Some(uptime),
        Err(e) => log::warn!("failed to get host uptime: {}", e),
    }

    if collect_user_number {
        match source.user_count() {
            Ok(users) => fields.n_users = Some(users),
            Err(e @ (SourceError::NotFound(_) | SourceError::PermissionDenied(_))) => {
                log::warn!("reading os users: {}", e)
            }
            Err(e) => log::warn!("unexpected error reading os users: {}", e),
        }
    }

    Ok(fields)
}
