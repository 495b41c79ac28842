use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::{LoadAverage, MetricSource, SourceError};

/// Queries the running host through sysinfo and the login records database.
pub struct HostSource {
    system: System,
}

impl HostSource {
    pub fn new() -> Self {
        let system =
            System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
        Self { system }
    }
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for HostSource {
    fn load_average(&mut self) -> Result<LoadAverage, SourceError> {
        // sysinfo reports zeros on Windows, which has no run-queue average
        if cfg!(windows) || !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SourceError::Unsupported("load average".to_string()));
        }

        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn logical_cpus(&mut self) -> Result<usize, SourceError> {
        self.system.refresh_cpu_list(CpuRefreshKind::nothing());
        match self.system.cpus().len() {
            0 => Err(SourceError::Unavailable(
                "no logical CPUs reported".to_string(),
            )),
            n => Ok(n),
        }
    }

    fn uptime(&mut self) -> Result<u64, SourceError> {
        // sysinfo falls back to 0 when the boot clock cannot be read
        match System::uptime() {
            0 => Err(SourceError::Unavailable("host uptime".to_string())),
            secs => Ok(secs),
        }
    }

    #[cfg(target_os = "linux")]
    fn user_count(&mut self) -> Result<usize, SourceError> {
        super::utmp::read_user_count(super::utmp::UTMP_PATH)
    }

    #[cfg(not(target_os = "linux"))]
    fn user_count(&mut self) -> Result<usize, SourceError> {
        Err(SourceError::Unsupported("logged-in user count".to_string()))
    }
}
