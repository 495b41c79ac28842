// Integration tests for the system input: field policy, emission and lifecycle

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use sysgather::core::system_stats::{gather_fields, gather_once, CycleError, GatherError};
use sysgather::platform::{LoadAverage, MetricSource, SourceError};
use sysgather::{CollectorConfig, SystemStats};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy)]
enum Fail {
    NotFound,
    Denied,
    Unsupported,
    Broken,
}

impl Fail {
    fn error(self) -> SourceError {
        match self {
            Fail::NotFound => SourceError::NotFound("fake".to_string()),
            Fail::Denied => SourceError::PermissionDenied("fake".to_string()),
            Fail::Unsupported => SourceError::Unsupported("fake".to_string()),
            Fail::Broken => SourceError::Unavailable("fake".to_string()),
        }
    }
}

struct FakeSource {
    load: Result<LoadAverage, Fail>,
    cpus: Result<usize, Fail>,
    uptime: Result<u64, Fail>,
    users: Result<usize, Fail>,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            load: Ok(LoadAverage {
                one: 1.0,
                five: 2.0,
                fifteen: 4.0,
            }),
            cpus: Ok(2),
            uptime: Ok(3600),
            users: Ok(4),
        }
    }
}

impl MetricSource for FakeSource {
    fn load_average(&mut self) -> Result<LoadAverage, SourceError> {
        self.load.map_err(Fail::error)
    }

    fn logical_cpus(&mut self) -> Result<usize, SourceError> {
        self.cpus.map_err(Fail::error)
    }

    fn uptime(&mut self) -> Result<u64, SourceError> {
        self.uptime.map_err(Fail::error)
    }

    fn user_count(&mut self) -> Result<usize, SourceError> {
        self.users.map_err(Fail::error)
    }
}

const BASELINE: [&str; 7] = [
    "system_load1",
    "system_load5",
    "system_load15",
    "system_n_cpus",
    "system_load_norm_1",
    "system_load_norm_5",
    "system_load_norm_15",
];

async fn run_one(
    source: FakeSource,
    collect_users: bool,
) -> (Result<usize, CycleError>, Vec<sysgather::Sample>) {
    let source = Arc::new(Mutex::new(source));
    let (tx, mut rx) = mpsc::channel(32);
    let outcome = gather_once(&source, collect_users, &tx).await;
    drop(tx);

    let mut samples = Vec::new();
    while let Some(sample) = rx.recv().await {
        samples.push(sample);
    }
    (outcome, samples)
}

fn metric_names(samples: &[sysgather::Sample]) -> Vec<&str> {
    samples.iter().map(|s| s.metric.as_str()).collect()
}

#[tokio::test]
async fn test_full_cycle_values() {
    let source = FakeSource::default();
    let (outcome, samples) = run_one(source, false).await;

    assert_eq!(outcome.unwrap(), 8);
    let values: Vec<(&str, f64)> = samples.iter().map(|s| (s.metric.as_str(), s.value)).collect();
    assert_eq!(
        values,
        vec![
            ("system_load1", 1.0),
            ("system_load5", 2.0),
            ("system_load15", 4.0),
            ("system_n_cpus", 2.0),
            ("system_load_norm_1", 0.5),
            ("system_load_norm_5", 1.0),
            ("system_load_norm_15", 2.0),
            ("system_uptime", 3600.0),
        ]
    );
    assert!(samples.iter().all(|s| s.timestamp == samples[0].timestamp));
}

#[tokio::test]
async fn test_cpu_failure_emits_nothing() {
    let source = FakeSource {
        cpus: Err(Fail::Broken),
        ..Default::default()
    };
    let (outcome, samples) = run_one(source, true).await;

    assert!(matches!(
        outcome,
        Err(CycleError::Gather(GatherError::CpuCount(_)))
    ));
    assert!(samples.is_empty());
}

#[tokio::test]
async fn test_load_failure_emits_nothing() {
    let source = FakeSource {
        load: Err(Fail::Denied),
        ..Default::default()
    };
    let (outcome, samples) = run_one(source, false).await;

    assert!(outcome.is_err());
    assert!(samples.is_empty());
}

#[tokio::test]
async fn test_unsupported_load_still_emits() {
    let source = FakeSource {
        load: Err(Fail::Unsupported),
        ..Default::default()
    };
    let (outcome, samples) = run_one(source, false).await;

    assert_eq!(outcome.unwrap(), 8);
    assert_eq!(samples[0].value, 0.0);
}

#[tokio::test]
async fn test_uptime_failure_keeps_baseline() {
    let source = FakeSource {
        uptime: Err(Fail::Broken),
        ..Default::default()
    };
    let (_, samples) = run_one(source, false).await;

    assert_eq!(metric_names(&samples), BASELINE.to_vec());
}

#[tokio::test]
async fn test_user_not_found_omits_field() {
    let source = FakeSource {
        uptime: Err(Fail::Broken),
        users: Err(Fail::NotFound),
        ..Default::default()
    };
    let (outcome, samples) = run_one(source, true).await;

    assert_eq!(outcome.unwrap(), 7);
    assert_eq!(metric_names(&samples), BASELINE.to_vec());
}

#[tokio::test]
async fn test_users_emitted_when_enabled() {
    let source = FakeSource::default();
    let (_, samples) = run_one(source, true).await;

    let users = samples.last().unwrap();
    assert_eq!(users.metric, "system_n_users");
    assert_eq!(users.value, 4.0);
}

#[test]
fn test_users_never_present_when_disabled() {
    for users in [Ok(4), Err(Fail::NotFound), Err(Fail::Broken)] {
        let mut source = FakeSource {
            users,
            ..Default::default()
        };
        let fields = gather_fields(&mut source, false).unwrap();
        assert!(fields.n_users.is_none());
    }
}

#[test]
fn test_zero_interval_uses_default() {
    let stats = SystemStats::with_source(
        CollectorConfig::default(),
        Duration::from_secs(20),
        FakeSource::default(),
    );
    assert_eq!(stats.interval(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_each_cycle_shares_one_timestamp() {
    let config = CollectorConfig {
        interval_seconds: 1,
        collect_user_number: true,
        ..Default::default()
    };
    let mut stats = SystemStats::with_source(config, Duration::from_secs(15), FakeSource::default());
    let (tx, mut rx) = mpsc::channel(64);
    stats.start(tx).unwrap();

    let mut cycles = Vec::new();
    for _ in 0..3 {
        let mut cycle = Vec::new();
        for _ in 0..9 {
            cycle.push(rx.recv().await.unwrap());
        }
        cycles.push(cycle);
    }
    stats.stop();
    stats.join().await;

    for cycle in &cycles {
        assert_eq!(cycle[0].metric, "system_load1");
        assert_eq!(cycle[8].metric, "system_n_users");
        assert!(cycle.iter().all(|s| s.timestamp == cycle[0].timestamp));
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_emission() {
    let config = CollectorConfig {
        interval_seconds: 2,
        ..Default::default()
    };
    let mut stats = SystemStats::with_source(config, Duration::from_secs(15), FakeSource::default());
    let (tx, mut rx) = mpsc::channel(64);
    stats.start(tx).unwrap();

    for _ in 0..8 {
        rx.recv().await.unwrap();
    }
    stats.stop();
    stats.join().await;

    // The loop task dropped its sender on exit
    assert!(rx.recv().await.is_none());
}
