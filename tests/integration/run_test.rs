// End-to-end run of the configured inputs against the real host

use std::time::Duration;
use sysgather::commands::run::run_inputs;
use sysgather::{AgentConfig, InputRegistry, Sample};
use tokio::sync::watch;

#[tokio::test(start_paused = true)]
async fn test_run_streams_json_until_interrupted() {
    let config = AgentConfig::parse(
        r#"
[global]
interval = 1
queue_capacity = 16

[inputs.system]
"#,
    )
    .unwrap();
    let registry = InputRegistry::with_builtin();
    let (interrupt_tx, interrupt_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        interrupt_tx.send_replace(true);
        // Keep the sender alive until the run loop has observed the change
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let mut out = Vec::new();
    let written = run_inputs(&config, &registry, interrupt_rx, &mut out)
        .await
        .unwrap();

    let samples: Vec<Sample> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(samples.len(), written);
    assert!(written >= 14, "expected two cycles, got {} samples", written);
    assert!(samples.iter().all(|s| s.metric.starts_with("system_")));
    assert!(samples.iter().any(|s| s.metric == "system_n_cpus"));
}

#[tokio::test]
async fn test_run_rejects_unknown_input() {
    let config = AgentConfig::parse("[inputs.gpu]\n").unwrap();
    let registry = InputRegistry::with_builtin();
    let (_interrupt_tx, interrupt_rx) = watch::channel(false);

    let mut out = Vec::new();
    let result = run_inputs(&config, &registry, interrupt_rx, &mut out).await;
    assert!(result.is_err());
    assert!(out.is_empty());
}
