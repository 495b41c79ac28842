//! `sysgather run`: start every configured input and stream samples as JSON lines.

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::io::{self, Write};
use tokio::sync::{mpsc, watch};

use crate::core::config::{AgentConfig, DEFAULT_CONFIG_PATH};
use crate::core::registry::{Input, InputRegistry};
use crate::core::system_stats::Sample;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let config = AgentConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path))?;

    let (interrupt_tx, interrupt_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        interrupt_tx.send_replace(true);
    })
    .context("Failed to install Ctrl-C handler")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .thread_name("sysgather-worker")
        .build()
        .context("Failed to build Tokio runtime")?;

    let registry = InputRegistry::with_builtin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let written = runtime.block_on(run_inputs(&config, &registry, interrupt_rx, &mut out))?;
    log::info!("Wrote {} samples", written);
    Ok(())
}

/// Run the enabled inputs until `interrupt` fires, writing each sample to `out`.
///
/// On interrupt every input is stopped and the queue is drained until all loops have
/// exited. Returns the number of samples written.
pub async fn run_inputs<W: Write>(
    config: &AgentConfig,
    registry: &InputRegistry,
    mut interrupt: watch::Receiver<bool>,
    out: &mut W,
) -> Result<usize> {
    let (queue, mut samples) = mpsc::channel::<Sample>(config.global.queue_capacity);

    let mut inputs: Vec<Box<dyn Input>> = Vec::new();
    for name in config.enabled_inputs() {
        let mut input = registry
            .build(&name, config.inputs.get(&name), &config.global)
            .with_context(|| format!("Failed to build input: {}", name))?;
        input
            .start(queue.clone())
            .with_context(|| format!("Failed to start input: {}", name))?;
        log::info!("Input {} started", name);
        inputs.push(input);
    }
    // Only the inputs hold senders from here on
    drop(queue);

    let mut written = 0;
    loop {
        tokio::select! {
            sample = samples.recv() => match sample {
                Some(sample) => {
                    write_sample(out, &sample)?;
                    written += 1;
                }
                None => break,
            },
            _ = interrupt.changed() => break,
        }
    }

    log::info!("Shutting down {} inputs", inputs.len());
    for input in &inputs {
        input.stop();
    }

    while let Some(sample) = samples.recv().await {
        write_sample(out, &sample)?;
        written += 1;
    }

    Ok(written)
}

fn write_sample<W: Write>(out: &mut W, sample: &Sample) -> Result<()> {
    serde_json::to_writer(&mut *out, sample).context("Failed to serialize sample")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
