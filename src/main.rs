//! Bounded Cache demo
//!
//! Exercises the cache from several concurrent tasks, shows TTL expiry and
//! prints the resulting statistics.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounded_cache::{with_eviction_policy, with_ttl, BoundedCache, CacheError, CacheSettings};

const WORKERS: usize = 4;
const KEYS_PER_WORKER: usize = 100;

/// Demo entry point.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load settings from environment variables
/// 3. Build the cache and its sweep worker
/// 4. Run concurrent writers and readers
/// 5. Demonstrate TTL expiry
/// 6. Print stats and close the cache on Ctrl+C or after the demo deadline
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = CacheSettings::from_env();
    info!(
        "Settings loaded: capacity={}, ttl={:?}, sweep_interval={:?}",
        settings.capacity, settings.ttl, settings.sweep_interval
    );

    let cache = Arc::new(
        BoundedCache::with_settings(&settings, &[with_eviction_policy("Oldest")])
            .context("failed to build cache")?,
    );

    run_workload(&cache).await?;
    demonstrate_expiry(&cache).await?;

    let stats = serde_json::to_string_pretty(&cache.stats())?;
    println!("{}", stats);

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to listen for Ctrl+C")?;
            info!("Received Ctrl+C, shutting down");
        }
        _ = tokio::time::sleep(Duration::from_secs(1)) => {}
    }

    cache.close();
    info!("Cache closed");
    Ok(())
}

/// Writers fill overlapping key ranges while readers hit them.
async fn run_workload(cache: &Arc<BoundedCache>) -> anyhow::Result<()> {
    let mut handles = Vec::with_capacity(WORKERS);

    for worker in 0..WORKERS {
        let cache = Arc::clone(cache);
        handles.push(tokio::task::spawn_blocking(move || -> bounded_cache::Result<usize> {
            let mut hits = 0;
            for i in 0..KEYS_PER_WORKER {
                let key = format!("key-{}", (worker * KEYS_PER_WORKER / 2) + i);
                cache.set("demo", &key, format!("worker-{}", worker), &[])?;
                if cache.get("demo", &key, &[]).is_ok() {
                    hits += 1;
                }
            }
            Ok(hits)
        }));
    }

    for handle in handles {
        let hits = handle.await.context("worker task failed")??;
        info!(hits, "worker finished");
    }

    info!(entries = cache.len(), consistent = cache.is_consistent(), "workload done");
    Ok(())
}

/// Stores one short-lived entry and reads it before and after its TTL.
async fn demonstrate_expiry(cache: &BoundedCache) -> anyhow::Result<()> {
    let previous = cache.config();
    let short = cache.scoped(previous.with_options(&[with_ttl(Duration::from_millis(200))])?);

    short.set("session", "token", "abc123");
    let value = short.get("session", "token")?;
    info!("Fresh value: {}", String::from_utf8_lossy(&value));

    tokio::time::sleep(Duration::from_millis(300)).await;

    match short.get("session", "token") {
        Err(CacheError::Expired(key)) => info!("Entry {} expired as expected", key),
        other => warn!("Unexpected lookup result: {:?}", other),
    }
    Ok(())
}
