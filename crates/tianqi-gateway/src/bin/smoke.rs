//! Smoke run against a live gateway: several viewers walk every page, fragment and
//! JSON route concurrently, then one reload is requested.
//! Run with the gateway up: cargo run --bin smoke
//! Target override: TIANQI_SMOKE_URL=http://host:port

use futures_util::future::join_all;
use reqwest::Client;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinError;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const VIEWERS: usize = 4;
const ROUNDS: usize = 3;

// Routes a page session touches; 204 counts as success for tooltip misses.
const ROUTES: &[&str] = &[
    "/health",
    "/",
    "/fragments/daily?report=0",
    "/fragments/daily?report=1",
    "/fragments/works?category=all",
    "/fragments/abilities",
    "/fragments/tooltip?key=stat%3Askills&left=40&top=200&width=120&height=40&vw=1280&vh=800",
    "/fragments/tooltip/hide",
    "/api/tooltip/stat:projects",
    "/api/charts",
];

/// Viewer tasks that never finished; each one counts as a failed request.
fn aborted_viewers(joined: &[Result<(), JoinError>]) -> u32 {
    joined
        .iter()
        .filter_map(|r| r.as_ref().err())
        .inspect(|e| println!("[smoke] viewer aborted: {}", e))
        .count() as u32
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("TIANQI_SMOKE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    println!(
        "[smoke] {} viewers, {} rounds over {} routes at {}",
        VIEWERS,
        ROUNDS,
        ROUTES.len(),
        base_url
    );

    let ok = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));
    let latencies: Arc<RwLock<Vec<u64>>> = Arc::new(RwLock::new(Vec::new()));
    let client = Client::new();

    let viewers = (0..VIEWERS).map(|viewer| {
        let client = client.clone();
        let base_url = base_url.clone();
        let ok = Arc::clone(&ok);
        let failed = Arc::clone(&failed);
        let latencies = Arc::clone(&latencies);

        tokio::spawn(async move {
            for round in 0..ROUNDS {
                for i in 0..ROUTES.len() {
                    // Stagger viewers so they do not walk the routes in lockstep.
                    let route = ROUTES[(i + viewer + round) % ROUTES.len()];
                    let start = Instant::now();
                    let res = client.get(format!("{}{}", base_url, route)).send().await;
                    let elapsed_ms = start.elapsed().as_millis() as u64;

                    match res {
                        Ok(resp) if resp.status().is_success() => {
                            ok.fetch_add(1, Ordering::Relaxed);
                            latencies.write().await.push(elapsed_ms);
                        }
                        Ok(resp) => {
                            println!("[smoke] {} -> {}", route, resp.status());
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            println!("[smoke] {} -> {}", route, e);
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            }
        })
    });
    let joined = join_all(viewers).await;
    failed.fetch_add(aborted_viewers(&joined), Ordering::Relaxed);

    match client.post(format!("{}/api/reload", base_url)).send().await {
        Ok(resp) => println!("[smoke] reload -> {}", resp.status()),
        Err(e) => println!("[smoke] reload -> {}", e),
    }

    let ok = ok.load(Ordering::Relaxed);
    let failed = failed.load(Ordering::Relaxed);
    let samples = latencies.read().await;
    let mean_ms = if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<u64>() as f64 / samples.len() as f64
    };
    let slowest_ms = samples.iter().copied().max().unwrap_or(0);

    println!("[smoke] {} requests, {} ok, {} failed", ok + failed, ok, failed);
    println!("[smoke] latency mean {:.0}ms, slowest {}ms", mean_ms, slowest_ms);
    if failed > 0 {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicked_viewer_counts_as_failure() {
        let fine = tokio::spawn(async {});
        let broken = tokio::spawn(async { panic!("viewer blew up") });
        let joined = join_all([fine, broken]).await;
        assert_eq!(aborted_viewers(&joined), 1);
    }

    #[test]
    fn every_route_is_rooted() {
        assert!(ROUTES.iter().all(|r| r.starts_with('/')));
    }
}
