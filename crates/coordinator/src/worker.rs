//! Simulated worker processes
//!
//! A worker loops on the virtual clock: at each decision time it either
//! terminates, requests a random quantity of a random class, or releases
//! part of what it holds, then blocks until the coordinator's correlated
//! reply arrives. A `Killed` reply ends the worker immediately with no
//! acknowledgement semantics.

use ossim_clock::{SharedClock, SimTime};
use ossim_config::WorkersConfig;
use ossim_proto::{Envelope, Reply, ReplyReceiver, RequestSender, WireCodec, WorkerMessage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Real time a worker sleeps while waiting for its next decision time
const POLL_SLEEP: Duration = Duration::from_micros(50);

/// The coordinator's handle to one live worker: its reply channel
///
/// Dropping the handle closes the channel, which a blocked worker reads
/// as termination.
#[derive(Debug)]
pub struct WorkerHandle {
    reply: ossim_proto::ReplySender,
}

impl WorkerHandle {
    #[must_use]
    pub fn new(reply: ossim_proto::ReplySender) -> Self {
        Self { reply }
    }

    /// Send a reply; returns whether the worker was still listening
    pub fn send(&self, reply: Reply) -> bool {
        self.reply.send(reply).is_ok()
    }
}

/// Everything a worker needs that is shared across all workers
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub clock: SharedClock,
    pub codec: WireCodec,
    /// Instance count per resource class, bounding request sizes
    pub instances: Arc<Vec<u32>>,
    pub config: WorkersConfig,
    pub requests: RequestSender,
    pub shutdown: watch::Receiver<bool>,
}

/// Launch a worker task bound to a logical pid
///
/// `seed` makes the worker's decision stream reproducible.
pub fn spawn_worker(
    pid: usize,
    seed: u64,
    ctx: WorkerContext,
    replies: ReplyReceiver,
) -> JoinHandle<()> {
    tokio::spawn(run_worker(pid, seed, ctx, replies))
}

async fn run_worker(pid: usize, seed: u64, ctx: WorkerContext, mut replies: ReplyReceiver) {
    let mut rng = StdRng::seed_from_u64(seed);
    // Instances this worker believes it will hold once replies arrive
    let mut held = vec![0u32; ctx.instances.len()];
    let mut decision_time = ctx.clock.now();

    loop {
        if *ctx.shutdown.borrow() {
            trace!(pid, "worker observed shutdown");
            return;
        }

        let now = ctx.clock.now();
        if now < decision_time {
            tokio::time::sleep(POLL_SLEEP).await;
            continue;
        }

        decision_time = decision_time.add(SimTime::random_between(
            ctx.config.min_decision_interval(),
            ctx.config.max_decision_interval(),
            &mut rng,
        ));

        let message = if rng.random_bool(ctx.config.termination_probability) {
            Some(WorkerMessage::Terminate)
        } else if rng.random_bool(ctx.config.request_probability) {
            pick_request(&ctx.instances, &mut held, &mut rng)
        } else {
            pick_release(&mut held, &mut rng)
        };

        let Some(message) = message else {
            // Nothing requestable or releasable this round
            continue;
        };

        let Ok(payload) = ctx.codec.encode(message) else {
            return;
        };
        if ctx.requests.send(Envelope { pid, payload }).is_err() {
            // Coordinator is gone; nothing left to do
            return;
        }
        trace!(pid, payload, "worker sent message");

        // Block until the correlated reply arrives
        match replies.recv().await {
            Some(Reply::Killed) | None => {
                trace!(pid, "worker killed");
                return;
            }
            Some(Reply::TerminationConfirmed) => return,
            Some(Reply::RequestConfirmed | Reply::ReleaseConfirmed) => {}
        }
    }
}

/// Pick a random class with headroom and a random quantity of it
fn pick_request(
    instances: &[u32],
    held: &mut [u32],
    rng: &mut StdRng,
) -> Option<WorkerMessage> {
    let resource = rng.random_range(0..instances.len());
    let headroom = instances[resource] - held[resource];
    if headroom == 0 {
        return None;
    }
    let quantity = rng.random_range(1..=headroom);
    held[resource] += quantity;
    Some(WorkerMessage::Request { resource, quantity })
}

/// Pick a random held class and a random quantity to give back
fn pick_release(held: &mut [u32], rng: &mut StdRng) -> Option<WorkerMessage> {
    let held_classes: Vec<usize> = held
        .iter()
        .enumerate()
        .filter_map(|(r, &count)| (count > 0).then_some(r))
        .collect();
    let resource = *held_classes.get(rng.random_range(0..held_classes.len().max(1)))?;
    let quantity = rng.random_range(1..=held[resource]);
    held[resource] -= quantity;
    Some(WorkerMessage::Release { resource, quantity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_respects_headroom() {
        let mut rng = StdRng::seed_from_u64(7);
        let instances = vec![4, 6];
        let mut held = vec![0, 0];
        for _ in 0..50 {
            if let Some(WorkerMessage::Request { resource, quantity }) =
                pick_request(&instances, &mut held, &mut rng)
            {
                assert!(quantity >= 1);
                assert!(held[resource] <= instances[resource]);
            }
        }
    }

    #[test]
    fn release_only_from_holdings() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut held = vec![0, 3];
        let message = pick_release(&mut held, &mut rng).unwrap();
        match message {
            WorkerMessage::Release { resource, quantity } => {
                assert_eq!(resource, 1);
                assert!(quantity >= 1 && quantity <= 3);
                assert_eq!(held[1], 3 - quantity);
            }
            _ => panic!("expected a release"),
        }
    }

    #[test]
    fn release_with_nothing_held_is_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut held = vec![0, 0];
        assert!(pick_release(&mut held, &mut rng).is_none());
    }
}
