//! Event rendering and run statistics
//!
//! Maps simulation events onto tracing records the way the core never
//! does itself, and accumulates the run statistics printed at the end.

use ossim_coordinator::RunSummary;
use ossim_events::SimEvent;
use tracing::{debug, info, warn};

/// Renders events and keeps running totals
pub struct EventHandler {
    json: bool,
    requests_seen: usize,
    grants_seen: usize,
    deadlocks_seen: usize,
}

impl EventHandler {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self {
            json,
            requests_seen: 0,
            grants_seen: 0,
            deadlocks_seen: 0,
        }
    }

    /// Render one event and fold it into the statistics
    pub fn handle(&mut self, event: &SimEvent) {
        match event {
            SimEvent::RequestDetected { .. } => self.requests_seen += 1,
            SimEvent::Granted { .. } => self.grants_seen += 1,
            SimEvent::DeadlockedSet { .. } => self.deadlocks_seen += 1,
            _ => {}
        }

        if self.json {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
            return;
        }
        log_event(event);
    }

    /// Print the end-of-run summary
    pub fn finish(&self, summary: &RunSummary) {
        if self.json {
            if let Ok(line) = serde_json::to_string(summary) {
                println!("{line}");
            }
            return;
        }
        println!("simulation complete");
        println!(
            "  events observed:       {} requests, {} grants, {} deadlock reports",
            self.requests_seen, self.grants_seen, self.deadlocks_seen
        );
        println!("  workers launched:      {}", summary.launched);
        println!("  completed voluntarily: {}", summary.completed);
        println!("  killed by resolver:    {}", summary.killed);
        println!(
            "  requests granted:      {} ({} immediate, {} from queue)",
            summary.granted_immediate + summary.granted_from_queue,
            summary.granted_immediate,
            summary.granted_from_queue
        );
        println!("  detection passes:      {}", summary.detections);
        println!("  deadlocks resolved:    {}", summary.resolutions);
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::WorkerSpawned { pid, launched } => {
            info!(pid, launched, "worker spawned");
        }
        SimEvent::RequestDetected {
            pid,
            resource,
            quantity,
            time,
        } => {
            debug!(pid, resource, quantity, %time, "request detected");
        }
        SimEvent::Granted {
            pid,
            resource,
            quantity,
            from_queue,
            time,
        } => {
            debug!(pid, resource, quantity, from_queue, %time, "request granted");
        }
        SimEvent::Enqueued {
            pid,
            resource,
            quantity,
            available,
        } => {
            debug!(pid, resource, quantity, available, "request enqueued");
        }
        SimEvent::Released {
            pid,
            resource,
            quantity,
            time,
        } => {
            debug!(pid, resource, quantity, %time, "resources released");
        }
        SimEvent::Reclaimed { pid, released } => {
            let total: u32 = released.iter().sum();
            debug!(pid, total, "holdings reclaimed");
        }
        SimEvent::WorkerCompleted { pid } => {
            info!(pid, "worker completed");
        }
        SimEvent::DetectionStarted { time } => {
            debug!(%time, "running deadlock detection");
        }
        SimEvent::DeadlockedSet { pids } => {
            warn!(?pids, "deadlock detected");
        }
        SimEvent::ResolutionAttempt => {
            warn!("attempting to resolve deadlock");
        }
        SimEvent::ProcessKilled { pid } => {
            warn!(pid, "killed deadlock victim");
        }
        SimEvent::ResolutionSucceeded {
            killed,
            running_at_start,
        } => {
            info!(killed, running_at_start, "system is no longer deadlocked");
        }
        SimEvent::AllocationTable { rows } => {
            debug!(processes = rows.len(), "allocation table snapshot");
        }
        SimEvent::SimulationEnded { launched } => {
            info!(launched, "simulation ended");
        }
    }
}
