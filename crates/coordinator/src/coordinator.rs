//! The coordinator main loop
//!
//! One iteration per virtual clock tick, all of it under the clock lock:
//! spawn a worker if the schedule says so, drain every inbound message
//! currently queued, run deadlock detection when the interval elapses,
//! advance the clock, then yield. The loop runs until every launched
//! worker has finished and the launch budget is spent.

use crate::worker::{spawn_worker, WorkerContext, WorkerHandle};
use ossim_clock::{SharedClock, SimTime};
use ossim_config::Config;
use ossim_detect::resolver;
use ossim_errors::{Error, ProtocolError};
use ossim_events::{EventEmitter, EventSender, SimEvent};
use ossim_proto::{
    reply_channel, request_channel, Envelope, Reply, RequestReceiver, RequestSender, WireCodec,
    WorkerMessage,
};
use ossim_resources::{ResourceTable, SlotTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Counters reported when the simulation drains
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Workers launched over the whole run
    pub launched: usize,
    /// Workers that terminated voluntarily
    pub completed: usize,
    /// Workers killed by deadlock resolution
    pub killed: usize,
    /// Requests granted on arrival
    pub granted_immediate: usize,
    /// Requests granted from a wait queue
    pub granted_from_queue: usize,
    /// Detection passes run
    pub detections: usize,
    /// Detection passes that found deadlock
    pub resolutions: usize,
}

/// The single owner of all simulation state
pub struct Coordinator {
    config: Config,
    clock: SharedClock,
    table: ResourceTable,
    slots: SlotTable<WorkerHandle>,
    codec: WireCodec,
    instances: Arc<Vec<u32>>,
    requests_rx: RequestReceiver,
    requests_tx: RequestSender,
    shutdown: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    events: Option<EventSender>,
    rng: StdRng,
    base_seed: u64,
    running: usize,
    launched: usize,
    grants_since_table: usize,
    joins: Vec<JoinHandle<()>>,
    summary: RunSummary,
}

impl EventEmitter for Coordinator {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl Coordinator {
    /// Build a coordinator with a freshly generated resource table
    #[must_use]
    pub fn new(config: Config, events: Option<EventSender>) -> Self {
        let base_seed = config
            .simulation
            .seed
            .unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(base_seed);

        let max_running = config.workers.max_running;
        let table = ResourceTable::generate(&config.resources, max_running, &mut rng);
        let instances = Arc::new(
            (0..table.classes())
                .map(|r| table.class(r).instances())
                .collect::<Vec<_>>(),
        );
        let codec = WireCodec::new(config.resources.classes, config.resources.max_instances);
        let (requests_tx, requests_rx) = request_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        Self {
            clock: SharedClock::new(),
            table,
            slots: SlotTable::new(max_running),
            codec,
            instances,
            requests_rx,
            requests_tx,
            shutdown,
            shutdown_rx,
            events,
            rng,
            base_seed,
            running: 0,
            launched: 0,
            grants_since_table: 0,
            joins: Vec::new(),
            summary: RunSummary::default(),
            config,
        }
    }

    /// A clone of the virtual clock, for observers
    #[must_use]
    pub fn clock(&self) -> SharedClock {
        self.clock.clone()
    }

    /// Run the simulation to completion
    ///
    /// # Errors
    ///
    /// Returns the first invariant, protocol, or resolution error; all are
    /// unrecoverable logic defects and abort the run.
    pub async fn run(mut self) -> Result<RunSummary, Error> {
        info!(
            seed = self.base_seed,
            classes = self.table.classes(),
            max_running = self.config.workers.max_running,
            max_launched = self.config.workers.max_launched,
            "simulation starting"
        );

        let mut next_spawn = SimTime::zero();
        let mut next_detect = self.config.simulation.detection_interval();
        let sleep = Duration::from_micros(self.config.simulation.tick_sleep_us);

        loop {
            self.tick(&mut next_spawn, &mut next_detect)?;

            if sleep.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(sleep).await;
            }

            if self.running == 0 && self.launched >= self.config.workers.max_launched {
                break;
            }
        }

        self.shutdown_workers().await;
        self.summary.launched = self.launched;
        self.emit(SimEvent::SimulationEnded {
            launched: self.launched,
        });
        info!(launched = self.launched, "simulation drained");
        Ok(self.summary)
    }

    /// One clock tick, executed under the clock lock
    fn tick(&mut self, next_spawn: &mut SimTime, next_detect: &mut SimTime) -> Result<(), Error> {
        let clock = self.clock.clone();
        let mut now = clock.guard();

        if *now >= *next_spawn {
            if self.running < self.config.workers.max_running
                && self.launched < self.config.workers.max_launched
            {
                self.launch_worker()?;
            }
            *next_spawn = next_spawn.add(SimTime::random_between(
                self.config.simulation.min_spawn_interval(),
                self.config.simulation.max_spawn_interval(),
                &mut self.rng,
            ));
        }

        while let Ok(envelope) = self.requests_rx.try_recv() {
            self.dispatch(envelope, *now)?;
        }

        if *now >= *next_detect {
            self.detect_and_resolve(*now)?;
            *next_detect = next_detect.add(self.config.simulation.detection_interval());
        }

        *now = now.add(self.config.simulation.clock_increment());
        Ok(())
    }

    fn launch_worker(&mut self) -> Result<(), Error> {
        let (reply_tx, reply_rx) = reply_channel();
        let pid = self.slots.assign(WorkerHandle::new(reply_tx))?;

        let ctx = WorkerContext {
            clock: self.clock.clone(),
            codec: self.codec,
            instances: Arc::clone(&self.instances),
            config: self.config.workers.clone(),
            requests: self.requests_tx.clone(),
            shutdown: self.shutdown_rx.clone(),
        };
        let seed = self.base_seed.wrapping_add(self.launched as u64 + 1);
        self.joins.push(spawn_worker(pid, seed, ctx, reply_rx));

        self.running += 1;
        self.launched += 1;
        self.emit(SimEvent::WorkerSpawned {
            pid,
            launched: self.launched,
        });
        Ok(())
    }

    /// Decode and act on one inbound worker message
    fn dispatch(&mut self, envelope: Envelope, now: SimTime) -> Result<(), Error> {
        let pid = envelope.pid;
        if !self.slots.is_live(pid) {
            return Err(ProtocolError::StalePid { pid }.into());
        }

        match self.codec.decode(envelope.payload)? {
            WorkerMessage::Request { resource, quantity } => {
                self.handle_request(pid, resource, quantity, now)
            }
            WorkerMessage::Release { resource, quantity } => {
                self.handle_release(pid, resource, quantity, now)
            }
            WorkerMessage::Terminate => self.handle_termination(pid, now),
        }
    }

    fn handle_request(
        &mut self,
        pid: usize,
        resource: usize,
        quantity: u32,
        now: SimTime,
    ) -> Result<(), Error> {
        self.emit(SimEvent::RequestDetected {
            pid,
            resource,
            quantity,
            time: now,
        });

        if self.table.try_grant(pid, resource, quantity)? {
            self.table.validate()?;
            self.reply(pid, Reply::RequestConfirmed)?;
            self.summary.granted_immediate += 1;
            self.note_grant();
            self.emit(SimEvent::Granted {
                pid,
                resource,
                quantity,
                from_queue: false,
                time: now,
            });
        } else {
            self.emit(SimEvent::Enqueued {
                pid,
                resource,
                quantity,
                available: self.table.class(resource).available(),
            });
            self.table.enqueue_request(pid, resource, quantity)?;
            self.table.validate()?;
        }
        Ok(())
    }

    fn handle_release(
        &mut self,
        pid: usize,
        resource: usize,
        quantity: u32,
        now: SimTime,
    ) -> Result<(), Error> {
        self.emit(SimEvent::Released {
            pid,
            resource,
            quantity,
            time: now,
        });
        self.table.release(pid, resource, quantity)?;
        self.table.validate()?;

        // A release can in principle unblock any queue, so re-scan them all
        self.rescan_all_queues(now)?;
        self.reply(pid, Reply::ReleaseConfirmed)
    }

    fn handle_termination(&mut self, pid: usize, now: SimTime) -> Result<(), Error> {
        self.reply(pid, Reply::TerminationConfirmed)?;
        self.slots.take(pid)?;
        self.running -= 1;

        let released = self.table.reclaim_all(pid)?;
        self.table.validate()?;
        self.emit(SimEvent::WorkerCompleted { pid });
        self.emit(SimEvent::Reclaimed {
            pid,
            released: released.clone(),
        });
        self.summary.completed += 1;

        // Only the classes this worker actually held can have been unblocked
        for (resource, &amount) in released.iter().enumerate() {
            if amount > 0 {
                self.rescan_queue(resource, now)?;
            }
        }
        Ok(())
    }

    fn detect_and_resolve(&mut self, now: SimTime) -> Result<(), Error> {
        self.emit(SimEvent::DetectionStarted { time: now });
        self.summary.detections += 1;

        let events = self.events.clone();
        let killed = resolver::resolve(
            &mut self.table,
            &mut self.slots,
            &events,
            &mut |pid, handle: WorkerHandle| {
                debug!(pid, "delivering kill signal");
                handle.send(Reply::Killed);
            },
        )?;

        if killed > 0 {
            self.running -= killed;
            self.summary.killed += killed;
            self.summary.resolutions += 1;
            // A kill can free any class, so every queue gets a fresh scan
            self.rescan_all_queues(now)?;
        }
        Ok(())
    }

    fn rescan_all_queues(&mut self, now: SimTime) -> Result<(), Error> {
        for resource in 0..self.table.classes() {
            self.rescan_queue(resource, now)?;
        }
        Ok(())
    }

    /// Give each queued request on `resource` one chance, replying to
    /// owners of newly granted requests
    fn rescan_queue(&mut self, resource: usize, now: SimTime) -> Result<(), Error> {
        let mut granted = Vec::new();
        self.table
            .process_queue(resource, &mut |request| granted.push(request))?;
        self.table.validate()?;

        for request in granted {
            self.reply(request.pid, Reply::RequestConfirmed)?;
            self.summary.granted_from_queue += 1;
            self.note_grant();
            self.emit(SimEvent::Granted {
                pid: request.pid,
                resource: request.resource,
                quantity: request.quantity,
                from_queue: true,
                time: now,
            });
        }
        Ok(())
    }

    fn reply(&self, pid: usize, reply: Reply) -> Result<(), Error> {
        let handle = self
            .slots
            .get(pid)
            .ok_or(ProtocolError::ReplyChannelClosed { pid })?;
        if handle.send(reply) {
            Ok(())
        } else {
            Err(ProtocolError::ReplyChannelClosed { pid }.into())
        }
    }

    /// Emit a periodic allocation table snapshot every N grants
    fn note_grant(&mut self) {
        let every = self.config.simulation.grants_per_table;
        if every == 0 {
            return;
        }
        self.grants_since_table += 1;
        if self.grants_since_table >= every {
            self.grants_since_table = 0;
            let rows = (0..self.table.max_running())
                .map(|pid| {
                    (0..self.table.classes())
                        .map(|r| self.table.class(r).allocation(pid))
                        .collect()
                })
                .collect();
            self.emit(SimEvent::AllocationTable { rows });
        }
    }

    /// Broadcast shutdown and reap worker tasks with a bounded grace period
    async fn shutdown_workers(&mut self) {
        let _ = self.shutdown.send(true);
        for join in self.joins.drain(..) {
            if tokio::time::timeout(Duration::from_secs(1), join)
                .await
                .is_err()
            {
                debug!("worker task did not exit within grace period");
            }
        }
    }
}
