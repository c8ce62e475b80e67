//! Resource table: per-class counts, allocations, and wait queues
//!
//! Single-writer state owned by the coordinator. Every mutating operation
//! either upholds the conservation invariant or reports an
//! `InvariantError`, which callers treat as fatal.

use crate::queue::{PendingRequest, QueueHandle, WaitQueue};
use ossim_config::ResourcesConfig;
use ossim_errors::InvariantError;
use rand::Rng;

/// One class of interchangeable unit resources
#[derive(Debug, Clone)]
pub struct ResourceClass {
    /// Informational only; detection does not treat shareable classes
    /// differently
    pub shareable: bool,
    instances: u32,
    available: u32,
    allocations: Vec<u32>,
    waiting: WaitQueue,
}

impl ResourceClass {
    fn new(instances: u32, shareable: bool, max_running: usize) -> Self {
        Self {
            shareable,
            instances,
            available: instances,
            allocations: vec![0; max_running],
            waiting: WaitQueue::new(),
        }
    }

    #[must_use]
    pub fn instances(&self) -> u32 {
        self.instances
    }

    #[must_use]
    pub fn available(&self) -> u32 {
        self.available
    }

    #[must_use]
    pub fn allocation(&self, pid: usize) -> u32 {
        self.allocations[pid]
    }

    #[must_use]
    pub fn waiting(&self) -> &WaitQueue {
        &self.waiting
    }
}

/// The authoritative allocation state of the whole simulation
#[derive(Debug, Clone)]
pub struct ResourceTable {
    classes: Vec<ResourceClass>,
    /// At most one outstanding queued request per pid; a second enqueue
    /// for the same pid is a logic defect
    pending: Vec<Option<(usize, QueueHandle)>>,
    max_running: usize,
}

impl ResourceTable {
    /// Create a table with randomized instance counts per the config
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(
        config: &ResourcesConfig,
        max_running: usize,
        rng: &mut R,
    ) -> Self {
        let classes = (0..config.classes)
            .map(|_| {
                let instances = rng.random_range(config.min_instances..=config.max_instances);
                let shareable = rng.random_bool(config.shareable_probability);
                ResourceClass::new(instances, shareable, max_running)
            })
            .collect();
        Self {
            classes,
            pending: vec![None; max_running],
            max_running,
        }
    }

    /// Create a table with explicit instance counts (tests, scenarios)
    #[must_use]
    pub fn with_instances(instances: &[u32], max_running: usize) -> Self {
        Self {
            classes: instances
                .iter()
                .map(|&count| ResourceClass::new(count, false, max_running))
                .collect(),
            pending: vec![None; max_running],
            max_running,
        }
    }

    #[must_use]
    pub fn classes(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn max_running(&self) -> usize {
        self.max_running
    }

    #[must_use]
    pub fn class(&self, resource: usize) -> &ResourceClass {
        &self.classes[resource]
    }

    /// Largest instance count over all classes, for wire-codec geometry
    #[must_use]
    pub fn max_instances(&self) -> u32 {
        self.classes.iter().map(|c| c.instances).max().unwrap_or(0)
    }

    /// The pid's queued request, if any
    #[must_use]
    pub fn pending_request(&self, pid: usize) -> Option<PendingRequest> {
        let (resource, _) = self.pending[pid]?;
        self.classes[resource]
            .waiting
            .iter()
            .find(|r| r.pid == pid)
            .copied()
    }

    /// Grant `quantity` of `resource` to `pid` if enough is available
    ///
    /// Returns whether the grant happened; a `false` means the caller
    /// must enqueue.
    ///
    /// # Errors
    ///
    /// Returns an error on out-of-range ids.
    pub fn try_grant(
        &mut self,
        pid: usize,
        resource: usize,
        quantity: u32,
    ) -> Result<bool, InvariantError> {
        self.check_ids(pid, resource)?;
        let class = &mut self.classes[resource];
        if quantity > class.available {
            return Ok(false);
        }
        class.available -= quantity;
        class.allocations[pid] += quantity;
        Ok(true)
    }

    /// Return `quantity` of `resource` from `pid` to the pool
    ///
    /// # Errors
    ///
    /// Fatal if the release exceeds the pid's current allocation.
    pub fn release(
        &mut self,
        pid: usize,
        resource: usize,
        quantity: u32,
    ) -> Result<(), InvariantError> {
        self.check_ids(pid, resource)?;
        let class = &mut self.classes[resource];
        if quantity > class.allocations[pid] {
            return Err(InvariantError::OverRelease {
                pid,
                resource,
                quantity,
                held: class.allocations[pid],
            });
        }
        class.allocations[pid] -= quantity;
        class.available += quantity;
        Ok(())
    }

    /// Queue a request that could not be granted
    ///
    /// # Errors
    ///
    /// Fatal if the quantity is zero or the pid already has a pending
    /// request (single-outstanding-request assumption).
    pub fn enqueue_request(
        &mut self,
        pid: usize,
        resource: usize,
        quantity: u32,
    ) -> Result<(), InvariantError> {
        self.check_ids(pid, resource)?;
        if quantity == 0 {
            return Err(InvariantError::ZeroQuantityQueued { pid });
        }
        if let Some((held_resource, _)) = self.pending[pid] {
            return Err(InvariantError::AlreadyPending {
                pid,
                resource: held_resource,
            });
        }
        let handle = self.classes[resource].waiting.push_back(PendingRequest {
            pid,
            resource,
            quantity,
        });
        self.pending[pid] = Some((resource, handle));
        Ok(())
    }

    /// Discard the pid's queued request, unlinking it from its queue
    ///
    /// # Errors
    ///
    /// Fatal if the recorded handle is no longer linked.
    pub fn discard_pending(
        &mut self,
        pid: usize,
    ) -> Result<Option<PendingRequest>, InvariantError> {
        match self.pending[pid].take() {
            Some((resource, handle)) => {
                let request = self.classes[resource].waiting.remove(handle)?;
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }

    /// Move a process's entire allocation back to the pool
    ///
    /// Discards any queued request the pid still has, then returns the
    /// per-class amounts released so the caller knows which queues to
    /// re-scan.
    ///
    /// # Errors
    ///
    /// Fatal if the pid's pending-request record is stale.
    pub fn reclaim_all(&mut self, pid: usize) -> Result<Vec<u32>, InvariantError> {
        if pid >= self.max_running {
            return Err(InvariantError::UnknownPid {
                pid,
                max_running: self.max_running,
            });
        }
        self.discard_pending(pid)?;
        let released = self
            .classes
            .iter_mut()
            .map(|class| {
                let held = class.allocations[pid];
                class.available += held;
                class.allocations[pid] = 0;
                held
            })
            .collect();
        Ok(released)
    }

    /// Give every queued request on `resource` one chance to be granted
    ///
    /// Scans exactly the queue length captured at entry: grantable entries
    /// are granted, removed, and reported through `granted`; the rest
    /// rotate to the back, preserving relative order among those left
    /// waiting. Entries requeued during the pass are not re-examined.
    ///
    /// # Errors
    ///
    /// Fatal if a queued entry has a zero quantity.
    pub fn process_queue(
        &mut self,
        resource: usize,
        granted: &mut dyn FnMut(PendingRequest),
    ) -> Result<usize, InvariantError> {
        if resource >= self.classes.len() {
            return Err(InvariantError::UnknownResource {
                resource,
                classes: self.classes.len(),
            });
        }

        let passes = self.classes[resource].waiting.len();
        let mut granted_count = 0;

        for _ in 0..passes {
            let class = &mut self.classes[resource];
            let Some(request) = class.waiting.pop_front() else {
                break;
            };
            if request.quantity == 0 {
                return Err(InvariantError::ZeroQuantityQueued { pid: request.pid });
            }

            if request.quantity <= class.available {
                class.available -= request.quantity;
                class.allocations[request.pid] += request.quantity;
                self.pending[request.pid] = None;
                granted_count += 1;
                granted(request);
            } else {
                let handle = class.waiting.push_back(request);
                self.pending[request.pid] = Some((resource, handle));
            }
        }

        Ok(granted_count)
    }

    /// Validate the conservation invariant for every class
    ///
    /// # Errors
    ///
    /// Returns the first violation found; callers treat it as fatal.
    pub fn validate(&self) -> Result<(), InvariantError> {
        for (resource, class) in self.classes.iter().enumerate() {
            if class.available > class.instances {
                return Err(InvariantError::OverCapacity {
                    resource,
                    available: class.available,
                    instances: class.instances,
                });
            }
            let allocated: u32 = class.allocations.iter().sum();
            if class.available + allocated != class.instances {
                return Err(InvariantError::ConservationViolated {
                    resource,
                    available: class.available,
                    allocated,
                    instances: class.instances,
                });
            }
        }
        Ok(())
    }

    fn check_ids(&self, pid: usize, resource: usize) -> Result<(), InvariantError> {
        if resource >= self.classes.len() {
            return Err(InvariantError::UnknownResource {
                resource,
                classes: self.classes.len(),
            });
        }
        if pid >= self.max_running {
            return Err(InvariantError::UnknownPid {
                pid,
                max_running: self.max_running,
            });
        }
        Ok(())
    }
}
