//! FIFO wait queue of pending requests
//!
//! A slab plus free-list holding doubly-linked nodes, addressed by stable
//! handles. `push_back`, `pop_front`, and `remove` are all O(1); removal by
//! handle is what lets a terminating process's queued request be discarded
//! without scanning. Removing a handle that is not currently linked is a
//! fatal invariant violation.

use ossim_errors::InvariantError;

/// A request that could not be granted immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    /// Logical pid of the requesting worker
    pub pid: usize,
    /// Resource class the request is queued on
    pub resource: usize,
    /// Instances requested, always > 0
    pub quantity: u32,
}

/// Stable handle to a queued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueHandle(usize);

impl QueueHandle {
    /// Raw slab index, for diagnostics
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Occupied {
        request: PendingRequest,
        prev: Option<usize>,
        next: Option<usize>,
    },
    Free {
        next_free: Option<usize>,
    },
}

/// Slab-backed doubly-linked FIFO
#[derive(Debug, Clone, Default)]
pub struct WaitQueue {
    entries: Vec<Entry>,
    free_head: Option<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl WaitQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a request at the back, returning its handle
    pub fn push_back(&mut self, request: PendingRequest) -> QueueHandle {
        let index = match self.free_head.take() {
            Some(index) => {
                self.free_head = match self.entries[index] {
                    Entry::Free { next_free } => next_free,
                    Entry::Occupied { .. } => None,
                };
                index
            }
            None => {
                self.entries.push(Entry::Free { next_free: None });
                self.entries.len() - 1
            }
        };

        self.entries[index] = Entry::Occupied {
            request,
            prev: self.tail,
            next: None,
        };

        match self.tail {
            Some(tail) => {
                if let Entry::Occupied { next, .. } = &mut self.entries[tail] {
                    *next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        QueueHandle(index)
    }

    /// Remove and return the front request
    pub fn pop_front(&mut self) -> Option<PendingRequest> {
        let head = self.head?;
        // Unwrap is safe: head always points at an occupied entry
        match self.unlink(head) {
            Ok(request) => Some(request),
            Err(_) => None,
        }
    }

    /// The front request, without removing it
    #[must_use]
    pub fn front(&self) -> Option<&PendingRequest> {
        let head = self.head?;
        match &self.entries[head] {
            Entry::Occupied { request, .. } => Some(request),
            Entry::Free { .. } => None,
        }
    }

    /// Unlink an arbitrary request by handle
    ///
    /// # Errors
    ///
    /// Returns `InvariantError::NotQueued` if the handle is stale or was
    /// never linked here.
    pub fn remove(&mut self, handle: QueueHandle) -> Result<PendingRequest, InvariantError> {
        if handle.0 >= self.entries.len() {
            return Err(InvariantError::NotQueued { handle: handle.0 });
        }
        self.unlink(handle.0)
    }

    /// Iterate requests front to back
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        Iter {
            queue: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, index: usize) -> Result<PendingRequest, InvariantError> {
        let (request, prev, next) = match &self.entries[index] {
            Entry::Occupied {
                request,
                prev,
                next,
            } => (*request, *prev, *next),
            Entry::Free { .. } => return Err(InvariantError::NotQueued { handle: index }),
        };

        match prev {
            Some(prev) => {
                if let Entry::Occupied { next: n, .. } = &mut self.entries[prev] {
                    *n = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next) => {
                if let Entry::Occupied { prev: p, .. } = &mut self.entries[next] {
                    *p = prev;
                }
            }
            None => self.tail = prev,
        }

        self.entries[index] = Entry::Free {
            next_free: self.free_head,
        };
        self.free_head = Some(index);
        self.len -= 1;

        Ok(request)
    }
}

struct Iter<'a> {
    queue: &'a WaitQueue,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PendingRequest;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        match &self.queue.entries[index] {
            Entry::Occupied { request, next, .. } => {
                self.cursor = *next;
                Some(request)
            }
            Entry::Free { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pid: usize, quantity: u32) -> PendingRequest {
        PendingRequest {
            pid,
            resource: 0,
            quantity,
        }
    }

    #[test]
    fn fifo_order() {
        let mut queue = WaitQueue::new();
        queue.push_back(request(0, 1));
        queue.push_back(request(1, 2));
        queue.push_back(request(2, 3));

        assert_eq!(queue.pop_front().unwrap().pid, 0);
        assert_eq!(queue.pop_front().unwrap().pid, 1);
        assert_eq!(queue.pop_front().unwrap().pid, 2);
        assert!(queue.pop_front().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_middle_preserves_links() {
        let mut queue = WaitQueue::new();
        queue.push_back(request(0, 1));
        let middle = queue.push_back(request(1, 1));
        queue.push_back(request(2, 1));

        let removed = queue.remove(middle).unwrap();
        assert_eq!(removed.pid, 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front().unwrap().pid, 0);
        assert_eq!(queue.pop_front().unwrap().pid, 2);
    }

    #[test]
    fn remove_head_and_tail() {
        let mut queue = WaitQueue::new();
        let head = queue.push_back(request(0, 1));
        queue.push_back(request(1, 1));
        let tail = queue.push_back(request(2, 1));

        queue.remove(head).unwrap();
        queue.remove(tail).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.front().unwrap().pid, 1);
    }

    #[test]
    fn stale_handle_is_fatal() {
        let mut queue = WaitQueue::new();
        let handle = queue.push_back(request(0, 1));
        queue.pop_front();
        assert!(matches!(
            queue.remove(handle),
            Err(InvariantError::NotQueued { .. })
        ));
    }

    #[test]
    fn slots_are_recycled() {
        let mut queue = WaitQueue::new();
        let first = queue.push_back(request(0, 1));
        queue.pop_front();
        let second = queue.push_back(request(1, 1));
        // Freed slab slot is reused
        assert_eq!(first.index(), second.index());
    }

    #[test]
    fn rotation_preserves_relative_order() {
        let mut queue = WaitQueue::new();
        queue.push_back(request(0, 1));
        queue.push_back(request(1, 1));
        queue.push_back(request(2, 1));

        // Rotate the front entry to the back
        let front = queue.pop_front().unwrap();
        queue.push_back(front);

        let order: Vec<usize> = queue.iter().map(|r| r.pid).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn iter_walks_front_to_back() {
        let mut queue = WaitQueue::new();
        queue.push_back(request(4, 9));
        queue.push_back(request(7, 2));
        let quantities: Vec<u32> = queue.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![9, 2]);
    }
}
