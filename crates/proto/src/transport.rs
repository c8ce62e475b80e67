//! Channel transport between workers and the coordinator
//!
//! One shared inbound channel fans worker payloads into the coordinator;
//! the sender's logical pid travels in the envelope and plays the
//! correlation-tag role. Replies go over a dedicated channel per worker,
//! so a worker blocked on `recv` can only ever see its own replies.

use crate::Reply;
use tokio::sync::mpsc;

/// A worker payload tagged with its sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Logical pid of the sending worker
    pub pid: usize,
    /// Wire-encoded message, decoded by `WireCodec`
    pub payload: i64,
}

/// Sender half of the shared worker-to-coordinator channel
pub type RequestSender = mpsc::UnboundedSender<Envelope>;

/// Receiver half of the shared worker-to-coordinator channel
pub type RequestReceiver = mpsc::UnboundedReceiver<Envelope>;

/// Sender half of one worker's reply channel
pub type ReplySender = mpsc::UnboundedSender<Reply>;

/// Receiver half of one worker's reply channel
pub type ReplyReceiver = mpsc::UnboundedReceiver<Reply>;

/// Create the shared inbound channel
#[must_use]
pub fn request_channel() -> (RequestSender, RequestReceiver) {
    mpsc::unbounded_channel()
}

/// Create a per-worker reply channel
#[must_use]
pub fn reply_channel() -> (ReplySender, ReplyReceiver) {
    mpsc::unbounded_channel()
}
