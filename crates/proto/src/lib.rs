#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Message protocol between workers and the coordinator
//!
//! Workers never touch the resource table; everything they want is said
//! over two channels. A shared inbound channel carries single-integer
//! payloads into the coordinator (drained non-blocking each tick) and a
//! per-worker reply channel carries short acknowledgement tokens back.

pub mod reply;
pub mod transport;
pub mod wire;

pub use reply::Reply;
pub use transport::{
    reply_channel, request_channel, Envelope, ReplyReceiver, ReplySender, RequestReceiver,
    RequestSender,
};
pub use wire::{WireCodec, WorkerMessage};
