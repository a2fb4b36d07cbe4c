//! Testing utilities
//!
//! In-memory stand-ins for the observability sink and the transport, for
//! asserting on what a dispatcher sent without a relay or a log subscriber.

mod email;

pub use email::{RecordingObserver, RecordingTransport};
