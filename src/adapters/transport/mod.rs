//! Transport adapters that do not talk to a chat network.

mod recording;

pub use recording::{RecordingTransport, Sent};
