//! Background workers owned by the runtime.
mod sequencer;

pub use sequencer::{Request, SequencerParts, SequencerWorker};
