//! The refresh cycle's building blocks: where a summary comes from, how it is
//! rendered, and where the rendered message ends up.

pub mod board;
pub mod presenter;
pub mod source;

pub use board::{BoardSession, MessageTransport, StatusBoard, UpsertOutcome};
pub use presenter::StatusPresenter;
pub use source::{StatusSource, StatuspageSource};
