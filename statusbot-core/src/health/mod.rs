pub mod liveness;

pub use liveness::{start_liveness_server, LivenessServer};
