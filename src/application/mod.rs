pub mod compare;
pub mod engine;
pub mod extract;
pub mod monitoring;
pub mod projection;
pub mod record_diff;
pub mod sequence;
pub mod snapshot;
