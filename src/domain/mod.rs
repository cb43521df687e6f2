pub mod delta;
pub mod error;
pub mod fingerprint;
pub mod object_type;
pub mod ports;
pub mod record;
pub mod report;
pub mod value_objects;
