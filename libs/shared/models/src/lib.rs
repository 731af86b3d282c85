pub mod envelope;
pub mod error;
pub mod params;
pub mod refs;
