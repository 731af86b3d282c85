pub mod board;
pub mod form;
pub mod models;
pub mod services;

pub use board::*;
pub use form::*;
pub use models::*;
pub use services::*;
