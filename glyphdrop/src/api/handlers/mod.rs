pub mod convert;
pub mod health;
pub mod upload;

pub use health::health_check;
