//! Handler modules for Lambda function

pub mod catalog;
pub mod payments;
pub mod public_config;

// Re-export handler functions for convenience
pub use catalog::handle_get_catalog;
pub use payments::handle_create_payment;
pub use public_config::handle_get_config;
