//! `lossdesk-directory` — immutable reference data: managers and restaurants.

pub mod record;

pub use record::{Manager, Restaurant};
