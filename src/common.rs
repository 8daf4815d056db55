pub mod error;
pub mod messages;
pub mod names;
pub mod validation;
