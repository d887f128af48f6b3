//! Data models for the birthday board application.
//!
//! Wire types use camelCase to match the frontend contract.

mod birthday;
mod user;

pub use birthday::*;
pub use user::*;
