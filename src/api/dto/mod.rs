//! Data Transfer Objects for REST request/response serialization.
//!
//! Enum-like fields (gender, size, status, outcome) travel as lowercase
//! strings and are parsed back into domain types at the handler boundary.

pub mod common_dto;
pub mod dog_dto;
pub mod match_dto;

pub use common_dto::*;
pub use dog_dto::*;
pub use match_dto::*;
