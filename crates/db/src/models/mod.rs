//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` create/update DTOs for writes
//! - Joined listing rows and query parameter structs where the entity is listed

pub mod audit;
pub mod case;
pub mod question;
pub mod revision;
pub mod user;
