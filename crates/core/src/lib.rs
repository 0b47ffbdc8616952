//! Domain core for the casebook backend.
//!
//! Pure types and rules shared by the persistence and HTTP layers: ids,
//! roles, case/question/revision enums, the access policy, paging math and
//! search helpers. Nothing in this crate performs I/O.

mod text_enum;

pub mod access;
pub mod audit;
pub mod cases;
pub mod error;
pub mod paging;
pub mod questions;
pub mod roles;
pub mod search;
pub mod types;
