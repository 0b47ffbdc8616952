pub mod admin;
pub mod audit;
pub mod auth;
pub mod cases;
pub mod questions;
