//! Route modules for the fuel photo server

pub mod analyze;
pub mod health;
