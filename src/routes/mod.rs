//! API routes

pub mod form_schema;
pub mod health;
pub mod submissions;
