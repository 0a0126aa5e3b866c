//! Data shapes shared between the checklist server and its clients.

pub mod lenient;
pub mod model;
pub mod requests;
pub mod responses;
