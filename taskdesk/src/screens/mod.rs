//! The three list screens and the mutations reachable from them.

pub mod projects;
pub mod tasks;
pub mod users;
