// crates/db/src/queries/mod.rs
pub mod commitments;
mod enums;
pub mod people;
pub mod projects;
pub mod retrieval;
pub mod sessions;
pub mod skills;
pub mod sprints;
pub mod tasks;
pub mod turns;
