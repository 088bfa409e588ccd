// crates/types/src/lib.rs
//! Shared data model (§3) for the memory service: every entity the
//! Store persists, plus the wire-ish types (`Signal`, `ContextItem`)
//! that flow between the Classifier, Retriever, and Formatter.
//!
//! Pure types only — no I/O, no database driver imports.

pub mod commitment;
pub mod context;
pub mod job;
pub mod person;
pub mod project;
pub mod session;
pub mod skill;
pub mod sprint;
pub mod task;
pub mod turn;

pub use commitment::*;
pub use context::*;
pub use job::*;
pub use person::*;
pub use project::*;
pub use session::*;
pub use skill::*;
pub use sprint::*;
pub use task::*;
pub use turn::*;

use uuid::Uuid;

/// Opaque identifier shared by every entity in §3.
pub type Id = Uuid;
