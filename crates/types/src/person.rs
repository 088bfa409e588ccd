// crates/types/src/person.rs
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub relationship: String,
    pub organization: Option<String>,
}
