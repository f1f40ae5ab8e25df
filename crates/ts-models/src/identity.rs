//! Approver candidate identity

use serde::{Deserialize, Serialize};
use ts_core::{Email, Entity, Id, Identifiable};

/// A person who may be selected as an approver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Id,
    pub name: String,
    pub email: Email,
}

impl Identifiable for Identity {
    fn id(&self) -> Option<Id> {
        Some(self.id)
    }
}

impl Entity for Identity {
    const TYPE_NAME: &'static str = "Identity";
}

impl Identity {
    pub fn new(id: Id, name: impl Into<String>, email: Email) -> Self {
        Self {
            id,
            name: name.into(),
            email,
        }
    }
}
