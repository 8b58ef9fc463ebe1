use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("name must not be empty")]
    NameEmpty,
    #[error("email must not be empty")]
    EmailEmpty,
    #[error("email must look like local@domain.tld")]
    EmailFormat,
    #[error("phone must not be empty")]
    PhoneEmpty,
}

/// Pre-flight rejection of a record draft. Never reaches the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("invalid record fields: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn contains(&self, error: FieldError) -> bool {
        self.errors.contains(&error)
    }
}
