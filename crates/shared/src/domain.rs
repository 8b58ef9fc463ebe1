use serde::{Deserialize, Serialize};

use crate::error::{FieldError, ValidationError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(RecordId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Field payload for create and update. Identity is assigned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl RecordDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Checks all fields and reports every failure at once, so a form layer
    /// can show the full list instead of the first hit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::NameEmpty);
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError::EmailEmpty);
        } else if !email_shape_ok(&self.email) {
            errors.push(FieldError::EmailFormat);
        }
        if self.phone.trim().is_empty() {
            errors.push(FieldError::PhoneEmpty);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

// One '@', a non-empty local part, at least one '.' in the domain, no
// whitespace anywhere. Deliberately not a full RFC 5322 check.
fn email_shape_ok(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.')
        }
        None => false,
    }
}
