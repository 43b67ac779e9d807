//! Person domain model.
//!
//! # Responsibility
//! - Define `PersonCreate`, `PersonUpdate` and `PersonRead` wire shapes.
//! - Provide field validation for write inputs.
//!
//! # Invariants
//! - `PersonRead::person_id` is serialized as `_id` to match stored documents.
//! - `PersonUpdate` never serializes unset fields, so partial updates cannot
//!   overwrite stored values with nulls.
//! - `birth` is a real calendar date written as `YYYY-MM-DD`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a stored person.
pub type PersonId = String;

/// Unix epoch seconds.
pub type Timestamp = i64;

pub const MAX_NAME_CHARS: usize = 100;
const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

static ZIP_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z -]{1,9}$").expect("valid zip code regex"));

/// Validation errors for person write inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    NameTooLong { max_chars: usize, actual_chars: usize },
    EmptyAddressField(&'static str),
    InvalidZipCode(String),
    InvalidBirthDate(String),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "person name cannot be empty"),
            Self::NameTooLong {
                max_chars,
                actual_chars,
            } => write!(
                f,
                "person name has {actual_chars} characters; at most {max_chars} allowed"
            ),
            Self::EmptyAddressField(field) => write!(f, "address field `{field}` cannot be empty"),
            Self::InvalidZipCode(value) => write!(f, "invalid zip code `{value}`"),
            Self::InvalidBirthDate(value) => {
                write!(f, "invalid birth date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for PersonValidationError {}

/// Postal address embedded in a person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
        }
    }

    /// Validates all address fields.
    ///
    /// # Errors
    /// - `EmptyAddressField` when any field is blank.
    /// - `InvalidZipCode` when `zip_code` is not a short alphanumeric code.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        for (field, value) in [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
        ] {
            if value.trim().is_empty() {
                return Err(PersonValidationError::EmptyAddressField(field));
            }
        }

        if !ZIP_CODE_RE.is_match(self.zip_code.trim()) {
            return Err(PersonValidationError::InvalidZipCode(self.zip_code.clone()));
        }

        Ok(())
    }
}

/// Input for creating a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCreate {
    pub name: String,
    pub address: Address,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub birth: String,
}

impl PersonCreate {
    pub fn new(name: impl Into<String>, address: Address, birth: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address,
            birth: birth.into(),
        }
    }

    /// Validates every field of the create input.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)?;
        self.address.validate()?;
        validate_birth(&self.birth)
    }
}

/// Partial update input; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
}

impl PersonUpdate {
    /// Validates only the fields that are set.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(address) = &self.address {
            address.validate()?;
        }
        if let Some(birth) = &self.birth {
            validate_birth(birth)?;
        }
        Ok(())
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.birth.is_none()
    }
}

/// Person as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRead {
    /// Serialized as `_id` to match the stored document key.
    #[serde(rename = "_id")]
    pub person_id: PersonId,
    pub name: String,
    pub address: Address,
    pub birth: String,
    pub created: Timestamp,
    pub updated: Timestamp,
}

fn validate_name(name: &str) -> Result<(), PersonValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PersonValidationError::EmptyName);
    }
    let actual_chars = trimmed.chars().count();
    if actual_chars > MAX_NAME_CHARS {
        return Err(PersonValidationError::NameTooLong {
            max_chars: MAX_NAME_CHARS,
            actual_chars,
        });
    }
    Ok(())
}

fn validate_birth(birth: &str) -> Result<(), PersonValidationError> {
    let invalid = || PersonValidationError::InvalidBirthDate(birth.to_string());
    let date = NaiveDate::parse_from_str(birth, BIRTH_DATE_FORMAT).map_err(|_| invalid())?;

    // chrono accepts unpadded fields and signed years; only the canonical
    // zero-padded form with a year from 1 on is stored.
    if date.year() < 1 || date.format(BIRTH_DATE_FORMAT).to_string() != birth {
        return Err(invalid());
    }

    Ok(())
}
