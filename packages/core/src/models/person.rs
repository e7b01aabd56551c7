//! Person Records
//!
//! This module defines `PersonRecord`, the only persisted entity of a family
//! tree, together with the draft and patch types used to create and edit it.
//!
//! # Architecture
//!
//! - **Flat records**: relationships are plain ids (`parent_id`, `partner_id`),
//!   never owned pointers
//! - **Single lineage edge**: a record points at one parent; the other parent
//!   of a child is reached through the first parent's partner
//! - **Opaque metadata**: notes, pictures and profile links are carried through
//!   unmodified
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::models::{PersonId, PersonRecord};
//!
//! let grandfather = PersonRecord::new(PersonId(1), "Grandfather").with_partner(PersonId(2));
//! let father = PersonRecord::new(PersonId(3), "Father").with_parent(PersonId(1));
//!
//! assert!(grandfather.validate().is_ok());
//! assert_eq!(father.parent_id, Some(PersonId(1)));
//! ```

use crate::models::date::parse_date;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for person records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Death date {death} is before birth date {birth}")]
    DeathBeforeBirth { birth: String, death: String },

    #[error("Person {id} cannot reference itself as {field}")]
    SelfReference { id: PersonId, field: &'static str },
}

/// Opaque, stable identity of a person record
///
/// Serialized as a bare integer so stored collections stay plain JSON arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl PersonId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Lenient parse used for imported data: unknown or blank values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Accepts `null`, a known gender, or any other string (blank form values,
/// legacy spellings) which is read as "not set".
fn deserialize_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Gender::parse))
}

/// One person's stored attributes and relationship ids.
///
/// # Fields
///
/// - `id`: Unique identifier, assigned once by the mutation engine
/// - `name`: Display name (never empty after a successful add/update)
/// - `birth_date` / `death_date` / `anniversary_date`: `YYYY-MM-DD` strings,
///   kept verbatim so malformed imports survive a round trip
/// - `parent_id`: The single modeled lineage edge
/// - `partner_id`: Intended to be symmetric, tolerated when it is not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: PersonId,

    pub name: String,

    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub birth_date: Option<String>,

    #[serde(default)]
    pub death_date: Option<String>,

    #[serde(default)]
    pub anniversary_date: Option<String>,

    #[serde(default)]
    pub parent_id: Option<PersonId>,

    #[serde(default)]
    pub partner_id: Option<PersonId>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Opaque picture handle (URL or data URI)
    #[serde(default)]
    pub profile_picture: Option<String>,

    #[serde(default)]
    pub facebook_url: Option<String>,
}

impl PersonRecord {
    /// Create a record with only an id and a name
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: None,
            birth_date: None,
            death_date: None,
            anniversary_date: None,
            parent_id: None,
            partner_id: None,
            notes: None,
            profile_picture: None,
            facebook_url: None,
        }
    }

    pub fn with_parent(mut self, parent_id: PersonId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_partner(mut self, partner_id: PersonId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    pub fn with_death_date(mut self, date: impl Into<String>) -> Self {
        self.death_date = Some(date.into());
        self
    }

    pub fn with_anniversary_date(mut self, date: impl Into<String>) -> Self {
        self.anniversary_date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate the fields checked on every add and update
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `name` is empty or whitespace
    /// - both dates parse and the death date precedes the birth date
    /// - the record names itself as parent or partner
    ///
    /// Dates that do not parse are not rejected here; the aggregator skips them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use familytree_core::models::{PersonId, PersonRecord, ValidationError};
    /// let person = PersonRecord::new(PersonId(1), "Ada")
    ///     .with_birth_date("1990-05-01")
    ///     .with_death_date("1980-01-01");
    /// assert!(matches!(person.validate(), Err(ValidationError::DeathBeforeBirth { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if let (Some(birth), Some(death)) = (&self.birth_date, &self.death_date) {
            if let (Some(b), Some(d)) = (parse_date(birth), parse_date(death)) {
                if d < b {
                    return Err(ValidationError::DeathBeforeBirth {
                        birth: birth.clone(),
                        death: death.clone(),
                    });
                }
            }
        }

        if self.parent_id == Some(self.id) {
            return Err(ValidationError::SelfReference {
                id: self.id,
                field: "parent",
            });
        }

        if self.partner_id == Some(self.id) {
            return Err(ValidationError::SelfReference {
                id: self.id,
                field: "partner",
            });
        }

        Ok(())
    }
}

/// Blank form values are stored as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fields for a record that does not exist yet.
///
/// The caller resolves how the new person relates to the tree (see
/// [`crate::operations::Relation`]) and passes the resulting `parent_id` and
/// `partner_id`; the id itself is assigned by the mutation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDraft {
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub birth_date: Option<String>,

    #[serde(default)]
    pub death_date: Option<String>,

    #[serde(default)]
    pub anniversary_date: Option<String>,

    #[serde(default)]
    pub parent_id: Option<PersonId>,

    #[serde(default)]
    pub partner_id: Option<PersonId>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub profile_picture: Option<String>,

    #[serde(default)]
    pub facebook_url: Option<String>,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: PersonId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_partner(mut self, partner_id: PersonId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    pub fn with_death_date(mut self, date: impl Into<String>) -> Self {
        self.death_date = Some(date.into());
        self
    }

    pub fn with_anniversary_date(mut self, date: impl Into<String>) -> Self {
        self.anniversary_date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Materialize the draft under an allocated id
    pub fn into_record(self, id: PersonId) -> PersonRecord {
        PersonRecord {
            id,
            name: self.name,
            gender: self.gender,
            birth_date: non_blank(self.birth_date),
            death_date: non_blank(self.death_date),
            anniversary_date: non_blank(self.anniversary_date),
            parent_id: self.parent_id,
            partner_id: self.partner_id,
            notes: self.notes,
            profile_picture: self.profile_picture,
            facebook_url: non_blank(self.facebook_url),
        }
    }
}

/// Custom deserializer for optional fields that accepts both plain values and `null`
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (clear)
/// - "value" → Some(Some("value")) (set)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

fn deserialize_optional_gender<'de, D>(deserializer: D) -> Result<Option<Option<Gender>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(deserialize_gender(deserializer)?))
}

/// Partial record update
///
/// Relationship fields are not patchable: lineage changes go through
/// move/add-parent, partner changes through add.
///
/// # Double-Option Pattern for Nullable Fields
///
/// - `None`: Don't change this field
/// - `Some(None)`: Clear the field
/// - `Some(Some(value))`: Set the field
///
/// # Examples
///
/// ```rust
/// # use familytree_core::models::PersonPatch;
/// // Rename and clear the death date
/// let patch = PersonPatch {
///     name: Some("Grandpa Joe".to_string()),
///     death_date: Some(None),
///     ..Default::default()
/// };
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_gender"
    )]
    pub gender: Option<Option<Gender>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub birth_date: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub death_date: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub anniversary_date: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub notes: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub profile_picture: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub facebook_url: Option<Option<String>>,
}

impl PersonPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_birth_date(mut self, date: Option<String>) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_death_date(mut self, date: Option<String>) -> Self {
        self.death_date = Some(date);
        self
    }

    pub fn with_anniversary_date(mut self, date: Option<String>) -> Self {
        self.anniversary_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Check if the patch contains any changes
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.birth_date.is_none()
            && self.death_date.is_none()
            && self.anniversary_date.is_none()
            && self.notes.is_none()
            && self.profile_picture.is_none()
            && self.facebook_url.is_none()
    }

    /// Write the patch onto a record copy; blank date strings clear the field
    pub fn apply_to(&self, record: &mut PersonRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(gender) = self.gender {
            record.gender = gender;
        }
        if let Some(date) = &self.birth_date {
            record.birth_date = non_blank(date.clone());
        }
        if let Some(date) = &self.death_date {
            record.death_date = non_blank(date.clone());
        }
        if let Some(date) = &self.anniversary_date {
            record.anniversary_date = non_blank(date.clone());
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        if let Some(picture) = &self.profile_picture {
            record.profile_picture = picture.clone();
        }
        if let Some(url) = &self.facebook_url {
            record.facebook_url = non_blank(url.clone());
        }
    }
}
