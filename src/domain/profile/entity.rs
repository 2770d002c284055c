//! Profile record entity and submission types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Profile identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw form submission for the confirm step
///
/// Everything arrives as submitted; `confirm_password` exists only to be
/// compared against `password` and is never persisted. `birthdate` is
/// optional so the required-field rule can report its absence.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kana: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ProfileSubmission {
    /// Convert a validated submission into a draft.
    ///
    /// Returns `None` when the birthdate is absent; callers run the field
    /// rules first, which report that case.
    pub fn into_draft(self) -> Option<ProfileDraft> {
        let birthdate = self.birthdate?;

        Some(ProfileDraft {
            name: self.name,
            kana: self.kana,
            gender: self.gender,
            birthdate,
            phone_number: self.phone_number,
            email: self.email,
            login_id: self.login_id,
            password: self.password,
        })
    }
}

/// A validated, unpersisted profile awaiting the save step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub kana: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub login_id: String,
    /// Becomes the linked account's credential on save; never serialized
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// Update payload for the edit step, keyed by primary key
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub id: ProfileId,
    pub name: String,
    pub kana: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub login_id: String,
    /// When present, re-keys the linked account's credential
    #[serde(default)]
    pub password: Option<String>,
}

/// Stored profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    id: ProfileId,
    name: String,
    kana: String,
    gender: String,
    birthdate: NaiveDate,
    phone_number: String,
    email: String,
    login_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Restore a record from stored column values
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ProfileId,
        name: String,
        kana: String,
        gender: String,
        birthdate: NaiveDate,
        phone_number: String,
        email: String,
        login_id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            kana,
            gender,
            birthdate,
            phone_number,
            email,
            login_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kana(&self) -> &str {
        &self.kana
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
