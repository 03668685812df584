//! crates/dashboard_core/src/domain.rs
//!
//! Defines the pure, core data structures for the dashboard client.
//! The serde attributes describe the JSON shapes the remote API and the
//! durable session storage use; nothing here performs any I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Role
//=========================================================================================

/// The role attached to a user account. Decides which dashboard
/// capabilities are available (see `capability`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Viewer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Viewer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Viewer" => Ok(Role::Viewer),
            other => Err(UnknownVariant::role(other)),
        }
    }
}

//=========================================================================================
// Country
//=========================================================================================

/// The fixed set of country preferences a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    US,
    UK,
    CA,
    AU,
}

impl Country {
    /// Every country, in the order the selector lists them.
    pub const ALL: [Country; 4] = [Country::US, Country::UK, Country::CA, Country::AU];

    pub fn code(&self) -> &'static str {
        match self {
            Country::US => "US",
            Country::UK => "UK",
            Country::CA => "CA",
            Country::AU => "AU",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::US => "United States",
            Country::UK => "United Kingdom",
            Country::CA => "Canada",
            Country::AU => "Australia",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::country(s))
    }
}

/// Returned when a role or country string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn role(value: &str) -> Self {
        Self { kind: "role", value: value.to_string() }
    }

    fn country(value: &str) -> Self {
        Self { kind: "country", value: value.to_string() }
    }
}

/// Accepts a missing, null or empty country as "no preference".
fn optional_country<'de, D>(deserializer: D) -> Result<Option<Country>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => code.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

//=========================================================================================
// User
//=========================================================================================

/// Represents the authenticated user as returned by the API.
///
/// The object is only ever replaced wholesale after login or a country
/// update. Fields this client does not know about are kept in `extra` so a
/// user written to durable storage reloads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of a user. Servers may send `id`, `_id` or both.
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default, deserialize_with = "optional_country")]
    country: Option<Country>,
    role: Role,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<UserRecord> for User {
    type Error = MissingId;

    fn try_from(raw: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            id: raw.id.or(raw.mongo_id).ok_or(MissingId("user"))?,
            username: raw.username,
            email: raw.email,
            country: raw.country,
            role: raw.role,
            extra: raw.extra,
        })
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

//=========================================================================================
// Session
//=========================================================================================

/// The client's authentication state.
///
/// A token never exists without its user and vice versa.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { token: String, user: User },
}

impl Session {
    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Session::Authenticated { token: token.into(), user }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The selected country of the signed-in user, if any.
    pub fn country(&self) -> Option<Country> {
        self.user().and_then(|u| u.country)
    }
}

//=========================================================================================
// Item
//=========================================================================================

/// Reference to the user who created an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub username: String,
}

/// A single entry of the dashboard's item collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ItemRecord")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_by: Option<Creator>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    created_by: Option<Creator>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemRecord> for Item {
    type Error = MissingId;

    fn try_from(raw: ItemRecord) -> Result<Self, Self::Error> {
        Ok(Item {
            id: raw.mongo_id.or(raw.id).ok_or(MissingId("item"))?,
            name: raw.name,
            created_by: raw.created_by,
            created_at: raw.created_at,
        })
    }
}

/// Returned when a user or item record carries neither `_id` nor `id`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} record has no `_id` or `id`")]
pub struct MissingId(&'static str);
