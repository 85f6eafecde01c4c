use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";

/// A single access token granted to a user on a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "room:write")]
    Write,
    #[serde(rename = "room:read")]
    Read,
    #[serde(rename = "room:presence:write")]
    PresenceWrite,
}

pub type AccessSet = BTreeSet<Permission>;

/// Email of a user mapped to the permissions they hold on a room.
pub type AccessMap = BTreeMap<String, AccessSet>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Editor,
    Viewer,
}

impl UserType {
    pub fn permissions(self) -> AccessSet {
        match self {
            UserType::Editor => [Permission::Write].into(),
            UserType::Viewer => [Permission::Read, Permission::PresenceWrite].into(),
        }
    }

    /// Classifies a user from their entry in an access map. A missing entry is
    /// a viewer since rooms are created private.
    pub fn from_accesses(accesses: &AccessMap, email: &str) -> Self {
        match accesses.get(email) {
            Some(set) if set.contains(&Permission::Write) => UserType::Editor,
            _ => UserType::Viewer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMetadata {
    pub creator_id: String,
    pub email: String,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub metadata: RoomMetadata,
    #[serde(default)]
    pub users_accesses: AccessMap,
    #[serde(default)]
    pub default_accesses: Vec<Permission>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_connection_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn is_private(&self) -> bool {
        self.default_accesses.is_empty()
    }

    pub fn user_type(&self, email: &str) -> UserType {
        UserType::from_accesses(&self.users_accesses, email)
    }

    pub fn is_accessible_by(&self, email: &str) -> bool {
        self.metadata.email == email
            || self.users_accesses.contains_key(email)
            || !self.default_accesses.is_empty()
    }

    /// Emails of everyone listed in the access map, creator first.
    pub fn collaborators(&self) -> Vec<String> {
        let mut emails: Vec<String> = self.users_accesses.keys().cloned().collect();
        emails.sort_by_key(|email| *email != self.metadata.email);
        emails
    }
}
