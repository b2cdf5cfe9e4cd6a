use serde::{Deserialize, Serialize};

/// The conversation a message is being built for.
///
/// Mentions only make sense inside a group; nudges and uploads are scoped to
/// whichever conversation the message will be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Contact {
    Group(i64),
    Friend(i64),
}

impl Contact {
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Group(id) | Self::Friend(id) => *id,
        }
    }

    #[must_use]
    pub fn group_id(&self) -> Option<i64> {
        match self {
            Self::Group(id) => Some(*id),
            Self::Friend(_) => None,
        }
    }
}

/// Kind of entity a contact card points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    User,
    Group,
}

impl ContactKind {
    /// Attribute value used by the coded form (`type=qq` / `type=group`).
    #[must_use]
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::User => "qq",
            Self::Group => "group",
        }
    }
}

/// A member of a group, as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub group_id: i64,
    pub id: i64,
    pub name: String,
}

/// Public profile of a user or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub kind: ContactKind,
    pub id: i64,
    pub name: String,
}

/// Opaque handle to media the backend already holds.
///
/// `id` is what the coded form carries in `file=`; `url` is a download link
/// when the backend exposes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHandle {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MediaHandle {
    #[must_use]
    pub fn new(id: impl Into<String>, url: Option<String>) -> Self {
        Self {
            id: id.into(),
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_group_id() {
        assert_eq!(Contact::Group(10).group_id(), Some(10));
        assert_eq!(Contact::Friend(10).group_id(), None);
        assert_eq!(Contact::Friend(42).id(), 42);
    }

    #[test]
    fn contact_kind_codes() {
        assert_eq!(ContactKind::User.as_code(), "qq");
        assert_eq!(ContactKind::Group.as_code(), "group");
    }
}
