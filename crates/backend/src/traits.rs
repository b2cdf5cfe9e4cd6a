use async_trait::async_trait;

use crate::{
    Result,
    contact::{Contact, ContactKind, MediaHandle, Member, Profile},
};

/// Look up contacts by numeric ID.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// A member of `group_id`, if the bot can see it.
    async fn member(&self, group_id: i64, member_id: i64) -> Option<Member>;

    /// Public profile of a user or group, used for contact cards.
    async fn profile(&self, kind: ContactKind, id: i64) -> Option<Profile>;
}

/// Upload raw media so it can be referenced from a message.
///
/// Any error is treated by callers as "media unobtainable".
#[async_trait]
pub trait MediaUpload: Send + Sync {
    async fn upload_image(&self, contact: &Contact, data: Vec<u8>) -> Result<MediaHandle>;
    async fn upload_audio(&self, contact: &Contact, data: Vec<u8>) -> Result<MediaHandle>;
}

/// Side-effecting interactions triggered while decoding a message.
#[async_trait]
pub trait Interactions: Send + Sync {
    /// Nudge `target` inside `contact` (a group member, or a friend when the
    /// conversation is private). Unknown targets fail with
    /// [`Error::UnknownContact`](crate::Error::UnknownContact).
    async fn nudge(&self, contact: &Contact, target: i64) -> Result<()>;
}

/// Everything the bridge needs from a messaging backend.
pub trait Backend: ContactDirectory + MediaUpload + Interactions {}

impl<T> Backend for T where T: ContactDirectory + MediaUpload + Interactions {}
