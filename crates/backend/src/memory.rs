//! In-process backend holding contacts in memory and recording every upload
//! and nudge it receives.

use std::{
    collections::HashMap,
    sync::{
        RwLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use {async_trait::async_trait, tracing::debug};

use crate::{
    Error, Result,
    contact::{Contact, ContactKind, MediaHandle, Member, Profile},
    traits::{ContactDirectory, Interactions, MediaUpload},
};

/// Which upload primitive was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Audio,
}

/// One recorded upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub kind: UploadKind,
    pub contact: Contact,
    pub size: usize,
    pub handle: MediaHandle,
}

#[derive(Default)]
struct Directory {
    members: HashMap<(i64, i64), Member>,
    profiles: HashMap<(ContactKind, i64), Profile>,
}

/// In-memory [`Backend`](crate::Backend).
///
/// Audio uploads follow the usual network restriction and are only accepted
/// for group conversations.
#[derive(Default)]
pub struct MemoryBackend {
    directory: RwLock<Directory>,
    uploads: RwLock<Vec<Upload>>,
    nudges: RwLock<Vec<(Contact, i64)>>,
    next_upload: AtomicU64,
    fail_uploads: AtomicBool,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group member (and the group's own profile if unknown).
    pub fn add_member(&self, group_id: i64, member_id: i64, name: impl Into<String>) {
        let mut dir = self.directory.write().unwrap_or_else(|e| e.into_inner());
        dir.members.insert((group_id, member_id), Member {
            group_id,
            id: member_id,
            name: name.into(),
        });
        dir.profiles
            .entry((ContactKind::Group, group_id))
            .or_insert_with(|| Profile {
                kind: ContactKind::Group,
                id: group_id,
                name: group_id.to_string(),
            });
    }

    pub fn add_profile(&self, kind: ContactKind, id: i64, name: impl Into<String>) {
        let mut dir = self.directory.write().unwrap_or_else(|e| e.into_inner());
        dir.profiles.insert((kind, id), Profile {
            kind,
            id,
            name: name.into(),
        });
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn nudges(&self) -> Vec<(Contact, i64)> {
        self.nudges.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record_upload(&self, kind: UploadKind, contact: &Contact, size: usize) -> Result<MediaHandle> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::unsupported("uploads disabled"));
        }
        let n = self.next_upload.fetch_add(1, Ordering::SeqCst);
        let id = match kind {
            UploadKind::Image => format!("upload-{n}.image"),
            UploadKind::Audio => format!("upload-{n}.audio"),
        };
        let handle = MediaHandle::new(&id, Some(format!("memory://media/{id}")));
        debug!(id, size, "recorded upload");
        self.uploads
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Upload {
                kind,
                contact: *contact,
                size,
                handle: handle.clone(),
            });
        Ok(handle)
    }
}

#[async_trait]
impl ContactDirectory for MemoryBackend {
    async fn member(&self, group_id: i64, member_id: i64) -> Option<Member> {
        let dir = self.directory.read().unwrap_or_else(|e| e.into_inner());
        dir.members.get(&(group_id, member_id)).cloned()
    }

    async fn profile(&self, kind: ContactKind, id: i64) -> Option<Profile> {
        let dir = self.directory.read().unwrap_or_else(|e| e.into_inner());
        dir.profiles.get(&(kind, id)).cloned()
    }
}

#[async_trait]
impl MediaUpload for MemoryBackend {
    async fn upload_image(&self, contact: &Contact, data: Vec<u8>) -> Result<MediaHandle> {
        self.record_upload(UploadKind::Image, contact, data.len())
    }

    async fn upload_audio(&self, contact: &Contact, data: Vec<u8>) -> Result<MediaHandle> {
        if contact.group_id().is_none() {
            return Err(Error::unsupported("audio can only be sent to groups"));
        }
        self.record_upload(UploadKind::Audio, contact, data.len())
    }
}

#[async_trait]
impl Interactions for MemoryBackend {
    async fn nudge(&self, contact: &Contact, target: i64) -> Result<()> {
        let known = match contact {
            Contact::Group(group_id) => self.member(*group_id, target).await.is_some(),
            Contact::Friend(_) => self.profile(ContactKind::User, target).await.is_some(),
        };
        if !known {
            return Err(Error::unknown_contact(target));
        }
        self.nudges
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((*contact, target));
        Ok(())
    }
}
