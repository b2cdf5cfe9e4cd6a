//! Messaging backend collaborator contracts.
//!
//! The coded-message bridge never talks to a chat network directly. It looks
//! contacts up through [`ContactDirectory`] and uploads media or fires nudges
//! through [`MediaUpload`] and [`Interactions`]. A host application implements
//! these for its network; [`memory::MemoryBackend`] is an in-process
//! implementation for tests and offline rendering.

pub mod contact;
pub mod error;
pub mod memory;
pub mod traits;

pub use {
    contact::{Contact, ContactKind, MediaHandle, Member, Profile},
    error::{Error, Result},
    traits::{Backend, ContactDirectory, Interactions, MediaUpload},
};
