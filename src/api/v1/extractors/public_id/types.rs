/*
 * Responsibility
 *  - one tag type and alias per resource kind
 *  - no decode logic, no AppState access
 */
use super::core::PublicId;

// everything `pub` here is re-exported from mod.rs

pub enum NoteTag {}
pub type PublicNoteId = PublicId<NoteTag>;

pub enum PostTag {}
pub type PublicPostId = PublicId<PostTag>;

pub enum ContactTag {}
pub type PublicContactId = PublicId<ContactTag>;
