//! Hierarchical activity identifiers.
//!
//! # Grammar
//! ```text
//! |a000b421-5d18-4ab6-9e3c-1f2d3c4b5a69.            root, created in this process
//! |a000b421-5d18-4ab6-9e3c-1f2d3c4b5a69.1.          child started in the same process
//! |a000b421-5d18-4ab6-9e3c-1f2d3c4b5a69.1.8e2d4c28_ child started in another process
//! ```
//!
//! A trailing `.` marks an in-process hop, a trailing `_` marks a process
//! boundary. The root id is the token between the leading `|` and the first `.`.

use std::fmt;
use uuid::Uuid;

/// Identifier of one traced operation.
///
/// The sequence counter belongs to this instance alone. Children are derived
/// through `&mut self`, so two owners can never hand out the same suffix
/// unless the value was explicitly cloned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityId {
    id: String,
    parent_id: String,
    sequence: u64,
}

impl ActivityId {
    /// Create a fresh root id (`|<uuid>.`) with no parent.
    pub fn root() -> Self {
        Self {
            id: format!("|{}.", Uuid::new_v4()),
            parent_id: String::new(),
            sequence: 0,
        }
    }

    /// Derive an id from an inbound `Request-Id` header value.
    ///
    /// An empty value yields a fresh root. Anything else is treated as the
    /// parent id of a cross-process child. The header value is sanitized on
    /// a copy only; `parent_id` keeps the value exactly as received.
    pub fn from_header(value: &str) -> Self {
        if value.is_empty() {
            return Self::root();
        }

        let mut id = sanitize_parent(value);
        id.push_str(&process_token());
        id.push('_');

        Self {
            id,
            parent_id: value.to_string(),
            sequence: 0,
        }
    }

    /// Derive a same-process child and advance this id's sequence counter.
    pub fn child(&mut self) -> Self {
        let child = Self {
            id: format!("{}{}.", self.id, self.sequence),
            parent_id: self.id.clone(),
            sequence: 0,
        };
        self.sequence += 1;
        child
    }

    /// The full hierarchical id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The id this one was derived from. Empty for a root.
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// Index the next call to [`ActivityId::child`] will use.
    pub fn next_sequence(&self) -> u64 {
        self.sequence
    }

    /// The root token shared by every id in this operation tree.
    pub fn root_id(&self) -> &str {
        root_id(&self.id)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Extract the root token from any hierarchical id.
///
/// Strips an optional leading `|` and returns everything up to the first `.`.
/// Ids without a `.` are returned whole (minus the `|`).
pub fn root_id(id: &str) -> &str {
    let id = id.strip_prefix('|').unwrap_or(id);
    match id.find('.') {
        Some(end) => &id[..end],
        None => id,
    }
}

fn sanitize_parent(parent: &str) -> String {
    let mut sanitized = String::with_capacity(parent.len() + 2);
    if !parent.starts_with('|') {
        sanitized.push('|');
    }
    sanitized.push_str(parent);
    if !sanitized.ends_with('.') && !sanitized.ends_with('_') {
        sanitized.push('.');
    }
    sanitized
}

/// Eight lowercase hex characters, unique per derivation.
fn process_token() -> String {
    format!("{:08x}", (Uuid::new_v4().as_u128() >> 96) as u32)
}
