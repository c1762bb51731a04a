//! Schema markers for statically present or absent members.
//!
//! Resource facets (attributes, relationships, links, meta), document side
//! members (meta, jsonapi, links) and error object fields are declared per
//! instantiation with one of two markers:
//!
//! - [`Absent`]: the member is never written and never read.
//! - [`Present<T>`]: the member is always written (even when `T` is empty)
//!   and is required on decode.

use std::ops::{Deref, DerefMut};

/// Marker for a statically absent member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Absent;

/// Marker for a statically present member holding a `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Present<T>(pub T);

impl<T> Present<T> {
    /// Unwraps the member value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Present<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Present<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Present<T> {
    fn from(value: T) -> Self {
        Present(value)
    }
}
