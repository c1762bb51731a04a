//! Error objects carried by failure documents.

use crate::model::{Absent, Present};

/// One element of a document's `errors` array.
///
/// Each of the eight fields is [`Absent`] or [`Present<T>`]. `id`, `status`,
/// `code`, `title` and `detail` travel as wire strings and are converted on
/// the host via `FromStr`/`Display`, so e.g. `Present<u32>` is a valid code.
/// `links`, `source` and `meta` are arbitrary serde values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorObject<
    I = Absent,
    L = Absent,
    S = Absent,
    C = Absent,
    T = Absent,
    D = Absent,
    Src = Absent,
    M = Absent,
> {
    pub id: I,
    pub links: L,
    pub status: S,
    pub code: C,
    pub title: T,
    pub detail: D,
    pub source: Src,
    pub meta: M,
}

impl ErrorObject {
    /// Creates an error object with every field absent.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I, L, S, C, T, D, Src, M> ErrorObject<I, L, S, C, T, D, Src, M> {
    pub fn with_id<V>(self, id: V) -> ErrorObject<Present<V>, L, S, C, T, D, Src, M> {
        ErrorObject {
            id: Present(id),
            links: self.links,
            status: self.status,
            code: self.code,
            title: self.title,
            detail: self.detail,
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_links<V>(self, links: V) -> ErrorObject<I, Present<V>, S, C, T, D, Src, M> {
        ErrorObject {
            id: self.id,
            links: Present(links),
            status: self.status,
            code: self.code,
            title: self.title,
            detail: self.detail,
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_status<V>(self, status: V) -> ErrorObject<I, L, Present<V>, C, T, D, Src, M> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: Present(status),
            code: self.code,
            title: self.title,
            detail: self.detail,
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_code<V>(self, code: V) -> ErrorObject<I, L, S, Present<V>, T, D, Src, M> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: self.status,
            code: Present(code),
            title: self.title,
            detail: self.detail,
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_title<V>(self, title: V) -> ErrorObject<I, L, S, C, Present<V>, D, Src, M> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: self.status,
            code: self.code,
            title: Present(title),
            detail: self.detail,
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_detail<V>(self, detail: V) -> ErrorObject<I, L, S, C, T, Present<V>, Src, M> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: self.status,
            code: self.code,
            title: self.title,
            detail: Present(detail),
            source: self.source,
            meta: self.meta,
        }
    }

    pub fn with_source<V>(self, source: V) -> ErrorObject<I, L, S, C, T, D, Present<V>, M> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: self.status,
            code: self.code,
            title: self.title,
            detail: self.detail,
            source: Present(source),
            meta: self.meta,
        }
    }

    pub fn with_meta<V>(self, meta: V) -> ErrorObject<I, L, S, C, T, D, Src, Present<V>> {
        ErrorObject {
            id: self.id,
            links: self.links,
            status: self.status,
            code: self.code,
            title: self.title,
            detail: self.detail,
            source: self.source,
            meta: Present(meta),
        }
    }
}
