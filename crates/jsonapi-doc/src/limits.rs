//! Safety limits for decoding untrusted documents.
//!
//! The decoder rejects input exceeding these bounds with
//! [`DecodeError::LengthExceedsLimit`](crate::DecodeError::LengthExceedsLimit).

use crate::error::{DecodeError, EncodeError};

/// Maximum size of a serialized document in bytes (64 MiB).
pub const MAX_DOCUMENT_SIZE: usize = 64 * 1024 * 1024;

/// Maximum number of resources in an array `data` member.
pub const MAX_PRIMARY_RESOURCES: usize = 1_000_000;

/// Maximum number of resources in an `included` member.
///
/// Also bounds the compound builder's accumulator.
pub const MAX_INCLUDED: usize = 1_000_000;

/// Maximum number of error objects in an `errors` member.
pub const MAX_ERRORS: usize = 10_000;

/// Rejects a decoded collection longer than `max`.
pub(crate) fn check_decode_len(
    field: &'static str,
    len: usize,
    max: usize,
) -> Result<(), DecodeError> {
    if len > max {
        return Err(DecodeError::LengthExceedsLimit { field, len, max });
    }
    Ok(())
}

/// Rejects a collection about to be encoded that is longer than `max`.
pub(crate) fn check_encode_len(
    field: &'static str,
    len: usize,
    max: usize,
) -> Result<(), EncodeError> {
    if len > max {
        return Err(EncodeError::LengthExceedsLimit { field, len, max });
    }
    Ok(())
}
