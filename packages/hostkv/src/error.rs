//! Typed errors decoded from the host boundary.

use hostkv_wire::abi::{tag, RawError};
use hostkv_wire::decode_string;

/// Canonical error kinds reported by the host store.
///
/// The named kinds form the closed set the protocol defines today;
/// [`ErrorKind::Unrecognized`] carries any tag outside that set so callers
/// can still branch on tags this client predates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The host's table of open stores is full.
    StoreTableFull,
    /// No store is registered under the requested name.
    NoSuchStore,
    /// The caller is not permitted to use the named store.
    AccessDenied,
    /// The handle does not refer to an open store.
    InvalidStore,
    /// The key is not present in the store.
    NoSuchKey,
    /// An I/O failure inside the host store. The error message carries the
    /// host-supplied diagnostic.
    Io,
    /// A tag this client does not know, carried raw.
    Unrecognized(u32),
}

/// Error returned by every fallible store operation.
///
/// Carries a machine-checkable [`ErrorKind`] and a human-readable message.
/// The message is synthesized locally for every kind except [`ErrorKind::Io`],
/// whose diagnostic text is decoded from the host's error payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The canonical kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error surfaced locally when an operation is issued on a store
    /// that is not open. Same kind and text the host reports for a handle
    /// it does not recognize.
    pub(crate) fn invalid_store() -> Self {
        Self::new(ErrorKind::InvalidStore, "invalid store")
    }

    /// Decode the error half of a host result.
    ///
    /// Total over all tag values: tags outside the protocol's set decode to
    /// [`ErrorKind::Unrecognized`], never a panic.
    ///
    /// # Safety
    ///
    /// If `raw.tag` is [`tag::IO`], `raw.payload` must be a readable string
    /// descriptor valid for the duration of this call. No other tag reads
    /// the payload.
    pub(crate) unsafe fn from_raw(raw: RawError) -> Self {
        match raw.tag {
            tag::STORE_TABLE_FULL => Self::new(ErrorKind::StoreTableFull, "store table full"),
            tag::NO_SUCH_STORE => Self::new(ErrorKind::NoSuchStore, "no such store"),
            tag::ACCESS_DENIED => Self::new(ErrorKind::AccessDenied, "access denied"),
            tag::INVALID_STORE => Self::new(ErrorKind::InvalidStore, "invalid store"),
            tag::NO_SUCH_KEY => Self::new(ErrorKind::NoSuchKey, "no such key"),
            tag::IO => Self::new(
                ErrorKind::Io,
                format!("io error: {}", decode_string(raw.payload)),
            ),
            other => Self::new(
                ErrorKind::Unrecognized(other),
                format!("unrecognized error: {}", other),
            ),
        }
    }
}
