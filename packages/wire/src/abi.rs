//! Fixed-layout types shared with the host.
//!
//! Every type here is `#[repr(C)]` and matches the layout the host reads and
//! writes on each call. Descriptors are non-owning views: the pointer is
//! valid only for the duration of the single call that carries it, and a
//! zero-length descriptor must never be dereferenced.

/// Raw store handle issued by the host on open.
///
/// Meaningless without the host's internal state. Higher layers wrap it in a
/// move-only owner; at this layer it is just the integer that crosses the
/// boundary.
pub type RawHandle = u32;

/// Error tags defined by the boundary protocol.
///
/// Any value outside this set is decoded as unrecognized, never rejected.
pub mod tag {
    pub const STORE_TABLE_FULL: u32 = 0;
    pub const NO_SUCH_STORE: u32 = 1;
    pub const ACCESS_DENIED: u32 = 2;
    pub const INVALID_STORE: u32 = 3;
    pub const NO_SUCH_KEY: u32 = 4;
    pub const IO: u32 = 5;
}

/// A borrowed view of UTF-8 text crossing the boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct StrDescriptor {
    pub ptr: *const u8,
    pub len: usize,
}

impl StrDescriptor {
    /// A zero-length descriptor. Valid to pass anywhere a descriptor is
    /// expected; never dereferenced.
    pub const fn empty() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
        }
    }
}

/// A borrowed view of a byte buffer crossing the boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct BytesDescriptor {
    pub ptr: *const u8,
    pub len: usize,
}

/// A borrowed view of an array of string descriptors.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct StrListDescriptor {
    pub ptr: *const StrDescriptor,
    pub len: usize,
}

/// Error half of a host result: a numeric tag plus an optional text payload.
///
/// `payload` is meaningful only for [`tag::IO`]; for every other tag the
/// host leaves it undefined and it must not be read.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawError {
    pub tag: u32,
    pub payload: StrDescriptor,
}

/// Success payload of a host result.
///
/// Which field is live is fixed by the operation that issued the call (open
/// yields `handle`, get yields `bytes`, and so on); on failure `error` is
/// live instead. Reading any other field is undefined.
#[repr(C)]
#[derive(Clone, Copy)]
pub union RawPayload {
    pub handle: RawHandle,
    pub bytes: BytesDescriptor,
    pub strings: StrListDescriptor,
    pub boolean: bool,
    pub error: RawError,
}

/// Tagged union returned by every fallible host call.
///
/// Exactly one interpretation of `payload` is valid, selected by `is_err`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawResult {
    pub is_err: bool,
    pub payload: RawPayload,
}

impl RawResult {
    /// Success carrying an open-store handle.
    pub fn ok_handle(handle: RawHandle) -> Self {
        Self {
            is_err: false,
            payload: RawPayload { handle },
        }
    }

    /// Success carrying a byte buffer.
    pub fn ok_bytes(bytes: BytesDescriptor) -> Self {
        Self {
            is_err: false,
            payload: RawPayload { bytes },
        }
    }

    /// Success carrying a string list.
    pub fn ok_strings(strings: StrListDescriptor) -> Self {
        Self {
            is_err: false,
            payload: RawPayload { strings },
        }
    }

    /// Success carrying a boolean.
    pub fn ok_bool(boolean: bool) -> Self {
        Self {
            is_err: false,
            payload: RawPayload { boolean },
        }
    }

    /// Success carrying nothing. The payload is present but dead.
    pub fn ok_unit() -> Self {
        Self {
            is_err: false,
            payload: RawPayload { handle: 0 },
        }
    }

    /// Failure with a bare tag. The text payload is left empty.
    pub fn err(tag: u32) -> Self {
        Self::err_with_payload(tag, StrDescriptor::empty())
    }

    /// Failure with a tag and a text payload (I/O diagnostics).
    pub fn err_with_payload(tag: u32, payload: StrDescriptor) -> Self {
        Self {
            is_err: true,
            payload: RawPayload {
                error: RawError { tag, payload },
            },
        }
    }
}
