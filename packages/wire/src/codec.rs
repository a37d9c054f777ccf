//! Conversions between native strings/bytes and boundary descriptors.
//!
//! Encoding borrows: the returned descriptor points into the caller's buffer
//! and is valid only while that buffer stays put, which in practice means
//! for the single host call it was prepared for. Decoding copies: every
//! decode reads the descriptor's bytes into owned memory before returning,
//! so nothing aliases host memory after the call that produced it.

use bytes::Bytes;

use crate::abi::{BytesDescriptor, StrDescriptor, StrListDescriptor};

/// Borrow `s` as a string descriptor for a single host call.
///
/// The caller must not move, resize, or drop `s`'s backing buffer until that
/// call returns.
pub fn encode_str(s: &str) -> StrDescriptor {
    StrDescriptor {
        ptr: s.as_ptr(),
        len: s.len(),
    }
}

/// Borrow `b` as a byte-buffer descriptor for a single host call.
///
/// An empty slice still yields a well-aligned non-null pointer from
/// `as_ptr`, so length 0 passes through as-is; a zero-length descriptor is
/// never dereferenced on either side of the boundary.
pub fn encode_bytes(b: &[u8]) -> BytesDescriptor {
    BytesDescriptor {
        ptr: b.as_ptr(),
        len: b.len(),
    }
}

/// Copy a string descriptor out of host memory into an owned `String`.
///
/// Invalid UTF-8 is replaced rather than rejected: inbound text is
/// best-effort diagnostics, and decoding it must not itself fail.
///
/// # Safety
///
/// `desc.ptr` must point to `desc.len` readable bytes that stay valid for
/// the duration of this call. Zero-length descriptors are never
/// dereferenced and are always safe.
pub unsafe fn decode_string(desc: StrDescriptor) -> String {
    if desc.len == 0 {
        return String::new();
    }
    let raw = std::slice::from_raw_parts(desc.ptr, desc.len);
    String::from_utf8_lossy(raw).into_owned()
}

/// Copy a byte-buffer descriptor out of host memory into owned `Bytes`.
///
/// # Safety
///
/// Same contract as [`decode_string`].
pub unsafe fn decode_bytes(desc: BytesDescriptor) -> Bytes {
    if desc.len == 0 {
        return Bytes::new();
    }
    let raw = std::slice::from_raw_parts(desc.ptr, desc.len);
    Bytes::copy_from_slice(raw)
}

/// Copy an array of string descriptors out of host memory, preserving the
/// array's order.
///
/// # Safety
///
/// `desc.ptr` must point to `desc.len` readable `StrDescriptor`s, each of
/// which satisfies the [`decode_string`] contract, all valid for the
/// duration of this call.
pub unsafe fn decode_string_list(desc: StrListDescriptor) -> Vec<String> {
    if desc.len == 0 {
        return Vec::new();
    }
    let raw = std::slice::from_raw_parts(desc.ptr, desc.len);
    raw.iter().map(|d| decode_string(*d)).collect()
}
