//! Decoding of tagged host results into typed values.

use bytes::Bytes;

use hostkv_wire::abi::{RawHandle, RawPayload, RawResult};
use hostkv_wire::{decode_bytes, decode_string_list};

use crate::error::Error;

/// Success payloads that can be read out of a host result.
///
/// Which implementation applies is fixed by the operation that issued the
/// call; the failure path is shared across all of them in [`decode`].
pub(crate) trait FromPayload: Sized {
    /// Read the success variant for `Self` out of `payload`.
    ///
    /// # Safety
    ///
    /// `payload` must hold the variant this type reads, and any descriptor
    /// inside it must be valid for the duration of this call.
    unsafe fn from_payload(payload: RawPayload) -> Self;
}

impl FromPayload for RawHandle {
    unsafe fn from_payload(payload: RawPayload) -> Self {
        payload.handle
    }
}

impl FromPayload for Bytes {
    unsafe fn from_payload(payload: RawPayload) -> Self {
        decode_bytes(payload.bytes)
    }
}

impl FromPayload for bool {
    unsafe fn from_payload(payload: RawPayload) -> Self {
        payload.boolean
    }
}

impl FromPayload for () {
    unsafe fn from_payload(_payload: RawPayload) -> Self {}
}

impl FromPayload for Vec<String> {
    unsafe fn from_payload(payload: RawPayload) -> Self {
        decode_string_list(payload.strings)
    }
}

/// Split a raw host result into a typed value or a typed [`Error`].
///
/// # Safety
///
/// On success `raw.payload` must hold the variant `T` reads; on failure it
/// must hold the error variant. Descriptors inside either must be valid for
/// the duration of this call.
pub(crate) unsafe fn decode<T: FromPayload>(raw: RawResult) -> Result<T, Error> {
    if raw.is_err {
        Err(Error::from_raw(raw.payload.error))
    } else {
        Ok(T::from_payload(raw.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use hostkv_wire::abi::tag;
    use hostkv_wire::{encode_bytes, encode_str};

    #[test]
    fn decodes_handle_payload() {
        let handle: RawHandle = unsafe { decode(RawResult::ok_handle(42)) }.unwrap();
        assert_eq!(handle, 42);
    }

    #[test]
    fn decodes_bytes_payload() {
        let value = b"stored value".to_vec();
        let ret = RawResult::ok_bytes(encode_bytes(&value));
        let decoded: Bytes = unsafe { decode(ret) }.unwrap();
        assert_eq!(decoded.as_ref(), value.as_slice());
    }

    #[test]
    fn decodes_bool_payload() {
        let exists: bool = unsafe { decode(RawResult::ok_bool(true)) }.unwrap();
        assert!(exists);
    }

    #[test]
    fn decodes_unit_payload() {
        unsafe { decode::<()>(RawResult::ok_unit()) }.unwrap();
    }

    #[test]
    fn decodes_string_list_payload() {
        let keys = ["k1".to_string(), "k2".to_string()];
        let descs: Vec<_> = keys.iter().map(|k| encode_str(k)).collect();
        let ret = RawResult::ok_strings(hostkv_wire::abi::StrListDescriptor {
            ptr: descs.as_ptr(),
            len: descs.len(),
        });
        let decoded: Vec<String> = unsafe { decode(ret) }.unwrap();
        assert_eq!(decoded, keys);
    }

    #[test]
    fn failure_path_is_shared_across_success_types() {
        let err = unsafe { decode::<Bytes>(RawResult::err(tag::ACCESS_DENIED)) }.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);

        let err = unsafe { decode::<bool>(RawResult::err(tag::ACCESS_DENIED)) }.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
    }

    #[test]
    fn io_failure_carries_decoded_diagnostic() {
        let diagnostic = "disk full";
        let ret = RawResult::err_with_payload(tag::IO, encode_str(diagnostic));
        let err = unsafe { decode::<()>(ret) }.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.message(), "io error: disk full");
    }
}
