//! hostkv-wire: the raw boundary layer of the hostkv stack.
//!
//! Everything at this level is fixed-layout bytes - no store semantics, no
//! handle lifecycle, no error taxonomy. It owns exactly two jobs:
//!
//! - the `#[repr(C)]` layouts the host reads and writes on every call
//!   ([`abi`]): descriptors, the tagged result union, and the protocol's
//!   error tags;
//! - the codec between those layouts and native Rust types: borrowing
//!   encodes on the way out, copying decodes on the way in.
//!
//! The discipline is the whole point. Encoded descriptors borrow the
//! caller's buffer and live for one host call; decoded values are copied out
//! before the call's memory can go away. Nothing here retains a pointer.
//!
//! # Example
//!
//! ```rust
//! use hostkv_wire::{encode_bytes, decode_bytes};
//!
//! let value = b"payload".to_vec();
//! let desc = encode_bytes(&value);
//! // `desc` borrows `value`; a real host call would happen here, and the
//! // result's descriptors would be decoded before the call site returns.
//! let copied = unsafe { decode_bytes(desc) };
//! assert_eq!(copied.as_ref(), value.as_slice());
//! ```

pub use bytes::Bytes;

pub mod abi;
mod codec;

pub use codec::{decode_bytes, decode_string, decode_string_list, encode_bytes, encode_str};
