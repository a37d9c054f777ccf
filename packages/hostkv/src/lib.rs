//! hostkv: client bindings for a host-provided key-value store.
//!
//! The actual storage engine lives on the other side of an FFI boundary;
//! this crate is the marshalling and lifecycle layer in front of it. It owns
//! three things and nothing else:
//!
//! - the lifecycle of the opaque store handle the host issues on open
//!   ([`Store`]);
//! - the per-call conversion between native strings/bytes and the boundary's
//!   fixed-layout descriptors (the `hostkv-wire` crate underneath);
//! - the decoding of the boundary's tagged results into typed values or a
//!   typed [`Error`].
//!
//! The boundary itself is a trait ([`Host`]): production builds for
//! `wasm32` bind it to the component's real imports via `FfiHost`, while
//! tests run the same marshalling code against the in-memory
//! [`testing::MemoryHost`].
//!
//! Every operation is synchronous and blocking - one host round trip, no
//! retries, no timeouts at this layer. Errors come back immediately with a
//! machine-checkable [`ErrorKind`]; retry policy belongs to the caller,
//! since kinds like [`ErrorKind::NoSuchKey`] are not retry-safe.
//!
//! # Example
//!
//! ```rust
//! use hostkv::{Store, testing::MemoryHost};
//!
//! let mut store = Store::with_host("cache", MemoryHost::new());
//! store.open()?;
//! store.set("greeting", b"hello")?;
//! assert_eq!(store.get("greeting")?.as_ref(), b"hello");
//! assert!(store.exists("greeting")?);
//! store.close();
//! # Ok::<(), hostkv::Error>(())
//! ```
//!
//! On a `wasm32` target the store binds the real imports instead:
//! `Store::new("cache")`.

pub use bytes::Bytes;

mod error;
mod host;
mod result;
mod store;
pub mod testing;

pub use error::{Error, ErrorKind};
#[cfg(target_arch = "wasm32")]
pub use host::FfiHost;
pub use host::Host;
pub use store::Store;
