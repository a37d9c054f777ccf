//! The store handle and its lifecycle.

use bytes::Bytes;
use tracing::trace;

use hostkv_wire::abi::RawHandle;
use hostkv_wire::{encode_bytes, encode_str};

use crate::error::Error;
use crate::host::Host;
use crate::result;

/// Owned host handle.
///
/// Move-only: the raw value is never cloned into a second live owner, so
/// double-close and use-after-close cannot alias through this type.
#[derive(Debug)]
struct Handle(RawHandle);

/// A named connection to a host key-value store.
///
/// A `Store` starts closed; [`open`](Store::open) establishes the connection
/// and the data operations require it - nothing opens implicitly. Each
/// operation is one synchronous host round trip: arguments are encoded into
/// call-scoped descriptors, the host is called, and the tagged result is
/// decoded into a typed value or an [`Error`] before the operation returns.
///
/// Dropping an open store closes it.
#[derive(Debug)]
pub struct Store<H: Host> {
    name: String,
    host: H,
    handle: Option<Handle>,
}

impl<H: Host> Store<H> {
    /// Create a store backed by the given host. Not yet connected.
    pub fn with_host(name: impl Into<String>, host: H) -> Self {
        Self {
            name: name.into(),
            host,
            handle: None,
        }
    }

    /// The store name this handle was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the connection is currently established.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// The backing host, for inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The backing host, mutably. Lets a test reconfigure the host (failure
    /// injection, allow-lists) after the store has taken ownership of it.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Establish the connection to the named store.
    ///
    /// Idempotent: opening an already-open store succeeds without another
    /// host call and leaves the held handle untouched.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.handle.is_some() {
            return Ok(());
        }
        let name = encode_str(&self.name);
        let ret = unsafe { self.host.open(name) };
        let handle: RawHandle = unsafe { result::decode(ret) }?;
        trace!(store = %self.name, handle, "store opened");
        self.handle = Some(Handle(handle));
        Ok(())
    }

    /// Release the connection.
    ///
    /// Best-effort: the boundary's close reports nothing, and the store
    /// transitions to closed unconditionally. Closing an already-closed
    /// store is a no-op.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!(store = %self.name, handle = handle.0, "store closed");
            unsafe { self.host.close(handle.0) };
        }
    }

    /// Fetch the value stored under `key`.
    ///
    /// Returns a [`NoSuchKey`](crate::ErrorKind::NoSuchKey) error when the
    /// key is absent.
    pub fn get(&mut self, key: &str) -> Result<Bytes, Error> {
        let handle = self.raw_handle()?;
        let key = encode_str(key);
        let ret = unsafe { self.host.get(handle, key) };
        unsafe { result::decode(ret) }
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Empty values are fine; the encoding never dereferences a zero-length
    /// buffer.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<(), Error> {
        let handle = self.raw_handle()?;
        let key = encode_str(key);
        let value = encode_bytes(value);
        let ret = unsafe { self.host.set(handle, key, value) };
        unsafe { result::decode(ret) }
    }

    /// Remove the value stored under `key`.
    pub fn delete(&mut self, key: &str) -> Result<(), Error> {
        let handle = self.raw_handle()?;
        let key = encode_str(key);
        let ret = unsafe { self.host.delete(handle, key) };
        unsafe { result::decode(ret) }
    }

    /// Report whether `key` is present.
    pub fn exists(&mut self, key: &str) -> Result<bool, Error> {
        let handle = self.raw_handle()?;
        let key = encode_str(key);
        let ret = unsafe { self.host.exists(handle, key) };
        unsafe { result::decode(ret) }
    }

    /// List the keys currently present in the store.
    pub fn get_keys(&mut self) -> Result<Vec<String>, Error> {
        let handle = self.raw_handle()?;
        let ret = unsafe { self.host.get_keys(handle) };
        unsafe { result::decode(ret) }
    }

    /// The live handle, or `InvalidStore` if this store is not open.
    ///
    /// Operations never open implicitly; connecting is [`Store::open`]'s job
    /// alone. There is no raw value to send for a closed store, so the
    /// rejection the host would issue is produced locally instead.
    fn raw_handle(&self) -> Result<RawHandle, Error> {
        match &self.handle {
            Some(handle) => Ok(handle.0),
            None => Err(Error::invalid_store()),
        }
    }
}

impl<H: Host> Drop for Store<H> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(target_arch = "wasm32")]
impl Store<crate::host::FfiHost> {
    /// Create a store bound to the component's real host imports. Not yet
    /// connected; call [`Store::open`] before using it.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_host(name, crate::host::FfiHost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::MemoryHost;
    use hostkv_wire::abi::tag;

    #[test]
    fn open_is_idempotent() {
        let mut store = Store::with_host("cache", MemoryHost::new());
        store.open().unwrap();
        store.open().unwrap();
        assert!(store.is_open());
        assert_eq!(store.host().open_calls(), 1);
    }

    #[test]
    fn close_twice_is_a_noop() {
        let mut store = Store::with_host("cache", MemoryHost::new());
        store.open().unwrap();
        store.close();
        store.close();
        assert!(!store.is_open());
        assert_eq!(store.host().close_calls(), 1);
    }

    #[test]
    fn failed_open_stays_closed() {
        let mut store = Store::with_host("cache", MemoryHost::with_stores(["other"]));
        let err = store.open().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSuchStore);
        assert!(!store.is_open());
    }

    #[test]
    fn operations_before_open_fail_locally() {
        let mut store = Store::with_host("cache", MemoryHost::new());
        let err = store.get("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStore);
        // The host was never reached.
        assert_eq!(store.host().open_calls(), 0);
    }

    #[test]
    fn reopen_after_close_gets_a_fresh_handle() {
        let mut store = Store::with_host("cache", MemoryHost::new());
        store.open().unwrap();
        store.set("k", b"v").unwrap();
        store.close();

        store.open().unwrap();
        assert_eq!(store.host().open_calls(), 2);
        assert_eq!(store.get("k").unwrap().as_ref(), b"v");
    }

    #[test]
    fn host_error_surfaces_with_kind() {
        let mut host = MemoryHost::new();
        host.fail_next(tag::ACCESS_DENIED);
        let mut store = Store::with_host("cache", host);
        let err = store.open().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
    }
}
