//! In-memory host for exercising the client without a real boundary.
//!
//! [`MemoryHost`] implements [`Host`] over plain maps, so the full
//! marshalling path - descriptor encode, raw host call, copy-out decode -
//! runs exactly as it would against a real host. Returned descriptors point
//! into scratch buffers owned by the host and stay valid until the next call
//! on it, the same lifetime contract the real boundary gives.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use hostkv_wire::abi::{
    tag, BytesDescriptor, RawHandle, RawResult, StrDescriptor, StrListDescriptor,
};
use hostkv_wire::{decode_string, encode_bytes, encode_str};

use crate::host::Host;

/// In-memory [`Host`] with call counters and failure injection.
///
/// Use this to test code built on [`Store`](crate::Store) without a real
/// host. By default every store name opens successfully; restrict the set
/// with [`MemoryHost::with_stores`]. Store contents survive close/reopen,
/// matching a host whose engine outlives individual connections.
#[derive(Debug)]
pub struct MemoryHost {
    /// Names the host will open; `None` means any name.
    allowed: Option<Vec<String>>,
    /// Next handle to issue. Handles are never reused within one host.
    next_handle: RawHandle,
    /// Currently open handles and the store each refers to.
    open_stores: HashMap<RawHandle, String>,
    /// Store contents, keyed by store name.
    data: HashMap<String, BTreeMap<String, Vec<u8>>>,
    /// Single-shot injected failure: tag plus optional text payload.
    injected: Option<(u32, Option<String>)>,
    /// Number of open calls received.
    opens: usize,
    /// Number of close calls received. Shared so a test can observe a close
    /// performed by `Drop` after the host itself is gone.
    closes: Rc<Cell<usize>>,
    // Scratch buffers backing descriptors returned by the last call.
    scratch_bytes: Vec<u8>,
    scratch_text: String,
    scratch_keys: Vec<String>,
    scratch_descs: Vec<StrDescriptor>,
}

impl MemoryHost {
    /// Create a host that opens any store name.
    pub fn new() -> Self {
        Self {
            allowed: None,
            next_handle: 1,
            open_stores: HashMap::new(),
            data: HashMap::new(),
            injected: None,
            opens: 0,
            closes: Rc::new(Cell::new(0)),
            scratch_bytes: Vec::new(),
            scratch_text: String::new(),
            scratch_keys: Vec::new(),
            scratch_descs: Vec::new(),
        }
    }

    /// Create a host that opens only the given store names; any other name
    /// fails with the no-such-store tag.
    pub fn with_stores(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut host = Self::new();
        host.allowed = Some(names.into_iter().map(Into::into).collect());
        host
    }

    /// Make the next fallible call fail with `tag` and no payload.
    pub fn fail_next(&mut self, tag: u32) {
        self.injected = Some((tag, None));
    }

    /// Make the next fallible call fail with the I/O tag and the given
    /// diagnostic text as payload.
    pub fn fail_next_io(&mut self, message: impl Into<String>) {
        self.injected = Some((tag::IO, Some(message.into())));
    }

    /// Number of open calls this host has received.
    pub fn open_calls(&self) -> usize {
        self.opens
    }

    /// Number of close calls this host has received.
    pub fn close_calls(&self) -> usize {
        self.closes.get()
    }

    /// Shared close counter, for observing closes that happen after the
    /// host has been moved into a store and dropped with it.
    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.open_stores.len()
    }

    fn take_injected(&mut self) -> Option<RawResult> {
        let (tag, message) = self.injected.take()?;
        Some(match message {
            Some(text) => {
                self.scratch_text = text;
                RawResult::err_with_payload(tag, encode_str(&self.scratch_text))
            }
            None => RawResult::err(tag),
        })
    }

    fn store_of(&self, handle: RawHandle) -> Option<String> {
        self.open_stores.get(&handle).cloned()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    unsafe fn open(&mut self, name: StrDescriptor) -> RawResult {
        self.opens += 1;
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let name = decode_string(name);
        if let Some(allowed) = &self.allowed {
            if !allowed.contains(&name) {
                return RawResult::err(tag::NO_SUCH_STORE);
            }
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.open_stores.insert(handle, name.clone());
        self.data.entry(name).or_default();
        RawResult::ok_handle(handle)
    }

    unsafe fn close(&mut self, handle: RawHandle) {
        self.closes.set(self.closes.get() + 1);
        self.open_stores.remove(&handle);
    }

    unsafe fn get(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let Some(name) = self.store_of(handle) else {
            return RawResult::err(tag::INVALID_STORE);
        };
        let key = decode_string(key);
        match self.data.get(&name).and_then(|store| store.get(&key)) {
            Some(value) => {
                self.scratch_bytes = value.clone();
                RawResult::ok_bytes(encode_bytes(&self.scratch_bytes))
            }
            None => RawResult::err(tag::NO_SUCH_KEY),
        }
    }

    unsafe fn set(
        &mut self,
        handle: RawHandle,
        key: StrDescriptor,
        value: BytesDescriptor,
    ) -> RawResult {
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let Some(name) = self.store_of(handle) else {
            return RawResult::err(tag::INVALID_STORE);
        };
        let key = decode_string(key);
        let value = hostkv_wire::decode_bytes(value).to_vec();
        self.data.entry(name).or_default().insert(key, value);
        RawResult::ok_unit()
    }

    unsafe fn delete(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let Some(name) = self.store_of(handle) else {
            return RawResult::err(tag::INVALID_STORE);
        };
        let key = decode_string(key);
        // Removing an absent key succeeds; delete is idempotent.
        self.data.entry(name).or_default().remove(&key);
        RawResult::ok_unit()
    }

    unsafe fn exists(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let Some(name) = self.store_of(handle) else {
            return RawResult::err(tag::INVALID_STORE);
        };
        let key = decode_string(key);
        let present = self
            .data
            .get(&name)
            .is_some_and(|store| store.contains_key(&key));
        RawResult::ok_bool(present)
    }

    unsafe fn get_keys(&mut self, handle: RawHandle) -> RawResult {
        if let Some(ret) = self.take_injected() {
            return ret;
        }
        let Some(name) = self.store_of(handle) else {
            return RawResult::err(tag::INVALID_STORE);
        };
        self.scratch_keys = self
            .data
            .get(&name)
            .map(|store| store.keys().cloned().collect())
            .unwrap_or_default();
        self.scratch_descs = self.scratch_keys.iter().map(|k| encode_str(k)).collect();
        RawResult::ok_strings(StrListDescriptor {
            ptr: self.scratch_descs.as_ptr(),
            len: self.scratch_descs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_issues_distinct_handles() {
        let mut host = MemoryHost::new();
        let a = unsafe { host.open(encode_str("one")) };
        let b = unsafe { host.open(encode_str("two")) };
        let (a, b) = unsafe { (a.payload.handle, b.payload.handle) };
        assert_ne!(a, b);
        assert_eq!(host.open_calls(), 2);
        assert_eq!(host.open_handles(), 2);
    }

    #[test]
    fn unknown_name_fails_when_restricted() {
        let mut host = MemoryHost::with_stores(["cache"]);
        let ret = unsafe { host.open(encode_str("other")) };
        assert!(ret.is_err);
        assert_eq!(unsafe { ret.payload.error }.tag, tag::NO_SUCH_STORE);
    }

    #[test]
    fn unknown_handle_is_invalid_store() {
        let mut host = MemoryHost::new();
        let ret = unsafe { host.get(7, encode_str("k")) };
        assert!(ret.is_err);
        assert_eq!(unsafe { ret.payload.error }.tag, tag::INVALID_STORE);
    }

    #[test]
    fn injected_failure_is_single_shot() {
        let mut host = MemoryHost::new();
        host.fail_next(tag::STORE_TABLE_FULL);

        let ret = unsafe { host.open(encode_str("cache")) };
        assert!(ret.is_err);

        let ret = unsafe { host.open(encode_str("cache")) };
        assert!(!ret.is_err);
    }

    #[test]
    fn close_counts_and_releases_handle() {
        let mut host = MemoryHost::new();
        let ret = unsafe { host.open(encode_str("cache")) };
        let handle = unsafe { ret.payload.handle };

        unsafe { host.close(handle) };
        assert_eq!(host.close_calls(), 1);
        assert_eq!(host.open_handles(), 0);

        // Handle is gone; the host now rejects it.
        let ret = unsafe { host.exists(handle, encode_str("k")) };
        assert!(ret.is_err);
    }
}
