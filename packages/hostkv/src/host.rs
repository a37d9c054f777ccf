//! The boundary seam: one trait method per host call.

use hostkv_wire::abi::{BytesDescriptor, RawHandle, RawResult, StrDescriptor};

/// The calls the host exposes for key-value access.
///
/// [`Store`](crate::Store) is generic over this trait so the marshalling and
/// lifecycle layer can be exercised against an in-memory host in tests
/// ([`MemoryHost`](crate::testing::MemoryHost)) while production builds bind
/// the component's real imports ([`FfiHost`]).
///
/// Every method is a single synchronous round trip. Descriptor arguments are
/// valid only for the duration of the call; descriptors inside the returned
/// result are valid only until the next call on the same host, and must be
/// copied out before then.
pub trait Host {
    /// Open the store named by `name`. Ok payload: handle.
    ///
    /// # Safety
    ///
    /// `name` must describe readable bytes valid for the duration of the
    /// call.
    unsafe fn open(&mut self, name: StrDescriptor) -> RawResult;

    /// Release `handle`. Fire-and-forget: the boundary reports nothing.
    ///
    /// # Safety
    ///
    /// `handle` must have been issued by this host's `open` and not yet
    /// closed.
    unsafe fn close(&mut self, handle: RawHandle);

    /// Fetch the value stored under `key`. Ok payload: bytes descriptor.
    ///
    /// # Safety
    ///
    /// `key` must describe readable bytes valid for the duration of the
    /// call.
    unsafe fn get(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult;

    /// Store `value` under `key`. Ok payload: unit.
    ///
    /// # Safety
    ///
    /// `key` and `value` must describe readable bytes valid for the duration
    /// of the call.
    unsafe fn set(
        &mut self,
        handle: RawHandle,
        key: StrDescriptor,
        value: BytesDescriptor,
    ) -> RawResult;

    /// Remove the value stored under `key`. Ok payload: unit.
    ///
    /// # Safety
    ///
    /// `key` must describe readable bytes valid for the duration of the
    /// call.
    unsafe fn delete(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult;

    /// Report whether `key` is present. Ok payload: bool.
    ///
    /// # Safety
    ///
    /// `key` must describe readable bytes valid for the duration of the
    /// call.
    unsafe fn exists(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult;

    /// List the keys currently present. Ok payload: string-list descriptor.
    ///
    /// # Safety
    ///
    /// `handle` must have been issued by this host's `open`.
    unsafe fn get_keys(&mut self, handle: RawHandle) -> RawResult;
}

#[cfg(target_arch = "wasm32")]
mod sys {
    use hostkv_wire::abi::{BytesDescriptor, RawHandle, RawResult, StrDescriptor};

    #[link(wasm_import_module = "key-value")]
    extern "C" {
        pub fn host_open(name: *const StrDescriptor, ret: *mut RawResult);
        pub fn host_close(handle: RawHandle);
        pub fn host_get(handle: RawHandle, key: *const StrDescriptor, ret: *mut RawResult);
        pub fn host_set(
            handle: RawHandle,
            key: *const StrDescriptor,
            value: *const BytesDescriptor,
            ret: *mut RawResult,
        );
        pub fn host_delete(handle: RawHandle, key: *const StrDescriptor, ret: *mut RawResult);
        pub fn host_exists(handle: RawHandle, key: *const StrDescriptor, ret: *mut RawResult);
        pub fn host_get_keys(handle: RawHandle, ret: *mut RawResult);
    }
}

/// [`Host`] bound to the component's real imports.
///
/// The imports use out-parameter signatures; each wrapper hands the host a
/// `MaybeUninit` slot and assumes it initialized once the call returns,
/// which the boundary contract guarantees.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct FfiHost;

#[cfg(target_arch = "wasm32")]
impl Host for FfiHost {
    unsafe fn open(&mut self, name: StrDescriptor) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_open(&name, ret.as_mut_ptr());
        ret.assume_init()
    }

    unsafe fn close(&mut self, handle: RawHandle) {
        sys::host_close(handle);
    }

    unsafe fn get(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_get(handle, &key, ret.as_mut_ptr());
        ret.assume_init()
    }

    unsafe fn set(
        &mut self,
        handle: RawHandle,
        key: StrDescriptor,
        value: BytesDescriptor,
    ) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_set(handle, &key, &value, ret.as_mut_ptr());
        ret.assume_init()
    }

    unsafe fn delete(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_delete(handle, &key, ret.as_mut_ptr());
        ret.assume_init()
    }

    unsafe fn exists(&mut self, handle: RawHandle, key: StrDescriptor) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_exists(handle, &key, ret.as_mut_ptr());
        ret.assume_init()
    }

    unsafe fn get_keys(&mut self, handle: RawHandle) -> RawResult {
        let mut ret = std::mem::MaybeUninit::<RawResult>::uninit();
        sys::host_get_keys(handle, ret.as_mut_ptr());
        ret.assume_init()
    }
}
