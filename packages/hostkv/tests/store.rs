use hostkv::testing::MemoryHost;
use hostkv::{ErrorKind, Store};
use hostkv_wire::abi::tag;

#[test]
fn set_get_round_trip() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    store.set("user:1", b"alice").unwrap();
    assert_eq!(store.get("user:1").unwrap().as_ref(), b"alice");
}

#[test]
fn empty_value_round_trips() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    store.set("empty", b"").unwrap();
    assert!(store.get("empty").unwrap().is_empty());
    assert!(store.exists("empty").unwrap());
}

#[test]
fn set_replaces_previous_value() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    store.set("k", b"old").unwrap();
    store.set("k", b"new").unwrap();
    assert_eq!(store.get("k").unwrap().as_ref(), b"new");
}

#[test]
fn delete_removes_the_key() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    store.set("k", b"v").unwrap();
    store.delete("k").unwrap();

    assert!(!store.exists("k").unwrap());
    let err = store.get("k").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchKey);
    assert_eq!(err.message(), "no such key");
}

#[test]
fn delete_of_absent_key_succeeds() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();
    store.delete("never-set").unwrap();
}

#[test]
fn get_keys_lists_stored_keys() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    store.set("a", b"1").unwrap();
    store.set("b", b"2").unwrap();
    store.set("c", b"3").unwrap();
    store.delete("b").unwrap();

    assert_eq!(store.get_keys().unwrap(), vec!["a", "c"]);
}

#[test]
fn get_keys_on_empty_store_is_empty() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();
    assert!(store.get_keys().unwrap().is_empty());
}

#[test]
fn operations_before_open_return_invalid_store() {
    // Construct Store("cache") and call get("missing") before any open:
    // a typed error, not a memory fault, and no host traffic.
    let mut store = Store::with_host("cache", MemoryHost::new());
    let err = store.get("missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStore);
    assert_eq!(err.message(), "invalid store");
    assert_eq!(store.host().open_calls(), 0);
}

#[test]
fn operations_after_close_return_invalid_store() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();
    store.set("k", b"v").unwrap();
    store.close();

    let err = store.set("k", b"v2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStore);
}

#[test]
fn io_error_carries_host_diagnostic() {
    let mut host = MemoryHost::new();
    host.fail_next_io("disk full");

    let mut store = Store::with_host("cache", host);
    let err = store.open().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), "io error: disk full");
}

#[test]
fn unrecognized_tag_decodes_without_fault() {
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();

    // Armed only after open: the injected failure is single-shot and must
    // surface from the data operation, not the open call.
    store.host_mut().fail_next(99);
    let err = store.exists("k").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unrecognized(99));
    assert_eq!(err.message(), "unrecognized error: 99");

    // Single-shot: the next call goes through.
    assert!(!store.exists("k").unwrap());
}

#[test]
fn dropping_an_open_store_closes_it() {
    let host = MemoryHost::new();
    let closes = host.close_counter();

    let mut store = Store::with_host("cache", host);
    store.open().unwrap();
    assert_eq!(closes.get(), 0);

    drop(store);
    assert_eq!(closes.get(), 1);
}

#[test]
fn dropping_a_closed_store_closes_nothing() {
    let host = MemoryHost::new();
    let closes = host.close_counter();

    let mut store = Store::with_host("cache", host);
    store.open().unwrap();
    store.close();
    assert_eq!(closes.get(), 1);

    drop(store);
    assert_eq!(closes.get(), 1);
}

#[test]
fn contents_survive_close_and_reopen() {
    // The engine behind the boundary outlives individual connections.
    let mut store = Store::with_host("cache", MemoryHost::new());
    store.open().unwrap();
    store.set("shared", b"yes").unwrap();
    store.close();

    store.open().unwrap();
    assert_eq!(store.get("shared").unwrap().as_ref(), b"yes");
}

#[test]
fn table_full_surfaces_on_open() {
    let mut host = MemoryHost::new();
    host.fail_next(tag::STORE_TABLE_FULL);
    let mut store = Store::with_host("cache", host);

    let err = store.open().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreTableFull);
    assert_eq!(err.message(), "store table full");
    assert!(!store.is_open());
}
