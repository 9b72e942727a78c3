//! Signin Table Tests
//!
//! Tests for the generated signin accessor against hand-built payloads
//! in the compiled layout:
//! `id, item2count map, vipitem2vipcount map, viplevel, iconFile`.

use cfgtable::stream::{encode_table, BlobBuilder, Stream, StreamWriter};
use cfgtable::tables::{self, DataSignin};
use cfgtable::{CfgError, IssueKind, KeyedList, LoadErrors, Record, Registry, Table};

// =============================================================================
// Helper Functions
// =============================================================================

/// Encode one signin record field by field
fn write_signin(
    w: &mut StreamWriter,
    id: i32,
    items: &[(i32, i32)],
    vip_items: &[(i32, i32)],
    viplevel: i32,
    icon: &str,
) {
    w.write_i32(id);
    w.write_i32(items.len() as i32);
    for (k, v) in items {
        w.write_i32(*k).write_i32(*v);
    }
    w.write_i32(vip_items.len() as i32);
    for (k, v) in vip_items {
        w.write_i32(*k).write_i32(*v);
    }
    w.write_i32(viplevel);
    w.write_str(icon);
}

fn load_signin(payload: &[u8]) -> (Registry, cfgtable::LoadReport) {
    let blob = BlobBuilder::new()
        .section(DataSignin::TABLE, payload.to_vec())
        .build_sectioned();
    let registry = tables::register_all(Registry::builder()).build().unwrap();
    let report = registry.initialize_all(&blob);
    (registry, report)
}

fn map(pairs: &[(i32, i32)]) -> KeyedList<i32, i32> {
    pairs.iter().copied().collect()
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_two_records_in_insertion_order() {
    let mut w = StreamWriter::new();
    w.write_i32(2);
    write_signin(&mut w, 5, &[], &[], 9, "icon_a");
    write_signin(&mut w, 9, &[], &[], 5, "icon_b");

    let (registry, report) = load_signin(w.as_slice());
    assert!(report.success, "load failed: {:?}", report.failure);

    let signin = DataSignin::table(&registry).unwrap();
    assert_eq!(signin.get(&5).unwrap().icon_file(), "icon_a");
    assert_eq!(signin.get(&5).unwrap().viplevel(), 9);

    let all: Vec<_> = signin.all().collect();
    assert_eq!(all[0].id(), 5);
    assert_eq!(all[1].id(), 9);
}

#[test]
fn test_order_follows_rows_not_ids() {
    let mut w = StreamWriter::new();
    w.write_i32(3);
    write_signin(&mut w, 30, &[], &[], 0, "c");
    write_signin(&mut w, 10, &[], &[], 0, "a");
    write_signin(&mut w, 20, &[], &[], 0, "b");

    let (registry, _) = load_signin(w.as_slice());
    let signin = DataSignin::table(&registry).unwrap();

    let ids: Vec<i32> = signin.all().map(DataSignin::id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn test_nested_maps_decoded() {
    let mut w = StreamWriter::new();
    w.write_i32(1);
    write_signin(
        &mut w,
        1,
        &[(1001, 2), (1002, 50)],
        &[(2001, 1)],
        3,
        "day1.png",
    );

    let (registry, report) = load_signin(w.as_slice());
    assert!(report.success);

    let signin = DataSignin::table(&registry).unwrap();
    let row = signin.get(&1).unwrap();
    assert_eq!(row.item2count_map(), &map(&[(1001, 2), (1002, 50)]));
    assert_eq!(row.vipitem2vipcount_map().get(&2001), Some(&1));
    assert_eq!(row.viplevel(), 3);
    assert_eq!(row.icon_file(), "day1.png");
}

#[test]
fn test_nested_maps_consume_exact_bytes() {
    let mut w = StreamWriter::new();
    write_signin(&mut w, 1, &[(1, 1), (2, 2)], &[(3, 3)], 4, "x");
    w.write_i32(0x7777);
    let bytes = w.finish();

    let mut stream = Stream::new(&bytes);
    let row = DataSignin::decode(&mut stream).unwrap();

    assert_eq!(row.id(), 1);
    assert_eq!(stream.position(), 4 + (4 + 16) + (4 + 8) + 4 + (4 + 1));
    assert_eq!(stream.read_i32().unwrap(), 0x7777);
}

#[test]
fn test_duplicate_id_first_wins() {
    let mut w = StreamWriter::new();
    w.write_i32(3);
    write_signin(&mut w, 7, &[(1, 1)], &[], 1, "first");
    write_signin(&mut w, 8, &[], &[], 2, "other");
    write_signin(&mut w, 7, &[(2, 2)], &[], 3, "second");

    let (registry, report) = load_signin(w.as_slice());

    assert!(report.success);
    let duplicates: Vec<_> = report
        .errors
        .iter()
        .filter(|i| i.kind == IssueKind::DuplicateKey)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].table, "signin");
    assert_eq!(duplicates[0].key.as_deref(), Some("7"));

    let signin = DataSignin::table(&registry).unwrap();
    let row = signin.get(&7).unwrap();
    assert_eq!(row.icon_file(), "first");
    assert_eq!(row.viplevel(), 1);
    assert_eq!(row.item2count_map(), &map(&[(1, 1)]));
    assert_eq!(signin.len(), 2);
}

#[test]
fn test_truncated_mid_record_leaves_slot_unchanged() {
    let mut good = StreamWriter::new();
    good.write_i32(1);
    write_signin(&mut good, 1, &[], &[], 0, "old");
    let (registry, report) = load_signin(good.as_slice());
    assert!(report.success);

    // Count claims 2 records, the second stops inside its item map
    let mut bad = StreamWriter::new();
    bad.write_i32(2);
    write_signin(&mut bad, 1, &[], &[], 0, "new");
    bad.write_i32(2).write_i32(3).write_i32(1);

    let blob = BlobBuilder::new()
        .section(DataSignin::TABLE, bad.finish())
        .build_sectioned();
    let report = registry.initialize_all(&blob);

    assert!(!report.success);
    assert!(matches!(
        report.failure,
        Some(CfgError::TruncatedStream { .. })
    ));
    let signin = DataSignin::table(&registry).unwrap();
    assert_eq!(signin.get(&1).unwrap().icon_file(), "old");
}

#[test]
fn test_negative_map_count_is_malformed() {
    let mut w = StreamWriter::new();
    w.write_i32(1);
    w.write_i32(1).write_i32(-1);

    let (registry, report) = load_signin(w.as_slice());

    assert!(!report.success);
    assert!(matches!(report.failure, Some(CfgError::MalformedField(_))));
    assert!(DataSignin::table(&registry).is_none());
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_encode_decode_round_trip() {
    let records = vec![
        DataSignin::new(3, map(&[(1001, 1)]), map(&[]), 0, "a"),
        DataSignin::new(1, map(&[(1002, 5), (1003, 7)]), map(&[(2001, 9)]), 4, "b"),
        DataSignin::new(2, map(&[]), map(&[]), 12, ""),
    ];
    let payload = encode_table(&records, |w, r| r.encode(w));

    let mut stream = Stream::new(&payload);
    let mut errors = LoadErrors::new();
    let table = Table::<DataSignin>::load(&mut stream, &mut errors).unwrap();

    assert!(stream.is_empty());
    assert!(!errors.has_errors());
    assert_eq!(table.keys().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    for expected in &records {
        let row = table.get(&expected.id()).unwrap();
        assert_eq!(row.item2count_map(), expected.item2count_map());
        assert_eq!(row.vipitem2vipcount_map(), expected.vipitem2vipcount_map());
        assert_eq!(row.viplevel(), expected.viplevel());
        assert_eq!(row.icon_file(), expected.icon_file());
    }
}

// =============================================================================
// Query and Identity Tests
// =============================================================================

#[test]
fn test_filter_by_viplevel() {
    let records: Vec<_> = (1..=6)
        .map(|id| DataSignin::new(id, map(&[]), map(&[]), id % 3, format!("icon_{}", id)))
        .collect();
    let blob = BlobBuilder::new()
        .section(DataSignin::TABLE, encode_table(&records, |w, r| r.encode(w)))
        .build_sectioned();
    let registry = tables::register_all(Registry::builder()).build().unwrap();
    assert!(registry.initialize_all(&blob).success);

    let signin = DataSignin::table(&registry).unwrap();
    let vip0: Vec<i32> = signin
        .filter(|r| r.viplevel() == 0)
        .into_iter()
        .map(DataSignin::id)
        .collect();
    assert_eq!(vip0, vec![3, 6]);
}

#[test]
fn test_identity_is_id_only() {
    let a = DataSignin::new(1, map(&[(1, 1)]), map(&[]), 0, "a");
    let b = DataSignin::new(1, map(&[]), map(&[]), 5, "b");
    let c = DataSignin::new(2, map(&[(1, 1)]), map(&[]), 0, "a");

    assert_eq!(a, b);
    assert_ne!(a, c);

    let set: std::collections::HashSet<_> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_display() {
    let row = DataSignin::new(5, map(&[(1001, 2)]), map(&[]), 9, "icon_a");
    assert_eq!(row.to_string(), "(5,{1001=2},{},9,icon_a)");
}
