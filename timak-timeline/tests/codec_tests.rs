use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use timak_timeline::codec::{decode, encode, to_external, to_sorted, to_state};
use timak_timeline::{CodecError, Entry, Order, TimelineItem};

fn entry(id: &str, score: i64) -> Entry {
    Entry::new(id, score, 1, None).unwrap()
}

fn ids(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

// ── decode / encode ──────────────────────────────────────────────

#[test]
fn decode_reads_wire_format() {
    let raw = br#"[
        {"id": "b", "score": 2, "modified": 20, "data": {"text": "hi"}},
        {"id": "a", "score": 1, "modified": 10, "deleted": true}
    ]"#;
    let entries = decode(raw).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].data, Some(json!({"text": "hi"})));
    assert!(!entries[0].deleted);
    assert!(entries[1].deleted);
}

#[test]
fn decode_empty_array() {
    assert!(decode(b"[]").unwrap().is_empty());
}

#[test]
fn decode_rejects_non_array() {
    assert!(matches!(decode(br#"{"id": "a"}"#), Err(CodecError::Malformed(_))));
    assert!(matches!(decode(b""), Err(CodecError::Malformed(_))));
}

#[test]
fn decode_rejects_empty_id() {
    let raw = br#"[{"id": "", "score": 1, "modified": 1}]"#;
    assert!(matches!(decode(raw), Err(CodecError::InvalidEntry(_))));
}

#[test]
fn encode_then_decode_preserves_entries() {
    let entries = vec![
        Entry::new("b", 2, 20, Some(json!([1, 2]))).unwrap(),
        Entry::tombstone("a", 1, 10).unwrap(),
    ];
    assert_eq!(decode(&encode(&entries).unwrap()).unwrap(), entries);
}

#[test]
fn decode_then_encode_drops_only_default_fields() {
    let raw = br#"[{"id":"a","score":1,"modified":2,"deleted":false,"data":null}]"#;
    let encoded = encode(&decode(raw).unwrap()).unwrap();
    assert_eq!(encoded, br#"[{"id":"a","score":1,"modified":2}]"#.to_vec());
}

// ── to_state ─────────────────────────────────────────────────────

#[test]
fn to_state_keeps_later_duplicate() {
    let state = to_state(vec![
        Entry::new("x", 1, 5, Some(json!("first"))).unwrap(),
        Entry::new("x", 9, 1, Some(json!("second"))).unwrap(),
    ]);
    assert_eq!(state.len(), 1);
    assert_eq!(state.get("x").unwrap().score, 9);
}

// ── to_sorted ────────────────────────────────────────────────────

#[test]
fn sorted_desc_and_asc() {
    let state = to_state(vec![entry("a", 1), entry("c", 3), entry("b", 2)]);
    assert_eq!(ids(&to_sorted(state.clone(), Order::Desc, 10)), vec!["c", "b", "a"]);
    assert_eq!(ids(&to_sorted(state, Order::Asc, 10)), vec!["a", "b", "c"]);
}

#[test]
fn sorted_truncates_to_limit() {
    let state = to_state(vec![entry("a", 1), entry("c", 3), entry("b", 2)]);
    assert_eq!(ids(&to_sorted(state.clone(), Order::Desc, 2)), vec!["c", "b"]);
    assert_eq!(ids(&to_sorted(state, Order::Asc, 2)), vec!["a", "b"]);
}

#[test]
fn sorted_ties_break_on_id() {
    let state = to_state(vec![entry("m", 5), entry("a", 5), entry("z", 9)]);
    assert_eq!(ids(&to_sorted(state, Order::Desc, 10)), vec!["z", "a", "m"]);
}

// ── to_external ──────────────────────────────────────────────────

#[test]
fn external_drops_tombstones() {
    let entries = vec![
        entry("a", 3),
        Entry::tombstone("b", 2, 1).unwrap(),
        Entry::new("c", 1, 1, Some(json!({"k": "v"}))).unwrap(),
    ];
    assert_eq!(
        to_external(&entries),
        vec![
            TimelineItem::Id("a".into()),
            TimelineItem::Data(json!({"k": "v"})),
        ]
    );
}

#[test]
fn external_items_serialize_untagged() {
    let items = vec![TimelineItem::Id("a".into()), TimelineItem::Data(json!({"n": 1}))];
    assert_eq!(serde_json::to_value(&items).unwrap(), json!(["a", {"n": 1}]));
    assert_eq!(items[0].as_id(), Some("a"));
    assert_eq!(items[1].as_data(), Some(&json!({"n": 1})));
}

// ── Properties ───────────────────────────────────────────────────

fn entries_strategy() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::btree_map("[a-f]{1,2}", -5i64..5, 0..20).prop_map(|m| {
        m.into_iter()
            .map(|(id, score)| Entry::new(id, score, 1, None).unwrap())
            .collect()
    })
}

fn order_strategy() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::Asc), Just(Order::Desc)]
}

proptest! {
    /// Ranking depends only on the set of entries, not on input order.
    #[test]
    fn sorted_ignores_input_order(
        entries in entries_strategy(),
        order in order_strategy(),
        limit in 1usize..25,
    ) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(
            to_sorted(to_state(entries), order, limit),
            to_sorted(to_state(reversed), order, limit)
        );
    }

    /// Output is within the window and ranked by (score, id).
    #[test]
    fn sorted_is_ranked_and_bounded(
        entries in entries_strategy(),
        order in order_strategy(),
        limit in 1usize..25,
    ) {
        let total = entries.len();
        let sorted = to_sorted(to_state(entries), order, limit);
        prop_assert_eq!(sorted.len(), total.min(limit));
        for pair in sorted.windows(2) {
            prop_assert_eq!(order.rank(&pair[0], &pair[1]), std::cmp::Ordering::Less);
        }
    }
}
