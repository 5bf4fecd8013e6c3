use bytes::Bytes;
use chrono::{TimeZone, Utc};
use llsd::Llsd;
use proptest::prelude::*;
use url::Url;
use uuid::Uuid;

/// arbitrary map keys for use with proptest
pub fn arb_key() -> impl Strategy<Value = String> { "[a-zA-Z_][a-zA-Z0-9_]{0,15}" }

/// arbitrary text that survives every codec
pub fn arb_text() -> impl Strategy<Value = String> { "[a-zA-Z0-9 <>&'\"._-]{0,24}" }

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

/// arbitrary absolute URL for use with proptest
pub fn arb_url() -> impl Strategy<Value = Url> {
    "[a-z]{1,10}".prop_filter_map("unparsable host", |host| {
        Url::parse(&format!("http://{}.example.com/", host)).ok()
    })
}

/// arbitrary dates with whole seconds, which every codec reproduces exactly
pub fn arb_date() -> impl Strategy<Value = Llsd> {
    (0i64..4_000_000_000).prop_filter_map("date out of range", |secs| {
        Utc.timestamp_opt(secs, 0).single().map(Llsd::from_date)
    })
}

/// arbitrary tree for use with proptest
pub fn arb_llsd() -> impl Strategy<Value = Llsd> {
    let leaf = prop_oneof![
        Just(Llsd::Unknown),
        any::<bool>().prop_map(Llsd::from_boolean),
        any::<i32>().prop_map(Llsd::from_integer),
        prop::num::f64::NORMAL.prop_map(Llsd::from_real),
        arb_text().prop_map(Llsd::from_string),
        any::<u128>().prop_map(|n| Llsd::from_uuid(Uuid::from_u128(n))),
        arb_date(),
        arb_url().prop_map(|u| Llsd::from_uri(Some(u))),
        arb_bs().prop_map(Llsd::from_binary),
    ];
    leaf.prop_recursive(
        20, // max depth
        20, // max nodes
        20, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Llsd::Array),
                prop::collection::hash_map(arb_key(), inner, 0..10)
                    .prop_map(|m| Llsd::Map(m.into_iter().collect()))
            ]
        },
    )
}

/// arbitrary tree restricted to the kinds JSON carries natively
pub fn arb_json_llsd() -> impl Strategy<Value = Llsd> {
    let leaf = prop_oneof![
        Just(Llsd::Unknown),
        any::<bool>().prop_map(Llsd::from_boolean),
        any::<i32>().prop_map(Llsd::from_integer),
        prop::num::f64::NORMAL.prop_map(Llsd::from_real),
        arb_text().prop_map(Llsd::from_string),
    ];
    leaf.prop_recursive(10, 20, 10, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..10).prop_map(Llsd::Array),
            prop::collection::hash_map(arb_key(), inner, 0..10)
                .prop_map(|m| Llsd::Map(m.into_iter().collect()))
        ]
    })
}
