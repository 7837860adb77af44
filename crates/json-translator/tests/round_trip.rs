use json_translator::{JsonTranslator, MapKey, Mapping, Record, Translator};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 8.0)),
        "[a-z/é ]{0,8}".prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z0-9]{0,3}", inner), 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_key() -> impl Strategy<Value = MapKey> {
    prop_oneof![
        any::<i64>().prop_map(MapKey::Int),
        "[a-z0-9/]{0,4}".prop_map(MapKey::from),
    ]
}

fn arb_mapping() -> impl Strategy<Value = Mapping> {
    prop::collection::vec((arb_key(), arb_value()), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn test_mapping_round_trip(mapping in arb_mapping()) {
        let translator = JsonTranslator::default();
        let text = translator.encode_mapping(&mapping).unwrap();
        let decoded = translator.decode_to_mapping(&text).unwrap();
        prop_assert_eq!(decoded, mapping);
    }

    #[test]
    fn test_record_matches_mapping(mapping in arb_mapping()) {
        let translator = JsonTranslator::default();
        let record = Record::from(Value::from(mapping.clone()));
        let text = translator.encode_record(&record).unwrap();
        prop_assert_eq!(&text, &translator.encode_mapping(&mapping).unwrap());
        prop_assert_eq!(translator.decode_to_mapping(&text).unwrap(), mapping);
    }
}
