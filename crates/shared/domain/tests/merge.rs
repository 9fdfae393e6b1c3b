use proptest::prelude::*;
use trellis_domain::{Map, PropertyBag, Value, merge};

fn small_map() -> impl Strategy<Value = Map> {
    proptest::collection::vec(("[a-e]", 0..100_i64), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

proptest! {
    #[test]
    fn over_wins_and_no_key_is_lost(over in small_map(), under in small_map()) {
        let merged = merge(&over, &under);

        for (key, value) in &over {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in &under {
            if !over.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        prop_assert!(merged.keys().all(|k| over.contains_key(k) || under.contains_key(k)));
    }

    #[test]
    fn under_keys_keep_their_position(over in small_map(), under in small_map()) {
        let merged = merge(&over, &under);
        let head: Vec<_> = merged.keys().take(under.len()).collect();
        let expected: Vec<_> = under.keys().collect();
        prop_assert_eq!(head, expected);
    }

    #[test]
    fn a_bag_reads_back_what_was_set(values in small_map()) {
        let mut bag = PropertyBag::default();
        bag.load(values.clone());
        prop_assert_eq!(bag.to_map(), values);
    }
}
