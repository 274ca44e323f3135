//! Property tests for quoted-symbol extraction.

use jsmend_types::symbol::{extract_symbol, is_identifier};
use proptest::prelude::*;

proptest! {
    #[test]
    fn never_panics_on_arbitrary_messages(message in ".{0,80}") {
        let _ = extract_symbol(&message);
    }

    #[test]
    fn finds_identifier_inside_prose(
        prefix in "[a-zA-Z ,.:()]{0,30}",
        name in "[a-zA-Z_$][a-zA-Z0-9_$]{0,12}",
        suffix in "[a-zA-Z ,.:()]{0,30}",
    ) {
        let message = format!("{prefix}'{name}'{suffix}");
        prop_assert_eq!(extract_symbol(&message), Some(name));
    }

    #[test]
    fn extracted_names_from_identifiers_are_identifiers(name in "[a-z][a-zA-Z0-9]{0,10}") {
        let got = extract_symbol(&format!("\"{name}\" is not defined")).unwrap();
        prop_assert!(is_identifier(&got));
    }
}
