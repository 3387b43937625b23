//! Tests for customer and address identifiers

use core_kernel::{CustomerId, PostalCode};
use proptest::prelude::*;

mod customer_id_tests {
    use super::*;

    #[test]
    fn test_ordering_follows_numeric_value() {
        assert!(CustomerId::new(2) < CustomerId::new(10));
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&CustomerId::new(7)).unwrap();
        assert_eq!(json, "7");

        let back: CustomerId = serde_json::from_str("7").unwrap();
        assert_eq!(back, CustomerId::new(7));
    }

    #[test]
    fn test_i64_conversion() {
        let id = CustomerId::from(99);
        let raw: i64 = id.into();
        assert_eq!(raw, 99);
        assert_eq!(id.value(), 99);
    }
}

mod postal_code_tests {
    use super::*;

    #[test]
    fn test_deserialization_normalizes() {
        let code: PostalCode = serde_json::from_str("\"01001000\"").unwrap();
        assert_eq!(code.as_str(), "01001-000");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"01001-000\"");
    }

    #[test]
    fn test_empty_is_sentinel() {
        assert!(PostalCode::empty().is_empty());
        assert!(PostalCode::new("   ").is_empty());
        assert!(!PostalCode::new("01001-000").is_empty());
    }

    #[test]
    fn test_digits_strips_punctuation() {
        assert_eq!(PostalCode::new("01001-000").digits(), "01001000");
        assert_eq!(PostalCode::new("12.345-678").digits(), "12345678");
    }

    proptest! {
        #[test]
        fn prop_eight_digit_codes_share_one_key(digits in "[0-9]{8}") {
            let hyphenated = format!("{}-{}", &digits[..5], &digits[5..]);
            prop_assert_eq!(PostalCode::new(&digits), PostalCode::new(&hyphenated));
        }

        #[test]
        fn prop_normalization_is_idempotent(raw in "\\PC{0,12}") {
            let once = PostalCode::new(&raw);
            let twice = PostalCode::new(once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
