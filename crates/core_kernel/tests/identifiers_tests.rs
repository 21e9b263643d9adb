//! Comprehensive unit tests for the Identifiers module
//!
//! Tests cover code newtypes, bill number parsing, formatting,
//! ordering, and serde behaviour.

use core_kernel::identifiers::IdentifierError;
use core_kernel::{BillNo, CompanyId, FinYearId, ItemCode, RunId, UserId};

mod code_tests {
    use super::*;

    #[test]
    fn test_codes_preserve_text() {
        let company = CompanyId::new("UP-332").unwrap();
        let item = ItemCode::new("IMFL-0091").unwrap();
        let user = UserId::new("clerk01").unwrap();
        let year = FinYearId::new("2324").unwrap();

        assert_eq!(company.as_str(), "UP-332");
        assert_eq!(item.as_str(), "IMFL-0091");
        assert_eq!(user.to_string(), "clerk01");
        assert_eq!(year.as_str(), "2324");
    }

    #[test]
    fn test_codes_trim_whitespace() {
        let item = ItemCode::new("  750-GOA \n").unwrap();
        assert_eq!(item.as_str(), "750-GOA");
    }

    #[test]
    fn test_empty_code_is_rejected() {
        assert!(matches!(
            ItemCode::new(""),
            Err(IdentifierError::Empty { kind: "item" })
        ));
        assert!(matches!(
            CompanyId::new(" \t "),
            Err(IdentifierError::Empty { kind: "company" })
        ));
    }

    #[test]
    fn test_codes_parse_from_str() {
        let company: CompanyId = "UP-332".parse().unwrap();
        assert_eq!(company, CompanyId::new("UP-332").unwrap());
    }

    #[test]
    fn test_code_ordering_is_lexical() {
        let a = ItemCode::new("AAA").unwrap();
        let b = ItemCode::new("BBB").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_json_serialization() {
        let item = ItemCode::new("IMFL-0091").unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, "\"IMFL-0091\"");
        let back: ItemCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}

mod bill_no_tests {
    use super::*;

    #[test]
    fn test_display_pads_to_minimum_width() {
        assert_eq!(BillNo::from_suffix(0).to_string(), "BL0000");
        assert_eq!(BillNo::from_suffix(42).to_string(), "BL0042");
        assert_eq!(BillNo::from_suffix(9999).to_string(), "BL9999");
    }

    #[test]
    fn test_display_does_not_truncate_wide_suffixes() {
        assert_eq!(BillNo::from_suffix(123_456).to_string(), "BL123456");
    }

    #[test]
    fn test_parse_accepts_padded_and_unpadded() {
        assert_eq!("BL0042".parse::<BillNo>().unwrap().suffix(), 42);
        assert_eq!("BL42".parse::<BillNo>().unwrap().suffix(), 42);
        assert_eq!("  BL0042 ".parse::<BillNo>().unwrap().suffix(), 42);
    }

    #[test]
    fn test_parse_rejects_wrong_prefix() {
        assert!(matches!(
            "INV0042".parse::<BillNo>(),
            Err(IdentifierError::MalformedBillNo { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_digit_suffix() {
        assert!("BL00 42".parse::<BillNo>().is_err());
        assert!("BL-42".parse::<BillNo>().is_err());
        assert!("BL".parse::<BillNo>().is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_suffix() {
        assert!(matches!(
            "BL4294967296".parse::<BillNo>(),
            Err(IdentifierError::SuffixOutOfRange { .. })
        ));
    }

    #[test]
    fn test_numeric_ordering() {
        let mut bills: Vec<BillNo> = ["BL0010", "BL0002", "BL0001"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        bills.sort();
        let rendered: Vec<String> = bills.iter().map(|b| b.to_string()).collect();
        assert_eq!(rendered, vec!["BL0001", "BL0002", "BL0010"]);
    }

    #[test]
    fn test_next_and_prev_are_inverse() {
        let bill = BillNo::from_suffix(17);
        assert_eq!(bill.next().prev(), Some(bill));
        assert_eq!(BillNo::from_suffix(0).prev(), None);
    }

    #[test]
    fn test_serde_uses_canonical_text() {
        let bill = BillNo::from_suffix(42);
        let json = serde_json::to_string(&bill).unwrap();
        assert_eq!(json, "\"BL0042\"");
        let back: BillNo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bill);
    }
}

mod run_id_tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_run_ids_are_time_ordered() {
        let first = RunId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = RunId::new();
        assert!(first.as_uuid() < second.as_uuid());
    }

    #[test]
    fn test_run_id_display_round_trip() {
        let id = RunId::new();
        assert!(id.to_string().starts_with("RUN-"));
        let parsed: RunId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
