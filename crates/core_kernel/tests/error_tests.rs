//! Tests for core_kernel error types

use core_kernel::calendar::CalendarError;
use core_kernel::error::CoreError;
use core_kernel::identifiers::IdentifierError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Bill not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Bill not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_from_identifier_error() {
    let identifier_error = IdentifierError::Empty { kind: "company" };
    let core_error: CoreError = identifier_error.into();

    assert!(matches!(core_error, CoreError::Identifier(_)));
}

#[test]
fn test_core_error_from_calendar_error() {
    let calendar_error = CalendarError::InvalidDay { day: 40 };
    let core_error: CoreError = calendar_error.into();

    assert!(matches!(core_error, CoreError::Calendar(_)));
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}
