use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2003.as_str(), "E2003");
}

#[test]
fn test_phase_classification() {
    assert!(ErrorCode::E1007.is_resolution_error());
    assert!(!ErrorCode::E1007.is_type_error());
    assert!(ErrorCode::E2001.is_type_error());
    assert!(ErrorCode::E9001.is_internal());
    assert!(!ErrorCode::E9001.is_resolution_error());
}

#[test]
fn test_descriptions_are_distinct() {
    let codes = [
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E9001,
    ];
    let unique: std::collections::HashSet<_> = codes.iter().map(ErrorCode::description).collect();
    assert_eq!(unique.len(), codes.len());
}
