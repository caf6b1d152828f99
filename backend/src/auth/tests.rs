use super::*;

#[test]
fn test_validate_bearer_success() {
    assert!(validate_bearer("Bearer supersecrettoken", "supersecrettoken").is_ok());
}

#[test]
fn test_validate_bearer_wrong_token() {
    let result = validate_bearer("Bearer wrong", "supersecrettoken");
    assert!(result.is_err());
}

#[test]
fn test_validate_bearer_missing_scheme() {
    let result = validate_bearer("supersecrettoken", "supersecrettoken");
    assert!(result.is_err());
}

#[test]
fn test_validate_admin_id_success() {
    let admin_id = validate_admin_id("111", &[111, 222]).expect("known admin should pass");
    assert_eq!(admin_id, 111);
}

#[test]
fn test_validate_admin_id_unknown() {
    let result = validate_admin_id("333", &[111, 222]);
    assert!(result.is_err());
}

#[test]
fn test_validate_admin_id_not_numeric() {
    let result = validate_admin_id("not-a-number", &[111, 222]);
    assert!(result.is_err());
}
