use std::error::Error;

use medimeet_core::errors::{MeetError, MeetResult, NETWORK_ERROR_MESSAGE};

#[test]
fn test_meet_error_display() {
    let validation = MeetError::Validation("Please select a date".to_string());
    let authentication = MeetError::Authentication("Session expired".to_string());
    let authorization = MeetError::Authorization("Access denied".to_string());
    let not_found = MeetError::NotFound("Appointment not found".to_string());
    let conflict = MeetError::Conflict("Email already exists".to_string());
    let network = MeetError::Network(NETWORK_ERROR_MESSAGE.to_string());
    let server = MeetError::Server {
        status: 500,
        message: "Error: boom".to_string(),
    };
    let internal = MeetError::Internal(eyre::eyre!("bad payload"));

    assert_eq!(validation.to_string(), "Validation error: Please select a date");
    assert_eq!(authentication.to_string(), "Authentication error: Session expired");
    assert_eq!(authorization.to_string(), "Authorization error: Access denied");
    assert_eq!(not_found.to_string(), "Resource not found: Appointment not found");
    assert_eq!(conflict.to_string(), "Conflict: Email already exists");
    assert!(network.to_string().starts_with("Network error:"));
    assert_eq!(server.to_string(), "Server error (500): Error: boom");
    assert!(internal.to_string().contains("Internal error:"));
}

#[test]
fn test_message_drops_category_prefix() {
    let err = MeetError::Validation("Please select a time".to_string());
    assert_eq!(err.message(), "Please select a time");

    let err = MeetError::Server {
        status: 503,
        message: "Maintenance".to_string(),
    };
    assert_eq!(err.message(), "Maintenance");
}

#[test]
fn test_only_authentication_requires_login() {
    assert!(MeetError::Authentication("expired".into()).requires_login());
    assert!(!MeetError::Authorization("forbidden".into()).requires_login());
    assert!(!MeetError::Network("offline".into()).requires_login());
}

#[test]
fn test_from_eyre_report() {
    let err: MeetError = eyre::eyre!("decode failed").into();
    assert!(matches!(err, MeetError::Internal(_)));
    assert!(err.message().contains("decode failed"));
}

#[test]
fn test_meet_result() {
    let result: MeetResult<i32> = Ok(42);
    assert_eq!(result.ok(), Some(42));

    let result: MeetResult<i32> = Err(MeetError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_leaf_variants_have_no_source() {
    let err = MeetError::Conflict("exists".into());
    assert!(err.source().is_none());
}
