use super::*;

// =============================================================
// UserProfile decoding
// =============================================================

#[test]
fn user_profile_numeric_id_defaults_role_to_user() {
    let user: UserProfile = serde_json::from_value(serde_json::json!({ "id": 1 })).unwrap();
    assert_eq!(user.id, UserId::Number(1));
    assert_eq!(user.role, Role::User);
    assert!(user.display_name.is_none());
    assert!(!user.is_admin());
}

#[test]
fn user_profile_accepts_document_id_and_first_name() {
    let user: UserProfile = serde_json::from_value(serde_json::json!({
        "_id": "65f0c0ffee",
        "firstName": "Ada",
        "role": "admin",
        "emailId": "ada@x.com",
        "problemSolved": []
    }))
    .unwrap();
    assert_eq!(user.id, UserId::Text("65f0c0ffee".to_owned()));
    assert_eq!(user.display_name.as_deref(), Some("Ada"));
    assert!(user.is_admin());
    assert_eq!(user.extra.get("emailId").and_then(|v| v.as_str()), Some("ada@x.com"));
    assert!(user.extra.contains_key("problemSolved"));
    assert!(!user.extra.contains_key("_id"));
}

#[test]
fn user_profile_unknown_role_is_rejected() {
    let result = serde_json::from_value::<UserProfile>(serde_json::json!({ "id": 2, "role": "root" }));
    assert!(result.is_err());
}

#[test]
fn user_id_display() {
    assert_eq!(UserId::Number(42).to_string(), "42");
    assert_eq!(UserId::Text("abc".to_owned()).to_string(), "abc");
}

// =============================================================
// Request payloads
// =============================================================

#[test]
fn register_input_serializes_camel_case() {
    let input = RegisterInput {
        first_name: "A".to_owned(),
        email_id: "a@x.com".to_owned(),
        password: "p".to_owned(),
    };
    let json = serde_json::to_value(&input).unwrap();
    assert_eq!(json, serde_json::json!({ "firstName": "A", "emailId": "a@x.com", "password": "p" }));
}

#[test]
fn credentials_debug_hides_password() {
    let creds = Credentials { email_id: "a@x.com".to_owned(), password: "hunter2".to_owned() };
    let debug = format!("{creds:?}");
    assert!(debug.contains("a@x.com"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn register_input_debug_hides_password() {
    let input = RegisterInput {
        first_name: "A".to_owned(),
        email_id: "a@x.com".to_owned(),
        password: "hunter2".to_owned(),
    };
    assert!(!format!("{input:?}").contains("hunter2"));
}

// =============================================================
// Error messages
// =============================================================

#[test]
fn extract_error_message_reads_message_field() {
    assert_eq!(extract_error_message(r#"{"message":"Invalid Credentials"}"#).as_deref(), Some("Invalid Credentials"));
}

#[test]
fn extract_error_message_plain_text() {
    assert_eq!(extract_error_message("Error: email already exists\n").as_deref(), Some("Error: email already exists"));
}

#[test]
fn extract_error_message_json_string() {
    assert_eq!(extract_error_message(r#""Invalid token""#).as_deref(), Some("Invalid token"));
}

#[test]
fn extract_error_message_empty_or_messageless() {
    assert_eq!(extract_error_message("   "), None);
    assert_eq!(extract_error_message(r#"{"error":true}"#), None);
}

#[test]
fn user_message_prefers_service_message() {
    let failure = AuthFailure::Rejected { status: 400, message: Some("Weak password".to_owned()) };
    assert_eq!(failure.user_message("Registration failed."), "Weak password");
}

#[test]
fn user_message_without_body_names_status() {
    let failure = AuthFailure::Rejected { status: 500, message: None };
    assert_eq!(failure.user_message("Login failed."), "request failed with status code 500");
}

#[test]
fn user_message_falls_back_when_blank() {
    assert_eq!(AuthFailure::Transport(String::new()).user_message("Login failed."), "Login failed.");
    assert_eq!(AuthFailure::NotAuthenticated.user_message("Login failed."), "Login failed.");
}
