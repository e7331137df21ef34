//! ==============================================================================
//! lib.rs - shared types for the signup demo
//! ==============================================================================
//!
//! purpose:
//!     defines the wire types exchanged between the dashboard and the
//!     signup worker. both sides serialize the same structs so the
//!     request body the dashboard sends is exactly what the worker parses.
//!
//! relationships:
//!     - used by: dashboard (SignupRequest payload)
//!     - used by: workers/signup-api (SignupRequest, ErrorCode, ErrorResponse)
//!
//! validation:
//!     field rules live on SignupRequest itself (validator derive), so the
//!     worker rejects what the dashboard could never have built by hand.
//!
//! ==============================================================================

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

// ==============================================================================
// signup payload
// ==============================================================================

/// signup request body
///
/// wire format:
/// {"id": "...", "pw": "...", "email": "...", "nickname": "...", "phone": "..."}
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// login id
    #[validate(custom(function = "not_blank"))]
    pub id: String,
    /// plain password, only ever sent over the wire
    #[serde(rename = "pw")]
    #[validate(custom(function = "password_rule"))]
    pub password: String,
    #[validate(custom(function = "not_blank"), email(message = "email format is invalid"))]
    pub email: String,
    #[validate(custom(function = "nickname_rule"))]
    pub nickname: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
}

impl SignupRequest {
    pub fn new(
        id: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        nickname: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            password: password.into(),
            email: email.into(),
            nickname: nickname.into(),
            phone: phone.into(),
        }
    }
}

// keep the password out of logs
impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("nickname", &self.nickname)
            .field("phone", &self.phone)
            .finish()
    }
}

// ==============================================================================
// field rules
// ==============================================================================

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("blank", "value is required"));
    }
    Ok(())
}

/// 4-16 ascii letters and digits, at least one of each
fn password_rule(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    let len_ok = (4..=16).contains(&value.len());
    let charset_ok = value.chars().all(|c| c.is_ascii_alphanumeric());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());

    if len_ok && charset_ok && has_digit && has_letter {
        Ok(())
    } else {
        Err(rule_error(
            "password_format",
            "4 to 16 characters mixing letters and digits",
        ))
    }
}

/// a korean/latin/digit lead character followed by 1-10 more characters
fn nickname_rule(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    let mut chars = value.chars();
    let lead_ok = chars.next().is_some_and(is_nickname_lead);
    let rest: Vec<char> = chars.collect();
    let rest_ok = (1..=10).contains(&rest.len()) && !rest.iter().copied().any(is_line_terminator);

    if lead_ok && rest_ok {
        Ok(())
    } else {
        Err(rule_error(
            "nickname_format",
            "2 to 11 characters starting with a korean letter, latin letter or digit",
        ))
    }
}

fn is_nickname_lead(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '|'
        || ('ㄱ'..='ㅎ').contains(&c)
        || ('ㅏ'..='ㅣ').contains(&c)
        || ('가'..='힣').contains(&c)
}

// characters a regex `.` never matches
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// ==============================================================================
// error responses
// ==============================================================================

/// error codes returned by the signup api
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidParameter,
    DuplicateId,
    DuplicateEmail,
    DuplicateNickname,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::InvalidParameter => 400,
            ErrorCode::DuplicateId | ErrorCode::DuplicateEmail | ErrorCode::DuplicateNickname => 409,
            ErrorCode::InternalError => 500,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "invalid request data",
            ErrorCode::DuplicateId => "id is already taken",
            ErrorCode::DuplicateEmail => "email is already registered",
            ErrorCode::DuplicateNickname => "nickname is already taken",
            ErrorCode::InternalError => "internal server error",
        }
    }
}

/// one rejected field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// wire name of the field (`pw`, not `password`)
    pub field: String,
    pub code: String,
    pub message: String,
}

/// json body of every non-2xx signup response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<ErrorCode> for ErrorResponse {
    fn from(code: ErrorCode) -> Self {
        Self {
            status: code.status(),
            code,
            message: code.message().to_string(),
            errors: Vec::new(),
        }
    }
}

impl ErrorResponse {
    /// invalid parameter response listing every failed field, sorted by field name
    pub fn invalid(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = wire_field_name(&field).to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        Self {
            errors: fields,
            ..Self::from(ErrorCode::InvalidParameter)
        }
    }
}

fn wire_field_name(field: &str) -> &str {
    match field {
        "password" => "pw",
        other => other,
    }
}

// ==============================================================================
// tests
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_request() -> SignupRequest {
        SignupRequest::new("test02", "qwer123123", "test02@naver.com", "test02", "010-1234-1234")
    }

    #[test]
    fn test_password_serialized_as_pw() {
        let json = serde_json::to_string(&demo_request()).unwrap();
        assert_eq!(
            json,
            r#"{"id":"test02","pw":"qwer123123","email":"test02@naver.com","nickname":"test02","phone":"010-1234-1234"}"#
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", demo_request());
        assert!(!debug.contains("qwer123123"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_demo_request_is_valid() {
        assert!(demo_request().validate().is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert!(password_rule("abc1").is_ok());
        assert!(password_rule("a1b2c3d4e5f6g7h8").is_ok());
        // too short, too long
        assert!(password_rule("ab1").is_err());
        assert!(password_rule("a1b2c3d4e5f6g7h8i").is_err());
        // letters only, digits only
        assert!(password_rule("abcdefgh").is_err());
        assert!(password_rule("12345678").is_err());
        // symbols are not allowed
        assert!(password_rule("abc123!").is_err());
    }

    #[test]
    fn test_nickname_rules() {
        assert!(nickname_rule("ab").is_ok());
        assert!(nickname_rule("홍길동").is_ok());
        assert!(nickname_rule("ㄱa").is_ok());
        assert!(nickname_rule("a2345678901").is_ok());
        // a single character is too short
        assert!(nickname_rule("a").is_err());
        // 12 characters is too long
        assert!(nickname_rule("a23456789012").is_err());
        // lead character must not be punctuation
        assert!(nickname_rule("_abc").is_err());
        assert!(nickname_rule("a\nb").is_err());
    }

    #[test]
    fn test_nickname_rejects_unicode_line_breaks() {
        assert!(nickname_rule("ab\u{0085}").is_err());
        assert!(nickname_rule("ab\u{2028}").is_err());
        assert!(nickname_rule("ab\u{2029}").is_err());
        // other non-ascii characters after the lead are fine
        assert!(nickname_rule("ab\u{00e9}").is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let mut req = demo_request();
        req.phone = "   ".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_invalid_response_uses_wire_names() {
        let mut req = demo_request();
        req.password = "short".to_string();
        req.email = "not-an-email".to_string();
        let errors = req.validate().unwrap_err();

        let response = ErrorResponse::invalid(&errors);
        assert_eq!(response.status, 400);
        assert_eq!(response.code, ErrorCode::InvalidParameter);

        let fields: Vec<&str> = response.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "pw"]);
        assert_eq!(response.errors[1].code, "password_format");
    }

    #[test]
    fn test_error_code_serialization() {
        let response = ErrorResponse::from(ErrorCode::DuplicateId);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":\"DUPLICATE_ID\""));
        assert!(json.contains("\"status\":409"));
        // no field list for non-validation errors
        assert!(!json.contains("errors"));
    }
}
