//! Uniform success/error response envelope used at service boundaries.

use crate::error::SvcError;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An enumerated `{code, message}` pair.
///
/// Only [`ResultCode::SUCCESS`] and [`ResultCode::ERROR`] are defined at this
/// layer; consumers declare their own constants for service-specific codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCode {
    pub code: i32,
    pub message: &'static str,
}

impl ResultCode {
    /// Operation completed.
    pub const SUCCESS: ResultCode = ResultCode::new(0, "success");
    /// Generic failure.
    pub const ERROR: ResultCode = ResultCode::new(500, "error");

    /// Declares a result code. Intended for consumer-side constants.
    #[must_use]
    pub const fn new(code: i32, message: &'static str) -> Self {
        Self { code, message }
    }
}

/// Uniform response envelope returned at service boundaries.
///
/// Serializes to the stable layout
/// `{"code": int, "message": string, "data": any|null, "timestamp": int64}`
/// with the timestamp in milliseconds since the epoch. The envelope is
/// immutable after construction; `data` is populated only on success paths
/// by convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Creates a success envelope carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        let mut response = Self::with_code(ResultCode::SUCCESS.code, ResultCode::SUCCESS.message);
        response.data = Some(data);
        response
    }

    /// Creates an error envelope with the generic failure code.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_code(ResultCode::ERROR.code, message)
    }

    /// Creates an envelope from an enumerated result code.
    #[must_use]
    pub fn from_code(code: ResultCode) -> Self {
        Self::with_code(code.code, code.message)
    }

    /// Creates an envelope from an enumerated code with an overriding message.
    #[must_use]
    pub fn from_code_with_message(code: ResultCode, message: impl Into<String>) -> Self {
        Self::with_code(code.code, message)
    }

    /// Converts a raised error into an error envelope.
    ///
    /// This is the single designated error-to-envelope conversion; it is
    /// expected to run exactly once, at the outermost request boundary.
    #[must_use]
    pub fn from_error(error: &SvcError) -> Self {
        Self::with_code(error.code(), error.message())
    }

    /// Whether the code denotes success. Derived solely from `code`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ResultCode::SUCCESS.code
    }
}

impl ApiResponse<()> {
    /// Creates a success envelope without a payload.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self::with_code(ResultCode::SUCCESS.code, ResultCode::SUCCESS.message)
    }
}

impl<T> From<&SvcError> for ApiResponse<T> {
    fn from(error: &SvcError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data() {
        let response = ApiResponse::ok(42);
        assert!(response.is_success());
        assert_eq!(response.code, ResultCode::SUCCESS.code);
        assert_eq!(response.data, Some(42));
        assert!(response.timestamp > 0);
    }

    #[test]
    fn empty_success_has_no_data() {
        let response = ApiResponse::ok_empty();
        assert!(response.is_success());
        assert!(response.data.is_none());
    }

    #[test]
    fn error_carries_message_and_no_data() {
        let response: ApiResponse<String> = ApiResponse::error("boom");
        assert!(!response.is_success());
        assert_eq!(response.message, "boom");
        assert!(response.data.is_none());
    }

    #[test]
    fn code_distinguishes_success_from_error() {
        assert!(ApiResponse::ok(1).is_success());
        assert!(!ApiResponse::<()>::from_code(ResultCode::ERROR).is_success());
    }

    #[test]
    fn envelope_from_error_preserves_code_and_message() {
        let err = SvcError::business_code(40401, "user not found");
        let response: ApiResponse<()> = ApiResponse::from_error(&err);
        assert_eq!(response.code, 40401);
        assert_eq!(response.message, "user not found");
    }

    #[test]
    fn json_layout_is_stable() {
        let response = ApiResponse::ok("payload");
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"], "payload");
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn error_serializes_data_as_null() {
        let response: ApiResponse<String> = ApiResponse::error("oops");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"data\":null"));
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let response = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_string(&response).unwrap();
        let parsed: ApiResponse<Vec<i32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.code, response.code);
        assert_eq!(parsed.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn consumers_can_extend_result_codes() {
        const ORDER_CLOSED: ResultCode = ResultCode::new(40901, "order closed");
        let response: ApiResponse<()> = ApiResponse::from_code(ORDER_CLOSED);
        assert_eq!(response.code, 40901);
        assert_eq!(response.message, "order closed");
    }
}
