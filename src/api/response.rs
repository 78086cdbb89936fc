//! Interpretation of generation endpoint responses.
//!
//! The checks run in a fixed order: content type, JSON body, HTTP status,
//! result field. Each one short-circuits the rest.

use serde_json::Value;

use crate::error::{GenerateError, ProtocolError, RemoteError};

/// Field carrying the generated image's location
const RESULT_FIELD: &str = "imageUrl";
/// Field carrying a server-supplied error message
const ERROR_FIELD: &str = "error";

/// Reject anything that is not a JSON media type, before the body is read.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), ProtocolError> {
    match content_type {
        Some(value) if is_json_media_type(value) => Ok(()),
        other => Err(ProtocolError::UnexpectedContentType(other.map(str::to_owned))),
    }
}

/// Parse the body and map status plus fields to an outcome.
pub fn interpret_body(status: u16, body: &[u8]) -> Result<String, GenerateError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ProtocolError::MalformedBody(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(RemoteError {
            status,
            message: error_message(&value, status),
        }
        .into());
    }

    value
        .get(RESULT_FIELD)
        .and_then(Value::as_str)
        .filter(|location| !location.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ProtocolError::MissingResult.into())
}

/// `application/json`, or any `+json` structured suffix, ignoring parameters
fn is_json_media_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn error_message(body: &Value, status: u16) -> String {
    body.get(ERROR_FIELD)
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    /// Same sequence the client runs over a live response
    fn interpret_response(
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<String, GenerateError> {
        check_content_type(content_type)?;
        interpret_body(status, body)
    }

    #[test]
    fn test_success() {
        let result = interpret_response(200, JSON, br#"{"imageUrl": "https://x/out.png"}"#);
        assert_eq!(result.unwrap(), "https://x/out.png");
    }

    #[test]
    fn test_content_type_with_charset() {
        let result = interpret_response(
            201,
            Some("Application/JSON; charset=utf-8"),
            br#"{"imageUrl": "https://x/out.png"}"#,
        );
        assert_eq!(result.unwrap(), "https://x/out.png");

        assert!(check_content_type(Some("application/problem+json")).is_ok());
    }

    #[test]
    fn test_html_rejected_before_parsing() {
        // Body is not JSON either; the content type error must win
        let err = interpret_response(502, Some("text/html"), b"<html>Bad Gateway</html>")
            .unwrap_err();
        assert_eq!(err.to_string(), "ProtocolError: unexpected content type");
        assert_eq!(
            err,
            GenerateError::Protocol(ProtocolError::UnexpectedContentType(Some(
                "text/html".into()
            )))
        );
    }

    #[test]
    fn test_missing_content_type() {
        let err = interpret_response(200, None, br#"{"imageUrl": "x"}"#).unwrap_err();
        assert_eq!(err, GenerateError::from(ProtocolError::UnexpectedContentType(None)));
    }

    #[test]
    fn test_malformed_body() {
        let err = interpret_response(200, JSON, b"{\"imageUrl\": ").unwrap_err();
        assert_eq!(err.to_string(), "ProtocolError: malformed body");
    }

    #[test]
    fn test_remote_error_message() {
        let err = interpret_response(500, JSON, br#"{"error": "overloaded"}"#).unwrap_err();
        assert_eq!(err.to_string(), "RemoteError: overloaded");
        assert_eq!(
            err,
            GenerateError::Remote(RemoteError {
                status: 500,
                message: "overloaded".into()
            })
        );
    }

    #[test]
    fn test_remote_error_without_message() {
        let err = interpret_response(404, JSON, b"{}").unwrap_err();
        assert_eq!(err.to_string(), "RemoteError: HTTP error! status: 404");

        let err = interpret_response(503, JSON, br#"{"error": ""}"#).unwrap_err();
        assert_eq!(err.to_string(), "RemoteError: HTTP error! status: 503");
    }

    #[test]
    fn test_remote_error_wins_over_result_field() {
        let err = interpret_response(
            400,
            JSON,
            br#"{"error": "bad prompt", "imageUrl": "https://x/out.png"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "RemoteError: bad prompt");
    }

    #[test]
    fn test_missing_result() {
        let bodies: [&[u8]; 5] = [
            br#"{"status": "done"}"#,
            br#"{"imageUrl": ""}"#,
            br#"{"imageUrl": null}"#,
            br#"{"imageUrl": 42}"#,
            b"[]",
        ];
        for body in bodies {
            let err = interpret_response(200, JSON, body).unwrap_err();
            assert_eq!(err.to_string(), "ProtocolError: missing result");
        }
    }
}
