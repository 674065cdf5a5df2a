//! The backend's uniform response envelope.
//!
//! Every JSON endpoint answers `{success, data?, message?}`. A
//! `success: false` body is an application error even when the HTTP
//! status is 200, and its `message` (or a default) is what the UI
//! shows. Binary endpoints don't use the envelope at all — they are
//! validated by HTTP status and content type.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;
use super::transport::RawResponse;

/// Shown when the backend fails without a message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "The request could not be completed";

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn parse_envelope<T: DeserializeOwned>(raw: &RawResponse) -> Result<Envelope<T>, ApiError> {
    serde_json::from_slice(&raw.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a data-carrying envelope response.
pub fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, ApiError> {
    check_http(raw)?;
    let envelope: Envelope<T> = parse_envelope(raw)?;
    if !envelope.success {
        return Err(ApiError::Application(
            envelope.message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.into()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("envelope is missing 'data'".into()))
}

/// Decode an envelope response where no data is expected.
pub fn decode_unit(raw: &RawResponse) -> Result<(), ApiError> {
    check_http(raw)?;
    let envelope: Envelope<Value> = parse_envelope(raw)?;
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Application(
            envelope.message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.into()),
        ))
    }
}

/// Non-2xx responses still often carry an envelope with a usable
/// message; surface it when present, fall back to the bare status.
fn check_http(raw: &RawResponse) -> Result<(), ApiError> {
    if (200..300).contains(&raw.status) {
        return Ok(());
    }
    if let Ok(envelope) = serde_json::from_slice::<Envelope<Value>>(&raw.body) {
        if let Some(message) = envelope.message {
            return Err(ApiError::Application(message));
        }
    }
    Err(ApiError::Http(raw.status))
}

/// Decode a binary endpoint response (PDF/CSV export, report).
///
/// Validated by HTTP 200 and content type only. A JSON body in place
/// of the expected binary means the backend reported an error; its
/// message is surfaced instead of the raw bytes.
pub fn decode_binary(raw: &RawResponse, expected_type: &str) -> Result<Vec<u8>, ApiError> {
    if raw.status != 200 {
        return Err(ApiError::ExportFailed(raw.status));
    }
    match &raw.content_type {
        Some(ct) if ct.starts_with(expected_type) => Ok(raw.body.clone()),
        Some(ct) if ct.starts_with("application/json") => {
            let envelope: Envelope<Value> = parse_envelope(raw)?;
            Err(ApiError::Application(
                envelope.message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.into()),
            ))
        }
        Some(ct) => Err(ApiError::UnexpectedContentType(ct.clone())),
        None => Err(ApiError::UnexpectedContentType("<missing>".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_yields_data() {
        let raw = RawResponse::json(200, json!({"success": true, "data": {"n": 7}}));
        let value: Value = decode(&raw).unwrap();
        assert_eq!(value["n"], 7);
    }

    #[test]
    fn failure_on_http_200_is_an_application_error() {
        let raw = RawResponse::json(200, json!({"success": false, "message": "Patient id required"}));
        let err = decode::<Value>(&raw).unwrap_err();
        match err {
            ApiError::Application(message) => assert_eq!(message, "Patient id required"),
            other => panic!("Expected Application, got: {other}"),
        }
    }

    #[test]
    fn failure_without_message_uses_default() {
        let raw = RawResponse::json(200, json!({"success": false}));
        let err = decode::<Value>(&raw).unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn missing_data_on_success_is_a_decode_error() {
        let raw = RawResponse::json(200, json!({"success": true}));
        let err = decode::<Value>(&raw).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn unit_decode_accepts_dataless_success() {
        let raw = RawResponse::json(200, json!({"success": true}));
        assert!(decode_unit(&raw).is_ok());
    }

    #[test]
    fn http_error_with_envelope_message_surfaces_it() {
        let raw = RawResponse::json(404, json!({"success": false, "message": "No such template"}));
        let err = decode::<Value>(&raw).unwrap_err();
        assert_eq!(err.to_string(), "No such template");
    }

    #[test]
    fn http_error_without_envelope_is_bare_status() {
        let raw = RawResponse {
            status: 502,
            content_type: Some("text/html".into()),
            body: b"<html>Bad Gateway</html>".to_vec(),
        };
        let err = decode::<Value>(&raw).unwrap_err();
        assert!(matches!(err, ApiError::Http(502)));
    }

    #[test]
    fn binary_decode_checks_content_type() {
        let raw = RawResponse {
            status: 200,
            content_type: Some("application/pdf".into()),
            body: vec![0x25, 0x50, 0x44, 0x46],
        };
        let bytes = decode_binary(&raw, "application/pdf").unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn binary_decode_rejects_non_200() {
        let raw = RawResponse {
            status: 500,
            content_type: Some("application/pdf".into()),
            body: vec![],
        };
        assert!(matches!(
            decode_binary(&raw, "application/pdf").unwrap_err(),
            ApiError::ExportFailed(500)
        ));
    }

    #[test]
    fn binary_decode_surfaces_json_error_body() {
        let raw = RawResponse::json(200, json!({"success": false, "message": "Popup blocked"}));
        let err = decode_binary(&raw, "application/pdf").unwrap_err();
        assert_eq!(err.to_string(), "Popup blocked");
    }
}
