// Copyright 2026 The onedrive-rs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The error type used by the client library.

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The core error returned by all client library functions.
///
/// The client library distinguishes several classes of problems: requests
/// rejected before any network traffic (`validation`), errors reported by the
/// service (`service`), responses that break the upload protocol
/// (`protocol`), upload sources that end early (`truncated`), and plain
/// transport failures (`io`, `timeout`). Applications rarely need more than
/// the predicate that matches the class they want to handle:
///
/// ```
/// use onedrive::Error;
/// fn handle(e: Error) {
///     if e.is_service() {
///         if let Some(detail) = e.service_error() {
///             eprintln!("the service rejected the request: {detail}");
///         }
///     } else if e.is_timeout() {
///         eprintln!("maybe try again later: {e}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

/// A `Result` alias where the `Err` case is `onedrive::Error`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The caller-supplied arguments were rejected before any request was
    /// sent.
    pub fn validation<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Validation,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the request was rejected before it was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation)
    }

    /// The service response violates the upload protocol.
    ///
    /// The source is usually an [UploadError][crate::UploadError] naming the
    /// violated expectation.
    pub fn protocol<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Protocol,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the service response violated the upload protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, ErrorKind::Protocol)
    }

    /// The upload source ran out of data before the promised size.
    pub fn truncated<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::DataTruncated,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the upload source ran out of data early.
    pub fn is_truncated(&self) -> bool {
        matches!(self.kind, ErrorKind::DataTruncated)
    }

    /// A request body could not be serialized.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if a request body could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// A response body could not be deserialized.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if a response body could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// The request exceeded its deadline or was cancelled in flight.
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the request ran out of time or was cancelled.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Could not complete an I/O operation while talking to the service.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the error is a network-level I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport(d) if matches!(
            **d,
            TransportDetails {
                status_code: None,
                headers: None,
                payload: None,
            }
        ))
    }

    /// The service failed with an HTTP status, and the body did not decode as
    /// the structured error shape.
    ///
    /// The display of these errors preserves the literal status line and the
    /// raw body text.
    pub fn http(status_code: u16, headers: http::HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            headers: Some(headers),
            payload: Some(payload),
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: None,
        }
    }

    /// Returns `true` for transport failures of any form, with or without an
    /// HTTP status.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }

    /// The service rejected the request with a structured error payload.
    pub fn service(error: DriveError) -> Self {
        let details = ServiceDetails {
            status_code: None,
            headers: None,
            error,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// As [service][Error::service], keeping the HTTP status code and headers
    /// of the response.
    pub fn service_with_http_metadata(
        error: DriveError,
        status_code: Option<u16>,
        headers: Option<http::HeaderMap>,
    ) -> Self {
        let details = ServiceDetails {
            status_code,
            headers,
            error,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// Returns `true` if the service rejected the request with a structured
    /// error payload.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service { .. })
    }

    /// The structured error payload returned by the service, if any.
    ///
    /// ```
    /// use onedrive::Error;
    /// fn print_request_id(e: &Error) {
    ///     if let Some(inner) = e.service_error().and_then(|d| d.inner_error.as_ref()) {
    ///         println!("failed request id: {}", inner.request_id);
    ///     }
    /// }
    /// ```
    pub fn service_error(&self) -> Option<&DriveError> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().error),
            _ => None,
        }
    }

    /// The HTTP status code, if the error carries one.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The HTTP response headers, if the error carries them.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            ErrorKind::Service(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }

    /// The raw HTTP response body, if the error carries one.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Validation, Some(e)) => {
                write!(f, "cannot build a valid request from the arguments: {e}")
            }
            (ErrorKind::Protocol, Some(e)) => {
                write!(f, "the service violated the upload protocol: {e}")
            }
            (ErrorKind::DataTruncated, Some(e)) => {
                write!(f, "unexpected end of the upload data: {e}")
            }
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Transport(details), _) => details.display(self.source_ref(), f),
            (ErrorKind::Service(d), _) => {
                write!(f, "the service reports an error: {}", d.error)
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source_ref()
    }
}

impl Error {
    fn source_ref(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Validation,
    Protocol,
    DataTruncated,
    Serialization,
    Deserialization,
    Timeout,
    Transport(Box<TransportDetails>),
    Service(Box<ServiceDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    headers: Option<http::HeaderMap>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn std::error::Error + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                    ..
                },
            ) => {
                let status = status_line(*code);
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{status}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{status}] error: {p:?}")
                }
            }
            (Some(source), _) => {
                write!(f, "the transport reports an error: {source}")
            }
            (None, _) => unreachable!("no Error constructor allows this"),
        }
    }
}

/// The status line for a code, e.g. `404 Not Found`.
fn status_line(code: u16) -> String {
    match http::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}

#[derive(Debug)]
struct ServiceDetails {
    status_code: Option<u16>,
    headers: Option<http::HeaderMap>,
    error: DriveError,
}

/// The structured error payload returned by the service.
///
/// Obtained via [Error::service_error]. Displays as
/// `"<code> - <message> (<date>)"`, or `"<code> - <message>"` when the
/// service supplied no inner error.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriveError {
    pub code: String,
    pub message: String,
    pub localized_message: String,
    pub inner_error: Option<InnerError>,
}

/// Diagnostic details attached to a [DriveError].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct InnerError {
    pub date: String,
    #[serde(rename = "request-id")]
    pub request_id: String,
    #[serde(rename = "client-request-id")]
    pub client_request_id: String,
}

impl std::fmt::Display for DriveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner_error {
            Some(inner) => write!(f, "{} - {} ({})", self.code, self.message, inner.date),
            None => write!(f, "{} - {}", self.code, self.message),
        }
    }
}

impl std::error::Error for DriveError {}

/// The envelope the service wraps error payloads in.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub(crate) struct ErrorResponse {
    pub(crate) error: Option<DriveError>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation() {
        let error = Error::validation("item id must not be empty");
        assert!(error.is_validation(), "{error:?}");
        assert!(!error.is_service(), "{error:?}");
        assert!(
            error.to_string().contains("item id must not be empty"),
            "{error}"
        );
    }

    #[test]
    fn protocol() {
        let error = Error::protocol("next expected ranges is empty");
        assert!(error.is_protocol(), "{error:?}");
        assert!(std::error::Error::source(&error).is_some(), "{error:?}");
        assert!(
            error.to_string().contains("violated the upload protocol"),
            "{error}"
        );
        assert!(
            error.to_string().contains("next expected ranges is empty"),
            "{error}"
        );
    }

    #[test]
    fn truncated() {
        let error = Error::truncated("no data at offset 100");
        assert!(error.is_truncated(), "{error:?}");
        assert!(!error.is_protocol(), "{error:?}");
        assert!(
            error.to_string().contains("unexpected end of the upload data"),
            "{error}"
        );
    }

    #[test]
    fn serialization() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = Error::ser(source);
        assert!(error.is_serialization(), "{error:?}");
        assert!(!error.is_deserialization(), "{error:?}");
        assert!(std::error::Error::source(&error).is_some(), "{error:?}");
    }

    #[test]
    fn deserialization() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = Error::deser(source);
        assert!(error.is_deserialization(), "{error:?}");
        assert!(
            error.to_string().contains("cannot deserialize the response"),
            "{error}"
        );
    }

    #[test]
    fn timeout() {
        let source = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline exceeded");
        let error = Error::timeout(source);
        assert!(error.is_timeout(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        let got = std::error::Error::source(&error)
            .and_then(|e| e.downcast_ref::<std::io::Error>());
        assert!(got.is_some(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
    }

    #[test]
    fn io() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let error = Error::io(source);
        assert!(error.is_io(), "{error:?}");
        assert!(error.is_transport(), "{error:?}");
        assert!(error.to_string().contains("connection reset"), "{error}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.http_payload().is_none(), "{error:?}");
    }

    #[test]
    fn http() {
        let payload = bytes::Bytes::from_static(b"uh-oh");
        let error = Error::http(416, http::HeaderMap::new(), payload.clone());
        assert!(error.is_transport(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(416));
        assert_eq!(error.http_payload(), Some(&payload));
        assert!(error.http_headers().is_some(), "{error:?}");
        let msg = error.to_string();
        assert!(msg.contains("416 Range Not Satisfiable"), "{msg}");
        assert!(msg.contains("uh-oh"), "{msg}");
    }

    #[test]
    fn http_unknown_status() {
        let error = Error::http(599, http::HeaderMap::new(), bytes::Bytes::from_static(b"?"));
        assert!(error.to_string().contains("[599]"), "{error}");
    }

    #[test]
    fn service() {
        let detail = DriveError {
            code: "itemNotFound".to_string(),
            message: "The resource could not be found.".to_string(),
            ..Default::default()
        };
        let error = Error::service(detail.clone());
        assert!(error.is_service(), "{error:?}");
        assert!(std::error::Error::source(&error).is_none(), "{error:?}");
        assert_eq!(error.service_error(), Some(&detail));
        assert!(
            error
                .to_string()
                .contains("itemNotFound - The resource could not be found."),
            "{error}"
        );
    }

    #[test]
    fn service_with_http_metadata() {
        let detail = DriveError {
            code: "accessDenied".to_string(),
            message: "Access denied".to_string(),
            ..Default::default()
        };
        let error = Error::service_with_http_metadata(detail, Some(403), Some(http::HeaderMap::new()));
        assert!(error.is_service(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(403));
        assert!(error.http_headers().is_some(), "{error:?}");
        assert!(error.http_payload().is_none(), "{error:?}");
    }

    #[test]
    fn drive_error_display_with_inner() {
        let detail = DriveError {
            code: "nameAlreadyExists".to_string(),
            message: "An item with the same name already exists.".to_string(),
            inner_error: Some(InnerError {
                date: "2026-08-22T04:10:33".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            detail.to_string(),
            "nameAlreadyExists - An item with the same name already exists. (2026-08-22T04:10:33)"
        );
    }

    #[test]
    fn drive_error_display_without_inner() {
        let detail = DriveError {
            code: "invalidRequest".to_string(),
            message: "Bad request".to_string(),
            ..Default::default()
        };
        assert_eq!(detail.to_string(), "invalidRequest - Bad request");
    }

    #[test]
    fn error_response_decodes_full_payload() {
        let body = json!({
            "error": {
                "code": "quotaLimitReached",
                "message": "Insufficient space available",
                "localizedMessage": "No hay espacio",
                "innerError": {
                    "date": "2026-08-22T04:10:33",
                    "request-id": "req-123",
                    "client-request-id": "cli-456"
                }
            }
        });
        let decoded = serde_json::from_value::<ErrorResponse>(body).unwrap();
        let detail = decoded.error.expect("error payload");
        assert_eq!(detail.code, "quotaLimitReached");
        assert_eq!(detail.localized_message, "No hay espacio");
        let inner = detail.inner_error.expect("inner error");
        assert_eq!(inner.request_id, "req-123");
        assert_eq!(inner.client_request_id, "cli-456");
        assert_eq!(inner.date, "2026-08-22T04:10:33");
    }

    #[test]
    fn error_response_tolerates_missing_error() {
        let decoded = serde_json::from_value::<ErrorResponse>(json!({})).unwrap();
        assert!(decoded.error.is_none());
    }
}
