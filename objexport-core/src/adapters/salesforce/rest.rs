//! REST endpoint construction and error body decoding.

use serde::Deserialize;
use url::Url;

use crate::Result;
use crate::error::ObjExportError;
use crate::models::ObjectSummary;

/// Target name used in errors raised by the global describe
pub(crate) const GLOBAL_TARGET: &str = "global";

/// Body of `GET /services/data/vXX.X/sobjects`.
#[derive(Debug, Deserialize)]
pub(crate) struct GlobalDescribeResponse {
    pub(crate) sobjects: Vec<ObjectSummary>,
}

/// One element of a Salesforce REST error body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Builds `{instance}/services/data/v{api}`.
pub(crate) fn api_base(instance_url: &Url, api_version: &str) -> Result<Url> {
    let mut base = instance_url.clone();
    base.set_query(None);
    base.set_fragment(None);
    let version = format!("v{api_version}");
    join_segments(&base, &["services", "data", version.as_str()])
}

/// `{base}/sobjects`
pub(crate) fn global_describe_url(base: &Url) -> Result<Url> {
    join_segments(base, &["sobjects"])
}

/// `{base}/sobjects/{name}/describe`, with `name` percent-encoded as one segment.
pub(crate) fn object_describe_url(base: &Url, name: &str) -> Result<Url> {
    if name.is_empty() {
        return Err(ObjExportError::configuration("Object name cannot be empty"));
    }
    join_segments(base, &["sobjects", name, "describe"])
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ObjExportError::configuration(format!("'{base}' cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turns a non-success response into the matching error.
///
/// 401 means the session is invalid or expired and maps to
/// `Authentication`. Everything else becomes `Describe`, carrying the first
/// `errorCode`/`message` pair of the body when it can be decoded.
pub(crate) fn error_from_response(target: &str, status: u16, body: &str) -> ObjExportError {
    let first = serde_json::from_str::<Vec<ApiError>>(body)
        .ok()
        .and_then(|errors| errors.into_iter().next());

    let (error_code, message) = match first {
        Some(ApiError {
            error_code,
            message,
        }) => (
            error_code.unwrap_or_else(|| "UNKNOWN".to_string()),
            message.unwrap_or_default(),
        ),
        None => ("UNKNOWN".to_string(), truncate(body.trim(), 200)),
    };

    if status == 401 {
        return ObjExportError::authentication(format!(
            "Session rejected by org ({error_code}): {message}"
        ));
    }

    ObjExportError::describe_failed(target, status, error_code, message)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
