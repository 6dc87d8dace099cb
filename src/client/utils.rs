use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use watson_voice_types::ServiceError;

use crate::error::{Error, Result, Service};

/// Appends `segments` to the endpoint's path, percent-encoding each one.
///
/// A trailing slash on the endpoint is ignored. Empty, `.` and `..`
/// segments are refused so a value can never reshape the path.
pub fn endpoint_url(service: Service, endpoint: &str, segments: &[&str]) -> Result<reqwest::Url> {
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(Error::configuration(format!(
            "{service}: invalid path segment {segment:?}"
        )));
    }

    let mut url = reqwest::Url::parse(endpoint.trim_end_matches('/'))
        .map_err(|e| Error::configuration(format!("{service}: invalid endpoint {endpoint:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| Error::configuration(format!("{service}: endpoint {endpoint:?} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Reads the body of a 2xx response. Anything else becomes a transport error.
pub async fn success_body(service: Service, response: reqwest::Response) -> Result<Vec<u8>> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::transport(service, e))?
        .to_vec();

    if !status.is_success() {
        return Err(Error::transport(service, error_detail(status, &body)));
    }
    Ok(body)
}

/// Status plus the service's own error message when the body carries one.
pub fn error_detail(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ServiceError>(body) {
        Ok(error) => format!("{status}: {error}"),
        Err(_) => format!("{status}: {}", String::from_utf8_lossy(body).trim()),
    }
}

pub fn parse_json<T: DeserializeOwned>(service: Service, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::serialization(service, e))
}
