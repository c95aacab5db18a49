//! backend resource probe
//!
//! [probe] forwards an inbound request to the backend and classifies the response into a
//! [ProbeOutcome]: the resource is missing, it exists and answered with a success status, or it
//! exists but answered with something else.
//!
//! Every call opens its own connection and releases it before returning. There is no retry and
//! no timeout beyond the transport's default. Redirects are not followed: a redirect status is
//! classified like any other status.
use indexmap::IndexMap;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_LENGTH};
use reqwest::Method;
use std::io::Read;

/// Header name to value, in the order they were received
pub type Headers = IndexMap<String, String>;

const DEFAULT_ACCEPT: &str = "application/json";

/// The inbound request, as far as the probe needs to know about it
#[derive(Debug, Clone, derive_new::new)]
pub struct Environment {
    /// `http` or `https`
    pub scheme: String,
    pub server_name: String,
    pub server_port: u16,
    pub path: String,
    #[new(default)]
    pub headers: Headers,
}

impl Environment {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_secure(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("https")
    }

    fn origin(&self) -> String {
        let scheme = if self.is_secure() { "https" } else { "http" };
        if self.server_name.contains(':') {
            format!("{scheme}://[{}]:{}", self.server_name, self.server_port)
        } else {
            format!("{scheme}://{}:{}", self.server_name, self.server_port)
        }
    }
}

/// What to send to the backend
///
/// Unset (or empty) `method` and `path` fall back to `GET` and the inbound request's path.
#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    pub method: Option<String>,
    pub path: Option<String>,
    pub fetch_body: bool,
    pub query_string: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl ProbeRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn fetch_body(mut self, fetch_body: bool) -> Self {
        self.fetch_body = fetch_body;
        self
    }

    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = Some(query_string.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn resolved_method(&self) -> &str {
        self.method
            .as_deref()
            .filter(|method| !method.is_empty())
            .unwrap_or("GET")
    }

    fn url(&self, environment: &Environment) -> String {
        let path = self
            .path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(&environment.path);

        let mut url = environment.origin();
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);

        if let Some(query) = self.query_string.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Backend answered 404 or 413
    NotFound { status: u16 },
    /// Backend answered 200, 201 or 204
    ///
    /// `body` is empty unless it was requested.
    Success {
        status: u16,
        headers: Headers,
        #[serde(serialize_with = "serialize_body")]
        body: Vec<u8>,
    },
    /// Any other status
    OtherStatus { status: u16, headers: Headers },
}

impl ProbeOutcome {
    pub fn exists(&self) -> bool {
        !matches!(self, ProbeOutcome::NotFound { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            ProbeOutcome::NotFound { status }
            | ProbeOutcome::Success { status, .. }
            | ProbeOutcome::OtherStatus { status, .. } => *status,
        }
    }

    /// `(exists, headers, body, status)`
    pub fn into_parts(self) -> (bool, Headers, Option<Vec<u8>>, u16) {
        match self {
            ProbeOutcome::NotFound { status } => (false, Headers::new(), None, status),
            ProbeOutcome::Success {
                status,
                headers,
                body,
            } => (true, headers, Some(body), status),
            ProbeOutcome::OtherStatus { status, headers } => (true, headers, None, status),
        }
    }
}

fn serialize_body<S: serde::Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("Invalid request method {0:?}")]
    InvalidMethod(String),
    #[error("Invalid header {name:?}")]
    InvalidHeader { name: String },
    #[error("Backend request failed")]
    Transport(#[from] reqwest::Error),
    #[error("Unable to read backend response body")]
    Body(#[from] std::io::Error),
}

/// Forward a request to the backend and classify its answer
///
/// Transport failures are returned as [ProbeError], never as an outcome.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(server = %environment.server_name, port = environment.server_port)
)]
pub fn probe(environment: &Environment, request: &ProbeRequest) -> Result<ProbeOutcome, ProbeError> {
    let method = request.resolved_method();
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| ProbeError::InvalidMethod(method.to_string()))?;
    let url = request.url(environment);
    let headers = forwarded_headers(&environment.headers)?;

    // no idle connections are kept, so the connection goes away with the response
    let client = Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let mut outbound = client.request(method.clone(), &url).headers(headers);
    if let Some(body) = &request.body {
        outbound = outbound.body(body.clone());
    }

    tracing::info!(%method, %url, "forwarding request to backend");
    let response = outbound.send()?;
    let status = response.status().as_u16();

    let outcome = match status {
        404 | 413 => ProbeOutcome::NotFound { status },
        200 | 201 | 204 => {
            let headers = collect_headers(response.headers());
            let body = if request.fetch_body {
                read_body(response)?
            } else {
                Vec::new()
            };
            ProbeOutcome::Success {
                status,
                headers,
                body,
            }
        }
        _ => ProbeOutcome::OtherStatus {
            status,
            headers: collect_headers(response.headers()),
        },
    };

    tracing::info!(status, exists = outcome.exists(), "backend answered");
    Ok(outcome)
}

/// `Accept: application/json`, overwritten by whatever the inbound request carries
fn forwarded_headers(inbound: &Headers) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 1);
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

    for (name, value) in inbound {
        let invalid = || ProbeError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Repeated headers are joined with `", "`
fn collect_headers(headers: &HeaderMap) -> Headers {
    headers
        .keys()
        .map(|name| {
            let values: Vec<_> = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect();
            (name.as_str().to_string(), values.join(", "))
        })
        .collect()
}

/// Read at most `content-length` bytes when the backend sent one, otherwise until the end
fn read_body(response: Response) -> Result<Vec<u8>, ProbeError> {
    let content_length = response.headers().get(CONTENT_LENGTH).and_then(|value| {
        let parsed = value.to_str().ok().and_then(|v| v.trim().parse::<u64>().ok());
        if parsed.is_none() {
            tracing::warn!(?value, "ignoring unparsable content-length");
        }
        parsed
    });

    let mut body = Vec::new();
    match content_length {
        Some(length) => response.take(length).read_to_end(&mut body)?,
        None => {
            let mut response = response;
            response.read_to_end(&mut body)?
        }
    };

    Ok(body)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn environment() -> Environment {
        Environment::new("http".into(), "backend".into(), 8774, "/v2/servers/1".into())
    }

    #[test]
    fn url_defaults_to_inbound_path() {
        assert_eq!(
            ProbeRequest::default().url(&environment()),
            "http://backend:8774/v2/servers/1"
        );
        assert_eq!(
            ProbeRequest::get("").url(&environment()),
            "http://backend:8774/v2/servers/1"
        );
    }

    #[test]
    fn url_with_explicit_path_and_query() {
        let request = ProbeRequest::get("v2/images").query_string("limit=1");
        assert_eq!(request.url(&environment()), "http://backend:8774/v2/images?limit=1");

        let request = ProbeRequest::get("/v2/images").query_string("");
        assert_eq!(request.url(&environment()), "http://backend:8774/v2/images");
    }

    #[test]
    fn url_scheme_and_host() {
        let mut environment = environment();
        environment.scheme = "HTTPS".into();
        environment.server_name = "::1".into();

        assert!(environment.is_secure());
        assert_eq!(
            ProbeRequest::get("/x").url(&environment),
            "https://[::1]:8774/x"
        );
    }

    #[test]
    fn method_defaults_to_get() {
        assert_eq!(ProbeRequest::default().resolved_method(), "GET");
        assert_eq!(ProbeRequest::default().method("").resolved_method(), "GET");
        assert_eq!(ProbeRequest::default().method("HEAD").resolved_method(), "HEAD");
    }

    #[test]
    fn inbound_accept_overrides_default() {
        let mut inbound = Headers::new();
        assert_eq!(
            forwarded_headers(&inbound).unwrap().get(ACCEPT).unwrap(),
            "application/json"
        );

        inbound.insert("accept".into(), "application/xml".into());
        inbound.insert("X-Auth-Token".into(), "secret".into());
        let headers = forwarded_headers(&inbound).unwrap();

        assert_eq!(headers.get(ACCEPT).unwrap(), "application/xml");
        assert_eq!(headers.get("x-auth-token").unwrap(), "secret");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn invalid_header_name() {
        let mut inbound = Headers::new();
        inbound.insert("bad header".into(), "value".into());

        assert!(matches!(
            forwarded_headers(&inbound),
            Err(ProbeError::InvalidHeader { name }) if name == "bad header"
        ));
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.insert("etag", HeaderValue::from_static("x"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let collected = collect_headers(&headers);

        assert_eq!(collected.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
        assert_eq!(collected.get("etag").map(String::as_str), Some("x"));
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn outcome_into_parts() {
        assert_eq!(
            ProbeOutcome::NotFound { status: 413 }.into_parts(),
            (false, Headers::new(), None, 413)
        );

        let headers: Headers = [("etag".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(
            ProbeOutcome::Success {
                status: 204,
                headers: headers.clone(),
                body: vec![]
            }
            .into_parts(),
            (true, headers.clone(), Some(vec![]), 204)
        );
        assert_eq!(
            ProbeOutcome::OtherStatus {
                status: 500,
                headers: headers.clone()
            }
            .into_parts(),
            (true, headers, None, 500)
        );
    }
}
