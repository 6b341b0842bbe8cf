//! # Request Builder (`common::http::request`)
//!
//! File: cli/src/common/http/request.rs
//!
//! ## Overview
//!
//! Turns a logical `Endpoint` (method, path, query, body) into a
//! `PreparedRequest`: a fully qualified URL plus the exact headers and body
//! that will go on the wire. The prepared request is plain data, so the
//! dry-run printer can show precisely what the transport would send.
//!
//! ## URL resolution
//!
//! - An absolute `http(s)://` path is used verbatim.
//! - Otherwise the base URL comes from the configuration: `base_url` wins,
//!   then `host` (`http://<host>/YamahaExtendedControl`, keeping any scheme
//!   the host already has).
//! - API suffixes are rooted under the normalized API prefix (`/v1`).
//! - Query parameters are appended to whatever query the URL already has.
//!
use crate::core::config::{ConnectionConfig, DEFAULT_API_PREFIX};
use crate::core::error::MusiccastError;
use base64::Engine;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

/// Control path every receiver serves its API under.
pub const PRODUCT_PATH: &str = "/YamahaExtendedControl";

/// Content type of every body the client sends.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where an endpoint lives relative to the configured receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointPath {
    /// A complete URL, used as-is.
    Absolute(String),
    /// A path joined directly onto the base URL (e.g. `/v1/system/getFeatures`).
    Rooted(String),
    /// A suffix rooted under the API prefix (e.g. `main/setVolume`).
    Api(String),
}

impl EndpointPath {
    /// Classifies a user-supplied path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_absolute_url(trimmed) {
            EndpointPath::Absolute(trimmed.to_string())
        } else if trimmed.starts_with('/') {
            EndpointPath::Rooted(trimmed.to_string())
        } else {
            EndpointPath::Api(trimmed.to_string())
        }
    }
}

/// # Endpoint Reference (`Endpoint`)
///
/// A logical description of one outbound call before URL resolution.
/// Built once per invocation by a command and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: EndpointPath,
    /// Ordered multi-map; repeated keys are kept.
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl Endpoint {
    pub fn new(method: Method, path: EndpointPath) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    /// `GET` on an API suffix.
    pub fn get(suffix: impl Into<String>) -> Self {
        Self::new(Method::GET, EndpointPath::Api(suffix.into()))
    }

    /// `POST` of a JSON document to an API suffix.
    pub fn post_json(suffix: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(Method::POST, EndpointPath::Api(suffix.into())).body(body, JSON_CONTENT_TYPE)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn body(mut self, body: Vec<u8>, content_type: &str) -> Self {
        self.body = Some(body);
        self.content_type = Some(content_type.to_string());
        self
    }
}

/// # Prepared Request (`PreparedRequest`)
///
/// The fully resolved request. Headers keep the casing they will be
/// printed with in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// # Build Request (`build_request`)
///
/// Resolves `endpoint` against `config`.
///
/// ## Errors
///
/// `MusiccastError::Config` when neither base URL nor host is configured,
/// when the resolved URL does not parse, or when an extra header is not a
/// valid HTTP header.
pub fn build_request(
    config: &ConnectionConfig,
    endpoint: &Endpoint,
) -> Result<PreparedRequest, MusiccastError> {
    let url = build_url(config, &endpoint.path, &endpoint.query)?;

    let body = endpoint.body.clone().filter(|b| !b.is_empty());
    let mut headers: Vec<(String, String)> = Vec::new();
    if let (Some(_), Some(content_type)) = (&body, &endpoint.content_type) {
        headers.push(("Content-Type".to_string(), content_type.clone()));
    }

    for header in &config.headers {
        validate_header(&header.key, &header.value)?;
        // At most one content type per request.
        if header.key.eq_ignore_ascii_case("content-type") {
            if let Some(existing) = headers
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            {
                existing.1 = header.value.clone();
                continue;
            }
        }
        headers.push((header.key.clone(), header.value.clone()));
    }

    let has_authorization = headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("authorization"));
    if let (Some(auth), false) = (&config.auth, has_authorization) {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", auth.user, auth.pass));
        headers.push(("Authorization".to_string(), format!("Basic {token}")));
    }

    Ok(PreparedRequest {
        method: endpoint.method.clone(),
        url,
        headers,
        body,
    })
}

/// Resolves the path to a full URL and merges `query` into it.
pub fn build_url(
    config: &ConnectionConfig,
    path: &EndpointPath,
    query: &[(String, String)],
) -> Result<String, MusiccastError> {
    let target = match path {
        EndpointPath::Absolute(url) => url.clone(),
        EndpointPath::Rooted(rooted) => join_path(&base_url(config)?, rooted),
        EndpointPath::Api(suffix) => join_path(
            &base_url(config)?,
            &api_path(&config.api_prefix, suffix),
        ),
    };

    let mut url = Url::parse(&target)
        .map_err(|e| MusiccastError::Config(format!("Invalid URL '{}': {}", target, e)))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

/// The receiver's base URL, without a trailing slash.
pub fn base_url(config: &ConnectionConfig) -> Result<String, MusiccastError> {
    if let Some(base) = &config.base_url {
        return Ok(base.trim_end_matches('/').to_string());
    }
    let host = config
        .host
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| MusiccastError::Config("host or base-url is required".to_string()))?;
    if is_absolute_url(host) {
        Ok(format!("{}{}", host.trim_end_matches('/'), PRODUCT_PATH))
    } else {
        Ok(format!("http://{}{}", host, PRODUCT_PATH))
    }
}

/// `<prefix>/<suffix>` with the prefix normalized to one leading slash and
/// no trailing slash.
pub fn api_path(prefix: &str, suffix: &str) -> String {
    format!(
        "{}/{}",
        normalize_prefix(prefix),
        suffix.trim_start_matches('/')
    )
}

pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    let trimmed = if trimmed.is_empty() {
        DEFAULT_API_PREFIX
    } else {
        trimmed
    };
    let inner = trimmed.trim_matches('/');
    if inner.is_empty() {
        String::new()
    } else {
        format!("/{}", inner)
    }
}

fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn validate_header(key: &str, value: &str) -> Result<(), MusiccastError> {
    HeaderName::from_bytes(key.as_bytes())
        .map_err(|_| MusiccastError::Config(format!("Invalid header name '{}'", key)))?;
    HeaderValue::from_str(value)
        .map_err(|_| MusiccastError::Config(format!("Invalid value for header '{}'", key)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BasicAuth, Header};

    fn host_config(host: &str) -> ConnectionConfig {
        ConnectionConfig {
            host: Some(host.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_host_builds_product_url() {
        let url = build_url(
            &host_config("192.168.1.20"),
            &EndpointPath::Api("main/getStatus".into()),
            &[],
        )
        .unwrap();
        assert_eq!(
            url,
            "http://192.168.1.20/YamahaExtendedControl/v1/main/getStatus"
        );
    }

    #[test]
    fn test_host_with_scheme_is_preserved() {
        let url = build_url(
            &host_config("https://receiver.local/"),
            &EndpointPath::Api("system/getDeviceInfo".into()),
            &[],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://receiver.local/YamahaExtendedControl/v1/system/getDeviceInfo"
        );
    }

    #[test]
    fn test_base_url_takes_precedence_over_host() {
        let config = ConnectionConfig {
            host: Some("ignored".into()),
            base_url: Some("http://10.0.0.3:8080/YamahaExtendedControl/".into()),
            ..Default::default()
        };
        let url = build_url(&config, &EndpointPath::Api("/netusb/getPlayInfo".into()), &[]).unwrap();
        assert_eq!(
            url,
            "http://10.0.0.3:8080/YamahaExtendedControl/v1/netusb/getPlayInfo"
        );
    }

    #[test]
    fn test_single_slash_at_join_point() {
        for base in ["http://h/x", "http://h/x/", "http://h/x///"] {
            for suffix in ["a/b", "/a/b", "//a/b"] {
                let config = ConnectionConfig {
                    base_url: Some(base.into()),
                    ..Default::default()
                };
                let url = build_url(&config, &EndpointPath::Api(suffix.into()), &[]).unwrap();
                assert_eq!(url, "http://h/x/v1/a/b", "base={base} suffix={suffix}");
            }
        }
    }

    #[test]
    fn test_missing_host_is_configuration_error() {
        let err = build_url(
            &ConnectionConfig::default(),
            &EndpointPath::Api("main/getStatus".into()),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, MusiccastError::Config(msg) if msg.contains("host or base-url")));
    }

    #[test]
    fn test_absolute_path_needs_no_host() {
        let url = build_url(
            &ConnectionConfig::default(),
            &EndpointPath::Absolute("http://10.0.0.4/custom".into()),
            &[("a".into(), "1".into())],
        )
        .unwrap();
        assert_eq!(url, "http://10.0.0.4/custom?a=1");
    }

    #[test]
    fn test_query_merge_is_additive() {
        let url = build_url(
            &ConnectionConfig::default(),
            &EndpointPath::Absolute("http://h/p?keep=1&dup=a".into()),
            &[("dup".into(), "b".into()), ("new".into(), "x y&z".into())],
        )
        .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("keep".to_string(), "1".to_string()),
                ("dup".to_string(), "a".to_string()),
                ("dup".to_string(), "b".to_string()),
                ("new".to_string(), "x y&z".to_string()),
            ]
        );
        assert!(url.ends_with("new=x+y%26z"));
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(normalize_prefix(""), "/v1");
        assert_eq!(normalize_prefix("v2"), "/v2");
        assert_eq!(normalize_prefix("//v2//"), "/v2");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(api_path("v1/", "/zone/x"), "/v1/zone/x");
        assert_eq!(api_path("/", "system/x"), "/system/x");
    }

    #[test]
    fn test_rooted_path_skips_prefix() {
        let url = build_url(
            &host_config("h"),
            &EndpointPath::Rooted("/v2/system/getFeatures".into()),
            &[],
        )
        .unwrap();
        assert_eq!(url, "http://h/YamahaExtendedControl/v2/system/getFeatures");
    }

    #[test]
    fn test_endpoint_path_parse() {
        assert_eq!(
            EndpointPath::parse("https://x/y"),
            EndpointPath::Absolute("https://x/y".into())
        );
        assert_eq!(
            EndpointPath::parse("/v1/system/getFeatures"),
            EndpointPath::Rooted("/v1/system/getFeatures".into())
        );
        assert_eq!(
            EndpointPath::parse("system/getFeatures"),
            EndpointPath::Api("system/getFeatures".into())
        );
    }

    #[test]
    fn test_content_type_only_with_body() {
        let config = host_config("h");
        let empty = Endpoint::post_json("dist/setGroupName", Vec::new());
        let req = build_request(&config, &empty).unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());

        let full = Endpoint::post_json("dist/setGroupName", br#"{"name":"x"}"#.to_vec());
        let req = build_request(&config, &full).unwrap();
        assert_eq!(req.body.as_deref(), Some(&br#"{"name":"x"}"#[..]));
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn test_extra_content_type_replaces_instead_of_duplicating() {
        let config = ConnectionConfig {
            host: Some("h".into()),
            headers: vec![Header { key: "content-type".into(), value: "text/plain".into() }],
            ..Default::default()
        };
        let req = build_request(&config, &Endpoint::post_json("x", b"{}".to_vec())).unwrap();
        let content_types: Vec<_> = req
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(content_types[0].1, "text/plain");
    }

    #[test]
    fn test_basic_auth_header() {
        let config = ConnectionConfig {
            host: Some("h".into()),
            auth: Some(BasicAuth { user: "admin".into(), pass: "pw".into() }),
            ..Default::default()
        };
        let req = build_request(&config, &Endpoint::get("main/getStatus")).unwrap();
        assert_eq!(
            req.headers,
            vec![("Authorization".to_string(), "Basic YWRtaW46cHc=".to_string())]
        );
    }

    #[test]
    fn test_explicit_authorization_header_wins_over_auth() {
        let config = ConnectionConfig {
            host: Some("h".into()),
            headers: vec![Header { key: "authorization".into(), value: "Bearer t".into() }],
            auth: Some(BasicAuth { user: "admin".into(), pass: "pw".into() }),
            ..Default::default()
        };
        let req = build_request(&config, &Endpoint::get("main/getStatus")).unwrap();
        assert_eq!(
            req.headers,
            vec![("authorization".to_string(), "Bearer t".to_string())]
        );
    }

    #[test]
    fn test_invalid_header_value_is_configuration_error() {
        let config = ConnectionConfig {
            host: Some("h".into()),
            headers: vec![Header { key: "X-Bad".into(), value: "line\nbreak".into() }],
            ..Default::default()
        };
        assert!(matches!(
            build_request(&config, &Endpoint::get("x")),
            Err(MusiccastError::Config(_))
        ));
    }

    #[test]
    fn test_query_opt_skips_missing_values() {
        let endpoint = Endpoint::get("main/setToneControl")
            .query_opt("mode", Some("manual"))
            .query_opt::<i32>("bass", None)
            .query_opt("treble", Some(-2));
        assert_eq!(
            endpoint.query,
            vec![
                ("mode".to_string(), "manual".to_string()),
                ("treble".to_string(), "-2".to_string()),
            ]
        );
    }
}
