use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// HTTP verbs the tester can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Only POST and PUT carry a JSON payload.
    fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Decoded response payload: JSON when it parses, raw text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    /// Placeholder body recorded for requests that never got a response
    pub fn empty_object() -> Self {
        ResponseBody::Json(Value::Object(serde_json::Map::new()))
    }

    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            ResponseBody::Json(value) => value.as_object(),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            ResponseBody::Json(value) => value.as_array(),
            ResponseBody::Text(_) => None,
        }
    }

    /// First `max_chars` characters of the rendered body
    pub fn preview(&self, max_chars: usize) -> String {
        self.to_string().chars().take(max_chars).collect()
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// Thin wrapper over `reqwest::Client` rooted at `{base_url}/api`
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url, endpoint)
    }

    /// Build request headers.
    ///
    /// Caller-supplied headers replace the JSON content-type default. The bearer
    /// token is added unless the caller already set `Authorization`.
    pub fn build_headers(
        &self,
        headers: Option<&[(&str, &str)]>,
        token: Option<&str>,
    ) -> Result<HeaderMap, ClientError> {
        let mut map = HeaderMap::new();

        match headers {
            Some(pairs) => {
                for (name, value) in pairs {
                    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                        ClientError::InvalidHeader {
                            name: name.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    map.insert(header_name, header_value(name, value)?);
                }
            }
            None => {
                map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
        }

        if let Some(token) = token {
            if !map.contains_key(AUTHORIZATION) {
                let bearer = format!("Bearer {}", token);
                map.insert(AUTHORIZATION, header_value("Authorization", &bearer)?);
            }
        }

        Ok(map)
    }

    /// Issue one request and decode the body. Non-2xx statuses are not errors.
    pub async fn send(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        headers: Option<&[(&str, &str)]>,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint_url(endpoint);
        let header_map = self.build_headers(headers, token)?;

        let mut req = self
            .http
            .request(method.to_reqwest(), &url)
            .headers(header_map);

        if method.sends_body() {
            if let Some(body) = body {
                req = req.json(body);
            }
        }

        log::debug!("{} {}", method, url);
        let res = req.send().await?;
        let status = res.status().as_u16();
        let raw = res.text().await?;
        log::debug!("{} {} -> {} ({} bytes)", method, url, status, raw.len());

        Ok(ApiResponse {
            status,
            body: ResponseBody::parse(raw),
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).expect("client builds")
    }

    #[test]
    fn test_endpoint_url() {
        let c = client("https://example.com/");
        assert_eq!(c.api_url(), "https://example.com/api");
        assert_eq!(c.endpoint_url(""), "https://example.com/api/");
        assert_eq!(
            c.endpoint_url("market/price/RELIANCE"),
            "https://example.com/api/market/price/RELIANCE"
        );
    }

    #[test]
    fn test_default_headers_without_token() {
        let headers = client("http://h").build_headers(None, None).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_bearer_injected() {
        let headers = client("http://h").build_headers(None, Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_caller_authorization_wins() {
        let custom = [("Authorization", "Bearer mine")];
        let headers = client("http://h")
            .build_headers(Some(&custom), Some("abc"))
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer mine");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let custom = [("bad header", "x")];
        let err = client("http://h")
            .build_headers(Some(&custom), None)
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }

    #[test]
    fn test_response_body_parse() {
        assert_eq!(
            ResponseBody::parse(r#"{"ok":true}"#.to_string()),
            ResponseBody::Json(json!({"ok": true}))
        );
        assert_eq!(
            ResponseBody::parse("<html>".to_string()),
            ResponseBody::Text("<html>".to_string())
        );
        assert_eq!(
            ResponseBody::parse(String::new()),
            ResponseBody::Text(String::new())
        );
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        let body = ResponseBody::Text("é".repeat(300));
        assert_eq!(body.preview(200).chars().count(), 200);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!(HttpMethod::Put.sends_body());
        assert!(!HttpMethod::Get.sends_body());
    }
}
