use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::http::response::ResponseSnapshot;
use crate::model::Method;
use crate::{Result, RusuiteError};

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<String>,
    ) -> Result<ResponseSnapshot> {
        let url = url::Url::parse(url)?;
        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut req = self
            .inner
            .request(method, url)
            .headers(build_header_map(headers)?);

        if let Some(body) = body {
            req = req.body(body);
        }

        let start = std::time::Instant::now();
        let response = req.send().await?;
        let duration = start.elapsed();

        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let body = response.text().await?;

        Ok(ResponseSnapshot {
            status,
            headers,
            body,
            duration_ms: duration.as_millis() as u64,
        })
    }
}

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| RusuiteError::ParseError(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| RusuiteError::ParseError(format!("Invalid header value '{}': {}", key, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// HeaderMap -> HashMap，非 UTF-8 的值丢弃
fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_header_map() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let map = build_header_map(&headers).unwrap();
        assert_eq!(map.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_build_header_map_rejects_invalid_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        assert!(build_header_map(&headers).is_err());
    }
}
