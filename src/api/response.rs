use crate::error::{HarnessError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub url: String,
}

impl ApiResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: String, url: String) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    /// Read status, headers and body from a blocking reqwest response
    pub fn from_blocking(response: reqwest::blocking::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.to_string(), value_str.to_string());
            }
        }

        let body = response
            .text()
            .map_err(|source| HarnessError::BodyDecode {
                url: url.clone(),
                source,
            })?;

        Ok(Self {
            status,
            headers,
            body,
            url,
        })
    }

    /// 2xx and 3xx count as success; everything else is a failure
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| HarnessError::Decode {
            origin: self.url.clone(),
            source,
        })
    }

    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(
            status,
            HashMap::from([("content-type".to_string(), "application/json".to_string())]),
            body.to_string(),
            "http://localhost/users".to_string(),
        )
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, "").is_success());
        assert!(response(302, "").is_success());
        assert!(response(404, "").is_error());
        assert!(response(500, "").is_error());
        assert!(response(101, "").is_error());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        assert_eq!(response(200, "").header("Content-Type"), Some("application/json"));
        assert_eq!(response(200, "").header("X-Missing"), None);
    }

    #[test]
    fn test_json_body() {
        let value = response(200, r#"{"id": 7}"#).json_value().unwrap();
        assert_eq!(value, json!({"id": 7}));

        let error = response(200, "not json").json_value().unwrap_err();
        assert!(matches!(error, HarnessError::Decode { ref origin, .. } if origin == "http://localhost/users"));
    }
}
