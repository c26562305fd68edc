use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// Header carrying the static API token on every request
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Thin wrapper over `reqwest` bound to one base URL and one credential
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut token = HeaderValue::from_str(&config.auth_token)?;
        token.set_sensitive(true);
        headers.insert(AUTH_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.client.get(self.url(path)).query(query);
        self.send(Method::GET, path, builder).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.client.post(self.url(path)).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, builder).await
    }

    pub async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.client.delete(self.url(path));
        self.send(Method::DELETE, path, builder).await
    }

    async fn send<T>(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%method, path, "sending request");
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            inspect_failure(status, path);
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            };
            return Err(ApiError::Status { status, message });
        }

        // 204 and friends carry no body; decode those as JSON `null`
        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        let value = serde_json::from_slice(body)?;
        Ok(value)
    }
}

/// Log the failure classes worth an operator's attention. The error itself
/// always travels on to the caller.
fn inspect_failure(status: StatusCode, path: &str) {
    if status == StatusCode::UNAUTHORIZED {
        error!(path, "authentication failed, API token rejected");
    } else if status == StatusCode::FORBIDDEN {
        error!(path, "access denied");
    } else if status.is_server_error() {
        error!(path, %status, "server error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_path() {
        let config = ApiConfig::new("token").with_base_url("http://localhost:1234/v4/");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/v4");
        assert_eq!(
            client.url("/competitions/PL"),
            "http://localhost:1234/v4/competitions/PL"
        );
        assert_eq!(client.url("areas"), "http://localhost:1234/v4/areas");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let config = ApiConfig::new("bad\ntoken");
        match HttpClient::new(&config) {
            Err(ApiError::InvalidHeader(_)) => (),
            other => panic!("Expected InvalidHeader, got {:?}", other.map(|_| ())),
        }
    }
}
