//! Authenticated JSON requests against the FreeNAS v1.0 API.
//!
//! [`RestClient`] knows nothing about individual resources: it joins paths
//! onto the API root, attaches basic-auth credentials, checks the status the
//! caller declares as success, and (de)serializes bodies.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::FreenasError;

/// Path prefix shared by every endpoint.
pub const API_ROOT: &str = "/api/v1.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a FreeNAS appliance.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Scheme and authority, e.g. `https://freenas.local`.
    pub host: String,
    pub username: String,
    pub password: String,
    /// Accept any server certificate.
    pub insecure_skip_verify: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            insecure_skip_verify: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Low-level HTTP client shared by every resource implementation.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    host: String,
    username: String,
    password: String,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FreenasError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        Ok(Self {
            http,
            host: config.host.trim_end_matches('/').to_owned(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_ROOT}{path}", self.host)
    }

    /// Issue a request and return the response body if the server answered
    /// with `expected`.  Any other status becomes
    /// [`FreenasError::UnexpectedStatus`] carrying the body.
    #[instrument(skip_all, fields(%method, %path))]
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: StatusCode,
    ) -> Result<String, FreenasError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body).map_err(FreenasError::Encode)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%status, "freenas response");

        if status != expected {
            return Err(FreenasError::unexpected_status(status, text));
        }
        Ok(text)
    }

    /// POST `entity` and decode the created record.
    pub async fn post<T>(
        &self,
        path: &str,
        entity: &T,
        expected: StatusCode,
    ) -> Result<T, FreenasError>
    where
        T: Serialize + DeserializeOwned,
    {
        let body = self.send(Method::POST, path, Some(entity), expected).await?;
        serde_json::from_str(&body).map_err(FreenasError::Decode)
    }

    /// GET a record; success is `200 OK`.
    pub async fn get<T>(&self, path: &str) -> Result<T, FreenasError>
    where
        T: DeserializeOwned,
    {
        let body = self
            .send(Method::GET, path, None::<&()>, StatusCode::OK)
            .await?;
        serde_json::from_str(&body).map_err(FreenasError::Decode)
    }

    /// DELETE a record; success is `204 No Content`.
    pub async fn delete(&self, path: &str) -> Result<(), FreenasError> {
        self.send(Method::DELETE, path, None::<&()>, StatusCode::NO_CONTENT)
            .await
            .map(drop)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Captured, serve_once};
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Thing {
        id: i64,
    }

    #[tokio::test]
    async fn post_sends_auth_and_json() {
        let (client, server) = serve_once("201 Created", r#"{"id": 5}"#).await;

        let created = client
            .post("/things/", &Thing { id: 0 }, StatusCode::CREATED)
            .await
            .unwrap();
        assert_eq!(created, Thing { id: 5 });

        let seen = server.await.unwrap();
        assert_eq!(seen.request_line, "POST /api/v1.0/things/ HTTP/1.1");
        assert_eq!(seen.header("authorization"), Some("Basic cm9vdDpzZWNyZXQ="));
        assert_eq!(seen.header("Content-Type"), Some("application/json"));
        assert_eq!(seen.body, r#"{"id":0}"#);
    }

    #[test]
    fn captured_header_names_ignore_case_but_values_keep_it() {
        let seen = Captured {
            request_line: "GET / HTTP/1.1".into(),
            headers: "GET / HTTP/1.1\r\nAuthorization: Basic cm9vdDpzZWNyZXQ=\r\n\r\n".into(),
            body: String::new(),
        };
        assert_eq!(seen.header("AUTHORIZATION"), Some("Basic cm9vdDpzZWNyZXQ="));
        assert_eq!(seen.header("accept"), None);
    }

    #[tokio::test]
    async fn unexpected_status_carries_body() {
        let (client, _server) = serve_once("409 Conflict", r#"{"error":"exists"}"#).await;

        let err = client
            .post("/things/", &Thing { id: 0 }, StatusCode::CREATED)
            .await
            .unwrap_err();
        match err {
            FreenasError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(body, r#"{"error":"exists"}"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn delete_requires_no_content() {
        let (client, server) = serve_once("204 No Content", "").await;
        client.delete("/things/5/").await.unwrap();
        let seen = server.await.unwrap();
        assert_eq!(seen.request_line, "DELETE /api/v1.0/things/5/ HTTP/1.1");
        assert_eq!(seen.header("Authorization"), Some("Basic cm9vdDpzZWNyZXQ="));
    }

    #[tokio::test]
    async fn delete_rejects_ok() {
        let (client, _server) = serve_once("200 OK", "{}").await;
        let err = client.delete("/things/5/").await.unwrap_err();
        assert!(matches!(
            err,
            FreenasError::UnexpectedStatus {
                status: StatusCode::OK,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (client, _server) = serve_once("200 OK", "not json").await;
        let err = client.get::<Thing>("/things/5/").await.unwrap_err();
        assert!(matches!(err, FreenasError::Decode(_)));
    }
}
