//! Connection management: the authenticated HTTP client.
//!
//! Every request built here passes through the same pipeline: public
//! paths skip auth entirely, everything else carries the scope's current
//! access token as a bearer header, and a 401 answer triggers at most one
//! silent refresh-and-retry before the scope is logged out.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::ClientError;
use crate::events::{AuthEvents, UnauthorizedEvent};
use crate::storage::TokenStorage;
use crate::tokens::{TokenScope, TokenStore};

#[derive(Debug, Error)]
enum RefreshError {
    #[error("invalid refresh endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("refresh endpoint answered {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("refresh response carried no access token")]
    MissingAccessToken,
}

/// A configured client bound to one base URL and one token scope.
///
/// Cloning is cheap and clones share the token store and the
/// unauthorized-event channel.
#[derive(Clone, Debug)]
pub struct ConnectionInfo<S>
where
    S: TokenStorage + Clone + Send + Sync,
{
    http: HttpClient,
    config: ConnectionConfig,
    tokens: TokenStore<S>,
    events: AuthEvents,
}

impl<S> ConnectionInfo<S>
where
    S: TokenStorage + Clone + Send + Sync,
{
    pub fn new(config: ConnectionConfig, storage: S) -> Self {
        Self {
            http: HttpClient::new(),
            config,
            tokens: TokenStore::new(storage),
            events: AuthEvents::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub const fn scope(&self) -> TokenScope {
        self.config.scope
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    #[must_use]
    pub const fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Observe forced logouts of this connection's scope.
    pub fn subscribe_unauthorized(&self) -> broadcast::Receiver<UnauthorizedEvent> {
        self.events.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<I, O>(&self, path: &str, body: &I) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST with an empty JSON object body, for action endpoints that
    /// take no payload.
    pub async fn post_no_body<O: DeserializeOwned>(&self, path: &str) -> Result<O, ClientError> {
        self.request(Method::POST, path, Some(&Value::Object(serde_json::Map::new())))
            .await
    }

    pub async fn put<I, O>(&self, path: &str, body: &I) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    /// DELETE for endpoints that may answer with an empty body; returns
    /// the raw body text of a successful response.
    pub async fn delete_text(&self, path: &str) -> Result<String, ClientError> {
        let url = self.endpoint_url(path)?;
        let response = self
            .execute_with_auth_retry(path, || {
                self.http
                    .delete(url.clone())
                    .header(CONTENT_TYPE, "application/json")
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http { status, body });
        }
        Ok(response.text().await.unwrap_or_default())
    }

    /// POST a multipart form. The form is rebuilt through `form` on a
    /// refresh retry since a multipart body cannot be replayed. No JSON
    /// content-type is forced; the transport supplies the boundary.
    pub async fn post_multipart<O, F>(&self, path: &str, form: F) -> Result<O, ClientError>
    where
        O: DeserializeOwned,
        F: Fn() -> Form,
    {
        let url = self.endpoint_url(path)?;
        let response = self
            .execute_with_auth_retry(path, || self.http.post(url.clone()).multipart(form()))
            .await?;
        Self::decode(response).await
    }

    async fn request<I, O>(
        &self,
        method: Method,
        path: &str,
        body: Option<&I>,
    ) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.endpoint_url(path)?;
        let response = self
            .execute_with_auth_retry(path, || {
                let builder = self.http.request(method.clone(), url.clone());
                match body {
                    Some(body) => builder.json(body),
                    None => builder.header(CONTENT_TYPE, "application/json"),
                }
            })
            .await?;
        Self::decode(response).await
    }

    /// Send the request, replaying it once with a refreshed access token
    /// if the first answer is a 401 and a refresh path is viable. Any
    /// 401 that survives clears the scope's tokens, emits an
    /// unauthorized event and surfaces as [`ClientError::Unauthorized`];
    /// every other outcome passes through unchanged.
    async fn execute_with_auth_retry<F>(
        &self,
        path: &str,
        build_request: F,
    ) -> Result<Response, ClientError>
    where
        F: Fn() -> RequestBuilder,
    {
        let scope = self.config.scope;
        let public = self.config.is_public_path(path);
        let mut retried = false;

        loop {
            let mut builder = build_request();
            if !public {
                // Re-read per attempt so a retry picks up the refreshed token.
                if let Some(token) = self.tokens.access_token(scope).await? {
                    builder = builder.bearer_auth(token);
                }
            }

            let response = builder.send().await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            if retried {
                debug!(%scope, path, "retried request was rejected again");
                break;
            }
            let Some(refresh_endpoint) = self.config.refresh_endpoint.as_deref() else {
                break;
            };
            let Some(refresh_token) = self.tokens.refresh_token(scope).await? else {
                break;
            };

            retried = true;
            match self.refresh_access_token(refresh_endpoint, &refresh_token).await {
                Ok(access_token) => {
                    self.tokens.set_tokens(&access_token, None, scope).await?;
                    debug!(%scope, path, "access token refreshed, retrying request");
                }
                Err(err) => {
                    debug!(%scope, %err, "token refresh failed");
                    break;
                }
            }
        }

        self.tokens.clear_tokens(scope).await?;
        self.events.emit(scope);
        warn!(%scope, path, "unauthorized, tokens cleared");
        Err(ClientError::Unauthorized { scope })
    }

    /// Exchange the refresh token for a new access token. This call is
    /// deliberately unauthenticated and bypasses the interceptor path.
    async fn refresh_access_token(
        &self,
        refresh_endpoint: &str,
        refresh_token: &str,
    ) -> Result<String, RefreshError> {
        #[derive(Serialize)]
        struct RefreshRequest<'a> {
            refresh: &'a str,
        }

        let url = self.endpoint_url(refresh_endpoint)?;

        let response = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RefreshError::Status(response.status()));
        }

        let body = response.json::<Value>().await?;
        let access_token = self
            .config
            .extract_access_token
            .as_ref()
            .and_then(|extract| extract(&body))
            .or_else(|| {
                body.get("access")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            });

        access_token.ok_or(RefreshError::MissingAccessToken)
    }

    async fn decode<O: DeserializeOwned>(response: Response) -> Result<O, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http { status, body });
        }
        response.json::<O>().await.map_err(Into::into)
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.config.api_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}
