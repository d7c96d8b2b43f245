// Blog API HTTP client.
// Handles request construction and response status mapping.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Serialize;

use crate::config::Config;
use crate::error::{BlogError, Result};

/// HTTP client for the blog API. Cheap to clone; clones share a connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("blogem-tui"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(params)
            .send()
            .await?;
        check_response(response).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Response> {
        let response = self
            .client
            .patch(self.url(endpoint))
            .json(body)
            .send()
            .await?;
        check_response(response).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, endpoint: &str) -> Result<Response> {
        let response = self.client.delete(self.url(endpoint)).send().await?;
        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(BlogError::NotFound(response.url().to_string())),
        status => Err(BlogError::Http {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}
