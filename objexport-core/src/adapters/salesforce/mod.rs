//! Salesforce REST adapter.
//!
//! Talks to the org's REST API with an already-issued access token:
//! - `GET /services/data/vXX.X/sobjects` for the global describe
//! - `GET /services/data/vXX.X/sobjects/{name}/describe` per object
//!
//! # Security
//! - Only GET requests against describe resources are issued
//! - The token is sent as a bearer header and never logged
//! - No retry or backoff; a failed request fails the run

mod rest;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::Result;
use crate::adapters::{ConnectionConfig, SchemaSource};
use crate::auth::{AccessToken, OrgAuth};
use crate::error::ObjExportError;
use crate::models::{ObjectDescription, ObjectSummary};

use rest::{
    GLOBAL_TARGET, GlobalDescribeResponse, api_base, error_from_response, global_describe_url,
    object_describe_url,
};

/// Schema source backed by the Salesforce REST API.
pub struct SalesforceAdapter {
    client: reqwest::Client,
    base: Url,
    org: String,
    config: ConnectionConfig,
}

impl std::fmt::Debug for SalesforceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceAdapter")
            .field("base", &self.base.as_str())
            .field("org", &self.org)
            .finish_non_exhaustive()
    }
}

impl SalesforceAdapter {
    /// Creates an adapter for an authenticated org.
    ///
    /// `config.instance_url` is taken from `auth`; the API version is taken
    /// from `config`.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn new(auth: &OrgAuth, config: ConnectionConfig) -> Result<Self> {
        let config = ConnectionConfig {
            instance_url: auth.instance_url.clone(),
            ..config
        };
        config.validate()?;

        let client = reqwest::Client::builder()
            .default_headers(default_headers(&auth.access_token)?)
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ObjExportError::connection_failed("Failed to build HTTP client", e))?;

        let base = api_base(&config.instance_url, &config.api_version)?;
        debug!(base = %base, "Created Salesforce adapter");

        Ok(Self {
            client,
            base,
            org: auth.display_name(),
            config,
        })
    }

    /// Connection settings in use (no credentials).
    pub const fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// `{instance}/services/data/v{api}`
    pub const fn api_base(&self) -> &Url {
        &self.base
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, target: &str) -> Result<T> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            ObjExportError::connection_failed(format!("Request for {target} describe failed"), e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ObjExportError::connection_failed(format!("Reading {target} describe response failed"), e)
        })?;

        if !status.is_success() {
            return Err(error_from_response(target, status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ObjExportError::serialization(format!("Malformed {target} describe response"), e)
        })
    }
}

fn default_headers(token: &AccessToken) -> Result<HeaderMap> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
        .map_err(|_| ObjExportError::authentication("Access token contains invalid characters"))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl SchemaSource for SalesforceAdapter {
    #[instrument(skip(self), fields(org = %self.org))]
    async fn describe_global(&self) -> Result<Vec<ObjectSummary>> {
        let url = global_describe_url(&self.base)?;
        let response: GlobalDescribeResponse = self.get_json(url, GLOBAL_TARGET).await?;
        debug!(objects = response.sobjects.len(), "Global describe returned");
        Ok(response.sobjects)
    }

    #[instrument(skip(self), fields(org = %self.org))]
    async fn describe_object(&self, name: &str) -> Result<ObjectDescription> {
        let url = object_describe_url(&self.base, name)?;
        let document: serde_json::Value = self.get_json(url, name).await?;
        Ok(ObjectDescription::new(document))
    }

    fn org_label(&self) -> String {
        self.org.clone()
    }
}
