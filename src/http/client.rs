//! Signed Commando client
//!
//! Every request is a GET against the configured base URL with the caller's
//! parameters followed by `ts` and `token`. The response body is decoded as
//! JSON without any schema; interpreting it is the caller's job.

use super::actions::Action;
use crate::auth::{QueryParams, RequestSigner, SignedQuery, Timestamp};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Client for the Commando webservice
///
/// Holds only immutable configuration, so one instance can serve
/// concurrent calls.
#[derive(Clone)]
pub struct CommandoClient {
    client: Client,
    config: ClientConfig,
    signer: RequestSigner,
}

impl CommandoClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        let signer = RequestSigner::new(config.shared_secret.clone());
        Self {
            client,
            config,
            signer,
        }
    }

    /// The bound configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The request signer
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Sign `params` at the current time and call the webservice.
    ///
    /// Fails with `RemoteHttp` on a non-200 status, `RemoteDecode` on a
    /// body that is not JSON and `RemoteCall` on transport errors,
    /// timeouts included. An empty or `null` body yields an empty object.
    pub async fn call(&self, params: QueryParams) -> Result<JsonValue> {
        let signed = self.signer.sign_now(params)?;
        self.send(&signed).await
    }

    /// Send an already signed query
    pub async fn send(&self, signed: &SignedQuery) -> Result<JsonValue> {
        let url = signed.to_url(&self.config.base_url);
        let act = signed.params().get("act").unwrap_or_default();
        debug!(
            "Calling Commando act={} ts={} at {}",
            act,
            signed.timestamp(),
            self.config.base_url
        );

        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|source| {
                warn!("Commando act={} transport failure: {}", act, source);
                Error::RemoteCall { source }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| Error::RemoteCall { source })?;

        if status != StatusCode::OK {
            warn!("Commando act={} returned HTTP {}", act, status.as_u16());
            return Err(Error::remote_http(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        let value = decode_body(&body)?;
        debug!("Commando act={} succeeded", act);
        Ok(value)
    }

    /// Signed URL for `params` at the current time, without sending it.
    ///
    /// Meant for display and diagnostics. The query matches what `call`
    /// would send for the same parameters within the same second.
    pub fn build_url(&self, params: QueryParams) -> Result<String> {
        self.build_url_at(params, Timestamp::now())
    }

    /// Signed URL for `params` at a given timestamp
    pub fn build_url_at(&self, params: QueryParams, timestamp: Timestamp) -> Result<String> {
        let signed = self.signer.sign(params, timestamp)?;
        Ok(signed.to_url(&self.config.base_url).to_string())
    }

    /// Run one of the Commando actions
    pub async fn action(&self, action: Action<'_>) -> Result<JsonValue> {
        self.call(action.params()).await
    }

    /// CSC list for a client (`act=cscliste`)
    pub async fn get_csc_list(&self, client_code: &str) -> Result<JsonValue> {
        self.action(Action::CscList { client_code }).await
    }

    /// Backorder quantities per reference (`act=reliq`); `refs` may be empty
    pub async fn get_backorders(&self, client_code: &str, refs: &str) -> Result<JsonValue> {
        self.action(Action::Backorders { client_code, refs }).await
    }

    /// Stock availability (`act=dispo`), with alert details when `with_alert`
    pub async fn get_stock_availability(&self, refs: &str, with_alert: bool) -> Result<JsonValue> {
        self.action(Action::StockAvailability { refs, with_alert })
            .await
    }

    /// Client pricing (`act=tarif`), with calculation details when `full_info`
    pub async fn get_pricing(
        &self,
        client_code: &str,
        refs: &str,
        full_info: bool,
    ) -> Result<JsonValue> {
        self.action(Action::Pricing {
            client_code,
            refs,
            full_info,
        })
        .await
    }
}

impl std::fmt::Debug for CommandoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandoClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decode a 200 response body. Empty and `null` bodies become `{}`.
///
/// The raw bytes are parsed directly, so invalid UTF-8 is a decode error.
pub(crate) fn decode_body(body: &[u8]) -> Result<JsonValue> {
    if body.is_empty() {
        return Ok(JsonValue::Object(JsonObject::new()));
    }

    let value: JsonValue =
        serde_json::from_slice(body).map_err(|e| Error::remote_decode(e.to_string()))?;

    Ok(match value {
        JsonValue::Null => JsonValue::Object(JsonObject::new()),
        other => other,
    })
}
