//! Client for the backend token-exchange service.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{Error, Result};

/// Request timeout for the exchange call.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Body posted to the exchange service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Authorization code from the redirect.
    pub code: String,
    /// Redirect URI the code was issued for.
    pub redirect_uri: String,
}

/// Success body returned by the exchange service. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeResponse {
    /// Verified mailbox address.
    pub email: Option<String>,
    /// Account holder's name.
    pub name: Option<String>,
}

/// Trades an authorization code for the mailbox identity.
pub trait TokenExchange: Send + Sync {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an
    /// unreadable body.
    fn exchange(
        &self,
        request: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse>> + Send;
}

/// [`TokenExchange`] over HTTP: `POST` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    endpoint: Url,
    http_client: Client,
}

impl HttpExchange {
    /// Exchange client posting to `endpoint`.
    ///
    /// Requests time out after 30 seconds. If the TLS backend cannot be
    /// initialised the builder error is logged and a default client is used.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        let http_client = match client_builder(EXCHANGE_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "HTTP client setup failed, exchange runs without a timeout");
                Client::new()
            }
        };
        Self {
            endpoint,
            http_client,
        }
    }

    /// Parses `endpoint` and builds a client for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn from_url(endpoint: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(endpoint)?))
    }

    /// Uses a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// The exchange endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn client_builder(timeout: Duration) -> ClientBuilder {
    Client::builder().timeout(timeout)
}

impl TokenExchange for HttpExchange {
    async fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
        tracing::debug!(endpoint = %self.endpoint, "Posting authorization code");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Exchange { status });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
