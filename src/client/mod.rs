//! Client layer: orchestrates option merging, validation, transport calls,
//! and response normalization.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Defaults;
use crate::domain::{
    CarrierPickupResult, InsuranceError, Label, Options, PassPhraseResult, RecreditResult,
    RefundResult, StatusResult, validate_insurance,
};
use crate::transport::{
    BUY_POSTAGE_REQUEST_ID_PREFIX, CHANGE_PASS_PHRASE_REQUEST_ID_PREFIX, XmlError,
    decode_carrier_pickup_response, decode_change_pass_phrase_response, decode_label_response,
    decode_recredit_response, decode_refund_response, decode_status_response,
    encode_carrier_pickup_request, encode_change_pass_phrase_request, encode_label_request,
    encode_recredit_request, encode_refund_request, encode_status_request,
};

const PRODUCTION_LABEL_ENDPOINT: &str =
    "https://LabelServer.Endicia.com/LabelService/EwsLabelService.asmx";
const TEST_LABEL_ENDPOINT: &str = "https://www.envmgr.com/LabelService/EwsLabelService.asmx";
const PRODUCTION_ELS_ENDPOINT: &str =
    "https://LabelServer.Endicia.com/LabelService/ELSServices.cfc?wsdl";
const TEST_ELS_ENDPOINT: &str = "https://www.envmgr.com/LabelService/ELSServices.cfc?wsdl";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EndiciaClient`].
///
/// Only transport-level problems and the pre-flight insurance rule surface
/// here. Remote-reported business failures (non-zero status, `ErrorMsg`,
/// denied refunds) come back as `success == false` on the result structs so
/// callers can branch without exception handling.
pub enum EndiciaError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The jewelry/excluded-zip rule rejected the request before any
    /// network call was made.
    #[error("insurance validation failed: {0}")]
    Insurance(#[from] InsuranceError),

    /// Request serialization or response XML handling failed.
    #[error("xml error: {0}")]
    Xml(#[from] XmlError),

    /// An endpoint override or query assembly produced an invalid URL.
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug)]
/// Builder for [`EndiciaClient`].
///
/// Use this to supply defaults (static options or a config file keyed by
/// environment), or to customize endpoints, timeout, or user-agent.
pub struct EndiciaClientBuilder {
    defaults: Defaults,
    label_endpoint: Option<String>,
    els_endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl EndiciaClientBuilder {
    /// Create a builder with no defaults and the standard endpoints.
    pub fn new() -> Self {
        Self {
            defaults: Defaults::none(),
            label_endpoint: None,
            els_endpoint: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Fixed in-memory defaults merged under every operation's options.
    pub fn defaults(mut self, options: Options) -> Self {
        self.defaults = Defaults::from_options(options);
        self
    }

    /// Load defaults lazily from a JSON config file keyed by environment.
    pub fn defaults_file(
        mut self,
        path: impl Into<std::path::PathBuf>,
        environment: impl Into<String>,
    ) -> Self {
        self.defaults = Defaults::from_file(path, environment);
        self
    }

    /// Override the POST base URL (label, pass-phrase, and postage calls),
    /// disabling the `Test` host switch for those operations.
    pub fn label_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.label_endpoint = Some(endpoint.into());
        self
    }

    /// Override the GET base URL (status, refund, and pickup calls),
    /// disabling the `Test` host switch for those operations.
    pub fn els_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.els_endpoint = Some(endpoint.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an [`EndiciaClient`].
    pub fn build(self) -> Result<EndiciaClient, EndiciaError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| EndiciaError::Transport(Box::new(err)))?;

        Ok(EndiciaClient {
            defaults: self.defaults,
            label_endpoint: self.label_endpoint,
            els_endpoint: self.els_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

impl Default for EndiciaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level Endicia Label Server client.
///
/// Each operation merges caller options over the configured defaults
/// (caller wins), applies the service's structural rules, performs exactly
/// one HTTP call, and normalizes the response. The `Test` option (`"YES"`)
/// switches every operation to the test host.
pub struct EndiciaClient {
    defaults: Defaults,
    label_endpoint: Option<String>,
    els_endpoint: Option<String>,
    http: Arc<dyn HttpTransport>,
}

impl EndiciaClient {
    /// Create a client with no defaults and the standard endpoints.
    ///
    /// For more customization, use [`EndiciaClient::builder`].
    pub fn new() -> Self {
        Self {
            defaults: Defaults::none(),
            label_endpoint: None,
            els_endpoint: None,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> EndiciaClientBuilder {
        EndiciaClientBuilder::new()
    }

    /// The currently cached defaults (loading them on first access).
    pub fn defaults(&self) -> Arc<Options> {
        self.defaults.get()
    }

    /// Drop the cached defaults; the next operation reloads them.
    pub fn reset_defaults(&self) {
        self.defaults.reset();
    }

    /// Purchase a postage label.
    ///
    /// Fails with [`EndiciaError::Insurance`] — before any network call —
    /// when Endicia-provided insurance is requested for jewelry shipped to
    /// an excluded zip. The returned [`Label`] records the exact outgoing
    /// request body/URL and a response body with the image payload redacted.
    pub async fn get_label(&self, options: Options) -> Result<Label, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        validate_insurance(&merged)?;

        let xml = encode_label_request(&merged)?;
        let url = self.label_url(&merged, "GetPostageLabelXML");
        let params = vec![("labelRequestXML".to_owned(), xml)];
        let request_body = form_body(&params);

        let response = self.post(&url, params).await?;
        Ok(decode_label_response(&url, &request_body, &response.body)?)
    }

    /// Change the account pass phrase.
    pub async fn change_pass_phrase(
        &self,
        new_pass_phrase: &str,
        options: Options,
    ) -> Result<PassPhraseResult, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        let request_id = format!(
            "{CHANGE_PASS_PHRASE_REQUEST_ID_PREFIX}{}",
            crate::transport::request_token()
        );
        let xml = encode_change_pass_phrase_request(new_pass_phrase, &merged, &request_id)?;
        let url = self.label_url(&merged, "ChangePassPhraseXML");

        let response = self
            .post(&url, vec![("changePassPhraseRequestXML".to_owned(), xml)])
            .await?;
        Ok(decode_change_pass_phrase_response(&response.body)?)
    }

    /// Add postage to the account (a recredit).
    pub async fn buy_postage(
        &self,
        amount: &str,
        options: Options,
    ) -> Result<RecreditResult, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        let request_id = format!(
            "{BUY_POSTAGE_REQUEST_ID_PREFIX}{}",
            crate::transport::request_token()
        );
        let xml = encode_recredit_request(amount, &merged, &request_id)?;
        let url = self.label_url(&merged, "BuyPostageXML");

        let response = self
            .post(&url, vec![("recreditRequestXML".to_owned(), xml)])
            .await?;
        Ok(decode_recredit_response(&response.body)?)
    }

    /// Look up the delivery status of a tracking (PIC) number.
    pub async fn status_request(
        &self,
        tracking_number: &str,
        options: Options,
    ) -> Result<StatusResult, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        let xml = encode_status_request(tracking_number, &merged)?;
        let url = self.els_url(&merged, "StatusRequest", &xml)?;

        let response = self.get(&url).await?;
        Ok(decode_status_response(&response.body)?)
    }

    /// Request a postage refund for a tracking (PIC) number.
    pub async fn refund_request(
        &self,
        tracking_number: &str,
        options: Options,
    ) -> Result<RefundResult, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        let xml = encode_refund_request(tracking_number, &merged)?;
        let url = self.els_url(&merged, "RefundRequest", &xml)?;

        let response = self.get(&url).await?;
        Ok(decode_refund_response(&response.body)?)
    }

    /// Schedule a carrier pickup for a tracking (PIC) number.
    ///
    /// `package_location` is the service's location code (e.g. `"sd"` for
    /// side door); address-override options and `SpecialInstructions` are
    /// serialized when supplied.
    pub async fn carrier_pickup_request(
        &self,
        tracking_number: &str,
        package_location: &str,
        options: Options,
    ) -> Result<CarrierPickupResult, EndiciaError> {
        let merged = options.merged_over(&self.defaults.get());
        let xml = encode_carrier_pickup_request(tracking_number, package_location, &merged)?;
        let url = self.els_url(&merged, "CarrierPickupRequest", &xml)?;

        let response = self.get(&url).await?;
        Ok(decode_carrier_pickup_response(&response.body)?)
    }

    fn is_test(options: &Options) -> bool {
        options.text("Test").as_deref() == Some("YES")
    }

    fn label_url(&self, options: &Options, operation: &str) -> String {
        let base = match &self.label_endpoint {
            Some(endpoint) => endpoint.as_str(),
            None if Self::is_test(options) => TEST_LABEL_ENDPOINT,
            None => PRODUCTION_LABEL_ENDPOINT,
        };
        format!("{base}/{operation}")
    }

    fn els_url(&self, options: &Options, method: &str, xml: &str) -> Result<String, EndiciaError> {
        let base = match &self.els_endpoint {
            Some(endpoint) => endpoint.as_str(),
            None if Self::is_test(options) => TEST_ELS_ENDPOINT,
            None => PRODUCTION_ELS_ENDPOINT,
        };
        let mut url = url::Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("method", method)
            .append_pair("XMLInput", xml);
        Ok(url.into())
    }

    async fn post(
        &self,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<HttpResponse, EndiciaError> {
        let response = self
            .http
            .post_form(url, params)
            .await
            .map_err(EndiciaError::Transport)?;
        ensure_success(response)
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, EndiciaError> {
        let response = self.http.get(url).await.map_err(EndiciaError::Transport)?;
        ensure_success(response)
    }
}

impl Default for EndiciaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_success(response: HttpResponse) -> Result<HttpResponse, EndiciaError> {
    if (200..=299).contains(&response.status) {
        return Ok(response);
    }
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    Err(EndiciaError::HttpStatus {
        status: response.status,
        body,
    })
}

/// The exact form-encoded body reqwest sends for `params`, recorded on the
/// label entity for traceability.
fn form_body(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .finish()
}
