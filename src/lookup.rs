/// Company lookup against the Consumer Rights Wiki search API
use async_trait::async_trait;
use js_sys::Promise;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, DomException, Request, RequestInit, Response};

use crate::config::Config;
use crate::error::LookupError;
use crate::host::js_error_message;
use crate::tab_data::{Finding, LookupResult};

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Something that can perform an HTTP GET and hand back the body
#[async_trait(?Send)]
pub trait SearchTransport {
    async fn get(&self, url: &str) -> Result<String, LookupError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Option<Vec<SearchHit>>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

pub fn search_url(config: &Config, company_name: &str) -> String {
    format!(
        "{}?action=query&list=search&srsearch={}&srlimit={}&format=json&origin=*",
        config.api_base,
        encode_component(company_name),
        config.result_limit
    )
}

pub fn article_url(config: &Config, title: &str) -> String {
    format!("{}{}", config.article_base, encode_component(title))
}

/// Turn a search response body into findings.
///
/// Only a body that is not JSON at all is an error. JSON of the wrong
/// shape, or without `query.search`, means nothing was found.
pub fn parse_findings(config: &Config, body: &str) -> Result<Vec<Finding>, LookupError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LookupError::InvalidJson(e.to_string()))?;

    let hits = match serde_json::from_value::<SearchResponse>(value) {
        Ok(response) => response.query.and_then(|q| q.search).unwrap_or_default(),
        Err(e) => {
            log::warn!("Unexpected search response shape: {}", e);
            Vec::new()
        }
    };

    Ok(hits
        .into_iter()
        .map(|hit| Finding {
            url: article_url(config, &hit.title),
            description: hit
                .snippet
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| config.placeholder_description.clone()),
            size: hit.size.unwrap_or(0),
            title: hit.title,
        })
        .collect())
}

pub struct LookupClient<T> {
    config: Config,
    transport: T,
}

impl<T: SearchTransport> LookupClient<T> {
    pub fn new(config: Config, transport: T) -> Self {
        LookupClient { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search for articles mentioning `company_name`.
    ///
    /// `Ok` with no entries is a clean result; `Err` is a failed lookup.
    pub async fn lookup(&self, company_name: &str) -> Result<LookupResult, LookupError> {
        let url = search_url(&self.config, company_name);
        log::debug!("Searching wiki: {}", url);

        let body = self.transport.get(&url).await?;
        let entries = parse_findings(&self.config, &body)?;

        Ok(LookupResult {
            company_name: company_name.to_string(),
            entries,
            timestamp: now_millis(),
        })
    }
}

impl LookupClient<FetchTransport> {
    pub fn with_fetch(config: Config) -> Self {
        let transport = FetchTransport::new(config.request_timeout_ms);
        LookupClient::new(config, transport)
    }
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or_default()
}

#[wasm_bindgen]
extern "C" {
    // Global `fetch`, present in both windows and service workers
    #[wasm_bindgen(js_name = fetch)]
    fn fetch_with_request(input: &Request) -> Promise;

    // Rejects the fetch with a "TimeoutError" DOMException once elapsed
    #[wasm_bindgen(js_namespace = AbortSignal, js_name = timeout)]
    fn abort_after(milliseconds: u32) -> AbortSignal;
}

/// `fetch`-based transport with an abort deadline
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(timeout_ms: u32) -> Self {
        FetchTransport { timeout_ms }
    }

    fn fetch_error(&self, error: &JsValue) -> LookupError {
        match error.dyn_ref::<DomException>() {
            Some(e) if e.name() == "TimeoutError" => LookupError::Timeout(self.timeout_ms),
            _ => LookupError::Network(js_error_message(error)),
        }
    }

    async fn read_body(&self, response: Response) -> Result<String, LookupError> {
        if !response.ok() {
            return Err(LookupError::Status(response.status()));
        }

        let text = response
            .text()
            .map_err(|e| LookupError::Network(js_error_message(&e)))?;
        let body = JsFuture::from(text).await.map_err(|e| self.fetch_error(&e))?;

        body.as_string()
            .ok_or_else(|| LookupError::Network("response body is not text".to_string()))
    }
}

#[async_trait(?Send)]
impl SearchTransport for FetchTransport {
    async fn get(&self, url: &str) -> Result<String, LookupError> {
        let init = RequestInit::new();
        init.set_method("GET");
        let signal = abort_after(self.timeout_ms);
        init.set_signal(Some(&signal));

        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| LookupError::Network(js_error_message(&e)))?;

        let response = JsFuture::from(fetch_with_request(&request))
            .await
            .map_err(|e| self.fetch_error(&e))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| LookupError::Network("fetch did not resolve to a Response".to_string()))?;

        self.read_body(response).await
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod fetch_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::ResponseInit;

    fn response(status: u16, body: &str) -> Response {
        let init = ResponseInit::new();
        init.set_status(status);
        Response::new_with_opt_str_and_init(Some(body), &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_fetch_error_timeout() {
        let transport = FetchTransport::new(2500);
        let error = DomException::new_with_message_and_name("signal timed out", "TimeoutError").unwrap();

        assert_eq!(transport.fetch_error(&error.into()), LookupError::Timeout(2500));
    }

    #[wasm_bindgen_test]
    fn test_fetch_error_other_is_network() {
        let transport = FetchTransport::new(2500);
        let aborted = DomException::new_with_message_and_name("aborted", "AbortError").unwrap();
        let type_error: JsValue = js_sys::TypeError::new("Failed to fetch").into();

        assert!(matches!(transport.fetch_error(&aborted.into()), LookupError::Network(_)));
        assert_eq!(
            transport.fetch_error(&type_error),
            LookupError::Network("Failed to fetch".to_string())
        );
    }

    #[wasm_bindgen_test]
    async fn test_read_body_rejects_error_status() {
        let transport = FetchTransport::new(2500);

        let result = transport.read_body(response(503, r#"{"error":"busy"}"#)).await;

        assert_eq!(result, Err(LookupError::Status(503)));
    }

    #[wasm_bindgen_test]
    async fn test_read_body_returns_text() {
        let transport = FetchTransport::new(2500);

        let body = transport.read_body(response(200, r#"{"query":{"search":[]}}"#)).await;

        assert_eq!(body, Ok(r#"{"query":{"search":[]}}"#.to_string()));
    }

    #[wasm_bindgen_test]
    async fn test_get_unreachable_url_is_network_error() {
        let transport = FetchTransport::new(2500);

        let result = transport.get("unknown-scheme://consumerrights.wiki/api.php").await;

        assert!(matches!(result, Err(LookupError::Network(_))));
    }
}
