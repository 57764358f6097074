//! HTTP client for the Cisco API console.

use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

use super::eox::{EoxPage, EoxRecord};
use super::{CiscoApiCredentials, CiscoApiError};
use crate::config::Config;
use crate::telemetry::metrics;
use opentelemetry::KeyValue;

/// Where the token service and the API live.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    pub base_url: String,
    pub token_url: String,
}

impl From<&Config> for ApiEndpoints {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.cisco_api_base_url.clone(),
            token_url: config.cisco_token_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct HelloResponse {
    #[serde(rename = "helloResponse")]
    hello_response: HelloBody,
}

#[derive(Debug, Deserialize)]
struct HelloBody {
    response: String,
}

type ApiResult<T> = std::result::Result<T, CiscoApiError>;

pub struct CiscoApiClient {
    http: Client,
    endpoints: ApiEndpoints,
    credentials: CiscoApiCredentials,
}

impl CiscoApiClient {
    pub fn new(endpoints: ApiEndpoints, credentials: CiscoApiCredentials) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CiscoApiError::ApiCallFailed(format!("cannot build http client: {e}")))?;
        Ok(Self {
            http,
            endpoints,
            credentials,
        })
    }

    /// Exchange the client credentials for a bearer token.
    async fn access_token(&self) -> ApiResult<String> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || body.contains("invalid_client") {
            return Err(CiscoApiError::InvalidClientCredentials(
                "the token service rejected the client id or secret".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(CiscoApiError::ApiCallFailed(format!(
                "token request returned {status}"
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| CiscoApiError::ApiCallFailed(format!("unexpected token response: {e}")))?;
        Ok(token.access_token)
    }

    async fn get(&self, url: Url, token: &str) -> ApiResult<String> {
        let path = url.path().to_string();
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                CiscoApiError::InvalidClientCredentials(format!("{path} returned {status}")),
            ),
            _ => Err(CiscoApiError::ApiCallFailed(format!(
                "{path} returned {status}"
            ))),
        }
    }

    /// Call the Hello API. Succeeds only with valid credentials.
    pub async fn hello(&self) -> ApiResult<String> {
        let result = self.fetch_hello().await;
        count_call("hello", &result);
        result
    }

    /// Fetch every EoX record for a product id query (wildcards allowed).
    pub async fn query_eox(&self, query: &str) -> ApiResult<Vec<EoxRecord>> {
        let result = self.fetch_eox(query).await;
        count_call("eox", &result);
        result
    }

    async fn fetch_hello(&self) -> ApiResult<String> {
        let token = self.access_token().await?;
        let url = api_url(&self.endpoints.base_url, &["hello"])?;
        let body = self.get(url, &token).await?;
        let hello: HelloResponse = serde_json::from_str(&body)
            .map_err(|e| CiscoApiError::ApiCallFailed(format!("unexpected hello response: {e}")))?;
        Ok(hello.hello_response.response)
    }

    async fn fetch_eox(&self, query: &str) -> ApiResult<Vec<EoxRecord>> {
        let token = self.access_token().await?;
        let mut records = Vec::new();
        let mut page_index = 1u32;

        loop {
            let page_segment = page_index.to_string();
            let url = api_url(
                &self.endpoints.base_url,
                &[EOX_BY_PRODUCT_ID, &[page_segment.as_str(), query][..]].concat(),
            )?;
            let page = EoxPage::parse(&self.get(url, &token).await?)?;
            if let Some(err) = page.error.as_ref() {
                return Err(CiscoApiError::ApiCallFailed(format!(
                    "{}: {}",
                    err.error_id, err.error_description
                )));
            }
            let more = page.has_more();
            records.extend(page.records);
            if !more {
                break;
            }
            page_index += 1;
        }

        tracing::debug!(query, records = records.len(), "eox query finished");
        Ok(records)
    }
}

const EOX_BY_PRODUCT_ID: &[&str] = &["supporttools", "eox", "rest", "5", "EOXByProductID"];

/// Append `segments` to the base URL. Each one is percent-encoded and stays a
/// single path segment.
fn api_url(base_url: &str, segments: &[&str]) -> ApiResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CiscoApiError::ApiCallFailed(format!("bad api base url {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| {
            CiscoApiError::ApiCallFailed(format!("api base url {base_url} cannot take a path"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn count_call<T>(endpoint: &'static str, result: &ApiResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::cisco_api_calls().add(
        1,
        &[
            KeyValue::new("endpoint", endpoint),
            KeyValue::new("result", outcome),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eox_url(base_url: &str, query: &str) -> Url {
        api_url(base_url, &[EOX_BY_PRODUCT_ID, &["1", query][..]].concat()).unwrap()
    }

    #[test]
    fn product_id_stays_one_path_segment() {
        let url = eox_url("https://api.cisco.com", "ABC#1");
        assert_eq!(url.path(), "/supporttools/eox/rest/5/EOXByProductID/1/ABC%231");
        assert_eq!(url.fragment(), None);

        let url = eox_url("https://api.cisco.com/", "X/Y?z");
        assert_eq!(url.path(), "/supporttools/eox/rest/5/EOXByProductID/1/X%2FY%3Fz");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn wildcards_pass_through() {
        let url = eox_url("http://127.0.0.1:8080", "WS-C2960X-*");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/supporttools/eox/rest/5/EOXByProductID/1/WS-C2960X-*"
        );
    }

    #[test]
    fn hello_url_keeps_base_path() {
        let url = api_url("http://localhost:9000/cisco", &["hello"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/cisco/hello");
    }
}
