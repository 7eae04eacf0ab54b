use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::ProxyError;

/// HTTP client for the latency API the proxy fronts.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(UpstreamClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with `params` appended as the query string.
    pub fn url_for(&self, path: &str, params: &[(String, String)]) -> Result<Url, ProxyError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub async fn get_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, ProxyError> {
        let url = self.url_for(path, params)?;
        debug!(%url, "Upstream GET");
        let resp = self.client.get(url).send().await?;
        decode(resp).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ProxyError> {
        let url = self.url_for(path, &[])?;
        debug!(%url, "Upstream POST");
        let resp = self.client.post(url).json(body).send().await?;
        decode(resp).await
    }
}

async fn decode(resp: reqwest::Response) -> Result<Value, ProxyError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ProxyError::Status(status.as_u16()));
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProxyError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn url_joins_base_and_path() {
        let c = client("http://api.example/");
        let url = c.url_for("/datacenter", &[]).unwrap();
        assert_eq!(url.as_str(), "http://api.example/datacenter");
    }

    #[test]
    fn url_encodes_params() {
        let c = client("http://api.example");
        let params = vec![
            ("token".to_string(), "a b&c".to_string()),
            ("interval".to_string(), "DAY".to_string()),
        ];
        let url = c.url_for("/data/realTimeMap", &params).unwrap();
        assert_eq!(url.path(), "/data/realTimeMap");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, params);
    }

    #[test]
    fn unparsable_base_is_invalid_url() {
        let c = client("not a url");
        assert!(matches!(c.url_for("/login", &[]), Err(ProxyError::InvalidUrl(_))));
    }
}
