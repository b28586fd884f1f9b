// Management API HTTP client
//
// Wraps `reqwest::Client` with model-object URL construction and status
// handling. Reads return parsed `serde_json::Value` trees; mutations return
// nothing on success and an `Error::Http` carrying the raw body otherwise.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::model::ModelObject;
use crate::transport::{Credentials, TransportConfig};

/// Query options for reading model objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Return attribute values as configured, without context-variable expansion.
    pub actuals: bool,
    /// Include actual values inherited from ancestors (context variables).
    pub inherited_actuals: bool,
    /// How many levels of children to include.
    pub depth: Option<u32>,
}

impl LoadOptions {
    pub fn actuals() -> Self {
        Self {
            actuals: true,
            ..Self::default()
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    fn query_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.actuals {
            pairs.push(("actuals", "true".to_owned()));
        }
        if self.inherited_actuals {
            pairs.push(("inheritedActuals", "true".to_owned()));
        }
        if let Some(depth) = self.depth {
            pairs.push(("depth", depth.to_string()));
        }
        pairs
    }
}

/// HTTP client for the broker's REST management API.
///
/// All object URLs are rooted at `{base}/api/latest/`. The base URL is the
/// management console root (e.g. `http://broker:8080`).
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl ManagementClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials: transport.credentials.clone(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and no credentials.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            credentials: None,
        }
    }

    /// The management base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/latest/{segments...}`, percent-encoding each segment.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        self.url_with_segments(["api", "latest"].iter().chain(segments).copied())
    }

    fn url_with_segments<'a>(&self, segments: impl Iterator<Item = &'a str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a console-relative reference such as `api/latest/queue/vh?id=1`.
    pub(crate) fn relative_url(&self, reference: &str) -> Result<Url, Error> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(reference.trim_start_matches('/'))?)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Load a single model object. The broker answers with a one-element array.
    pub async fn load(&self, obj: &ModelObject, options: LoadOptions) -> Result<Vec<Value>, Error> {
        let mut url = self.api_url(&obj.segments())?;
        append_query(&mut url, &options.query_pairs());
        self.get_values(url).await
    }

    /// Load every object of `category` under `parent`.
    pub async fn list(
        &self,
        category: &str,
        parent: Option<&ModelObject>,
        options: LoadOptions,
    ) -> Result<Vec<Value>, Error> {
        let mut url = self.api_url(&ModelObject::collection_segments(category, parent))?;
        append_query(&mut url, &options.query_pairs());
        self.get_values(url).await
    }

    /// Fetch the broker's category/type metadata.
    pub async fn metadata(&self) -> Result<Metadata, Error> {
        let url = self.url_with_segments(["service", "metadata"].into_iter())?;
        let body = send(self.request(reqwest::Method::GET, url)).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn get_values(&self, url: Url) -> Result<Vec<Value>, Error> {
        let body = send(self.request(reqwest::Method::GET, url)).await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;
        Ok(match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a new object of `category` under `parent`.
    pub async fn create(
        &self,
        category: &str,
        parent: Option<&ModelObject>,
        data: &impl Serialize,
    ) -> Result<(), Error> {
        let url = self.api_url(&ModelObject::collection_segments(category, parent))?;
        send(self.request(reqwest::Method::POST, url).json(data))
            .await
            .map(drop)
    }

    /// Update attributes of an existing object.
    pub async fn update(&self, obj: &ModelObject, data: &impl Serialize) -> Result<(), Error> {
        let url = self.api_url(&obj.segments())?;
        send(self.request(reqwest::Method::PUT, url).json(data))
            .await
            .map(drop)
    }

    /// Delete a single object.
    pub async fn delete(&self, obj: &ModelObject) -> Result<(), Error> {
        let url = self.api_url(&obj.segments())?;
        send(self.request(reqwest::Method::DELETE, url))
            .await
            .map(drop)
    }

    /// Delete several children of `category` under `parent` in one request,
    /// identified by `id_param` query parameters.
    pub async fn remove(
        &self,
        category: &str,
        parent: Option<&ModelObject>,
        id_param: &str,
        ids: &[&str],
    ) -> Result<(), Error> {
        let mut url = self.api_url(&ModelObject::collection_segments(category, parent))?;
        let pairs: Vec<(&str, String)> = ids.iter().map(|id| (id_param, (*id).to_owned())).collect();
        append_query(&mut url, &pairs);
        send(self.request(reqwest::Method::DELETE, url))
            .await
            .map(drop)
    }

    /// Send a DELETE to a pre-built console-relative reference (path plus query).
    pub async fn delete_reference(&self, reference: &str) -> Result<(), Error> {
        let url = self.relative_url(reference)?;
        send(self.request(reqwest::Method::DELETE, url))
            .await
            .map(drop)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        debug!("{} {}", method, url);
        let request = self.http.request(method, url);
        match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        }
    }
}

/// Send a request, returning the body on success or `Error::Http` otherwise.
async fn send(request: reqwest::RequestBuilder) -> Result<String, Error> {
    let resp = request.send().await.map_err(Error::Transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if status.is_success() {
        Ok(body)
    } else {
        debug!(status = status.as_u16(), "management request failed");
        Err(Error::Http {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_owned(),
            body,
        })
    }
}

fn append_query(url: &mut Url, pairs: &[(&str, String)]) {
    if pairs.is_empty() {
        return;
    }
    let mut query = url.query_pairs_mut();
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ManagementClient {
        ManagementClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_encodes_segments() {
        let c = client("http://broker:8080");
        let url = c.api_url(&["virtualhostnode", "node one"]).unwrap();
        assert_eq!(url.as_str(), "http://broker:8080/api/latest/virtualhostnode/node%20one");
    }

    #[test]
    fn api_url_respects_base_path() {
        let c = client("http://broker:8080/console/");
        let url = c.api_url(&["groupprovider"]).unwrap();
        assert_eq!(url.as_str(), "http://broker:8080/console/api/latest/groupprovider");
    }

    #[test]
    fn relative_url_keeps_query() {
        let c = client("http://broker:8080/console");
        let url = c.relative_url("api/latest/queue/vh?id=a&id=b").unwrap();
        assert_eq!(url.as_str(), "http://broker:8080/console/api/latest/queue/vh?id=a&id=b");
    }

    #[test]
    fn load_options_query() {
        let opts = LoadOptions {
            actuals: true,
            inherited_actuals: true,
            depth: Some(1),
        };
        assert_eq!(
            opts.query_pairs(),
            vec![
                ("actuals", "true".to_owned()),
                ("inheritedActuals", "true".to_owned()),
                ("depth", "1".to_owned()),
            ]
        );
        assert!(LoadOptions::default().query_pairs().is_empty());
    }
}
