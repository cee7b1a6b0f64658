//! JSON-over-HTTP clients for the portal backend.
//! One request per call: no retry, no timeout policy, no request de-duplication.

use crate::descriptor::CubeDescriptor;
use crate::error::{ServiceError, ServiceResult};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CUBE_URL: &str = "http://localhost:8000/api/cube/";
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:8000/api/dashboard/";

/// Base client: resolves endpoints against a base URL and checks statuses.
#[derive(Debug, Clone)]
pub struct HttpService {
    base_url: Url,
    client: Client,
}

impl HttpService {
    /// `base_url` is treated as a directory: a missing trailing slash is added so
    /// endpoints resolve below it.
    pub fn new(base_url: &str) -> ServiceResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| ServiceError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> ServiceResult<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ServiceError::InvalidUrl {
                url: format!("{}{}", self.base_url, endpoint),
                reason: e.to_string(),
            })
    }

    /// `endpoint` followed by `segment` as one percent-encoded path segment.
    /// Empty and dot segments are rejected.
    pub fn endpoint_with_segment(&self, endpoint: &str, segment: &str) -> ServiceResult<Url> {
        let invalid = |reason: &str| ServiceError::InvalidUrl {
            url: format!("{}{}/{}", self.base_url, endpoint, segment),
            reason: reason.to_string(),
        };
        if matches!(segment, "" | "." | "..") {
            return Err(invalid("path segment must name a resource"));
        }
        let mut url = self.endpoint_url(endpoint)?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot take path segments"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> ServiceResult<T> {
        let mut url = self.endpoint_url(endpoint)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        self.get_url(endpoint, url).await
    }

    async fn get_url<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> ServiceResult<T> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        decode(endpoint, check_status(endpoint, response)?).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ServiceResult<T> {
        let response = self.send_post(endpoint, body).await?;
        decode(endpoint, response).await
    }

    /// POST whose response body is ignored.
    pub async fn post_discard<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ServiceResult<()> {
        self.send_post(endpoint, body).await.map(|_| ())
    }

    async fn send_post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ServiceResult<Response> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        check_status(endpoint, response)
    }
}

fn check_status(endpoint: &str, response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ServiceError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
    })
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ServiceResult<T> {
    let bytes = response.bytes().await.map_err(|source| ServiceError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

/// Cube definition CRUD and deployment.
#[derive(Debug, Clone)]
pub struct CubeService {
    http: HttpService,
}

impl CubeService {
    pub fn new(base_url: &str) -> ServiceResult<Self> {
        Ok(Self {
            http: HttpService::new(base_url)?,
        })
    }

    pub fn http(&self) -> &HttpService {
        &self.http
    }

    pub async fn list_cubes(&self) -> ServiceResult<Vec<CubeDescriptor>> {
        self.http.get("list", &[]).await
    }

    pub async fn create_cube(&self, cube: &CubeDescriptor) -> ServiceResult<CubeDescriptor> {
        self.http.post("create", cube).await
    }

    pub async fn update_cube(&self, cube: &CubeDescriptor) -> ServiceResult<CubeDescriptor> {
        self.http.post("update", cube).await
    }

    pub async fn deploy_cube(&self, cube: &CubeDescriptor) -> ServiceResult<()> {
        self.http.post_discard("deploy", cube).await
    }
}

/// A stored dashboard. `configuration` holds the serialized widget tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub configuration: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    http: HttpService,
}

impl DashboardService {
    pub fn new(base_url: &str) -> ServiceResult<Self> {
        Ok(Self {
            http: HttpService::new(base_url)?,
        })
    }

    pub fn http(&self) -> &HttpService {
        &self.http
    }

    pub async fn find_by_id(&self, id: &str) -> ServiceResult<Dashboard> {
        let url = self.http.endpoint_with_segment("find", id)?;
        self.http.get_url("find", url).await
    }

    pub async fn list(&self) -> ServiceResult<Vec<Dashboard>> {
        self.http.get("list", &[]).await
    }

    pub async fn create(&self, dashboard: &Dashboard) -> ServiceResult<Dashboard> {
        self.http.post("create", dashboard).await
    }

    pub async fn update(&self, dashboard: &Dashboard) -> ServiceResult<Dashboard> {
        self.http.post("update", dashboard).await
    }
}
