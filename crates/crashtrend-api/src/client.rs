//! Reqwest-based crash-stats API client.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AdiHit, CrashesPerAduHits, CurrentVersion, FacetQuery, VersionFacet,
};
use crate::traits::CrashDataSource;
use async_trait::async_trait;
use crashtrend_common::{Channel, Day, VersionInfo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Client for the Socorro crash-stats REST API.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the given API base URL, e.g.
    /// `https://crash-stats.mozilla.com/api/`.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(&base)?,
        })
    }

    /// Issues a GET against `endpoint` with repeated query parameters and
    /// decodes the JSON body into `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> ApiResult<T> {
        let url = self.base_url.join(&format!("{endpoint}/"))?;
        debug!("GET {} with {} parameters", url, params.len());
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Response envelope used by the `hits`-bearing endpoints.
#[derive(Deserialize)]
struct HitsResponse<T> {
    hits: Option<T>,
    error: Option<String>,
}

/// `SuperSearch` response envelope.
#[derive(Deserialize)]
struct SearchResponse {
    facets: Option<SearchFacets>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct SearchFacets {
    version: Option<Vec<VersionFacet>>,
}

/// Raw `ProductVersions` catalog row before channel/date conversion.
#[derive(Deserialize)]
struct ProductVersionHit {
    product: String,
    version: String,
    build_type: String,
    start_date: String,
    throttle: f64,
}

/// One entry of the `Platforms` listing.
#[derive(Deserialize)]
struct PlatformHit {
    name: String,
}

/// Resolves an optional payload field, preferring the server's own error
/// message when one is present.
fn require<T>(
    value: Option<T>,
    error: Option<String>,
    endpoint: &'static str,
    field: &'static str,
) -> ApiResult<T> {
    match (value, error) {
        (Some(v), _) => Ok(v),
        (None, Some(message)) => Err(ApiError::Remote { endpoint, message }),
        (None, None) => Err(ApiError::MissingField { endpoint, field }),
    }
}

#[async_trait]
impl CrashDataSource for ApiClient {
    async fn platforms(&self) -> ApiResult<Vec<String>> {
        let hits: Vec<PlatformHit> = self.get_json("Platforms", &[]).await?;
        Ok(hits.into_iter().map(|p| p.name).collect())
    }

    async fn product_versions(
        &self,
        products: &[String],
        start_after: Day,
    ) -> ApiResult<Vec<VersionInfo>> {
        let mut params: Vec<(String, String)> = products
            .iter()
            .map(|p| ("product".to_string(), p.clone()))
            .collect();
        params.push(("start_date".to_string(), format!(">{start_after}")));
        params.push(("is_rapid_beta".to_string(), "false".to_string()));

        let response: HitsResponse<Vec<ProductVersionHit>> =
            self.get_json("ProductVersions", &params).await?;
        let hits = require(response.hits, response.error, "ProductVersions", "hits")?;

        let mut catalog = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(start_date) = Day::parse_strict(&hit.start_date) else {
                warn!(
                    "Skipping catalog row {} {} with malformed start date `{}`",
                    hit.product, hit.version, hit.start_date
                );
                continue;
            };
            catalog.push(VersionInfo {
                channel: Channel::from_build_type(&hit.build_type),
                product: hit.product,
                version: hit.version,
                start_date,
                throttle: hit.throttle,
            });
        }
        Ok(catalog)
    }

    async fn current_versions(&self) -> ApiResult<Vec<CurrentVersion>> {
        self.get_json("CurrentVersions", &[]).await
    }

    async fn adi(
        &self,
        product: &str,
        versions: &[String],
        day: Day,
        platforms: &[String],
    ) -> ApiResult<Vec<AdiHit>> {
        let mut params = vec![("product".to_string(), product.to_string())];
        for version in versions {
            params.push(("versions".to_string(), version.clone()));
        }
        params.push(("start_date".to_string(), day.to_string()));
        params.push(("end_date".to_string(), day.to_string()));
        for platform in platforms {
            params.push(("platforms".to_string(), platform.clone()));
        }

        let response: HitsResponse<Vec<AdiHit>> = self.get_json("ADI", &params).await?;
        require(response.hits, response.error, "ADI", "hits")
    }

    async fn super_search(&self, query: FacetQuery<'_>) -> ApiResult<Vec<VersionFacet>> {
        let response: SearchResponse = self
            .get_json("SuperSearch", &query.to_params())
            .await?;
        let facets = require(
            response.facets,
            response.error,
            "SuperSearch",
            "facets",
        )?;
        require(facets.version, None, "SuperSearch", "facets.version")
    }

    async fn crashes_per_adu(
        &self,
        product: &str,
        versions: &[String],
        from: Day,
        to: Day,
    ) -> ApiResult<CrashesPerAduHits> {
        let mut params = vec![("product".to_string(), product.to_string())];
        for version in versions {
            params.push(("versions".to_string(), version.clone()));
        }
        params.push(("from_date".to_string(), from.to_string()));
        params.push(("to_date".to_string(), to.to_string()));

        let response: HitsResponse<CrashesPerAduHits> =
            self.get_json("CrashesPerAdu", &params).await?;
        require(response.hits, response.error, "CrashesPerAdu", "hits")
    }
}
