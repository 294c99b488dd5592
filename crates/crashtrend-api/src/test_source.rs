//! Canned-response data source for engine and runner tests.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AdiHit, CrashesPerAduHits, CurrentVersion, FacetQuery, VersionFacet,
};
use crate::traits::CrashDataSource;
use async_trait::async_trait;
use crashtrend_common::{Day, VersionInfo};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One recorded `SuperSearch` call, kept for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    /// Product the query filtered on.
    pub product: String,
    /// Day the query was restricted to.
    pub day: Day,
    /// Report-specific filter parameters the query carried.
    pub extra_filters: Vec<(String, Vec<String>)>,
}

/// A [`CrashDataSource`] backed by fixed fixtures.
///
/// `SuperSearch` responses are served in FIFO order, one per issued query;
/// an empty queue answers with a missing `facets.version` field, which is
/// how tests simulate a structurally bad response. Every issued search is
/// recorded for assertions.
#[derive(Default)]
pub struct StaticSource {
    /// Platform names returned by `platforms`.
    pub platforms: Vec<String>,
    /// Catalog rows returned by `product_versions`.
    pub catalog: Vec<VersionInfo>,
    /// Catalog rows returned by `current_versions`.
    pub current_versions: Vec<CurrentVersion>,
    /// ADI hits per day; days without an entry answer with no hits.
    pub adi_by_day: HashMap<Day, Vec<AdiHit>>,
    /// `CrashesPerAdu` hits returned for any range query.
    pub rate_hits: CrashesPerAduHits,
    /// When set, `adi` answers with a missing `hits` field.
    pub fail_adi: bool,
    /// Queued `super_search` responses; prefer [`push_search_response`].
    ///
    /// [`push_search_response`]: StaticSource::push_search_response
    pub search_responses: Mutex<VecDeque<Vec<VersionFacet>>>,
    /// Issued searches; read through [`recorded_searches`].
    ///
    /// [`recorded_searches`]: StaticSource::recorded_searches
    pub recorded_searches: Mutex<Vec<RecordedSearch>>,
}

impl StaticSource {
    /// Enqueues the facet list the next `super_search` call will return.
    pub fn push_search_response(&self, facets: Vec<VersionFacet>) {
        self.search_responses
            .lock()
            .expect("search response queue poisoned")
            .push_back(facets);
    }

    /// All `SuperSearch` calls issued so far, in order.
    pub fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.recorded_searches
            .lock()
            .expect("recorded search log poisoned")
            .clone()
    }
}

#[async_trait]
impl CrashDataSource for StaticSource {
    async fn platforms(&self) -> ApiResult<Vec<String>> {
        Ok(self.platforms.clone())
    }

    async fn product_versions(
        &self,
        products: &[String],
        start_after: Day,
    ) -> ApiResult<Vec<VersionInfo>> {
        Ok(self
            .catalog
            .iter()
            .filter(|v| products.contains(&v.product) && v.start_date > start_after)
            .cloned()
            .collect())
    }

    async fn current_versions(&self) -> ApiResult<Vec<CurrentVersion>> {
        Ok(self.current_versions.clone())
    }

    async fn adi(
        &self,
        _product: &str,
        _versions: &[String],
        day: Day,
        _platforms: &[String],
    ) -> ApiResult<Vec<AdiHit>> {
        if self.fail_adi {
            return Err(ApiError::MissingField {
                endpoint: "ADI",
                field: "hits",
            });
        }
        Ok(self.adi_by_day.get(&day).cloned().unwrap_or_default())
    }

    async fn super_search(&self, query: FacetQuery<'_>) -> ApiResult<Vec<VersionFacet>> {
        self.recorded_searches
            .lock()
            .expect("recorded search log poisoned")
            .push(RecordedSearch {
                product: query.product.to_string(),
                day: query.day,
                extra_filters: query
                    .extra_filters
                    .iter()
                    .map(|(key, values)| {
                        (
                            (*key).to_string(),
                            values.iter().map(|v| (*v).to_string()).collect(),
                        )
                    })
                    .collect(),
            });

        self.search_responses
            .lock()
            .expect("search response queue poisoned")
            .pop_front()
            .ok_or(ApiError::MissingField {
                endpoint: "SuperSearch",
                field: "facets.version",
            })
    }

    async fn crashes_per_adu(
        &self,
        _product: &str,
        _versions: &[String],
        _from: Day,
        _to: Day,
    ) -> ApiResult<CrashesPerAduHits> {
        Ok(self.rate_hits.clone())
    }
}
