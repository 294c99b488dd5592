//! Data-source trait definition for polymorphic engine consumers.

use crate::error::ApiResult;
use crate::models::{AdiHit, CrashesPerAduHits, CurrentVersion, FacetQuery, VersionFacet};
use async_trait::async_trait;
use crashtrend_common::{Day, VersionInfo};

/// Read-only view of the remote crash statistics service.
///
/// The aggregation engine only talks to this trait, so tests can drive it
/// with canned fixtures instead of a live endpoint.
#[async_trait]
pub trait CrashDataSource: Send + Sync {
    /// Names of all platforms known to the service.
    async fn platforms(&self) -> ApiResult<Vec<String>>;

    /// Version catalog rows for `products` whose start date is after
    /// `start_after`, excluding rapid-beta parent versions.
    async fn product_versions(
        &self,
        products: &[String],
        start_after: Day,
    ) -> ApiResult<Vec<VersionInfo>>;

    /// The older, unfiltered version catalog.
    async fn current_versions(&self) -> ApiResult<Vec<CurrentVersion>>;

    /// Active-install counts for `versions` of `product` on `day`.
    async fn adi(
        &self,
        product: &str,
        versions: &[String],
        day: Day,
        platforms: &[String],
    ) -> ApiResult<Vec<AdiHit>>;

    /// Crash counts faceted by version with the sub-facets described by
    /// the query's [`FacetMode`](crate::models::FacetMode).
    async fn super_search(&self, query: FacetQuery<'_>) -> ApiResult<Vec<VersionFacet>>;

    /// Per-version, per-day crash volume and active-user counts over an
    /// inclusive day range.
    async fn crashes_per_adu(
        &self,
        product: &str,
        versions: &[String],
        from: Day,
        to: Day,
    ) -> ApiResult<CrashesPerAduHits>;
}
