use std::future::Future;

use tracing::debug;

use crate::api::ApiError;
use crate::cache::{QueryCache, QueryKey};

/// Read `key` through the cache, cloning the shared value out.
pub(crate) async fn read<T, Fut>(
    cache: &QueryCache<ApiError>,
    key: QueryKey,
    load: Fut,
) -> Result<T, ApiError>
where
    T: Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let value = cache.fetch(&key, move || load).await?;
    Ok(T::clone(&value))
}

/// Invalidate each family after a successful mutation.
pub(crate) fn invalidate(cache: &QueryCache<ApiError>, mutation: &'static str, families: &[QueryKey]) {
    let affected: usize = families.iter().map(|prefix| cache.invalidate(prefix)).sum();
    debug!(mutation, families = families.len(), affected, "invalidated after mutation");
}
