// Startup seed - one best-effort fetch of the remote dataset

use crate::document::Document;
use crate::error::Result;
use crate::store::UserStore;

/// Remote dataset fetched when no seed URL is configured.
pub const DEFAULT_SEED_URL: &str = "https://dummyjson.com/users";

/// Fetch the seed dataset and persist the response body verbatim as the
/// document file, overwriting any prior content. The whole body is
/// accumulated before anything is written; a failed fetch leaves an
/// existing file untouched.
pub async fn fetch_seed(url: &str, store: &UserStore) -> Result<()> {
    let body = reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?;
    store.write_raw(&body)?;
    Ok(())
}

/// Run the seed step ahead of serving requests. Completion (or failure)
/// gates readiness; there is no background fetch racing the first request.
///
/// Failure is logged, never fatal. An existing document survives
/// untouched, and a missing one is initialized empty so reads succeed
/// before the remote is reachable again. No retry, no backoff.
pub async fn seed_or_fallback(url: &str, store: &UserStore) -> Result<()> {
    match fetch_seed(url, store).await {
        Ok(()) => {
            log::info!(
                "Seed dataset from {url} saved to {}",
                store.path().display()
            );
        }
        Err(e) => {
            log::warn!("Seed fetch from {url} failed: {e}");
            if !store.exists() {
                store.save(&Document::default())?;
                log::info!(
                    "Initialized empty document at {}",
                    store.path().display()
                );
            }
        }
    }
    Ok(())
}
