use std::path::Path;

use anyhow::Context;

use crate::model::NewApartment;

use super::Store;

/// Loads a JSON array of apartments into an empty store. A store that
/// already holds apartments is left alone. Returns how many were inserted.
pub async fn seed_from_file(store: &dyn Store, path: &Path) -> anyhow::Result<usize> {
    if store.count_apartments().await? > 0 {
        tracing::info!(path = %path.display(), "store already has apartments, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let apartments: Vec<NewApartment> =
        serde_json::from_slice(&raw).with_context(|| format!("parsing seed file {}", path.display()))?;

    let count = apartments.len();
    for (i, new) in apartments.into_iter().enumerate() {
        store
            .insert_apartment(new)
            .await
            .with_context(|| format!("seed entry #{i}"))?;
    }

    tracing::info!(count, path = %path.display(), "seeded apartments");
    Ok(count)
}
