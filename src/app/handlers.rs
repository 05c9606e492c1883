use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::core::feed::{fetch_movies, FeedSource};
use crate::core::naming::PtMovie;
use crate::utils::{Error, SyncResult};

/// Fetch both feeds and return every parsed item, HDChina first.
/// A feed that fails to load contributes nothing; a missing passkey fails
/// the whole request before anything is fetched.
pub async fn aggregate(State(state): State<AppState>) -> Result<Json<Vec<PtMovie>>, Error> {
    let hdc_url = resolve(&state.hdchina)?;
    let putao_url = resolve(&state.putao)?;

    let (hdc, putao) = tokio::join!(
        fetch_movies(&state.client, &state.hdchina, &hdc_url),
        fetch_movies(&state.client, &state.putao, &putao_url),
    );

    let mut movies = movies_or_empty(hdc, &state.hdchina);
    movies.extend(movies_or_empty(putao, &state.putao));

    Ok(Json(movies))
}

/// Poll the HDChina feed and pass the items to the store. Any failure is a 500.
pub async fn sync(State(state): State<AppState>) -> Result<Json<Value>, Error> {
    let url = resolve(&state.hdchina)?;

    let movies = fetch_movies(&state.client, &state.hdchina, &url)
        .await
        .inspect_err(|e| tracing::error!("failed to get {} Rss, {e}", state.hdchina.site))?;

    state
        .store
        .update_items(&movies)
        .await
        .inspect_err(|e| tracing::error!("failed to update items, {e}"))?;

    Ok(Json(json!({ "status": "success" })))
}

fn resolve(source: &FeedSource) -> SyncResult<String> {
    source
        .resolve_url()
        .inspect_err(|e| tracing::error!("failed to construct {} rss url, {e}", source.site))
}

fn movies_or_empty(result: SyncResult<Vec<PtMovie>>, source: &FeedSource) -> Vec<PtMovie> {
    result.unwrap_or_else(|e| {
        tracing::error!("failed to get {} Rss, {e}", source.site);
        Vec::new()
    })
}
