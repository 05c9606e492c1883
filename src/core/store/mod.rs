use async_trait::async_trait;

use crate::core::naming::PtMovie;
use crate::utils::Error;

/// Destination for movies picked up by the sync handler.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn update_items(&self, movies: &[PtMovie]) -> Result<(), Error>;
}

/// Stand-in store that only writes the items to the log.
#[derive(Debug, Default, Clone)]
pub struct LogStore;

#[async_trait]
impl MovieStore for LogStore {
    async fn update_items(&self, movies: &[PtMovie]) -> Result<(), Error> {
        for movie in movies {
            tracing::info!(
                "update item: site={} id={} title='{}' year={:?} size={}",
                movie.site_name,
                movie.id,
                movie.info.title,
                movie.info.year,
                movie.info.size
            );
        }
        tracing::info!("updated {} items", movies.len());
        Ok(())
    }
}
