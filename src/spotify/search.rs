use crate::types::{CatalogTrack, SearchResponse};

use super::{CatalogError, SpotifyClient, check_status};

impl SpotifyClient {
    /// Searches the catalog for tracks matching a free-text query.
    ///
    /// Issues `GET /search?q={query}&type=track&limit={limit}&market={market}`.
    /// Null entries, which Spotify occasionally returns for unavailable tracks,
    /// are skipped.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Unauthorized` when the token is rejected
    /// - `CatalogError::Status` for other non-2xx responses
    /// - `CatalogError::Transport` for network failures, timeouts and bad JSON
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<CatalogTrack>, CatalogError> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(self.url("/search"))
            .bearer_auth(&self.token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", limit.as_str()),
                ("market", self.market.as_str()),
            ])
            .send()
            .await?;

        let res = check_status(response)
            .await?
            .json::<SearchResponse>()
            .await?;

        Ok(res.tracks.items.into_iter().flatten().collect())
    }
}
