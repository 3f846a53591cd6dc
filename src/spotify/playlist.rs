use crate::types::{AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse};

use super::{CatalogError, SpotifyClient, check_status};

impl SpotifyClient {
    /// Creates a playlist owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Any non-2xx answer, including 403 when the token lacks
    /// `playlist-modify-public`, is returned as a `CatalogError`.
    pub async fn create(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let response = self
            .http
            .post(self.url(&format!("/users/{}/playlists", user_id)))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        Ok(check_status(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?)
    }

    /// Appends track uris to a playlist in one request.
    ///
    /// Spotify accepts at most 100 uris per call; the pipeline never sends more
    /// than 15.
    pub async fn add(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    pub async fn follow(&self, playlist_id: &str) -> Result<(), CatalogError> {
        let response = self
            .http
            .put(self.url(&format!("/playlists/{}/followers", playlist_id)))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
