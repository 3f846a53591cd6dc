use crate::types::{RecentlyPlayedResponse, TopTracksResponse, UserProfile};

use super::{CatalogError, SpotifyClient, check_status};

impl SpotifyClient {
    /// Fetches the current user's profile from `GET /me`.
    ///
    /// The full profile document is kept (unknown fields land in
    /// `UserProfile::extra`) so it can be handed back to callers unchanged.
    pub async fn get_profile(&self) -> Result<UserProfile, CatalogError> {
        let response = self
            .http
            .get(self.url("/me"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(check_status(response).await?.json::<UserProfile>().await?)
    }

    /// Ids of the tracks the user played most recently.
    ///
    /// Requires the `user-read-recently-played` scope; without it Spotify
    /// answers with 401 or 403 and the caller treats history as empty.
    pub async fn get_recently_played(&self, limit: u32) -> Result<Vec<String>, CatalogError> {
        let response = self
            .http
            .get(self.url("/me/player/recently-played"))
            .bearer_auth(&self.token)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let res = check_status(response)
            .await?
            .json::<RecentlyPlayedResponse>()
            .await?;

        Ok(res.items.into_iter().map(|item| item.track.id).collect())
    }

    /// Ids of the user's short-term top tracks.
    pub async fn get_top_tracks(&self, limit: u32) -> Result<Vec<String>, CatalogError> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(self.url("/me/top/tracks"))
            .bearer_auth(&self.token)
            .query(&[("limit", limit.as_str()), ("time_range", "short_term")])
            .send()
            .await?;

        let res = check_status(response)
            .await?
            .json::<TopTracksResponse>()
            .await?;

        Ok(res.items.into_iter().map(|t| t.id).collect())
    }
}
