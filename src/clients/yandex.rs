use async_trait::async_trait;
use log::debug;
use reqwest::{RequestBuilder, StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::sync::OnceCell;

use crate::clients::{
    entities::{Playlist, Track, TrackRef, Visibility},
    errors::{Error, Result},
    service::MusicService,
};

pub const DEFAULT_API_URL: &str = "https://api.music.yandex.net";

// Every successful response is wrapped into {"invocationInfo": ..., "result": ...}
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    result: T,
}

#[derive(Deserialize, Debug)]
struct AccountStatus {
    account: Account,
}

#[derive(Deserialize, Debug)]
struct Account {
    uid: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct Likes {
    library: LikedLibrary,
}

#[derive(Deserialize, Debug)]
struct LikedLibrary {
    #[serde(default)]
    tracks: Vec<TrackRef>,
}

// Error bodies come either as {"error": {"name", "message"}} or, from the auth layer,
// as {"error": "name", "error_description": "message"}
fn api_error(status: StatusCode, body: &str) -> Error {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let (name, message) = match &parsed["error"] {
        Value::Object(error) => (
            error.get("name").and_then(Value::as_str),
            error.get("message").and_then(Value::as_str),
        ),
        Value::String(name) => (
            Some(name.as_str()),
            parsed["error_description"].as_str(),
        ),
        _ => (None, None),
    };
    Error::Api {
        status,
        name: name.unwrap_or("unknown").to_string(),
        message: message.unwrap_or(body).to_string(),
    }
}

/// Yandex Music client authorized with an OAuth token.
pub struct YandexMusicClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    // Resolved on the first user-scoped call
    uid: OnceCell<u64>,
}

impl YandexMusicClient {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("yms/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(YandexMusicClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            uid: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }

    /// Uid of the account the token belongs to.
    pub async fn uid(&self) -> Result<u64> {
        self.uid
            .get_or_try_init(|| async {
                debug!("Fetching account status ...");
                let status: AccountStatus =
                    self.send(self.http.get(self.url("/account/status"))).await?;
                let uid = status.account.uid.ok_or_else(|| {
                    Error::UnexpectedResponse(
                        "account status has no uid, the token is probably invalid".into(),
                    )
                })?;
                debug!("Authenticated as user {uid}");
                Ok::<u64, Error>(uid)
            })
            .await
            .copied()
    }

    async fn owner_uid(&self, playlist: &Playlist) -> Result<u64> {
        match playlist.uid {
            Some(uid) => Ok(uid),
            None => self.uid().await,
        }
    }

    async fn fetch_tracks(&self, ids: Vec<String>) -> Result<Vec<Track>> {
        let form = [
            ("track-ids", ids.join(",")),
            ("with-positions", "true".to_string()),
        ];
        self.send(self.http.post(self.url("/tracks")).form(&form))
            .await
    }
}

#[async_trait]
impl MusicService for YandexMusicClient {
    async fn liked_tracks(&self) -> Result<Vec<TrackRef>> {
        let uid = self.uid().await?;
        let likes: Likes = self
            .send(self.http.get(self.url(&format!("/users/{uid}/likes/tracks"))))
            .await?;
        debug!("Fetched {} liked track references", likes.library.tracks.len());
        Ok(likes.library.tracks)
    }

    async fn resolve_tracks(&self, refs: &[TrackRef]) -> Result<Vec<Track>> {
        if refs.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_tracks(refs.iter().map(TrackRef::qualified_id).collect())
            .await
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let uid = self.uid().await?;
        self.send(self.http.get(self.url(&format!("/users/{uid}/playlists/list"))))
            .await
    }

    async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<TrackRef>> {
        let owner = self.owner_uid(playlist).await?;
        let full: Playlist = self
            .send(
                self.http
                    .get(self.url(&format!("/users/{owner}/playlists/{}", playlist.kind))),
            )
            .await?;
        Ok(full.tracks)
    }

    async fn resolve_track(&self, track: &TrackRef) -> Result<Track> {
        if let Some(full) = &track.track {
            return Ok(full.clone());
        }
        self.fetch_tracks(vec![track.qualified_id()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse(format!("track {} not found", track.id)))
    }

    async fn create_playlist(&self, title: &str, visibility: Visibility) -> Result<Playlist> {
        let uid = self.uid().await?;
        let form = [("title", title), ("visibility", visibility.as_str())];
        self.send(
            self.http
                .post(self.url(&format!("/users/{uid}/playlists/create")))
                .form(&form),
        )
        .await
    }

    async fn insert_track(
        &self,
        playlist: &Playlist,
        track_id: &str,
        album_id: &str,
    ) -> Result<Playlist> {
        let owner = self.owner_uid(playlist).await?;
        let diff = json!([{
            "op": "insert",
            "at": 0,
            "tracks": [{"id": track_id, "albumId": album_id}]
        }]);
        let form = [
            ("kind", playlist.kind.to_string()),
            ("revision", playlist.revision.to_string()),
            ("diff", diff.to_string()),
        ];
        self.send(
            self.http
                .post(self.url(&format!(
                    "/users/{owner}/playlists/{}/change-relative",
                    playlist.kind
                )))
                .form(&form),
        )
        .await
    }

    async fn delete_playlist(&self, kind: u64) -> Result<bool> {
        let uid = self.uid().await?;
        let result: Value = self
            .send(
                self.http
                    .post(self.url(&format!("/users/{uid}/playlists/{kind}/delete"))),
            )
            .await?;
        Ok(result.as_str() == Some("ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body_is_unpacked() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"invocationInfo": {}, "error": {"name": "playlist-not-found", "message": "Playlist not found"}}"#,
        );
        match err {
            Error::Api { status, name, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(name, "playlist-not-found");
                assert_eq!(message, "Playlist not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn auth_error_body_is_unpacked() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "session-expired", "error_description": "Token expired"}"#,
        );
        assert!(matches!(
            err,
            Error::Api { ref name, ref message, .. } if name == "session-expired" && message == "Token expired"
        ));
    }

    #[test]
    fn unparseable_error_body_is_kept_as_message() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(
            err,
            Error::Api { ref name, ref message, .. } if name == "unknown" && message == "<html>bad gateway</html>"
        ));
    }

    #[test]
    fn likes_envelope_is_unwrapped() {
        let envelope: Envelope<Likes> = serde_json::from_str(
            r#"{
                "invocationInfo": {"req-id": "abc"},
                "result": {"library": {"uid": 55, "revision": 3, "tracks": [
                    {"id": "100", "albumId": "200", "timestamp": "2024-05-01T10:00:00+00:00"},
                    {"id": "101", "albumId": "201", "timestamp": "2024-04-01T10:00:00+00:00"}
                ]}}
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = envelope
            .result
            .library
            .tracks
            .iter()
            .map(TrackRef::qualified_id)
            .collect();
        assert_eq!(ids, ["100:200", "101:201"]);
    }

    #[test]
    fn delete_result_is_plain_string() {
        let envelope: Envelope<Value> =
            serde_json::from_str(r#"{"invocationInfo": {}, "result": "ok"}"#).unwrap();
        assert_eq!(envelope.result.as_str(), Some("ok"));
    }

    #[test]
    fn api_url_trailing_slash_is_dropped() {
        let client = YandexMusicClient::new("token", "http://localhost:8080/").unwrap();
        assert_eq!(client.url("/tracks"), "http://localhost:8080/tracks");
    }

    #[tokio::test]
    async fn embedded_track_resolves_without_a_request() {
        // Unroutable host, any request would fail
        let client = YandexMusicClient::new("token", "http://127.0.0.1:9").unwrap();
        let track: Track =
            serde_json::from_str(r#"{"id": 1, "title": "X", "albums": [{"id": 2}]}"#).unwrap();

        let resolved = client.resolve_track(&TrackRef::from(&track)).await.unwrap();
        assert_eq!(resolved, track);
    }

    #[tokio::test]
    async fn empty_batch_resolves_without_a_request() {
        let client = YandexMusicClient::new("token", "http://127.0.0.1:9").unwrap();
        assert!(client.resolve_tracks(&[]).await.unwrap().is_empty());
    }
}
