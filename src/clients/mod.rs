/// Data entities for tracks, artists and playlists
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Capabilities expected from the music service
pub mod service;
/// Yandex Music API client
pub mod yandex;

#[cfg(test)]
pub use service::MockMusicService;
pub use service::MusicService;
pub use yandex::YandexMusicClient;
