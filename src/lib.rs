//! YMS - sort liked Yandex Music tracks into per-artist playlists
//!
//! Every liked track is placed into a playlist named after its first artist,
//! creating playlists as needed. Playlists can also be bulk-deleted by title prefix.

/// Delete mode
pub mod cleaner;
/// Client modules for interacting with the music service
pub mod clients;
/// Run configuration
pub mod config;
/// Success and failure counting
pub mod report;
/// Sort mode
pub mod sorter;

#[cfg(test)]
mod test_utils;
