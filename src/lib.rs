//! SongDeck - Song catalog page with Spotify preview playback
//!
//! This library fetches the song list from a catalog service and renders it
//! as a web page whose cards play previews or open the Spotify link.

/// Client modules for interacting with the catalog service
pub mod clients;
/// Server configuration
pub mod config;
/// Preview URL resolution, click dispatch and playback state
pub mod player;
/// Axum routes and page rendering
pub mod web;
