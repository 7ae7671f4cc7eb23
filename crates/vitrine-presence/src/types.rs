//! Wire types for presence snapshots pushed by the Lanyard-compatible service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Full presence snapshot for one user, as carried by an `op: 0` dispatch or
/// the REST lookup envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceData {
    pub spotify: Option<Spotify>,
    #[serde(default)]
    pub kv: HashMap<String, String>,
    pub listening_to_spotify: bool,
    pub discord_user: DiscordUser,
    pub discord_status: DiscordStatus,
    pub activities: Vec<Activity>,
    pub active_on_discord_web: bool,
    pub active_on_discord_mobile: bool,
    pub active_on_discord_desktop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscordStatus {
    Online,
    Idle,
    Dnd,
    Offline,
}

/// One structured activity entry. The exposed activity list is replaced
/// wholesale on every dispatch; entries are never merged field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    /// Discord activity type code (0 = playing, 2 = listening, ...).
    #[serde(rename = "type")]
    pub kind: u8,
    pub created_at: u64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub timestamps: Option<Timestamps>,
    #[serde(default)]
    pub emoji: Option<Emoji>,
    #[serde(default)]
    pub party: Option<Party>,
    #[serde(default)]
    pub assets: Option<Assets>,
    #[serde(default)]
    pub flags: Option<u64>,
    #[serde(default)]
    pub sync_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub buttons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spotify {
    pub track_id: Option<String>,
    pub timestamps: Timestamps,
    pub song: String,
    pub artist: String,
    pub album_art_url: Option<String>,
    pub album: String,
}

/// Unix-millisecond start/end markers. Either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub discriminator: String,
    pub public_flags: u64,
    #[serde(default)]
    pub bot: bool,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub name: String,
    /// Set for custom emoji only.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub id: Option<String>,
    /// `[current, max]` party size.
    #[serde(default)]
    pub size: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub large_image: Option<String>,
    #[serde(default)]
    pub large_text: Option<String>,
    #[serde(default)]
    pub small_image: Option<String>,
    #[serde(default)]
    pub small_text: Option<String>,
}
