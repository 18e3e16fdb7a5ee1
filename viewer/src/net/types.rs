//! Wire DTOs for the map viewer endpoints.
//!
//! DESIGN
//! ======
//! Every endpoint answers `{success, error?, ...payload}`. The status
//! fields are checked by [`parse_envelope`] before the payload is read, so
//! each body type only names its own collection.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use mapview::doc::{EffectArea, EventSpawn, MarkerGroup, PlayerSpawnPoint, Territory};
use mapview::error::ViewerError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

fn default_true() -> bool {
    true
}

/// Status fields shared by every response.
#[derive(Clone, Debug, Deserialize)]
pub struct ResponseStatus {
    /// Older endpoints omit the flag on success.
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ResponseStatus {
    /// # Errors
    ///
    /// [`ViewerError::Network`] carrying the server's message when the call failed.
    pub fn check(self) -> Result<(), ViewerError> {
        match (self.success, self.error) {
            (true, None) => Ok(()),
            (_, Some(message)) => Err(ViewerError::Network(message)),
            (false, None) => Err(ViewerError::Network("request failed".to_owned())),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroupsBody {
    #[serde(default, alias = "markers")]
    pub groups: Vec<MarkerGroup>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventSpawnsBody {
    #[serde(default)]
    pub event_spawns: Vec<EventSpawn>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TerritoriesBody {
    #[serde(default)]
    pub territories: Vec<Territory>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SpawnPointsBody {
    #[serde(default)]
    pub spawn_points: Vec<PlayerSpawnPoint>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EffectAreasBody {
    #[serde(default, alias = "effect_areas")]
    pub areas: Vec<EffectArea>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadBody {
    pub image_id: String,
}

/// Payload-free response (save, delete).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Empty {}

/// Check the status fields of a JSON body, then read the payload `T` from it.
///
/// # Errors
///
/// [`ViewerError::Network`] for malformed JSON or a failed status.
pub fn parse_envelope<T: DeserializeOwned>(raw: &str) -> Result<T, ViewerError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(malformed)?;
    read_envelope(value)
}

fn read_envelope<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ViewerError> {
    ResponseStatus::deserialize(&value).map_err(malformed)?.check()?;
    T::deserialize(value).map_err(malformed)
}

/// Interpret an HTTP response. A server-supplied error message wins over the
/// bare status code.
///
/// # Errors
///
/// [`ViewerError::Network`] for a non-2xx status, a failed envelope, or a
/// malformed 2xx body.
pub fn interpret<T: DeserializeOwned>(status: u16, raw: &str) -> Result<T, ViewerError> {
    let ok = (200..300).contains(&status);
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) if ok => return Err(malformed(err)),
        Err(_) => return Err(http_error(status)),
    };
    let body = read_envelope(value)?;
    if ok { Ok(body) } else { Err(http_error(status)) }
}

/// Outcome of the position-save call. A rejection by the server keeps the
/// local edits, so it is reported as a conflict rather than a network fault.
///
/// # Errors
///
/// [`ViewerError::PersistenceConflict`] with the server's message.
pub fn save_outcome(status: u16, raw: &str) -> Result<(), ViewerError> {
    interpret::<Empty>(status, raw).map(|_| ()).map_err(|err| match err {
        ViewerError::Network(message) => ViewerError::PersistenceConflict(message),
        other => other,
    })
}

fn malformed(err: serde_json::Error) -> ViewerError {
    ViewerError::Network(format!("malformed response: {err}"))
}

fn http_error(status: u16) -> ViewerError {
    ViewerError::Network(format!("HTTP {status}"))
}
