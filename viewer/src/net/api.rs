//! REST API helpers for the map viewer endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning [`ViewerError::Network`], since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Only the marker groups are required for a mission load. The other
//! collections degrade to empty with a warning so one missing file does not
//! hide the rest of the map.

#![allow(clippy::unused_async)]

use mapview::doc::MissionData;
use mapview::edit::SaveRequest;
use mapview::error::ViewerError;

#[cfg(feature = "hydrate")]
use super::types::{
    EffectAreasBody, Empty, EventSpawnsBody, GroupsBody, SpawnPointsBody, TerritoriesBody, UploadBody, interpret,
    save_outcome,
};

/// URL the background raster with `image_id` is served from.
#[must_use]
pub fn background_image_url(image_id: &str) -> String {
    format!("/api/background-image/{image_id}")
}

#[cfg(feature = "hydrate")]
fn transport(err: gloo_net::Error) -> ViewerError {
    ViewerError::Network(err.to_string())
}

#[cfg(feature = "hydrate")]
async fn read<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ViewerError> {
    let status = resp.status();
    let raw = resp.text().await.map_err(transport)?;
    interpret(status, &raw)
}

#[cfg(feature = "hydrate")]
async fn get_collection<T: serde::de::DeserializeOwned>(path: &str, mission_dir: &str) -> Result<T, ViewerError> {
    let resp = gloo_net::http::Request::get(path)
        .query([("mission_dir", mission_dir)])
        .send()
        .await
        .map_err(transport)?;
    read(resp).await
}

#[cfg(feature = "hydrate")]
fn optional<T: Default>(what: &str, result: Result<T, ViewerError>) -> T {
    result.unwrap_or_else(|err| {
        log::warn!("api: {what} unavailable: {err}");
        T::default()
    })
}

/// Load every collection of one mission directory.
///
/// # Errors
///
/// [`ViewerError::Validation`] for an empty directory, [`ViewerError::Network`]
/// when the marker groups cannot be loaded.
pub async fn fetch_mission(mission_dir: &str) -> Result<MissionData, ViewerError> {
    if mission_dir.trim().is_empty() {
        return Err(ViewerError::Validation("enter a mission directory".to_owned()));
    }
    #[cfg(feature = "hydrate")]
    {
        let (groups, event_spawns, territories, spawn_points, areas) = futures::join!(
            get_collection::<GroupsBody>("/api/groups", mission_dir),
            get_collection::<EventSpawnsBody>("/api/event-spawns", mission_dir),
            get_collection::<TerritoriesBody>("/api/territories", mission_dir),
            get_collection::<SpawnPointsBody>("/api/player-spawn-points", mission_dir),
            get_collection::<EffectAreasBody>("/api/effect-areas", mission_dir),
        );
        Ok(MissionData {
            markers: groups?.groups,
            event_spawns: optional("event spawns", event_spawns).event_spawns,
            territories: optional("territories", territories).territories,
            spawn_points: optional("player spawn points", spawn_points).spawn_points,
            effect_areas: optional("effect areas", areas).areas,
        })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ViewerError::Network("not available outside the browser".to_owned()))
    }
}

/// Persist a batch of moved spawn points with `PUT /api/player-spawn-points/save`.
///
/// # Errors
///
/// [`ViewerError::PersistenceConflict`] when the server rejects the batch,
/// [`ViewerError::Network`] when it cannot be reached.
pub async fn save_spawn_points(request: &SaveRequest) -> Result<(), ViewerError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::put("/api/player-spawn-points/save")
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let raw = resp.text().await.map_err(transport)?;
        save_outcome(status, &raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(ViewerError::Network("not available outside the browser".to_owned()))
    }
}

/// Upload a raster with `POST /api/upload-background-image`. Returns its id.
///
/// # Errors
///
/// [`ViewerError::Network`] when the upload is refused or fails.
#[cfg(feature = "hydrate")]
pub async fn upload_background(file: &web_sys::File) -> Result<String, ViewerError> {
    let form = web_sys::FormData::new().map_err(|e| ViewerError::Network(format!("{e:?}")))?;
    form.append_with_blob_and_filename("image", file, &file.name())
        .map_err(|e| ViewerError::Network(format!("{e:?}")))?;
    let resp = gloo_net::http::Request::post("/api/upload-background-image")
        .body(form)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    let body: UploadBody = read(resp).await?;
    Ok(body.image_id)
}

/// Remove a raster with `DELETE /api/delete-background-image/{id}`.
///
/// # Errors
///
/// [`ViewerError::Network`] when the server refuses or cannot be reached.
pub async fn delete_background(image_id: &str) -> Result<(), ViewerError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::delete(&format!("/api/delete-background-image/{image_id}"))
            .send()
            .await
            .map_err(transport)?;
        read::<Empty>(resp).await.map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = image_id;
        Err(ViewerError::Network("not available outside the browser".to_owned()))
    }
}
