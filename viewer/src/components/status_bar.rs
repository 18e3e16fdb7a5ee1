//! Bottom status bar: last message, entity totals, selection and edit state.

use leptos::prelude::*;

use crate::state::viewer::{StatusLevel, ViewerState};

#[cfg(feature = "hydrate")]
const INFO_TIMEOUT_MS: u32 = 4_000;
#[cfg(feature = "hydrate")]
const ERROR_TIMEOUT_MS: u32 = 10_000;

/// Status bar at the bottom of the viewer.
///
/// Messages expire on their own; a newer message is never cleared by an
/// older message's timer.
#[component]
pub fn StatusBar() -> impl IntoView {
    let viewer = expect_context::<RwSignal<ViewerState>>();

    #[cfg(feature = "hydrate")]
    {
        Effect::new(move || {
            let Some((seq, level)) = viewer.with(|v| v.status.as_ref().map(|s| (s.seq, s.level))) else {
                return;
            };
            let delay = if level == StatusLevel::Error { ERROR_TIMEOUT_MS } else { INFO_TIMEOUT_MS };
            gloo_timers::callback::Timeout::new(delay, move || viewer.update(|v| v.expire_status(seq))).forget();
        });
    }

    let message_class = move || {
        viewer.with(|v| match v.status.as_ref().map(|s| s.level) {
            Some(StatusLevel::Error) => "status-bar__message status-bar__message--error",
            _ => "status-bar__message",
        })
    };
    let message = move || viewer.with(|v| v.status.as_ref().map(|s| s.text.clone()).unwrap_or_default());
    let counts = move || {
        let c = viewer.with(|v| v.counts);
        format!(
            "{} markers | {} event spawns | {} zones | {} spawn points | {} effect areas",
            c.markers, c.event_spawns, c.zones, c.spawn_points, c.effect_areas
        )
    };
    let selection = move || format!("{} selected", viewer.with(|v| v.selected));
    let edit = move || {
        viewer.with(|v| match (v.edit_mode, v.dirty) {
            (false, _) => String::new(),
            (true, 0) => "Editing".to_owned(),
            (true, n) => format!("Editing, {n} unsaved"),
        })
    };
    let backend = move || viewer.with(|v| v.backend.unwrap_or("-"));

    view! {
        <div class="status-bar">
            <span class=message_class>{message}</span>
            <span class="status-bar__spacer"></span>
            <span class="status-bar__edit">{edit}</span>
            <span class="status-bar__divider">"|"</span>
            <span class="status-bar__selection">{selection}</span>
            <span class="status-bar__divider">"|"</span>
            <span class="status-bar__counts">{counts}</span>
            <span class="status-bar__divider">"|"</span>
            <span class="status-bar__backend" title="Background renderer">{backend}</span>
        </div>
    }
}
