//! Layer toggles, background opacity, and the background raster controls.

use leptos::prelude::*;

use crate::state::commands::{Command, CommandQueue};
use crate::state::layers::{Layer, parse_side, with_opacity_percent};
use crate::state::viewer::ViewerState;

/// Layer panel.
///
/// Toggles go straight to the engine through the command queue. A new
/// raster is uploaded first; only its id and world size are kept locally.
/// Blank size fields on upload mean one meter per image pixel.
#[component]
pub fn LayerPanel() -> impl IntoView {
    let viewer = expect_context::<RwSignal<ViewerState>>();
    let commands = expect_context::<RwSignal<CommandQueue>>();
    let send = move |command: Command| commands.update(|q| q.push(command));

    let file_ref = NodeRef::<leptos::html::Input>::new();
    let width = RwSignal::new(String::new());
    let height = RwSignal::new(String::new());
    let uploading = RwSignal::new(false);

    Effect::new(move || {
        if let Some(reference) = viewer.with(|v| v.background.clone()) {
            width.set(reference.width_m.to_string());
            height.set(reference.height_m.to_string());
        }
    });

    let has_background = move || viewer.with(|v| v.background.is_some());
    let opacity_percent = move || format!("{:.0}", viewer.with(|v| v.layers.background_opacity) * 100.0);

    let on_upload = move |_| {
        #[cfg(feature = "hydrate")]
        {
            use mapview::error::ViewerError;
            use mapview::settings::BackgroundRef;

            let Some(file) = file_ref.get_untracked().and_then(|input| input.files()).and_then(|files| files.get(0))
            else {
                viewer.update(|v| {
                    v.error(&ViewerError::Validation("choose an image file first".to_owned()));
                });
                return;
            };
            let side = |raw: String| if raw.trim().is_empty() { 0.0 } else { parse_side(&raw) };
            let (width_m, height_m) = (side(width.get_untracked()), side(height.get_untracked()));
            uploading.set(true);
            viewer.update(|v| {
                v.info(format!("Uploading {}...", file.name()));
            });
            leptos::task::spawn_local(async move {
                match crate::net::api::upload_background(&file).await {
                    Ok(image_id) => {
                        log::info!("viewer: uploaded background {image_id}");
                        send(Command::ShowBackground(BackgroundRef { image_id, width_m, height_m }));
                    }
                    Err(err) => viewer.update(|v| {
                        v.error(&err);
                    }),
                }
                uploading.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (file_ref, uploading);
        }
    };

    let on_apply_size = move |_| {
        send(Command::ResizeBackground {
            width_m: parse_side(&width.get_untracked()),
            height_m: parse_side(&height.get_untracked()),
        });
    };

    view! {
        <div class="layer-panel">
            <h3 class="layer-panel__title">"Layers"</h3>
            {Layer::ALL
                .into_iter()
                .map(|layer| {
                    view! {
                        <label class="layer-panel__row">
                            <input
                                type="checkbox"
                                prop:checked=move || viewer.with(|v| layer.is_shown(&v.layers))
                                on:change=move |ev| {
                                    let shown = event_target_checked(&ev);
                                    let layers = viewer.with_untracked(|v| v.layers);
                                    send(Command::SetLayers(layer.with(layers, shown)));
                                }
                            />
                            {layer.label()}
                        </label>
                    }
                })
                .collect_view()}

            <h3 class="layer-panel__title">"Background image"</h3>
            <input type="file" accept="image/*" node_ref=file_ref/>
            <div class="layer-panel__size">
                <label>
                    "Width (m)"
                    <input
                        type="text"
                        placeholder="image px"
                        prop:value=move || width.get()
                        on:input=move |ev| width.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Height (m)"
                    <input
                        type="text"
                        placeholder="image px"
                        prop:value=move || height.get()
                        on:input=move |ev| height.set(event_target_value(&ev))
                    />
                </label>
            </div>
            <div class="layer-panel__actions">
                <button class="btn" disabled=move || uploading.get() on:click=on_upload>
                    {move || if uploading.get() { "Uploading..." } else { "Upload" }}
                </button>
                <Show when=has_background>
                    <button class="btn" on:click=on_apply_size>
                        "Apply size"
                    </button>
                    <button class="btn btn--danger" on:click=move |_| send(Command::RemoveBackground)>
                        "Remove"
                    </button>
                </Show>
            </div>
            <Show when=has_background>
                <label class="layer-panel__row">
                    "Opacity"
                    <input
                        type="range"
                        min="0"
                        max="100"
                        prop:value=opacity_percent
                        on:input=move |ev| {
                            let layers = viewer.with_untracked(|v| v.layers);
                            send(Command::SetLayers(with_opacity_percent(layers, &event_target_value(&ev))));
                        }
                    />
                </label>
            </Show>
        </div>
    }
}
