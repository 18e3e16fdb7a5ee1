//! Bridge component between Leptos state and the imperative `mapview::engine::Engine`.
//!
//! ARCHITECTURE
//! ============
//! The engine owns hit-testing, selection, editing and drawing. This host
//! maps DOM pointer events onto engine calls, drains the command queue fed
//! by the chrome components, carries out the returned actions (redraws,
//! clipboard, saves, prompts) and publishes a `ViewerState` snapshot.
//!
//! Redraws are coalesced: the engine emits `RenderNeeded` at most once per
//! frame and the host answers it with a single `requestAnimationFrame`.

use leptos::prelude::*;

use crate::state::commands::CommandQueue;
use crate::state::viewer::ViewerState;

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::collections::VecDeque;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use mapview::engine::{Action, Engine};
#[cfg(feature = "hydrate")]
use mapview::error::ViewerError;
#[cfg(feature = "hydrate")]
use mapview::input::Button;
#[cfg(feature = "hydrate")]
use mapview::settings::BackgroundRef;
#[cfg(feature = "hydrate")]
use wasm_bindgen::{JsCast, closure::Closure};
#[cfg(feature = "hydrate")]
use wasm_bindgen_futures::JsFuture;

#[cfg(feature = "hydrate")]
use crate::net::api;
#[cfg(feature = "hydrate")]
use crate::state::commands::Command;
#[cfg(feature = "hydrate")]
use crate::state::layers::fill_size;
#[cfg(feature = "hydrate")]
use crate::state::viewer::LoadStatus;
#[cfg(feature = "hydrate")]
use crate::util::canvas_input::{decision_prompt, failure_alert, mouse_modifiers, mouse_point, wheel_input};
#[cfg(feature = "hydrate")]
use crate::util::persistence;

#[cfg(feature = "hydrate")]
type SharedEngine = Rc<RefCell<Option<Engine>>>;

/// Everything action and command handlers need, cheap to clone into closures.
#[cfg(feature = "hydrate")]
#[derive(Clone)]
struct Host {
    engine: SharedEngine,
    viewer: RwSignal<ViewerState>,
    commands: RwSignal<CommandQueue>,
    canvas_ref: NodeRef<leptos::html::Canvas>,
}

#[cfg(feature = "hydrate")]
impl Host {
    /// Run `f` against the engine, if mounted. The borrow ends before the
    /// result is returned, so callers may process actions afterwards.
    fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        self.engine.borrow_mut().as_mut().map(f)
    }

    fn run(&self, f: impl FnOnce(&mut Engine) -> Vec<Action>) {
        if let Some(actions) = self.with_engine(f) {
            self.process(actions);
        }
    }

    fn try_run(&self, f: impl FnOnce(&mut Engine) -> Result<Vec<Action>, ViewerError>) {
        match self.with_engine(f) {
            Some(Ok(actions)) => self.process(actions),
            Some(Err(err)) => self.report(&err),
            None => {}
        }
    }

    fn report(&self, err: &ViewerError) {
        log::warn!("viewer: {} {err}", err.error_code());
        self.viewer.update(|v| {
            v.error(err);
        });
    }

    /// Carry out engine actions. Follow-up actions (from a save/discard
    /// decision) are appended and handled in the same pass.
    fn process(&self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            self.viewer.update(|v| v.apply(&action));
            match action {
                Action::RenderNeeded => self.request_render(),
                Action::SetCursor(cursor) => self.set_cursor(cursor),
                Action::CopyToClipboard(text) => copy_to_clipboard(text),
                Action::SaveRequested(request) => {
                    let host = self.clone();
                    leptos::task::spawn_local(async move {
                        let result = api::save_spawn_points(&request).await;
                        match &result {
                            Ok(()) => log::info!("viewer: saved {} spawn point(s)", request.spawn_points.len()),
                            Err(err) => log::warn!("viewer: save failed: {err}"),
                        }
                        host.run(|e| e.core.save_finished(result));
                    });
                }
                Action::DecisionRequired { dirty } => {
                    if let Some(follow) = self.decide(dirty) {
                        queue.extend(follow);
                    }
                }
                Action::LayersChanged(layers) => persistence::save_layers(&layers),
                Action::FiltersChanged(filters) => persistence::save_filters(&filters),
                Action::Alert(text) => alert(&text),
                Action::EditModeChanged(_) | Action::SelectionChanged { .. } | Action::Status(_) => {}
            }
        }
        let engine = self.engine.borrow();
        if let Some(engine) = engine.as_ref() {
            self.viewer.update(|v| v.sync_from(&engine.core));
        }
    }

    /// Ask whether to save or discard unsaved moves before leaving edit mode.
    fn decide(&self, dirty: usize) -> Option<Vec<Action>> {
        let window = web_sys::window()?;
        let save = match window.confirm_with_message(&decision_prompt(dirty)) {
            Ok(save) => save,
            Err(err) => {
                log::warn!("viewer: confirm unavailable: {err:?}");
                return None;
            }
        };
        let result = self.with_engine(|e| if save { e.core.save_edits(true) } else { Ok(e.core.discard_edits(true)) })?;
        match result {
            Ok(actions) => Some(actions),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    fn request_render(&self) {
        let Some(window) = web_sys::window() else {
            self.render_now();
            return;
        };
        let host = self.clone();
        let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let holder_for_cb = Rc::clone(&holder);
        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            host.render_now();
            holder_for_cb.borrow_mut().take();
        }) as Box<dyn FnMut(f64)>);
        if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
            *holder.borrow_mut() = Some(cb);
        } else {
            self.render_now();
        }
    }

    fn render_now(&self) {
        if let Some(Err(err)) = self.with_engine(Engine::render) {
            self.viewer.update(|v| {
                v.error(&err);
            });
        }
    }

    fn set_cursor(&self, cursor: &str) {
        if let Some(canvas) = self.canvas_ref.get_untracked() {
            if let Err(err) = canvas.style().set_property("cursor", cursor) {
                log::debug!("viewer: cursor not applied: {err:?}");
            }
        }
    }

    /// Read the canvas CSS size and device pixel ratio and push them to the engine.
    fn sync_viewport(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(canvas) = self.canvas_ref.get_untracked() else {
            return;
        };
        let width = f64::from(canvas.client_width()).max(1.0);
        let height = f64::from(canvas.client_height()).max(1.0);
        let dpr = window.device_pixel_ratio().max(1.0);
        self.run(|e| e.set_viewport(width, height, dpr));
    }

    fn drain_commands(&self) {
        if self.engine.borrow().is_none() {
            return;
        }
        let batch = self.commands.try_update_untracked(CommandQueue::take).unwrap_or_default();
        for command in batch {
            self.command(command);
        }
    }

    fn command(&self, command: Command) {
        match command {
            Command::LoadMission(dir) => self.load_mission(dir),
            Command::SetEditMode(enabled) => self.run(|e| e.core.set_edit_mode(enabled)),
            Command::SaveEdits => self.try_run(|e| e.core.save_edits(false)),
            Command::DiscardEdits => self.run(|e| e.core.discard_edits(false)),
            Command::FitToView => self.run(|e| e.core.fit_to_view()),
            Command::ClearSelection => self.run(|e| e.core.clear_selection()),
            Command::CopySelectedSource => self.run(|e| e.core.copy_selected_source()),
            Command::SetLayers(layers) => {
                persistence::save_layers(&layers);
                self.viewer.update(|v| v.layers = layers);
                self.run(|e| e.core.set_layers(layers));
            }
            Command::AddFilter(spec) => self.try_run(|e| e.core.add_filter(spec)),
            Command::RemoveFilter { category, position } => self.try_run(|e| e.core.remove_filter(category, position)),
            Command::ToggleFilterInvert { category, position } => {
                self.try_run(|e| e.core.toggle_filter_invert(category, position));
            }
            Command::ClearFilters(category) => self.run(|e| e.core.clear_filters(category)),
            Command::ShowBackground(reference) => self.show_background(reference),
            Command::ResizeBackground { width_m, height_m } => self.resize_background(width_m, height_m),
            Command::RemoveBackground => self.remove_background(),
        }
    }

    fn load_mission(&self, dir: String) {
        if self.with_engine(|e| e.core.edit.is_save_pending()).unwrap_or(false) {
            self.report(&ViewerError::Validation("wait for the pending save before loading a mission".to_owned()));
            return;
        }
        let dir = dir.trim().to_owned();
        self.viewer.update(|v| {
            v.mission_dir.clone_from(&dir);
            v.load_status = LoadStatus::Loading;
            v.info("Loading markers...");
        });
        let host = self.clone();
        leptos::task::spawn_local(async move {
            match api::fetch_mission(&dir).await {
                Ok(data) => {
                    let markers = data.markers.len();
                    let viewer = host.viewer;
                    let loaded = host.with_engine(|e| {
                        let actions = e.core.load_mission(&dir, data)?;
                        viewer.update(|v| {
                            v.refresh_catalog(&e.core);
                            v.load_status = LoadStatus::Loaded;
                            v.info(format!("Loaded {markers} markers"));
                        });
                        Ok(actions)
                    });
                    match loaded {
                        Some(Ok(actions)) => {
                            persistence::save_mission_dir(&dir);
                            host.process(actions);
                        }
                        Some(Err(err)) => {
                            host.viewer.update(|v| v.load_status = LoadStatus::Failed);
                            host.report(&err);
                        }
                        None => {}
                    }
                }
                Err(err) => {
                    host.viewer.update(|v| v.load_status = LoadStatus::Failed);
                    host.report(&err);
                }
            }
        });
    }

    /// Decode the stored raster and hand it to the engine's background backend.
    fn show_background(&self, reference: BackgroundRef) {
        if reference.image_id.is_empty() {
            self.report(&ViewerError::Validation("no background image selected".to_owned()));
            return;
        }
        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                self.report(&ViewerError::from_js(&err));
                return;
            }
        };
        image.set_src(&api::background_image_url(&reference.image_id));
        let host = self.clone();
        leptos::task::spawn_local(async move {
            if let Err(err) = JsFuture::from(image.decode()).await {
                log::warn!("viewer: background {} failed to decode: {err:?}", reference.image_id);
                host.report(&ViewerError::Network("failed to load background image from server".to_owned()));
                return;
            }
            let reference = fill_size(reference, image.natural_width(), image.natural_height());
            persistence::save_background(Some(&reference));
            host.viewer.update(|v| v.background = Some(reference.clone()));
            host.try_run(|e| e.set_background_image(&image, reference));
        });
    }

    fn resize_background(&self, width_m: f64, height_m: f64) {
        let Some(current) = self.with_engine(|e| e.core.background.clone()).flatten() else {
            self.report(&ViewerError::Validation("no background image loaded".to_owned()));
            return;
        };
        let reference = BackgroundRef { width_m, height_m, ..current };
        if !reference.is_valid() {
            self.report(&ViewerError::Validation("background size must be positive".to_owned()));
            return;
        }
        persistence::save_background(Some(&reference));
        self.viewer.update(|v| v.background = Some(reference.clone()));
        self.run(|e| e.core.set_background(Some(reference)));
    }

    fn remove_background(&self) {
        let previous = self.with_engine(|e| e.core.background.clone()).flatten();
        persistence::save_background(None);
        self.viewer.update(|v| v.background = None);
        self.run(Engine::clear_background_image);
        let Some(previous) = previous else {
            return;
        };
        let host = self.clone();
        leptos::task::spawn_local(async move {
            // Local state is cleared either way; a server failure is only reported.
            match api::delete_background(&previous.image_id).await {
                Ok(()) => host.viewer.update(|v| {
                    v.info("Background image removed");
                }),
                Err(err) => {
                    log::warn!("viewer: could not delete background {}: {err}", previous.image_id);
                    host.report(&err);
                    alert(&failure_alert("Deleting the background image", &err));
                }
            }
        });
    }
}

/// Blocking browser alert for failed destructive actions.
#[cfg(feature = "hydrate")]
fn alert(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.alert_with_message(text) {
        log::warn!("viewer: alert unavailable: {err:?}");
    }
}

/// Write to the system clipboard. Permission failures are only logged.
#[cfg(feature = "hydrate")]
fn copy_to_clipboard(text: String) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(&text);
    leptos::task::spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log::debug!("viewer: clipboard write refused: {err:?}");
        }
    });
}

/// Canvas host component.
///
/// On hydration, this mounts the engine on two stacked canvases (raster
/// background underneath, entities on top), restores persisted settings and
/// reloads the last mission.
#[component]
pub fn CanvasHost() -> impl IntoView {
    let viewer = expect_context::<RwSignal<ViewerState>>();
    let commands = expect_context::<RwSignal<CommandQueue>>();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let background_ref = NodeRef::<leptos::html::Canvas>::new();

    #[cfg(not(feature = "hydrate"))]
    let _ = (viewer, commands);
    #[cfg(feature = "hydrate")]
    let host = Host { engine: Rc::new(RefCell::new(None)), viewer, commands, canvas_ref };

    #[cfg(feature = "hydrate")]
    {
        let host = host.clone();
        Effect::new(move || {
            let (Some(canvas), Some(background)) = (canvas_ref.get(), background_ref.get()) else {
                return;
            };
            if host.engine.borrow().is_some() {
                return;
            }
            let instance = match Engine::new(canvas, background) {
                Ok(instance) => instance,
                Err(err) => {
                    host.report(&err);
                    return;
                }
            };
            let backend = instance.backend_name();
            log::info!("viewer: engine mounted, background backend {backend}");
            *host.engine.borrow_mut() = Some(instance);

            let restored = viewer.get_untracked();
            viewer.update(|v| v.backend = Some(backend));
            host.sync_viewport();
            host.run(|e| e.core.set_layers(restored.layers));
            host.run(|e| e.core.restore_filters(restored.filters));
            if let Some(reference) = restored.background {
                host.command(Command::ShowBackground(reference));
            }
            if !restored.mission_dir.trim().is_empty() {
                host.command(Command::LoadMission(restored.mission_dir));
            }
            host.drain_commands();
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let host = host.clone();
        Effect::new(move || {
            commands.with(CommandQueue::seq);
            host.drain_commands();
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let host = host.clone();
        let handle = window_event_listener(leptos::ev::resize, move |_| host.sync_viewport());
        on_cleanup(move || handle.remove());
    }

    let on_pointer_down = {
        #[cfg(feature = "hydrate")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                ev.prevent_default();
                if let Some(canvas) = canvas_ref.get_untracked() {
                    if let Err(err) = canvas.focus() {
                        log::debug!("viewer: focus failed: {err:?}");
                    }
                    if let Err(err) = canvas.set_pointer_capture(ev.pointer_id()) {
                        log::debug!("viewer: pointer capture failed: {err:?}");
                    }
                }
                let Some(button) = Button::from_dom(ev.button()) else {
                    return;
                };
                let (point, modifiers) = (mouse_point(&ev), mouse_modifiers(&ev));
                host.run(|e| e.on_pointer_down(point, button, modifiers));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "hydrate")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                let (point, modifiers) = (mouse_point(&ev), mouse_modifiers(&ev));
                host.run(|e| e.on_pointer_move(point, modifiers));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "hydrate")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                let Some(button) = Button::from_dom(ev.button()) else {
                    return;
                };
                let (point, modifiers) = (mouse_point(&ev), mouse_modifiers(&ev));
                host.run(|e| e.on_pointer_up(point, button, modifiers));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_leave = {
        #[cfg(feature = "hydrate")]
        {
            let host = host.clone();
            move |_ev: leptos::ev::PointerEvent| host.run(Engine::on_pointer_leave)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_wheel = {
        #[cfg(feature = "hydrate")]
        {
            let host = host.clone();
            move |ev: leptos::ev::WheelEvent| {
                ev.prevent_default();
                let (point, delta) = wheel_input(&ev);
                let modifiers = mouse_modifiers(&ev);
                host.run(|e| e.on_wheel(point, delta, modifiers));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::WheelEvent| {}
        }
    };

    // Right-click copies a location; the browser menu would cover it.
    let on_context_menu = move |ev: leptos::ev::MouseEvent| ev.prevent_default();

    view! {
        <div class="map-stage">
            <canvas class="map-stage__background" node_ref=background_ref></canvas>
            <canvas
                class="map-stage__canvas"
                node_ref=canvas_ref
                tabindex="0"
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
                on:wheel=on_wheel
                on:contextmenu=on_context_menu
            >
                "Your browser does not support canvas."
            </canvas>
        </div>
    }
}
