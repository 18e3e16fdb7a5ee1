use log::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::background::{self, BackgroundRenderer};
use crate::camera::{Camera, Point, Size, WorldRect};
use crate::doc::{Category, EntityRef, EntityStore, MissionData};
use crate::edit::{DisableOutcome, EditSession, SaveRequest};
use crate::error::ViewerError;
use crate::filter::{self, FilterCategory, FilterDimension, FilterEngine, FilterSpec};
use crate::hit::{self, HitContext};
use crate::input::{Button, InputState, Marquee, Modifiers, WheelDelta};
use crate::render::{self, Scene};
use crate::selection::SelectionSets;
use crate::settings::{BackgroundRef, Layers};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_POINTER: &str = "pointer";
const CURSOR_GRABBING: &str = "grabbing";
const CURSOR_MOVE: &str = "move";

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Schedule one redraw. Emitted at most once per rendered frame.
    RenderNeeded,
    SetCursor(&'static str),
    /// Write text to the system clipboard. Failures are ignored by the host.
    CopyToClipboard(String),
    /// Send this batch to the position-save endpoint, then report back via
    /// [`EngineCore::save_finished`].
    SaveRequested(SaveRequest),
    /// Unsaved moves block leaving edit mode: ask the user to save or discard.
    DecisionRequired { dirty: usize },
    EditModeChanged(bool),
    /// Layer toggles changed inside the engine and should be persisted.
    LayersChanged(Layers),
    /// The filter list changed and should be persisted.
    FiltersChanged(Vec<FilterSpec>),
    SelectionChanged { total: usize },
    /// Short human-readable message for the status bar.
    Status(String),
    /// A destructive action failed and the user must be alerted.
    Alert(String),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: EntityStore,
    pub camera: Camera,
    pub filters: FilterEngine,
    pub selection: SelectionSets,
    pub edit: EditSession,
    pub layers: Layers,
    pub input: InputState,
    /// Hovered entity and the cursor it was found under; only tracked while idle.
    pub hover: Option<(EntityRef, Point)>,
    pub viewport: Size,
    pub dpr: f64,
    pub mission_dir: String,
    pub background: Option<BackgroundRef>,
    redraw_pending: bool,
    leave_after_save: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: EntityStore::new(),
            camera: Camera::default(),
            filters: FilterEngine::new(),
            selection: SelectionSets::new(),
            edit: EditSession::new(),
            layers: Layers::default(),
            input: InputState::default(),
            hover: None,
            viewport: Size::new(0.0, 0.0),
            dpr: 1.0,
            mission_dir: String::new(),
            background: None,
            redraw_pending: false,
            leave_after_save: false,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Frame scheduling ---

    fn request_redraw(&mut self, actions: &mut Vec<Action>) {
        if !self.redraw_pending {
            self.redraw_pending = true;
            actions.push(Action::RenderNeeded);
        }
    }

    fn redraw(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.request_redraw(&mut actions);
        actions
    }

    /// Whether a frame has been requested and not yet drawn.
    #[must_use]
    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// The host drew a frame; the next mutation schedules a new one.
    pub fn frame_rendered(&mut self) {
        self.redraw_pending = false;
    }

    // --- Data inputs ---

    /// Replace every entity collection with a freshly loaded mission.
    ///
    /// Selections, unsaved moves and visibility tied to the old indices are
    /// dropped, then the view is fitted to the new markers.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] while a save is in flight: its response
    /// would otherwise settle the dirty state of the new mission.
    pub fn load_mission(&mut self, mission_dir: &str, data: MissionData) -> Result<Vec<Action>, ViewerError> {
        if self.edit.is_save_pending() {
            return Err(ViewerError::Validation("wait for the pending save before loading a mission".to_owned()));
        }
        self.mission_dir = mission_dir.to_owned();
        self.store.load(data);
        self.selection.clear();
        self.edit.reset();
        self.leave_after_save = false;
        self.filters.recompute(&self.store);
        self.hover = None;
        self.input = InputState::Idle;
        info!(
            "engine: loaded {mission_dir}: markers={} event_spawns={} zones={} spawn_points={} effect_areas={}",
            self.store.markers.len(),
            self.store.event_spawns.len(),
            self.store.len(Category::Zone),
            self.store.spawn_points.len(),
            self.store.effect_areas.len()
        );
        let mut actions = self.fit_to_view();
        actions.push(Action::SelectionChanged { total: 0 });
        Ok(actions)
    }

    /// Frame the markers (or everything, when there are none).
    pub fn fit_to_view(&mut self) -> Vec<Action> {
        let extent = self.store.marker_extent().or_else(|| self.store.full_extent());
        self.camera.fit_to_view(extent, self.viewport);
        debug!("engine: fit to view scale={:.3}", self.camera.scale);
        self.redraw()
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport = Size::new(width_css.max(0.0), height_css.max(0.0));
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.redraw()
    }

    pub fn set_layers(&mut self, layers: Layers) -> Vec<Action> {
        self.layers = layers;
        self.refresh_hover();
        self.redraw()
    }

    /// Record the configured background raster, or clear it.
    pub fn set_background(&mut self, reference: Option<BackgroundRef>) -> Vec<Action> {
        self.background = reference.filter(BackgroundRef::is_valid);
        self.redraw()
    }

    // --- Filters ---

    /// Add a filter and recompute visibility.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] for an invalid, empty or duplicate filter.
    pub fn add_filter(&mut self, spec: FilterSpec) -> Result<Vec<Action>, ViewerError> {
        self.filters.add(spec, &self.store)?;
        Ok(self.filters_changed())
    }

    /// Remove the `position`-th filter of `category`.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] when there is no such filter.
    pub fn remove_filter(&mut self, category: FilterCategory, position: usize) -> Result<Vec<Action>, ViewerError> {
        self.filters.remove(category, position, &self.store)?;
        Ok(self.filters_changed())
    }

    /// Flip display/hide on the `position`-th filter of `category`.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] when there is no such filter.
    pub fn toggle_filter_invert(&mut self, category: FilterCategory, position: usize) -> Result<Vec<Action>, ViewerError> {
        self.filters.toggle_invert(category, position, &self.store)?;
        Ok(self.filters_changed())
    }

    /// Drop the filters of one category, or all of them.
    pub fn clear_filters(&mut self, category: Option<FilterCategory>) -> Vec<Action> {
        self.filters.clear(category, &self.store);
        self.filters_changed()
    }

    /// Replace the filter list with a persisted one; invalid entries are dropped.
    pub fn restore_filters(&mut self, specs: Vec<FilterSpec>) -> Vec<Action> {
        self.filters.restore(specs, &self.store);
        self.filters_changed()
    }

    /// Sorted distinct values of `dimension` for populating a picker.
    #[must_use]
    pub fn value_catalog(&self, category: FilterCategory, dimension: FilterDimension) -> Vec<String> {
        filter::value_catalog(&self.store, category, dimension)
    }

    fn filters_changed(&mut self) -> Vec<Action> {
        let visibility = self.filters.visibility();
        let store = &self.store;
        let pruned = self.selection.retain(|e| visibility.is_visible(store, e));
        if pruned > 0 {
            debug!("engine: dropped {pruned} hidden entities from the selection");
        }
        self.refresh_hover();
        let mut actions = vec![
            Action::FiltersChanged(self.filters.specs().to_vec()),
            Action::SelectionChanged { total: self.selection.total() },
        ];
        self.request_redraw(&mut actions);
        actions
    }

    // --- Selection ---

    pub fn clear_selection(&mut self) -> Vec<Action> {
        self.selection.clear();
        let mut actions = vec![Action::SelectionChanged { total: 0 }];
        self.request_redraw(&mut actions);
        actions
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.total()
    }

    /// Copy the raw source text of selected markers and spawn points.
    pub fn copy_selected_source(&self) -> Vec<Action> {
        let texts: Vec<String> = self.selection.iter().filter_map(|e| self.store.source_text(e)).collect();
        if texts.is_empty() {
            return vec![Action::Status("No source text in the selection".to_owned())];
        }
        let count = texts.len();
        vec![Action::CopyToClipboard(texts.join("\n")), Action::Status(format!("Copied {count} item(s)"))]
    }

    // --- Edit mode ---

    /// Turn spawn-point editing on or off. Turning it off with unsaved moves
    /// asks the host for a decision instead.
    pub fn set_edit_mode(&mut self, enabled: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        if enabled {
            self.edit.enable();
            if !self.layers.show_spawn_points {
                self.layers.show_spawn_points = true;
                actions.push(Action::LayersChanged(self.layers));
            }
            actions.push(Action::EditModeChanged(true));
        } else {
            match self.edit.request_disable() {
                DisableOutcome::Disabled => self.leave_edit_mode(&mut actions),
                DisableOutcome::DecisionRequired => {
                    actions.push(Action::DecisionRequired { dirty: self.edit.dirty_count() });
                    actions.push(Action::EditModeChanged(true));
                }
            }
        }
        self.refresh_hover();
        self.request_redraw(&mut actions);
        actions
    }

    fn leave_edit_mode(&mut self, actions: &mut Vec<Action>) {
        self.selection.clear_category(Category::SpawnPoint);
        if matches!(self.input, InputState::Dragging { .. }) {
            self.input = InputState::Idle;
        }
        actions.push(Action::EditModeChanged(false));
        actions.push(Action::SelectionChanged { total: self.selection.total() });
    }

    /// Start saving every modified spawn point in one batch.
    ///
    /// With `leave_edit_mode` the session also ends once the save succeeds.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] when no mission directory is loaded.
    pub fn save_edits(&mut self, leave_edit_mode: bool) -> Result<Vec<Action>, ViewerError> {
        if self.mission_dir.trim().is_empty() {
            return Err(ViewerError::Validation("mission directory is empty".to_owned()));
        }
        let mut actions = Vec::new();
        match self.edit.begin_save(&self.mission_dir, &self.store.spawn_points) {
            Some(request) => {
                let count = request.spawn_points.len();
                self.leave_after_save = leave_edit_mode;
                actions.push(Action::SaveRequested(request));
                actions.push(Action::Status(format!("Saving {count} spawn point(s)...")));
            }
            None if self.edit.is_save_pending() => {
                actions.push(Action::Status("A save is already in progress".to_owned()));
            }
            None => {
                if leave_edit_mode {
                    actions.extend(self.set_edit_mode(false));
                } else {
                    actions.push(Action::Status("No unsaved changes".to_owned()));
                }
            }
        }
        Ok(actions)
    }

    /// Report the outcome of a [`Action::SaveRequested`] batch.
    pub fn save_finished(&mut self, result: Result<(), ViewerError>) -> Vec<Action> {
        let leave = std::mem::take(&mut self.leave_after_save);
        let mut actions = Vec::new();
        match result {
            Ok(()) => {
                let count = self.edit.dirty_count();
                self.edit.save_succeeded(leave);
                if leave {
                    self.leave_edit_mode(&mut actions);
                }
                actions.push(Action::Status(format!("Saved {count} spawn point(s)")));
            }
            Err(err) => {
                warn!("engine: save failed ({}): {err}", err.error_code());
                self.edit.save_failed();
                actions.push(Action::EditModeChanged(true));
                actions.push(Action::Alert(format!("Saving spawn points failed: {err}")));
                if leave {
                    actions.push(Action::DecisionRequired { dirty: self.edit.dirty_count() });
                }
            }
        }
        self.request_redraw(&mut actions);
        actions
    }

    /// Restore every modified spawn point. With `leave_edit_mode` the session
    /// ends as well.
    pub fn discard_edits(&mut self, leave_edit_mode: bool) -> Vec<Action> {
        if self.edit.is_save_pending() {
            return vec![Action::Status("Cannot discard while a save is in progress".to_owned())];
        }
        if matches!(self.input, InputState::Dragging { .. }) {
            self.input = InputState::Idle;
        }
        let restored = self.edit.discard(&mut self.store.spawn_points);
        let mut actions = vec![Action::Status(format!("Discarded {restored} change(s)"))];
        if leave_edit_mode {
            if self.edit.request_disable() == DisableOutcome::Disabled {
                self.leave_edit_mode(&mut actions);
            }
        } else {
            self.selection.clear_category(Category::SpawnPoint);
            actions.push(Action::SelectionChanged { total: self.selection.total() });
        }
        self.request_redraw(&mut actions);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Secondary => self.copy_location(screen_pt),
            Button::Middle => self.begin_pan(screen_pt),
            Button::Primary if modifiers.shift => self.begin_pan(screen_pt),
            Button::Primary => self.primary_down(screen_pt, modifiers),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return self.update_hover(screen_pt);
        }
        let mut actions = Vec::new();
        match &mut self.input {
            InputState::Idle => {}
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                self.camera.pan(dx, dy);
            }
            InputState::Marqueeing(m) => m.current = screen_pt,
            InputState::Dragging { .. } => {
                let world = self.camera.screen_to_world(screen_pt);
                self.edit.drag_to(&mut self.store.spawn_points, world);
            }
        }
        self.request_redraw(&mut actions);
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Secondary {
            return Vec::new();
        }
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Panning { .. } => actions.push(Action::SetCursor(CURSOR_DEFAULT)),
            InputState::Marqueeing(mut m) => {
                m.current = screen_pt;
                self.commit_marquee(m, modifiers, &mut actions);
            }
            InputState::Dragging { index } => self.commit_drag(index, modifiers, &mut actions),
        }
        self.update_hover_into(screen_pt, &mut actions);
        self.request_redraw(&mut actions);
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        self.camera.zoom_at(screen_pt, delta.zoom_factor());
        if matches!(self.input, InputState::Dragging { .. }) {
            let world = self.camera.screen_to_world(screen_pt);
            self.edit.drag_to(&mut self.store.spawn_points, world);
        }
        if let Some((entity, _)) = self.hover {
            self.hover = Some((entity, screen_pt));
        }
        self.redraw()
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if !self.input.is_idle() || self.hover.is_none() {
            return Vec::new();
        }
        self.hover = None;
        let mut actions = vec![Action::SetCursor(CURSOR_DEFAULT)];
        self.request_redraw(&mut actions);
        actions
    }

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        self.hover = None;
        let mut actions = vec![Action::SetCursor(CURSOR_GRABBING)];
        self.request_redraw(&mut actions);
        actions
    }

    fn primary_down(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let hit = hit::hit_test(&self.hit_context(), screen_pt);
        match hit {
            Some(entity) if entity.category == Category::SpawnPoint && self.try_begin_drag(entity.index, screen_pt) => {
                self.input = InputState::Dragging { index: entity.index };
                self.hover = None;
                actions.push(Action::SetCursor(CURSOR_MOVE));
            }
            Some(entity) => {
                self.selection.apply(entity, modifiers.deselect());
                actions.push(Action::SelectionChanged { total: self.selection.total() });
            }
            None => {
                self.input = InputState::Marqueeing(Marquee { start: screen_pt, current: screen_pt });
                self.hover = None;
            }
        }
        self.request_redraw(&mut actions);
        actions
    }

    fn try_begin_drag(&mut self, index: usize, screen_pt: Point) -> bool {
        let anchor = self.camera.screen_to_world(screen_pt);
        let selected = self.selection.get(Category::SpawnPoint);
        self.edit.begin_drag(&self.store.spawn_points, index, selected, anchor)
    }

    fn commit_marquee(&mut self, marquee: Marquee, modifiers: Modifiers, actions: &mut Vec<Action>) {
        if !marquee.is_significant() {
            return;
        }
        let rect = WorldRect::from_corners(
            self.camera.screen_to_world(marquee.start),
            self.camera.screen_to_world(marquee.current),
        );
        let hits = hit::entities_in_world_rect(&self.hit_context(), &rect);
        let changed = self.selection.apply_many(hits, modifiers.deselect());
        debug!("engine: marquee changed {changed} selection entries");
        actions.push(Action::SelectionChanged { total: self.selection.total() });
    }

    fn commit_drag(&mut self, index: usize, modifiers: Modifiers, actions: &mut Vec<Action>) {
        let moved = self.edit.drag().is_some_and(|d| d.moved);
        let dragged = self.edit.end_drag(&mut self.store.spawn_points);
        if moved {
            actions.push(Action::Status(format!(
                "Moved {} spawn point(s), {} unsaved",
                dragged.len(),
                self.edit.dirty_count()
            )));
        } else {
            self.selection.apply(EntityRef::new(Category::SpawnPoint, index), modifiers.deselect());
            actions.push(Action::SelectionChanged { total: self.selection.total() });
        }
        actions.push(Action::SetCursor(CURSOR_DEFAULT));
    }

    /// Right-click: copy `x,y,z` of the entity under the cursor, or of the
    /// ground point under it.
    fn copy_location(&mut self, screen_pt: Point) -> Vec<Action> {
        let text = match hit::hit_test(&self.hit_context(), screen_pt).and_then(|e| self.store.position(e)) {
            Some(p) => format_location(p.x, if p.y.is_finite() { p.y } else { 0.0 }, p.z),
            None => {
                let w = self.camera.screen_to_world(screen_pt);
                format_location(w.x, 0.0, w.z)
            }
        };
        vec![Action::Status(format!("Copied location {text}")), Action::CopyToClipboard(text)]
    }

    fn update_hover(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        self.update_hover_into(screen_pt, &mut actions);
        actions
    }

    fn update_hover_into(&mut self, screen_pt: Point, actions: &mut Vec<Action>) {
        let before = self.hover.map(|(e, _)| e);
        let found = hit::hit_test(&self.hit_context(), screen_pt);
        self.hover = found.map(|e| (e, screen_pt));
        if found != before {
            actions.push(Action::SetCursor(if found.is_some() { CURSOR_POINTER } else { CURSOR_DEFAULT }));
        }
        if found.is_some() || before.is_some() {
            self.request_redraw(actions);
        }
    }

    /// Drop the hover when its entity is no longer interactive.
    fn refresh_hover(&mut self) {
        let Some((entity, _)) = self.hover else {
            return;
        };
        let ctx = self.hit_context();
        if !ctx.category_shown(entity.category) || !ctx.visibility.is_visible(ctx.store, entity) {
            self.hover = None;
        }
    }

    // --- Queries ---

    /// Everything that decides what is interactive right now.
    #[must_use]
    pub fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            store: &self.store,
            camera: &self.camera,
            visibility: self.filters.visibility(),
            layers: &self.layers,
            spawn_edit_enabled: self.edit.is_enabled(),
        }
    }

    /// Read-only view for one frame.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            store: &self.store,
            camera: &self.camera,
            visibility: self.filters.visibility(),
            selection: &self.selection,
            edit: &self.edit,
            layers: &self.layers,
            hover: if self.input.is_idle() { self.hover } else { None },
            marquee: self.input.marquee(),
            viewport: self.viewport,
            background_world: self.background.as_ref().map(|b| Size::new(b.width_m, b.height_m)),
        }
    }
}

fn format_location(x: f64, y: f64, z: f64) -> String {
    format!("{x:.2},{y:.2},{z:.2}")
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvases.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background_canvas: HtmlCanvasElement,
    background: Box<dyn BackgroundRenderer>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine drawing entities on `canvas` and the raster layer on
    /// `background_canvas` (stacked underneath).
    ///
    /// # Errors
    ///
    /// [`ViewerError::Render`] if the 2D context is unavailable.
    pub fn new(canvas: HtmlCanvasElement, background_canvas: HtmlCanvasElement) -> Result<Self, ViewerError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ViewerError::from_js(&e))?
            .ok_or_else(|| ViewerError::Render("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| ViewerError::from_js(&e))?;
        let background = background::select_backend(&background_canvas, &ctx).map_err(|e| ViewerError::from_js(&e))?;
        Ok(Self { canvas, ctx, background_canvas, background, core: EngineCore::new() })
    }

    /// Name of the background backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.background.name()
    }

    // --- Viewport ---

    /// Resize both canvases' backing stores and update the viewport.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        let w = (self.core.viewport.width * self.core.dpr).round().max(0.0) as u32;
        let h = (self.core.viewport.height * self.core.dpr).round().max(0.0) as u32;
        for canvas in [&self.canvas, &self.background_canvas] {
            canvas.set_width(w);
            canvas.set_height(h);
        }
        self.background.resize(w, h);
        actions
    }

    // --- Background image ---

    /// Use a decoded image as the background raster.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] for an unusable reference,
    /// [`ViewerError::Render`] if the upload fails.
    pub fn set_background_image(&mut self, image: &HtmlImageElement, reference: BackgroundRef) -> Result<Vec<Action>, ViewerError> {
        if !reference.is_valid() {
            return Err(ViewerError::Validation("background size must be positive".to_owned()));
        }
        self.background.set_image(image).map_err(|e| ViewerError::from_js(&e))?;
        info!("engine: background {} loaded on {}", reference.image_id, self.background.name());
        Ok(self.core.set_background(Some(reference)))
    }

    pub fn clear_background_image(&mut self) -> Vec<Action> {
        self.background.clear_image();
        self.core.set_background(None)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    // --- Render ---

    /// Draw the current state. Failures are logged and returned, never panicked on.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Render`] if a browser drawing call fails.
    pub fn render(&mut self) -> Result<(), ViewerError> {
        self.core.frame_rendered();
        render::draw(&self.ctx, self.background.as_ref(), &self.core.scene(), self.core.dpr).map_err(|e: JsValue| {
            let err = ViewerError::from_js(&e);
            warn!("engine: {err}");
            err
        })
    }
}
