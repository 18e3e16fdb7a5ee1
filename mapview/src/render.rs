//! Rendering: draws one frame of the map to a 2D context.
//!
//! This module and the background backends are the only places that touch
//! the canvas. Passes receive read-only views of engine state through
//! [`Scene`] and never mutate it.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::background::{self, BackgroundRenderer};
use crate::camera::{Camera, Point, Size, WorldPoint};
use crate::consts::{TOOLTIP_FONT_PX, TOOLTIP_PADDING_PX};
use crate::doc::{Category, EntityRef, EntityStore};
use crate::edit::EditSession;
use crate::filter::Visibility;
use crate::grid;
use crate::input::Marquee;
use crate::selection::SelectionSets;
use crate::settings::Layers;
use crate::style::{self, AreaStyle, EntityState, Style};
use crate::tooltip;

const MARQUEE_STROKE: &str = "#0066ff";
const MARQUEE_FILL: &str = "rgba(0, 102, 255, 0.1)";
const MARQUEE_DASH_PX: f64 = 5.0;

const TOOLTIP_FILL: &str = "rgba(0, 0, 0, 0.85)";
const TOOLTIP_TEXT: &str = "#ffffff";

/// Circles smaller than this many screen pixels are not drawn at all.
const MIN_CIRCLE_PX: f64 = 1.0;

/// Read-only view of everything one frame needs.
pub struct Scene<'a> {
    pub store: &'a EntityStore,
    pub camera: &'a Camera,
    pub visibility: &'a Visibility,
    pub selection: &'a SelectionSets,
    pub edit: &'a EditSession,
    pub layers: &'a Layers,
    /// Hovered entity and the cursor position, only while idle.
    pub hover: Option<(EntityRef, Point)>,
    pub marquee: Option<Marquee>,
    pub viewport: Size,
    /// World size covered by the background image, when one is configured.
    pub background_world: Option<Size>,
}

impl Scene<'_> {
    /// Style-relevant state of one entity this frame.
    #[must_use]
    pub fn entity_state(&self, entity: EntityRef) -> EntityState {
        let spawn = entity.category == Category::SpawnPoint;
        EntityState {
            selected: self.selection.contains(entity),
            hovered: self.hover.is_some_and(|(h, _)| h == entity),
            dragging: spawn && self.edit.is_dragging_index(entity.index),
            dirty: spawn && self.edit.is_index_dirty(entity.index),
            editing: spawn && self.edit.is_enabled(),
        }
    }

    /// Screen position of an entity, `None` when it cannot be placed.
    #[must_use]
    pub fn screen_point(&self, entity: EntityRef) -> Option<Point> {
        let world = self.store.world_point(entity)?;
        let screen = self.camera.world_to_screen(world);
        screen.is_finite().then_some(screen)
    }

    fn visible(&self, category: Category) -> impl Iterator<Item = EntityRef> + '_ {
        (0..self.store.len(category))
            .map(move |i| EntityRef::new(category, i))
            .filter(|e| self.visibility.is_visible(self.store, *e))
    }
}

/// Screen radius for a world radius, `None` when too small or unusable.
#[must_use]
pub fn circle_px(radius_m: f64, scale: f64) -> Option<f64> {
    let r = radius_m * scale;
    (r.is_finite() && r >= MIN_CIRCLE_PX).then_some(r)
}

/// Draw the full frame in fixed pass order.
///
/// `dpr` is the device pixel ratio; everything below works in CSS pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` or background call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    background: &dyn BackgroundRenderer,
    scene: &Scene<'_>,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.viewport.width, scene.viewport.height);

    draw_background(background, scene)?;
    if scene.layers.show_grid {
        draw_grid(ctx, scene);
    }
    if scene.layers.show_markers {
        draw_dots(ctx, scene, Category::Marker)?;
    }
    if scene.layers.show_event_spawns {
        draw_dots(ctx, scene, Category::EventSpawn)?;
    }
    if scene.layers.show_territories {
        draw_zones(ctx, scene)?;
    }
    if scene.layers.show_spawn_points {
        draw_spawn_points(ctx, scene)?;
    }
    if scene.layers.show_effect_areas {
        draw_effect_areas(ctx, scene)?;
    }
    if let Some(m) = scene.marquee {
        draw_marquee(ctx, m)?;
    }
    if let Some((entity, cursor)) = scene.hover {
        draw_tooltip(ctx, scene, entity, cursor)?;
    }
    Ok(())
}

// =============================================================
// Passes
// =============================================================

fn draw_background(background: &dyn BackgroundRenderer, scene: &Scene<'_>) -> Result<(), JsValue> {
    let placement = match (scene.layers.show_background, scene.background_world, background.image_size()) {
        (true, Some(world), Some(px)) => background::placement(scene.camera, scene.viewport, px, world),
        _ => None,
    };
    background.draw(scene.viewport, placement.as_ref(), scene.layers.background_opacity)
}

fn draw_grid(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) {
    ctx.save();
    ctx.set_line_width(1.0);
    for line in grid::grid_lines(scene.camera, scene.viewport) {
        ctx.set_stroke_style_str(line.stroke());
        ctx.begin_path();
        ctx.move_to(line.from.x, line.from.y);
        ctx.line_to(line.to.x, line.to.y);
        ctx.stroke();
    }
    ctx.restore();
}

fn draw_dots(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>, category: Category) -> Result<(), JsValue> {
    for entity in scene.visible(category) {
        let Some(at) = scene.screen_point(entity) else {
            continue;
        };
        draw_dot(ctx, at, &style::dot_style(category, scene.entity_state(entity), None))?;
    }
    Ok(())
}

fn draw_zones(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    for entity in scene.visible(Category::Zone) {
        let Some((territory, zone)) = scene.store.zone(entity.index) else {
            continue;
        };
        let Some(at) = scene.screen_point(entity) else {
            continue;
        };
        let state = scene.entity_state(entity);
        let tint = territory.color.as_deref();
        if let Some(radius_m) = zone.radius {
            let Some(radius) = circle_px(radius_m, scene.camera.scale) else {
                continue;
            };
            draw_area_circle(ctx, at, radius, &style::zone_area_style(state, tint, scene.camera.scale))?;
        }
        draw_dot(ctx, at, &style::dot_style(Category::Zone, state, tint))?;
    }
    Ok(())
}

fn draw_spawn_points(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    for entity in scene.visible(Category::SpawnPoint) {
        let Some(point) = scene.store.spawn_points.get(entity.index) else {
            continue;
        };
        let Some(at) = scene.screen_point(entity) else {
            continue;
        };
        let state = scene.entity_state(entity);
        let w = point.width * scene.camera.scale;
        let h = point.height * scene.camera.scale;
        if w.is_finite() && h.is_finite() {
            let area = style::spawn_rect_style(state);
            ctx.save();
            ctx.set_global_alpha(area.alpha);
            ctx.set_fill_style_str(&area.fill);
            ctx.set_stroke_style_str(&area.stroke);
            ctx.set_line_width(area.line_width);
            ctx.fill_rect(at.x - w / 2.0, at.y - h / 2.0, w, h);
            ctx.stroke_rect(at.x - w / 2.0, at.y - h / 2.0, w, h);
            ctx.restore();
        }
        draw_dot(ctx, at, &style::dot_style(Category::SpawnPoint, state, None))?;
    }
    Ok(())
}

fn draw_effect_areas(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    let area = style::effect_area_style(scene.camera.scale);
    let center = Style { fill: area.fill.clone(), stroke: area.stroke.clone(), line_width: area.line_width, radius: 4.0 };
    for effect in &scene.store.effect_areas {
        let at = scene.camera.world_to_screen(WorldPoint::new(effect.x, effect.z));
        if !at.is_finite() {
            continue;
        }
        let Some(radius) = circle_px(effect.radius, scene.camera.scale) else {
            continue;
        };
        draw_area_circle(ctx, at, radius, &area)?;
        draw_dot(ctx, at, &center)?;
    }
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Marquee) -> Result<(), JsValue> {
    let (x, y, w, h) = marquee.rect();
    ctx.save();
    ctx.set_stroke_style_str(MARQUEE_STROKE);
    ctx.set_line_width(2.0);
    let dash = js_sys::Array::new();
    dash.push(&MARQUEE_DASH_PX.into());
    dash.push(&MARQUEE_DASH_PX.into());
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(x, y, w, h);
    ctx.set_fill_style_str(MARQUEE_FILL);
    ctx.fill_rect(x, y, w, h);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>, entity: EntityRef, cursor: Point) -> Result<(), JsValue> {
    let lines = tooltip::tooltip_lines(scene.store, entity);
    if lines.is_empty() {
        return Ok(());
    }
    ctx.save();
    ctx.set_font(&format!("{TOOLTIP_FONT_PX}px Arial"));
    let mut widest: f64 = 0.0;
    for line in &lines {
        widest = widest.max(ctx.measure_text(line)?.width());
    }
    let b = tooltip::layout(cursor, widest, lines.len(), scene.viewport);

    ctx.set_fill_style_str(TOOLTIP_FILL);
    ctx.fill_rect(b.x, b.y, b.width, b.height);
    ctx.set_stroke_style_str(TOOLTIP_TEXT);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(b.x, b.y, b.width, b.height);

    ctx.set_fill_style_str(TOOLTIP_TEXT);
    for (i, line) in lines.iter().enumerate() {
        ctx.fill_text(line, b.x + TOOLTIP_PADDING_PX, b.baseline(i))?;
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Primitives
// =============================================================

fn draw_dot(ctx: &CanvasRenderingContext2d, at: Point, s: &Style) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(&s.fill);
    ctx.set_stroke_style_str(&s.stroke);
    ctx.set_line_width(s.line_width);
    ctx.begin_path();
    ctx.arc(at.x, at.y, s.radius, 0.0, TAU)?;
    ctx.fill();
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_area_circle(ctx: &CanvasRenderingContext2d, at: Point, radius: f64, s: &AreaStyle) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(s.alpha);
    ctx.set_fill_style_str(&s.fill);
    ctx.set_stroke_style_str(&s.stroke);
    ctx.set_line_width(s.line_width);
    ctx.begin_path();
    ctx.arc(at.x, at.y, radius, 0.0, TAU)?;
    ctx.fill();
    ctx.stroke();
    ctx.restore();
    Ok(())
}
