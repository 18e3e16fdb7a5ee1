//! Entity model: the positioned collections shown on the map and the store
//! that owns them.
//!
//! Entities arrive as JSON from the mission endpoints. Optional or malformed
//! fields fall back to defaults rather than failing the load; entities with a
//! missing coordinate deserialize to `NaN` and are skipped by rendering and
//! hit-testing. Marker usage and container lists are kept as raw JSON and read
//! through [`NameList`], since the backend emits them as arrays of strings,
//! arrays of `{name}` objects, a single object, or a bare string.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::camera::{WorldPoint, WorldRect};

fn nan() -> f64 {
    f64::NAN
}

fn default_rect_side() -> f64 {
    100.0
}

/// A spawn-group marker from the mission's group definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerGroup {
    #[serde(default = "nan")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "nan")]
    pub z: f64,
    #[serde(default)]
    pub name: String,
    /// Usage entries in any of the accepted shapes.
    #[serde(default)]
    pub usage: serde_json::Value,
    /// Nested prototype attributes; may carry `usage`, `container` and `containers`.
    #[serde(default)]
    pub proto_children: serde_json::Value,
    #[serde(default)]
    pub container: serde_json::Value,
    /// Raw source text for clipboard export. Never parsed.
    #[serde(default)]
    pub xml: Option<String>,
}

impl MarkerGroup {
    /// Usage names from the direct and nested attributes, in order, without duplicates.
    #[must_use]
    pub fn usage_names(&self) -> Vec<String> {
        let mut names = NameList::new(&self.usage).trimmed();
        names.extend(NameList::new(self.proto_children.get("usage").unwrap_or(&serde_json::Value::Null)).trimmed());
        dedup_in_order(names)
    }

    /// Container names from `proto_children.container`, `proto_children.containers`
    /// and `container`, without duplicates.
    #[must_use]
    pub fn container_names(&self) -> Vec<String> {
        let null = serde_json::Value::Null;
        let mut names = NameList::new(self.proto_children.get("container").unwrap_or(&null)).raw();
        if let Some(list) = self.proto_children.get("containers").filter(|v| v.is_array()) {
            names.extend(NameList::new(list).raw());
        }
        names.extend(NameList::new(&self.container).raw());
        dedup_in_order(names)
    }
}

/// Typed access to a loosely shaped list of names in a JSON value.
pub struct NameList<'a> {
    value: &'a serde_json::Value,
}

impl<'a> NameList<'a> {
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Names with surrounding whitespace trimmed; blank strings are dropped.
    /// `{name}` objects are taken verbatim.
    #[must_use]
    pub fn trimmed(&self) -> Vec<String> {
        self.collect(true)
    }

    /// Names as given; only empty strings are dropped.
    #[must_use]
    pub fn raw(&self) -> Vec<String> {
        self.collect(false)
    }

    fn collect(&self, trim: bool) -> Vec<String> {
        let mut out = Vec::new();
        match self.value {
            serde_json::Value::Array(items) => {
                for item in items {
                    push_name(item, trim, &mut out);
                }
            }
            other => push_name(other, trim, &mut out),
        }
        out
    }
}

fn push_name(value: &serde_json::Value, trim: bool, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => {
            let s = if trim { s.trim() } else { s.as_str() };
            if !s.is_empty() {
                out.push(s.to_owned());
            }
        }
        serde_json::Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(serde_json::Value::as_str) {
                let name = if trim { name.trim() } else { name };
                if !name.is_empty() {
                    out.push(name.to_owned());
                }
            }
        }
        _ => {}
    }
}

fn dedup_in_order(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// A dynamic event spawn position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSpawn {
    #[serde(default = "nan")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "nan")]
    pub z: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One positioned point inside a territory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default = "nan")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "nan")]
    pub z: f64,
    #[serde(default)]
    pub radius: Option<f64>,
}

/// A named territory made of zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub territory_type: String,
    /// `#rrggbb` tint for the territory's zones.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub center_x: Option<f64>,
    #[serde(default)]
    pub center_z: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// A player spawn point: a rectangle centered on its position. The only
/// editable category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpawnPoint {
    #[serde(default = "nan")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "nan")]
    pub z: f64,
    #[serde(default = "default_rect_side")]
    pub width: f64,
    #[serde(default = "default_rect_side")]
    pub height: f64,
    #[serde(default)]
    pub xml: Option<String>,
}

impl PlayerSpawnPoint {
    #[must_use]
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y, z: self.z }
    }

    pub fn set_position(&mut self, pos: Position) {
        self.x = pos.x;
        self.y = pos.y;
        self.z = pos.z;
    }

    /// Source text for export; synthesized from the position when absent.
    #[must_use]
    pub fn source_text(&self) -> String {
        match &self.xml {
            Some(xml) if !xml.is_empty() => xml.clone(),
            _ => format!("<pos x=\"{}\" z=\"{}\"/>", self.x, self.z),
        }
    }
}

/// A read-only effect circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectArea {
    #[serde(default = "nan")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "nan")]
    pub z: f64,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub name: String,
}

/// Full 3D position of an entity, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub fn ground(self) -> WorldPoint {
        WorldPoint::new(self.x, self.z)
    }
}

/// Every collection loaded for one mission directory.
#[derive(Debug, Clone, Default)]
pub struct MissionData {
    pub markers: Vec<MarkerGroup>,
    pub event_spawns: Vec<EventSpawn>,
    pub territories: Vec<Territory>,
    pub spawn_points: Vec<PlayerSpawnPoint>,
    pub effect_areas: Vec<EffectArea>,
}

/// Selectable, hit-testable entity categories in hit-test priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Marker,
    EventSpawn,
    Zone,
    SpawnPoint,
}

impl Category {
    /// Fixed order used for hit-testing and tie-breaking.
    pub const ORDER: [Category; 4] = [Self::Marker, Self::EventSpawn, Self::Zone, Self::SpawnPoint];
}

/// Handle to one entity. Zone indices are flat across all territories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef {
    pub category: Category,
    pub index: usize,
}

impl EntityRef {
    #[must_use]
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }
}

/// Location of a flattened zone inside the territory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSlot {
    pub territory: usize,
    pub zone: usize,
}

/// In-memory store of the loaded mission's entities.
#[derive(Debug, Default)]
pub struct EntityStore {
    pub markers: Vec<MarkerGroup>,
    pub event_spawns: Vec<EventSpawn>,
    pub territories: Vec<Territory>,
    pub spawn_points: Vec<PlayerSpawnPoint>,
    pub effect_areas: Vec<EffectArea>,
    zone_slots: Vec<ZoneSlot>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every collection. The flat zone table is rebuilt.
    pub fn load(&mut self, data: MissionData) {
        self.markers = data.markers;
        self.event_spawns = data.event_spawns;
        self.territories = data.territories;
        self.spawn_points = data.spawn_points;
        self.effect_areas = data.effect_areas;
        self.zone_slots = self
            .territories
            .iter()
            .enumerate()
            .flat_map(|(t, territory)| (0..territory.zones.len()).map(move |z| ZoneSlot { territory: t, zone: z }))
            .collect();
    }

    /// Number of entities in a category. Zones are counted across territories.
    #[must_use]
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Marker => self.markers.len(),
            Category::EventSpawn => self.event_spawns.len(),
            Category::Zone => self.zone_slots.len(),
            Category::SpawnPoint => self.spawn_points.len(),
        }
    }

    /// Returns `true` if nothing at all is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Category::ORDER.iter().all(|c| self.len(*c) == 0) && self.effect_areas.is_empty()
    }

    #[must_use]
    pub fn zone_slot(&self, flat: usize) -> Option<ZoneSlot> {
        self.zone_slots.get(flat).copied()
    }

    /// A flattened zone together with its owning territory.
    #[must_use]
    pub fn zone(&self, flat: usize) -> Option<(&Territory, &Zone)> {
        let slot = self.zone_slot(flat)?;
        let territory = self.territories.get(slot.territory)?;
        Some((territory, territory.zones.get(slot.zone)?))
    }

    /// Position of an entity, or `None` for an out-of-range handle.
    #[must_use]
    pub fn position(&self, entity: EntityRef) -> Option<Position> {
        let i = entity.index;
        match entity.category {
            Category::Marker => self.markers.get(i).map(|m| Position { x: m.x, y: m.y, z: m.z }),
            Category::EventSpawn => self.event_spawns.get(i).map(|e| Position { x: e.x, y: e.y, z: e.z }),
            Category::Zone => self.zone(i).map(|(_, z)| Position { x: z.x, y: z.y, z: z.z }),
            Category::SpawnPoint => self.spawn_points.get(i).map(PlayerSpawnPoint::position),
        }
    }

    /// Ground-plane position of an entity.
    #[must_use]
    pub fn world_point(&self, entity: EntityRef) -> Option<WorldPoint> {
        self.position(entity).map(Position::ground)
    }

    /// Raw source text for clipboard export. Only markers and spawn points carry one.
    #[must_use]
    pub fn source_text(&self, entity: EntityRef) -> Option<String> {
        match entity.category {
            Category::Marker => self.markers.get(entity.index).and_then(|m| m.xml.clone()),
            Category::SpawnPoint => self.spawn_points.get(entity.index).map(PlayerSpawnPoint::source_text),
            Category::EventSpawn | Category::Zone => None,
        }
    }

    /// Bounding box of all markers.
    #[must_use]
    pub fn marker_extent(&self) -> Option<WorldRect> {
        WorldRect::enclosing(self.markers.iter().map(|m| WorldPoint::new(m.x, m.z)))
    }

    /// Bounding box of every positioned entity in every category.
    #[must_use]
    pub fn full_extent(&self) -> Option<WorldRect> {
        let points = Category::ORDER
            .iter()
            .flat_map(|c| (0..self.len(*c)).map(|i| EntityRef::new(*c, i)))
            .filter_map(|r| self.world_point(r))
            .chain(self.effect_areas.iter().map(|a| WorldPoint::new(a.x, a.z)))
            .collect::<Vec<_>>();
        WorldRect::enclosing(points)
    }
}
