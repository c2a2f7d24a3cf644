//! NPC resolution for both legacy shapes.
//!
//! Archetype fields are copied into a [`NpcTemplate`] by value, per-instance
//! `customProperties` are overlaid, and the template is then turned into an
//! independent [`NpcPlacement`]. Nothing here keeps a reference to the
//! archetype table once a placement is built.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tilescape_kernel::NpcPlacement;

use crate::coords::{Bounds, to_pixel};
use crate::document::{NpcArchetype, NpcEntry, NpcInstance, NpcSource};
use crate::{Diagnostic, Diagnostics};

pub const UNKNOWN_NPC_NAME: &str = "Unknown NPC";
pub const DEFAULT_BEHAVIOR: &str = "wander";
pub const DEFAULT_WANDER_RADIUS: f64 = 100.0;
pub const DEFAULT_INTERACTION_RADIUS: f64 = 50.0;

/// Resolved NPC fields before a position is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcTemplate {
    pub name: String,
    pub behavior_tag: String,
    pub wander_radius: f64,
    pub interaction_radius: f64,
    pub dialogue: Vec<String>,
    pub size: f64,
    pub sprite_reference: Option<String>,
}

impl NpcTemplate {
    /// Placeholder used when nothing better is known.
    pub fn placeholder(tile_size: u32) -> Self {
        Self {
            name: UNKNOWN_NPC_NAME.to_string(),
            behavior_tag: DEFAULT_BEHAVIOR.to_string(),
            wander_radius: DEFAULT_WANDER_RADIUS,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
            dialogue: Vec::new(),
            size: tile_size as f64,
            sprite_reference: None,
        }
    }

    pub fn from_archetype(archetype: &NpcArchetype, tile_size: u32) -> Self {
        let mut template = Self::placeholder(tile_size);
        if let Some(name) = &archetype.name {
            template.name = name.clone();
        }
        if let Some(behavior) = &archetype.behavior {
            template.apply_behavior(behavior);
        }
        if let Some(size) = archetype.default_size.filter(|s| s.is_finite() && *s > 0.0) {
            template.size = size;
        }
        if let Some(sprite) = archetype.sprite_data.as_ref().and_then(sprite_reference) {
            template.sprite_reference = Some(sprite);
        }
        template
    }

    /// Overlay instance-level `customProperties`. Unknown keys are ignored.
    pub fn overlay(&mut self, props: &Map<String, Value>) {
        if let Some(name) = props.get("name").and_then(Value::as_str) {
            self.name = name.to_string();
        }
        if let Some(behavior) = props.get("behavior") {
            self.apply_behavior(behavior);
        }
        self.apply_numbers(props);
        if let Some(dialogue) = props.get("dialogue") {
            self.dialogue = dialogue_lines(dialogue);
        }
        if let Some(size) = positive(props.get("size")) {
            self.size = size;
        }
        if let Some(sprite) = props
            .get("sprite")
            .or_else(|| props.get("spriteData"))
            .and_then(sprite_reference)
        {
            self.sprite_reference = Some(sprite);
        }
    }

    /// A behavior is either a bare tag or an object carrying a tag, radii,
    /// and dialogue.
    fn apply_behavior(&mut self, behavior: &Value) {
        match behavior {
            Value::String(tag) => self.behavior_tag = tag.clone(),
            Value::Object(obj) => {
                if let Some(tag) = obj.get("type").and_then(Value::as_str) {
                    self.behavior_tag = tag.to_string();
                }
                self.apply_numbers(obj);
                if let Some(dialogue) = obj.get("dialogue") {
                    self.dialogue = dialogue_lines(dialogue);
                }
            }
            _ => {}
        }
    }

    fn apply_numbers(&mut self, obj: &Map<String, Value>) {
        if let Some(r) = non_negative(obj.get("wanderRadius")) {
            self.wander_radius = r;
        }
        if let Some(r) = non_negative(obj.get("interactionRadius")) {
            self.interaction_radius = r;
        }
    }

    fn place(self, id: String, x: f64, y: f64, clamped: bool) -> NpcPlacement {
        NpcPlacement {
            id,
            display_name: self.name,
            x,
            y,
            behavior_tag: self.behavior_tag,
            wander_radius: self.wander_radius,
            interaction_radius: self.interaction_radius,
            dialogue: self.dialogue,
            size: self.size,
            sprite_reference: self.sprite_reference,
            clamped,
        }
    }
}

/// Geometry shared by every NPC in one document.
#[derive(Debug, Clone, Copy)]
pub struct PlacementFrame {
    pub tile_size: u32,
    pub bounds: Bounds,
}

/// Resolve every NPC in `source` into placements.
pub fn resolve_npcs(
    source: NpcSource<'_>,
    frame: PlacementFrame,
    diagnostics: &mut Diagnostics,
) -> Vec<NpcPlacement> {
    match source {
        NpcSource::Flat(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| resolve_flat(i, entry, frame, diagnostics))
            .collect(),
        NpcSource::Archetyped {
            instances,
            archetypes,
        } => {
            let table: HashMap<&str, &NpcArchetype> =
                archetypes.iter().map(|a| (a.id.as_str(), a)).collect();
            instances
                .iter()
                .enumerate()
                .map(|(i, instance)| resolve_instance(i, instance, &table, frame, diagnostics))
                .collect()
        }
        NpcSource::None => Vec::new(),
    }
}

fn resolve_flat(
    index: usize,
    entry: &NpcEntry,
    frame: PlacementFrame,
    diagnostics: &mut Diagnostics,
) -> NpcPlacement {
    let mut template = NpcTemplate::placeholder(frame.tile_size);
    if let Some(name) = &entry.name {
        template.name = name.clone();
    }
    if let Some(behavior) = &entry.behavior {
        template.apply_behavior(behavior);
    }
    if let Some(r) = entry.wander_radius.filter(|r| r.is_finite() && *r >= 0.0) {
        template.wander_radius = r;
    }
    if let Some(r) = entry.interaction_radius.filter(|r| r.is_finite() && *r >= 0.0) {
        template.interaction_radius = r;
    }
    if let Some(dialogue) = &entry.dialogue {
        template.dialogue = dialogue_lines(dialogue);
    }
    if let Some(size) = entry.size.filter(|s| s.is_finite() && *s > 0.0) {
        template.size = size;
    }
    template.sprite_reference = entry.sprite.as_ref().and_then(sprite_reference);

    let id = entry.id.clone().unwrap_or_else(|| format!("npc-{index}"));
    position(template, id, entry.x, entry.y, frame, diagnostics)
}

fn resolve_instance(
    index: usize,
    instance: &NpcInstance,
    table: &HashMap<&str, &NpcArchetype>,
    frame: PlacementFrame,
    diagnostics: &mut Diagnostics,
) -> NpcPlacement {
    let id = instance
        .id
        .clone()
        .unwrap_or_else(|| format!("npc-{index}"));

    let archetype = instance
        .archetype_id
        .as_deref()
        .and_then(|aid| table.get(aid).copied());
    let mut template = match archetype {
        Some(archetype) => NpcTemplate::from_archetype(archetype, frame.tile_size),
        None => {
            let archetype_id = instance.archetype_id.clone().unwrap_or_default();
            tracing::warn!(npc = %id, archetype = %archetype_id, "archetype not found, using placeholder");
            diagnostics.push(Diagnostic::MissingArchetype {
                npc: id.clone(),
                archetype: archetype_id,
            });
            NpcTemplate::placeholder(frame.tile_size)
        }
    };
    if let Some(props) = &instance.custom_properties {
        template.overlay(props);
    }

    position(
        template,
        id,
        instance.position.x,
        instance.position.y,
        frame,
        diagnostics,
    )
}

fn position(
    template: NpcTemplate,
    id: String,
    x: f64,
    y: f64,
    frame: PlacementFrame,
    diagnostics: &mut Diagnostics,
) -> NpcPlacement {
    let (px, py) = to_pixel(x, y, frame.tile_size);
    let ((cx, cy), clamped) = frame.bounds.clamp(px, py);
    if clamped {
        tracing::warn!(npc = %id, from = ?(px, py), to = ?(cx, cy), "npc position clamped");
        diagnostics.push(Diagnostic::OutOfBoundsClamped {
            entity: format!("npc {id}"),
            from: (px, py),
            to: (cx, cy),
        });
    }
    template.place(id, cx, cy, clamped)
}

/// Pull a sprite reference out of a string or an object with a path-like key.
fn sprite_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => ["src", "url", "path", "id"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn dialogue_lines(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn non_negative(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn positive(value: Option<&Value>) -> Option<f64> {
    non_negative(value).filter(|v| *v > 0.0)
}
