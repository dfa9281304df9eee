//! Render transforms for the visual collaborator
//!
//! Snapshots each live entity as position, scale and orientation.
//! This module is READ-ONLY - it never modifies simulation state.

pub mod colors;

use crate::core::types::{EntityKind, Vec2};
use crate::ecs::arena::Handle;
use crate::ecs::world::PondWorld;
use serde::Serialize;

/// Where and how to draw one entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderTransform {
    pub kind: EntityKind,
    pub handle: Handle,
    pub position: Vec2,
    /// Negative when the fish faces left
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation_deg: f32,
    pub color_idx: usize,
    pub predator: bool,
}

impl RenderTransform {
    pub fn facing_left(&self) -> bool {
        self.scale_x < 0.0
    }
}

/// Collects transforms for every live pill, then every live fish.
/// Call this once per frame, passing the same buffer to avoid allocations.
pub fn collect_render_transforms(world: &PondWorld, buffer: &mut Vec<RenderTransform>) {
    buffer.clear();
    let t = world.now() as f32;

    for (handle, pill) in world.pills.iter() {
        if !pill.alive {
            continue;
        }
        buffer.push(RenderTransform {
            kind: EntityKind::Pill,
            handle,
            position: pill.position,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_deg: pill.rotation_deg(t),
            color_idx: pill.color_idx,
            predator: false,
        });
    }

    for (handle, fish) in world.fish.iter() {
        if !fish.alive {
            continue;
        }
        let scale = fish.scale();
        buffer.push(RenderTransform {
            kind: EntityKind::Fish,
            handle,
            position: fish.center(),
            scale_x: if fish.facing_right() { scale } else { -scale },
            scale_y: scale,
            rotation_deg: 0.0,
            color_idx: fish.color_idx,
            predator: fish.is_predator(),
        });
    }
}
