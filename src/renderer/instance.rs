//! Instance data for batched bullet rendering

use bytemuck::{Pod, Zeroable};

use super::{RenderSink, RenderStates};
use crate::sim::{Bullet, BulletKind};

/// One bullet as the shader sees it (48 bytes, no padding)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BulletInstance {
    pub position: [f32; 2],
    pub radius: f32,
    /// Heading in degrees
    pub rotation: f32,
    /// `BulletKind::code`
    pub kind: u32,
    /// Laser width, 0 for everything else
    pub width: f32,
    _pad: [u32; 2],
    pub color: [f32; 4],
}

impl BulletInstance {
    pub fn from_bullet(bullet: &Bullet, states: &RenderStates) -> Self {
        let position = bullet.position() + states.offset;
        let mut color = bullet.color;
        color[3] *= states.alpha;
        let width = match bullet.kind {
            BulletKind::Laser(laser) => laser.width,
            _ => 0.0,
        };
        Self {
            position: position.to_array(),
            radius: bullet.radius,
            rotation: bullet.rotation(),
            kind: bullet.kind.code(),
            width,
            _pad: [0; 2],
            color,
        }
    }
}

/// Sink that collects instances for a single draw call
#[derive(Debug, Default, Clone)]
pub struct InstanceBatch {
    instances: Vec<BulletInstance>,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[BulletInstance] {
        &self.instances
    }

    /// Raw bytes ready for a GPU buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl RenderSink for InstanceBatch {
    fn draw_bullet(&mut self, bullet: &Bullet, states: &RenderStates) {
        self.instances.push(BulletInstance::from_bullet(bullet, states));
    }
}
