//! Instanced building rendering for large cities.
//!
//! Every building is the same unit cube, placed and scaled by a
//! per-instance transform and tinted by a per-instance color. Transforms
//! and colors live in separate buffers: transforms only change with the
//! snapshot, colors change with hover and selection.

use bytemuck::{Pod, Zeroable};

use crate::city::{Building, NormalizedLayout};
use crate::core::types::{Mat4, Quat, Vec3};
use crate::generation::{palette, MeshData};
use crate::interaction::InteractionState;

use super::highlight::Highlight;

/// Per-instance model matrix (shader locations 3-6)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Unit cube -> building box at `translation`
    pub fn new(translation: Vec3, scale: Vec3) -> Self {
        let model = Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, translation);
        Self { model: model.to_cols_array_2d() }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Per-instance color (shader location 7). Alpha is unused and kept at 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceColor {
    pub color: [f32; 4],
}

impl InstanceColor {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![7 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceColor>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn new(color: Vec3) -> Self {
        Self { color: color.extend(1.0).to_array() }
    }

    pub fn rgb(&self) -> Vec3 {
        Vec3::new(self.color[0], self.color[1], self.color[2])
    }
}

/// All buildings as one instanced draw
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    /// Shared unit cube
    pub mesh: MeshData,
    /// Building index per instance
    pub buildings: Vec<usize>,
    pub transforms: Vec<InstanceTransform>,
    pub colors: Vec<InstanceColor>,
    base_colors: Vec<Vec3>,
    highlights: Vec<Highlight>,
    colors_dirty: bool,
}

impl InstanceBatch {
    /// One instance per building with a layout position
    pub fn new(buildings: &[Building], layout: &NormalizedLayout) -> Self {
        let mut batch = Self {
            mesh: MeshData::unit_cube(),
            buildings: Vec::with_capacity(buildings.len()),
            transforms: Vec::with_capacity(buildings.len()),
            colors: Vec::with_capacity(buildings.len()),
            base_colors: Vec::with_capacity(buildings.len()),
            highlights: Vec::with_capacity(buildings.len()),
            colors_dirty: true,
        };

        for (i, building) in buildings.iter().enumerate() {
            let Some(ground) = layout.building(i) else { continue };
            let d = building.dimensions;
            let base = palette::body_color(&building.language, building.decay_level);
            batch.buildings.push(i);
            batch.transforms.push(InstanceTransform::new(
                Vec3::new(ground.x, 0.0, ground.y),
                Vec3::new(d.width, d.height, d.depth),
            ));
            batch.colors.push(InstanceColor::new(base));
            batch.base_colors.push(base);
            batch.highlights.push(Highlight::None);
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Recompute highlight tints. Only the color buffer is touched; returns
    /// the number of instances whose color changed.
    pub fn update_colors(&mut self, buildings: &[Building], interaction: &InteractionState) -> usize {
        let mut changed = 0;
        for (slot, &index) in self.buildings.iter().enumerate() {
            let highlight = Highlight::of(&buildings[index].id, interaction);
            if highlight != self.highlights[slot] {
                self.highlights[slot] = highlight;
                self.colors[slot] = InstanceColor::new(highlight.apply(self.base_colors[slot]));
                changed += 1;
            }
        }
        if changed > 0 {
            self.colors_dirty = true;
        }
        changed
    }

    /// Color bytes to upload, if they changed since the last call
    pub fn take_color_upload(&mut self) -> Option<&[u8]> {
        if !self.colors_dirty {
            return None;
        }
        self.colors_dirty = false;
        Some(bytemuck::cast_slice(&self.colors))
    }

    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    pub fn highlight(&self, slot: usize) -> Highlight {
        self.highlights.get(slot).copied().unwrap_or_default()
    }
}
