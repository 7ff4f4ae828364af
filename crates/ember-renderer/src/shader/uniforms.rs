//! Uniform and attribute vocabulary, and the CPU-side uniform block.

use std::collections::HashMap;

/// Value type of a vocabulary uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    /// Bytes written by a setter.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }

    pub const fn wgsl(self) -> &'static str {
        match self {
            UniformKind::Float => "f32",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
            UniformKind::Mat4 => "mat4x4<f32>",
        }
    }

    pub(crate) fn matches(self, inner: &naga::TypeInner) -> bool {
        use naga::{Scalar, TypeInner, VectorSize};
        match (self, inner) {
            (UniformKind::Float, TypeInner::Scalar(s)) => *s == Scalar::F32,
            (UniformKind::Vec3, TypeInner::Vector { size, scalar }) => {
                *size == VectorSize::Tri && *scalar == Scalar::F32
            }
            (UniformKind::Vec4, TypeInner::Vector { size, scalar }) => {
                *size == VectorSize::Quad && *scalar == Scalar::F32
            }
            (
                UniformKind::Mat4,
                TypeInner::Matrix {
                    columns,
                    rows,
                    scalar,
                },
            ) => *columns == VectorSize::Quad && *rows == VectorSize::Quad && *scalar == Scalar::F32,
            _ => false,
        }
    }
}

/// Every uniform the renderer knows how to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniformRole {
    Model,
    ModelInvTr,
    ViewProj,
    Color,
    SecondaryColor,
    Time,
    Scale,
    CameraPosition,
    Radius,
    IridA,
    IridB,
    IridC,
    IridD,
    PerlinFrequency,
    FbmAmplitude,
    FbmFrequency,
}

impl UniformRole {
    pub const ALL: [UniformRole; 16] = [
        UniformRole::Model,
        UniformRole::ModelInvTr,
        UniformRole::ViewProj,
        UniformRole::Color,
        UniformRole::SecondaryColor,
        UniformRole::Time,
        UniformRole::Scale,
        UniformRole::CameraPosition,
        UniformRole::Radius,
        UniformRole::IridA,
        UniformRole::IridB,
        UniformRole::IridC,
        UniformRole::IridD,
        UniformRole::PerlinFrequency,
        UniformRole::FbmAmplitude,
        UniformRole::FbmFrequency,
    ];

    /// Member name inside the uniform block.
    pub const fn name(self) -> &'static str {
        match self {
            UniformRole::Model => "model",
            UniformRole::ModelInvTr => "model_inv_tr",
            UniformRole::ViewProj => "view_proj",
            UniformRole::Color => "color",
            UniformRole::SecondaryColor => "sec_color",
            UniformRole::Time => "time",
            UniformRole::Scale => "scale",
            UniformRole::CameraPosition => "cam_pos",
            UniformRole::Radius => "icosphere_radius",
            UniformRole::IridA => "irid_a",
            UniformRole::IridB => "irid_b",
            UniformRole::IridC => "irid_c",
            UniformRole::IridD => "irid_d",
            UniformRole::PerlinFrequency => "perlin_freq",
            UniformRole::FbmAmplitude => "fbm_amp",
            UniformRole::FbmFrequency => "fbm_freq",
        }
    }

    pub const fn kind(self) -> UniformKind {
        match self {
            UniformRole::Model | UniformRole::ModelInvTr | UniformRole::ViewProj => {
                UniformKind::Mat4
            }
            UniformRole::Color | UniformRole::SecondaryColor => UniformKind::Vec4,
            UniformRole::CameraPosition
            | UniformRole::IridA
            | UniformRole::IridB
            | UniformRole::IridC
            | UniformRole::IridD => UniformKind::Vec3,
            UniformRole::Time
            | UniformRole::Scale
            | UniformRole::Radius
            | UniformRole::PerlinFrequency
            | UniformRole::FbmAmplitude
            | UniformRole::FbmFrequency => UniformKind::Float,
        }
    }
}

/// Per-vertex inputs the mesh buffers can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeRole {
    Position,
    Normal,
    Color,
}

impl AttributeRole {
    pub const ALL: [AttributeRole; 3] = [
        AttributeRole::Position,
        AttributeRole::Normal,
        AttributeRole::Color,
    ];

    /// Vertex entry point parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            AttributeRole::Position => "vs_pos",
            AttributeRole::Normal => "vs_nor",
            AttributeRole::Color => "vs_col",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    pub(crate) const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Where a present uniform lives in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub offset: u32,
    pub kind: UniformKind,
}

/// CPU image of a program's uniform block.
///
/// The slot map is fixed at link time. Every write that changes bytes
/// bumps `revision`, which the render context uses to decide when a new
/// snapshot is needed.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    bytes: Vec<u8>,
    slots: HashMap<UniformRole, Option<UniformSlot>>,
    revision: u64,
}

impl UniformBlock {
    pub(crate) fn new(size: u32, slots: HashMap<UniformRole, Option<UniformSlot>>) -> Self {
        Self {
            bytes: vec![0; size as usize],
            slots,
            revision: 0,
        }
    }

    pub fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn slot(&self, role: UniformRole) -> Option<UniformSlot> {
        self.slots.get(&role).copied().flatten()
    }

    pub fn has(&self, role: UniformRole) -> bool {
        self.slot(role).is_some()
    }

    /// Write `value` into `role`'s slot. Returns whether the slot exists.
    pub(crate) fn write(&mut self, role: UniformRole, value: &[u8]) -> bool {
        let Some(slot) = self.slot(role) else {
            return false;
        };
        let start = slot.offset as usize;
        let Some(target) = self.bytes.get_mut(start..start + value.len()) else {
            return false;
        };
        if target != value {
            target.copy_from_slice(value);
            self.revision += 1;
        }
        true
    }

    /// Read back a float slot, for inspection.
    pub fn read_f32(&self, role: UniformRole) -> Option<f32> {
        let slot = self.slot(role)?;
        let start = slot.offset as usize;
        let bytes = self.bytes.get(start..start + 4)?;
        Some(f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read back all the floats of a slot, for inspection.
    pub fn read_floats(&self, role: UniformRole) -> Option<Vec<f32>> {
        let slot = self.slot(role)?;
        let start = slot.offset as usize;
        let bytes = self.bytes.get(start..start + slot.kind.size())?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_unique() {
        let mut names: Vec<_> = UniformRole::ALL.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), UniformRole::ALL.len());
    }

    #[test]
    fn attribute_lookup_by_name() {
        assert_eq!(AttributeRole::from_name("vs_nor"), Some(AttributeRole::Normal));
        assert_eq!(AttributeRole::from_name("vs_uv"), None);
        assert_eq!(AttributeRole::Color.bit(), 0b100);
    }

    #[test]
    fn write_to_absent_slot_is_ignored() {
        let mut slots = HashMap::new();
        slots.insert(
            UniformRole::Time,
            Some(UniformSlot {
                offset: 0,
                kind: UniformKind::Float,
            }),
        );
        slots.insert(UniformRole::Scale, None);
        let mut block = UniformBlock::new(16, slots);

        assert!(!block.write(UniformRole::Scale, &2.0f32.to_ne_bytes()));
        assert_eq!(block.revision(), 0);
        assert!(block.bytes().iter().all(|&b| b == 0));

        assert!(block.write(UniformRole::Time, &3.0f32.to_ne_bytes()));
        assert_eq!(block.revision(), 1);
        assert_eq!(block.read_f32(UniformRole::Time), Some(3.0));
    }

    #[test]
    fn identical_write_keeps_revision() {
        let mut slots = HashMap::new();
        slots.insert(
            UniformRole::Time,
            Some(UniformSlot {
                offset: 4,
                kind: UniformKind::Float,
            }),
        );
        let mut block = UniformBlock::new(16, slots);
        block.write(UniformRole::Time, &1.0f32.to_ne_bytes());
        block.write(UniformRole::Time, &1.0f32.to_ne_bytes());
        assert_eq!(block.revision(), 1);
    }
}
