use glam::{Vec3, Vec4};

/// Surface response in the classic ambient/diffuse/specular/emission model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub shininess: f32,
}

impl Default for Material {
    /// Fixed-function defaults: grey ambient/diffuse, no specular, no emission.
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emission: NO_EMISSION,
            shininess: 0.0,
        }
    }
}

/// Emission colour that contributes nothing.
pub const NO_EMISSION: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Opaque colour from an RGB triple.
pub fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
    Vec3::new(r, g, b).extend(1.0)
}

impl Material {
    pub fn is_emissive(&self) -> bool {
        self.emission.truncate() != Vec3::ZERO
    }
}
