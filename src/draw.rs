//! Immediate-mode style command recording.
//!
//! A [`DrawList`] keeps a current material the same way the fixed-function
//! pipeline does: a property stays in effect until something overwrites it.
//! Transforms are never stored here; each draw takes its fully composed model
//! matrix.

use glam::{Mat4, Vec4};

use crate::geometry::{self, Cylinder, Mesh};
use crate::material::Material;

/// Geometry a draw command refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Ground { half_extent: f32 },
    Cube { size: f32 },
    Sphere { radius: f32, slices: u32, stacks: u32 },
    Cylinder(Cylinder),
}

impl Primitive {
    /// Stable name used to cache the generated mesh.
    pub fn mesh_key(&self) -> String {
        match self {
            Self::Ground { half_extent } => format!("ground-{half_extent}"),
            Self::Cube { size } => format!("cube-{size}"),
            Self::Sphere {
                radius,
                slices,
                stacks,
            } => format!("sphere-{radius}-{slices}x{stacks}"),
            Self::Cylinder(cylinder) => format!(
                "cylinder-{}x{}-{}",
                cylinder.radius, cylinder.height, cylinder.segments
            ),
        }
    }

    pub fn build_mesh(&self) -> Mesh {
        match *self {
            Self::Ground { half_extent } => geometry::ground_quad(half_extent),
            Self::Cube { size } => geometry::cube(size),
            Self::Sphere {
                radius,
                slices,
                stacks,
            } => geometry::sphere(radius, slices, stacks),
            Self::Cylinder(cylinder) => cylinder.mesh(),
        }
    }
}

/// One primitive with the transform and material it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub label: &'static str,
    pub primitive: Primitive,
    pub model: Mat4,
    pub material: Material,
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    material: Material,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets ambient and diffuse reflectance together.
    pub fn set_ambient_diffuse(&mut self, color: Vec4) {
        self.material.ambient = color;
        self.material.diffuse = color;
    }

    pub fn set_specular(&mut self, color: Vec4) {
        self.material.specular = color;
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.material.shininess = shininess;
    }

    pub fn set_emission(&mut self, color: Vec4) {
        self.material.emission = color;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn draw(&mut self, label: &'static str, primitive: Primitive, model: Mat4) {
        self.commands.push(DrawCommand {
            label,
            primitive,
            model,
            material: self.material,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::rgb;

    #[test]
    fn material_sticks_until_overwritten() {
        let mut list = DrawList::new();
        list.set_ambient_diffuse(rgb(0.1, 0.4, 0.1));
        list.set_specular(rgb(0.05, 0.05, 0.05));
        list.draw("a", Primitive::Cube { size: 1.0 }, Mat4::IDENTITY);
        list.set_ambient_diffuse(rgb(0.5, 0.5, 0.5));
        list.draw("b", Primitive::Cube { size: 1.0 }, Mat4::IDENTITY);

        let [a, b] = list.commands() else {
            panic!("expected two commands");
        };
        assert_eq!(a.material.diffuse, rgb(0.1, 0.4, 0.1));
        assert_eq!(b.material.diffuse, rgb(0.5, 0.5, 0.5));
        assert_eq!(b.material.specular, rgb(0.05, 0.05, 0.05));
    }

    #[test]
    fn mesh_keys_distinguish_parameters() {
        let thin = Primitive::Cylinder(Cylinder::new(0.08, 3.0));
        let thick = Primitive::Cylinder(Cylinder::new(0.2, 2.5));
        assert_ne!(thin.mesh_key(), thick.mesh_key());
        assert_eq!(thin.mesh_key(), thin.mesh_key());
    }
}
