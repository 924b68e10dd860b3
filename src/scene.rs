//! The park: ground, bench, lamp post and tree.
//!
//! Each element is a fixed procedure that composes its parts from the
//! transform it is handed. Nothing is written back to the caller, so sibling
//! elements cannot see each other's transforms.

use glam::{Mat4, Vec3, Vec4};

use crate::draw::{DrawList, Primitive};
use crate::geometry::Cylinder;
use crate::lighting::Lighting;
use crate::material::{rgb, NO_EMISSION};

/// Something that can emit its geometry into a draw list.
pub trait SceneElement {
    fn name(&self) -> &'static str;
    fn draw(&self, list: &mut DrawList, parent: Mat4, lighting: &Lighting);
}

/// Cylinder resting on y = 0 instead of being centred on it.
fn standing_cylinder(radius: f32, height: f32) -> (Primitive, Mat4) {
    (
        Primitive::Cylinder(Cylinder::new(radius, height)),
        Mat4::from_translation(Vec3::new(0.0, height / 2.0, 0.0)),
    )
}

const UNIT_CUBE: Primitive = Primitive::Cube { size: 1.0 };

#[derive(Debug, Clone, Copy, Default)]
pub struct Ground;

impl SceneElement for Ground {
    fn name(&self) -> &'static str {
        "ground"
    }

    fn draw(&self, list: &mut DrawList, parent: Mat4, _lighting: &Lighting) {
        list.set_ambient_diffuse(rgb(0.1, 0.4, 0.1));
        // Faint highlight so the lamp's pool of light reads on the grass.
        list.set_specular(rgb(0.05, 0.05, 0.05));
        list.set_shininess(10.0);
        list.draw("ground", Primitive::Ground { half_extent: 10.0 }, parent);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bench;

impl Bench {
    const SEAT_HEIGHT: f32 = 0.7;
    const SEAT_THICKNESS: f32 = 0.1;
    const WIDTH: f32 = 1.8;
    const DEPTH: f32 = 0.5;
    const BACK_HEIGHT: f32 = 0.8;
    const BACK_THICKNESS: f32 = 0.1;
    const LEG_LENGTH: f32 = 0.7;
    const LEG_THICKNESS: f32 = 0.08;

    fn leg(list: &mut DrawList, root: Mat4, x: f32, z: f32) {
        let model = root
            * Mat4::from_translation(Vec3::new(x, Self::LEG_LENGTH / 2.0, z))
            * Mat4::from_scale(Vec3::new(
                Self::LEG_THICKNESS,
                Self::LEG_LENGTH,
                Self::LEG_THICKNESS,
            ));
        list.draw("bench.leg", UNIT_CUBE, model);
    }
}

impl SceneElement for Bench {
    fn name(&self) -> &'static str {
        "bench"
    }

    fn draw(&self, list: &mut DrawList, parent: Mat4, _lighting: &Lighting) {
        list.set_ambient_diffuse(rgb(0.55, 0.35, 0.15));

        let root = parent
            * Mat4::from_translation(Vec3::new(2.0, 0.0, -2.0))
            * Mat4::from_rotation_y(30f32.to_radians());

        let seat = root
            * Mat4::from_translation(Vec3::new(0.0, Self::SEAT_HEIGHT, 0.0))
            * Mat4::from_scale(Vec3::new(Self::WIDTH, Self::SEAT_THICKNESS, Self::DEPTH));
        list.draw("bench.seat", UNIT_CUBE, seat);

        let seat_top = Self::SEAT_HEIGHT + Self::SEAT_THICKNESS / 2.0;
        let back = root
            * Mat4::from_translation(Vec3::new(
                0.0,
                seat_top + Self::BACK_HEIGHT / 2.0,
                -Self::DEPTH / 2.0 - Self::BACK_THICKNESS / 2.0,
            ))
            * Mat4::from_scale(Vec3::new(Self::WIDTH, Self::BACK_HEIGHT, Self::BACK_THICKNESS));
        list.draw("bench.back", UNIT_CUBE, back);

        let x = Self::WIDTH / 2.0 - 0.1;
        let z = Self::DEPTH / 2.0 - 0.1;
        for (sx, sz) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            Self::leg(list, root, sx * x, sz * z);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LampPost;

impl LampPost {
    pub const POLE_HEIGHT: f32 = 3.0;
    pub const POLE_RADIUS: f32 = 0.08;
    pub const GLOBE_RADIUS: f32 = 0.2;

    pub const GLOBE_ON: Vec4 = Vec4::new(1.0, 0.9, 0.6, 1.0);
    pub const GLOBE_OFF: Vec4 = Vec4::new(0.4, 0.4, 0.3, 1.0);
    pub const GLOW: Vec4 = Vec4::new(0.8, 0.7, 0.3, 1.0);
}

impl SceneElement for LampPost {
    fn name(&self) -> &'static str {
        "post"
    }

    fn draw(&self, list: &mut DrawList, parent: Mat4, lighting: &Lighting) {
        list.set_ambient_diffuse(rgb(0.3, 0.3, 0.3));
        let root = parent * Mat4::from_translation(Vec3::new(-3.0, 0.0, 0.0));

        let (pole, lift) = standing_cylinder(Self::POLE_RADIUS, Self::POLE_HEIGHT);
        list.draw("post.pole", pole, root * lift);

        if lighting.lamp.enabled {
            list.set_ambient_diffuse(Self::GLOBE_ON);
            list.set_emission(Self::GLOW);
        } else {
            list.set_ambient_diffuse(Self::GLOBE_OFF);
            list.set_emission(NO_EMISSION);
        }
        let globe = root
            * Mat4::from_translation(Vec3::new(
                0.0,
                Self::POLE_HEIGHT + Self::GLOBE_RADIUS / 2.0,
                0.0,
            ));
        list.draw(
            "post.globe",
            Primitive::Sphere {
                radius: Self::GLOBE_RADIUS,
                slices: 16,
                stacks: 16,
            },
            globe,
        );

        // Emission must not bleed into whatever is drawn next.
        list.set_emission(NO_EMISSION);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tree;

impl Tree {
    const TRUNK_HEIGHT: f32 = 2.5;
    const TRUNK_RADIUS: f32 = 0.2;
    const CANOPY_RADIUS: f32 = 1.2;
}

impl SceneElement for Tree {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn draw(&self, list: &mut DrawList, parent: Mat4, _lighting: &Lighting) {
        let root = parent * Mat4::from_translation(Vec3::new(-5.0, 0.0, 5.0));

        list.set_ambient_diffuse(rgb(0.4, 0.2, 0.0));
        let (trunk, lift) = standing_cylinder(Self::TRUNK_RADIUS, Self::TRUNK_HEIGHT);
        list.draw("tree.trunk", trunk, root * lift);

        list.set_ambient_diffuse(rgb(0.0, 0.5, 0.0));
        let canopy = root
            * Mat4::from_translation(Vec3::new(
                0.0,
                Self::TRUNK_HEIGHT + Self::CANOPY_RADIUS * 0.5,
                0.0,
            ));
        list.draw(
            "tree.canopy",
            Primitive::Sphere {
                radius: Self::CANOPY_RADIUS,
                slices: 20,
                stacks: 20,
            },
            canopy,
        );
    }
}

/// The whole scene in draw order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Park {
    ground: Ground,
    bench: Bench,
    post: LampPost,
    tree: Tree,
}

impl Park {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> [&dyn SceneElement; 4] {
        [&self.ground, &self.bench, &self.post, &self.tree]
    }

    pub fn draw(&self, list: &mut DrawList, lighting: &Lighting) {
        for element in self.elements() {
            element.draw(list, Mat4::IDENTITY, lighting);
        }
    }
}
