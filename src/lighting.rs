//! Dusk lighting: a low global ambient, a setting sun and the lamp on the post.
//!
//! Every light keeps its full parameter set whether or not it is enabled;
//! the enabled flag only decides whether it contributes to shading.

use glam::{Vec3, Vec4};
use log::info;

use crate::material::rgb;
use crate::render::{LightParams, LightSource};

/// Point-light falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const NONE: Self = Self {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Light at infinity shining along `-direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub enabled: bool,
    /// Points from the scene towards the light.
    pub direction: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
}

impl DirectionalLight {
    /// Low amber sun.
    pub fn sunset() -> Self {
        Self {
            enabled: true,
            direction: Vec3::new(3.0, 3.0, 3.0),
            ambient: rgb(0.2, 0.1, 0.05),
            diffuse: rgb(0.8, 0.4, 0.1),
            specular: rgb(1.0, 0.6, 0.3),
        }
    }

    fn source(&self) -> LightSource {
        LightSource {
            position: self.direction.extend(0.0),
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            attenuation: Attenuation::NONE,
            enabled: self.enabled,
        }
    }
}

/// Omnidirectional light at a world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub enabled: bool,
    pub position: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// Warm bulb at the top of the lamp post.
    ///
    /// The diffuse colour goes past 1.0 on purpose so the pool of light on
    /// the grass stays visible after attenuation.
    pub fn street_lamp() -> Self {
        Self {
            enabled: true,
            position: Vec3::new(-3.0, 3.1, 0.0),
            ambient: rgb(0.02, 0.02, 0.02),
            diffuse: rgb(1.2, 1.05, 0.85),
            specular: rgb(1.0, 1.0, 1.0),
            attenuation: Attenuation {
                constant: 0.8,
                linear: 0.03,
                quadratic: 0.005,
            },
        }
    }

    /// Attenuation reaching `point`.
    pub fn falloff_at(&self, point: Vec3) -> f32 {
        self.attenuation.factor(self.position.distance(point))
    }

    fn source(&self) -> LightSource {
        LightSource {
            position: self.position.extend(1.0),
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            attenuation: self.attenuation,
            enabled: self.enabled,
        }
    }
}

/// Complete lighting setup of the park.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub global_ambient: Vec4,
    /// Specular highlights use the real eye direction instead of -Z.
    pub local_viewer: bool,
    pub sun: DirectionalLight,
    pub lamp: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::dusk()
    }
}

impl Lighting {
    pub fn dusk() -> Self {
        Self {
            global_ambient: Vec4::new(0.05, 0.05, 0.07, 1.0),
            local_viewer: true,
            sun: DirectionalLight::sunset(),
            lamp: PointLight::street_lamp(),
        }
    }

    /// Flips the lamp and returns its new state.
    pub fn toggle_lamp(&mut self) -> bool {
        self.lamp.enabled = !self.lamp.enabled;
        info!("lamp light {}", on_off(self.lamp.enabled));
        self.lamp.enabled
    }

    /// Flips the sun and returns its new state.
    pub fn toggle_sun(&mut self) -> bool {
        self.sun.enabled = !self.sun.enabled;
        info!("sun light {}", on_off(self.sun.enabled));
        self.sun.enabled
    }

    /// Produces the per-frame light parameters, disabled lights included.
    pub fn configure(&self) -> LightParams {
        LightParams {
            global_ambient: self.global_ambient,
            local_viewer: self.local_viewer,
            sources: [self.sun.source(), self.lamp.source()],
        }
    }
}

pub(crate) fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_lights_start_enabled() {
        let lighting = Lighting::dusk();
        assert!(lighting.sun.enabled);
        assert!(lighting.lamp.enabled);
    }

    #[test]
    fn toggling_twice_restores_state() {
        let mut lighting = Lighting::dusk();
        let original = lighting;
        assert!(!lighting.toggle_lamp());
        assert!(lighting.toggle_lamp());
        assert!(!lighting.toggle_sun());
        assert!(lighting.toggle_sun());
        assert_eq!(lighting, original);
    }

    #[test]
    fn toggle_only_touches_the_flag() {
        let mut lighting = Lighting::dusk();
        lighting.toggle_sun();
        let mut expected = Lighting::dusk();
        expected.sun.enabled = false;
        assert_eq!(lighting, expected);
    }

    #[test]
    fn disabled_lights_are_still_configured() {
        let mut lighting = Lighting::dusk();
        lighting.toggle_lamp();
        lighting.toggle_sun();
        let params = lighting.configure();
        let [sun, lamp] = params.sources;
        assert!(!sun.enabled && !lamp.enabled);
        assert_eq!(sun.position.w, 0.0);
        assert_eq!(lamp.position, Vec4::new(-3.0, 3.1, 0.0, 1.0));
        assert_eq!(lamp.diffuse, rgb(1.2, 1.05, 0.85));
        assert_eq!(lamp.attenuation.quadratic, 0.005);
    }

    #[test]
    fn lamp_falloff_follows_attenuation_formula() {
        let lamp = PointLight::street_lamp();
        assert!((lamp.falloff_at(lamp.position) - 1.25).abs() < 1e-6);
        // Ground directly below the bulb, 3.1 units away.
        let expected = 1.0 / (0.8 + 0.03 * 3.1 + 0.005 * 3.1 * 3.1);
        let below = lamp.falloff_at(Vec3::new(-3.0, 0.0, 0.0));
        assert!((below - expected).abs() < 1e-6);
        assert!(lamp.falloff_at(Vec3::new(7.0, 0.0, 0.0)) < below);
    }
}
