//! Orbiting point lights
//!
//! Four white point lights circle the model on a fixed-radius ring,
//! two above and two below the equator, spaced 90 degrees apart in
//! phase. Positions are a pure function of elapsed time so the motion
//! is deterministic and frame-rate independent.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

pub const LIGHT_COUNT: usize = 4;

const ORBIT_RADIUS: f32 = 10.0;
const ANGULAR_SPEED: f32 = 0.5;
const LIGHT_INTENSITY: Vec3 = Vec3::new(300.0, 300.0, 300.0);

/// A single point light
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// The fixed four-light orbit rig
pub struct LightRig {
    heights: [f32; LIGHT_COUNT],
    phases: [f32; LIGHT_COUNT],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            heights: [10.0, 10.0, -10.0, -10.0],
            phases: [
                0.0,
                std::f32::consts::FRAC_PI_2,
                std::f32::consts::PI,
                3.0 * std::f32::consts::FRAC_PI_2,
            ],
        }
    }
}

impl LightRig {
    /// Light positions and colors at the given elapsed time in seconds
    pub fn lights(&self, time: f32) -> [PointLight; LIGHT_COUNT] {
        std::array::from_fn(|i| {
            let angle = time * ANGULAR_SPEED + self.phases[i];
            PointLight {
                position: Vec3::new(
                    ORBIT_RADIUS * angle.cos(),
                    self.heights[i],
                    ORBIT_RADIUS * angle.sin(),
                ),
                color: LIGHT_INTENSITY,
            }
        })
    }

    /// Pack the rig state into the GPU uniform layout
    pub fn uniform(&self, time: f32) -> LightsUniform {
        let lights = self.lights(time);
        LightsUniform {
            positions: lights.map(|l| l.position.extend(1.0)),
            colors: lights.map(|l| l.color.extend(1.0)),
        }
    }
}

/// Light array uniform, std140-compatible (vec4 stride)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsUniform {
    pub positions: [Vec4; LIGHT_COUNT],
    pub colors: [Vec4; LIGHT_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_sit_on_orbit_ring() {
        let rig = LightRig::default();
        for light in rig.lights(3.7) {
            let horizontal = Vec3::new(light.position.x, 0.0, light.position.z);
            assert!((horizontal.length() - ORBIT_RADIUS).abs() < 1e-4);
            assert!((light.position.y.abs() - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn lights_start_ninety_degrees_apart() {
        let rig = LightRig::default();
        let lights = rig.lights(0.0);
        assert!((lights[0].position - Vec3::new(10.0, 10.0, 0.0)).length() < 1e-4);
        assert!((lights[1].position - Vec3::new(0.0, 10.0, 10.0)).length() < 1e-4);
        assert!((lights[2].position - Vec3::new(-10.0, -10.0, 0.0)).length() < 1e-4);
        assert!((lights[3].position - Vec3::new(0.0, -10.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn motion_is_deterministic() {
        let rig = LightRig::default();
        let a = rig.lights(12.5);
        let b = rig.lights(12.5);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn full_period_returns_to_start() {
        let rig = LightRig::default();
        let period = 2.0 * std::f32::consts::PI / ANGULAR_SPEED;
        let start = rig.lights(0.0);
        let looped = rig.lights(period);
        for (a, b) in start.iter().zip(looped.iter()) {
            assert!((a.position - b.position).length() < 1e-3);
        }
    }

    #[test]
    fn uniform_packs_all_lights() {
        let rig = LightRig::default();
        let uniform = rig.uniform(1.0);
        for color in uniform.colors {
            assert_eq!(color.truncate(), LIGHT_INTENSITY);
        }
        assert_eq!(
            std::mem::size_of::<LightsUniform>(),
            LIGHT_COUNT * 2 * std::mem::size_of::<Vec4>()
        );
    }
}
