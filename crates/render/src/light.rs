use glam::Vec3;

/// Light shining uniformly along `direction`, plus a flat ambient term
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub intensity: f32,
    pub ambient: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            intensity,
            ambient: 0.25,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::NEG_Y, 1.0)
    }
}
