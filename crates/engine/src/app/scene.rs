use super::input::InputSnapshot;
use super::rendering::Viewport;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Clamps each component into `[min, max]` of the matching axis.
    pub fn clamped(self, min: Vec2, max: Vec2) -> Self {
        Self {
            x: self.x.max(min.x).min(max.x),
            y: self.y.max(min.y).min(max.y),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroVisual {
    pub position: Vec2,
    pub facing: Facing,
    pub size_world: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterVisual {
    pub position: Vec2,
    pub carries_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorchVisual {
    /// Visible diameter of the torch glow, in world units.
    pub height_world: f32,
    /// Peak brightness of the glow in `[0, 1]`.
    pub intensity: f32,
}

/// Everything a render sink needs to draw one frame. Built by the active scene
/// after its tick and never read back.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub world_extent: Vec2,
    pub hero: HeroVisual,
    pub monsters: &'a [MonsterVisual],
    pub monster_size_world: f32,
    pub zoom: f32,
    pub torch: TorchVisual,
    /// When set, the world is hidden and this message is shown instead.
    pub message: Option<&'a str>,
}

pub trait RenderSink {
    type Error;

    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<(), Self::Error>;
}

pub trait Scene {
    fn load(&mut self, viewport: Viewport);
    fn update(&mut self, input: &InputSnapshot);
    /// Low-frequency refresh for purely visual state, driven by its own timer.
    fn refresh_ambient(&mut self, _viewport: Viewport) {}
    fn render_frame(&self) -> RenderFrame<'_>;
    fn unload(&mut self) {}
    fn title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn clamped_saturates_each_axis_independently() {
        let clamped = Vec2::new(-3.0, 150.0).clamped(Vec2::ZERO, Vec2::new(130.5, 97.1));
        assert_eq!(clamped, Vec2::new(0.0, 97.1));
    }

    #[test]
    fn facing_defaults_to_right() {
        assert_eq!(Facing::default(), Facing::Right);
    }
}
