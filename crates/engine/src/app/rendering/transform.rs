use crate::app::Vec2;

/// Play area aspect ratio (width / height) the world is laid out for.
const CONTAINER_ASPECT: f32 = 4.0 / 3.0;
const WIDE_REFERENCE_HEIGHT: f32 = 100.0;
const NARROW_SCALE: f32 = 3.0 / 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportUnit {
    /// One unit is 1% of the viewport height.
    Vh,
    /// One unit is 1% of the viewport width.
    Vw,
}

/// Aspect-ratio dependent sizing shared by gameplay and rendering.
///
/// A viewport at least 4:3 wide lays the play area out against its height
/// (`reference_height = 100`, units of `vh`); a narrower one lays it out
/// against its width (`reference_height = 75`, units of `vw`, world scaled by
/// 3/4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub reference_height: f32,
    pub unit: ViewportUnit,
    pub scale: f32,
}

impl ViewportMetrics {
    pub fn from_size(width: u32, height: u32) -> Self {
        let is_wider = width as f32 >= CONTAINER_ASPECT * height as f32;
        if is_wider {
            Self {
                reference_height: WIDE_REFERENCE_HEIGHT,
                unit: ViewportUnit::Vh,
                scale: 1.0,
            }
        } else {
            Self {
                reference_height: WIDE_REFERENCE_HEIGHT * NARROW_SCALE,
                unit: ViewportUnit::Vw,
                scale: NARROW_SCALE,
            }
        }
    }

    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::from_size(viewport.width, viewport.height)
    }

    /// Pixel length of one viewport unit.
    pub fn unit_px(&self, viewport: Viewport) -> f32 {
        match self.unit {
            ViewportUnit::Vh => viewport.height as f32 / 100.0,
            ViewportUnit::Vw => viewport.width as f32 / 100.0,
        }
    }
}

/// Screen rectangle of the play area plus its world-to-pixel factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerLayout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub px_per_world: f32,
}

impl ContainerLayout {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let metrics = ViewportMetrics::for_viewport(viewport);
        let unit_px = metrics.unit_px(viewport);
        let height = metrics.reference_height * unit_px;
        let width = match metrics.unit {
            ViewportUnit::Vh => height * CONTAINER_ASPECT,
            ViewportUnit::Vw => viewport.width as f32,
        };
        Self {
            left: (viewport.width as f32 - width) * 0.5,
            top: (viewport.height as f32 - height) * 0.5,
            width,
            height,
            px_per_world: metrics.scale * unit_px,
        }
    }
}

/// Zoom applied around a focus point given as a fraction of the container
/// (0,0 top-left, 1,1 bottom-right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub focus: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            focus: Vec2 { x: 0.5, y: 0.5 },
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }
}

pub fn world_to_screen_px(world: Vec2, camera: &Camera2D, layout: &ContainerLayout) -> (i32, i32) {
    let zoom = camera.effective_zoom();
    let local_x = world.x * layout.px_per_world;
    let local_y = world.y * layout.px_per_world;
    let origin_x = camera.focus.x * layout.width;
    let origin_y = camera.focus.y * layout.height;
    let x = layout.left + origin_x + (local_x - origin_x) * zoom;
    let y = layout.top + origin_y + (local_y - origin_y) * zoom;
    (x.round() as i32, y.round() as i32)
}
