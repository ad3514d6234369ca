mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, InputSnapshot, DEFAULT_TOUCH_DEAD_ZONE_PX};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    world_to_screen_px, Camera2D, ContainerLayout, Renderer, Viewport, ViewportMetrics,
    ViewportUnit,
};
pub use scene::{
    Facing, HeroVisual, MonsterVisual, RenderFrame, RenderSink, Scene, TorchVisual, Vec2,
};
