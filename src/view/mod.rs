// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::{RenderState, ScreenResources, ScreenUniform};
pub use gpu_init::GpuContext;
