// CONTROLLER: Input, scene sequencing, movement and the update loop
pub mod input;
pub mod movement;
pub mod scene;
pub mod frame_loop;
pub mod resource;

pub use input::{InputEvent, InputState, InputProcessor, KeyAction, KeyBindings};
pub use movement::MovementSystem;
pub use scene::{InputResponse, Scene, SceneController};
pub use frame_loop::{FrameLoopContext, FrameScheduler};
pub use resource::{LoadBatch, Resources};
