use tracing::{debug, info};

use crate::controller::input::{InputEvent, InputProcessor, InputState, KeyAction};
use crate::controller::movement::MovementSystem;
use crate::error::LoadError;
use crate::model::{LevelPack, Room};

/// Top-level game phase; gates rendering and which inputs are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title,
    Playing,
    LevelComplete,
    GameComplete,
}

/// What the front end must do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResponse {
    /// The key was recognised; suppress the browser default
    pub handled: bool,
    /// The frame loop is idle and must be restarted
    pub resume: bool,
}

/// Sequences levels and owns the room being played.
///
/// Every level is validated into a pristine room up front; starting or
/// restarting a level clones that room.
pub struct SceneController {
    levels: Vec<Room>,
    level: usize,
    /// Bumped every time a room is built, so renderers can tell restarts apart
    attempt: u64,
    scene: Scene,
    room: Option<Room>,
    paused: bool,
    input: InputState,
    processor: InputProcessor,
    movement: MovementSystem,
}

impl SceneController {
    pub fn new(pack: &LevelPack) -> Result<Self, LoadError> {
        let levels = pack
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| {
                Room::new(level).map_err(|source| LoadError::InvalidLevel { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if levels.is_empty() {
            return Err(LoadError::NoLevels("level pack".to_string()));
        }
        info!(count = levels.len(), "levels validated");

        Ok(Self {
            levels,
            level: 0,
            attempt: 0,
            scene: Scene::Title,
            room: None,
            paused: false,
            input: InputState::new(),
            processor: InputProcessor::default(),
            movement: MovementSystem::new(),
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rebuild the current level from its pristine copy
    fn reset(&mut self) {
        self.room = self.levels.get(self.level).cloned();
        self.attempt += 1;
        self.input.clear_keys();
        self.movement.clear();
        info!(level = self.level, "level started");
    }

    fn start(&mut self, level: usize) {
        self.level = level;
        self.scene = Scene::Playing;
        self.reset();
    }

    /// Space: advance whatever the current scene is waiting for
    fn advance(&mut self) {
        match self.scene {
            Scene::Title => self.start(0),
            Scene::Playing => self.reset(),
            Scene::LevelComplete => {
                if self.level + 1 < self.levels.len() {
                    self.start(self.level + 1);
                } else {
                    info!("all levels complete");
                    self.scene = Scene::GameComplete;
                    self.room = None;
                }
            }
            Scene::GameComplete => {
                self.scene = Scene::Title;
                self.level = 0;
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.paused {
            debug!("paused");
        }
        self.paused = true;
        self.input.clear_keys();
    }

    /// Returns true if the game was paused and the loop must restart
    pub fn resume(&mut self) -> bool {
        let was_paused = self.paused;
        self.paused = false;
        if was_paused {
            debug!("resumed");
        }
        was_paused
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> InputResponse {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => self.key_up(key),
            InputEvent::FocusLost => {
                self.pause();
                InputResponse::default()
            }
            InputEvent::FocusGained => InputResponse {
                handled: false,
                resume: self.resume(),
            },
        }
    }

    pub fn key_down(&mut self, key: &str) -> InputResponse {
        let Some(action) = self.processor.action_from_key(key) else {
            return InputResponse::default();
        };
        let mut response = InputResponse { handled: true, resume: false };
        match action {
            KeyAction::Move(dir) => {
                if self.scene == Scene::Playing {
                    self.input.press(dir);
                }
            }
            KeyAction::Advance => {
                if !self.paused {
                    self.advance();
                    response.resume = true;
                }
            }
        }
        response
    }

    pub fn key_up(&mut self, key: &str) -> InputResponse {
        match self.processor.action_from_key(key) {
            Some(KeyAction::Move(dir)) => {
                if self.scene == Scene::Playing {
                    self.input.release(dir);
                }
                InputResponse { handled: true, resume: false }
            }
            Some(KeyAction::Advance) => InputResponse { handled: true, resume: false },
            None => InputResponse::default(),
        }
    }

    /// Step the game by `dt` seconds; returns true when the frame loop may stop
    pub fn update(&mut self, dt: f32) -> bool {
        if self.paused {
            return true;
        }
        if self.scene != Scene::Playing {
            return true;
        }
        let Some(room) = self.room.as_mut() else {
            return true;
        };

        if let Some(dir) = self.input.intent() {
            if !room.player().moving {
                self.movement.request(room, dir);
            }
        }

        if self.movement.update(room, dt) && room.check_win() {
            info!(level = self.level, "level complete");
            self.scene = Scene::LevelComplete;
            return true;
        }
        false
    }
}
