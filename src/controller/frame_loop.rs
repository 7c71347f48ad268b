use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::controller::scene::SceneController;

/// Decides when frames run and how much time each one covers.
///
/// Mirrors the animation-frame contract: one pending frame at most, `dt`
/// capped at `dt_max`, and no frames until the loading countdown reaches zero.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    dt_max: f32,
    last_time: Option<f64>,
    frame_pending: bool,
    loading_progress: usize,
}

impl FrameScheduler {
    pub fn new(frame_cap: u32) -> Self {
        Self {
            dt_max: 1.0 / frame_cap.max(1) as f32,
            last_time: None,
            frame_pending: false,
            loading_progress: 0,
        }
    }

    pub fn dt_max(&self) -> f32 {
        self.dt_max
    }

    /// Register one outstanding load that must finish before the loop starts
    pub fn begin_loading(&mut self) {
        self.loading_progress += 1;
    }

    pub fn loading_progress(&self) -> usize {
        self.loading_progress
    }

    pub fn is_running(&self) -> bool {
        self.frame_pending
    }

    /// Ask for the loop to (re)start.
    ///
    /// While loads are outstanding each call counts one of them down instead.
    /// Returns true when the caller must request an animation frame.
    pub fn run(&mut self) -> bool {
        if self.loading_progress > 0 {
            self.loading_progress -= 1;
            trace!(remaining = self.loading_progress, "load finished");
            return false;
        }
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Elapsed seconds since the previous frame, capped at `dt_max`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let last = *self.last_time.get_or_insert(now_ms);
        self.last_time = Some(now_ms);
        (((now_ms - last) / 1000.0) as f32).clamp(0.0, self.dt_max)
    }

    /// Close out a frame; returns true when another frame should be requested
    pub fn finish_frame(&mut self, done: bool) -> bool {
        if done {
            debug!("frame loop idle");
            self.frame_pending = false;
        }
        !done
    }
}

/// Per-frame driver shared by the browser and native front ends
pub struct FrameLoopContext {
    pub game: Rc<RefCell<SceneController>>,
    pub scheduler: Rc<RefCell<FrameScheduler>>,
}

impl FrameLoopContext {
    pub fn new(game: Rc<RefCell<SceneController>>, scheduler: Rc<RefCell<FrameScheduler>>) -> Self {
        Self { game, scheduler }
    }

    /// Run one update; returns true if another frame should follow
    pub fn update(&mut self, now_ms: f64) -> bool {
        let dt = self.scheduler.borrow_mut().tick(now_ms);
        let done = self.game.borrow_mut().update(dt);
        self.scheduler.borrow_mut().finish_frame(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_gates_first_frame() {
        let mut scheduler = FrameScheduler::new(30);
        scheduler.begin_loading();
        // the initial run after setup only counts down
        assert!(!scheduler.run());
        assert_eq!(scheduler.loading_progress(), 0);
        assert!(scheduler.run());
        assert!(scheduler.is_running());
        // a frame is already pending
        assert!(!scheduler.run());
    }

    #[test]
    fn dt_is_capped() {
        let mut scheduler = FrameScheduler::new(30);
        assert_eq!(scheduler.tick(1000.0), 0.0);
        let dt = scheduler.tick(1010.0);
        assert!((dt - 0.01).abs() < 1e-6);
        assert_eq!(scheduler.tick(5000.0), scheduler.dt_max());
    }

    #[test]
    fn done_stops_until_run_again() {
        let mut scheduler = FrameScheduler::new(60);
        assert!(scheduler.run());
        assert!(scheduler.finish_frame(false));
        assert!(!scheduler.finish_frame(true));
        assert!(!scheduler.is_running());
        assert!(scheduler.run());
    }
}
