use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

// Import from the library crate
use slidestone::{
    config::GameOptions,
    controller::{FrameLoopContext, FrameScheduler, InputEvent, Resources, SceneController},
    error::LoadError,
    logging, ui,
    view::{GpuContext, RenderState},
};

/// Translate a winit logical key into its DOM `KeyboardEvent.key` spelling
fn dom_key_name(key: &Key) -> Option<String> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp".to_string()),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown".to_string()),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft".to_string()),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight".to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        Key::Character(c) => Some(c.to_string()),
        _ => None,
    }
}

struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
}

struct App {
    options: GameOptions,
    game: Rc<RefCell<SceneController>>,
    scheduler: Rc<RefCell<FrameScheduler>>,
    frame_ctx: FrameLoopContext,
    started: Instant,
    graphics: Option<Graphics>,
    failed: bool,
}

impl App {
    fn new(options: GameOptions, game: SceneController, scheduler: FrameScheduler) -> Self {
        let game = Rc::new(RefCell::new(game));
        let scheduler = Rc::new(RefCell::new(scheduler));
        let frame_ctx = FrameLoopContext::new(game.clone(), scheduler.clone());
        Self {
            options,
            game,
            scheduler,
            frame_ctx,
            started: Instant::now(),
            graphics: None,
            failed: false,
        }
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics, String> {
        let window_attributes = Window::default_attributes()
            .with_title(ui::TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(self.options.width, self.options.height));
        let window = Arc::new(event_loop.create_window(window_attributes).map_err(|e| e.to_string())?);

        let size = window.inner_size();
        let gpu = pollster::block_on(GpuContext::new_native(window.clone(), size.width, size.height))
            .map_err(|e| e.to_string())?;

        let render_state = RenderState::new(
            &gpu.device,
            &gpu.queue,
            gpu.format,
            gpu.config.alpha_mode,
            gpu.config.width,
            gpu.config.height,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        Ok(Graphics { window, gpu, render_state, egui_ctx, egui_state })
    }

    /// Restart the frame loop if it went idle
    fn wake(&self) {
        if self.scheduler.borrow_mut().run() {
            if let Some(gfx) = &self.graphics {
                gfx.window.request_redraw();
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        let response = self.game.borrow_mut().handle_event(&event);
        if response.resume {
            self.wake();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Redraws outside a running loop (resize, expose) only repaint
        let more = if self.scheduler.borrow().is_running() {
            let now = self.started.elapsed().as_secs_f64() * 1000.0;
            self.frame_ctx.update(now)
        } else {
            false
        };

        let Some(gfx) = self.graphics.as_mut() else {
            return;
        };
        let game = self.game.borrow();

        let raw_input = gfx.egui_state.take_egui_input(&gfx.window);
        let ppp = gfx.egui_ctx.pixels_per_point();
        let width = gfx.render_state.width as f32 / ppp;
        let height = gfx.render_state.height as f32 / ppp;
        let mut full_output = gfx.egui_ctx.run(raw_input, |ctx| {
            ui::draw_scene(ctx, &game, width, height);
        });
        gfx.egui_state
            .handle_platform_output(&gfx.window, std::mem::take(&mut full_output.platform_output));

        let dpr = full_output.pixels_per_point;
        let primitives = gfx.egui_ctx.tessellate(std::mem::take(&mut full_output.shapes), dpr);
        gfx.render_state.egui_primitives = Some(primitives);
        gfx.render_state.egui_full_output = Some(full_output);
        gfx.render_state.egui_dpr = dpr;

        match gfx.render_state.draw_frame(
            &gfx.gpu.device,
            &gfx.gpu.queue,
            &gfx.gpu.surface,
            game.room(),
            game.attempt(),
        ) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!(error = ?e, "frame dropped"),
        }

        if more {
            gfx.window.request_redraw();
        }
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let Some(gfx) = self.graphics.as_mut() else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }
        gfx.gpu.resize(size.width, size.height);
        gfx.render_state.resize(&gfx.gpu.queue, size.width, size.height);
        gfx.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(gfx) => {
                self.graphics = Some(gfx);
                self.wake();
            }
            Err(e) => {
                error!(error = %e, "graphics init failed");
                eprintln!("slidestone: {e}");
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gfx) = self.graphics.as_mut() else {
            return;
        };
        if window_id != gfx.window.id() {
            return;
        }
        // keep egui's view of the window (scale, size) current; it takes no game input
        let _ = gfx.egui_state.on_window_event(&gfx.window, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::Focused(false) => self.handle_input(InputEvent::FocusLost),
            WindowEvent::Focused(true) => self.handle_input(InputEvent::FocusGained),
            WindowEvent::KeyboardInput {
                event: KeyEvent { logical_key, state, .. },
                ..
            } => {
                if let Some(key) = dom_key_name(&logical_key) {
                    let input = match state {
                        ElementState::Pressed => InputEvent::KeyDown(key),
                        ElementState::Released => InputEvent::KeyUp(key),
                    };
                    self.handle_input(input);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn load_game(options: &GameOptions, scheduler: &mut FrameScheduler) -> Result<SceneController, LoadError> {
    scheduler.begin_loading();
    let mut resources = Resources::new(options.asset_root.clone());
    pollster::block_on(resources.load_data(&[options.levels.as_str()]))?;
    let pack = resources.levels(&options.levels)?;
    let game = SceneController::new(&pack)?;
    // the load has landed; release the gate
    scheduler.run();
    Ok(game)
}

fn main() -> ExitCode {
    logging::init();

    let options = GameOptions::from_env();
    info!(assets = %options.asset_root.display(), "starting");

    let mut scheduler = FrameScheduler::new(options.frame_cap);
    let game = match load_game(&options, &mut scheduler) {
        Ok(game) => game,
        Err(e) => {
            error!(error = %e, "failed to load levels");
            eprintln!("slidestone: {e}");
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!(error = %e, "failed to create event loop");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(options, game, scheduler);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!(error = %e, "event loop terminated");
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn keys_use_dom_names() {
        assert_eq!(dom_key_name(&Key::Named(NamedKey::ArrowLeft)).as_deref(), Some("ArrowLeft"));
        assert_eq!(dom_key_name(&Key::Named(NamedKey::Space)).as_deref(), Some(" "));
        assert_eq!(dom_key_name(&Key::Character(SmolStr::new("W"))).as_deref(), Some("W"));
        assert_eq!(dom_key_name(&Key::Named(NamedKey::Escape)), None);
    }
}
