// Library root shared by the wasm entry point below and the native binary
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{error, info};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, Window};

    use crate::config::GameOptions;
    use crate::controller::input::wasm::keyboard_event_to_input;
    use crate::controller::{FrameLoopContext, FrameScheduler, InputEvent, Resources, SceneController};
    use crate::view::{GpuContext, RenderState};
    use crate::{logging, ui};

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();

        let options = GameOptions::default();
        let (window, document, canvas) = init_canvas(options.width, options.height)?;
        setup_app(&window, &document, &canvas, &options).await.map_err(|e| {
            error!(error = ?e, "startup failed");
            e
        })
    }

    /// Load levels, bring up the GPU and hand the game to the animation loop
    async fn setup_app(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
        options: &GameOptions,
    ) -> Result<(), JsValue> {
        let scheduler = Rc::new(RefCell::new(FrameScheduler::new(options.frame_cap)));

        // Level fetch gates the first frame
        scheduler.borrow_mut().begin_loading();

        let gpu = GpuContext::new(canvas, options.width, options.height)
            .await
            .map_err(js_error)?;

        let mut resources = Resources::new(options.asset_root.clone());
        resources
            .load_data(&[options.levels.as_str()])
            .await
            .map_err(js_error)?;
        let pack = resources.levels(&options.levels).map_err(js_error)?;
        // the fetch has landed; release the gate
        scheduler.borrow_mut().run();
        let game = Rc::new(RefCell::new(SceneController::new(&pack).map_err(js_error)?));
        info!(levels = pack.len(), "level pack loaded");

        let mut render_state = RenderState::new(
            gpu.device.as_ref(),
            gpu.queue.as_ref(),
            gpu.format,
            gpu.config.alpha_mode,
            gpu.config.width,
            gpu.config.height,
        );
        let egui_ctx = egui::Context::default();
        let mut frame_ctx = FrameLoopContext::new(game.clone(), scheduler.clone());

        let frame_loop = AnimationLoop::new(window.clone(), move |now: f64| {
            let more = frame_ctx.update(now);

            let game = frame_ctx.game.borrow();
            let mut full_output = ui::build_ui(&egui_ctx, &game, render_state.width, render_state.height, now);
            let dpr = full_output.pixels_per_point;
            let primitives = egui_ctx.tessellate(std::mem::take(&mut full_output.shapes), dpr);
            render_state.egui_primitives = Some(primitives);
            render_state.egui_full_output = Some(full_output);
            render_state.egui_dpr = dpr;

            if let Err(e) = render_state.draw_frame(
                gpu.device.as_ref(),
                gpu.queue.as_ref(),
                &gpu.surface,
                game.room(),
                game.attempt(),
            ) {
                error!(error = ?e, "frame dropped");
            }
            more
        });

        setup_input_listeners(document, window, game, scheduler.clone(), frame_loop.clone())?;

        if scheduler.borrow_mut().run() {
            frame_loop.request();
        }
        Ok(())
    }

    /// Restart the frame loop if the scheduler says it is idle
    fn wake(scheduler: &Rc<RefCell<FrameScheduler>>, frame_loop: &AnimationLoop) {
        if scheduler.borrow_mut().run() {
            frame_loop.request();
        }
    }

    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        game: Rc<RefCell<SceneController>>,
        scheduler: Rc<RefCell<FrameScheduler>>,
        frame_loop: Rc<AnimationLoop>,
    ) -> Result<(), JsValue> {
        // Keyboard down
        {
            let game = game.clone();
            let scheduler = scheduler.clone();
            let frame_loop = frame_loop.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                let response = game.borrow_mut().handle_event(&keyboard_event_to_input(&e, true));
                if response.handled {
                    e.prevent_default();
                }
                if response.resume {
                    wake(&scheduler, &frame_loop);
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                if game.borrow_mut().handle_event(&keyboard_event_to_input(&e, false)).handled {
                    e.prevent_default();
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Focus loss - pause and drop held keys
        {
            let game = game.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                game.borrow_mut().handle_event(&InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Focus regained - resume the loop
        {
            let focus = Closure::wrap(Box::new(move |_e: Event| {
                if game.borrow_mut().handle_event(&InputEvent::FocusGained).resume {
                    wake(&scheduler, &frame_loop);
                }
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("focus", focus.as_ref().unchecked_ref())?;
            focus.forget();
        }

        Ok(())
    }

    fn init_canvas(width: u32, height: u32) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or(js_error("no global `window`"))?;
        let document = window.document().ok_or(js_error("no document on window"))?;
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        canvas_el.set_width(width);
        canvas_el.set_height(height);
        // focusable, so blur/focus track the game
        canvas_el.set_tab_index(0);
        body.append_child(&canvas_el)?;
        canvas_el.focus()?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: ToString>(err: E) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// requestAnimationFrame driver that only reschedules while the frame
    /// callback returns true; `request` starts it again after it went idle.
    struct AnimationLoop {
        window: Window,
        callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    }

    impl AnimationLoop {
        fn new(window: Window, mut frame: impl FnMut(f64) -> bool + 'static) -> Rc<Self> {
            let this = Rc::new(Self {
                window,
                callback: RefCell::new(None),
            });

            let weak = Rc::downgrade(&this);
            let closure = Closure::wrap(Box::new(move |now: f64| {
                if frame(now) {
                    if let Some(this) = weak.upgrade() {
                        this.request();
                    }
                }
            }) as Box<dyn FnMut(f64)>);
            *this.callback.borrow_mut() = Some(closure);

            // Leak one handle to keep the loop alive for the page lifetime
            std::mem::forget(this.clone());
            this
        }

        fn request(&self) {
            if let Some(callback) = self.callback.borrow().as_ref() {
                if let Err(e) = self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    error!(error = ?e, "requestAnimationFrame failed");
                }
            }
        }
    }
}
