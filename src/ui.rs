use egui::{Align2, Color32, Context, FontId, LayerId, Order, Pos2};

use crate::controller::{Scene, SceneController};

pub const TITLE: &str = "slidestone";

/// One centred line of overlay text; `y` is the baseline, in points from the top
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub y: f32,
    pub size: f32,
}

impl TextLine {
    fn new(text: impl Into<String>, y: f32, size: f32) -> Self {
        Self { text: text.into(), y, size }
    }
}

/// What the overlay shows for the current scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub dimmed: bool,
    pub lines: Vec<TextLine>,
}

pub fn overlay_for(game: &SceneController, height: f32) -> Overlay {
    let mid = height / 2.0;
    let mut overlay = Overlay::default();
    match game.scene() {
        Scene::Title => {
            overlay.lines.push(TextLine::new(TITLE, mid, 40.0));
            overlay.lines.push(TextLine::new("press space to start", mid + 48.0, 20.0));
        }
        Scene::Playing => {
            let label = format!("level {} / {}", game.level() + 1, game.level_count());
            overlay.lines.push(TextLine::new(label, 24.0, 14.0));
        }
        Scene::LevelComplete => {
            overlay.lines.push(TextLine::new("Level complete!", 80.0, 40.0));
            overlay.lines.push(TextLine::new("Press [space] to continue", 128.0, 24.0));
        }
        Scene::GameComplete => {
            overlay.lines.push(TextLine::new("Thanks for playing!", mid, 40.0));
            overlay.lines.push(TextLine::new("That's all for now", mid - 48.0, 20.0));
        }
    }
    if game.is_paused() && game.scene() == Scene::Playing {
        overlay.dimmed = true;
        overlay.lines.push(TextLine::new("Paused...", mid, 40.0));
    }
    overlay
}

/// Paint the scene overlay into whatever frame `ctx` is running; sizes are in points
pub fn draw_scene(ctx: &Context, game: &SceneController, width: f32, height: f32) {
    let overlay = overlay_for(game, height);
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, egui::Id::new("scene_text")));
    if overlay.dimmed {
        painter.rect_filled(
            egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(width, height)),
            0.0,
            Color32::from_black_alpha(128),
        );
    }
    let centre = width / 2.0;
    for line in &overlay.lines {
        painter.text(
            Pos2::new(centre, line.y),
            Align2::CENTER_BOTTOM,
            &line.text,
            FontId::monospace(line.size),
            Color32::WHITE,
        );
    }
}

/// Build the complete UI from a synthetic input (browser builds feed no events to egui)
pub fn build_ui(
    egui_ctx: &Context,
    game: &SceneController,
    canvas_width: u32,
    canvas_height: u32,
    now: f64,
) -> egui::FullOutput {
    let mut raw_input = egui::RawInput::default();
    raw_input.time = Some(now / 1000.0);
    raw_input.screen_rect = Some(egui::Rect::from_min_size(
        Pos2::new(0.0, 0.0),
        egui::vec2(canvas_width as f32, canvas_height as f32),
    ));

    egui_ctx.run(raw_input, |ctx| {
        draw_scene(ctx, game, canvas_width as f32, canvas_height as f32);
    })
}
