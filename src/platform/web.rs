//! Browser glue: canvas 2D surface, DOM HUD and sprite loading

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlImageElement};

use super::HudSink;
use crate::render::{Canvas, Color, SpriteAtlas, sprite_path};
use crate::sim::driver::HudSnapshot;
use crate::sim::events::{GameEvent, GamePhase, Outcome};
use crate::tuning::{Faction, ShipClass, ShipType};

/// [`Canvas`] over a 2D rendering context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Canvas for CanvasSurface {
    type Image = HtmlImageElement;

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x.into(), offset.y.into());
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle.into());
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0).into());
    }

    fn set_fill(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width.into());
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.ctx.set_shadow_blur(blur.into());
        self.ctx.set_shadow_color(&color.css());
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .fill_rect(origin.x.into(), origin.y.into(), size.x.into(), size.y.into());
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x.into(), center.y.into(), radius.max(0.0).into(), 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x.into(), from.y.into());
        self.ctx.line_to(to.x.into(), to.y.into());
        self.ctx.stroke();
    }

    fn draw_image(&mut self, image: &HtmlImageElement, origin: Vec2, size: Vec2) {
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            origin.x.into(),
            origin.y.into(),
            size.x.into(),
            size.y.into(),
        );
    }
}

async fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    JsFuture::from(img.decode()).await?;
    Ok(img)
}

/// Load every ship sprite that exists; the rest fall back to placeholders
pub async fn load_sprites() -> SpriteAtlas<HtmlImageElement> {
    let mut atlas = SpriteAtlas::default();
    for faction in [Faction::Player, Faction::Enemy] {
        for class in ShipClass::ALL {
            let ship_type = ShipType::new(faction, class);
            let path = sprite_path(ship_type);
            match load_image(&path).await {
                Ok(img) => atlas.insert(ship_type, img),
                Err(_) => log::warn!("Failed to load image: {path}"),
            }
        }
    }
    log::info!("Loaded {} ship sprites", atlas.len());
    atlas
}

/// Text of an embedded `<script type="application/json" id=...>` block
pub fn embedded_json(document: &Document, id: &str) -> Option<String> {
    let text = document.get_element_by_id(id)?.text_content()?;
    if text.trim().is_empty() {
        return None;
    }
    log::info!("Using embedded #{id} config");
    Some(text)
}

/// HUD written into DOM elements by id
pub struct DomHud {
    document: Document,
    last: Option<HudSnapshot>,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            last: None,
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn show_phase(&self, phase: GamePhase) {
        self.set_visible("start-screen", phase == GamePhase::Menu);
        self.set_visible("pause-screen", phase == GamePhase::Paused);
        self.set_visible("game-over-screen", matches!(phase, GamePhase::GameOver(_)));
        if let GamePhase::GameOver(outcome) = phase {
            let title = match outcome {
                Outcome::Victory => "VICTORY",
                Outcome::Defeat => "GAME OVER",
            };
            self.set_text("game-over-title", title);
        }
    }
}

impl HudSink for DomHud {
    fn show(&mut self, hud: &HudSnapshot, _events: &[GameEvent]) {
        // DOM writes are slow; skip unchanged frames
        if self.last.as_ref() == Some(hud) {
            return;
        }
        match hud {
            HudSnapshot::Survival {
                phase,
                score,
                wave,
                player_hull,
                player_shield,
                enemy_count,
            } => {
                self.set_text("score", &score.to_string());
                self.set_text("wave", &wave.to_string());
                self.set_text("hull", &format!("{player_hull}%"));
                self.set_text("shield", &format!("{player_shield}%"));
                self.set_text("enemies", &enemy_count.to_string());
                self.set_text("final-score", &score.to_string());
                self.set_text("waves-survived", &wave.saturating_sub(1).to_string());
                self.show_phase(*phase);
            }
            HudSnapshot::Battle {
                phase,
                blue_alive,
                red_alive,
                selected,
            } => {
                self.set_text("blue-count", &blue_alive.to_string());
                self.set_text("red-count", &red_alive.to_string());
                let selected = selected.map(|t| t.class.key()).unwrap_or("-");
                self.set_text("selected-ship", selected);
                self.show_phase(*phase);
            }
        }
        self.last = Some(hud.clone());
    }
}
