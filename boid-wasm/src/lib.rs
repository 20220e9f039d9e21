pub mod menu;
pub mod scene;

use boid_core::{Boid, BoidError, Bounds};
use boid_shared::SceneSettings;
use menu::Menu;
use scene::{SceneKind, SceneMachine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

const BOID_SIZE: f64 = 5.0;
const OVERLAY_COLOR: &str = "rgba(255, 255, 255, 0.7)";
const BUTTON_COLOR: &str = "#000000";
const BUTTON_ACTIVE_COLOR: &str = "#ff0000";

fn to_js(err: BoidError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser front end: owns the scene machine and draws it on a canvas.
/// The page drives it from `requestAnimationFrame` and forwards input.
#[wasm_bindgen]
pub struct BoidApp {
    machine: SceneMachine,
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    pointer: (f64, f64),
}

#[wasm_bindgen]
impl BoidApp {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, width: f64, height: f64) -> Result<BoidApp, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        // The flock fills the canvas; depth keeps its default range.
        let mut settings = SceneSettings::default();
        settings.bounds.x = [0.0, width];
        settings.bounds.y = [0.0, height];
        settings.validate().map_err(to_js)?;

        console_log!(
            "Initializing boid app on {}x{} canvas with {} boids",
            width,
            height,
            settings.boid_count
        );

        Ok(BoidApp {
            machine: SceneMachine::new(settings, width, height),
            context,
            width,
            height,
            pointer: (-1.0, -1.0),
        })
    }

    /// Advances the current scene by `dt` seconds and redraws it.
    /// Returns `false` once the app has terminated.
    pub fn frame(&mut self, dt: f64) -> Result<bool, JsValue> {
        let running = self.machine.update(dt).map_err(to_js)?;
        if running {
            self.render()?;
        }
        Ok(running)
    }

    pub fn key_down(&mut self, key: &str) {
        let before = self.machine.kind();
        self.machine.key_down(key);
        self.log_transition(before);
    }

    /// Window close or back navigation.
    pub fn quit_requested(&mut self) {
        let before = self.machine.kind();
        self.machine.quit_requested();
        self.log_transition(before);
    }

    pub fn mouse_move(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
    }

    pub fn mouse_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.pointer = (x, y);
        let before = self.machine.kind();
        if let Some(action) = self.machine.click(x, y).map_err(to_js)? {
            console_log!("Clicked {:?}", action);
        }
        self.log_transition(before);
        Ok(())
    }

    pub fn scene_name(&self) -> String {
        format!("{:?}", self.machine.kind())
    }

    pub fn boid_count(&self) -> usize {
        self.machine.flock().map_or(0, |flock| flock.len())
    }
}

impl BoidApp {
    fn log_transition(&self, before: SceneKind) {
        let after = self.machine.kind();
        if after != before {
            console_log!("Scene {:?} -> {:?}", before, after);
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        match self.machine.kind() {
            SceneKind::Start => {
                self.context.set_fill_style_str("#ffffff");
                self.context.fill_rect(0.0, 0.0, self.width, self.height);
            }
            SceneKind::Boids => self.draw_flock()?,
            SceneKind::Pause => {
                self.draw_flock()?;
                self.draw_overlay("PAUSED")?;
            }
            SceneKind::CheckExit => {
                self.draw_flock()?;
                self.draw_overlay("Quit without saving?")?;
            }
            SceneKind::Terminated => return Ok(()),
        }

        if let Some(menu) = self.machine.menu() {
            self.draw_menu(&menu)?;
        }
        Ok(())
    }

    fn draw_flock(&self) -> Result<(), JsValue> {
        self.context.set_fill_style_str("#000000");
        self.context.fill_rect(0.0, 0.0, self.width, self.height);

        if let Some(flock) = self.machine.flock() {
            let bounds = flock.bounds();
            for boid in flock.boids() {
                self.draw_boid(boid, bounds);
            }
        }
        Ok(())
    }

    /// Boids are small squares; depth sets their opacity.
    fn draw_boid(&self, boid: &Boid, bounds: &Bounds) {
        let alpha = bounds.depth_fraction(boid.position.z);
        self.context
            .set_fill_style_str(&format!("rgba(255, 255, 255, {:.3})", alpha));
        self.context.fill_rect(
            boid.position.x - BOID_SIZE / 2.0,
            boid.position.y - BOID_SIZE / 2.0,
            BOID_SIZE,
            BOID_SIZE,
        );
    }

    fn draw_overlay(&self, title: &str) -> Result<(), JsValue> {
        self.context.set_fill_style_str(OVERLAY_COLOR);
        self.context.fill_rect(0.0, 0.0, self.width, self.height);

        self.context.set_fill_style_str("#000000");
        self.context.set_font("25px Arial");
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context.fill_text(title, self.width / 2.0, 50.0)
    }

    fn draw_menu(&self, menu: &Menu) -> Result<(), JsValue> {
        let (px, py) = self.pointer;
        self.context.set_font("bold 20px sans-serif");
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");

        for button in menu.buttons() {
            let color = if button.contains(px, py) {
                BUTTON_ACTIVE_COLOR
            } else {
                BUTTON_COLOR
            };
            self.context.set_fill_style_str(color);
            self.context
                .fill_rect(button.x, button.y, button.width, button.height);

            self.context.set_fill_style_str("#ffffff");
            self.context.fill_text(
                button.label,
                button.x + button.width / 2.0,
                button.y + button.height / 2.0,
            )?;
        }
        Ok(())
    }
}
