//! Scene switching for the front end.
//!
//! The machine owns the flock while a flock scene is live. Pausing or asking
//! to quit moves the flock into the overlay scene, so resuming continues the
//! same flock instead of spawning a new one.

use std::mem;

use boid_core::{BoidError, FlockStd};
use boid_shared::SceneSettings;

use crate::menu::{Menu, MenuAction};

/// Seconds after entering the start menu during which clicks are ignored.
pub const BUTTON_DELAY: f64 = 0.15;

pub enum Scene {
    Start { elapsed: f64 },
    Boids(FlockStd),
    Pause(FlockStd),
    CheckExit(FlockStd),
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Start,
    Boids,
    Pause,
    CheckExit,
    Terminated,
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Start { .. } => SceneKind::Start,
            Scene::Boids(_) => SceneKind::Boids,
            Scene::Pause(_) => SceneKind::Pause,
            Scene::CheckExit(_) => SceneKind::CheckExit,
            Scene::Terminated => SceneKind::Terminated,
        }
    }
}

pub struct SceneMachine {
    scene: Scene,
    settings: SceneSettings,
    width: f64,
    height: f64,
}

impl SceneMachine {
    pub fn new(settings: SceneSettings, width: f64, height: f64) -> Self {
        Self {
            scene: Scene::Start { elapsed: 0.0 },
            settings,
            width,
            height,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.scene, Scene::Terminated)
    }

    /// The live flock, if the current scene has one.
    pub fn flock(&self) -> Option<&FlockStd> {
        match &self.scene {
            Scene::Boids(flock) | Scene::Pause(flock) | Scene::CheckExit(flock) => Some(flock),
            Scene::Start { .. } | Scene::Terminated => None,
        }
    }

    /// Buttons shown by the current scene.
    pub fn menu(&self) -> Option<Menu> {
        match self.scene {
            Scene::Start { .. } => Some(Menu::start(self.width, self.height)),
            Scene::Pause(_) => Some(Menu::pause(self.width, self.height)),
            Scene::CheckExit(_) => Some(Menu::check_exit(self.width, self.height)),
            Scene::Boids(_) | Scene::Terminated => None,
        }
    }

    /// Advances the current scene by `dt` seconds. Only the flock scene
    /// ticks its flock; overlays freeze it.
    ///
    /// Returns `false` once the machine has terminated.
    pub fn update(&mut self, dt: f64) -> Result<bool, BoidError> {
        match &mut self.scene {
            Scene::Start { elapsed } => *elapsed += dt,
            Scene::Boids(flock) => flock.tick()?,
            Scene::Pause(_) | Scene::CheckExit(_) => {}
            Scene::Terminated => return Ok(false),
        }
        Ok(true)
    }

    /// Handles a key press. `p` toggles pause, `Escape` counts as a quit
    /// request.
    pub fn key_down(&mut self, key: &str) {
        match key {
            "p" | "P" => self.toggle_pause(),
            "Escape" => self.quit_requested(),
            _ => {}
        }
    }

    fn toggle_pause(&mut self) {
        self.scene = match mem::replace(&mut self.scene, Scene::Terminated) {
            Scene::Boids(flock) => Scene::Pause(flock),
            Scene::Pause(flock) => Scene::Boids(flock),
            other => other,
        };
    }

    /// A quit request (window close or Escape). The flock scene asks for
    /// confirmation, the confirmation prompt backs out to the flock, pause
    /// returns to the start menu and the start menu terminates.
    pub fn quit_requested(&mut self) {
        self.scene = match mem::replace(&mut self.scene, Scene::Terminated) {
            Scene::Boids(flock) => Scene::CheckExit(flock),
            Scene::CheckExit(flock) => Scene::Boids(flock),
            Scene::Pause(_) => Scene::Start { elapsed: 0.0 },
            Scene::Start { .. } | Scene::Terminated => Scene::Terminated,
        };
    }

    /// Clicks whatever button sits under `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) -> Result<Option<MenuAction>, BoidError> {
        if let Scene::Start { elapsed } = self.scene {
            if elapsed <= BUTTON_DELAY {
                return Ok(None);
            }
        }
        let Some(action) = self.menu().and_then(|menu| menu.hit(x, y)) else {
            return Ok(None);
        };
        self.apply(action)?;
        Ok(Some(action))
    }

    fn apply(&mut self, action: MenuAction) -> Result<(), BoidError> {
        if action == MenuAction::StartBoids {
            // Build first so a bad configuration leaves the menu in place.
            let flock = self.settings.build_flock()?;
            self.scene = Scene::Boids(flock);
            return Ok(());
        }

        self.scene = match (mem::replace(&mut self.scene, Scene::Terminated), action) {
            (Scene::Start { .. }, MenuAction::Quit) => Scene::Terminated,
            (Scene::Pause(flock), MenuAction::Resume) => Scene::Boids(flock),
            (Scene::Pause(_), MenuAction::ToStart) => Scene::Start { elapsed: 0.0 },
            (Scene::CheckExit(_), MenuAction::ConfirmExit) => Scene::Start { elapsed: 0.0 },
            (Scene::CheckExit(flock), MenuAction::CancelExit) => Scene::Boids(flock),
            (scene, _) => scene,
        };
        Ok(())
    }
}
