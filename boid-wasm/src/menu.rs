//! Menu buttons laid out around the canvas centre.

pub const BUTTON_WIDTH: f64 = 100.0;
pub const BUTTON_HEIGHT: f64 = 30.0;
const BUTTON_SPACING: f64 = 50.0;

/// What a button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartBoids,
    Quit,
    Resume,
    ToStart,
    ConfirmExit,
    CancelExit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub action: MenuAction,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Button {
    /// Edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x <= self.x + self.width && self.y <= y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    buttons: Vec<Button>,
}

impl Menu {
    fn column(width: f64, top: f64, items: &[(&'static str, MenuAction)]) -> Self {
        let left = (width / 2.0).floor() - BUTTON_WIDTH / 2.0;
        let buttons = items
            .iter()
            .enumerate()
            .map(|(i, &(label, action))| Button {
                label,
                action,
                x: left,
                y: top + i as f64 * BUTTON_SPACING,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            })
            .collect();
        Self { buttons }
    }

    pub fn start(width: f64, height: f64) -> Self {
        Self::column(
            width,
            (height / 2.0).floor() - 100.0,
            &[("Boids", MenuAction::StartBoids), ("Quit", MenuAction::Quit)],
        )
    }

    pub fn pause(width: f64, height: f64) -> Self {
        Self::column(
            width,
            (height / 2.0).floor(),
            &[("Resume", MenuAction::Resume), ("Quit", MenuAction::ToStart)],
        )
    }

    pub fn check_exit(width: f64, height: f64) -> Self {
        Self::column(
            width,
            (height / 2.0 - 75.0).floor(),
            &[("Yes", MenuAction::ConfirmExit), ("No", MenuAction::CancelExit)],
        )
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn hit(&self, x: f64, y: f64) -> Option<MenuAction> {
        self.buttons
            .iter()
            .find(|button| button.contains(x, y))
            .map(|button| button.action)
    }
}
