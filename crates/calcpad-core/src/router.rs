//! Per-frame hover and click dispatch.

use kurbo::Point;

use crate::layout::KeyAction;
use crate::page::Page;
use crate::widget::{KeyId, Widget};

/// What a click asked for. Returned to the embedding application every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Insert { text: String },
    Function { name: String },
    Delete,
    Clear,
    Evaluate,
    TogglePage,
    SelectMode { group: String, key: KeyId },
}

impl KeyCommand {
    /// Command for a click on `widget`, if its action produces one.
    pub fn for_widget(widget: &Widget) -> Option<Self> {
        let command = match &widget.action {
            KeyAction::Insert { text } => Self::Insert { text: text.clone() },
            KeyAction::Function { name } => Self::Function { name: name.clone() },
            KeyAction::Delete => Self::Delete,
            KeyAction::Clear => Self::Clear,
            KeyAction::Evaluate => Self::Evaluate,
            KeyAction::TogglePage => Self::TogglePage,
            KeyAction::Mode { group } => Self::SelectMode {
                group: group.clone(),
                key: widget.key().clone(),
            },
            KeyAction::Inert => return None,
        };
        Some(command)
    }
}

/// Routes the virtual pointer to the visible keys.
///
/// The router only remembers whether the pointer was down on the previous
/// frame; a click is the rising edge of that signal over a key.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    was_down: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down state seen on the previous frame.
    pub fn was_down(&self) -> bool {
        self.was_down
    }

    /// Update every key of `pages` for this frame and collect click commands.
    ///
    /// `pointer` is in virtual coordinates and is used for both hover and
    /// click. Each key yields at most one command.
    pub fn route<'a>(
        &mut self,
        pointer: Point,
        pointer_down: bool,
        dt: f64,
        highlight_rate: f64,
        pages: impl IntoIterator<Item = &'a mut Page>,
    ) -> Vec<KeyCommand> {
        let mut commands = Vec::new();
        for page in pages {
            for widget in page.iter_mut() {
                let hovered = widget.hit_test(pointer);
                widget.update(pointer_down, hovered, dt, highlight_rate);
                if Widget::is_clicked(pointer_down, self.was_down, hovered) {
                    log::trace!("Key {} clicked", widget.key());
                    commands.extend(KeyCommand::for_widget(widget));
                }
            }
        }
        self.was_down = pointer_down;
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    const DT: f64 = 1.0 / 60.0;

    fn keypad_page() -> Page {
        let mut page = Page::new();
        let mut seven = Widget::new("7", "7", Point::new(88.0, 700.0), Size::new(125.0, 125.0));
        seven.action = KeyAction::Insert { text: "7".to_string() };
        page.insert(seven).unwrap();

        let mut deg = Widget::new("DEG", "DEG", Point::new(443.0, 265.0), Size::new(100.0, 60.0));
        deg.action = KeyAction::Mode { group: "angle".to_string() };
        page.insert(deg).unwrap();

        page.insert(Widget::new("blank", "", Point::new(238.0, 700.0), Size::new(125.0, 125.0)))
            .unwrap();
        page
    }

    #[test]
    fn test_single_click_per_press() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();
        let over = Point::new(150.0, 760.0);

        let mut clicks = 0;
        for down in [false, true, true, true, false] {
            clicks += router.route(over, down, DT, 600.0, [&mut page]).len();
        }
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_click_outside_does_nothing() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();
        router.route(Point::new(10.0, 10.0), false, DT, 600.0, [&mut page]);
        let commands = router.route(Point::new(10.0, 10.0), true, DT, 600.0, [&mut page]);
        assert!(commands.is_empty());
        assert!(router.was_down());
    }

    #[test]
    fn test_press_then_drag_onto_key_is_not_a_click() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();
        router.route(Point::new(10.0, 10.0), true, DT, 600.0, [&mut page]);
        let commands = router.route(Point::new(150.0, 760.0), true, DT, 600.0, [&mut page]);
        assert!(commands.is_empty());
        assert!(page.get("7").unwrap().is_pressed());
    }

    #[test]
    fn test_commands_follow_actions() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();

        let commands = router.route(Point::new(150.0, 760.0), true, DT, 600.0, [&mut page]);
        assert_eq!(commands, vec![KeyCommand::Insert { text: "7".to_string() }]);
        router.route(Point::new(150.0, 760.0), false, DT, 600.0, [&mut page]);

        let commands = router.route(Point::new(490.0, 290.0), true, DT, 600.0, [&mut page]);
        assert_eq!(
            commands,
            vec![KeyCommand::SelectMode {
                group: "angle".to_string(),
                key: KeyId::from("DEG"),
            }]
        );
    }

    #[test]
    fn test_inert_key_emits_nothing() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();
        let commands = router.route(Point::new(300.0, 760.0), true, DT, 600.0, [&mut page]);
        assert!(commands.is_empty());
        assert!(page.get("blank").unwrap().is_pressed());
    }

    #[test]
    fn test_hover_tracks_pointer() {
        let mut page = keypad_page();
        let mut router = InputRouter::new();
        router.route(Point::new(150.0, 760.0), false, DT, 600.0, [&mut page]);
        assert!(page.get("7").unwrap().is_hovered());
        assert!(!page.get("DEG").unwrap().is_hovered());

        router.route(Point::new(10.0, 10.0), false, DT, 600.0, [&mut page]);
        assert!(!page.get("7").unwrap().is_hovered());
    }
}
