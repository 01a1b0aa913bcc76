//! The keypad: pages, mode groups, transition and input routing in one place.

use kurbo::{Point, Size};
use peniko::Color;

use crate::config::KeypadConfig;
use crate::draw::DrawList;
use crate::error::KeypadResult;
use crate::group::ModeGroups;
use crate::input::FrameInput;
use crate::layout::{KeyAction, LayoutSpec, PANEL_RECT, Placement};
use crate::page::{Page, PageId, PageSet};
use crate::router::{InputRouter, KeyCommand};
use crate::transition::PageTransition;
use crate::viewport::ViewportTransform;
use crate::widget::{KeyId, Widget, WidgetState};

/// Corner roundness of the panel behind the keys.
const PANEL_ROUNDNESS: f64 = 0.1;

/// Result of running one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Commands for the embedding application, in draw order of the clicked keys.
    pub commands: Vec<KeyCommand>,
    /// Everything to draw this frame, in virtual coordinates.
    pub draw: DrawList,
}

/// A complete keypad built from a layout table.
#[derive(Debug, Clone)]
pub struct Keypad {
    config: KeypadConfig,
    pages: PageSet,
    fixed: Page,
    groups: ModeGroups,
    transition: PageTransition,
    router: InputRouter,
    viewport: ViewportTransform,
}

impl Keypad {
    /// Build a keypad from `layout`. The layout is validated first.
    pub fn new(config: KeypadConfig, layout: &LayoutSpec) -> KeypadResult<Self> {
        layout.validate(config.virtual_size)?;

        let mut pages = PageSet::default();
        let mut fixed = Page::new();
        let mut groups = ModeGroups::new();

        for spec in &layout.widgets {
            let widget = Widget::from_spec(spec);
            match spec.placement {
                Placement::Page(id) => pages.get_mut(id).insert(widget)?,
                Placement::Fixed => {
                    if let KeyAction::Mode { group } = &spec.action {
                        groups.entry(group).add_member(spec.key.clone());
                    }
                    fixed.insert(widget)?;
                }
            }
        }

        // A layout may mark several members active; keep the first.
        for group in groups.iter() {
            if let Some(key) = group.active_key(&fixed) {
                group.activate(key.as_str(), &mut fixed)?;
            }
        }

        log::info!(
            "Keypad built: {} base keys, {} extended keys, {} fixed keys, {} mode groups",
            pages.base.len(),
            pages.extended.len(),
            fixed.len(),
            groups.iter().count()
        );

        let transition = PageTransition::new(PageId::Base, config.transition_rate);
        let viewport = ViewportTransform::new(config.virtual_size, Size::ZERO);

        Ok(Self {
            config,
            pages,
            fixed,
            groups,
            transition,
            router: InputRouter::new(),
            viewport,
        })
    }

    /// Build the built-in calculator keypad.
    pub fn calculator(config: KeypadConfig) -> KeypadResult<Self> {
        Self::new(config, &LayoutSpec::calculator())
    }

    pub fn config(&self) -> &KeypadConfig {
        &self.config
    }

    /// Transform computed on the last frame.
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn transition(&self) -> &PageTransition {
        &self.transition
    }

    pub fn active_page(&self) -> PageId {
        self.transition.active_page()
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    /// Always-visible keys.
    pub fn fixed(&self) -> &Page {
        &self.fixed
    }

    pub fn groups(&self) -> &ModeGroups {
        &self.groups
    }

    /// Look a key up on any page.
    pub fn widget(&self, key: &str) -> Option<&Widget> {
        self.fixed
            .get(key)
            .or_else(|| self.pages.base.get(key))
            .or_else(|| self.pages.extended.get(key))
    }

    /// The active key of mode group `group`.
    pub fn active_mode(&self, group: &str) -> Option<&KeyId> {
        self.groups.active_key(group, &self.fixed)
    }

    /// Activate `key` in mode group `group`.
    pub fn select_mode(&mut self, group: &str, key: &str) -> KeypadResult<()> {
        self.groups.activate(group, key, &mut self.fixed)
    }

    /// Start switching pages. Returns false if a switch is already running.
    pub fn toggle_page(&mut self) -> bool {
        self.transition.trigger()
    }

    /// Run one frame: route the pointer, apply keypad-level commands, step
    /// the page transition and produce the draw list.
    pub fn frame(&mut self, input: &FrameInput) -> FrameOutput {
        self.viewport = ViewportTransform::new(self.config.virtual_size, input.window_size);
        let pointer = self.viewport.to_virtual(input.pointer);
        let dt = self.clamp_dt(input.dt);

        let active = self.pages.get_mut(self.transition.active_page());
        let commands = self.router.route(
            pointer,
            input.pointer_down,
            dt,
            self.config.highlight_rate,
            [active, &mut self.fixed],
        );

        for command in &commands {
            self.apply(command);
        }
        self.transition.advance(&mut self.pages, dt);

        FrameOutput {
            commands,
            draw: self.draw_list(),
        }
    }

    fn clamp_dt(&self, dt: f64) -> f64 {
        if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_time)
        } else {
            0.0
        }
    }

    fn apply(&mut self, command: &KeyCommand) {
        match command {
            KeyCommand::TogglePage => {
                self.transition.trigger();
            }
            KeyCommand::SelectMode { group, key } => {
                if let Err(e) = self.select_mode(group, key.as_str()) {
                    log::warn!("Mode change rejected: {}", e);
                }
            }
            _ => {}
        }
    }

    /// Draw commands for the current state: panel, then the active page, then
    /// the always-visible keys.
    pub fn draw_list(&self) -> DrawList {
        let mut list = DrawList::new();
        let palette = &self.config.palette;
        let radius = PANEL_ROUNDNESS * PANEL_RECT.width().min(PANEL_RECT.height()) * 0.5;
        list.rounded_rect(PANEL_RECT, radius, palette.panel.into());

        let page_labels = self.transition.labels_visible();
        for widget in self.pages.get(self.transition.active_page()).iter() {
            self.draw_widget(&mut list, widget, page_labels);
        }
        for widget in self.fixed.iter() {
            self.draw_widget(&mut list, widget, true);
        }
        list
    }

    fn draw_widget(&self, list: &mut DrawList, widget: &Widget, show_label: bool) {
        if !widget.has_area() {
            return;
        }
        let palette = &self.config.palette;
        let state = widget.state();
        let fill: Color = if state == WidgetState::Active {
            palette.active.into()
        } else if state.is_hovered() {
            palette.hovered.into()
        } else {
            palette.idle.into()
        };

        let rect = widget.render_rect(self.config.press_inset);
        list.rounded_rect(rect, widget.corner_radius(rect), fill);

        let highlight = widget.highlight();
        if highlight.is_visible() {
            let rect = highlight.rect().intersect(rect);
            list.rounded_rect(rect, widget.corner_radius(rect), palette.highlight.into());
        }

        if show_label && !widget.label.is_empty() {
            list.text(
                widget.label.clone(),
                widget.bounds(),
                widget.font,
                widget.render_label_size(self.config.press_label_scale),
                palette.label.into(),
            );
        }
    }

    /// Virtual position of a physical pointer under the last frame's transform.
    pub fn to_virtual(&self, physical: Point) -> Point {
        self.viewport.to_virtual(physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::input::{InputState, MouseButton, PointerEvent};
    use crate::layout::{ANGLE_GROUP, TRIG_GROUP};
    use crate::transition::TransitionState;

    const DT: f64 = 1.0 / 60.0;
    const WINDOW: Size = Size::new(750.0, 1200.0);

    fn keypad() -> Keypad {
        Keypad::calculator(KeypadConfig::default()).unwrap()
    }

    fn center_of(keypad: &Keypad, key: &str) -> Point {
        keypad.widget(key).unwrap().bounds().center()
    }

    /// Press and release at a virtual point under a 1:1 window.
    fn click(keypad: &mut Keypad, at: Point) -> Vec<KeyCommand> {
        let mut commands = keypad.frame(&FrameInput::new(WINDOW, at, false, DT)).commands;
        commands.extend(keypad.frame(&FrameInput::new(WINDOW, at, true, DT)).commands);
        commands.extend(keypad.frame(&FrameInput::new(WINDOW, at, false, DT)).commands);
        commands
    }

    fn run_until_idle(keypad: &mut Keypad) -> usize {
        let mut frames = 0;
        while keypad.transition().is_busy() {
            keypad.frame(&FrameInput::new(WINDOW, Point::ZERO, false, DT));
            frames += 1;
            assert!(frames < 1000);
        }
        frames
    }

    #[test]
    fn test_initial_state() {
        let keypad = keypad();
        assert_eq!(keypad.active_page(), PageId::Base);
        assert_eq!(keypad.active_mode(TRIG_GROUP).map(KeyId::as_str), Some("BASE"));
        assert_eq!(keypad.active_mode(ANGLE_GROUP).map(KeyId::as_str), Some("DEG"));
        assert!(keypad.widget("equals").unwrap().is_active());
    }

    #[test]
    fn test_click_digit_emits_insert() {
        let mut keypad = keypad();
        let at = center_of(&keypad, "7");
        let commands = click(&mut keypad, at);
        assert_eq!(commands, vec![KeyCommand::Insert { text: "7".to_string() }]);
    }

    #[test]
    fn test_click_through_letterbox() {
        let mut keypad = keypad();
        let window = Size::new(1500.0, 1200.0);
        let physical = center_of(&keypad, "7") + kurbo::Vec2::new(375.0, 0.0);

        keypad.frame(&FrameInput::new(window, physical, false, DT));
        let out = keypad.frame(&FrameInput::new(window, physical, true, DT));
        assert_eq!(out.commands, vec![KeyCommand::Insert { text: "7".to_string() }]);
        assert!((keypad.viewport().offset.x - 375.0).abs() < 1e-9);
    }

    #[test]
    fn test_equals_emits_evaluate_only() {
        let mut keypad = keypad();
        let at = center_of(&keypad, "equals");
        assert_eq!(click(&mut keypad, at), vec![KeyCommand::Evaluate]);
        assert!(keypad.widget("equals").unwrap().is_active());
    }

    #[test]
    fn test_more_switches_pages() {
        let mut keypad = keypad();
        let at = center_of(&keypad, "more");
        keypad.frame(&FrameInput::new(WINDOW, at, false, DT));
        let out = keypad.frame(&FrameInput::new(WINDOW, at, true, DT));
        assert_eq!(out.commands, vec![KeyCommand::TogglePage]);
        assert_eq!(keypad.transition().state(), TransitionState::Shrinking);

        run_until_idle(&mut keypad);
        assert_eq!(keypad.active_page(), PageId::Extended);
        assert!(keypad.pages().extended.all_expanded());

        let at = center_of(&keypad, "sin");
        let commands = click(&mut keypad, at);
        assert_eq!(commands, vec![KeyCommand::Function { name: "sin".to_string() }]);
    }

    #[test]
    fn test_page_labels_hidden_during_transition() {
        let mut keypad = keypad();
        let labels: Vec<String> = keypad.draw_list().texts().map(str::to_string).collect();
        assert!(labels.iter().any(|l| l == "7"));

        keypad.toggle_page();
        let out = keypad.frame(&FrameInput::new(WINDOW, Point::ZERO, false, DT));
        let labels: Vec<&str> = out.draw.texts().collect();
        assert!(!labels.contains(&"7"));
        assert!(!labels.contains(&"sin"));
        assert!(labels.contains(&"more"));
    }

    #[test]
    fn test_hidden_page_is_not_interactive() {
        let mut keypad = keypad();
        let sin = center_of(&keypad, "sin");
        let commands = click(&mut keypad, sin);
        // "1" sits where "sin" would be.
        assert_eq!(commands, vec![KeyCommand::Insert { text: "1".to_string() }]);
    }

    #[test]
    fn test_mode_selection() {
        let mut keypad = keypad();
        let at = center_of(&keypad, "RAD");
        let commands = click(&mut keypad, at);
        assert_eq!(
            commands,
            vec![KeyCommand::SelectMode {
                group: ANGLE_GROUP.to_string(),
                key: KeyId::from("RAD"),
            }]
        );
        assert_eq!(keypad.active_mode(ANGLE_GROUP).map(KeyId::as_str), Some("RAD"));
        assert!(!keypad.widget("DEG").unwrap().is_active());
        assert_eq!(keypad.active_mode(TRIG_GROUP).map(KeyId::as_str), Some("BASE"));
    }

    #[test]
    fn test_select_mode_outside_group_fails() {
        let mut keypad = keypad();
        assert!(keypad.select_mode(TRIG_GROUP, "RAD").is_err());
        assert_eq!(keypad.active_mode(TRIG_GROUP).map(KeyId::as_str), Some("BASE"));
        assert_eq!(keypad.active_mode(ANGLE_GROUP).map(KeyId::as_str), Some("DEG"));
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut keypad = keypad();
        keypad.toggle_page();
        keypad.frame(&FrameInput::new(WINDOW, Point::ZERO, false, 10.0));
        assert_eq!(keypad.transition().state(), TransitionState::Expanding);
        keypad.frame(&FrameInput::new(WINDOW, Point::ZERO, false, 10.0));
        assert_eq!(keypad.transition().state(), TransitionState::Idle);
        assert_eq!(keypad.active_page(), PageId::Extended);
    }

    #[test]
    fn test_full_switch_frame_count() {
        let mut keypad = keypad();
        keypad.toggle_page();
        let frames = run_until_idle(&mut keypad);
        let rate = keypad.config().transition_rate;
        assert_eq!(frames, (125.0 / (rate * DT)).ceil() as usize * 2);
    }

    #[test]
    fn test_minimized_window() {
        let mut keypad = keypad();
        let out = keypad.frame(&FrameInput::new(Size::ZERO, Point::new(300.0, 300.0), true, DT));
        assert!(out.commands.is_empty());
        assert!(keypad.viewport().scale.abs() < f64::EPSILON);
    }

    #[test]
    fn test_draw_list_starts_with_panel() {
        let keypad = keypad();
        let list = keypad.draw_list();
        match &list.commands()[0] {
            DrawCommand::RoundedRect { rect, radius, .. } => {
                assert_eq!(*rect, PANEL_RECT);
                assert!((radius - 32.5).abs() < 1e-9);
            }
            other => panic!("expected panel, got {other:?}"),
        }
    }

    #[test]
    fn test_pressed_key_is_inset() {
        let mut keypad = keypad();
        let at = center_of(&keypad, "5");
        keypad.frame(&FrameInput::new(WINDOW, at, false, DT));
        keypad.frame(&FrameInput::new(WINDOW, at, true, DT));

        let widget = keypad.widget("5").unwrap();
        let rect = widget.render_rect(keypad.config().press_inset);
        assert!((rect.width() - (125.0 - 12.0)).abs() < 1e-9);
        assert!((widget.size().width - 125.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tap_between_frames_clicks_once() {
        let mut keypad = keypad();
        let mut input = InputState::new(WINDOW);
        let at = center_of(&keypad, "7");

        input.handle_pointer_event(PointerEvent::Move { position: at });
        assert!(keypad.frame(&input.frame(DT)).commands.is_empty());

        input.handle_pointer_event(PointerEvent::Down {
            position: at,
            button: MouseButton::Left,
        });
        input.handle_pointer_event(PointerEvent::Up {
            position: at,
            button: MouseButton::Left,
        });
        let commands = keypad.frame(&input.frame(DT)).commands;
        assert_eq!(commands, vec![KeyCommand::Insert { text: "7".to_string() }]);
        assert!(keypad.frame(&input.frame(DT)).commands.is_empty());
    }

    #[test]
    fn test_layout_with_several_active_modes_keeps_first() {
        let mut layout = LayoutSpec::calculator();
        for spec in layout.widgets.iter_mut() {
            if spec.key.as_str() == "INV" || spec.key.as_str() == "HYP" {
                spec.active = true;
            }
        }
        let keypad = Keypad::new(KeypadConfig::default(), &layout).unwrap();

        let trig = keypad.groups().get(TRIG_GROUP).unwrap();
        let active = trig
            .members()
            .iter()
            .filter(|k| keypad.widget(k.as_str()).is_some_and(Widget::is_active))
            .count();
        assert_eq!(active, 1);
        assert_eq!(keypad.active_mode(TRIG_GROUP).map(KeyId::as_str), Some("BASE"));
        assert_eq!(keypad.active_mode(ANGLE_GROUP).map(KeyId::as_str), Some("DEG"));
    }
}
