//! Immediate-mode layout boxes and the main menu

use glam::Vec2;

use crate::Rect;
use crate::consts::Z_HUD;
use crate::platform::{InputSource, Key};
use crate::renderer::{Color, DrawList};
use crate::resources::{Resources, names};

/// Layout box in screen units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl View {
    /// Root box at an absolute position
    pub fn push(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Child box offset from `parent`. A zero (or negative) size inherits the
    /// parent's; the result never exceeds the parent's size.
    pub fn push_from(parent: View, x: f32, y: f32, width: f32, height: f32) -> Self {
        let width = if width > 0.0 { width } else { parent.width };
        let height = if height > 0.0 { height } else { parent.height };
        Self {
            x: parent.x + x,
            y: parent.y + y,
            width: width.min(parent.width),
            height: height.min(parent.height),
        }
    }

    /// Zero-sized anchor for a run of text
    pub fn push_text(parent: View, x: f32, y: f32) -> Self {
        Self {
            x: parent.x + x,
            y: parent.y + y,
            width: 0.0_f32.min(parent.width),
            height: 0.0_f32.min(parent.height),
        }
    }

    /// Box of the given size centered in `parent`
    pub fn push_centered(parent: View, width: f32, height: f32) -> Self {
        Self {
            x: parent.x + parent.width * 0.5 - width * 0.5,
            y: parent.y + parent.height * 0.5 - height * 0.5,
            width,
            height,
        }
    }

    /// Inset the top-left corner by `padding`; the far edges shrink by
    /// `padding + align`
    pub fn add_padding(&mut self, padding: f32, align: f32) {
        self.x += padding;
        self.y += padding;
        self.width -= padding + align;
        self.height -= padding + align;
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Quit,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Play => "Play",
            MenuAction::Quit => "Quit",
        }
    }
}

const TITLE: &str = "BRICKBREAK";
const TITLE_SIZE: f32 = 96.0;
const ENTRY_SIZE: f32 = 48.0;
const ENTRY_SPACING: f32 = 72.0;

/// Vertical list of actions with one selected
#[derive(Debug, Clone)]
pub struct Menu {
    entries: Vec<MenuAction>,
    selected: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            entries: vec![MenuAction::Play, MenuAction::Quit],
            selected: 0,
        }
    }

    pub fn selected(&self) -> MenuAction {
        self.entries[self.selected]
    }

    /// Back to the first entry
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Move the selection (wrapping) and report an activated entry
    pub fn tick(&mut self, input: &dyn InputSource) -> Option<MenuAction> {
        let count = self.entries.len();
        if input.is_key_pressed(Key::Up) {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.is_key_pressed(Key::Down) {
            self.selected = (self.selected + 1) % count;
        }
        input.is_key_pressed(Key::Confirm).then(|| self.selected())
    }

    pub fn draw(&self, screen: View, resources: &Resources, draw: &mut DrawList) {
        let Some(font) = resources.font_index(names::FONT) else {
            log::trace!("menu skipped: no font");
            return;
        };

        let mut panel = View::push_centered(screen, screen.width * 0.5, screen.height * 0.6);
        panel.add_padding(24.0, 24.0);

        let title = View::push_text(panel, 0.0, 0.0);
        draw.submit_text(title.position(), font, TITLE, TITLE_SIZE, 2.0, Z_HUD, Color::WHITE);

        let list = View::push_from(panel, 0.0, TITLE_SIZE * 2.0, 0.0, 0.0);
        for (i, action) in self.entries.iter().enumerate() {
            let anchor = View::push_text(list, 0.0, i as f32 * ENTRY_SPACING);
            let color = if i == self.selected {
                Color::GOLD
            } else {
                Color::LIGHT_GRAY
            };
            draw.submit_text(anchor.position(), font, action.label(), ENTRY_SIZE, 1.0, Z_HUD, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::KeyState;
    use crate::renderer::DrawSource;
    use crate::resources::Font;

    #[test]
    fn test_push_from_inherits_and_clamps() {
        let root = View::push(0.0, 0.0, 100.0, 50.0);
        let child = View::push_from(root, 10.0, 5.0, 0.0, 20.0);
        assert_eq!(child, View::push(10.0, 5.0, 100.0, 20.0));

        let wide = View::push_from(root, 0.0, 0.0, 500.0, 500.0);
        assert_eq!((wide.width, wide.height), (100.0, 50.0));
    }

    #[test]
    fn test_push_text_is_zero_sized() {
        let root = View::push(20.0, 30.0, 100.0, 50.0);
        let text = View::push_text(root, 5.0, 5.0);
        assert_eq!(text, View::push(25.0, 35.0, 0.0, 0.0));
    }

    #[test]
    fn test_push_centered() {
        let root = View::push(0.0, 0.0, 1920.0, 1080.0);
        let centered = View::push_centered(root, 200.0, 100.0);
        assert_eq!(centered, View::push(860.0, 490.0, 200.0, 100.0));
    }

    #[test]
    fn test_add_padding() {
        let mut view = View::push(0.0, 0.0, 100.0, 100.0);
        view.add_padding(10.0, 10.0);
        assert_eq!(view, View::push(10.0, 10.0, 80.0, 80.0));
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut menu = Menu::new();
        let mut keys = KeyState::new();

        keys.press(Key::Up);
        assert_eq!(menu.tick(&keys), None);
        assert_eq!(menu.selected(), MenuAction::Quit);
        keys.end_frame();
        keys.release(Key::Up);
        keys.end_frame();

        keys.press(Key::Down);
        menu.tick(&keys);
        assert_eq!(menu.selected(), MenuAction::Play);
    }

    #[test]
    fn test_menu_confirm_activates_selection() {
        let mut menu = Menu::new();
        let mut keys = KeyState::new();
        keys.press(Key::Down);
        keys.press(Key::Confirm);
        assert_eq!(menu.tick(&keys), Some(MenuAction::Quit));
    }

    #[test]
    fn test_menu_draw_highlights_selection() {
        let mut resources = Resources::new();
        resources.add_font(names::FONT, Font { id: 0, base_size: 48 });
        let mut draw = DrawList::new(1024);
        let menu = Menu::new();
        menu.draw(View::push(0.0, 0.0, 1920.0, 1080.0), &resources, &mut draw);

        let labels: Vec<_> = draw
            .texts()
            .iter()
            .filter_map(|item| match &item.source {
                DrawSource::Text { text, .. } => Some((text.as_str(), item.color)),
                DrawSource::Texture { .. } => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                (TITLE, Color::WHITE),
                ("Play", Color::GOLD),
                ("Quit", Color::LIGHT_GRAY)
            ]
        );
    }

    #[test]
    fn test_menu_without_font_draws_nothing() {
        let mut draw = DrawList::new(1024);
        Menu::new().draw(View::push(0.0, 0.0, 100.0, 100.0), &Resources::new(), &mut draw);
        assert!(draw.is_empty());
    }
}
