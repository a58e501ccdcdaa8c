//! Keyboard state queries

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Paddle speed modifier
    Boost,
    /// Release the ball
    Launch,
    Up,
    Down,
    /// Activate the selected menu entry
    Confirm,
    /// Leave play back to the menu
    Back,
}

impl Key {
    pub const COUNT: usize = 8;

    pub const ALL: [Key; Key::COUNT] = [
        Key::Left,
        Key::Right,
        Key::Boost,
        Key::Launch,
        Key::Up,
        Key::Down,
        Key::Confirm,
        Key::Back,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Source of key state for one tick
pub trait InputSource {
    /// Key is held this tick
    fn is_key_down(&self, key: Key) -> bool;
    /// Key went from up to down this tick
    fn is_key_pressed(&self, key: Key) -> bool;
}

/// Key state with edge detection against the previous frame
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: [bool; Key::COUNT],
    previous: [bool; Key::COUNT],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.down[key.index()] = down;
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.down = [false; Key::COUNT];
    }

    /// Latch this frame's state as the baseline for the next edge checks
    pub fn end_frame(&mut self) {
        self.previous = self.down;
    }
}

impl InputSource for KeyState {
    fn is_key_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.down[key.index()] && !self.previous[key.index()]
    }
}
