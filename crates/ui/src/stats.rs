//! Derived stat display.

/// Receiver for stats the inventory screen derives.
pub trait StatDisplay {
    /// Show the summed armor value of the worn pieces.
    fn show_armor(&mut self, total: f32);

    /// Show the player's hit points.
    fn show_health(&mut self, _hp: u32, _max_hp: u32) {}
}

/// Headless stat panel that keeps the last pushed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatPanel {
    armor: f32,
    health: Option<(u32, u32)>,
    armor_updates: usize,
}

impl StatPanel {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last armor total shown.
    pub fn armor(&self) -> f32 {
        self.armor
    }

    /// Last hit points shown as `(hp, max_hp)`.
    pub fn health(&self) -> Option<(u32, u32)> {
        self.health
    }

    /// Number of armor pushes received.
    pub fn armor_updates(&self) -> usize {
        self.armor_updates
    }
}

impl StatDisplay for StatPanel {
    fn show_armor(&mut self, total: f32) {
        self.armor = total;
        self.armor_updates += 1;
    }

    fn show_health(&mut self, hp: u32, max_hp: u32) {
        self.health = Some((hp, max_hp));
    }
}
