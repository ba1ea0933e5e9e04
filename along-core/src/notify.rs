//! One-shot, self-expiring messages: the toast and the play hint.
//!
//! Both are last-write-wins. Each trigger bumps a generation counter and the
//! expiry effects carry the generation they were scheduled for, so a timer left
//! over from an earlier message never touches a newer one.

/// Toast currently on screen. An empty message means nothing is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// `false` while the exit animation runs
    pub visible: bool,
    generation: u64,
}

impl Toast {
    /// Show `message` immediately. Returns the generation to tag expiry effects with.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.message = message.into();
        self.visible = true;
        self.generation
    }

    /// Start the exit animation, if `generation` is still the latest message.
    pub fn hide(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.visible {
            return false;
        }
        self.visible = false;
        true
    }

    /// Unmount the toast, if `generation` is still the latest message.
    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.message.is_empty() {
            return false;
        }
        self.message.clear();
        self.visible = false;
        true
    }
}

/// Short text under the player controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
    generation: u64,
}

impl Hint {
    pub fn show(&mut self, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.text = text.into();
        self.generation
    }

    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.text.is_empty() {
            return false;
        }
        self.text.clear();
        true
    }

    /// Clear regardless of generation and invalidate pending expiries.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.text.clear();
    }
}
