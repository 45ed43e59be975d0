/// Read-only frame counter the render layer samples. Physics never reads it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animation {
    pub action: &'static str,
    pub frame: u32,
    frames: u32,
    ticks_per_frame: u32,
    ticks: u32,
    looping: bool,
}

impl Animation {
    pub const fn new(action: &'static str, frames: u32, ticks_per_frame: u32, looping: bool) -> Self {
        Self { action, frame: 0, frames, ticks_per_frame, ticks: 0, looping }
    }

    pub fn still(action: &'static str) -> Self {
        Self::new(action, 1, 1, true)
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
        if self.ticks < self.ticks_per_frame.max(1) {
            return;
        }
        self.ticks = 0;
        if self.frame + 1 < self.frames {
            self.frame += 1;
        } else if self.looping {
            self.frame = 0;
        }
    }

    pub fn restart(&mut self) {
        self.frame = 0;
        self.ticks = 0;
    }

    /// Switches action, restarting only when it actually changes.
    pub fn play(&mut self, action: &'static str) {
        if self.action != action {
            self.action = action;
            self.restart();
        }
    }

    pub fn finished(&self) -> bool {
        !self.looping && self.frame + 1 >= self.frames
    }
}
