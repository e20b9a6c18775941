use crate::keys::Key;

/// Keyboard teleoperation options.
#[derive(Debug, Clone)]
pub struct TeleopOptions {
    pub(crate) teleop_step: u32,
    pub(crate) step_increment: u32,
    pub(crate) speed_increment: u32,
    pub(crate) adjust_keys: bool,
    pub(crate) cancel_key: Key,
}

impl Default for TeleopOptions {
    fn default() -> Self {
        Self {
            teleop_step: 20,
            step_increment: 20,
            speed_increment: 10,
            adjust_keys: true,
            cancel_key: Key::Esc,
        }
    }
}

impl TeleopOptions {
    /// Distance flown for each arrow key press, in cm.
    ///
    /// This is deliberately separate from the controller's step, which only
    /// applies to programmatic `fly` calls without a distance.
    pub fn with_teleop_step(mut self, cm: u32) -> Self {
        self.teleop_step = cm;
        self
    }

    /// Amount keys `1`/`2` add to or take from the controller's step.
    pub fn with_step_increment(mut self, cm: u32) -> Self {
        self.step_increment = cm;
        self
    }

    /// Amount keys `3`/`4` add to or take from the controller's speed.
    pub fn with_speed_increment(mut self, cm_per_sec: u32) -> Self {
        self.speed_increment = cm_per_sec;
        self
    }

    /// Enables or disables the step/speed adjustment keys `1` to `4`.
    pub fn with_adjust_keys(mut self, enabled: bool) -> Self {
        self.adjust_keys = enabled;
        self
    }

    /// Key that ends a teleoperation session.
    pub fn with_cancel_key(mut self, key: Key) -> Self {
        self.cancel_key = key;
        self
    }

    pub fn teleop_step(&self) -> u32 {
        self.teleop_step
    }

    pub fn cancel_key(&self) -> Key {
        self.cancel_key
    }

    /// One-line summary of the key bindings, shown when a session starts.
    pub fn help(&self) -> String {
        let adjust = if self.adjust_keys {
            format!(
                ", 1/2 step +/-{}, 3/4 speed +/-{}",
                self.step_increment, self.speed_increment
            )
        } else {
            String::new()
        };
        format!(
            "arrows fly {}cm{adjust}, {} to quit",
            self.teleop_step, self.cancel_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_enabled_bindings() {
        let options = TeleopOptions::default();
        assert_eq!(
            options.help(),
            "arrows fly 20cm, 1/2 step +/-20, 3/4 speed +/-10, esc to quit"
        );

        let options = TeleopOptions::default()
            .with_adjust_keys(false)
            .with_cancel_key(Key::Char('q'))
            .with_teleop_step(30);
        assert_eq!(options.help(), "arrows fly 30cm, q to quit");
    }
}
