//! Input capability port.
//!
//! Front-ends ask this before offering optional input controls. The chat core
//! never consults it.

/// What the hosting front-end can capture from the user.
pub trait InputCapabilities: Send + Sync {
    /// Whether speech can be captured and transcribed into message text.
    fn voice_input_available(&self) -> bool;
}

/// Fixed capability answers, for front-ends that know them up front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub voice: bool,
}

impl StaticCapabilities {
    /// Keyboard-only input.
    pub fn text_only() -> Self {
        Self { voice: false }
    }
}

impl InputCapabilities for StaticCapabilities {
    fn voice_input_available(&self) -> bool {
        self.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_has_no_voice() {
        let caps: Box<dyn InputCapabilities> = Box::new(StaticCapabilities::text_only());
        assert!(!caps.voice_input_available());
    }

    #[test]
    fn test_voice_enabled() {
        assert!(StaticCapabilities { voice: true }.voice_input_available());
    }
}
