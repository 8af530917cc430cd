/// Whether the driver's cadence advances the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

/// Discrete inputs that move the engine between [`RunState`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunEvent {
    Start,
    Pause,
    Toggle,
}

impl RunState {
    #[inline]
    pub fn on(self, event: RunEvent) -> Self {
        match (self, event) {
            (_, RunEvent::Start) => Self::Running,
            (_, RunEvent::Pause) => Self::Paused,
            (Self::Paused, RunEvent::Toggle) => Self::Running,
            (Self::Running, RunEvent::Toggle) => Self::Paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        assert_eq!(RunState::Paused.on(RunEvent::Start), RunState::Running);
        assert_eq!(RunState::Running.on(RunEvent::Start), RunState::Running);
        assert_eq!(RunState::Running.on(RunEvent::Pause), RunState::Paused);
        assert_eq!(RunState::Paused.on(RunEvent::Toggle), RunState::Running);
        assert_eq!(RunState::Running.on(RunEvent::Toggle), RunState::Paused);
    }
}
