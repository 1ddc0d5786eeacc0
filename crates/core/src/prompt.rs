//! Host-supplied text prompt used by the "load FEN" dialog action

pub trait FenPrompt {
    /// Blocks until the user answers; `None` means dismissed
    fn ask_fen(&mut self, current: &str) -> Option<String>;
}

/// Always dismissed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl FenPrompt for NoPrompt {
    fn ask_fen(&mut self, _current: &str) -> Option<String> {
        None
    }
}

/// Answers once with a value set ahead of time, then behaves like [`NoPrompt`]
#[derive(Debug, Default, Clone)]
pub struct PresetPrompt {
    answer: Option<String>,
}

impl PresetPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = Some(answer.into());
    }
}

impl FenPrompt for PresetPrompt {
    fn ask_fen(&mut self, _current: &str) -> Option<String> {
        self.answer.take()
    }
}

impl<F> FenPrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn ask_fen(&mut self, current: &str) -> Option<String> {
        self(current)
    }
}
