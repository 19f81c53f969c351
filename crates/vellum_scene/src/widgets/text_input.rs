//! Text input widget state

use vellum_core::Key;

use crate::error::{Result, SceneError};

/// Editable text buffer with caret and optional selection
#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    text: Vec<char>,
    caret: usize,
    /// Half-open `[start, end)` char range; `None` when the caret is bare
    selection: Option<(usize, usize)>,
}

impl TextInputState {
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Replace the whole buffer, placing the caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().collect();
        self.caret = self.text.len();
        self.selection = None;
    }

    /// Select the char range `[begin, end)`.
    ///
    /// Bounds arrive as floats from pointer math; they must be finite and are
    /// floored before range validation.
    pub fn select(&mut self, begin: f64, end: f64) -> Result<()> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(SceneError::InvalidSelection(format!(
                "non-finite bounds ({begin}, {end})"
            )));
        }
        let begin = begin.floor();
        let end = end.floor();
        if begin < 0.0 || end < 0.0 {
            return Err(SceneError::InvalidSelection(format!(
                "negative bounds ({begin}, {end})"
            )));
        }
        let begin = begin as usize;
        let end = end as usize;
        if end > self.text.len() {
            return Err(SceneError::InvalidSelection(format!(
                "end {end} past text length {}",
                self.text.len()
            )));
        }
        if begin > end {
            return Err(SceneError::InvalidSelection(format!(
                "begin {begin} after end {end}"
            )));
        }
        self.selection = Some((begin, end));
        self.caret = end;
        Ok(())
    }

    /// Apply a key press at the caret, replacing any selection.
    /// Returns true when the buffer changed.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) => {
                if let Some((start, end)) = self.selection.take() {
                    self.text.splice(start..end, [c]);
                    self.caret = start + 1;
                } else {
                    self.text.insert(self.caret, c);
                    self.caret += 1;
                }
                true
            }
            Key::Backspace => {
                if let Some((start, end)) = self.selection.take() {
                    self.text.splice(start..end, []);
                    self.caret = start;
                    true
                } else if self.caret > 0 {
                    self.caret -= 1;
                    self.text.remove(self.caret);
                    true
                } else {
                    false
                }
            }
        }
    }
}
