//! UI-side state shared by the front-ends: the current mode, what is hovered,
//! whether the visitor has interacted yet, and the split tween.

use crate::constants::SPLIT_DURATION_SEC;
use crate::mode::Mode;
use crate::ripple::ProjectKind;
use crate::scene::SceneInput;
use crate::transition::Tween;

#[derive(Clone, Debug)]
pub struct Controls {
    mode: Mode,
    hover: Option<(f32, f32)>,
    started: bool,
    split: Tween,
    morph_override: Option<f32>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            mode: Mode::Home,
            hover: None,
            started: false,
            split: Tween::settled(0.0, SPLIT_DURATION_SEC),
            morph_override: None,
        }
    }
}

impl Controls {
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns true when the mode actually changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.split
            .retarget(if mode == Mode::About { 1.0 } else { 0.0 });
        true
    }

    /// Hover frequency and bpm, or `None` when the pointer leaves.
    pub fn set_hover(&mut self, hover: Option<(f32, f32)>) {
        self.hover = hover;
    }

    pub fn hover_project(&mut self, kind: ProjectKind) {
        self.hover = Some(kind.hover());
    }

    #[inline]
    pub fn hover(&self) -> Option<(f32, f32)> {
        self.hover
    }

    /// First interaction; releases the intro latch.
    pub fn start(&mut self) {
        if !self.started {
            log::info!("intro released");
        }
        self.started = true;
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Drive every sphere's morph from outside instead of its own tween.
    pub fn set_morph_override(&mut self, progress: Option<f32>) {
        self.morph_override = progress;
    }

    #[inline]
    pub fn split_progress(&self) -> f32 {
        self.split.value()
    }

    /// Step the split tween by `dt_sec` and build this frame's scene input.
    pub fn advance(&mut self, dt_sec: f32) -> SceneInput {
        let split_progress = self.split.advance(dt_sec);
        let (hover_frequency, hover_bpm) = self.hover.unwrap_or((0.0, 0.0));
        SceneInput {
            mode: self.mode,
            hover_frequency,
            hover_bpm,
            split_progress,
            morph_progress: self.morph_override,
            started: self.started,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_splits_and_leaving_rejoins() {
        let mut c = Controls::default();
        assert!(c.set_mode(Mode::About));
        assert!(!c.set_mode(Mode::About));
        let mut input = c.advance(0.0);
        for _ in 0..100 {
            input = c.advance(1.0 / 60.0);
        }
        assert_eq!(input.split_progress, 1.0);
        c.set_mode(Mode::Works);
        let input = c.advance(0.5);
        assert!(input.split_progress < 1.0 && input.split_progress > 0.0);
    }

    #[test]
    fn hover_feeds_the_input_and_clears() {
        let mut c = Controls::default();
        c.hover_project(ProjectKind::Graphic);
        let input = c.advance(0.016);
        assert_eq!((input.hover_frequency, input.hover_bpm), (450.0, 110.0));
        c.set_hover(None);
        let input = c.advance(0.016);
        assert_eq!(input.hover_frequency, 0.0);
    }

    #[test]
    fn start_is_sticky() {
        let mut c = Controls::default();
        assert!(!c.advance(0.016).started);
        c.start();
        c.start();
        assert!(c.advance(0.016).started);
    }
}
