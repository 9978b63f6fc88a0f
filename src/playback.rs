// Play/pause flag plus the one marked point.

use crate::types::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Playback {
    #[default]
    Playing,
    Paused,
}

impl Playback {
    pub fn toggled(self) -> Self {
        match self {
            Playback::Playing => Playback::Paused,
            Playback::Paused => Playback::Playing,
        }
    }

    pub fn is_playing(self) -> bool {
        self == Playback::Playing
    }
}

/// Result of asking to clear the point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    NothingToClear,
}

impl ClearOutcome {
    /// Operator-facing text for the status line.
    pub fn message(self) -> &'static str {
        match self {
            ClearOutcome::Cleared => "Point cleared",
            ClearOutcome::NothingToClear => "No point to clear",
        }
    }
}

#[derive(Debug, Default)]
pub struct PlaybackState {
    playback: Playback,
    point: Option<Point>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn set_playback(&mut self, playback: Playback) {
        self.playback = playback;
    }

    /// Flip play/pause and return the new state.
    pub fn toggle(&mut self) -> Playback {
        self.playback = self.playback.toggled();
        self.playback
    }

    pub fn point(&self) -> Option<Point> {
        self.point
    }

    /// Replace whatever point was there.
    pub fn set_point(&mut self, point: Point) {
        self.point = Some(point);
    }

    pub fn clear_point(&mut self) -> ClearOutcome {
        match self.point.take() {
            Some(_) => ClearOutcome::Cleared,
            None => ClearOutcome::NothingToClear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_is_identity() {
        let mut st = PlaybackState::new();
        assert_eq!(st.playback(), Playback::Playing);
        assert_eq!(st.toggle(), Playback::Paused);
        assert_eq!(st.toggle(), Playback::Playing);
    }

    #[test]
    fn clear_on_fresh_state_reports_nothing() {
        let mut st = PlaybackState::new();
        assert_eq!(st.clear_point(), ClearOutcome::NothingToClear);
        assert_eq!(st.clear_point().message(), "No point to clear");
    }

    #[test]
    fn only_one_point_is_kept() {
        let mut st = PlaybackState::new();
        st.set_point(Point::new(1, 2));
        st.set_point(Point::new(3, 4));
        assert_eq!(st.point(), Some(Point::new(3, 4)));
        assert_eq!(st.clear_point(), ClearOutcome::Cleared);
        assert_eq!(st.point(), None);
        assert_eq!(st.clear_point(), ClearOutcome::NothingToClear);
    }
}
