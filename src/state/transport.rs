const MIN_SPAN: f64 = 0.01;
const ZOOM_FACTOR: f64 = 1.25;

/// Playhead, zoom span, and play flag for the loaded timeline.
///
/// The frame loop owns the clock and advances the playhead through [`Transport::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub playing: bool,
    pub position: f64,
    pub span: f64,
    pub duration: f64,
}

impl Transport {
    pub fn new(duration: f64) -> Self {
        let duration = duration.max(0.0);
        Self {
            playing: false,
            position: 0.0,
            span: duration.clamp(0.0, 1.0),
            duration,
        }
    }

    /// Advance the playhead by `dt` seconds while playing; stops at the end.
    pub fn update(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.position += dt.max(0.0);
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
        }
    }

    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn seek(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration);
    }

    pub fn scrub(&mut self, delta: f64) {
        self.seek(self.position + delta);
    }

    pub fn scrub_pct(&mut self, percent: f64) {
        self.scrub(self.duration * percent / 100.0);
    }

    pub fn home(&mut self) {
        self.seek(0.0);
        self.playing = false;
    }

    pub fn end(&mut self) {
        self.seek((self.duration - self.span).max(0.0));
        self.playing = false;
    }

    pub fn zoom(&mut self, span: f64) {
        self.span = span.min(self.duration).max(MIN_SPAN);
    }

    pub fn zoom_in(&mut self) {
        self.zoom(self.span / ZOOM_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(self.span * ZOOM_FACTOR);
    }

    /// Visible time window `[left, right]`.
    pub fn window(&self) -> (f64, f64) {
        (self.position, self.position + self.span)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(super::DEFAULT_DURATION)
    }
}
