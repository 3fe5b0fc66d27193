//! Animation playback.
//!
//! Playback is a periodic task polled from the controller's event loop.
//! Stopping it clears the schedule, so no tick after [`Playback::pause`]
//! can change the animation.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::Animation;

/// Time between two frames during playback.
pub const PLAYBACK_INTERVAL: Duration = Duration::from_millis(300);

/// Cancellable periodic frame advance.
#[derive(Debug, Clone)]
pub struct Playback {
    interval: Duration,
    /// When the next frame is due; `None` while paused
    next_due: Option<Instant>,
    /// Frame shown on the next tick
    index: usize,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::with_interval(PLAYBACK_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            index: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_playing(&self) -> bool {
        self.next_due.is_some()
    }

    /// Starts playback from the first frame. Does nothing if already playing.
    pub fn play(&mut self, now: Instant) {
        if self.is_playing() {
            return;
        }
        debug!("playback started");
        self.index = 0;
        self.next_due = Some(now + self.interval);
    }

    /// Stops playback.
    pub fn pause(&mut self) {
        if self.next_due.take().is_some() {
            debug!("playback paused");
        }
    }

    /// Starts playback if paused, pauses it if playing.
    ///
    /// Returns whether playback is running afterwards.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
        self.is_playing()
    }

    /// Time left until the next frame, if playing.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Shows the next frame if it is due.
    ///
    /// Returns true if the animation's current frame was changed.
    pub fn tick(&mut self, now: Instant, animation: &mut Animation) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let count = animation.frame_count();
        let index = self.index % count;
        if animation.set_current(index).is_err() {
            return false;
        }
        self.index = (index + 1) % count;

        // Skip missed frames instead of bursting through them
        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frames() -> Animation {
        let mut anim = Animation::new();
        anim.add_frame();
        anim.add_frame();
        anim
    }

    #[test]
    fn test_toggle() {
        let now = Instant::now();
        let mut playback = Playback::new();
        assert!(!playback.is_playing());
        assert!(playback.toggle(now));
        assert!(!playback.toggle(now));
        assert!(playback.time_until_next(now).is_none());
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let start = Instant::now();
        let mut anim = three_frames();
        let mut playback = Playback::new();
        playback.play(start);

        assert!(!playback.tick(start + Duration::from_millis(299), &mut anim));
        assert_eq!(anim.current(), 2);

        assert!(playback.tick(start + PLAYBACK_INTERVAL, &mut anim));
        assert_eq!(anim.current(), 0);
    }

    #[test]
    fn test_cycles_through_frames() {
        let start = Instant::now();
        let mut anim = three_frames();
        let mut playback = Playback::new();
        playback.play(start);

        let mut seen = Vec::new();
        for step in 1..=4 {
            assert!(playback.tick(start + PLAYBACK_INTERVAL * step, &mut anim));
            seen.push(anim.current());
        }
        assert_eq!(seen, [0, 1, 2, 0]);
    }

    #[test]
    fn test_no_tick_after_pause() {
        let start = Instant::now();
        let mut anim = three_frames();
        anim.set_current(1).unwrap();
        let mut playback = Playback::new();
        playback.play(start);
        playback.pause();

        assert!(!playback.tick(start + PLAYBACK_INTERVAL * 10, &mut anim));
        assert_eq!(anim.current(), 1);
    }

    #[test]
    fn test_play_is_idempotent() {
        let start = Instant::now();
        let mut playback = Playback::new();
        playback.play(start);
        playback.play(start + Duration::from_millis(200));
        assert_eq!(
            playback.time_until_next(start),
            Some(PLAYBACK_INTERVAL)
        );
    }

    #[test]
    fn test_frames_removed_while_playing() {
        let start = Instant::now();
        let mut anim = three_frames();
        let mut playback = Playback::new();
        playback.play(start);
        playback.tick(start + PLAYBACK_INTERVAL, &mut anim);
        playback.tick(start + PLAYBACK_INTERVAL * 2, &mut anim);
        playback.tick(start + PLAYBACK_INTERVAL * 3, &mut anim);

        anim.delete_frame(2).unwrap();
        anim.delete_frame(1).unwrap();
        assert!(playback.tick(start + PLAYBACK_INTERVAL * 4, &mut anim));
        assert_eq!(anim.current(), 0);
    }

    #[test]
    fn test_late_tick_skips_ahead() {
        let start = Instant::now();
        let mut anim = three_frames();
        let mut playback = Playback::new();
        playback.play(start);

        let late = start + PLAYBACK_INTERVAL * 5;
        assert!(playback.tick(late, &mut anim));
        assert_eq!(playback.time_until_next(late), Some(PLAYBACK_INTERVAL));
        assert!(!playback.tick(late + Duration::from_millis(1), &mut anim));
    }
}
