//! Typing animation model
//!
//! Reveals a target string one character at a time with a randomized
//! per-character delay. The animator holds no timers of its own: the UI loop
//! pushes the current instant in through [`TypingAnimator::advance`], so
//! dropping or retargeting the animator leaves nothing scheduled behind.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Fixed cursor blink half-period
pub const CURSOR_BLINK_PERIOD: Duration = Duration::from_millis(400);

/// Upper bound (inclusive) of the random extra delay added to each character
pub const DEFAULT_MAX_JITTER_MS: u64 = 29;

pub const MIN_SPEED_MS: u64 = 10;
pub const MAX_SPEED_MS: u64 = 100;
pub const SPEED_STEP_MS: u64 = 10;

/// Signal emitted by [`TypingAnimator::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// The whole target is displayed. Emitted once per run.
    Completed,
}

/// Snapshot of what the animation panel should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState<'a> {
    pub displayed_prefix: &'a str,
    pub progress_percent: u8,
    pub cursor_visible: bool,
    pub completed: bool,
}

/// Character-by-character reveal of a text buffer
#[derive(Debug)]
pub struct TypingAnimator {
    target: String,
    total_chars: usize,
    shown_chars: usize,
    /// Byte offset of the end of the displayed prefix
    shown_bytes: usize,
    base_delay: Duration,
    max_jitter_ms: u64,
    rng: StdRng,
    /// When the next character is due; `None` once completed
    next_due: Option<Instant>,
    paused: bool,
    completed: bool,
    blink_origin: Instant,
}

impl TypingAnimator {
    /// Create an animator and start its first run at `now`
    pub fn new(target: impl Into<String>, speed_ms: u64, max_jitter_ms: u64, now: Instant) -> Self {
        Self::with_rng(target.into(), speed_ms, max_jitter_ms, now, StdRng::from_entropy())
    }

    /// Same as `new` but with a reproducible jitter sequence
    pub fn with_seed(
        target: impl Into<String>,
        speed_ms: u64,
        max_jitter_ms: u64,
        now: Instant,
        seed: u64,
    ) -> Self {
        Self::with_rng(target.into(), speed_ms, max_jitter_ms, now, StdRng::seed_from_u64(seed))
    }

    fn with_rng(target: String, speed_ms: u64, max_jitter_ms: u64, now: Instant, rng: StdRng) -> Self {
        let total_chars = target.chars().count();
        let mut animator = Self {
            target,
            total_chars,
            shown_chars: 0,
            shown_bytes: 0,
            base_delay: Duration::from_millis(clamp_speed(speed_ms)),
            max_jitter_ms,
            rng,
            next_due: None,
            paused: false,
            completed: false,
            blink_origin: now,
        };
        animator.restart(now);
        animator
    }

    /// Reset the prefix, progress and completion flag, then begin a new run
    pub fn restart(&mut self, now: Instant) {
        self.shown_chars = 0;
        self.shown_bytes = 0;
        self.completed = false;
        self.paused = false;
        let delay = self.next_delay();
        self.next_due = Some(now + delay);
    }

    /// Replace the target text; any pending reveal of the old text is discarded
    pub fn retarget(&mut self, target: impl Into<String>, now: Instant) {
        self.target = target.into();
        self.total_chars = self.target.chars().count();
        self.restart(now);
    }

    /// Reveal every character that is due by `now`
    ///
    /// Returns `Some(AnimatorEvent::Completed)` on the call that first shows
    /// the full target, and `None` on every other call.
    pub fn advance(&mut self, now: Instant) -> Option<AnimatorEvent> {
        if self.completed || self.paused {
            return None;
        }

        while self.shown_chars < self.total_chars {
            match self.next_due {
                Some(due) if due <= now => {
                    self.reveal_one();
                    let delay = self.next_delay();
                    self.next_due = Some(due + delay);
                }
                _ => break,
            }
        }

        if self.shown_chars == self.total_chars {
            self.completed = true;
            self.next_due = None;
            return Some(AnimatorEvent::Completed);
        }

        None
    }

    fn reveal_one(&mut self) {
        if let Some(c) = self.target[self.shown_bytes..].chars().next() {
            self.shown_bytes += c.len_utf8();
            self.shown_chars += 1;
        }
    }

    fn next_delay(&mut self) -> Duration {
        let jitter = if self.max_jitter_ms == 0 {
            0
        } else {
            self.rng.gen_range(0..=self.max_jitter_ms)
        };
        self.base_delay + Duration::from_millis(jitter)
    }

    /// Pause or resume. A completed run ignores this.
    pub fn toggle_pause(&mut self, now: Instant) {
        if self.completed {
            return;
        }
        self.paused = !self.paused;
        if !self.paused {
            let delay = self.next_delay();
            self.next_due = Some(now + delay);
        }
    }

    /// Set the base per-character delay, clamped to the supported range
    pub fn set_speed_ms(&mut self, speed_ms: u64) {
        self.base_delay = Duration::from_millis(clamp_speed(speed_ms));
    }

    /// Shorter delay (faster typing)
    pub fn speed_up(&mut self) {
        self.set_speed_ms(self.speed_ms().saturating_sub(SPEED_STEP_MS));
    }

    /// Longer delay (slower typing)
    pub fn slow_down(&mut self) {
        self.set_speed_ms(self.speed_ms() + SPEED_STEP_MS);
    }

    pub fn speed_ms(&self) -> u64 {
        self.base_delay.as_millis() as u64
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn displayed_prefix(&self) -> &str {
        &self.target[..self.shown_bytes]
    }

    /// `floor(shown / total * 100)`; an empty target counts as fully shown
    pub fn progress_percent(&self) -> u8 {
        if self.total_chars == 0 {
            return 100;
        }
        (self.shown_chars * 100 / self.total_chars) as u8
    }

    /// Blinks every 400ms while running; stays solid once completed
    pub fn cursor_visible(&self, now: Instant) -> bool {
        if self.completed {
            return true;
        }
        let elapsed = now.saturating_duration_since(self.blink_origin);
        (elapsed.as_millis() / CURSOR_BLINK_PERIOD.as_millis()) % 2 == 0
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Zero-based line the cursor is on
    pub fn current_line(&self) -> usize {
        self.displayed_prefix().matches('\n').count()
    }

    pub fn total_lines(&self) -> usize {
        self.target.split('\n').count()
    }

    pub fn state(&self, now: Instant) -> AnimationState<'_> {
        AnimationState {
            displayed_prefix: self.displayed_prefix(),
            progress_percent: self.progress_percent(),
            cursor_visible: self.cursor_visible(now),
            completed: self.completed,
        }
    }
}

fn clamp_speed(speed_ms: u64) -> u64 {
    speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Drive the animator in 1ms steps until `limit`, collecting completion events
    fn run_to(animator: &mut TypingAnimator, start: Instant, limit: u64) -> usize {
        let mut completions = 0;
        let mut last_len = 0;
        for t in 0..=limit {
            if animator.advance(start + ms(t)) == Some(AnimatorEvent::Completed) {
                completions += 1;
            }
            let prefix = animator.displayed_prefix();
            assert!(animator.target().starts_with(prefix));
            assert!(prefix.len() >= last_len, "prefix shrank at t={}", t);
            last_len = prefix.len();
        }
        completions
    }

    #[test]
    fn test_reveals_full_target_and_completes_once() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("const x = 1;", 10, 0, start);

        let completions = run_to(&mut animator, start, 500);

        assert_eq!(completions, 1);
        assert_eq!(animator.displayed_prefix(), "const x = 1;");
        assert_eq!(animator.progress_percent(), 100);
        assert!(animator.is_completed());
    }

    #[test]
    fn test_one_character_per_tick_without_jitter() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abcd", 20, 0, start);

        assert_eq!(animator.advance(start + ms(19)), None);
        assert_eq!(animator.displayed_prefix(), "");

        animator.advance(start + ms(20));
        assert_eq!(animator.displayed_prefix(), "a");
        assert_eq!(animator.progress_percent(), 25);

        animator.advance(start + ms(45));
        assert_eq!(animator.displayed_prefix(), "ab");
        assert_eq!(animator.progress_percent(), 50);
    }

    #[test]
    fn test_progress_is_floored() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abc", 10, 0, start);
        animator.advance(start + ms(10));
        assert_eq!(animator.progress_percent(), 33);
        animator.advance(start + ms(20));
        assert_eq!(animator.progress_percent(), 66);
    }

    #[test]
    fn test_late_frame_catches_up() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("hello world", 10, 30, start);

        let event = animator.advance(start + Duration::from_secs(10));

        assert_eq!(event, Some(AnimatorEvent::Completed));
        assert_eq!(animator.displayed_prefix(), "hello world");
        assert_eq!(animator.advance(start + Duration::from_secs(11)), None);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let start = Instant::now();
        let mut animator = TypingAnimator::with_seed("abcdefghij", 20, 30, start, 7);

        // Each character takes at least 20ms and at most 50ms
        animator.advance(start + ms(20 * 3 - 1));
        assert!(animator.displayed_prefix().chars().count() < 3);

        animator.advance(start + ms(50 * 10));
        assert_eq!(animator.displayed_prefix(), "abcdefghij");
    }

    #[test]
    fn test_restart_resets_before_new_characters() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abc", 10, 0, start);
        animator.advance(start + ms(100));
        assert!(animator.is_completed());

        let later = start + ms(200);
        animator.restart(later);

        assert_eq!(animator.displayed_prefix(), "");
        assert_eq!(animator.progress_percent(), 0);
        assert!(!animator.is_completed());

        assert_eq!(animator.advance(later + ms(9)), None);
        assert_eq!(animator.displayed_prefix(), "");

        let completions = run_to(&mut animator, later, 100);
        assert_eq!(completions, 1);
        assert_eq!(animator.displayed_prefix(), "abc");
    }

    #[test]
    fn test_retarget_discards_old_text() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("first text", 10, 0, start);
        animator.advance(start + ms(30));
        assert_eq!(animator.displayed_prefix(), "fir");

        animator.retarget("second", start + ms(30));
        assert_eq!(animator.displayed_prefix(), "");

        animator.advance(start + ms(1000));
        assert_eq!(animator.displayed_prefix(), "second");
    }

    #[test]
    fn test_pause_stops_reveal_and_resume_reschedules() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abcdef", 10, 0, start);
        animator.advance(start + ms(20));
        assert_eq!(animator.displayed_prefix(), "ab");

        animator.toggle_pause(start + ms(20));
        assert!(animator.is_paused());
        assert_eq!(animator.advance(start + ms(1000)), None);
        assert_eq!(animator.displayed_prefix(), "ab");

        let resumed = start + ms(1000);
        animator.toggle_pause(resumed);
        assert!(!animator.is_paused());

        // No burst of characters for the time spent paused
        animator.advance(resumed + ms(10));
        assert_eq!(animator.displayed_prefix(), "abc");
    }

    #[test]
    fn test_cursor_blinks_while_paused_and_freezes_when_done() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abc", 10, 0, start);
        animator.toggle_pause(start);

        assert!(animator.cursor_visible(start));
        assert!(!animator.cursor_visible(start + ms(400)));
        assert!(animator.cursor_visible(start + ms(800)));

        animator.toggle_pause(start + ms(800));
        animator.advance(start + ms(2000));
        assert!(animator.is_completed());
        assert!(animator.cursor_visible(start + ms(2400)));
        assert!(animator.cursor_visible(start + ms(2800)));
    }

    #[test]
    fn test_empty_target_completes_immediately() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("", 10, 0, start);

        assert_eq!(animator.progress_percent(), 100);
        assert_eq!(animator.advance(start), Some(AnimatorEvent::Completed));
        assert_eq!(animator.advance(start + ms(50)), None);
    }

    #[test]
    fn test_multibyte_characters() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("é→世", 10, 0, start);

        animator.advance(start + ms(20));
        assert_eq!(animator.displayed_prefix(), "é→");

        animator.advance(start + ms(30));
        assert_eq!(animator.displayed_prefix(), "é→世");
        assert!(animator.is_completed());
    }

    #[test]
    fn test_speed_is_clamped() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("abc", 5, 0, start);
        assert_eq!(animator.speed_ms(), MIN_SPEED_MS);

        animator.speed_up();
        assert_eq!(animator.speed_ms(), MIN_SPEED_MS);

        animator.set_speed_ms(95);
        animator.slow_down();
        assert_eq!(animator.speed_ms(), MAX_SPEED_MS);
    }

    #[test]
    fn test_line_counter() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("a\nb\nc", 10, 0, start);
        assert_eq!(animator.total_lines(), 3);
        assert_eq!(animator.current_line(), 0);

        animator.advance(start + ms(30));
        assert_eq!(animator.displayed_prefix(), "a\nb");
        assert_eq!(animator.current_line(), 1);
    }

    #[test]
    fn test_state_snapshot() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new("ab", 10, 0, start);
        animator.advance(start + ms(10));

        let state = animator.state(start + ms(10));
        assert_eq!(state.displayed_prefix, "a");
        assert_eq!(state.progress_percent, 50);
        assert!(state.cursor_visible);
        assert!(!state.completed);
    }
}
