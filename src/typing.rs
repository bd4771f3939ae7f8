//! Cyclic phrase typing effect
//!
//! Types a phrase one character at a time, holds it, deletes it, then moves to
//! the next phrase (wrapping). Each transition is one `step`; the returned delay
//! is how long the host should wait before the next one. At most one wake-up is
//! ever pending per effect.

use crate::error::Result;
use crate::settings::TypingConfig;
use crate::timer::{TimerHost, TimerId};

/// Where the effect is within the current phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// Appending characters
    Typing,
    /// Full phrase shown, waiting out the pause
    Holding,
    /// Removing characters
    Deleting,
}

/// Read-only snapshot of the visible state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    pub displayed_text: String,
    pub deleting: bool,
    pub phrase_index: usize,
}

/// Typing/deleting state machine over a non-empty phrase queue
#[derive(Debug, Clone)]
pub struct TypingEffect {
    phrases: Vec<String>,
    type_interval_ms: u32,
    delete_interval_ms: u32,
    pause_ms: u32,
    phrase_index: usize,
    /// Characters (not bytes) of the current phrase shown
    typed: usize,
    phase: TypingPhase,
    pending: Option<TimerId>,
}

impl TypingEffect {
    /// Build from config; fails fast on an empty phrase list or zero intervals
    pub fn new(config: &TypingConfig) -> Result<Self> {
        config.validate()?;

        let mut effect = Self {
            phrases: config.phrases.clone(),
            type_interval_ms: config.type_interval_ms,
            delete_interval_ms: config.delete_interval_ms,
            pause_ms: config.pause_ms,
            phrase_index: 0,
            typed: 0,
            phase: TypingPhase::Typing,
            pending: None,
        };
        effect.enter_phrase();
        Ok(effect)
    }

    /// Text currently shown (always a prefix of the current phrase)
    pub fn displayed(&self) -> &str {
        let phrase = self.current_phrase();
        match phrase.char_indices().nth(self.typed) {
            Some((end, _)) => &phrase[..end],
            None => phrase,
        }
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn is_deleting(&self) -> bool {
        self.phase == TypingPhase::Deleting
    }

    /// Whether a wake-up is currently scheduled
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> TypingState {
        TypingState {
            displayed_text: self.displayed().to_owned(),
            deleting: self.is_deleting(),
            phrase_index: self.phrase_index,
        }
    }

    /// Delay before the next step from the current phase
    pub fn current_delay(&self) -> u32 {
        match self.phase {
            TypingPhase::Typing => self.type_interval_ms,
            TypingPhase::Holding => self.pause_ms,
            TypingPhase::Deleting => self.delete_interval_ms,
        }
    }

    /// Advance one transition, returning the delay until the next
    pub fn step(&mut self) -> u32 {
        match self.phase {
            TypingPhase::Typing => {
                self.typed += 1;
                if self.typed >= self.phrase_len() {
                    self.phase = TypingPhase::Holding;
                }
            }
            TypingPhase::Holding => {
                self.phase = TypingPhase::Deleting;
                if self.typed == 0 {
                    self.advance();
                }
            }
            TypingPhase::Deleting => {
                self.typed = self.typed.saturating_sub(1);
                if self.typed == 0 {
                    self.advance();
                }
            }
        }
        self.current_delay()
    }

    /// Schedule the first wake-up (replacing any pending one)
    pub fn start(&mut self, host: &mut impl TimerHost) {
        let delay = self.current_delay();
        self.reschedule(delay, host);
    }

    /// Handle a fired wake-up. Returns false for stale or foreign ids.
    ///
    /// The fired id is consumed, not cancelled: it has already been delivered.
    pub fn fire(&mut self, id: TimerId, host: &mut impl TimerHost) -> bool {
        if self.pending != Some(id) {
            log::debug!("Ignoring stale typing timer {:?}", id);
            return false;
        }
        self.pending = None;
        let delay = self.step();
        self.reschedule(delay, host);
        true
    }

    /// Cancel any pending wake-up
    pub fn teardown(&mut self, host: &mut impl TimerHost) {
        if let Some(id) = self.pending.take() {
            host.cancel(id);
        }
    }

    fn reschedule(&mut self, delay_ms: u32, host: &mut impl TimerHost) {
        if let Some(previous) = self.pending.take() {
            host.cancel(previous);
        }
        self.pending = Some(host.schedule(delay_ms));
    }

    fn phrase_len(&self) -> usize {
        self.current_phrase().chars().count()
    }

    fn advance(&mut self) {
        self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
        self.enter_phrase();
    }

    /// Reset to the start of the current phrase; empty phrases are already "typed"
    fn enter_phrase(&mut self) {
        self.typed = 0;
        self.phase = if self.phrase_len() == 0 {
            TypingPhase::Holding
        } else {
            TypingPhase::Typing
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::timer::VirtualTimers;
    use proptest::prelude::*;

    fn config(phrases: &[&str]) -> TypingConfig {
        TypingConfig {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            ..TypingConfig::default()
        }
    }

    /// Fire every wake-up due up to `until_ms`, recording (time, text) after each
    fn run_until(
        effect: &mut TypingEffect,
        timers: &mut VirtualTimers,
        until_ms: u64,
    ) -> Vec<(u64, String)> {
        let mut log = Vec::new();
        while let Some(id) = timers.pop_due(until_ms) {
            if effect.fire(id, timers) {
                log.push((timers.now_ms(), effect.displayed().to_string()));
            }
        }
        log
    }

    #[test]
    fn test_go_rust_timeline() {
        let cfg = TypingConfig {
            phrases: vec!["Go".into(), "Rust".into()],
            type_interval_ms: 150,
            delete_interval_ms: 100,
            pause_ms: 1500,
        };
        let mut effect = TypingEffect::new(&cfg).unwrap();
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);

        let log = run_until(&mut effect, &mut timers, 2600);
        let expected: Vec<(u64, String)> = [
            (150, "G"),
            (300, "Go"),
            (1800, "Go"),
            (1900, "G"),
            (2000, ""),
            (2150, "R"),
            (2300, "Ru"),
            (2450, "Rus"),
            (2600, "Rust"),
        ]
        .iter()
        .map(|(t, s)| (*t, s.to_string()))
        .collect();
        assert_eq!(log, expected);
        assert_eq!(effect.phrase_index(), 1);
        assert_eq!(effect.phase(), TypingPhase::Holding);
    }

    #[test]
    fn test_empty_phrase_list_rejected() {
        let err = TypingEffect::new(&config(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPhrases));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg = TypingConfig {
            type_interval_ms: 0,
            ..config(&["a"])
        };
        assert!(matches!(
            TypingEffect::new(&cfg),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_single_phrase_cycles_onto_itself() {
        let mut effect = TypingEffect::new(&config(&["Hi"])).unwrap();
        // type H, type i, hold->delete, delete i, delete H (wraps)
        for _ in 0..5 {
            effect.step();
        }
        assert_eq!(effect.phrase_index(), 0);
        assert_eq!(effect.displayed(), "");
        assert_eq!(effect.phase(), TypingPhase::Typing);
        effect.step();
        assert_eq!(effect.displayed(), "H");
    }

    #[test]
    fn test_empty_phrase_still_pauses() {
        let mut effect = TypingEffect::new(&config(&["", "A"])).unwrap();
        assert_eq!(effect.phase(), TypingPhase::Holding);
        assert_eq!(effect.current_delay(), crate::consts::PAUSE_MS);

        // Pause elapses: nothing to delete, moves straight to the next phrase
        let delay = effect.step();
        assert_eq!(effect.phrase_index(), 1);
        assert_eq!(effect.phase(), TypingPhase::Typing);
        assert_eq!(delay, crate::consts::TYPE_INTERVAL_MS);
    }

    #[test]
    fn test_multibyte_prefix() {
        let mut effect = TypingEffect::new(&config(&["héllo"])).unwrap();
        effect.step();
        effect.step();
        assert_eq!(effect.displayed(), "hé");
    }

    #[test]
    fn test_stale_fire_ignored() {
        let mut effect = TypingEffect::new(&config(&["abc"])).unwrap();
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);

        assert!(!effect.fire(TimerId::new(9999), &mut timers));
        assert_eq!(effect.displayed(), "");
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn test_restart_replaces_pending_timer() {
        let mut effect = TypingEffect::new(&config(&["abc"])).unwrap();
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);
        effect.start(&mut timers);
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn test_one_pending_then_teardown() {
        let mut effect = TypingEffect::new(&config(&["Full Stack", "Rust"])).unwrap();
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);

        for _ in 0..40 {
            let id = timers.pop_due(u64::MAX).unwrap();
            assert!(effect.fire(id, &mut timers));
            assert_eq!(timers.pending_count(), 1);
        }

        effect.teardown(&mut timers);
        assert_eq!(timers.pending_count(), 0);
        assert!(!effect.is_running());
    }

    #[test]
    fn test_fire_after_teardown_is_ignored() {
        let mut effect = TypingEffect::new(&config(&["abc"])).unwrap();
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);
        let id = timers.pop_due(u64::MAX).unwrap();
        assert!(effect.fire(id, &mut timers));
        assert_eq!(effect.displayed(), "a");

        // A callback already queued when the effect is torn down
        let late = timers.pop_due(u64::MAX).unwrap();
        effect.teardown(&mut timers);
        assert!(!effect.fire(late, &mut timers));
        assert_eq!(effect.displayed(), "a");
        assert_eq!(timers.pending_count(), 0);
        assert!(!effect.is_running());
    }

    proptest! {
        #[test]
        fn prop_cycle_never_skips(
            phrases in prop::collection::vec("[a-zé ]{0,6}", 1..5),
            steps in 1usize..300,
        ) {
            let cfg = TypingConfig {
                phrases: phrases.clone(),
                ..TypingConfig::default()
            };
            let mut effect = TypingEffect::new(&cfg).unwrap();

            for _ in 0..steps {
                let before_phase = effect.phase();
                let before_len = effect.displayed().chars().count();
                let before_index = effect.phrase_index();
                let full = effect.current_phrase().chars().count();

                effect.step();

                let after_len = effect.displayed().chars().count();
                let after_index = effect.phrase_index();
                prop_assert!(after_len <= effect.current_phrase().chars().count());

                if after_index != before_index {
                    // Only ever advance from an empty display, by one
                    prop_assert_eq!(after_index, (before_index + 1) % phrases.len());
                    prop_assert_eq!(after_len, 0);
                    prop_assert!(before_len <= 1);
                    prop_assert!(before_phase != TypingPhase::Typing);
                    continue;
                }

                match before_phase {
                    TypingPhase::Typing => prop_assert_eq!(after_len, before_len + 1),
                    TypingPhase::Holding => {
                        prop_assert_eq!(before_len, full);
                        prop_assert_eq!(after_len, before_len);
                        // A lone empty phrase re-enters its own pause
                        prop_assert!(effect.phase() == TypingPhase::Deleting || full == 0);
                    }
                    TypingPhase::Deleting => prop_assert_eq!(after_len + 1, before_len),
                }
            }
        }
    }
}
