//! Random decisions that shape each scenario.
//!
//! All randomness sits behind [`DecisionMaker`] so that a scenario becomes a
//! deterministic function of its decision sequence. [`ScriptedDecisions`]
//! replays a fixed sequence for tests and debugging.

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait DecisionMaker {
    /// Uniform boolean decision (include food? high-speed? ...).
    fn decide(&mut self) -> bool;

    /// Uniform choice from a slice; `None` on empty input.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>;

    /// Consignee name for a consignment group.
    fn consignee_name(&mut self) -> String;

    /// Consignee phone number for a consignment group.
    fn phone_number(&mut self) -> String;

    /// Consignment weight, 1..=10.
    fn consign_weight(&mut self) -> u32;
}

/// Entropy-seeded decisions for normal operation.
#[derive(Debug)]
pub struct EntropyDecisions {
    rng: SmallRng,
}

impl EntropyDecisions {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyDecisions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionMaker for EntropyDecisions {
    fn decide(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    fn consignee_name(&mut self) -> String {
        Alphanumeric.sample_string(&mut self.rng, 10)
    }

    fn phone_number(&mut self) -> String {
        let mut digits = String::from("1");
        for _ in 0..10 {
            digits.push(char::from(b'0' + self.rng.gen_range(0..10u8)));
        }
        digits
    }

    fn consign_weight(&mut self) -> u32 {
        self.rng.gen_range(1..=10)
    }
}

/// Replays queued decisions in order; defaults kick in once a queue drains.
///
/// Boolean decisions and slice picks consume separate queues so a script stays
/// valid when an optional pick (e.g. the food choice) is skipped.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    bools: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bools(mut self, bools: impl IntoIterator<Item = bool>) -> Self {
        self.bools.extend(bools);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl DecisionMaker for ScriptedDecisions {
    fn decide(&mut self) -> bool {
        self.bools.pop_front().unwrap_or(false)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.picks.pop_front().unwrap_or(0);
        items.get(index.min(items.len() - 1))
    }

    fn consignee_name(&mut self) -> String {
        "Scripted Consignee".to_string()
    }

    fn phone_number(&mut self) -> String {
        "15810101010".to_string()
    }

    fn consign_weight(&mut self) -> u32 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_decisions_replay() {
        let mut a = EntropyDecisions::seeded(17);
        let mut b = EntropyDecisions::seeded(17);
        let items = [1, 2, 3, 4, 5];
        for _ in 0..32 {
            assert_eq!(a.decide(), b.decide());
            assert_eq!(a.pick(&items), b.pick(&items));
        }
    }

    #[test]
    fn pick_on_empty_is_none() {
        let mut decisions = EntropyDecisions::seeded(0);
        let empty: [u8; 0] = [];
        assert_eq!(decisions.pick(&empty), None);
        assert_eq!(ScriptedDecisions::new().pick(&empty), None);
    }

    #[test]
    fn phone_number_shape() {
        let mut decisions = EntropyDecisions::seeded(3);
        let phone = decisions.phone_number();
        assert_eq!(phone.len(), 11);
        assert!(phone.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn scripted_queues_are_independent() {
        let mut decisions = ScriptedDecisions::new()
            .with_bools([true, false])
            .with_picks([2, 9]);
        let items = ["a", "b", "c"];
        assert!(decisions.decide());
        assert_eq!(decisions.pick(&items), Some(&"c"));
        assert!(!decisions.decide());
        // Out-of-range index clamps to the last element.
        assert_eq!(decisions.pick(&items), Some(&"c"));
        // Drained queues fall back to defaults.
        assert!(!decisions.decide());
        assert_eq!(decisions.pick(&items), Some(&"a"));
    }
}
