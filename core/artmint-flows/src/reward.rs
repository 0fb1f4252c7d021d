//! Burn reward schedule
//!
//! Reward is linear in the burned amount, boosted once the burn reaches the
//! bulk threshold, and clamped to a hard cap. Amounts are human token units,
//! rewards are lamports.

use artmint_chain::LAMPORTS_PER_SOL;
use serde::{Deserialize, Serialize};

/// Lamports earned per token burned
pub const BASE_REWARD: u64 = 1_000;

/// Burns of at least this many tokens receive the bulk multiplier (inclusive)
pub const BULK_BONUS_THRESHOLD: f64 = 1_000.0;

/// Multiplier applied at or above the threshold
pub const BULK_BONUS_MULTIPLIER: f64 = 1.5;

/// Hard cap on a single burn's reward: 0.01 SOL
pub const MAX_REWARD: u64 = LAMPORTS_PER_SOL / 100;

/// Reward constants, fixed configuration rather than derived state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub base_reward: u64,
    pub bulk_bonus_threshold: f64,
    pub bulk_bonus_multiplier: f64,
    pub max_reward: u64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            base_reward: BASE_REWARD,
            bulk_bonus_threshold: BULK_BONUS_THRESHOLD,
            bulk_bonus_multiplier: BULK_BONUS_MULTIPLIER,
            max_reward: MAX_REWARD,
        }
    }
}

/// Display-ready breakdown of a reward computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardQuote {
    pub amount: f64,
    pub reward_lamports: u64,
    pub reward_sol: f64,
    pub bonus_applied: bool,
    pub capped: bool,
}

impl RewardSchedule {
    /// Whole lamports earned for burning `amount` tokens
    ///
    /// Negative and non-finite amounts earn nothing.
    pub fn reward_for(&self, amount: f64) -> u64 {
        self.compute(amount).0
    }

    pub fn quote(&self, amount: f64) -> RewardQuote {
        let (reward_lamports, bonus_applied, capped) = self.compute(amount);
        RewardQuote {
            amount,
            reward_lamports,
            reward_sol: lamports_to_sol(reward_lamports),
            bonus_applied,
            capped,
        }
    }

    fn compute(&self, amount: f64) -> (u64, bool, bool) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };

        let mut reward = amount * self.base_reward as f64;
        let bonus_applied = amount >= self.bulk_bonus_threshold;
        if bonus_applied {
            reward *= self.bulk_bonus_multiplier;
        }

        let cap = self.max_reward as f64;
        let lamports = if reward >= cap { self.max_reward } else { reward.floor() as u64 };
        (lamports, bonus_applied, reward > cap)
    }
}

/// Reward under the default schedule
pub fn calculate_reward(amount: f64) -> u64 {
    RewardSchedule::default().reward_for(amount)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_negative_amounts() {
        assert_eq!(calculate_reward(0.0), 0);
        assert_eq!(calculate_reward(-5.0), 0);
        assert_eq!(calculate_reward(f64::NAN), 0);
        assert_eq!(calculate_reward(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn test_below_threshold_scenario() {
        // 500 tokens, no bonus, well under the cap
        assert_eq!(calculate_reward(500.0), 500_000);
    }

    #[test]
    fn test_above_threshold_scenario() {
        // min(2000 * 1000 * 1.5, 0.01 SOL) = 3,000,000
        assert_eq!(calculate_reward(2_000.0), 3_000_000);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let schedule = RewardSchedule::default();
        let at = schedule.reward_for(BULK_BONUS_THRESHOLD);
        let expected = ((BULK_BONUS_THRESHOLD * BASE_REWARD as f64 * BULK_BONUS_MULTIPLIER) as u64).min(MAX_REWARD);
        assert_eq!(at, expected);
        assert_eq!(at, 1_500_000);
        assert!(schedule.quote(BULK_BONUS_THRESHOLD).bonus_applied);
        assert!(!schedule.quote(BULK_BONUS_THRESHOLD - 1.0).bonus_applied);
    }

    #[test]
    fn test_never_exceeds_cap() {
        let schedule = RewardSchedule::default();
        for amount in [0.0, 1.0, 999.0, 1_000.0, 6_666.0, 6_667.0, 1e6, 1e12, f64::MAX, f64::INFINITY] {
            assert!(schedule.reward_for(amount) <= MAX_REWARD, "amount {}", amount);
        }
        // 10,000,000 / 1500 = 6666.67 tokens saturates the cap
        assert_eq!(schedule.reward_for(6_667.0), MAX_REWARD);
        let quote = schedule.quote(1e9);
        assert!(quote.capped);
        assert_eq!(quote.reward_sol, 0.01);
    }

    #[test]
    fn test_strictly_increasing_below_threshold() {
        let schedule = RewardSchedule::default();
        let mut previous = schedule.reward_for(0.0);
        let mut amount = 0.25;
        while amount < BULK_BONUS_THRESHOLD {
            let current = schedule.reward_for(amount);
            assert!(current > previous, "reward({}) = {} not above {}", amount, current, previous);
            previous = current;
            amount += 0.25;
        }
    }

    #[test]
    fn test_non_decreasing_across_threshold_and_cap() {
        let schedule = RewardSchedule::default();
        let mut previous = 0;
        for step in 0..20_000u32 {
            let current = schedule.reward_for(step as f64 * 0.5);
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, MAX_REWARD);
    }

    #[test]
    fn test_custom_schedule() {
        let schedule = RewardSchedule {
            base_reward: 10,
            bulk_bonus_threshold: 5.0,
            bulk_bonus_multiplier: 2.0,
            max_reward: 75,
        };
        assert_eq!(schedule.reward_for(4.0), 40);
        assert_eq!(schedule.reward_for(5.0), 75); // 100 clamped
        let quote = schedule.quote(3.7);
        assert_eq!(quote.reward_lamports, 37);
        assert!(!quote.capped);
    }
}
