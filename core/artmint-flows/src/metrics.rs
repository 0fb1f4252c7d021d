//! Flow metrics

use prometheus::{register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Histogram};
use lazy_static::lazy_static;

lazy_static! {
    /// Flow outcomes by flow name
    pub static ref FLOW_OPS: CounterVec = register_counter_vec!(
        "artmint_flow_operations_total",
        "Total number of flow executions",
        &["flow", "result"]
    ).unwrap();

    /// Tokens burned, human units, across all mints
    pub static ref BURNED_TOKENS: Counter = register_counter!(
        "artmint_burned_tokens_total",
        "Tokens destroyed through the burn flow"
    ).unwrap();

    /// Reward computed per burn (not disbursed)
    pub static ref BURN_REWARD: Histogram = register_histogram!(
        "artmint_burn_reward_lamports",
        "Reward computed for confirmed burns",
        vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 5_000_000.0, 10_000_000.0]
    ).unwrap();
}

/// Record a flow outcome
pub fn record_flow(flow: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    FLOW_OPS.with_label_values(&[flow, result]).inc();
}

/// Record a confirmed burn
pub fn record_burn(amount: f64, reward_lamports: u64) {
    BURNED_TOKENS.inc_by(amount);
    BURN_REWARD.observe(reward_lamports as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burn_metrics_carry_no_labels() {
        let burned = BURNED_TOKENS.get();
        let observed = BURN_REWARD.get_sample_count();
        record_burn(2.5, 2_500);

        assert!(BURNED_TOKENS.get() >= burned + 2.5);
        assert!(BURN_REWARD.get_sample_count() > observed);

        let families = prometheus::gather();
        for name in ["artmint_burned_tokens_total", "artmint_burn_reward_lamports"] {
            let family = families.iter().find(|f| f.get_name() == name).unwrap();
            assert!(family.get_metric().iter().all(|m| m.get_label().is_empty()));
            assert_eq!(family.get_metric().len(), 1);
        }
    }
}
