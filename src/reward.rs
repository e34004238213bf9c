//! Reward-gauge reduction.
//!
//! A gauge accrues coins and records what was already withdrawn; the
//! claimable amount is the difference. On a correct chain withdrawn never
//! exceeds accrued, so the result is non-negative by construction. If the
//! chain ever reports otherwise the signed value is propagated as-is so
//! the discrepancy stays visible upstream.

use crate::types::RewardGauge;

/// Reward-category key under which BTC staking rewards accrue.
pub const BTC_DELEGATION_GAUGE: &str = "btc_delegation";

/// `sum(coins) - sum(withdrawn_coins)` across all denominations.
pub fn claimable(gauge: &RewardGauge) -> i128 {
    let accrued: i128 = gauge.coins.iter().map(|c| c.amount_raw() as i128).sum();
    let withdrawn: i128 = gauge
        .withdrawn_coins
        .iter()
        .map(|c| c.amount_raw() as i128)
        .sum();
    accrued - withdrawn
}

/// Same reduction restricted to a single denom.
pub fn claimable_denom(gauge: &RewardGauge, denom: &str) -> i128 {
    let accrued: i128 = gauge
        .coins
        .iter()
        .filter(|c| c.denom == denom)
        .map(|c| c.amount_raw() as i128)
        .sum();
    let withdrawn: i128 = gauge
        .withdrawn_coins
        .iter()
        .filter(|c| c.denom == denom)
        .map(|c| c.amount_raw() as i128)
        .sum();
    accrued - withdrawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coin;

    fn gauge(coins: &[(&str, u128)], withdrawn: &[(&str, u128)]) -> RewardGauge {
        RewardGauge {
            coins: coins.iter().map(|(d, a)| Coin::new(*d, *a)).collect(),
            withdrawn_coins: withdrawn.iter().map(|(d, a)| Coin::new(*d, *a)).collect(),
        }
    }

    #[test]
    fn test_claimable_basic() {
        let g = gauge(&[("ubbn", 100)], &[("ubbn", 40)]);
        assert_eq!(claimable(&g), 60);
    }

    #[test]
    fn test_claimable_empty_gauge() {
        assert_eq!(claimable(&RewardGauge::default()), 0);
    }

    #[test]
    fn test_claimable_nothing_withdrawn() {
        let g = gauge(&[("ubbn", 250)], &[]);
        assert_eq!(claimable(&g), 250);
    }

    #[test]
    fn test_claimable_negative_propagated() {
        // Withdrawn exceeding accrued should surface, not be clamped.
        let g = gauge(&[("ubbn", 40)], &[("ubbn", 100)]);
        assert_eq!(claimable(&g), -60);
    }

    #[test]
    fn test_claimable_denom_filters() {
        let g = gauge(&[("ubbn", 100), ("uatom", 9)], &[("ubbn", 40)]);
        assert_eq!(claimable_denom(&g, "ubbn"), 60);
        assert_eq!(claimable_denom(&g, "uatom"), 9);
        assert_eq!(claimable_denom(&g, "uother"), 0);
    }

    #[test]
    fn test_unparseable_amounts_count_as_zero() {
        let g = RewardGauge {
            coins: vec![Coin {
                denom: "ubbn".to_string(),
                amount: "garbage".to_string(),
            }],
            withdrawn_coins: vec![],
        };
        assert_eq!(claimable(&g), 0);
    }
}
