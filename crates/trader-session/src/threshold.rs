//! 세션 보정 신호 임계값.
//!
//! 전략별 기본 임계값에 세션 변동성 보정과 전략별 보정을 더해
//! 최소 신호 수를 계산합니다. 결과는 항상 1 이상입니다.

use trader_core::StrategyKind;

use crate::clock::{SessionDescriptor, Volatility};

/// 전략과 세션에 맞는 최소 신호 수를 계산합니다.
///
/// - 기본값: 전략별 기본 임계값
/// - 변동성 보정: VERY_HIGH +1, LOW −1
/// - 전략 보정:
///   - Scalping: HIGH/VERY_HIGH가 아니면 +1 (저변동 구간에서 더 엄격)
///   - Intraday: VERY_HIGH +1, LOW −1
///   - HFT: HIGH/VERY_HIGH −1, 그 외 +2 (고변동 구간 전용)
///   - Arbitrage: 보정 없음
pub fn session_adjusted_threshold(strategy: StrategyKind, session: &SessionDescriptor) -> u32 {
    let base = strategy.base_signal_threshold() as i32;

    let volatility_mod = match session.volatility {
        Volatility::VeryHigh => 1,
        Volatility::Low => -1,
        _ => 0,
    };

    let high_volatility = matches!(
        session.volatility,
        Volatility::High | Volatility::VeryHigh
    );

    let strategy_mod = match strategy {
        StrategyKind::Scalping => {
            if high_volatility {
                0
            } else {
                1
            }
        }
        StrategyKind::Intraday => match session.volatility {
            Volatility::VeryHigh => 1,
            Volatility::Low => -1,
            _ => 0,
        },
        StrategyKind::Hft => {
            if high_volatility {
                -1
            } else {
                2
            }
        }
        StrategyKind::Arbitrage => 0,
    };

    (base + volatility_mod + strategy_mod).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::session_at;
    use chrono::{TimeZone, Utc};

    fn session(h: u32) -> SessionDescriptor {
        // 2026-08-24는 월요일
        session_at(Utc.with_ymd_and_hms(2026, 8, 24, h, 0, 0).unwrap())
    }

    #[test]
    fn test_threshold_floors_at_one() {
        // 아시아 세션(LOW): base 1, 변동성 −1, HFT +2 → 2
        // Intraday: base 1, −1, −1 → 플로어 1
        let asian = session(3);
        assert_eq!(
            session_adjusted_threshold(StrategyKind::Intraday, &asian),
            1
        );
    }

    #[test]
    fn test_hft_threshold_drops_with_volatility() {
        // HFT는 변동성이 높을수록 임계값이 낮아진다
        let asian = session(3); // LOW
        let european = session(10); // HIGH
        let overlap = session(14); // VERY_HIGH

        let low = session_adjusted_threshold(StrategyKind::Hft, &asian);
        let high = session_adjusted_threshold(StrategyKind::Hft, &european);
        let very_high = session_adjusted_threshold(StrategyKind::Hft, &overlap);

        assert!(low > high);
        assert!(high >= very_high);
        assert_eq!(low, 2); // 1 − 1 + 2
        assert_eq!(high, 1); // 1 + 0 − 1 → 플로어 1
        assert_eq!(very_high, 1); // 1 + 1 − 1
    }

    #[test]
    fn test_scalping_stricter_off_peak() {
        let asian = session(3); // LOW
        let overlap = session(14); // VERY_HIGH

        // LOW: 1 − 1 + 1 = 1, VERY_HIGH: 1 + 1 + 0 = 2
        assert_eq!(session_adjusted_threshold(StrategyKind::Scalping, &asian), 1);
        assert_eq!(
            session_adjusted_threshold(StrategyKind::Scalping, &overlap),
            2
        );
    }

    #[test]
    fn test_arbitrage_follows_volatility_only() {
        let us = session(18); // MEDIUM
        let overlap = session(14); // VERY_HIGH

        assert_eq!(session_adjusted_threshold(StrategyKind::Arbitrage, &us), 1);
        assert_eq!(
            session_adjusted_threshold(StrategyKind::Arbitrage, &overlap),
            2
        );
    }
}
