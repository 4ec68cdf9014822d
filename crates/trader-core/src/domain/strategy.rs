//! 트레이딩 전략 종류 및 전략별 기본 파라미터.
//!
//! 이 모듈은 지원 전략 목록과 전략별 기본 TP/SL/랏 테이블을 정의합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 알 수 없는 전략에 대한 TP 기본값 (pips).
pub const FALLBACK_TP_PIPS: u32 = 20;
/// 알 수 없는 전략에 대한 SL 기본값 (pips).
pub const FALLBACK_SL_PIPS: u32 = 10;

/// 지원하는 트레이딩 전략.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// 단기 스캘핑
    Scalping,
    /// 데이 트레이딩
    Intraday,
    /// 차익거래
    Arbitrage,
    /// 고빈도 트레이딩
    Hft,
}

impl StrategyKind {
    /// 전체 전략 목록.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Scalping,
        StrategyKind::Intraday,
        StrategyKind::Arbitrage,
        StrategyKind::Hft,
    ];

    /// 전략별 기본 익절 거리 (pips).
    pub fn default_tp_pips(&self) -> u32 {
        match self {
            StrategyKind::Scalping => 15,
            StrategyKind::Hft => 8,
            StrategyKind::Intraday => 50,
            StrategyKind::Arbitrage => 25,
        }
    }

    /// 전략별 기본 손절 거리 (pips).
    pub fn default_sl_pips(&self) -> u32 {
        match self {
            StrategyKind::Scalping => 8,
            StrategyKind::Hft => 4,
            StrategyKind::Intraday => 25,
            StrategyKind::Arbitrage => 10,
        }
    }

    /// 전략별 기본 랏 크기.
    pub fn default_lot(&self) -> Decimal {
        match self {
            StrategyKind::Scalping => dec!(0.01),
            StrategyKind::Intraday => dec!(0.02),
            StrategyKind::Arbitrage => dec!(0.05),
            StrategyKind::Hft => dec!(0.01),
        }
    }

    /// 전략별 기본 신호 강도 임계값.
    pub fn base_signal_threshold(&self) -> u32 {
        // 현재는 모든 전략이 동일한 기준에서 출발한다.
        // 세션 변동성 보정은 trader-session에서 더해진다.
        1
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Scalping => write!(f, "Scalping"),
            StrategyKind::Intraday => write!(f, "Intraday"),
            StrategyKind::Arbitrage => write!(f, "Arbitrage"),
            StrategyKind::Hft => write!(f, "HFT"),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scalping" => Ok(StrategyKind::Scalping),
            "intraday" => Ok(StrategyKind::Intraday),
            "arbitrage" => Ok(StrategyKind::Arbitrage),
            "hft" => Ok(StrategyKind::Hft),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

/// 전략 이름으로 기본 TP를 조회합니다 (알 수 없는 전략은 폴백 값).
pub fn tp_default_for(name: &str) -> u32 {
    name.parse::<StrategyKind>()
        .map(|s| s.default_tp_pips())
        .unwrap_or(FALLBACK_TP_PIPS)
}

/// 전략 이름으로 기본 SL을 조회합니다 (알 수 없는 전략은 폴백 값).
pub fn sl_default_for(name: &str) -> u32 {
    name.parse::<StrategyKind>()
        .map(|s| s.default_sl_pips())
        .unwrap_or(FALLBACK_SL_PIPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trip() {
        for kind in StrategyKind::ALL {
            let parsed: StrategyKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("Martingale".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(StrategyKind::Scalping.default_tp_pips(), 15);
        assert_eq!(StrategyKind::Hft.default_sl_pips(), 4);
        assert_eq!(StrategyKind::Intraday.default_tp_pips(), 50);
        assert_eq!(StrategyKind::Arbitrage.default_sl_pips(), 10);
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        assert_eq!(tp_default_for("Martingale"), FALLBACK_TP_PIPS);
        assert_eq!(sl_default_for("Martingale"), FALLBACK_SL_PIPS);
        assert_eq!(tp_default_for("HFT"), 8);
    }
}
