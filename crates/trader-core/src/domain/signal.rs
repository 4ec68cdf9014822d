//! 전략 평가 결과로 생성되는 매매 신호.
//!
//! 이 모듈은 전략 평가기가 생성하는 신호 관련 타입을 정의합니다:
//! - `TradeAction` - 수행할 액션 (매수/매도/없음)
//! - `SignalTag` - 개별 근거 신호
//! - `SignalResult` - 심볼 단위 평가 결과

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 전략이 제안하는 매매 액션.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    /// 매수 진입
    Buy,
    /// 매도 진입
    Sell,
    /// 액션 없음
    None,
}

impl TradeAction {
    /// 실행 가능한 액션인지 확인합니다.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, TradeAction::None)
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::None => write!(f, "NONE"),
        }
    }
}

/// 액션의 근거가 된 개별 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTag {
    /// RSI 과매도 구간
    RsiOversold,
    /// RSI 과매수 구간
    RsiOverbought,
    /// 단기 EMA가 SMA 위로 교차
    EmaAboveSma,
    /// 단기 EMA가 SMA 아래로 교차
    EmaBelowSma,
    /// 종가가 볼린저 하단 이탈
    PriceBelowLowerBand,
    /// 종가가 볼린저 상단 돌파
    PriceAboveUpperBand,
    /// 직전 구간 대비 상승 모멘텀
    MomentumUp,
    /// 직전 구간 대비 하락 모멘텀
    MomentumDown,
    /// 중심선 대비 가격 괴리 (차익거래용)
    MeanDivergence,
}

impl std::fmt::Display for SignalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignalTag::RsiOversold => "RSI oversold",
            SignalTag::RsiOverbought => "RSI overbought",
            SignalTag::EmaAboveSma => "EMA above SMA",
            SignalTag::EmaBelowSma => "EMA below SMA",
            SignalTag::PriceBelowLowerBand => "Price below lower band",
            SignalTag::PriceAboveUpperBand => "Price above upper band",
            SignalTag::MomentumUp => "Momentum up",
            SignalTag::MomentumDown => "Momentum down",
            SignalTag::MeanDivergence => "Mean divergence",
        };
        write!(f, "{}", name)
    }
}

/// 심볼 하나에 대한 전략 평가 결과.
///
/// 평가기가 생성하고 어드미션 파이프라인이 읽기 전용으로 소비합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    /// 평가 대상 심볼
    pub symbol: String,
    /// 제안 액션
    pub action: TradeAction,
    /// 근거 신호 목록
    pub signals: Vec<SignalTag>,
    /// 평가 시각
    pub evaluated_at: DateTime<Utc>,
}

impl SignalResult {
    /// 새 평가 결과를 생성합니다.
    pub fn new(symbol: impl Into<String>, action: TradeAction, signals: Vec<SignalTag>) -> Self {
        Self {
            symbol: symbol.into(),
            action,
            signals,
            evaluated_at: Utc::now(),
        }
    }

    /// 액션 없는 결과를 생성합니다.
    pub fn none(symbol: impl Into<String>) -> Self {
        Self::new(symbol, TradeAction::None, vec![])
    }

    /// 신호 강도 (근거 신호 수).
    pub fn strength(&self) -> u32 {
        self.signals.len() as u32
    }

    /// 실행 후보인지 확인합니다 (액션 존재 + 근거 신호 존재).
    pub fn is_candidate(&self) -> bool {
        self.action.is_actionable() && !self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_strength() {
        let result = SignalResult::new(
            "EURUSD",
            TradeAction::Buy,
            vec![SignalTag::RsiOversold, SignalTag::EmaAboveSma],
        );
        assert_eq!(result.strength(), 2);
        assert!(result.is_candidate());
    }

    #[test]
    fn test_none_result_is_not_candidate() {
        let result = SignalResult::none("EURUSD");
        assert_eq!(result.action, TradeAction::None);
        assert_eq!(result.strength(), 0);
        assert!(!result.is_candidate());
    }

    #[test]
    fn test_action_without_signals_is_not_candidate() {
        // 액션이 있어도 근거 신호가 비어 있으면 후보가 아니다
        let result = SignalResult::new("GBPUSD", TradeAction::Sell, vec![]);
        assert!(!result.is_candidate());
    }
}
