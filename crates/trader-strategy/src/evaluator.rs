//! 규칙 기반 전략 평가기.
//!
//! 지표가 붙은 시리즈를 전략별 규칙 집합에 통과시켜 매수/매도
//! 신호를 수집합니다. 평가 자체는 결정적이며 상태를 갖지 않습니다.
//!
//! 전략별 규칙:
//! - Scalping: RSI 극단값 + 볼린저 밴드 터치
//! - Intraday: 이동평균 교차 + RSI 극단값
//! - HFT: 단기 모멘텀 + 볼린저 밴드 터치
//! - Arbitrage: 평균 괴리 + RSI 극단값

use tracing::debug;
use trader_core::{EnrichedSeries, SignalResult, SignalTag, StrategyKind, TradeAction};

/// RSI 과매도 기준.
const RSI_OVERSOLD: f64 = 30.0;
/// RSI 과매수 기준.
const RSI_OVERBOUGHT: f64 = 70.0;
/// 평균 괴리 판정 비율 (0.1%).
const MEAN_DIVERGENCE_RATIO: f64 = 0.001;
/// 모멘텀 비교 구간 (캔들 수).
const MOMENTUM_LOOKBACK: usize = 3;

/// 전략 평가 엔진.
pub trait StrategyEngine: Send + Sync {
    /// 지표가 붙은 시리즈를 평가해 신호를 산출합니다.
    fn evaluate(&self, strategy: StrategyKind, enriched: &EnrichedSeries) -> SignalResult;
}

/// 방향이 붙은 개별 신호.
#[derive(Debug, Clone, Copy)]
struct DirectedSignal {
    tag: SignalTag,
    action: TradeAction,
}

/// 내장 규칙 기반 평가기.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleStrategyEngine;

impl RuleStrategyEngine {
    pub fn new() -> Self {
        Self
    }

    /// 지표에서 후보 신호를 모두 추출합니다.
    fn collect_signals(enriched: &EnrichedSeries) -> Vec<DirectedSignal> {
        let ind = &enriched.indicators;
        let close = enriched.last_close();
        let mut signals = Vec::new();

        if ind.rsi_14 < RSI_OVERSOLD {
            signals.push(DirectedSignal {
                tag: SignalTag::RsiOversold,
                action: TradeAction::Buy,
            });
        } else if ind.rsi_14 > RSI_OVERBOUGHT {
            signals.push(DirectedSignal {
                tag: SignalTag::RsiOverbought,
                action: TradeAction::Sell,
            });
        }

        if ind.ema_12 > ind.sma_20 {
            signals.push(DirectedSignal {
                tag: SignalTag::EmaAboveSma,
                action: TradeAction::Buy,
            });
        } else if ind.ema_12 < ind.sma_20 {
            signals.push(DirectedSignal {
                tag: SignalTag::EmaBelowSma,
                action: TradeAction::Sell,
            });
        }

        if close < ind.bb_lower {
            signals.push(DirectedSignal {
                tag: SignalTag::PriceBelowLowerBand,
                action: TradeAction::Buy,
            });
        } else if close > ind.bb_upper {
            signals.push(DirectedSignal {
                tag: SignalTag::PriceAboveUpperBand,
                action: TradeAction::Sell,
            });
        }

        let closes = enriched.series.closes_f64();
        if closes.len() > MOMENTUM_LOOKBACK {
            let past = closes[closes.len() - 1 - MOMENTUM_LOOKBACK];
            if close > past {
                signals.push(DirectedSignal {
                    tag: SignalTag::MomentumUp,
                    action: TradeAction::Buy,
                });
            } else if close < past {
                signals.push(DirectedSignal {
                    tag: SignalTag::MomentumDown,
                    action: TradeAction::Sell,
                });
            }
        }

        if ind.sma_20 > 0.0 {
            let divergence = (close - ind.sma_20) / ind.sma_20;
            if divergence.abs() > MEAN_DIVERGENCE_RATIO {
                // 평균 회귀: 평균 위면 매도, 아래면 매수
                signals.push(DirectedSignal {
                    tag: SignalTag::MeanDivergence,
                    action: if divergence > 0.0 {
                        TradeAction::Sell
                    } else {
                        TradeAction::Buy
                    },
                });
            }
        }

        signals
    }

    /// 전략이 사용하는 신호 태그인지 확인합니다.
    fn uses_tag(strategy: StrategyKind, tag: SignalTag) -> bool {
        use SignalTag::*;
        match strategy {
            StrategyKind::Scalping => matches!(
                tag,
                RsiOversold | RsiOverbought | PriceBelowLowerBand | PriceAboveUpperBand
            ),
            StrategyKind::Intraday => matches!(
                tag,
                EmaAboveSma | EmaBelowSma | RsiOversold | RsiOverbought
            ),
            StrategyKind::Hft => matches!(
                tag,
                MomentumUp | MomentumDown | PriceBelowLowerBand | PriceAboveUpperBand
            ),
            StrategyKind::Arbitrage => {
                matches!(tag, MeanDivergence | RsiOversold | RsiOverbought)
            }
        }
    }
}

impl StrategyEngine for RuleStrategyEngine {
    fn evaluate(&self, strategy: StrategyKind, enriched: &EnrichedSeries) -> SignalResult {
        let symbol = enriched.series.symbol.clone();
        let candidates: Vec<DirectedSignal> = Self::collect_signals(enriched)
            .into_iter()
            .filter(|s| Self::uses_tag(strategy, s.tag))
            .collect();

        let buy: Vec<SignalTag> = candidates
            .iter()
            .filter(|s| s.action == TradeAction::Buy)
            .map(|s| s.tag)
            .collect();
        let sell: Vec<SignalTag> = candidates
            .iter()
            .filter(|s| s.action == TradeAction::Sell)
            .map(|s| s.tag)
            .collect();

        let result = if buy.len() > sell.len() {
            SignalResult::new(symbol, TradeAction::Buy, buy)
        } else if sell.len() > buy.len() {
            SignalResult::new(symbol, TradeAction::Sell, sell)
        } else {
            // 동률이거나 신호 없음: 방향을 정하지 않는다
            SignalResult::none(symbol)
        };

        debug!(
            symbol = %result.symbol,
            strategy = %strategy,
            action = %result.action,
            strength = result.strength(),
            "전략 평가 완료"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use trader_core::{Candle, IndicatorSet, PriceSeries};

    fn enriched_with(closes: &[f64], indicators: IndicatorSet) -> EnrichedSeries {
        let now = Utc::now();
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let price = Decimal::from_f64(*close).unwrap();
                Candle {
                    time: now - Duration::minutes((closes.len() - i) as i64),
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    volume: Decimal::from(100),
                }
            })
            .collect();
        EnrichedSeries {
            series: PriceSeries::new("EURUSD", candles),
            indicators,
        }
    }

    fn flat_indicators(level: f64) -> IndicatorSet {
        IndicatorSet {
            sma_20: level,
            ema_12: level,
            rsi_14: 50.0,
            bb_upper: level,
            bb_middle: level,
            bb_lower: level,
        }
    }

    #[test]
    fn test_flat_data_yields_no_action() {
        let enriched = enriched_with(&[1.1; 25], flat_indicators(1.1));
        let engine = RuleStrategyEngine::new();

        for strategy in StrategyKind::ALL {
            let result = engine.evaluate(strategy, &enriched);
            assert_eq!(result.action, TradeAction::None);
            assert!(result.signals.is_empty());
        }
    }

    #[test]
    fn test_scalping_buys_oversold_band_touch() {
        let mut indicators = flat_indicators(1.1);
        indicators.rsi_14 = 25.0;
        indicators.bb_lower = 1.0950;
        indicators.bb_upper = 1.1100;
        // 종가 1.0940 < 하단 밴드
        let mut closes = vec![1.1; 24];
        closes.push(1.0940);
        let enriched = enriched_with(&closes, indicators);

        let result = RuleStrategyEngine::new().evaluate(StrategyKind::Scalping, &enriched);
        assert_eq!(result.action, TradeAction::Buy);
        assert!(result.signals.contains(&SignalTag::RsiOversold));
        assert!(result.signals.contains(&SignalTag::PriceBelowLowerBand));
        assert_eq!(result.strength(), 2);
    }

    #[test]
    fn test_intraday_sells_on_bear_cross_overbought() {
        let mut indicators = flat_indicators(1.1);
        indicators.ema_12 = 1.0980;
        indicators.sma_20 = 1.1000;
        indicators.rsi_14 = 75.0;
        let enriched = enriched_with(&[1.1; 25], indicators);

        let result = RuleStrategyEngine::new().evaluate(StrategyKind::Intraday, &enriched);
        assert_eq!(result.action, TradeAction::Sell);
        assert!(result.signals.contains(&SignalTag::EmaBelowSma));
        assert!(result.signals.contains(&SignalTag::RsiOverbought));
    }

    #[test]
    fn test_hft_follows_momentum() {
        let mut indicators = flat_indicators(1.1);
        indicators.bb_upper = 1.1200;
        indicators.bb_lower = 1.0800;
        // 최근 3캔들 대비 상승
        let closes = vec![1.1000, 1.1000, 1.1000, 1.1001, 1.1002, 1.1005];
        let enriched = enriched_with(&closes, indicators);

        let result = RuleStrategyEngine::new().evaluate(StrategyKind::Hft, &enriched);
        assert_eq!(result.action, TradeAction::Buy);
        assert!(result.signals.contains(&SignalTag::MomentumUp));
    }

    #[test]
    fn test_arbitrage_fades_divergence() {
        let mut indicators = flat_indicators(1.1);
        indicators.sma_20 = 1.1000;
        // 종가가 평균보다 0.3% 위 → 매도
        let mut closes = vec![1.1; 24];
        closes.push(1.1033);
        let enriched = enriched_with(&closes, indicators);

        let result = RuleStrategyEngine::new().evaluate(StrategyKind::Arbitrage, &enriched);
        assert_eq!(result.action, TradeAction::Sell);
        assert!(result.signals.contains(&SignalTag::MeanDivergence));
    }

    #[test]
    fn test_conflicting_signals_tie_is_none() {
        let mut indicators = flat_indicators(1.1);
        // 과매도(매수) + 상단 밴드 돌파(매도) → 동률
        indicators.rsi_14 = 25.0;
        indicators.bb_upper = 1.0990;
        let mut closes = vec![1.1; 24];
        closes.push(1.1000);
        let enriched = enriched_with(&closes, indicators);

        let result = RuleStrategyEngine::new().evaluate(StrategyKind::Scalping, &enriched);
        assert_eq!(result.action, TradeAction::None);
    }
}
