//! 기술적 지표 엔진.
//!
//! ta-rs 라이브러리 기반으로 캔들 시리즈에 지표 컬럼을 추가합니다.
//! - SMA 20 / EMA 12 (추세)
//! - RSI 14 (모멘텀)
//! - Bollinger Bands 20/2 (변동성)

use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;
use tracing::debug;
use trader_core::{EnrichedSeries, IndicatorSet, PriceSeries};

/// 캔들 시리즈에서 지표를 계산하는 엔진.
pub trait IndicatorEngine: Send + Sync {
    /// 지표 컬럼을 계산해 시리즈에 붙입니다.
    ///
    /// 시리즈가 가장 긴 룩백보다 짧으면 `None`을 반환합니다.
    fn compute(&self, series: &PriceSeries) -> Option<EnrichedSeries>;
}

/// ta-rs 기반 지표 엔진.
#[derive(Debug, Clone, Copy)]
pub struct TaIndicatorEngine {
    sma_period: usize,
    ema_period: usize,
    rsi_period: usize,
    bb_period: usize,
    bb_multiplier: f64,
}

impl Default for TaIndicatorEngine {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 12,
            rsi_period: 14,
            bb_period: 20,
            bb_multiplier: 2.0,
        }
    }
}

impl TaIndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필요한 최소 캔들 수.
    pub fn min_bars(&self) -> usize {
        self.sma_period
            .max(self.ema_period)
            .max(self.rsi_period)
            .max(self.bb_period)
    }
}

impl IndicatorEngine for TaIndicatorEngine {
    fn compute(&self, series: &PriceSeries) -> Option<EnrichedSeries> {
        let closes = series.closes_f64();
        if closes.len() < self.min_bars() {
            debug!(
                symbol = %series.symbol,
                bars = closes.len(),
                required = self.min_bars(),
                "지표 계산에 캔들 부족"
            );
            return None;
        }

        let mut sma = SimpleMovingAverage::new(self.sma_period).ok()?;
        let mut ema = ExponentialMovingAverage::new(self.ema_period).ok()?;
        let mut rsi = RelativeStrengthIndex::new(self.rsi_period).ok()?;
        let mut bb = BollingerBands::new(self.bb_period, self.bb_multiplier).ok()?;

        let mut sma_last = 0.0;
        let mut ema_last = 0.0;
        let mut rsi_last = 0.0;
        let mut bb_last = None;
        for close in &closes {
            sma_last = sma.next(*close);
            ema_last = ema.next(*close);
            rsi_last = rsi.next(*close);
            bb_last = Some(bb.next(*close));
        }
        let bands = bb_last?;

        Some(EnrichedSeries {
            series: series.clone(),
            indicators: IndicatorSet {
                sma_20: sma_last,
                ema_12: ema_last,
                rsi_14: rsi_last,
                bb_upper: bands.upper,
                bb_middle: bands.average,
                bb_lower: bands.lower,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use trader_core::Candle;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
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
        PriceSeries::new("EURUSD", candles)
    }

    #[test]
    fn test_short_series_returns_none() {
        let engine = TaIndicatorEngine::new();
        let series = series_from_closes(&[1.1; 10]);
        assert!(engine.compute(&series).is_none());
    }

    #[test]
    fn test_flat_series_indicators_converge() {
        let engine = TaIndicatorEngine::new();
        let series = series_from_closes(&[1.1; 30]);
        let enriched = engine.compute(&series).unwrap();

        let ind = &enriched.indicators;
        assert!((ind.sma_20 - 1.1).abs() < 1e-9);
        assert!((ind.ema_12 - 1.1).abs() < 1e-9);
        // 변동이 없으면 밴드가 중앙선으로 수렴한다
        assert!((ind.bb_upper - ind.bb_lower).abs() < 1e-9);
        assert!((ind.bb_middle - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_rising_series_rsi_high() {
        let closes: Vec<f64> = (0..40).map(|i| 1.10 + 0.001 * i as f64).collect();
        let engine = TaIndicatorEngine::new();
        let enriched = engine.compute(&series_from_closes(&closes)).unwrap();

        // 단조 상승이면 RSI는 과매수 영역
        assert!(enriched.indicators.rsi_14 > 70.0);
        assert!(enriched.indicators.ema_12 > enriched.indicators.sma_20);
    }
}
