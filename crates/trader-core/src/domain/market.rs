//! 시장 데이터 구조체.
//!
//! 이 모듈은 데이터 소스와 지표 엔진 사이를 오가는 타입을 정의합니다:
//! - `Candle` - OHLCV 봉 하나
//! - `PriceSeries` - 심볼 하나의 봉 시퀀스
//! - `IndicatorSet` / `EnrichedSeries` - 지표가 계산된 시리즈

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 봉.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// 봉 시작 시각
    pub time: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

/// 심볼 하나의 가격 시리즈.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    /// 심볼
    pub symbol: String,
    /// 시간 오름차순 봉 목록
    pub candles: Vec<Candle>,
}

impl PriceSeries {
    /// 새 시리즈를 생성합니다.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    /// 봉 개수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 시리즈가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 마지막 봉.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// 종가 시퀀스를 f64로 반환합니다 (지표 계산용).
    pub fn closes_f64(&self) -> Vec<f64> {
        self.candles
            .iter()
            .map(|c| c.close.to_f64().unwrap_or(0.0))
            .collect()
    }
}

/// 시리즈 마지막 시점의 지표 값 묶음.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// 20기간 단순이동평균
    pub sma_20: f64,
    /// 12기간 지수이동평균
    pub ema_12: f64,
    /// 14기간 RSI
    pub rsi_14: f64,
    /// 볼린저 상단 (20, 2σ)
    pub bb_upper: f64,
    /// 볼린저 중심선
    pub bb_middle: f64,
    /// 볼린저 하단
    pub bb_lower: f64,
}

/// 지표가 계산된 가격 시리즈.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    /// 원본 시리즈
    pub series: PriceSeries,
    /// 마지막 시점 지표 값
    pub indicators: IndicatorSet,
}

impl EnrichedSeries {
    /// 마지막 종가를 f64로 반환합니다.
    pub fn last_close(&self) -> f64 {
        self.series
            .last()
            .map(|c| c.close.to_f64().unwrap_or(0.0))
            .unwrap_or(0.0)
    }
}

/// 심볼의 pip 크기.
///
/// JPY 크로스는 0.01, 귀금속은 0.1, 그 외 메이저는 0.0001.
pub fn pip_size(symbol: &str) -> Decimal {
    let upper = symbol.to_uppercase();
    if upper.contains("XAU") || upper.contains("XAG") || upper.contains("GOLD") {
        Decimal::new(1, 1) // 0.1
    } else if upper.contains("JPY") {
        Decimal::new(1, 2) // 0.01
    } else {
        Decimal::new(1, 4) // 0.0001
    }
}
