//! 트레이딩 도메인 모델.

pub mod account;
pub mod market;
pub mod order;
pub mod signal;
pub mod strategy;

pub use account::{AccountInfo, Position};
pub use market::{pip_size, Candle, EnrichedSeries, IndicatorSet, PriceSeries};
pub use order::{OrderRequest, OrderResult, TpSl, TpSlUnit};
pub use signal::{SignalResult, SignalTag, TradeAction};
pub use strategy::{
    sl_default_for, tp_default_for, StrategyKind, FALLBACK_SL_PIPS, FALLBACK_TP_PIPS,
};
