//! 트레이딩 봇 공통 코어 라이브러리.
//!
//! 워크스페이스 전체가 공유하는 기반 타입을 제공합니다:
//! - 도메인 모델 (전략, 신호, 시세, 주문, 계좌)
//! - 봇 설정 문서와 검증 스토어
//! - 공통 에러 타입
//! - 로깅 초기화

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::{BotConfig, SettingsStore};
pub use domain::{
    pip_size, sl_default_for, tp_default_for, AccountInfo, Candle, EnrichedSeries, IndicatorSet,
    OrderRequest, OrderResult, Position, PriceSeries, SignalResult, SignalTag, StrategyKind,
    TpSl, TpSlUnit, TradeAction, FALLBACK_SL_PIPS, FALLBACK_TP_PIPS,
};
pub use error::{TraderError, TraderResult};
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
