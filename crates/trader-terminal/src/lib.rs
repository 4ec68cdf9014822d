//! 트레이딩 터미널 추상화.
//!
//! 이 크레이트는 트레이딩 루프와 실제 터미널 사이의 경계를 정의합니다:
//! - 터미널/데이터/검증자/파라미터/리포트 trait
//! - 유계 재시도 헬퍼
//! - 페이퍼 트레이딩용 시뮬레이션 터미널

pub mod error;
pub mod params;
pub mod retry;
pub mod simulated;
pub mod traits;

pub use error::{TerminalError, TerminalResult};
pub use params::SettingsParameterSource;
pub use retry::{with_retry, DEFAULT_ATTEMPTS, DEFAULT_BACKOFF};
pub use simulated::{SimulatedConfig, SimulatedTerminal};
pub use traits::{
    AlwaysTradable, ConditionValidator, LogReportSink, MarketDataSource, MarketTerminal,
    ParameterSource, ReportSink,
};
