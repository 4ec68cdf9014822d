//! 엔진 에러 타입.

use thiserror::Error;
use trader_core::TraderError;

/// 트레이딩 루프 제어 에러.
#[derive(Debug, Error)]
pub enum EngineError {
    /// 터미널 연결 불가로 시작 거부
    #[error("Terminal connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// 루프 태스크가 기동 직후 살아있지 않음
    #[error("Trading loop failed to start: {0}")]
    ThreadStartFailure(String),

    /// 루프가 이미 실행 중
    #[error("Trading loop already running")]
    AlreadyRunning,

    /// 틱 경계에서 잡힌 치명 에러
    #[error("Critical loop error: {0}")]
    CriticalLoop(String),

    /// 코어 에러 전파
    #[error(transparent)]
    Core(#[from] TraderError),
}

/// 엔진 작업을 위한 Result 타입.
pub type EngineResult<T> = Result<T, EngineError>;
