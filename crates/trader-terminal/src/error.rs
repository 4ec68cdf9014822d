//! 터미널 에러 타입.

use thiserror::Error;

/// 트레이딩 터미널 관련 에러.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// 터미널 연결 없음
    #[error("Terminal not connected")]
    NotConnected,

    /// 연결/재연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// 시세 데이터 없음
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// 네트워크 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 주문 거부됨
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// 포지션을 찾을 수 없음
    #[error("Position not found: {0}")]
    PositionNotFound(String),

    /// 내부 에러
    #[error("Internal terminal error: {0}")]
    Internal(String),
}

impl TerminalError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TerminalError::Network(_)
                | TerminalError::Timeout(_)
                | TerminalError::DataUnavailable(_)
        )
    }
}

/// 터미널 작업을 위한 Result 타입.
pub type TerminalResult<T> = Result<T, TerminalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(TerminalError::Network("reset".to_string()).is_retryable());
        assert!(TerminalError::Timeout("10s".to_string()).is_retryable());
        assert!(!TerminalError::NotConnected.is_retryable());
        assert!(!TerminalError::OrderRejected("margin".to_string()).is_retryable());
    }
}
