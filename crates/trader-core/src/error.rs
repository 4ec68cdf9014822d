//! 트레이딩 시스템의 에러 타입.
//!
//! 이 모듈은 트레이딩 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 트레이딩 에러.
#[derive(Debug, Error)]
pub enum TraderError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 한도 값이 허용 범위를 벗어남
    #[error("잘못된 한도 값: {0}")]
    InvalidLimit(String),

    /// 터미널 연결 불가
    #[error("터미널 연결 불가: {0}")]
    ConnectionUnavailable(String),

    /// 심볼 데이터 조회 실패
    #[error("데이터 없음: {0}")]
    DataUnavailable(String),

    /// 지표 계산 실패
    #[error("지표 계산 실패: {0}")]
    IndicatorFailure(String),

    /// 주문 실행 실패
    #[error("주문 실행 실패: {0}")]
    TradeExecution(String),

    /// 리스크 점검 실패 (소프트 — 루프는 계속)
    #[error("리스크 점검 실패: {0}")]
    RiskCheckFailure(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 트레이딩 작업을 위한 Result 타입.
pub type TraderResult<T> = Result<T, TraderError>;

impl TraderError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TraderError::Network(_) | TraderError::DataUnavailable(_)
        )
    }

    /// 심볼 단위로 격리되는 에러인지 확인합니다.
    ///
    /// 격리 에러는 해당 심볼만 건너뛰고 스캔을 계속합니다.
    pub fn is_symbol_scoped(&self) -> bool {
        matches!(
            self,
            TraderError::DataUnavailable(_)
                | TraderError::IndicatorFailure(_)
                | TraderError::TradeExecution(_)
        )
    }
}

impl From<serde_json::Error> for TraderError {
    fn from(err: serde_json::Error) -> Self {
        TraderError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let network_err = TraderError::Network("timeout".to_string());
        assert!(network_err.is_retryable());

        let limit_err = TraderError::InvalidLimit("0".to_string());
        assert!(!limit_err.is_retryable());
    }

    #[test]
    fn test_error_symbol_scoped() {
        let data_err = TraderError::DataUnavailable("EURUSD".to_string());
        assert!(data_err.is_symbol_scoped());

        let conn_err = TraderError::ConnectionUnavailable("terminal down".to_string());
        assert!(!conn_err.is_symbol_scoped());
    }
}
