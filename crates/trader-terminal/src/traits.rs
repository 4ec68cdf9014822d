//! 터미널 trait 정의.
//!
//! 트레이딩 루프가 의존하는 외부 협력자를 좁은 trait으로 추상화합니다:
//! - [`MarketTerminal`] — 주문/포지션/계좌를 다루는 터미널 바인딩
//! - [`MarketDataSource`] — 캔들 데이터 조회
//! - [`ConditionValidator`] — 심볼별 거래 가능 조건 검증
//! - [`ParameterSource`] — 전략/랏/TP/SL 파라미터 공급자
//! - [`ReportSink`] — 정기 리포트 발송

use async_trait::async_trait;
use rust_decimal::Decimal;
use trader_core::{
    AccountInfo, OrderRequest, OrderResult, Position, PriceSeries, StrategyKind,
};
use uuid::Uuid;

use crate::{TerminalError, TerminalResult};

/// 통합 터미널 인터페이스.
#[async_trait]
pub trait MarketTerminal: Send + Sync {
    /// 터미널 이름 반환.
    fn name(&self) -> &str;

    /// 연결 상태 확인.
    async fn connection_healthy(&self) -> bool;

    /// 터미널 재연결 시도.
    async fn reconnect(&self) -> TerminalResult<()>;

    /// 계좌 정보 조회.
    async fn account_info(&self) -> TerminalResult<AccountInfo>;

    /// 오픈 포지션 조회.
    async fn open_positions(&self) -> TerminalResult<Vec<Position>>;

    /// 새 주문 제출.
    async fn submit_order(&self, request: &OrderRequest) -> TerminalResult<OrderResult>;

    /// 포지션 청산.
    async fn close_position(&self, ticket: Uuid) -> TerminalResult<Position>;

    /// 오픈 포지션 수 조회.
    async fn open_position_count(&self) -> TerminalResult<u32> {
        Ok(self.open_positions().await?.len() as u32)
    }
}

/// 시세 데이터 소스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 심볼의 최근 캔들 조회.
    async fn fetch_bars(&self, symbol: &str, count: usize) -> TerminalResult<PriceSeries>;

    /// 여러 심볼의 캔들을 조회합니다. 실패한 심볼은 건너뜁니다.
    async fn fetch_many(&self, symbols: &[String], count: usize) -> Vec<PriceSeries> {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.fetch_bars(symbol, count).await {
                Ok(series) => out.push(series),
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "캔들 조회 실패, 심볼 건너뜀");
                }
            }
        }
        out
    }
}

/// 심볼별 거래 조건 검증자 (스프레드, 장 상태, 거래 가능 여부).
#[async_trait]
pub trait ConditionValidator: Send + Sync {
    /// 거래 가능 여부와 사유를 반환합니다.
    async fn validate(&self, symbol: &str) -> (bool, String);
}

/// 전략/주문 파라미터 공급자.
///
/// 프런트엔드나 설정 스토어가 이 trait 뒤에서 현재 파라미터를 제공합니다.
pub trait ParameterSource: Send + Sync {
    /// 현재 선택된 전략.
    fn strategy(&self) -> StrategyKind;

    /// 랏 크기 (전략 기본값 또는 사용자 설정값).
    fn lot_size(&self, strategy: StrategyKind) -> Decimal;

    /// 익절 거리 (pips).
    fn tp_pips(&self, strategy: StrategyKind) -> u32;

    /// 손절 거리 (pips).
    fn sl_pips(&self, strategy: StrategyKind) -> u32;

    /// 스캔 주기 (초).
    fn scan_interval_secs(&self) -> u64;

    /// 단일 심볼 선택 (None이면 기본 심볼 목록 사용).
    fn selected_symbol(&self) -> Option<String>;
}

/// 정기 리포트 발송 대상.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// 시간별 상태 리포트 발송.
    async fn send_report(&self, report: &str) -> TerminalResult<()>;
}

/// 아무 것도 하지 않는 리포트 싱크 (로그만 남김).
#[derive(Debug, Default)]
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn send_report(&self, report: &str) -> TerminalResult<()> {
        tracing::info!(report = %report, "시간별 리포트");
        Ok(())
    }
}

/// 항상 거래를 허용하는 검증자 (시뮬레이션/테스트용).
#[derive(Debug, Default)]
pub struct AlwaysTradable;

#[async_trait]
impl ConditionValidator for AlwaysTradable {
    async fn validate(&self, _symbol: &str) -> (bool, String) {
        (true, "ok".to_string())
    }
}

/// `TerminalError` 변환 헬퍼.
impl From<TerminalError> for trader_core::TraderError {
    fn from(e: TerminalError) -> Self {
        match e {
            TerminalError::NotConnected | TerminalError::ConnectionFailed(_) => {
                trader_core::TraderError::ConnectionUnavailable(e.to_string())
            }
            TerminalError::DataUnavailable(_) => {
                trader_core::TraderError::DataUnavailable(e.to_string())
            }
            TerminalError::OrderRejected(_) | TerminalError::PositionNotFound(_) => {
                trader_core::TraderError::TradeExecution(e.to_string())
            }
            TerminalError::Network(_) | TerminalError::Timeout(_) => {
                trader_core::TraderError::Network(e.to_string())
            }
            TerminalError::Internal(_) => trader_core::TraderError::Internal(e.to_string()),
        }
    }
}
