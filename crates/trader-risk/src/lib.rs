//! 계좌 보호 계층.
//!
//! 이 크레이트는 트레이딩 루프의 보호 장치를 제공합니다:
//! - 날짜 롤오버를 견디는 일일 거래/주문 카운터 (fail-open)
//! - 제출 직전의 주문 한도 게이트 (fail-closed)
//! - 증거금/낙폭 기반 계좌 점검과 비상 청산

pub mod counters;
pub mod gate;
pub mod monitor;

pub use counters::{CounterKind, CounterStatus, DailyCounterStore, DailyCounters};
pub use gate::OrderLimitGate;
pub use monitor::{RecoveryReport, RiskMonitor, RiskSnapshot};
