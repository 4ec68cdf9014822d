//! 계좌 리스크 모니터.
//!
//! 매 틱마다 계좌 상태를 새로 읽어 하드/소프트 점검을 수행합니다.
//! 스냅샷은 틱 간에 캐시되지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{error, info, warn};
use trader_core::{TraderError, TraderResult};
use trader_terminal::MarketTerminal;

use crate::counters::DailyCounterStore;

/// 하드 게이트 최소 증거금 수준 (%).
const MIN_MARGIN_LEVEL_PCT: Decimal = dec!(200);
/// 소프트 경고 증거금 수준 (%).
const CRITICAL_MARGIN_LEVEL_PCT: Decimal = dec!(150);
/// 하드 게이트 최대 낙폭 (equity/balance 하한 0.80).
const MIN_EQUITY_RATIO: Decimal = dec!(0.80);
/// 소프트 경고 낙폭 (equity/balance 하한 0.85).
const WARN_EQUITY_RATIO: Decimal = dec!(0.85);

/// 계좌 상태의 즉석 스냅샷.
#[derive(Debug, Clone)]
pub struct RiskSnapshot {
    pub balance: Decimal,
    pub equity: Decimal,
    pub margin: Decimal,
    pub margin_free: Decimal,
    /// 오픈 포지션 수
    pub open_positions: u32,
    /// 증거금 수준 (%), 증거금 0이면 0
    pub margin_level_pct: Decimal,
    /// equity/balance, 잔고가 0 이하이면 1
    pub drawdown_ratio: Decimal,
    /// 계좌 거래 허용 여부
    pub trade_allowed: bool,
}

/// 소프트 점검 결과.
#[derive(Debug, Clone, Default)]
pub struct RecoveryReport {
    /// 발견된 경고 메시지
    pub warnings: Vec<String>,
    /// 즉시 조치가 필요한 위험 상태 여부
    pub critical: bool,
}

impl RecoveryReport {
    pub fn is_healthy(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// 계좌 보호 점검기.
pub struct RiskMonitor {
    terminal: Arc<dyn MarketTerminal>,
    counters: Arc<DailyCounterStore>,
}

impl RiskMonitor {
    pub fn new(terminal: Arc<dyn MarketTerminal>, counters: Arc<DailyCounterStore>) -> Self {
        Self { terminal, counters }
    }

    /// 계좌 상태를 새로 읽어 스냅샷을 만듭니다.
    pub async fn snapshot(&self) -> TraderResult<RiskSnapshot> {
        let account = self
            .terminal
            .account_info()
            .await
            .map_err(|e| TraderError::RiskCheckFailure(e.to_string()))?;
        let open_positions = self
            .terminal
            .open_position_count()
            .await
            .map_err(|e| TraderError::RiskCheckFailure(e.to_string()))?;

        let drawdown_ratio = if account.balance > Decimal::ZERO {
            account.equity / account.balance
        } else {
            Decimal::ONE
        };

        Ok(RiskSnapshot {
            balance: account.balance,
            equity: account.equity,
            margin: account.margin,
            margin_free: account.margin_free,
            open_positions,
            margin_level_pct: account.margin_level_pct(),
            drawdown_ratio,
            trade_allowed: account.trade_allowed,
        })
    }

    /// 하드 리스크 점검. 위반 시 신규 거래를 막아야 합니다.
    ///
    /// 점검 항목: 계좌 거래 허용, 잔고 > 0, 증거금 수준 >= 200%,
    /// 낙폭 <= 20%, 일일 거래 한도 미도달.
    pub async fn risk_check(&self) -> TraderResult<bool> {
        let snapshot = self.snapshot().await?;

        if !snapshot.trade_allowed {
            warn!("계좌 거래 비활성화 상태");
            return Ok(false);
        }
        if snapshot.balance <= Decimal::ZERO {
            warn!(balance = %snapshot.balance, "잔고 없음");
            return Ok(false);
        }
        if snapshot.margin > Decimal::ZERO && snapshot.margin_level_pct < MIN_MARGIN_LEVEL_PCT {
            warn!(
                margin_level = %snapshot.margin_level_pct,
                minimum = %MIN_MARGIN_LEVEL_PCT,
                "증거금 수준 부족"
            );
            return Ok(false);
        }
        if snapshot.drawdown_ratio < MIN_EQUITY_RATIO {
            warn!(
                drawdown_ratio = %snapshot.drawdown_ratio,
                minimum = %MIN_EQUITY_RATIO,
                "낙폭 한도 초과"
            );
            return Ok(false);
        }
        if self.counters.daily_limit_reached().await {
            info!("일일 거래 한도 도달");
            return Ok(false);
        }

        Ok(true)
    }

    /// 소프트 점검. 경고만 남기고 루프는 계속됩니다.
    pub async fn auto_recovery_check(&self) -> TraderResult<RecoveryReport> {
        let snapshot = self.snapshot().await?;
        let mut report = RecoveryReport::default();

        if snapshot.margin > Decimal::ZERO && snapshot.margin_level_pct < CRITICAL_MARGIN_LEVEL_PCT
        {
            report.critical = true;
            let message = format!(
                "margin level {}% below critical {}%",
                snapshot.margin_level_pct, CRITICAL_MARGIN_LEVEL_PCT
            );
            error!(margin_level = %snapshot.margin_level_pct, "증거금 수준 위험");
            report.warnings.push(message);
        }
        if snapshot.drawdown_ratio < WARN_EQUITY_RATIO {
            let message = format!(
                "drawdown ratio {} below warning {}",
                snapshot.drawdown_ratio, WARN_EQUITY_RATIO
            );
            warn!(drawdown_ratio = %snapshot.drawdown_ratio, "낙폭 경고 수준");
            report.warnings.push(message);
        }

        Ok(report)
    }

    /// 모든 오픈 포지션을 청산합니다. 청산한 포지션 수를 반환합니다.
    pub async fn emergency_close_all(&self) -> u32 {
        let positions = match self.terminal.open_positions().await {
            Ok(positions) => positions,
            Err(e) => {
                error!(error = %e, "비상 청산: 포지션 조회 실패");
                return 0;
            }
        };

        let mut closed = 0u32;
        for position in positions {
            match self.terminal.close_position(position.ticket).await {
                Ok(closed_position) => {
                    closed += 1;
                    self.counters.decrement_order().await;
                    info!(
                        ticket = %closed_position.ticket,
                        symbol = %closed_position.symbol,
                        profit = %closed_position.profit,
                        "비상 청산 완료"
                    );
                }
                Err(e) => {
                    error!(ticket = %position.ticket, error = %e, "비상 청산 실패");
                }
            }
        }
        closed
    }
}
