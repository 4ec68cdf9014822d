//! 주문 한도 게이트.
//!
//! 주문 제출 직전의 최종 관문입니다. 로컬 카운터와 터미널의
//! 실제 포지션 수 중 큰 값을 한도와 비교하며, 판단이 불가능하면
//! 거래를 막습니다 (fail-closed — 카운터와 반대 방향).

use std::sync::Arc;
use tracing::{error, info, warn};
use trader_core::SettingsStore;
use trader_terminal::{with_retry, MarketTerminal, DEFAULT_ATTEMPTS, DEFAULT_BACKOFF};

use crate::counters::DailyCounterStore;

/// 주문 한도 게이트.
pub struct OrderLimitGate {
    counters: Arc<DailyCounterStore>,
    terminal: Arc<dyn MarketTerminal>,
    settings: Arc<SettingsStore>,
}

impl OrderLimitGate {
    pub fn new(
        counters: Arc<DailyCounterStore>,
        terminal: Arc<dyn MarketTerminal>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            counters,
            terminal,
            settings,
        }
    }

    /// 새 주문을 허용할 수 있는지 확인합니다.
    ///
    /// `max(로컬 주문 수, 터미널 포지션 수) >= max_orders` 이면 거부.
    /// 터미널 조회는 3회, 100ms 간격으로 재시도합니다:
    /// - 재시도 소진(일시 에러): 터미널 수를 0으로 보고 경고
    /// - 치명 에러: 즉시 거부
    pub async fn check_order_limit(&self) -> bool {
        // 터미널 조회 동안 카운터 잠금을 잡지 않는다
        let local = self.counters.order_count().await;
        let max_open = self.settings.max_orders();

        let terminal = Arc::clone(&self.terminal);
        let authoritative = match with_retry(
            "open_position_count",
            DEFAULT_ATTEMPTS,
            DEFAULT_BACKOFF,
            || {
                let terminal = Arc::clone(&terminal);
                async move { terminal.open_position_count().await }
            },
        )
        .await
        {
            Ok(count) => count,
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "터미널 포지션 수 조회 재시도 소진, 0으로 간주");
                0
            }
            Err(e) => {
                error!(error = %e, "터미널 포지션 수 조회 불가, 주문 거부");
                return false;
            }
        };

        let effective = local.max(authoritative);
        if effective >= max_open {
            info!(
                local,
                authoritative,
                max_open,
                "주문 한도 도달, 신규 주문 거부"
            );
            false
        } else {
            true
        }
    }
}
