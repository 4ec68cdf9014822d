//! 일일 거래/주문 카운터.
//!
//! 날짜가 바뀌면 접근 시점에 지연 초기화되는 카운터 상태 머신입니다.
//! 카운터 장애로 루프가 멈추지 않도록, 검증 setter를 제외한 모든
//! API는 실패하지 않습니다 (fail-open).

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use trader_core::{SettingsStore, TraderResult};

/// 카운터 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// 오늘 체결된 거래 수
    Trades,
    /// 현재 추적 중인 주문 수
    Orders,
}

/// 카운터 상태 스냅샷.
#[derive(Debug, Clone, Copy)]
pub struct CounterStatus {
    /// 현재 값
    pub current: u32,
    /// 한도
    pub max: u32,
    /// 사용률 (%)
    pub percent_used: f64,
    /// 남은 수
    pub remaining: u32,
}

/// 날짜가 붙은 카운터 쌍.
#[derive(Debug)]
pub struct DailyCounters {
    /// 카운터가 속한 날짜
    pub date: NaiveDate,
    /// 오늘 체결된 거래 수
    pub trade_count: u32,
    /// 추적 중인 주문 수
    pub order_count: u32,
}

impl DailyCounters {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            trade_count: 0,
            order_count: 0,
        }
    }

    /// 저장된 날짜가 오늘과 다르면 두 카운터를 초기화합니다.
    fn check_rollover(&mut self, today: NaiveDate) {
        if self.date != today {
            info!(
                from = %self.date,
                to = %today,
                dropped_trades = self.trade_count,
                dropped_orders = self.order_count,
                "날짜 변경, 일일 카운터 초기화"
            );
            *self = Self::new(today);
        }
    }
}

/// 설정 스토어와 연동되는 일일 카운터 스토어.
///
/// 모든 공개 연산은 시작 시 롤오버를 먼저 적용합니다. 한도 변경은
/// 설정 스토어의 검증을 통과해야만 반영되고, 성공 시 함께 저장됩니다.
pub struct DailyCounterStore {
    inner: Mutex<DailyCounters>,
    settings: Arc<SettingsStore>,
}

impl DailyCounterStore {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            inner: Mutex::new(DailyCounters::new(Utc::now().date_naive())),
            settings,
        }
    }

    /// 롤오버가 적용된 카운터 가드를 얻습니다.
    async fn lock(&self) -> MutexGuard<'_, DailyCounters> {
        let mut guard = self.inner.lock().await;
        guard.check_rollover(Utc::now().date_naive());
        guard
    }

    /// 거래 카운터를 1 올립니다.
    pub async fn increment_trade(&self) -> u32 {
        let mut guard = self.lock().await;
        guard.trade_count += 1;
        debug!(trade_count = guard.trade_count, "거래 카운터 증가");
        guard.trade_count
    }

    /// 주문 카운터를 1 올립니다.
    pub async fn increment_order(&self) -> u32 {
        let mut guard = self.lock().await;
        guard.order_count += 1;
        debug!(order_count = guard.order_count, "주문 카운터 증가");
        guard.order_count
    }

    /// 주문 카운터를 1 내립니다. 0 아래로 내려가지 않습니다.
    pub async fn decrement_order(&self) -> u32 {
        let mut guard = self.lock().await;
        guard.order_count = guard.order_count.saturating_sub(1);
        guard.order_count
    }

    /// 주문 카운터를 0으로 초기화합니다.
    pub async fn reset_orders(&self) {
        let mut guard = self.lock().await;
        guard.order_count = 0;
        info!("주문 카운터 초기화");
    }

    /// 오늘 거래 수.
    pub async fn trade_count(&self) -> u32 {
        self.lock().await.trade_count
    }

    /// 추적 중인 주문 수.
    pub async fn order_count(&self) -> u32 {
        self.lock().await.order_count
    }

    /// 일일 거래 한도에 도달했는지 확인합니다.
    pub async fn daily_limit_reached(&self) -> bool {
        let guard = self.lock().await;
        guard.trade_count >= self.settings.max_daily_orders()
    }

    /// 카운터 상태를 조회합니다.
    pub async fn status(&self, kind: CounterKind) -> CounterStatus {
        let guard = self.lock().await;
        let (current, max) = match kind {
            CounterKind::Trades => (guard.trade_count, self.settings.max_daily_orders()),
            CounterKind::Orders => (guard.order_count, self.settings.max_orders()),
        };
        let percent_used = if max > 0 {
            current as f64 / max as f64 * 100.0
        } else {
            0.0
        };
        CounterStatus {
            current,
            max,
            percent_used,
            remaining: max.saturating_sub(current),
        }
    }

    /// 일일 거래 한도를 변경합니다 (1–1000).
    ///
    /// 범위 밖 값은 거부되고 기존 한도가 유지됩니다.
    pub async fn set_max_daily(&self, value: u32) -> TraderResult<()> {
        self.settings.set_max_daily_orders(value)?;
        info!(max_daily_orders = value, "일일 거래 한도 변경");
        Ok(())
    }

    /// 동시 주문 한도를 변경합니다 (1–100).
    pub async fn set_max_open(&self, value: u32) -> TraderResult<()> {
        self.settings.set_max_orders(value)?;
        info!(max_orders = value, "동시 주문 한도 변경");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn set_date_for_test(&self, date: NaiveDate) {
        self.inner.lock().await.date = date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trader_core::BotConfig;

    fn store() -> DailyCounterStore {
        DailyCounterStore::new(Arc::new(SettingsStore::in_memory(BotConfig::default())))
    }

    #[tokio::test]
    async fn test_increment_and_decrement_floor() {
        let counters = store();
        assert_eq!(counters.increment_order().await, 1);
        assert_eq!(counters.increment_order().await, 2);
        assert_eq!(counters.decrement_order().await, 1);
        assert_eq!(counters.decrement_order().await, 0);
        // 0에서 더 내려가지 않는다
        assert_eq!(counters.decrement_order().await, 0);
    }

    #[tokio::test]
    async fn test_rollover_resets_both_counters_once() {
        let counters = store();
        counters.increment_trade().await;
        counters.increment_order().await;

        // 어제 날짜로 되돌리면 다음 접근에서 초기화된다
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        counters.set_date_for_test(yesterday).await;

        assert_eq!(counters.trade_count().await, 0);
        assert_eq!(counters.order_count().await, 0);

        // 같은 날의 반복 접근은 멱등하다
        counters.increment_trade().await;
        assert_eq!(counters.trade_count().await, 1);
        assert_eq!(counters.trade_count().await, 1);
    }

    #[tokio::test]
    async fn test_daily_limit_reached() {
        let settings = Arc::new(SettingsStore::in_memory(BotConfig::default()));
        settings.set_max_daily_orders(2).unwrap();
        let counters = DailyCounterStore::new(settings);

        assert!(!counters.daily_limit_reached().await);
        counters.increment_trade().await;
        assert!(!counters.daily_limit_reached().await);
        counters.increment_trade().await;
        assert!(counters.daily_limit_reached().await);
    }

    #[tokio::test]
    async fn test_status_percentages() {
        let settings = Arc::new(SettingsStore::in_memory(BotConfig::default()));
        settings.set_max_daily_orders(10).unwrap();
        let counters = DailyCounterStore::new(settings);

        counters.increment_trade().await;
        counters.increment_trade().await;
        counters.increment_trade().await;

        let status = counters.status(CounterKind::Trades).await;
        assert_eq!(status.current, 3);
        assert_eq!(status.max, 10);
        assert_eq!(status.remaining, 7);
        assert!((status.percent_used - 30.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_set_max_daily_rejects_out_of_range() {
        let counters = store();
        assert!(counters.set_max_daily(0).await.is_err());
        assert!(counters.set_max_daily(1001).await.is_err());
        assert!(counters.set_max_daily(1).await.is_ok());
        assert!(counters.set_max_daily(1000).await.is_ok());

        assert!(counters.set_max_open(0).await.is_err());
        assert!(counters.set_max_open(101).await.is_err());
        assert!(counters.set_max_open(100).await.is_ok());
    }
}
