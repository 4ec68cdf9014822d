//! 시뮬레이션 터미널 구현.
//!
//! 페이퍼 트레이딩과 테스트를 위한 인메모리 터미널입니다:
//! - 랜덤 워크 캔들 생성기
//! - uuid 티켓 기반 포지션 원장
//! - 연결 상태/재연결 토글과 실패 주입

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use trader_core::{
    pip_size, AccountInfo, Candle, OrderRequest, OrderResult, Position, PriceSeries, TradeAction,
};
use uuid::Uuid;

use crate::traits::{MarketDataSource, MarketTerminal};
use crate::{TerminalError, TerminalResult};

/// 시뮬레이션 터미널 설정.
#[derive(Debug, Clone)]
pub struct SimulatedConfig {
    /// 초기 잔고
    pub initial_balance: Decimal,
    /// 계좌 통화
    pub currency: String,
    /// 랏당 소요 증거금
    pub margin_per_lot: Decimal,
    /// 캔들당 드리프트 (pips, 추세 시뮬레이션용)
    pub drift_pips: f64,
    /// 랜덤 시드 (None이면 엔트로피 시드)
    pub seed: Option<u64>,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            initial_balance: dec!(10000),
            currency: "USD".to_string(),
            margin_per_lot: dec!(1000),
            drift_pips: 0.0,
            seed: None,
        }
    }
}

impl SimulatedConfig {
    /// 초기 잔고를 설정합니다.
    pub fn with_initial_balance(mut self, balance: Decimal) -> Self {
        self.initial_balance = balance;
        self
    }

    /// 캔들당 드리프트를 설정합니다 (양수 = 상승 추세).
    pub fn with_drift_pips(mut self, drift: f64) -> Self {
        self.drift_pips = drift;
        self
    }

    /// 결정적 시드를 설정합니다.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// 내부 터미널 상태.
struct TerminalState {
    healthy: bool,
    reconnect_succeeds: bool,
    balance: Decimal,
    positions: HashMap<Uuid, Position>,
    last_prices: HashMap<String, Decimal>,
    fetch_failures_remaining: u32,
    position_query_failures_remaining: u32,
    position_query_failure_retryable: bool,
    reject_next_submit: bool,
    rng: StdRng,
}

/// 인메모리 시뮬레이션 터미널.
#[derive(Clone)]
pub struct SimulatedTerminal {
    config: SimulatedConfig,
    state: Arc<RwLock<TerminalState>>,
}

impl SimulatedTerminal {
    /// 기본 설정으로 생성합니다.
    pub fn new() -> Self {
        Self::with_config(SimulatedConfig::default())
    }

    /// 설정을 지정해 생성합니다.
    pub fn with_config(config: SimulatedConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = TerminalState {
            healthy: true,
            reconnect_succeeds: true,
            balance: config.initial_balance,
            positions: HashMap::new(),
            last_prices: HashMap::new(),
            fetch_failures_remaining: 0,
            position_query_failures_remaining: 0,
            position_query_failure_retryable: true,
            reject_next_submit: false,
            rng,
        };
        Self {
            config,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// 연결 상태를 강제로 설정합니다.
    pub async fn set_healthy(&self, healthy: bool) {
        self.state.write().await.healthy = healthy;
    }

    /// 재연결 성공 여부를 설정합니다.
    pub async fn set_reconnect_succeeds(&self, succeeds: bool) {
        self.state.write().await.reconnect_succeeds = succeeds;
    }

    /// 다음 `n`회의 캔들 조회를 실패시킵니다.
    pub async fn fail_next_fetches(&self, n: u32) {
        self.state.write().await.fetch_failures_remaining = n;
    }

    /// 다음 `n`회의 포지션 조회를 실패시킵니다.
    pub async fn fail_next_position_queries(&self, n: u32, retryable: bool) {
        let mut state = self.state.write().await;
        state.position_query_failures_remaining = n;
        state.position_query_failure_retryable = retryable;
    }

    /// 다음 주문 제출을 거부합니다.
    pub async fn reject_next_submit(&self) {
        self.state.write().await.reject_next_submit = true;
    }

    /// 심볼의 시작 가격 테이블.
    fn base_price(symbol: &str) -> Decimal {
        match symbol {
            s if s.contains("XAU") || s.contains("GOLD") => dec!(2350),
            s if s.contains("JPY") => dec!(150.00),
            s if s.starts_with("GBP") => dec!(1.2700),
            s if s.starts_with("AUD") => dec!(0.6600),
            _ => dec!(1.1000),
        }
    }
}

impl Default for SimulatedTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketTerminal for SimulatedTerminal {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn connection_healthy(&self) -> bool {
        self.state.read().await.healthy
    }

    async fn reconnect(&self) -> TerminalResult<()> {
        let mut state = self.state.write().await;
        if state.reconnect_succeeds {
            state.healthy = true;
            debug!("시뮬레이션 터미널 재연결 성공");
            Ok(())
        } else {
            Err(TerminalError::ConnectionFailed(
                "simulated reconnect disabled".to_string(),
            ))
        }
    }

    async fn account_info(&self) -> TerminalResult<AccountInfo> {
        let state = self.state.read().await;
        if !state.healthy {
            return Err(TerminalError::NotConnected);
        }

        let unrealized: Decimal = state.positions.values().map(|p| p.profit).sum();
        let equity = state.balance + unrealized;
        let margin: Decimal = state
            .positions
            .values()
            .map(|p| p.volume * self.config.margin_per_lot)
            .sum();

        Ok(AccountInfo {
            balance: state.balance,
            equity,
            margin,
            margin_free: equity - margin,
            trade_allowed: true,
            currency: self.config.currency.clone(),
        })
    }

    async fn open_positions(&self) -> TerminalResult<Vec<Position>> {
        let mut state = self.state.write().await;
        if state.position_query_failures_remaining > 0 {
            state.position_query_failures_remaining -= 1;
            return Err(if state.position_query_failure_retryable {
                TerminalError::Network("simulated position query failure".to_string())
            } else {
                TerminalError::Internal("simulated critical failure".to_string())
            });
        }
        if !state.healthy {
            return Err(TerminalError::NotConnected);
        }
        Ok(state.positions.values().cloned().collect())
    }

    async fn submit_order(&self, request: &OrderRequest) -> TerminalResult<OrderResult> {
        let mut state = self.state.write().await;
        if !state.healthy {
            return Err(TerminalError::NotConnected);
        }
        if state.reject_next_submit {
            state.reject_next_submit = false;
            return Err(TerminalError::OrderRejected(
                "simulated rejection".to_string(),
            ));
        }
        if request.action == TradeAction::None {
            return Err(TerminalError::OrderRejected(
                "no actionable direction".to_string(),
            ));
        }

        let price = *state
            .last_prices
            .entry(request.symbol.clone())
            .or_insert_with(|| Self::base_price(&request.symbol));

        let position = Position::new(&request.symbol, request.action, request.volume, price)
            .with_levels(request.take_profit, request.stop_loss);
        let ticket = position.ticket;
        state.positions.insert(ticket, position);

        debug!(
            symbol = %request.symbol,
            action = %request.action,
            volume = %request.volume,
            %ticket,
            "시뮬레이션 주문 체결"
        );

        Ok(OrderResult {
            ticket,
            symbol: request.symbol.clone(),
            action: request.action,
            volume: request.volume,
            price,
            executed_at: Utc::now(),
        })
    }

    async fn close_position(&self, ticket: Uuid) -> TerminalResult<Position> {
        let mut state = self.state.write().await;
        let position = state
            .positions
            .remove(&ticket)
            .ok_or_else(|| TerminalError::PositionNotFound(ticket.to_string()))?;
        state.balance += position.profit;
        Ok(position)
    }
}

#[async_trait]
impl MarketDataSource for SimulatedTerminal {
    async fn fetch_bars(&self, symbol: &str, count: usize) -> TerminalResult<PriceSeries> {
        let mut state = self.state.write().await;
        if state.fetch_failures_remaining > 0 {
            state.fetch_failures_remaining -= 1;
            return Err(TerminalError::DataUnavailable(format!(
                "simulated fetch failure: {}",
                symbol
            )));
        }
        if !state.healthy {
            return Err(TerminalError::NotConnected);
        }

        let pip = pip_size(symbol);
        let mut price = state
            .last_prices
            .get(symbol)
            .copied()
            .unwrap_or_else(|| Self::base_price(symbol));

        let now = Utc::now();
        let mut candles = Vec::with_capacity(count);
        for i in 0..count {
            let step_pips = state.rng.gen_range(-5.0..5.0) + self.config.drift_pips;
            let step = Decimal::from_f64(step_pips).unwrap_or(Decimal::ZERO) * pip;
            let open = price;
            let close = open + step;
            let wick = pip * dec!(2);
            let time = now - ChronoDuration::minutes((count - i) as i64);

            candles.push(Candle {
                time,
                open,
                high: open.max(close) + wick,
                low: open.min(close) - wick,
                close,
                volume: Decimal::from(state.rng.gen_range(50u32..500)),
            });
            price = close;
        }

        state.last_prices.insert(symbol.to_string(), price);

        // 마크 가격 갱신: 해당 심볼의 오픈 포지션 손익 재계산
        for position in state.positions.values_mut() {
            if position.symbol == symbol {
                position.mark_price(price);
            }
        }

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            candles,
        })
    }
}
