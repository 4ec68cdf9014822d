//! 신호 수용 파이프라인.
//!
//! 심볼 하나를 주문까지 통과시키는 순서 고정 게이트입니다.
//! 한 심볼의 실패는 그 심볼만 건너뛰며 스캔 전체를 멈추지 않습니다.
//! 중단 신호 재확인에서만 스캔 전체가 즉시 종료됩니다.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use trader_core::{
    pip_size, OrderRequest, PriceSeries, SettingsStore, SignalResult, StrategyKind, TpSl,
    TradeAction,
};
use trader_risk::{DailyCounterStore, OrderLimitGate};
use trader_session::{current_session, session_adjusted_threshold};
use trader_strategy::{IndicatorEngine, StrategyEngine};
use trader_terminal::{ConditionValidator, MarketDataSource, MarketTerminal, ParameterSource};

use crate::error::{EngineError, EngineResult};
use crate::wait::cancellable_sleep;

/// 분석에 사용하는 캔들 수.
pub const BARS_PER_FETCH: usize = 100;
/// 심볼 간 지연.
const INTER_SYMBOL_DELAY: Duration = Duration::from_secs(2);

/// 스캔 한 바퀴의 요약.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanSummary {
    /// 처리한 심볼 수
    pub symbols_scanned: u32,
    /// 임계값을 넘은 신호 수
    pub signals_found: u32,
}

/// 단일 심볼 진단 결과.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub symbol: String,
    pub strategy: StrategyKind,
    pub signal: SignalResult,
    /// 현재 세션에서 요구되는 최소 신호 수
    pub threshold: u32,
    pub session_name: &'static str,
    pub last_close: Decimal,
}

/// 심볼 하나의 처리 결과.
enum SymbolOutcome {
    /// 게이트 중 하나에서 탈락
    Skipped,
    /// 주문 제출 완료
    Submitted,
    /// 중단 신호로 스캔 전체 종료
    Aborted,
}

/// 신호 수용 파이프라인.
pub struct SignalAdmissionPipeline {
    data_source: Arc<dyn MarketDataSource>,
    indicator_engine: Arc<dyn IndicatorEngine>,
    strategy_engine: Arc<dyn StrategyEngine>,
    validator: Arc<dyn ConditionValidator>,
    params: Arc<dyn ParameterSource>,
    terminal: Arc<dyn MarketTerminal>,
    gate: Arc<OrderLimitGate>,
    counters: Arc<DailyCounterStore>,
    settings: Arc<SettingsStore>,
}

impl SignalAdmissionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data_source: Arc<dyn MarketDataSource>,
        indicator_engine: Arc<dyn IndicatorEngine>,
        strategy_engine: Arc<dyn StrategyEngine>,
        validator: Arc<dyn ConditionValidator>,
        params: Arc<dyn ParameterSource>,
        terminal: Arc<dyn MarketTerminal>,
        gate: Arc<OrderLimitGate>,
        counters: Arc<DailyCounterStore>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            data_source,
            indicator_engine,
            strategy_engine,
            validator,
            params,
            terminal,
            gate,
            counters,
            settings,
        }
    }

    /// 미리 조회한 시리즈들을 순서대로 스캔합니다.
    pub async fn scan(
        &self,
        series_list: &[PriceSeries],
        stop: &mut watch::Receiver<bool>,
    ) -> ScanSummary {
        let strategy = self.params.strategy();
        let mut summary = ScanSummary::default();

        for series in series_list {
            match self.process_symbol(series, strategy, stop).await {
                SymbolOutcome::Submitted => {
                    summary.symbols_scanned += 1;
                    summary.signals_found += 1;
                }
                SymbolOutcome::Skipped => {
                    summary.symbols_scanned += 1;
                }
                SymbolOutcome::Aborted => {
                    info!("중단 신호 감지, 스캔 종료");
                    return summary;
                }
            }

            if cancellable_sleep(INTER_SYMBOL_DELAY, stop).await {
                return summary;
            }
        }

        info!(
            symbols_scanned = summary.symbols_scanned,
            signals_found = summary.signals_found,
            strategy = %strategy,
            "스캔 완료"
        );
        summary
    }

    /// 심볼 하나를 전체 게이트에 통과시킵니다.
    async fn process_symbol(
        &self,
        series: &PriceSeries,
        strategy: StrategyKind,
        stop: &watch::Receiver<bool>,
    ) -> SymbolOutcome {
        let symbol = series.symbol.as_str();

        // 지표 계산
        let Some(enriched) = self.indicator_engine.compute(series) else {
            debug!(symbol, bars = series.len(), "지표 계산 불가, 건너뜀");
            return SymbolOutcome::Skipped;
        };

        // 전략 평가
        let signal = self.strategy_engine.evaluate(strategy, &enriched);
        if !signal.is_candidate() {
            debug!(symbol, "방향 없는 신호, 건너뜀");
            return SymbolOutcome::Skipped;
        }

        // 거래 조건 검증
        let (tradable, reason) = self.validator.validate(symbol).await;
        if !tradable {
            info!(symbol, reason = %reason, "거래 조건 미충족, 건너뜀");
            return SymbolOutcome::Skipped;
        }

        // 세션 보정 임계값
        let session = current_session();
        let threshold = session_adjusted_threshold(strategy, &session);
        if signal.strength() < threshold {
            debug!(
                symbol,
                strength = signal.strength(),
                threshold,
                session = session.name,
                "신호 강도 부족, 건너뜀"
            );
            return SymbolOutcome::Skipped;
        }

        // 제출 직전 중단 신호 재확인
        if *stop.borrow() {
            return SymbolOutcome::Aborted;
        }

        // 제출 직전 주문 한도 게이트
        if !self.gate.check_order_limit().await {
            if self.settings.aggressive_override() {
                warn!(symbol, "주문 한도 초과를 공격 모드로 무시하고 진행");
            } else {
                return SymbolOutcome::Skipped;
            }
        }

        // 파라미터 해석 및 제출
        match self.submit(symbol, &signal, strategy).await {
            Ok(()) => SymbolOutcome::Submitted,
            Err(e) => {
                error!(symbol, error = %e, "주문 제출 실패, 다음 심볼 진행");
                SymbolOutcome::Skipped
            }
        }
    }

    /// 전략 기본값으로 TP/SL을 환산해 주문을 제출합니다.
    async fn submit(
        &self,
        symbol: &str,
        signal: &SignalResult,
        strategy: StrategyKind,
    ) -> EngineResult<()> {
        let volume = self.params.lot_size(strategy);
        let tp_pips = self.params.tp_pips(strategy);
        let sl_pips = self.params.sl_pips(strategy);

        let entry = self
            .data_source
            .fetch_bars(symbol, 1)
            .await
            .ok()
            .and_then(|s| s.last().map(|c| c.close))
            .ok_or_else(|| {
                EngineError::Core(trader_core::TraderError::DataUnavailable(
                    symbol.to_string(),
                ))
            })?;

        let pip = pip_size(symbol);
        let take_profit =
            TpSl::pips(Decimal::from(tp_pips)).resolve(entry, signal.action, pip, true);
        let stop_loss =
            TpSl::pips(Decimal::from(sl_pips)).resolve(entry, signal.action, pip, false);

        let request = OrderRequest::new(symbol, signal.action, volume)
            .with_levels(Some(take_profit), Some(stop_loss))
            .with_comment(strategy.to_string());

        let result = self
            .terminal
            .submit_order(&request)
            .await
            .map_err(|e| EngineError::Core(e.into()))?;

        let trades = self.counters.increment_trade().await;
        let orders = self.counters.increment_order().await;
        info!(
            symbol,
            action = %result.action,
            volume = %result.volume,
            price = %result.price,
            ticket = %result.ticket,
            trades_today = trades,
            open_orders = orders,
            "주문 체결"
        );
        Ok(())
    }

    /// 거래 없이 단일 심볼을 진단합니다 (1–3단계 + 임계값 정보).
    pub async fn analyze(
        &self,
        symbol: &str,
        strategy: Option<StrategyKind>,
    ) -> EngineResult<AnalysisResult> {
        let strategy = strategy.unwrap_or_else(|| self.params.strategy());

        let series = self
            .data_source
            .fetch_bars(symbol, BARS_PER_FETCH)
            .await
            .map_err(|e| EngineError::Core(e.into()))?;

        let enriched = self.indicator_engine.compute(&series).ok_or_else(|| {
            EngineError::Core(trader_core::TraderError::IndicatorFailure(format!(
                "{}: insufficient bars ({})",
                symbol,
                series.len()
            )))
        })?;

        let signal = self.strategy_engine.evaluate(strategy, &enriched);
        let session = current_session();
        let threshold = session_adjusted_threshold(strategy, &session);
        let last_close = series
            .last()
            .map(|c| c.close)
            .unwrap_or(Decimal::ZERO);

        Ok(AnalysisResult {
            symbol: symbol.to_string(),
            strategy,
            signal,
            threshold,
            session_name: session.name,
            last_close,
        })
    }
}
