//! 트레이딩 루프 컨트롤러.
//!
//! 취소 가능한 폴링 루프와 그 제어 표면(시작/정지/상태/비상 정지)을
//! 제공합니다. 루프 태스크 하나와 30초 주기 복구 모니터 태스크
//! 하나를 관리하며, 틱 단위 에러는 루프를 끝내지 않습니다.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use trader_core::{SettingsStore, StrategyKind};
use trader_risk::{CounterKind, DailyCounterStore, RiskMonitor};
use trader_session::is_trading_permitted;
use trader_terminal::{MarketDataSource, MarketTerminal, ParameterSource, ReportSink};

use crate::error::{EngineError, EngineResult};
use crate::pipeline::{AnalysisResult, SignalAdmissionPipeline, BARS_PER_FETCH};
use crate::wait::cancellable_sleep;

/// 재연결 실패 후 대기.
const RECONNECT_WAIT: Duration = Duration::from_secs(30);
/// 일일 한도 도달 시 대기.
const DAILY_LIMIT_PAUSE: Duration = Duration::from_secs(300);
/// 거래 시간 아님 대기.
const TRADING_TIME_PAUSE: Duration = Duration::from_secs(60);
/// 시세 데이터 없음 대기.
const DATA_PAUSE: Duration = Duration::from_secs(60);
/// 틱 에러 후 대기.
const TICK_ERROR_PAUSE: Duration = Duration::from_secs(60);
/// 복구 모니터 주기.
const RECOVERY_INTERVAL: Duration = Duration::from_secs(30);
/// 정지 시 태스크 합류 제한.
const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);
/// 기동 직후 생존 확인까지의 유예.
const LIVENESS_GRACE: Duration = Duration::from_millis(500);
/// 심볼 미지정 시 스캔할 기본 심볼 수.
const DEFAULT_SYMBOL_COUNT: usize = 3;

/// 루프의 공유 상태.
#[derive(Debug)]
pub struct LoopState {
    /// 루프 실행 여부
    pub running: bool,
    /// 현재 전략
    pub current_strategy: StrategyKind,
    /// 마지막 틱 완료 시각
    pub last_tick: Option<DateTime<Utc>>,
}

impl LoopState {
    fn new(strategy: StrategyKind) -> Self {
        Self {
            running: false,
            current_strategy: strategy,
            last_tick: None,
        }
    }
}

/// 외부로 노출되는 봇 상태.
#[derive(Debug, Clone, Serialize)]
pub struct BotStatus {
    pub running: bool,
    pub strategy: String,
    pub connected: bool,
    pub trading_time_ok: bool,
    pub risk_ok: bool,
    pub daily_trades: u32,
    pub open_positions: u32,
    pub last_update: Option<DateTime<Utc>>,
}

/// 루프 태스크가 들고 다니는 협력자 묶음.
#[derive(Clone)]
struct LoopContext {
    terminal: Arc<dyn MarketTerminal>,
    data_source: Arc<dyn MarketDataSource>,
    pipeline: Arc<SignalAdmissionPipeline>,
    monitor: Arc<RiskMonitor>,
    counters: Arc<DailyCounterStore>,
    settings: Arc<SettingsStore>,
    params: Arc<dyn ParameterSource>,
    report_sink: Arc<dyn ReportSink>,
    state: Arc<RwLock<LoopState>>,
}

/// 시간별 리포트를 보낼 차례인지 판정합니다.
///
/// 정각(분 == 0)에만, 같은 (날짜, 시) 조합당 한 번만 true입니다.
fn hourly_report_due(now: DateTime<Utc>, last: &Option<(NaiveDate, u32)>) -> bool {
    if now.minute() != 0 {
        return false;
    }
    *last != Some((now.date_naive(), now.hour()))
}

impl LoopContext {
    /// 메인 루프. 모든 틱 에러를 여기서 잡고 재개합니다.
    async fn run_loop(self, mut stop: watch::Receiver<bool>) {
        info!("트레이딩 루프 시작");
        let mut last_report: Option<(NaiveDate, u32)> = None;

        loop {
            if *stop.borrow() || !self.state.read().await.running {
                break;
            }
            if let Err(e) = self.tick(&mut stop, &mut last_report).await {
                error!(error = %e, "틱 처리 실패, 60초 후 재개");
                if cancellable_sleep(TICK_ERROR_PAUSE, &mut stop).await {
                    break;
                }
            }
        }

        // 어떤 경로로 끝나든 running은 정확히 한 번 내려간다
        let mut state = self.state.write().await;
        state.running = false;
        info!("트레이딩 루프 종료");
    }

    /// 루프 한 바퀴.
    async fn tick(
        &self,
        stop: &mut watch::Receiver<bool>,
        last_report: &mut Option<(NaiveDate, u32)>,
    ) -> EngineResult<()> {
        // 소프트 리스크 점검: 경고만 남기고 계속
        match self.monitor.auto_recovery_check().await {
            Ok(report) if report.critical => {
                error!(warnings = ?report.warnings, "계좌 위험 수준 경고");
            }
            Ok(report) if !report.is_healthy() => {
                warn!(warnings = ?report.warnings, "계좌 경고");
            }
            Ok(_) => {}
            Err(e) => {
                // 연결이 정상인데도 점검이 실패하면 틱 에러로 올린다
                if self.terminal.connection_healthy().await {
                    return Err(EngineError::CriticalLoop(format!(
                        "risk check failed on healthy terminal: {e}"
                    )));
                }
                warn!(error = %e, "리스크 점검 실패, 연결 점검으로 진행");
            }
        }

        // 일일 거래 한도
        if self.counters.daily_limit_reached().await {
            info!(
                pause_secs = DAILY_LIMIT_PAUSE.as_secs(),
                "일일 거래 한도 도달, 대기"
            );
            cancellable_sleep(DAILY_LIMIT_PAUSE, stop).await;
            return Ok(());
        }

        // 거래 시간 (세션 + 뉴스 블랙아웃)
        if !is_trading_permitted() {
            debug!("거래 시간 아님, 대기");
            cancellable_sleep(TRADING_TIME_PAUSE, stop).await;
            return Ok(());
        }

        // 터미널 연결
        if !self.terminal.connection_healthy().await {
            warn!("터미널 연결 끊김, 재연결 시도");
            if let Err(e) = self.terminal.reconnect().await {
                warn!(
                    error = %e,
                    wait_secs = RECONNECT_WAIT.as_secs(),
                    "재연결 실패, 대기 후 재시도"
                );
                cancellable_sleep(RECONNECT_WAIT, stop).await;
                return Ok(());
            }
            info!("터미널 재연결 성공");
        }

        // 스캔 대상 심볼
        let symbols = self.scan_symbols();

        // 시세 조회 (실패 심볼은 건너뜀)
        let series = self.data_source.fetch_many(&symbols, BARS_PER_FETCH).await;
        if series.is_empty() {
            warn!(
                symbols = ?symbols,
                pause_secs = DATA_PAUSE.as_secs(),
                "시세 데이터 없음, 대기"
            );
            cancellable_sleep(DATA_PAUSE, stop).await;
            return Ok(());
        }

        // 신호 스캔
        let summary = self.pipeline.scan(&series, stop).await;
        debug!(
            symbols_scanned = summary.symbols_scanned,
            signals_found = summary.signals_found,
            "틱 스캔 결과"
        );

        // 스캔 후 소프트 점검 (로그만)
        if let Ok(report) = self.monitor.auto_recovery_check().await {
            if !report.is_healthy() {
                warn!(
                    warnings = ?report.warnings,
                    critical = report.critical,
                    "스캔 후 계좌 경고"
                );
            }
        }

        // 시간별 리포트 (시간당 한 번)
        self.maybe_send_report(last_report).await;

        // 틱 완료 기록
        {
            let mut state = self.state.write().await;
            state.last_tick = Some(Utc::now());
        }

        // 스캔 주기 대기
        let interval = Duration::from_secs(self.params.scan_interval_secs().clamp(5, 300));
        cancellable_sleep(interval, stop).await;
        Ok(())
    }

    /// 스캔할 심볼 목록을 결정합니다.
    ///
    /// 선택 심볼이 있으면 그 하나, 없으면 설정 목록의 앞 3개입니다.
    fn scan_symbols(&self) -> Vec<String> {
        if let Some(symbol) = self.params.selected_symbol() {
            return vec![symbol];
        }
        self.settings
            .snapshot()
            .symbols
            .into_iter()
            .take(DEFAULT_SYMBOL_COUNT)
            .collect()
    }

    /// 정각이면 시간별 리포트를 보냅니다.
    async fn maybe_send_report(&self, last_report: &mut Option<(NaiveDate, u32)>) {
        let now = Utc::now();
        if !hourly_report_due(now, last_report) {
            return;
        }

        let trades = self.counters.status(CounterKind::Trades).await;
        let open = self.terminal.open_position_count().await.unwrap_or(0);
        let balance = self
            .terminal
            .account_info()
            .await
            .map(|a| a.balance.to_string())
            .unwrap_or_else(|_| "?".to_string());
        let report = format!(
            "trades {}/{} | open positions {} | balance {}",
            trades.current, trades.max, open, balance
        );

        match self.report_sink.send_report(&report).await {
            Ok(()) => {
                *last_report = Some((now.date_naive(), now.hour()));
            }
            Err(e) => warn!(error = %e, "시간별 리포트 발송 실패"),
        }
    }

    /// 30초 주기 복구 모니터. running이 내려가면 스스로 끝납니다.
    async fn run_recovery_monitor(self, mut stop: watch::Receiver<bool>) {
        debug!("복구 모니터 시작");
        loop {
            if cancellable_sleep(RECOVERY_INTERVAL, &mut stop).await {
                break;
            }
            if !self.state.read().await.running {
                break;
            }
            match self.monitor.auto_recovery_check().await {
                Ok(report) if report.critical => {
                    error!(warnings = ?report.warnings, "복구 모니터: 계좌 위험");
                }
                Ok(report) if !report.is_healthy() => {
                    warn!(warnings = ?report.warnings, "복구 모니터: 계좌 경고");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "복구 모니터 점검 실패"),
            }
        }
        debug!("복구 모니터 종료");
    }
}

/// 트레이딩 루프의 제어 표면.
pub struct TradingController {
    ctx: LoopContext,
    state: Arc<RwLock<LoopState>>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
    recovery_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TradingController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        terminal: Arc<dyn MarketTerminal>,
        data_source: Arc<dyn MarketDataSource>,
        pipeline: Arc<SignalAdmissionPipeline>,
        monitor: Arc<RiskMonitor>,
        counters: Arc<DailyCounterStore>,
        settings: Arc<SettingsStore>,
        params: Arc<dyn ParameterSource>,
        report_sink: Arc<dyn ReportSink>,
    ) -> Self {
        let state = Arc::new(RwLock::new(LoopState::new(params.strategy())));
        let ctx = LoopContext {
            terminal,
            data_source,
            pipeline,
            monitor,
            counters,
            settings,
            params,
            report_sink,
            state: Arc::clone(&state),
        };
        Self {
            ctx,
            state,
            stop_tx: Mutex::new(None),
            loop_handle: Mutex::new(None),
            recovery_handle: Mutex::new(None),
        }
    }

    /// 루프를 시작합니다.
    ///
    /// 터미널 연결 확인에 실패하면 `ConnectionUnavailable`,
    /// 루프 태스크가 곧바로 죽으면 `ThreadStartFailure`입니다.
    pub async fn start(&self) -> EngineResult<()> {
        if !self.ctx.terminal.connection_healthy().await {
            return Err(EngineError::ConnectionUnavailable(
                "terminal health check failed".to_string(),
            ));
        }

        let (tx, rx) = watch::channel(false);
        // 실행 확인과 기동 플래그 설정은 같은 잠금 안에서 원자적이다
        {
            let mut state = self.state.write().await;
            if state.running {
                return Err(EngineError::AlreadyRunning);
            }
            state.running = true;
            state.current_strategy = self.ctx.params.strategy();
            state.last_tick = None;
        }

        let loop_ctx = self.ctx.clone();
        let loop_rx = rx.clone();
        let loop_handle = tokio::spawn(async move { loop_ctx.run_loop(loop_rx).await });

        // 기동 직후 생존 확인
        tokio::time::sleep(LIVENESS_GRACE).await;
        if loop_handle.is_finished() {
            let mut state = self.state.write().await;
            state.running = false;
            return Err(EngineError::ThreadStartFailure(
                "loop task exited immediately".to_string(),
            ));
        }

        let recovery_ctx = self.ctx.clone();
        let recovery_handle =
            tokio::spawn(async move { recovery_ctx.run_recovery_monitor(rx).await });

        *self.stop_tx.lock().await = Some(tx);
        *self.loop_handle.lock().await = Some(loop_handle);
        *self.recovery_handle.lock().await = Some(recovery_handle);

        info!(strategy = %self.state.read().await.current_strategy, "트레이딩 봇 시작");
        Ok(())
    }

    /// 루프를 협조적으로 정지합니다. 태스크 합류는 5초까지 기다립니다.
    pub async fn stop(&self) {
        info!("정지 요청");
        self.signal_stop().await;
        self.join_tasks().await;
        info!("트레이딩 봇 정지 완료");
    }

    /// 비상 정지: 루프를 멈추고 모든 포지션을 청산합니다.
    ///
    /// 태스크 합류 결과와 무관하게 청산과 카운터 초기화를 수행합니다.
    pub async fn emergency_stop(&self) {
        error!("비상 정지 요청");
        self.signal_stop().await;

        let closed = self.ctx.monitor.emergency_close_all().await;
        self.ctx.counters.reset_orders().await;
        info!(closed_positions = closed, "비상 정지: 청산 및 카운터 초기화 완료");

        self.join_tasks().await;
    }

    /// 현재 봇 상태를 조회합니다.
    pub async fn status(&self) -> BotStatus {
        let (running, strategy, last_update) = {
            let state = self.state.read().await;
            (
                state.running,
                state.current_strategy.to_string(),
                state.last_tick,
            )
        };

        BotStatus {
            running,
            strategy,
            connected: self.ctx.terminal.connection_healthy().await,
            trading_time_ok: is_trading_permitted(),
            risk_ok: self.ctx.monitor.risk_check().await.unwrap_or(false),
            daily_trades: self.ctx.counters.trade_count().await,
            open_positions: self.ctx.terminal.open_position_count().await.unwrap_or(0),
            last_update,
        }
    }

    /// 거래 없이 단일 심볼을 진단합니다.
    pub async fn run_single_analysis(
        &self,
        symbol: &str,
        strategy: Option<StrategyKind>,
    ) -> EngineResult<AnalysisResult> {
        self.ctx.pipeline.analyze(symbol, strategy).await
    }

    async fn signal_stop(&self) {
        if let Some(tx) = self.stop_tx.lock().await.take() {
            let _ = tx.send(true);
        }
        let mut state = self.state.write().await;
        state.running = false;
    }

    async fn join_tasks(&self) {
        if let Some(handle) = self.loop_handle.lock().await.take() {
            if tokio::time::timeout(STOP_JOIN_TIMEOUT, handle).await.is_err() {
                warn!("루프 태스크가 제한 시간 안에 종료되지 않음");
            }
        }
        if let Some(handle) = self.recovery_handle.lock().await.take() {
            if tokio::time::timeout(STOP_JOIN_TIMEOUT, handle).await.is_err() {
                warn!("복구 모니터가 제한 시간 안에 종료되지 않음");
            }
        }
    }
}
