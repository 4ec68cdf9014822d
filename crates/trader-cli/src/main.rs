//! 트레이딩 봇 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 시뮬레이션 터미널로 데몬 실행 (Ctrl+C로 정지)
//! trader run
//!
//! # 단일 심볼만 스캔
//! trader run -s XAUUSD
//!
//! # 거래 없이 단일 심볼 진단
//! trader analyze -s EURUSD --strategy hft
//!
//! # 현재 세션/블랙아웃/임계값 확인
//! trader sessions
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use trader_core::{init_logging_from_env, SettingsStore, StrategyKind};
use trader_engine::{SignalAdmissionPipeline, TradingController};
use trader_risk::{DailyCounterStore, OrderLimitGate, RiskMonitor};
use trader_session::{
    active_blackout_at, current_session, session_adjusted_threshold, session_priority,
};
use trader_strategy::{RuleStrategyEngine, TaIndicatorEngine};
use trader_terminal::{
    AlwaysTradable, LogReportSink, MarketDataSource, MarketTerminal, SettingsParameterSource,
    SimulatedConfig, SimulatedTerminal,
};

#[derive(Parser)]
#[command(name = "trader")]
#[command(about = "리스크 게이트 자동 트레이딩 봇", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (TOML)
    #[arg(short, long, default_value = "bot_config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 데몬 모드: 트레이딩 루프 실행 (Ctrl+C로 정지)
    Run {
        /// 단일 심볼만 스캔 (미지정 시 설정 목록의 앞 3개)
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// 거래 없이 단일 심볼 진단
    Analyze {
        /// 심볼 (예: EURUSD)
        #[arg(short, long)]
        symbol: String,

        /// 전략 (scalping/intraday/arbitrage/hft, 미지정 시 설정값)
        #[arg(long)]
        strategy: Option<String>,
    },

    /// 현재 세션과 전략별 임계값 출력
    Sessions,
}

/// 시뮬레이션 터미널로 전체 스택을 조립합니다.
fn build_controller(
    settings: Arc<SettingsStore>,
    selected_symbol: Option<String>,
) -> TradingController {
    let terminal = Arc::new(SimulatedTerminal::with_config(
        SimulatedConfig::default().with_drift_pips(0.5),
    ));
    let counters = Arc::new(DailyCounterStore::new(Arc::clone(&settings)));
    let gate = Arc::new(OrderLimitGate::new(
        Arc::clone(&counters),
        terminal.clone() as Arc<dyn MarketTerminal>,
        Arc::clone(&settings),
    ));
    let monitor = Arc::new(RiskMonitor::new(
        terminal.clone() as Arc<dyn MarketTerminal>,
        Arc::clone(&counters),
    ));
    let mut params = SettingsParameterSource::new(Arc::clone(&settings));
    if let Some(symbol) = selected_symbol {
        params = params.with_selected_symbol(symbol);
    }
    let params = Arc::new(params);

    let pipeline = Arc::new(SignalAdmissionPipeline::new(
        terminal.clone() as Arc<dyn MarketDataSource>,
        Arc::new(TaIndicatorEngine::new()),
        Arc::new(RuleStrategyEngine::new()),
        Arc::new(AlwaysTradable),
        params.clone(),
        terminal.clone() as Arc<dyn MarketTerminal>,
        gate,
        Arc::clone(&counters),
        Arc::clone(&settings),
    ));

    TradingController::new(
        terminal.clone() as Arc<dyn MarketTerminal>,
        terminal as Arc<dyn MarketDataSource>,
        pipeline,
        monitor,
        counters,
        settings,
        params,
        Arc::new(LogReportSink),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging_from_env().map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    let cli = Cli::parse();
    let settings =
        Arc::new(SettingsStore::open(&cli.config).context("설정 로드 실패")?);

    match cli.command {
        Commands::Run { symbol } => {
            let controller = build_controller(settings, symbol);

            controller.start().await.context("봇 시작 실패")?;
            info!("봇 실행 중, Ctrl+C로 정지");

            tokio::signal::ctrl_c().await.context("신호 대기 실패")?;
            info!("종료 신호 수신, 봇 정지 중");
            controller.stop().await;

            let status = controller.status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::Analyze { symbol, strategy } => {
            let strategy = strategy
                .map(|s| s.parse::<StrategyKind>())
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?;

            let controller = build_controller(settings, None);
            let analysis = controller
                .run_single_analysis(&symbol, strategy)
                .await
                .context("분석 실패")?;

            println!("심볼:        {}", analysis.symbol);
            println!("전략:        {}", analysis.strategy);
            println!("세션:        {}", analysis.session_name);
            println!("종가:        {}", analysis.last_close);
            println!(
                "신호:        {} (강도 {} / 임계값 {})",
                analysis.signal.action,
                analysis.signal.strength(),
                analysis.threshold
            );
            for tag in &analysis.signal.signals {
                println!("  - {}", tag);
            }
        }

        Commands::Sessions => {
            let now = chrono::Utc::now();
            let session = current_session();

            println!("현재 시각 (UTC): {}", now.format("%Y-%m-%d %H:%M"));
            println!(
                "세션: {} (활성: {}, 변동성: {}, 우선순위: {})",
                session.name,
                session.active,
                session.volatility,
                session_priority(session.volatility)
            );
            println!("리스크 배율: {}", session.risk_modifier);
            println!("추천 심볼: {}", session.recommended_symbols.join(", "));
            match active_blackout_at(now) {
                Some(label) => println!("뉴스 블랙아웃: {}", label),
                None => println!("뉴스 블랙아웃: 없음"),
            }

            println!("\n전략별 신호 임계값:");
            for strategy in StrategyKind::ALL {
                println!(
                    "  {:<10} {}",
                    strategy.to_string(),
                    session_adjusted_threshold(strategy, &session)
                );
            }
        }
    }

    Ok(())
}
