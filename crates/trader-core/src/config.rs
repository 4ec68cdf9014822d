//! 설정 관리.
//!
//! 이 모듈은 봇의 영속 설정 문서를 정의하고 관리합니다:
//! - 파일(TOML) + 환경 변수에서 로드
//! - 모든 변경 전 범위 검증 (검증 실패 시 기존 값 유지)
//! - 중요 설정 변경 시 파일로 저장

use crate::domain::StrategyKind;
use crate::error::{TraderError, TraderResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

/// 봇 설정 문서.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// 동시 오픈 주문 한도 (1–100)
    pub max_orders: u32,
    /// 일일 주문 한도 (1–1000)
    pub max_daily_orders: u32,
    /// 거래당 최대 리스크 (계좌 대비 %, 0.1–10)
    pub max_risk_percentage: f64,
    /// 기본 랏 크기 (0.01–100)
    pub default_lot_size: Decimal,
    /// 주문 한도 게이트 거부를 무시하는 공격 모드 (기본 꺼짐)
    pub aggressive_override: bool,
    /// 스캔 주기 (초, 5–300)
    pub scan_interval_secs: u64,
    /// 계좌 상태 자동 점검 활성화
    pub auto_recovery: bool,
    /// 기본 전략
    pub strategy: StrategyKind,
    /// 거래 심볼 목록
    pub symbols: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_orders: 10,
            max_daily_orders: 50,
            max_risk_percentage: 2.0,
            default_lot_size: dec!(0.01),
            aggressive_override: false,
            scan_interval_secs: 15,
            auto_recovery: true,
            strategy: StrategyKind::Scalping,
            symbols: vec![
                "EURUSD".to_string(),
                "GBPUSD".to_string(),
                "USDJPY".to_string(),
                "AUDUSD".to_string(),
                "USDCAD".to_string(),
                "XAUUSD".to_string(),
            ],
        }
    }
}

impl BotConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값에서 출발하며, `TRADER__` 접두사의
    /// 환경 변수가 파일 값을 오버라이드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TraderResult<Self> {
        let mut builder = config::Config::builder();

        if path.as_ref().exists() {
            builder = builder.add_source(config::File::from(path.as_ref()));
        }

        let loaded = builder
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TraderError::Config(e.to_string()))?;

        let mut cfg = BotConfig::default();
        // 부분 문서를 허용한다: 명시된 키만 기본값을 덮어쓴다.
        if let Ok(partial) = loaded.try_deserialize::<PartialBotConfig>() {
            partial.apply(&mut cfg);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// 설정을 TOML 파일로 저장합니다.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TraderResult<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| TraderError::Serialization(e.to_string()))?;
        std::fs::write(path.as_ref(), text)
            .map_err(|e| TraderError::Config(format!("설정 저장 실패: {}", e)))?;
        Ok(())
    }

    /// 모든 범위 제약을 검증합니다.
    pub fn validate(&self) -> TraderResult<()> {
        if !(1..=100).contains(&self.max_orders) {
            return Err(TraderError::InvalidLimit(format!(
                "max_orders must be 1-100, got {}",
                self.max_orders
            )));
        }
        if !(1..=1000).contains(&self.max_daily_orders) {
            return Err(TraderError::InvalidLimit(format!(
                "max_daily_orders must be 1-1000, got {}",
                self.max_daily_orders
            )));
        }
        if !(0.1..=10.0).contains(&self.max_risk_percentage) {
            return Err(TraderError::InvalidLimit(format!(
                "max_risk_percentage must be 0.1-10, got {}",
                self.max_risk_percentage
            )));
        }
        if self.default_lot_size < dec!(0.01) || self.default_lot_size > dec!(100) {
            return Err(TraderError::InvalidLimit(format!(
                "default_lot_size must be 0.01-100, got {}",
                self.default_lot_size
            )));
        }
        if !(5..=300).contains(&self.scan_interval_secs) {
            return Err(TraderError::InvalidLimit(format!(
                "scan_interval_secs must be 5-300, got {}",
                self.scan_interval_secs
            )));
        }
        if self.symbols.is_empty() {
            return Err(TraderError::Config("symbols must not be empty".to_string()));
        }
        Ok(())
    }
}

/// 로드 시 부분 문서를 허용하기 위한 옵션 필드 미러.
#[derive(Debug, Default, Deserialize)]
struct PartialBotConfig {
    max_orders: Option<u32>,
    max_daily_orders: Option<u32>,
    max_risk_percentage: Option<f64>,
    default_lot_size: Option<Decimal>,
    aggressive_override: Option<bool>,
    scan_interval_secs: Option<u64>,
    auto_recovery: Option<bool>,
    strategy: Option<StrategyKind>,
    symbols: Option<Vec<String>>,
}

impl PartialBotConfig {
    fn apply(self, cfg: &mut BotConfig) {
        if let Some(v) = self.max_orders {
            cfg.max_orders = v;
        }
        if let Some(v) = self.max_daily_orders {
            cfg.max_daily_orders = v;
        }
        if let Some(v) = self.max_risk_percentage {
            cfg.max_risk_percentage = v;
        }
        if let Some(v) = self.default_lot_size {
            cfg.default_lot_size = v;
        }
        if let Some(v) = self.aggressive_override {
            cfg.aggressive_override = v;
        }
        if let Some(v) = self.scan_interval_secs {
            cfg.scan_interval_secs = v;
        }
        if let Some(v) = self.auto_recovery {
            cfg.auto_recovery = v;
        }
        if let Some(v) = self.strategy {
            cfg.strategy = v;
        }
        if let Some(v) = self.symbols {
            cfg.symbols = v;
        }
    }
}

/// 검증된 변경만 허용하는 설정 스토어.
///
/// 모든 setter는 사본을 수정해 검증한 뒤에만 커밋하므로,
/// 거부된 변경은 흔적 없이 기존 값이 유지됩니다.
/// 파일 저장 실패는 경고 로그만 남기고 메모리 값은 유지합니다.
#[derive(Debug)]
pub struct SettingsStore {
    inner: RwLock<BotConfig>,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// 메모리 전용 스토어를 생성합니다 (테스트/일회성 실행용).
    pub fn in_memory(config: BotConfig) -> Self {
        Self {
            inner: RwLock::new(config),
            path: None,
        }
    }

    /// 파일 기반 스토어를 생성합니다.
    pub fn open<P: AsRef<Path>>(path: P) -> TraderResult<Self> {
        let config = BotConfig::load(&path)?;
        Ok(Self {
            inner: RwLock::new(config),
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 현재 설정의 사본을 반환합니다.
    pub fn snapshot(&self) -> BotConfig {
        self.inner.read().expect("settings lock poisoned").clone()
    }

    /// 동시 오픈 주문 한도.
    pub fn max_orders(&self) -> u32 {
        self.inner.read().expect("settings lock poisoned").max_orders
    }

    /// 일일 주문 한도.
    pub fn max_daily_orders(&self) -> u32 {
        self.inner
            .read()
            .expect("settings lock poisoned")
            .max_daily_orders
    }

    /// 공격 모드 여부.
    pub fn aggressive_override(&self) -> bool {
        self.inner
            .read()
            .expect("settings lock poisoned")
            .aggressive_override
    }

    /// 스캔 주기 (5–300초로 클램프).
    pub fn scan_interval_secs(&self) -> u64 {
        self.inner
            .read()
            .expect("settings lock poisoned")
            .scan_interval_secs
            .clamp(5, 300)
    }

    /// 동시 오픈 주문 한도를 변경합니다 (1–100).
    pub fn set_max_orders(&self, value: u32) -> TraderResult<()> {
        self.mutate(|cfg| cfg.max_orders = value)
    }

    /// 일일 주문 한도를 변경합니다 (1–1000).
    pub fn set_max_daily_orders(&self, value: u32) -> TraderResult<()> {
        self.mutate(|cfg| cfg.max_daily_orders = value)
    }

    /// 거래당 최대 리스크를 변경합니다 (0.1–10%).
    pub fn set_max_risk_percentage(&self, value: f64) -> TraderResult<()> {
        self.mutate(|cfg| cfg.max_risk_percentage = value)
    }

    /// 기본 랏 크기를 변경합니다 (0.01–100).
    pub fn set_default_lot_size(&self, value: Decimal) -> TraderResult<()> {
        self.mutate(|cfg| cfg.default_lot_size = value)
    }

    /// 사본 수정 → 검증 → 커밋 순서로 변경을 적용합니다.
    fn mutate(&self, apply: impl FnOnce(&mut BotConfig)) -> TraderResult<()> {
        let mut guard = self.inner.write().expect("settings lock poisoned");
        let mut candidate = guard.clone();
        apply(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        drop(guard);

        self.persist();
        Ok(())
    }

    /// 현재 설정을 파일로 저장합니다. 실패는 치명적이지 않습니다.
    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let snapshot = self.snapshot();
        match snapshot.save(path) {
            Ok(()) => info!(path = %path.display(), "설정 저장 완료"),
            Err(e) => warn!(path = %path.display(), error = %e, "설정 저장 실패 (메모리 값은 유지)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut cfg = BotConfig::default();
        cfg.max_orders = 0;
        assert!(matches!(
            cfg.validate(),
            Err(TraderError::InvalidLimit(_))
        ));

        let mut cfg = BotConfig::default();
        cfg.max_daily_orders = 1001;
        assert!(cfg.validate().is_err());

        let mut cfg = BotConfig::default();
        cfg.max_risk_percentage = 0.05;
        assert!(cfg.validate().is_err());

        let mut cfg = BotConfig::default();
        cfg.scan_interval_secs = 4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejected_setter_retains_prior_value() {
        let store = SettingsStore::in_memory(BotConfig::default());

        assert!(store.set_max_daily_orders(200).is_ok());
        assert_eq!(store.max_daily_orders(), 200);

        // 범위 밖 값은 거부되고 기존 값이 유지된다
        assert!(store.set_max_daily_orders(0).is_err());
        assert_eq!(store.max_daily_orders(), 200);

        assert!(store.set_max_daily_orders(1001).is_err());
        assert_eq!(store.max_daily_orders(), 200);
    }

    #[test]
    fn test_set_max_daily_round_trip_bounds() {
        let store = SettingsStore::in_memory(BotConfig::default());
        for n in [1u32, 500, 1000] {
            assert!(store.set_max_daily_orders(n).is_ok());
            assert_eq!(store.max_daily_orders(), n);
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot_config.toml");

        let mut cfg = BotConfig::default();
        cfg.max_orders = 25;
        cfg.aggressive_override = true;
        cfg.save(&path).unwrap();

        let loaded = BotConfig::load(&path).unwrap();
        assert_eq!(loaded.max_orders, 25);
        assert!(loaded.aggressive_override);
        assert_eq!(loaded.strategy, StrategyKind::Scalping);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = BotConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.max_orders, BotConfig::default().max_orders);
    }

    #[test]
    fn test_scan_interval_clamped() {
        let mut cfg = BotConfig::default();
        cfg.scan_interval_secs = 300;
        let store = SettingsStore::in_memory(cfg);
        assert_eq!(store.scan_interval_secs(), 300);
    }
}
