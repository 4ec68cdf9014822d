//! 설정 스토어 기반 파라미터 소스.

use rust_decimal::Decimal;
use std::sync::Arc;
use trader_core::{SettingsStore, StrategyKind};

use crate::traits::ParameterSource;

/// `SettingsStore`를 파라미터 소스로 노출합니다.
///
/// 전략과 랏 크기는 설정 문서를 따르고, TP/SL은 전략별 기본
/// 테이블을 사용합니다.
pub struct SettingsParameterSource {
    store: Arc<SettingsStore>,
    selected_symbol: Option<String>,
}

impl SettingsParameterSource {
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self {
            store,
            selected_symbol: None,
        }
    }

    /// 단일 심볼만 스캔하도록 고정합니다.
    pub fn with_selected_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.selected_symbol = Some(symbol.into());
        self
    }
}

impl ParameterSource for SettingsParameterSource {
    fn strategy(&self) -> StrategyKind {
        self.store.snapshot().strategy
    }

    fn lot_size(&self, _strategy: StrategyKind) -> Decimal {
        self.store.snapshot().default_lot_size
    }

    fn tp_pips(&self, strategy: StrategyKind) -> u32 {
        strategy.default_tp_pips()
    }

    fn sl_pips(&self, strategy: StrategyKind) -> u32 {
        strategy.default_sl_pips()
    }

    fn scan_interval_secs(&self) -> u64 {
        self.store.scan_interval_secs()
    }

    fn selected_symbol(&self) -> Option<String> {
        self.selected_symbol.clone()
    }
}
