//! 지표 엔진과 전략 평가기.
//!
//! 캔들 시리즈에 기술적 지표를 붙이고, 전략별 규칙으로 매수/매도
//! 신호를 산출합니다. 두 단계 모두 trait 뒤에 있어 파이프라인은
//! 구현을 교체할 수 있습니다.

pub mod evaluator;
pub mod indicators;

pub use evaluator::{RuleStrategyEngine, StrategyEngine};
pub use indicators::{IndicatorEngine, TaIndicatorEngine};
