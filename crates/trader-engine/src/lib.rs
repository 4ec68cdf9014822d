//! 트레이딩 엔진.
//!
//! 신호 수용 파이프라인과 취소 가능한 트레이딩 루프 컨트롤러를
//! 제공합니다. 외부 협력자는 모두 trait 뒤에 있어 시뮬레이션
//! 터미널이든 실터미널이든 같은 엔진으로 구동됩니다.

pub mod controller;
pub mod error;
pub mod pipeline;
pub mod wait;

pub use controller::{BotStatus, LoopState, TradingController};
pub use error::{EngineError, EngineResult};
pub use pipeline::{AnalysisResult, ScanSummary, SignalAdmissionPipeline, BARS_PER_FETCH};
pub use wait::cancellable_sleep;
