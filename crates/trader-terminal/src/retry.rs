//! 유계 재시도 헬퍼.
//!
//! 터미널 조회는 항상 유한한 횟수와 고정 백오프 안에서만 재시도합니다.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{TerminalError, TerminalResult};

/// 기본 재시도 횟수.
pub const DEFAULT_ATTEMPTS: u32 = 3;
/// 기본 재시도 간격.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

/// 작업을 최대 `attempts`회, `backoff` 고정 간격으로 재시도합니다.
///
/// 재시도 가능한 에러만 재시도하며, 재시도 불가 에러는 즉시 반환합니다.
pub async fn with_retry<T, F, Fut>(
    op_name: &str,
    attempts: u32,
    backoff: Duration,
    mut operation: F,
) -> TerminalResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TerminalResult<T>>,
{
    let mut last_err = TerminalError::Internal(format!("{}: no attempts made", op_name));

    for attempt in 1..=attempts.max(1) {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(
                    operation = op_name,
                    attempt,
                    error = %e,
                    "재시도 가능 에러, 백오프 후 재시도"
                );
                last_err = e;
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err)
}
