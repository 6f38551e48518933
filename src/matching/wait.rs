//! Poll-until-timeout loop shared by every waiting operation

use crate::error::FinderResult;
use std::time::{Duration, Instant};

/// Run `probe` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once, also with a zero timeout. Between
/// attempts the loop sleeps `interval`, but never past the deadline, so a
/// final attempt happens right at the timeout. Probe errors abort the wait.
///
/// Returns `Ok(None)` on timeout.
pub fn poll_until<T>(
    timeout: Duration,
    interval: Duration,
    mut probe: impl FnMut() -> FinderResult<Option<T>>,
) -> FinderResult<Option<T>> {
    let start = Instant::now();
    let deadline = start.checked_add(timeout);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        if let Some(value) = probe()? {
            log::debug!(
                "Poll succeeded on attempt {} after {}ms",
                attempt,
                start.elapsed().as_millis()
            );
            return Ok(Some(value));
        }

        let now = Instant::now();
        let remaining = match deadline {
            Some(deadline) if now >= deadline => {
                log::debug!(
                    "Poll timed out after {} attempts ({}ms)",
                    attempt,
                    start.elapsed().as_millis()
                );
                return Ok(None);
            }
            Some(deadline) => deadline - now,
            // Timeout too large to represent: wait forever
            None => interval,
        };

        std::thread::sleep(interval.min(remaining));
    }
}
