//! The click loop and its cancellation flag.

use crate::config::ClickConfig;
use crate::error::Result;
use crate::input::MouseInjector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Longest uninterrupted sleep while a cancellation token is attached.
const SLEEP_SLICE: Duration = Duration::from_millis(20);

/// Shared stop flag for a running click loop.
///
/// Clones observe the same flag. The loop only reads it; front ends set it
/// to stop and reset it before starting another run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Outcome of one click loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickSummary {
    /// Press/release pairs emitted.
    pub clicks: u64,
    /// The loop ended because the token was set.
    pub cancelled: bool,
}

/// Run the click loop to completion.
///
/// Waits for the start delay, then clicks once per interval until the
/// configured count is reached or `cancel` is set. The token is checked once
/// per iteration before clicking; sleeps also end early when it is set, so a
/// stop request is honoured within one interval. Injector errors end the run
/// and are returned as-is.
pub fn run_click_loop<I>(
    config: &ClickConfig,
    injector: &mut I,
    cancel: Option<&CancelToken>,
) -> Result<ClickSummary>
where
    I: MouseInjector + ?Sized,
{
    config.validate()?;

    let interval = config.interval();
    let limit = config.limit();
    info!(
        interval_ms = config.interval_ms,
        count = config.count,
        button = %config.button,
        delay_secs = config.delay_secs,
        "click loop starting"
    );

    let delay = config.delay()?;
    if !delay.is_zero() {
        debug!(?delay, "waiting before first click");
        pause(delay, cancel);
    }

    let started = Instant::now();
    let mut clicks = 0u64;
    let cancelled = loop {
        if limit.is_some_and(|limit| clicks >= limit) {
            break false;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            break true;
        }

        injector.click(config.button)?;
        clicks += 1;
        trace!(clicks, "click emitted");

        pause(interval, cancel);
    };

    if cancelled {
        info!(clicks, elapsed = ?started.elapsed(), "click loop stopped");
    } else {
        info!(clicks, elapsed = ?started.elapsed(), "click loop finished");
    }

    Ok(ClickSummary { clicks, cancelled })
}

fn pause(duration: Duration, cancel: Option<&CancelToken>) {
    let Some(cancel) = cancel else {
        thread::sleep(duration);
        return;
    };

    // No representable deadline: wait for the token alone.
    let deadline = Instant::now().checked_add(duration);
    loop {
        if cancel.is_cancelled() {
            return;
        }
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return;
                }
                (deadline - now).min(SLEEP_SLICE)
            }
            None => SLEEP_SLICE,
        };
        thread::sleep(slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MouseButton;
    use crate::error::ClickerError;

    #[derive(Default)]
    struct Counter {
        presses: u32,
        releases: u32,
    }

    impl MouseInjector for Counter {
        fn press(&mut self, _button: MouseButton) -> Result<()> {
            self.presses += 1;
            Ok(())
        }

        fn release(&mut self, _button: MouseButton) -> Result<()> {
            self.releases += 1;
            Ok(())
        }
    }

    struct Failing;

    impl MouseInjector for Failing {
        fn press(&mut self, _button: MouseButton) -> Result<()> {
            Err(ClickerError::input_injection("denied"))
        }

        fn release(&mut self, _button: MouseButton) -> Result<()> {
            Ok(())
        }
    }

    fn fast(count: i64) -> ClickConfig {
        ClickConfig {
            interval_ms: 1,
            count,
            ..ClickConfig::default()
        }
    }

    #[test]
    fn test_cancel_token_set_check_clear() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());

        clone.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_loop_stops_at_count() {
        let mut counter = Counter::default();
        let summary = run_click_loop(&fast(3), &mut counter, None).unwrap();

        assert_eq!(summary, ClickSummary { clicks: 3, cancelled: false });
        assert_eq!(counter.presses, 3);
        assert_eq!(counter.releases, 3);
    }

    #[test]
    fn test_invalid_config_emits_nothing() {
        let mut counter = Counter::default();
        let result = run_click_loop(&fast(-1), &mut counter, None);

        assert!(matches!(result, Err(ClickerError::InvalidConfig { field: "count", .. })));
        assert_eq!(counter.presses, 0);
    }

    #[test]
    fn test_pre_cancelled_token_emits_nothing() {
        let token = CancelToken::new();
        token.cancel();

        let mut counter = Counter::default();
        let summary = run_click_loop(&fast(0), &mut counter, Some(&token)).unwrap();

        assert_eq!(summary, ClickSummary { clicks: 0, cancelled: true });
        assert_eq!(counter.presses, 0);
    }

    #[test]
    fn test_unrepresentable_pause_waits_for_token() {
        let token = CancelToken::new();
        let canceller = {
            let token = token.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                token.cancel();
            })
        };

        let started = Instant::now();
        pause(Duration::MAX, Some(&token));
        assert!(started.elapsed() >= Duration::from_millis(20));
        canceller.join().unwrap();
    }

    #[test]
    fn test_out_of_range_delay_emits_nothing() {
        let token = CancelToken::new();
        let config = ClickConfig {
            delay_secs: 1e19,
            ..fast(1)
        };

        let mut counter = Counter::default();
        let result = run_click_loop(&config, &mut counter, Some(&token));

        assert!(matches!(result, Err(ClickerError::InvalidConfig { field: "delay", .. })));
        assert_eq!(counter.presses, 0);
    }

    #[test]
    fn test_injector_error_ends_the_run() {
        let result = run_click_loop(&fast(5), &mut Failing, None);
        assert!(matches!(result, Err(ClickerError::InputInjection(_))));
    }
}
