//! Timer source for request timeouts.

use gloo_timers::future::TimeoutFuture;
use medscore::request::{LocalBoxFuture, Sleeper};
use std::time::Duration;

#[derive(Clone, Copy, Default)]
pub struct BrowserSleeper;

impl Sleeper for BrowserSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }
}
