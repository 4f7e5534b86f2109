//! Self-clearing "added to cart" notice.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long a notice stays up unless configured otherwise.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Current notice state.
///
/// `generation` increases with every [`NoticeTimer::show`], so a timer can
/// tell whether the message it was scheduled for is still the one shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub generation: u64,
    pub text: Option<String>,
}

/// Cancellable one-shot timer that clears a notice.
///
/// Showing a new message supersedes the pending timer. Dropping the timer
/// cancels it.
#[derive(Debug)]
pub struct NoticeTimer {
    duration: Duration,
    state: Arc<watch::Sender<Notice>>,
    pending: Option<JoinHandle<()>>,
}

impl NoticeTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: Arc::new(watch::Sender::new(Notice::default())),
            pending: None,
        }
    }

    /// Publish `message` and schedule it to clear after the configured duration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, message: impl Into<String>) {
        self.abort_pending();

        let mut generation = 0;
        self.state.send_modify(|notice| {
            notice.generation += 1;
            notice.text = Some(message.into());
            generation = notice.generation;
        });

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            state.send_if_modified(|notice| {
                if notice.generation == generation && notice.text.is_some() {
                    notice.text = None;
                    true
                } else {
                    false
                }
            });
        }));
    }

    /// Clear the notice now and drop the pending timer.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.state
            .send_if_modified(|notice| notice.text.take().is_some());
    }

    /// The message currently shown.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.state.borrow().text.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Notice> {
        self.state.subscribe()
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Default for NoticeTimer {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_clears_after_duration() {
        let mut timer = NoticeTimer::default();
        timer.show("Library Stool Chair has been added to the cart!");

        sleep(Duration::from_secs(2)).await;
        assert_eq!(
            timer.current().as_deref(),
            Some("Library Stool Chair has been added to the cart!")
        );

        sleep(Duration::from_millis(1001)).await;
        assert_eq!(timer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_trigger_supersedes_old() {
        let mut timer = NoticeTimer::default();
        timer.show("first");
        sleep(Duration::from_secs(2)).await;
        timer.show("second");

        // The first timer would have fired here
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(timer.current().as_deref(), Some("second"));

        sleep(Duration::from_millis(1600)).await;
        assert_eq!(timer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_clears_immediately() {
        let mut timer = NoticeTimer::default();
        let mut rx = timer.subscribe();
        timer.show("hello");
        rx.mark_unchanged();

        timer.cancel();
        assert_eq!(timer.current(), None);
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_fires_once() {
        let mut timer = NoticeTimer::new(Duration::from_secs(1));
        let mut rx = timer.subscribe();
        timer.show("hello");
        rx.mark_unchanged();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().text, None);

        sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let mut timer = NoticeTimer::default();
        let rx = timer.subscribe();
        timer.show("hello");
        drop(timer);

        sleep(Duration::from_secs(5)).await;
        // Sender dropped with the message still set
        assert_eq!(rx.borrow().text.as_deref(), Some("hello"));
    }
}
