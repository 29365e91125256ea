//! Per-mention feedback timers.
//!
//! While the webhook is working on a question, the typing indicator is refreshed on an
//! interval and a one-off notice is posted if the webhook is slow. Both run as
//! background tasks owned by [`ReplyTimers`], and both are aborted when it is
//! dropped, whichever way the webhook call ends.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::{base::config::Config, service::chat::ChatClient};

/// The typing ticker and slow-notice timer of one mention.
pub struct ReplyTimers {
    typing: JoinHandle<()>,
    slow_notice: JoinHandle<()>,
    slow_notice_sent: Arc<AtomicBool>,
}

impl ReplyTimers {
    /// Start both timers for `channel_id`.
    ///
    /// The first typing signal goes out right away.
    pub fn start(chat: ChatClient, channel_id: &str, config: &Config) -> Self {
        let slow_notice_sent = Arc::new(AtomicBool::new(false));

        let typing = {
            let chat = chat.clone();
            let channel_id = channel_id.to_string();
            let interval = config.typing_interval();

            tokio::spawn(
                async move {
                    let mut ticker = tokio::time::interval(interval);

                    loop {
                        ticker.tick().await;

                        if let Err(err) = chat.broadcast_typing(&channel_id).await {
                            warn!("Stopping typing indicator after failed signal: {}", err);
                            break;
                        }
                    }
                }
                .in_current_span(),
            )
        };

        let slow_notice = {
            let channel_id = channel_id.to_string();
            let delay = config.slow_notice_delay();
            let message = config.slow_notice_message.clone();
            let sent = slow_notice_sent.clone();

            tokio::spawn(
                async move {
                    tokio::time::sleep(delay).await;

                    sent.store(true, Ordering::SeqCst);
                    info!("Webhook is slow, sending notice ...");

                    if let Err(err) = chat.send_message(&channel_id, &message).await {
                        warn!("Failed to send slow notice: {}", err);
                    }
                }
                .in_current_span(),
            )
        };

        Self {
            typing,
            slow_notice,
            slow_notice_sent,
        }
    }

    /// Whether the slow notice has gone out.
    pub fn slow_notice_sent(&self) -> bool {
        self.slow_notice_sent.load(Ordering::SeqCst)
    }

    /// Cancel both timers, returning whether the slow notice went out.
    pub fn stop(self) -> bool {
        self.slow_notice_sent()
    }
}

impl Drop for ReplyTimers {
    fn drop(&mut self) {
        self.typing.abort();
        self.slow_notice.abort();

        debug!("Reply timers cancelled.");
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::{
        base::{
            config::ConfigInner,
            types::{Res, Void},
        },
        service::chat::GenericChatClient,
    };

    mock! {
        pub Chat {}

        #[async_trait]
        impl GenericChatClient for Chat {
            fn bot_user_id(&self) -> &str;
            async fn start(&self) -> Void;
            async fn broadcast_typing(&self, channel_id: &str) -> Void;
            async fn reply_to_message(&self, channel_id: &str, message_id: &str, text: &str) -> Void;
            async fn send_message(&self, channel_id: &str, text: &str) -> Void;
        }
    }

    struct Counters {
        typing: Arc<AtomicUsize>,
        notices: Arc<AtomicUsize>,
    }

    fn get_counting_chat(typing_result: fn() -> Void) -> (ChatClient, Counters) {
        let typing = Arc::new(AtomicUsize::new(0));
        let notices = Arc::new(AtomicUsize::new(0));

        let mut mock = MockChat::new();

        let typing_clone = typing.clone();
        mock.expect_broadcast_typing().returning(move |_| {
            typing_clone.fetch_add(1, Ordering::SeqCst);
            typing_result()
        });

        let notices_clone = notices.clone();
        mock.expect_send_message().returning(move |_, _| {
            notices_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        (ChatClient::new(Arc::new(mock)), Counters { typing, notices })
    }

    fn create_test_config() -> Config {
        Config {
            inner: Arc::new(ConfigInner::default()),
        }
    }

    fn failing_typing() -> Res<()> {
        Err(anyhow::anyhow!("missing permissions"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_ticks_until_stopped() {
        let (chat, counters) = get_counting_chat(|| Ok(()));
        let timers = ReplyTimers::start(chat, "100", &create_test_config());

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(counters.typing.load(Ordering::SeqCst), 3);

        assert!(!timers.stop());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counters.typing.load(Ordering::SeqCst), 3);
        assert_eq!(counters.notices.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_notice_fires_once() {
        let (chat, counters) = get_counting_chat(|| Ok(()));
        let timers = ReplyTimers::start(chat, "100", &create_test_config());

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert!(!timers.slow_notice_sent());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(timers.slow_notice_sent());
        assert_eq!(counters.notices.load(Ordering::SeqCst), 1);

        assert!(timers.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_failure_stops_ticker() {
        let (chat, counters) = get_counting_chat(failing_typing);
        let timers = ReplyTimers::start(chat, "100", &create_test_config());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counters.typing.load(Ordering::SeqCst), 1);

        // The slow notice is independent of the typing ticker.
        assert_eq!(counters.notices.load(Ordering::SeqCst), 1);

        drop(timers);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_notice() {
        let (chat, counters) = get_counting_chat(|| Ok(()));

        {
            let _timers = ReplyTimers::start(chat, "100", &create_test_config());
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counters.typing.load(Ordering::SeqCst), 1);
        assert_eq!(counters.notices.load(Ordering::SeqCst), 0);
    }
}
