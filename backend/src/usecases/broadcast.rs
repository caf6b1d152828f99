use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use domain::{
    repositories::{channel::ChannelGateway, users::UserRepository},
    value_objects::broadcast::BroadcastMessage,
};

/// Small pause between outbound messages to respect transport rate
/// limits.
const INTER_MESSAGE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Fans a message out to every known user as a detached background
/// task; the request path only learns how many recipients were queued.
pub struct BroadcastUseCase<U, G>
where
    U: UserRepository + Send + Sync + 'static,
    G: ChannelGateway + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    channel: Arc<G>,
}

impl<U, G> BroadcastUseCase<U, G>
where
    U: UserRepository + Send + Sync + 'static,
    G: ChannelGateway + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, channel: Arc<G>) -> Self {
        Self { user_repo, channel }
    }

    pub async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError> {
        if message.text.trim().is_empty() {
            return Err(BroadcastError::Validation(
                "broadcast text must not be empty".to_string(),
            ));
        }

        let user_ids = self.user_repo.list_user_ids().await.map_err(|err| {
            error!(db_error = ?err, "broadcast: failed to list recipients");
            BroadcastError::Internal(err)
        })?;

        let queued = user_ids.len();
        info!(queued, "broadcast: starting delivery");

        let channel = Arc::clone(&self.channel);
        tokio::spawn(async move {
            let report = deliver_to_all(channel, user_ids, message).await;
            info!(
                sent = report.sent,
                failed = report.failed,
                "broadcast: completed"
            );
        });

        Ok(queued)
    }
}

// One unreachable recipient must not abort the batch; failures are
// counted and logged, never retried.
async fn deliver_to_all<G>(
    channel: Arc<G>,
    user_ids: Vec<i64>,
    message: BroadcastMessage,
) -> BroadcastReport
where
    G: ChannelGateway + Send + Sync + 'static,
{
    let mut report = BroadcastReport::default();

    for user_id in user_ids {
        let result = match message.photo_id.as_deref() {
            Some(photo_id) => channel.send_photo(user_id, photo_id, &message.text).await,
            None => channel.send_text(user_id, &message.text).await,
        };

        match result {
            Ok(()) => report.sent += 1,
            Err(err) => {
                warn!(user_id, error = ?err, "broadcast: delivery failed");
                report.failed += 1;
            }
        }

        tokio::time::sleep(INTER_MESSAGE_DELAY).await;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use domain::repositories::channel::MockChannelGateway;
    use domain::repositories::users::MockUserRepository;

    #[tokio::test]
    async fn one_blocked_recipient_does_not_abort_the_batch() {
        let mut channel = MockChannelGateway::new();
        channel
            .expect_send_text()
            .times(3)
            .returning(|user_id, _| {
                if user_id == 2 {
                    Err(anyhow!("bot was blocked by the user"))
                } else {
                    Ok(())
                }
            });

        let report = deliver_to_all(
            Arc::new(channel),
            vec![1, 2, 3],
            BroadcastMessage {
                text: "hello".to_string(),
                photo_id: None,
            },
        )
        .await;

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn photo_broadcasts_use_the_photo_call() {
        let mut channel = MockChannelGateway::new();
        channel
            .expect_send_photo()
            .withf(|_, photo_id, caption| photo_id == "file-1" && caption == "hello")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let report = deliver_to_all(
            Arc::new(channel),
            vec![1],
            BroadcastMessage {
                text: "hello".to_string(),
                photo_id: Some("file-1".to_string()),
            },
        )
        .await;

        assert_eq!(report.sent, 1);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_queueing() {
        let usecase = BroadcastUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockChannelGateway::new()),
        );

        let result = usecase
            .broadcast(BroadcastMessage {
                text: "   ".to_string(),
                photo_id: None,
            })
            .await;
        assert!(matches!(result, Err(BroadcastError::Validation(_))));
    }
}
