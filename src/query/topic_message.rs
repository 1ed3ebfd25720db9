//! Topic message subscriptions.

use std::time::Duration;

use bytes::Bytes;
use futures::{
    StreamExt,
    stream::{self, BoxStream},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::{
    client::{Client, ClientError},
    error::{LedgerError, Result},
    id::{Timestamp, TopicId},
    network::TopicSubscription,
};

/// A message as ordered by consensus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicMessage {
    pub topic_id: TopicId,
    /// Position in the topic, starting at 1.
    pub sequence_number: u64,
    pub consensus_timestamp: Timestamp,
    pub contents: Bytes,
    /// Hash chaining this message to every earlier one in the topic.
    pub running_hash: Vec<u8>,
}

/// Subscribes to the messages of a topic.
#[derive(Clone, Debug, Default)]
pub struct TopicMessageQuery {
    topic_id: Option<TopicId>,
    start_time: Timestamp,
}

impl TopicMessageQuery {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn topic_id(mut self, topic_id: TopicId) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// Skip messages that reached consensus before `start_time`. Defaults to
    /// the epoch, replaying the whole topic.
    #[must_use]
    pub fn start_time(mut self, start_time: Timestamp) -> Self {
        self.start_time = start_time;
        self
    }

    /// Stream the topic's messages in sequence order: history first, then
    /// live messages as they reach consensus.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] without a topic id and
    /// `INVALID_TOPIC_ID` for unknown topics.
    pub async fn subscribe(&self, client: &Client) -> Result<BoxStream<'static, TopicMessage>> {
        let topic_id = self.topic_id.ok_or(ClientError::MissingField("topic_id"))?;
        let subscription = client.network().subscribe_topic(&topic_id, self.start_time).await?;
        debug!(%topic_id, backlog = subscription.backlog.len(), "subscribed to topic");
        Ok(into_stream(subscription, self.start_time))
    }

    /// Wait for the first message accepted by `predicate`.
    ///
    /// The subscription is dropped once this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SubscriptionTimeout`] when nothing matches
    /// within `timeout` and [`LedgerError::SubscriptionClosed`] if the stream
    /// ends first.
    pub async fn wait_for<P>(&self, client: &Client, timeout: Duration, mut predicate: P) -> Result<TopicMessage>
    where
        P: FnMut(&TopicMessage) -> bool,
    {
        let mut messages = self.subscribe(client).await?;
        let first_match = async {
            while let Some(message) = messages.next().await {
                if predicate(&message) {
                    return Some(message);
                }
            }
            None
        };
        match tokio::time::timeout(timeout, first_match).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(LedgerError::SubscriptionClosed),
            Err(_) => Err(LedgerError::SubscriptionTimeout(timeout)),
        }
    }
}

fn into_stream(subscription: TopicSubscription, start_time: Timestamp) -> BoxStream<'static, TopicMessage> {
    let TopicSubscription { backlog, live } = subscription;
    let last_seen = backlog.last().map_or(0, |m| m.sequence_number);
    let history = stream::iter(backlog);
    let live = stream::unfold((live, last_seen), |(mut rx, last_seen)| async move {
        loop {
            match rx.recv().await {
                Ok(message) if message.sequence_number <= last_seen => {}
                Ok(message) => {
                    let seen = message.sequence_number;
                    return Some((message, (rx, seen)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "topic subscriber lagged; messages were dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    history
        .chain(live)
        .filter(move |m| futures::future::ready(m.consensus_timestamp >= start_time))
        .boxed()
}
