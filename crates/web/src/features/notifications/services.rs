use sqlx::PgPool;
use storage::{
    dto::push::{DispatchReport, SendNotificationRequest, SubscribeRequest},
    error::Result,
    models::PushSubscription,
    repository::push_subscription::PushSubscriptionRepository,
    services::subscription,
};
use uuid::Uuid;

use crate::push::{PushError, PushPayload, PushTransport};

pub async fn list_subscriptions(pool: &PgPool, user_id: Uuid) -> Result<Vec<PushSubscription>> {
    let repo = PushSubscriptionRepository::new(pool);
    repo.list_for_user(user_id).await
}

/// Register an endpoint. The outcome is deliberately not returned to callers.
pub async fn subscribe(pool: &PgPool, user_id: Uuid, request: &SubscribeRequest) -> Result<()> {
    subscription::subscribe(pool, user_id, request).await?;
    Ok(())
}

/// Missing records are not an error
pub async fn unsubscribe(pool: &PgPool, user_id: Uuid, endpoint: &str) -> Result<()> {
    let repo = PushSubscriptionRepository::new(pool);
    if repo.delete_for_user(user_id, endpoint).await? {
        tracing::info!(user_id = %user_id, "Push subscription removed");
    }
    Ok(())
}

impl From<&SendNotificationRequest> for PushPayload {
    fn from(request: &SendNotificationRequest) -> Self {
        Self {
            title: request.title.clone(),
            body: request.body.clone(),
            url: request.url.clone(),
        }
    }
}

/// Sends `payload` to each subscription, returning the report and the
/// subscriptions the push service reported gone.
pub async fn deliver(
    transport: &dyn PushTransport,
    subscriptions: &[PushSubscription],
    payload: &PushPayload,
) -> (DispatchReport, Vec<Uuid>) {
    let mut report = DispatchReport::default();
    let mut gone = Vec::new();

    for subscription in subscriptions {
        match transport.send(subscription, payload).await {
            Ok(()) => report.delivered += 1,
            Err(PushError::Gone) => gone.push(subscription.subscription_id),
            Err(e) => {
                tracing::warn!(
                    subscription_id = %subscription.subscription_id,
                    error = %e,
                    "Push delivery failed"
                );
                report.failed += 1;
            }
        }
    }

    (report, gone)
}

/// Send a notification to every active subscription of a user, deleting
/// subscriptions that no longer exist on the push service.
pub async fn dispatch(
    pool: &PgPool,
    transport: &dyn PushTransport,
    user_id: Uuid,
    payload: &PushPayload,
) -> Result<DispatchReport> {
    let repo = PushSubscriptionRepository::new(pool);
    let subscriptions = repo.list_active_for_user(user_id).await?;

    let (mut report, gone) = deliver(transport, &subscriptions, payload).await;

    for subscription_id in gone {
        match repo.delete(subscription_id).await {
            Ok(()) => report.removed += 1,
            Err(e) => {
                tracing::warn!(subscription_id = %subscription_id, error = %e, "Failed to delete gone subscription");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        user_id = %user_id,
        delivered = report.delivered,
        removed = report.removed,
        failed = report.failed,
        "Notification dispatched"
    );

    Ok(report)
}
