use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::push::SubscribeRequest;
use crate::error::Result;
use crate::models::PushSubscription;
use crate::repository::push_subscription::PushSubscriptionRepository;

/// What to do with a subscribe request, given every record sharing its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The requester already owns the endpoint: refresh keys and reactivate.
    Refresh { subscription_id: Uuid, stale: Vec<Uuid> },
    /// Another user's record with identical keys: same device, new owner.
    Reassign { subscription_id: Uuid, stale: Vec<Uuid> },
    /// Another user holds a live record with different keys. Leave it alone.
    Reject,
    /// Endpoint never seen (or only dead records of other users).
    Insert,
}

impl Reconciliation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Refresh { .. } => "refresh",
            Self::Reassign { .. } => "reassign",
            Self::Reject => "reject",
            Self::Insert => "insert",
        }
    }
}

fn active_except(existing: &[PushSubscription], keep: Uuid) -> Vec<Uuid> {
    existing
        .iter()
        .filter(|s| s.is_active && s.subscription_id != keep)
        .map(|s| s.subscription_id)
        .collect()
}

/// Decides how a subscribe request for an endpoint is applied.
///
/// `existing` holds every record with that endpoint, most recently updated
/// first. Ownership is decided by endpoint; moving it to another user requires
/// the exact key material, so knowing an endpoint URL is not enough to take
/// over someone's push target.
pub fn reconcile(
    user_id: Uuid,
    p256dh: &str,
    auth: &str,
    existing: &[PushSubscription],
) -> Reconciliation {
    if let Some(own) = existing.iter().find(|s| s.user_id == user_id) {
        return Reconciliation::Refresh {
            subscription_id: own.subscription_id,
            stale: active_except(existing, own.subscription_id),
        };
    }

    if let Some(same_device) = existing.iter().find(|s| s.keys_match(p256dh, auth)) {
        return Reconciliation::Reassign {
            subscription_id: same_device.subscription_id,
            stale: active_except(existing, same_device.subscription_id),
        };
    }

    if existing.iter().any(|s| s.is_active) {
        return Reconciliation::Reject;
    }

    Reconciliation::Insert
}

/// Registers (or re-registers) a push endpoint for `user_id`.
///
/// Conflicts with another user's live subscription are swallowed so callers
/// cannot learn who owns an endpoint.
pub async fn subscribe(
    pool: &PgPool,
    user_id: Uuid,
    request: &SubscribeRequest,
) -> Result<Reconciliation> {
    let repo = PushSubscriptionRepository::new(pool);
    let mut tx = pool.begin().await?;

    let existing = repo.lock_by_endpoint(&request.endpoint, &mut tx).await?;
    let decision = reconcile(
        user_id,
        &request.keys.p256dh,
        &request.keys.auth,
        &existing,
    );

    match &decision {
        Reconciliation::Refresh {
            subscription_id,
            stale,
        }
        | Reconciliation::Reassign {
            subscription_id,
            stale,
        } => {
            repo.deactivate_many(stale, &mut tx).await?;
            repo.claim(*subscription_id, user_id, &request.keys, &mut tx)
                .await?;
        }
        Reconciliation::Insert => {
            repo.insert(user_id, &request.endpoint, &request.keys, &mut tx)
                .await?;
        }
        Reconciliation::Reject => {
            warn!(
                user_id = %user_id,
                "Push endpoint is registered to another user with different keys, ignoring"
            );
        }
    }

    tx.commit().await?;

    info!(user_id = %user_id, outcome = decision.kind(), "Push subscription reconciled");

    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(user_id: Uuid, p256dh: &str, auth: &str, is_active: bool) -> PushSubscription {
        let now = chrono::Utc::now().naive_utc();
        PushSubscription {
            subscription_id: Uuid::new_v4(),
            user_id,
            endpoint: "https://push.example.com/send/device-1".to_string(),
            p256dh: p256dh.to_string(),
            auth: auth.to_string(),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unseen_endpoint_is_inserted() {
        let decision = reconcile(Uuid::new_v4(), "p", "a", &[]);
        assert_eq!(decision, Reconciliation::Insert);
    }

    #[test]
    fn test_same_user_new_keys_refreshes_in_place() {
        let user = Uuid::new_v4();
        let own = subscription(user, "old-p", "old-a", true);

        let decision = reconcile(user, "new-p", "new-a", std::slice::from_ref(&own));
        assert_eq!(
            decision,
            Reconciliation::Refresh {
                subscription_id: own.subscription_id,
                stale: vec![],
            }
        );
    }

    #[test]
    fn test_same_user_refresh_deactivates_other_owners() {
        let user = Uuid::new_v4();
        let other = subscription(Uuid::new_v4(), "p", "a", true);
        let own = subscription(user, "p", "a", false);

        let decision = reconcile(user, "p", "a", &[other.clone(), own.clone()]);
        assert_eq!(
            decision,
            Reconciliation::Refresh {
                subscription_id: own.subscription_id,
                stale: vec![other.subscription_id],
            }
        );
    }

    #[test]
    fn test_other_user_matching_keys_transfers_ownership() {
        let previous_owner = subscription(Uuid::new_v4(), "p", "a", true);

        let decision = reconcile(Uuid::new_v4(), "p", "a", std::slice::from_ref(&previous_owner));
        assert_eq!(
            decision,
            Reconciliation::Reassign {
                subscription_id: previous_owner.subscription_id,
                stale: vec![],
            }
        );
    }

    #[test]
    fn test_reassign_deactivates_siblings() {
        let matching = subscription(Uuid::new_v4(), "p", "a", true);
        let sibling = subscription(Uuid::new_v4(), "x", "y", true);

        let decision = reconcile(Uuid::new_v4(), "p", "a", &[sibling.clone(), matching.clone()]);
        assert_eq!(
            decision,
            Reconciliation::Reassign {
                subscription_id: matching.subscription_id,
                stale: vec![sibling.subscription_id],
            }
        );
    }

    #[test]
    fn test_other_user_different_keys_is_rejected() {
        let live = subscription(Uuid::new_v4(), "p", "a", true);

        let decision = reconcile(Uuid::new_v4(), "p", "other-auth", &[live]);
        assert_eq!(decision, Reconciliation::Reject);
    }

    #[test]
    fn test_dead_foreign_record_does_not_block() {
        let dead = subscription(Uuid::new_v4(), "p", "a", false);

        let decision = reconcile(Uuid::new_v4(), "q", "b", &[dead]);
        assert_eq!(decision, Reconciliation::Insert);
    }

    mod db {
        use sqlx::PgPool;

        use super::*;
        use crate::dto::push::SubscriptionKeys;
        use crate::test_fixtures::insert_user;

        const ENDPOINT: &str = "https://push.example.com/send/device-1";

        fn request(p256dh: &str, auth: &str) -> SubscribeRequest {
            SubscribeRequest {
                endpoint: ENDPOINT.to_string(),
                keys: SubscriptionKeys {
                    p256dh: p256dh.to_string(),
                    auth: auth.to_string(),
                },
            }
        }

        async fn endpoint_rows(pool: &PgPool) -> Vec<PushSubscription> {
            let repo = PushSubscriptionRepository::new(pool);
            let mut tx = pool.begin().await.unwrap();
            repo.lock_by_endpoint(ENDPOINT, &mut tx).await.unwrap()
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn test_resubscribe_refreshes_same_row(pool: PgPool) {
            let user = insert_user(&pool).await;

            subscribe(&pool, user, &request("p1", "a1")).await.unwrap();
            let before = endpoint_rows(&pool).await;

            let decision = subscribe(&pool, user, &request("p2", "a2")).await.unwrap();
            assert_eq!(decision.kind(), "refresh");

            let after = endpoint_rows(&pool).await;
            assert_eq!(after.len(), 1);
            assert_eq!(after[0].subscription_id, before[0].subscription_id);
            assert!(after[0].keys_match("p2", "a2"));
            assert!(after[0].is_active);
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn test_matching_keys_move_row_to_new_user(pool: PgPool) {
            let previous = insert_user(&pool).await;
            let current = insert_user(&pool).await;

            subscribe(&pool, previous, &request("p", "a")).await.unwrap();
            let decision = subscribe(&pool, current, &request("p", "a")).await.unwrap();
            assert_eq!(decision.kind(), "reassign");

            let rows = endpoint_rows(&pool).await;
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].user_id, current);
            assert!(rows[0].is_active);
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn test_foreign_live_endpoint_is_left_untouched(pool: PgPool) {
            let owner = insert_user(&pool).await;
            let intruder = insert_user(&pool).await;

            subscribe(&pool, owner, &request("p", "a")).await.unwrap();
            let decision = subscribe(&pool, intruder, &request("p", "forged"))
                .await
                .unwrap();
            assert_eq!(decision, Reconciliation::Reject);

            let rows = endpoint_rows(&pool).await;
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].user_id, owner);
            assert!(rows[0].keys_match("p", "a"));
            assert!(rows[0].is_active);
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn test_duplicate_insert_keeps_one_live_row(pool: PgPool) {
            let user = insert_user(&pool).await;
            let repo = PushSubscriptionRepository::new(&pool);

            for keys in [("p1", "a1"), ("p2", "a2")] {
                let mut tx = pool.begin().await.unwrap();
                repo.insert(user, ENDPOINT, &request(keys.0, keys.1).keys, &mut tx)
                    .await
                    .unwrap();
                tx.commit().await.unwrap();
            }

            let rows = repo.list_active_for_user(user).await.unwrap();
            assert_eq!(rows.len(), 1);
            assert!(rows[0].keys_match("p2", "a2"));
        }
    }
}
