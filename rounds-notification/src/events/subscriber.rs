use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;
use uuid::Uuid;

use rounds_shared::types::event::{payloads, routing_keys, Event};

use crate::models::NewNotification;
use crate::services::notification_service;
use crate::AppState;

/// Notification row for one member of a freshly created match group.
fn group_matched(data: &payloads::GroupCreated, member_id: Uuid) -> NewNotification {
    NewNotification {
        profile_id: member_id,
        kind: "group_matched".into(),
        title: "You've been matched".into(),
        message: format!(
            "You joined {} for week {}. Say hello in your group chat!",
            data.group_name, data.match_week
        ),
        payload: Some(serde_json::json!({
            "match_id": data.match_id,
            "group_name": data.group_name,
            "match_week": data.match_week,
            "average_compatibility": data.average_compatibility,
        })),
    }
}

/// Notification row for a verification outcome.
fn verification_outcome(data: &payloads::ProfileVerified) -> NewNotification {
    let (title, message) = if data.verified {
        (
            "Verification approved",
            "Your medical credentials were verified. You are now eligible for weekly matching.",
        )
    } else {
        (
            "Verification update",
            "Your verification status changed. Contact support if this is unexpected.",
        )
    };

    NewNotification {
        profile_id: data.profile_id,
        kind: "profile_verified".into(),
        title: title.into(),
        message: message.into(),
        payload: Some(serde_json::json!({ "verified": data.verified })),
    }
}

/// Listen for weekly matching group events and notify every member.
pub async fn listen_matching_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe(
            "rounds-notification.matching",
            &[routing_keys::MATCHING_GROUP_CREATED],
        )
        .await?;

    tracing::info!("listening for matching events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::GroupCreated>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            match_id = %data.match_id,
                            group = %data.group_name,
                            members = data.member_ids.len(),
                            "received matching.group.created event"
                        );

                        for member_id in &data.member_ids {
                            let new = group_matched(data, *member_id);
                            if let Err(e) = notification_service::create_notification(&state.db, new)
                            {
                                tracing::error!(
                                    error = %e,
                                    profile_id = %member_id,
                                    "failed to create group_matched notification"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize matching.group.created event");
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "matching consumer error");
            }
        }
    }

    Ok(())
}

/// Listen for verification outcomes on profiles.
pub async fn listen_profile_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe(
            "rounds-notification.profile",
            &[routing_keys::PROFILE_VERIFIED],
        )
        .await?;

    tracing::info!("listening for profile events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::ProfileVerified>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            profile_id = %data.profile_id,
                            verified = data.verified,
                            "received profile.verified event"
                        );

                        let new = verification_outcome(data);
                        if let Err(e) = notification_service::create_notification(&state.db, new) {
                            tracing::error!(
                                error = %e,
                                profile_id = %data.profile_id,
                                "failed to create profile_verified notification"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize profile.verified event");
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "profile consumer error");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_created() -> payloads::GroupCreated {
        payloads::GroupCreated {
            match_id: Uuid::new_v4(),
            group_name: "Cardiology Group 1".into(),
            match_week: "2026-W35".into(),
            member_ids: vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
            average_compatibility: 82,
        }
    }

    #[test]
    fn group_matched_addresses_the_member() {
        let data = group_created();
        let member = data.member_ids[1];
        let new = group_matched(&data, member);

        assert_eq!(new.profile_id, member);
        assert_eq!(new.kind, "group_matched");
        assert!(new.message.contains("Cardiology Group 1"));
        assert!(new.message.contains("2026-W35"));

        let payload = new.payload.unwrap();
        assert_eq!(payload["match_id"], serde_json::json!(data.match_id));
        assert_eq!(payload["average_compatibility"], 82);
    }

    #[test]
    fn verification_outcome_copy_differs_by_result() {
        let profile_id = Uuid::new_v4();

        let approved = verification_outcome(&payloads::ProfileVerified {
            profile_id,
            verified: true,
        });
        assert_eq!(approved.profile_id, profile_id);
        assert_eq!(approved.kind, "profile_verified");
        assert_eq!(approved.title, "Verification approved");
        assert_eq!(approved.payload.unwrap()["verified"], true);

        let revoked = verification_outcome(&payloads::ProfileVerified {
            profile_id,
            verified: false,
        });
        assert_eq!(revoked.title, "Verification update");
        assert_eq!(revoked.payload.unwrap()["verified"], false);
    }
}
