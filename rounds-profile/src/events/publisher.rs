use uuid::Uuid;

use rounds_shared::clients::rabbitmq::RabbitMqClient;
use rounds_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_profile_updated(rabbitmq: &RabbitMqClient, profile_id: Uuid) {
    let event = Event::new(
        "rounds-profile",
        routing_keys::PROFILE_UPDATED,
        payloads::ProfileUpdated { profile_id },
    )
    .with_profile(profile_id);

    if let Err(e) = rabbitmq.publish(routing_keys::PROFILE_UPDATED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.updated event");
    }
}

pub async fn publish_profile_verified(rabbitmq: &RabbitMqClient, profile_id: Uuid, verified: bool) {
    let event = Event::new(
        "rounds-profile",
        routing_keys::PROFILE_VERIFIED,
        payloads::ProfileVerified { profile_id, verified },
    )
    .with_profile(profile_id);

    if let Err(e) = rabbitmq.publish(routing_keys::PROFILE_VERIFIED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.verified event");
    }
}

pub async fn publish_profile_banned(rabbitmq: &RabbitMqClient, profile_id: Uuid, banned: bool) {
    let event = Event::new(
        "rounds-profile",
        routing_keys::PROFILE_BANNED,
        payloads::ProfileBanned { profile_id, banned },
    )
    .with_profile(profile_id);

    if let Err(e) = rabbitmq.publish(routing_keys::PROFILE_BANNED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.banned event");
    }
}

pub async fn publish_onboarding_completed(rabbitmq: &RabbitMqClient, profile_id: Uuid) {
    let event = Event::new(
        "rounds-profile",
        routing_keys::PROFILE_ONBOARDING_COMPLETED,
        payloads::OnboardingCompleted { profile_id },
    )
    .with_profile(profile_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::PROFILE_ONBOARDING_COMPLETED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish onboarding.completed event");
    }
}
