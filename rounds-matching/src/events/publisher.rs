use rounds_shared::clients::rabbitmq::RabbitMqClient;
use rounds_shared::types::event::{payloads, routing_keys, Event};

use crate::matching::assembler::AssembledGroup;
use crate::models::Match;

pub async fn publish_group_created(
    rabbitmq: &RabbitMqClient,
    record: &Match,
    group: &AssembledGroup,
) {
    let event = Event::new(
        "rounds-matching",
        routing_keys::MATCHING_GROUP_CREATED,
        payloads::GroupCreated {
            match_id: record.id,
            group_name: record.group_name.clone(),
            match_week: record.match_week.clone(),
            member_ids: group.members.iter().map(|m| m.profile_id).collect(),
            average_compatibility: record.average_compatibility,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_GROUP_CREATED, &event).await {
        tracing::error!(error = %e, match_id = %record.id, "failed to publish group.created event");
    }
}

pub async fn publish_run_completed(
    rabbitmq: &RabbitMqClient,
    profiles_processed: i32,
    matches_created: i32,
    execution_time_ms: i64,
) {
    let event = Event::new(
        "rounds-matching",
        routing_keys::MATCHING_RUN_COMPLETED,
        payloads::RunCompleted {
            profiles_processed,
            matches_created,
            execution_time_ms,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_RUN_COMPLETED, &event).await {
        tracing::error!(error = %e, "failed to publish run.completed event");
    }
}
