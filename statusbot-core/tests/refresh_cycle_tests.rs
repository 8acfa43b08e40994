// tests/refresh_cycle_tests.rs

mod support;

use std::sync::Arc;
use std::time::Duration;

use statusbot_common::error::{BoardError, FetchError};
use statusbot_common::models::binding::BindingState;
use statusbot_common::models::status::{StatusEntry, StatusSummary};
use statusbot_core::services::RefreshTrigger;
use statusbot_core::status::UpsertOutcome;
use statusbot_core::status::presenter::{
    ALL_OPERATIONAL, COMPONENTS_FIELD, FETCH_ERROR_PLACEHOLDER, INCIDENTS_FIELD, MAINTENANCE_FIELD,
    NO_INCIDENTS, NO_MAINTENANCE,
};
use statusbot_core::tasks::status_refresh::spawn_status_refresh_task;
use twilight_model::id::Id;

use support::{build_service, Call, RecordingTransport, ScriptedSource, DEFAULT_CHANNEL};

fn api_operational() -> StatusSummary {
    StatusSummary {
        incidents: vec![],
        scheduled_maintenances: vec![],
        components: vec![StatusEntry::new("API", "operational")],
    }
}

#[tokio::test]
async fn scenario_a_rendered_sections() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(api_operational())])),
        transport.clone(),
    );

    service.run_cycle(RefreshTrigger::Timer).await?;

    let calls = transport.calls().await;
    let Some(Call::Send(channel, message)) = calls.first() else {
        panic!("expected a send, got {calls:?}");
    };
    assert_eq!(*channel, DEFAULT_CHANNEL);
    assert_eq!(message.field(COMPONENTS_FIELD), Some("**API**: operational"));
    assert_eq!(message.field(INCIDENTS_FIELD), Some(NO_INCIDENTS));
    assert_eq!(message.field(MAINTENANCE_FIELD), Some(NO_MAINTENANCE));
    Ok(())
}

#[tokio::test]
async fn scenario_b_first_command_without_channel() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(StatusSummary::default())])),
        transport.clone(),
    );

    let bound = service.select_and_refresh(None).await;
    assert_eq!(bound, Ok(DEFAULT_CHANNEL));
    assert_eq!(transport.sends().await, 1);

    let binding = service.binding().await;
    assert_eq!(binding.channel_id(), DEFAULT_CHANNEL);
    assert!(matches!(binding.state(), BindingState::Set(_)));

    let Call::Send(_, message) = &transport.calls().await[0] else {
        panic!("expected a send");
    };
    assert_eq!(message.field(COMPONENTS_FIELD), Some(ALL_OPERATIONAL));
    Ok(())
}

#[tokio::test]
async fn scenario_c_second_cycle_edits() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(api_operational())])),
        transport.clone(),
    );

    let first = service.run_cycle(RefreshTrigger::Command).await?;
    let second = service.run_cycle(RefreshTrigger::Timer).await?;

    let UpsertOutcome::Sent(id) = first else {
        panic!("first cycle should send, got {first:?}");
    };
    assert_eq!(second, UpsertOutcome::Edited(id));

    let calls = transport.calls().await;
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], Call::Lookup(DEFAULT_CHANNEL, id));
    assert!(matches!(&calls[2], Call::Edit(ch, mid, _) if *ch == DEFAULT_CHANNEL && *mid == id));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn scenario_d_outage_keeps_the_timer_running() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Err(FetchError::Request(
            "error sending request: connection refused".into(),
        ))])),
        transport.clone(),
    );

    let handle = spawn_status_refresh_task(service.clone(), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(transport.sends().await, 1);
    let Call::Send(_, message) = &transport.calls().await[0] else {
        panic!("expected a send");
    };
    assert_eq!(message.fields.len(), 3);
    assert!(message.fields.iter().all(|f| f.value == FETCH_ERROR_PLACEHOLDER));
    assert_eq!(message.title, "Server Status");
    assert_eq!(message.link.url, "https://status.atlassian.com/");

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.edits().await, 1);
    assert!(!handle.is_finished());

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn upstream_recovery_replaces_error_placeholders() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![
            Err(FetchError::Status(502)),
            Ok(api_operational()),
        ])),
        transport.clone(),
    );

    service.run_cycle(RefreshTrigger::Timer).await?;
    service.run_cycle(RefreshTrigger::Timer).await?;

    let calls = transport.calls().await;
    let Some(Call::Edit(_, _, message)) = calls.last() else {
        panic!("expected an edit, got {calls:?}");
    };
    assert_eq!(message.field(COMPONENTS_FIELD), Some("**API**: operational"));
    Ok(())
}

#[tokio::test]
async fn deleted_message_is_reported_until_the_operator_redirects() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(api_operational())])),
        transport.clone(),
    );

    service.run_cycle(RefreshTrigger::Timer).await?;
    let before = service.binding().await;
    transport.delete_all().await;

    let err = service.run_cycle(RefreshTrigger::Timer).await.unwrap_err();
    assert!(matches!(err, BoardError::MessageMissing(_)));
    assert_eq!(service.binding().await, before);

    // No channel argument: still bound to the missing message.
    let (channel, err) = service.select_and_refresh(None).await.unwrap_err();
    assert_eq!(channel, DEFAULT_CHANNEL);
    assert!(matches!(err, BoardError::MessageMissing(_)));

    // Naming a channel, even the same one, posts a fresh message.
    assert_eq!(service.select_and_refresh(Some(DEFAULT_CHANNEL)).await, Ok(DEFAULT_CHANNEL));
    assert_eq!(transport.sends().await, 2);
    assert_ne!(service.binding().await.message_id(), before.message_id());
    Ok(())
}

#[tokio::test]
async fn rejected_channel_leaves_binding_unset() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let locked = Id::new(66);
    transport.reject(locked).await;
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(api_operational())])),
        transport.clone(),
    );

    let (channel, err) = service.select_and_refresh(Some(locked)).await.unwrap_err();
    assert_eq!(channel, locked);
    assert!(matches!(err, BoardError::SendFailed(_)));

    let binding = service.binding().await;
    assert_eq!(binding.channel_id(), locked);
    assert_eq!(binding.state(), BindingState::Unset);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn overlapping_timer_and_command_cycles_send_once() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::with_send_delay(Duration::from_secs(2)));
    let service = build_service(
        Arc::new(ScriptedSource::new(vec![Ok(api_operational())])),
        transport.clone(),
    );

    let timer = {
        let service = service.clone();
        tokio::spawn(async move { service.run_cycle(RefreshTrigger::Timer).await })
    };
    let command = {
        let service = service.clone();
        tokio::spawn(async move { service.select_and_refresh(None).await })
    };

    let timer_outcome = timer.await?;
    let command_outcome = command.await?;
    assert!(timer_outcome.is_ok());
    assert_eq!(command_outcome, Ok(DEFAULT_CHANNEL));

    assert_eq!(transport.sends().await, 1);
    assert_eq!(transport.edits().await, 1);
    Ok(())
}
