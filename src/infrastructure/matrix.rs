//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`, and runs
//! the sync loop that feeds inbound room messages to the `MessageRouter`.
//! The SDK runs each event handler on its own task, so messages are processed concurrently.

use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, RoomMessageEventContent, SyncRoomMessageEvent},
    },
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::application::router::MessageRouter;
use crate::domain::config::MatrixConfig;
use crate::domain::traits::ChatProvider;
use crate::strings::logs;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn typing(&self, active: bool) -> Result<(), String> {
        self.room
            .typing_notice(active)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Log in, register the event handlers, and sync until the sync loop fails or the process is
/// interrupted.
pub async fn run(config: &MatrixConfig, router: MessageRouter) -> Result<()> {
    let client = Client::builder()
        .homeserver_url(&config.homeserver)
        .build()
        .await
        .context("Failed to build Matrix client")?;

    client
        .matrix_auth()
        .login_username(&config.username, &config.password)
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("{}", logs::logged_in(&config.username));

    if let Some(name) = &config.display_name {
        tracing::info!("{}", logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
        }
    }

    let start_time = SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time = UNIX_EPOCH + Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if original_msg.sender == room.own_user_id() {
                return;
            }

            // Non-text messages are ignored
            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };

            let sender = original_msg.sender.as_str();
            tracing::info!("Received message from {}: \n{}", sender, text_content.body);

            let chat = MatrixService::new(room);
            if let Err(e) = router.route(&chat, &text_content.body, sender).await {
                tracing::error!("Failed to route message: {}", e);
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::warn!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    tracing::info!("{}", logs::SYNC_LOOP_START);

    tokio::select! {
        result = client.sync(SyncSettings::default()) => {
            result.map_err(|e| anyhow::anyhow!(logs::sync_loop_fail(&e.to_string())))
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| anyhow::anyhow!(logs::shutdown_fail(&e.to_string())))?;
            tracing::info!("{}", logs::SHUTDOWN);
            Ok(())
        }
    }
}
