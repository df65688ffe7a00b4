// ABOUTME: Playground pages and API-key scoped endpoints: personas, knowledge, profiles and chat
// ABOUTME: Chat turns run on a per-key controller; a second turn while one is pending answers 409
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Playground routes
//!
//! The playground is reached without a console session. Every JSON call
//! carries the tenant API key in `X-API-Key`; the browser keeps the key in
//! local storage and sends it along.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::info;

use super::{data, render_page, PlaygroundKey};
use crate::client::Credentials;
use crate::constants::routes;
use crate::errors::ActionError;
use crate::forms::playground::{
    BatchEntryForm, BusinessProfileForm, ChatMessageForm, EntryForm, KnowledgeBaseForm,
    PersonaForm, SessionMetadataForm,
};
use crate::forms::lenient_text;
use crate::playground::{invalid_api_key, ChatError, ChatSnapshot};
use crate::server::ServerResources;
use crate::views::notifications::ActionOutcome;

type Resources = State<Arc<ServerResources>>;

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            Self::TurnInProgress => (
                StatusCode::CONFLICT,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::Action(e) => e.into_response(),
        }
    }
}

/// API key submitted on the playground login form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeyForm {
    /// Tenant API key
    #[serde(default, deserialize_with = "lenient_text")]
    pub api_key: String,
}

/// Selections the browser restored from local storage
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRestoreQuery {
    /// Last selected session
    #[serde(default)]
    pub session_id: Option<String>,
    /// Last selected knowledge base
    #[serde(default)]
    pub knowledge_base_id: Option<String>,
}

/// Knowledge base selection for new sessions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBaseSelection {
    /// Knowledge base id
    #[serde(default, deserialize_with = "lenient_text")]
    pub knowledge_base_id: String,
}

/// Accepted chat turn
#[derive(Debug, Serialize)]
pub struct TurnAccepted {
    /// Job producing the reply
    pub job_id: String,
    /// Chat state including the pending placeholder
    pub chat: ChatSnapshot,
}

#[derive(Serialize)]
struct PlaygroundPage {
    section: &'static str,
}

/// Playground routes
pub struct PlaygroundRoutes;

impl PlaygroundRoutes {
    /// Create all playground routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            // Pages
            .route(routes::PLAYGROUND, get(Self::handle_chat_page))
            .route("/playground/chat", get(Self::handle_chat_page))
            .route("/playground/persona", get(Self::handle_persona_page))
            .route("/playground/business-profile", get(Self::handle_profile_page))
            .route("/playground/knowledge-base", get(Self::handle_knowledge_page))
            .route("/playground/knowledge-base/:id", get(Self::handle_knowledge_page))
            // Key
            .route("/api/playground/login", post(Self::handle_login))
            .route("/api/playground/logout", post(Self::handle_logout))
            // Personas
            .route(
                "/api/playground/personas",
                get(Self::handle_list_personas).post(Self::handle_create_persona),
            )
            .route("/api/playground/personas/options", get(Self::handle_persona_options))
            .route(
                "/api/playground/personas/:id",
                put(Self::handle_update_persona).delete(Self::handle_delete_persona),
            )
            // Knowledge bases and entries
            .route(
                "/api/playground/knowledge-bases",
                get(Self::handle_list_knowledge_bases).post(Self::handle_create_knowledge_base),
            )
            .route(
                "/api/playground/knowledge-bases/:id",
                put(Self::handle_update_knowledge_base).delete(Self::handle_delete_knowledge_base),
            )
            .route(
                "/api/playground/knowledge-bases/:id/entries",
                get(Self::handle_list_entries).post(Self::handle_create_entry),
            )
            .route(
                "/api/playground/knowledge-bases/:id/entries/batch",
                post(Self::handle_create_entries),
            )
            .route(
                "/api/playground/knowledge-bases/:id/entries/:entry_id",
                put(Self::handle_update_entry).delete(Self::handle_delete_entry),
            )
            // Business profiles
            .route(
                "/api/playground/business-profiles",
                get(Self::handle_list_profiles).post(Self::handle_create_profile),
            )
            .route(
                "/api/playground/business-profiles/:id",
                get(Self::handle_get_profile)
                    .put(Self::handle_update_profile)
                    .delete(Self::handle_delete_profile),
            )
            // Chat
            .route("/api/playground/chat", get(Self::handle_chat_state))
            .route(
                "/api/playground/chat/knowledge-base",
                put(Self::handle_select_knowledge_base),
            )
            .route("/api/playground/chat/messages", post(Self::handle_send_message))
            .route(
                "/api/playground/chat/sessions",
                get(Self::handle_list_sessions).post(Self::handle_new_session),
            )
            .route(
                "/api/playground/chat/sessions/:id",
                get(Self::handle_get_session).put(Self::handle_switch_session),
            )
            .route(
                "/api/playground/chat/sessions/:id/metadata",
                get(Self::handle_get_metadata).put(Self::handle_update_metadata),
            )
            .with_state(resources)
    }

    // ========================================================================
    // Pages
    // ========================================================================

    async fn page(resources: &ServerResources, path: &'static str, section: &'static str) -> Response {
        render_page(resources, path, None, PlaygroundPage { section }).await
    }

    async fn handle_chat_page(State(resources): Resources) -> Response {
        Self::page(&resources, "/playground/chat", "chat").await
    }

    async fn handle_persona_page(State(resources): Resources) -> Response {
        Self::page(&resources, "/playground/persona", "persona").await
    }

    async fn handle_profile_page(State(resources): Resources) -> Response {
        Self::page(&resources, "/playground/business-profile", "business-profile").await
    }

    async fn handle_knowledge_page(State(resources): Resources) -> Response {
        Self::page(&resources, "/playground/knowledge-base", "knowledge-base").await
    }

    // ========================================================================
    // Key
    // ========================================================================

    async fn handle_login(
        State(resources): Resources,
        Json(form): Json<ApiKeyForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let credentials = Credentials::api_key(Some(&form.api_key))
            .ok_or_else(|| ActionError::validation("API Key is required"))?;
        if !resources.client.verify_api_key(&credentials).await {
            return Err(invalid_api_key());
        }
        info!("Playground API key verified");
        Ok(ActionOutcome::done("Logged in successfully"))
    }

    async fn handle_logout(State(resources): Resources, key: PlaygroundKey) -> ActionOutcome {
        if let Some(credentials) = key.get() {
            resources.chats.remove(credentials);
        }
        ActionOutcome::notice("Logged out")
    }

    // ========================================================================
    // Personas
    // ========================================================================

    async fn handle_list_personas(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.personas(key.get()).await?))
    }

    async fn handle_persona_options(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.persona_options(key.get()).await?))
    }

    async fn handle_create_persona(
        State(resources): Resources,
        key: PlaygroundKey,
        Json(form): Json<PersonaForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.create_persona(key.get(), form).await?;
        Ok(ActionOutcome::done("Persona created"))
    }

    async fn handle_update_persona(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
        Json(form): Json<PersonaForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.update_persona(key.get(), &id, form).await?;
        Ok(ActionOutcome::done("Persona updated"))
    }

    async fn handle_delete_persona(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.delete_persona(key.get(), &id).await?;
        Ok(ActionOutcome::done("Persona deleted"))
    }

    // ========================================================================
    // Knowledge bases and entries
    // ========================================================================

    async fn handle_list_knowledge_bases(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.knowledge_bases(key.get()).await?))
    }

    async fn handle_create_knowledge_base(
        State(resources): Resources,
        key: PlaygroundKey,
        Json(form): Json<KnowledgeBaseForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.create_knowledge_base(key.get(), form).await?;
        Ok(ActionOutcome::done("Knowledge Base created"))
    }

    async fn handle_update_knowledge_base(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
        Json(form): Json<KnowledgeBaseForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .update_knowledge_base(key.get(), &id, form)
            .await?;
        Ok(ActionOutcome::done("Knowledge Base updated"))
    }

    async fn handle_delete_knowledge_base(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.delete_knowledge_base(key.get(), &id).await?;
        Ok(ActionOutcome::done("Knowledge base deleted"))
    }

    async fn handle_list_entries(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(kb_id): Path<String>,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.kb_entries(key.get(), &kb_id).await?))
    }

    async fn handle_create_entry(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(kb_id): Path<String>,
        Json(form): Json<EntryForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.create_kb_entry(key.get(), &kb_id, form).await?;
        Ok(ActionOutcome::done("Entry created"))
    }

    async fn handle_create_entries(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(kb_id): Path<String>,
        Json(form): Json<BatchEntryForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let created = resources
            .client
            .create_kb_entries(key.get(), &kb_id, form)
            .await?;
        Ok(ActionOutcome::done(format!("Successfully created {created} entries")))
    }

    async fn handle_update_entry(
        State(resources): Resources,
        key: PlaygroundKey,
        Path((kb_id, entry_id)): Path<(String, String)>,
        Json(form): Json<EntryForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .update_kb_entry(key.get(), &kb_id, &entry_id, form)
            .await?;
        Ok(ActionOutcome::done("Entry updated"))
    }

    async fn handle_delete_entry(
        State(resources): Resources,
        key: PlaygroundKey,
        Path((kb_id, entry_id)): Path<(String, String)>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .delete_kb_entry(key.get(), &kb_id, &entry_id)
            .await?;
        Ok(ActionOutcome::done("Entry deleted"))
    }

    // ========================================================================
    // Business profiles
    // ========================================================================

    async fn handle_list_profiles(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.business_profiles(key.get()).await?))
    }

    async fn handle_get_profile(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.business_profile(key.get(), &id).await?))
    }

    async fn handle_create_profile(
        State(resources): Resources,
        key: PlaygroundKey,
        Json(form): Json<BusinessProfileForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.create_business_profile(key.get(), form).await?;
        Ok(ActionOutcome::done("Business Profile created"))
    }

    async fn handle_update_profile(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
        Json(form): Json<BusinessProfileForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .update_business_profile(key.get(), &id, form)
            .await?;
        Ok(ActionOutcome::done("Business Profile updated"))
    }

    async fn handle_delete_profile(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.delete_business_profile(key.get(), &id).await?;
        Ok(ActionOutcome::done("Profile deleted"))
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Current chat state; restores stored selections into a fresh controller
    /// and falls back to the first knowledge base
    async fn handle_chat_state(
        State(resources): Resources,
        key: PlaygroundKey,
        Query(restore): Query<ChatRestoreQuery>,
    ) -> Result<Response, ActionError> {
        let credentials = key.require()?;
        let chat = resources.chats.controller(credentials).await?;

        if chat.session_id().await.is_none() {
            let session_id = restore.session_id.filter(|s| !s.is_empty());
            let knowledge_base_id = restore.knowledge_base_id.filter(|k| !k.is_empty());
            if session_id.is_some() || knowledge_base_id.is_some() {
                chat.restore(session_id, knowledge_base_id).await;
            }
        }
        if chat.knowledge_base_id().await.is_none() {
            let bases = resources.client.knowledge_bases(Some(credentials)).await?;
            if let Some(first) = bases.first() {
                chat.select_knowledge_base(&first.id).await;
            }
        }
        Ok(data(&chat.snapshot().await))
    }

    async fn handle_select_knowledge_base(
        State(resources): Resources,
        key: PlaygroundKey,
        Json(selection): Json<KnowledgeBaseSelection>,
    ) -> Result<Response, ActionError> {
        let chat = resources.chats.controller(key.require()?).await?;
        chat.select_knowledge_base(&selection.knowledge_base_id).await;
        Ok(data(&chat.snapshot().await))
    }

    async fn handle_send_message(
        State(resources): Resources,
        key: PlaygroundKey,
        Json(form): Json<ChatMessageForm>,
    ) -> Result<Response, ChatError> {
        form.validate()?;
        let chat = resources.chats.controller(key.require()?).await?;
        if !form.knowledge_base_id.trim().is_empty() && chat.knowledge_base_id().await.is_none() {
            chat.select_knowledge_base(&form.knowledge_base_id).await;
        }
        let job_id = chat
            .send(&form.content)
            .await?
            .map(|ticket| ticket.job_id)
            .unwrap_or_default();
        let accepted = TurnAccepted {
            job_id,
            chat: chat.snapshot().await,
        };
        Ok((StatusCode::ACCEPTED, Json(accepted)).into_response())
    }

    async fn handle_list_sessions(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.chat_sessions(key.get()).await?))
    }

    async fn handle_new_session(
        State(resources): Resources,
        key: PlaygroundKey,
    ) -> Result<ActionOutcome, ChatError> {
        let chat = resources.chats.controller(key.require()?).await?;
        let session_id = chat.start_new_session().await?;
        Ok(ActionOutcome::done("New session started").with(&json!({ "session_id": session_id })))
    }

    async fn handle_get_session(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.chat_session(key.get(), &id).await?))
    }

    async fn handle_switch_session(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<Response, ChatError> {
        let chat = resources.chats.controller(key.require()?).await?;
        chat.switch_session(&id).await?;
        Ok(data(&chat.snapshot().await))
    }

    async fn handle_get_metadata(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
    ) -> Result<Response, ActionError> {
        let session = resources.client.chat_session(key.get(), &id).await?;
        Ok(data(&session.metadata.unwrap_or_else(Map::new)))
    }

    async fn handle_update_metadata(
        State(resources): Resources,
        key: PlaygroundKey,
        Path(id): Path<String>,
        Json(form): Json<SessionMetadataForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let updated = resources
            .client
            .update_chat_session(key.get(), &id, form)
            .await?;
        Ok(ActionOutcome::done("Session metadata updated").with_data(updated))
    }
}
