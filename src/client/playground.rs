// ABOUTME: Playground actions scoped by a tenant API key: personas, knowledge, profiles and chat
// ABOUTME: Chat calls submit a message, read job status and fetch session history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde_json::Value;

use super::{require, segment, BackendClient, Call, Credentials};
use crate::constants::backend;
use crate::errors::{ActionError, ActionResult};
use crate::forms::playground::{
    BatchEntryForm, BusinessProfileForm, EntryForm, KnowledgeBaseForm, PersonaForm,
    SessionMetadataForm,
};
use xaze_core::models::{
    BusinessProfile, ChatSession, CreateSessionRequest, HistoryMessage, JobStatus, JobTicket,
    KbEntry, KnowledgeBase, Persona, PersonaOptions, SendMessageRequest, SessionMetadataUpdate,
};

const JOB_STATUS_FAILED: &str = "Failed to check job status";

fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", segment(id))
}

fn entries_path(kb_id: &str, suffix: &str) -> String {
    format!("{}/{}/entries{suffix}", backend::KNOWLEDGE, segment(kb_id))
}

fn session_path(session_id: &str, suffix: &str) -> String {
    format!("{}/{}{suffix}", backend::CHAT_SESSIONS, segment(session_id))
}

impl BackendClient {
    /// Whether an API key is accepted, checked through the credit balance
    pub async fn verify_api_key(&self, credentials: &Credentials) -> bool {
        self.succeeds(&Call::get(backend::CREDITS).auth(credentials)).await
    }

    // ========================================================================
    // Personas
    // ========================================================================

    /// Personas visible to the key's tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn personas(&self, credentials: Option<&Credentials>) -> ActionResult<Vec<Persona>> {
        let call = Call::get(backend::PERSONAS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch personas");
        self.fetch_list(&call).await
    }

    /// Option lists for the persona editor
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn persona_options(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<PersonaOptions> {
        let call = Call::get(backend::PERSONA_OPTIONS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch options");
        self.fetch(&call).await
    }

    /// Create a persona
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn create_persona(
        &self,
        credentials: Option<&Credentials>,
        form: PersonaForm,
    ) -> ActionResult<()> {
        let call = Call::post(backend::PERSONAS)
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to create persona");
        self.submit(&call).await
    }

    /// Replace a persona
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn update_persona(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
        form: PersonaForm,
    ) -> ActionResult<()> {
        let call = Call::put(item_path(backend::PERSONAS, id))
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to update persona");
        self.submit(&call).await
    }

    /// Delete a persona
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn delete_persona(&self, credentials: Option<&Credentials>, id: &str) -> ActionResult<()> {
        let call = Call::delete(item_path(backend::PERSONAS, id))
            .auth(require(credentials)?)
            .fallback("Failed to delete persona");
        self.submit(&call).await
    }

    // ========================================================================
    // Knowledge bases
    // ========================================================================

    /// Knowledge bases of the key's tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn knowledge_bases(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<KnowledgeBase>> {
        let call = Call::get(backend::KNOWLEDGE)
            .auth(require(credentials)?)
            .fallback("Failed to fetch knowledge bases");
        self.fetch_list(&call).await
    }

    /// Create a knowledge base
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn create_knowledge_base(
        &self,
        credentials: Option<&Credentials>,
        form: KnowledgeBaseForm,
    ) -> ActionResult<()> {
        let call = Call::post(backend::KNOWLEDGE)
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to create knowledge base");
        self.submit(&call).await
    }

    /// Replace a knowledge base
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn update_knowledge_base(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
        form: KnowledgeBaseForm,
    ) -> ActionResult<()> {
        let call = Call::put(item_path(backend::KNOWLEDGE, id))
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to update knowledge base");
        self.submit(&call).await
    }

    /// Delete a knowledge base
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn delete_knowledge_base(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
    ) -> ActionResult<()> {
        let call = Call::delete(item_path(backend::KNOWLEDGE, id))
            .auth(require(credentials)?)
            .fallback("Failed to delete knowledge base");
        self.submit(&call).await
    }

    // ========================================================================
    // Knowledge base entries
    // ========================================================================

    /// Entries of one knowledge base
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn kb_entries(
        &self,
        credentials: Option<&Credentials>,
        kb_id: &str,
    ) -> ActionResult<Vec<KbEntry>> {
        let call = Call::get(entries_path(kb_id, ""))
            .auth(require(credentials)?)
            .fallback("Failed to fetch entries");
        self.fetch_list(&call).await
    }

    /// Create one entry through the batch endpoint
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn create_kb_entry(
        &self,
        credentials: Option<&Credentials>,
        kb_id: &str,
        form: EntryForm,
    ) -> ActionResult<()> {
        let call = Call::post(entries_path(kb_id, "/batch"))
            .auth(require(credentials)?)
            .json(&[form.into_payload()])?
            .fallback("Failed to create entry");
        self.submit(&call).await
    }

    /// Create several entries at once; returns how many were sent
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key, when an entry lacks a title or
    /// content, or when the backend rejects the batch
    pub async fn create_kb_entries(
        &self,
        credentials: Option<&Credentials>,
        kb_id: &str,
        form: BatchEntryForm,
    ) -> ActionResult<usize> {
        let credentials = require(credentials)?;
        let entries = form.validate()?;
        let call = Call::post(entries_path(kb_id, "/batch"))
            .auth(credentials)
            .json(&entries)?
            .fallback("Failed to create entries");
        self.submit(&call).await?;
        Ok(entries.len())
    }

    /// Replace an entry
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn update_kb_entry(
        &self,
        credentials: Option<&Credentials>,
        kb_id: &str,
        entry_id: &str,
        form: EntryForm,
    ) -> ActionResult<()> {
        let call = Call::put(entries_path(kb_id, &format!("/{}", segment(entry_id))))
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to update entry");
        self.submit(&call).await
    }

    /// Delete an entry
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn delete_kb_entry(
        &self,
        credentials: Option<&Credentials>,
        kb_id: &str,
        entry_id: &str,
    ) -> ActionResult<()> {
        let call = Call::delete(entries_path(kb_id, &format!("/{}", segment(entry_id))))
            .auth(require(credentials)?)
            .fallback("Failed to delete entry");
        self.submit(&call).await
    }

    // ========================================================================
    // Business profiles
    // ========================================================================

    /// Business profiles of the key's tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn business_profiles(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<BusinessProfile>> {
        let call = Call::get(backend::BUSINESS_PROFILES)
            .auth(require(credentials)?)
            .fallback("Failed to fetch profiles");
        self.fetch_list(&call).await
    }

    /// One business profile
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn business_profile(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
    ) -> ActionResult<BusinessProfile> {
        let call = Call::get(item_path(backend::BUSINESS_PROFILES, id))
            .auth(require(credentials)?)
            .fallback("Failed to fetch profile");
        self.fetch(&call).await
    }

    /// Create a business profile
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn create_business_profile(
        &self,
        credentials: Option<&Credentials>,
        form: BusinessProfileForm,
    ) -> ActionResult<()> {
        let call = Call::post(backend::BUSINESS_PROFILES)
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to create business profile");
        self.submit(&call).await
    }

    /// Replace a business profile
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn update_business_profile(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
        form: BusinessProfileForm,
    ) -> ActionResult<()> {
        let call = Call::put(item_path(backend::BUSINESS_PROFILES, id))
            .auth(require(credentials)?)
            .json(&form.into_payload())?
            .fallback("Failed to update business profile");
        self.submit(&call).await
    }

    /// Delete a business profile
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects it
    pub async fn delete_business_profile(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
    ) -> ActionResult<()> {
        let call = Call::delete(item_path(backend::BUSINESS_PROFILES, id))
            .auth(require(credentials)?)
            .fallback("Failed to delete business profile");
        self.submit(&call).await
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Chat sessions of the key's tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn chat_sessions(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<ChatSession>> {
        let call = Call::get(backend::CHAT_SESSIONS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch sessions");
        self.fetch_list(&call).await
    }

    /// Start a session against a knowledge base and return its id
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or knowledge base, or when the
    /// session could not be started; the backend's message is not surfaced
    pub async fn create_chat_session(
        &self,
        credentials: Option<&Credentials>,
        knowledge_base_id: &str,
    ) -> ActionResult<String> {
        let credentials = require(credentials)?;
        if knowledge_base_id.is_empty() {
            return Err(ActionError::validation("Knowledge Base ID is required"));
        }
        let request = CreateSessionRequest {
            knowledge_base_id: knowledge_base_id.to_owned(),
        };
        let call = Call::post(backend::CHAT_SESSIONS)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to start session")
            .opaque();
        let session: ChatSession = self.fetch(&call).await?;
        Ok(session.id)
    }

    /// One session with its metadata
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn chat_session(
        &self,
        credentials: Option<&Credentials>,
        session_id: &str,
    ) -> ActionResult<ChatSession> {
        let call = Call::get(session_path(session_id, ""))
            .auth(require(credentials)?)
            .fallback("Failed to fetch session metadata");
        self.fetch(&call).await
    }

    /// Replace a session's metadata
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key, when the metadata is not a JSON
    /// object, or when the backend rejects it
    pub async fn update_chat_session(
        &self,
        credentials: Option<&Credentials>,
        session_id: &str,
        form: SessionMetadataForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let metadata = form.validate()?;
        let call = Call::put(session_path(session_id, ""))
            .auth(credentials)
            .json(&SessionMetadataUpdate { metadata })?
            .fallback("Failed to update session");
        self.send(&call).await
    }

    /// Submit a user message; the reply is produced by a background job
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend rejects the
    /// message
    pub async fn send_chat_message(
        &self,
        credentials: Option<&Credentials>,
        session_id: &str,
        request: &SendMessageRequest,
    ) -> ActionResult<JobTicket> {
        let call = Call::post(session_path(session_id, "/messages"))
            .auth(require(credentials)?)
            .json(request)?
            .fallback("Failed to send message");
        self.fetch(&call).await
    }

    /// Current state of a chat job
    ///
    /// # Errors
    ///
    /// Every failure reads `Failed to check job status`
    pub async fn chat_job_status(
        &self,
        credentials: Option<&Credentials>,
        job_id: &str,
    ) -> ActionResult<JobStatus> {
        let call = Call::get(item_path(backend::CHAT_JOBS, job_id))
            .auth(require(credentials)?)
            .fallback(JOB_STATUS_FAILED)
            .opaque()
            .network_message(JOB_STATUS_FAILED);
        self.fetch(&call).await
    }

    /// Full message history of a session, oldest first
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` without a key or when the backend call fails
    pub async fn chat_history(
        &self,
        credentials: Option<&Credentials>,
        session_id: &str,
    ) -> ActionResult<Vec<HistoryMessage>> {
        let call = Call::get(session_path(session_id, "/history"))
            .auth(require(credentials)?)
            .fallback("Failed to load session history");
        self.fetch_list(&call).await
    }
}
