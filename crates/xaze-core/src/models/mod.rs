// ABOUTME: Backend DTO models mirrored by the console for rendering and request building
// ABOUTME: Partners, tenants, wallets, catalog, personas, knowledge bases and chat sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Backend DTOs
//!
//! None of these types are persisted by the console. The backend is the
//! single source of truth and every mutation is followed by a re-fetch.

mod catalog;
mod chat;
mod keys;
mod knowledge;
mod number;
mod partner;
mod persona;
mod stats;
mod tenant;
mod transaction;
mod user;

pub use catalog::{PartnerModel, SystemModel, SystemProvider, UpdateModelRequest, UpdateProviderRequest};
pub use chat::{
    ChatSession, CreateSessionRequest, HistoryMessage, JobState, JobStatus, JobTicket,
    SendMessageRequest, SessionMetadataUpdate,
};
pub use keys::{ApiKeyRecord, CreateKeyRequest, CreatedKey};
pub use knowledge::{
    BusinessProfile, BusinessProfileConfig, BusinessProfilePayload, Contact, KbEntry,
    KbEntryPayload, KnowledgeBase, KnowledgeBasePayload,
};
pub use number::FlexNumber;
pub use partner::{
    AdminCredentials, CreatePartnerRequest, CreatedPartner, CreditLimitRequest, Partner,
    PartnerProfile, PartnerProfileUpdate, TopupRequest,
};
pub use persona::{
    LanguageOption, Persona, PersonaConfig, PersonaOptions, PersonaPayload, SystemPersonaUpdate,
};
pub use stats::{SystemOverview, SystemUsage};
pub use tenant::{CreateTenantRequest, PartnerTenant, TenantRate, TenantRecord, TenantUpdate};
pub use transaction::{Transaction, TransactionQuery};
pub use user::{LoginRequest, LoginSession, Role, SessionUser, User};
