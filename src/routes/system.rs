// ABOUTME: System-admin pages and JSON actions: dashboard, partners, ledger, catalog and personas
// ABOUTME: Pages degrade to empty tables on backend failure; actions answer with toasts or errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! System admin routes
//!
//! Every handler forwards the session cookie as credentials. The role guard
//! has already sent non-system users away from the page routes; the backend
//! still authorizes each call.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{data, or_empty, or_none, render_page, SessionCredentials};
use crate::client::system::PersonaQuery;
use crate::constants::limits;
use crate::errors::ActionError;
use crate::forms::system::{
    CreatePartnerForm, CreditLimitForm, ModelForm, PartnerKeyForm, PartnerTopupForm, ProviderForm,
    SystemPersonaEditForm, SystemPersonaForm,
};
use crate::server::ServerResources;
use crate::views::columns::{model_table, partner_table, persona_table, transaction_table};
use crate::views::dashboard::SystemDashboard;
use crate::views::notifications::ActionOutcome;
use crate::views::table::{TableQuery, TableView};
use xaze_core::models::{SystemProvider, TransactionQuery};

type Resources = State<Arc<ServerResources>>;

/// Ledger filter shared by the page and the JSON list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletFilter {
    /// Restrict to one wallet
    #[serde(default)]
    pub wallet_id: Option<String>,
}

impl WalletFilter {
    fn into_query(self) -> TransactionQuery {
        self.wallet_id
            .filter(|w| !w.trim().is_empty())
            .map_or_else(TransactionQuery::default, TransactionQuery::for_wallet)
    }
}

/// Persona list filter; `is_system` is the text `true` or `false`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaFilter {
    /// `"true"`, `"false"`, or anything else for all personas
    #[serde(default)]
    pub is_system: Option<String>,
    /// Page size
    #[serde(default)]
    pub limit: Option<usize>,
    /// Rows skipped
    #[serde(default)]
    pub offset: Option<usize>,
}

impl PersonaFilter {
    fn into_query(self, default_limit: usize) -> PersonaQuery {
        PersonaQuery {
            limit: self.limit.unwrap_or(default_limit),
            offset: self.offset.unwrap_or_default(),
            is_system: match self.is_system.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Serialize)]
struct SettingsPage {
    models: TableView,
    providers: Vec<SystemProvider>,
}

/// System admin routes
pub struct SystemRoutes;

impl SystemRoutes {
    /// Create all system admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            // Pages
            .route("/system", get(Self::handle_dashboard_page))
            .route("/system/partners", get(Self::handle_partners_page))
            .route("/system/transactions", get(Self::handle_transactions_page))
            .route("/system/settings", get(Self::handle_settings_page))
            .route("/system/personas", get(Self::handle_personas_page))
            // Partners
            .route(
                "/api/system/partners",
                get(Self::handle_list_partners).post(Self::handle_create_partner),
            )
            .route("/api/system/partners/:id/topup", post(Self::handle_topup))
            .route("/api/system/partners/:id/credit-limit", put(Self::handle_credit_limit))
            .route(
                "/api/system/partners/:id/keys",
                get(Self::handle_list_keys).post(Self::handle_create_key),
            )
            .route("/api/system/partners/:id/keys/:key_id", delete(Self::handle_revoke_key))
            // Ledger and stats
            .route("/api/system/transactions", get(Self::handle_list_transactions))
            .route("/api/system/stats", get(Self::handle_stats))
            // Catalog
            .route(
                "/api/system/models",
                get(Self::handle_list_models).put(Self::handle_update_model),
            )
            .route(
                "/api/system/providers",
                get(Self::handle_list_providers).put(Self::handle_update_provider),
            )
            // Personas
            .route(
                "/api/system/personas",
                get(Self::handle_list_personas).post(Self::handle_create_persona),
            )
            .route("/api/system/personas/options", get(Self::handle_persona_options))
            .route("/api/system/personas/:id", put(Self::handle_update_persona))
            .with_state(resources)
    }

    // ========================================================================
    // Pages
    // ========================================================================

    async fn handle_dashboard_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let client = &resources.client;
        let (overview, usage) = tokio::join!(
            client.system_overview(credentials.get()),
            client.system_usage(credentials.get()),
        );
        let dashboard = SystemDashboard::build(or_none(overview, "overview"), or_none(usage, "usage"));
        render_page(&resources, "/system", credentials.get(), dashboard).await
    }

    async fn handle_partners_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
    ) -> Response {
        let partners = or_empty(resources.client.partners(credentials.get()).await, "partners");
        let view = partner_table().view(&partners, &table);
        render_page(&resources, "/system/partners", credentials.get(), view).await
    }

    async fn handle_transactions_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
        Query(filter): Query<WalletFilter>,
    ) -> Response {
        let rows = resources
            .client
            .system_transactions(credentials.get(), &filter.into_query())
            .await;
        let view = transaction_table().view(&or_empty(rows, "transactions"), &table);
        render_page(&resources, "/system/transactions", credentials.get(), view).await
    }

    async fn handle_settings_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
    ) -> Response {
        let client = &resources.client;
        let (models, providers) = tokio::join!(
            client.system_models(credentials.get()),
            client.system_providers(credentials.get()),
        );
        let page = SettingsPage {
            models: model_table().view(&or_empty(models, "models"), &table),
            providers: or_empty(providers, "providers"),
        };
        render_page(&resources, "/system/settings", credentials.get(), page).await
    }

    async fn handle_personas_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
        Query(filter): Query<PersonaFilter>,
    ) -> Response {
        let query = filter.into_query(limits::PERSONA_PAGE_LIMIT);
        let personas = resources.client.system_personas(credentials.get(), query).await;
        let view = persona_table().view(&or_empty(personas, "personas"), &table);
        render_page(&resources, "/system/personas", credentials.get(), view).await
    }

    // ========================================================================
    // Partners
    // ========================================================================

    async fn handle_list_partners(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.partners(credentials.get()).await?))
    }

    async fn handle_create_partner(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<CreatePartnerForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let created = resources.client.create_partner(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Partner created successfully").with(&created))
    }

    async fn handle_topup(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(partner_id): Path<String>,
        Json(form): Json<PartnerTopupForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = PartnerTopupForm { partner_id, ..form };
        resources.client.topup_partner(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Wallet topped up successfully"))
    }

    async fn handle_credit_limit(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(partner_id): Path<String>,
        Json(form): Json<CreditLimitForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = CreditLimitForm { partner_id, ..form };
        resources.client.update_credit_limit(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Credit limit updated successfully"))
    }

    async fn handle_list_keys(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(partner_id): Path<String>,
    ) -> Result<Response, ActionError> {
        let keys = resources
            .client
            .partner_keys(credentials.get(), &partner_id)
            .await?;
        Ok(data(&keys))
    }

    async fn handle_create_key(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(partner_id): Path<String>,
        Json(form): Json<PartnerKeyForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = PartnerKeyForm { partner_id, ..form };
        let created = resources.client.create_partner_key(credentials.get(), form).await?;
        Ok(ActionOutcome::done("API Key generated successfully").with(&created))
    }

    async fn handle_revoke_key(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path((partner_id, key_id)): Path<(String, String)>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .revoke_partner_key(credentials.get(), &partner_id, &key_id)
            .await?;
        Ok(ActionOutcome::done("Key revoked successfully"))
    }

    // ========================================================================
    // Ledger and stats
    // ========================================================================

    async fn handle_list_transactions(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(filter): Query<WalletFilter>,
    ) -> Result<Response, ActionError> {
        let rows = resources
            .client
            .system_transactions(credentials.get(), &filter.into_query())
            .await?;
        Ok(data(&rows))
    }

    async fn handle_stats(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        let client = &resources.client;
        let (overview, usage) = tokio::join!(
            client.system_overview(credentials.get()),
            client.system_usage(credentials.get()),
        );
        Ok(data(&SystemDashboard::build(Some(overview?), Some(usage?))))
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    async fn handle_list_models(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.system_models(credentials.get()).await?))
    }

    async fn handle_update_model(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<ModelForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.update_model(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Model updated successfully"))
    }

    async fn handle_list_providers(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.system_providers(credentials.get()).await?))
    }

    async fn handle_update_provider(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<ProviderForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.update_provider(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Provider updated successfully"))
    }

    // ========================================================================
    // Personas
    // ========================================================================

    async fn handle_list_personas(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(filter): Query<PersonaFilter>,
    ) -> Result<Response, ActionError> {
        let query = filter.into_query(limits::PERSONA_FETCH_LIMIT);
        Ok(data(&resources.client.system_personas(credentials.get(), query).await?))
    }

    async fn handle_create_persona(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<SystemPersonaForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources.client.create_system_persona(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Persona created successfully"))
    }

    async fn handle_update_persona(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(id): Path<String>,
        Json(form): Json<SystemPersonaEditForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = SystemPersonaEditForm { id, ..form };
        resources.client.update_system_persona(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Persona updated successfully"))
    }

    async fn handle_persona_options(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.system_persona_options(credentials.get()).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_filter_parsing() {
        let filter = PersonaFilter {
            is_system: Some("false".into()),
            ..PersonaFilter::default()
        };
        let query = filter.into_query(limits::PERSONA_PAGE_LIMIT);
        assert_eq!(query.is_system, Some(false));
        assert_eq!(query.limit, 1000);

        let filter = PersonaFilter {
            is_system: Some("yes".into()),
            limit: Some(5),
            offset: Some(10),
        };
        let query = filter.into_query(limits::PERSONA_FETCH_LIMIT);
        assert_eq!(query.is_system, None);
        assert_eq!((query.limit, query.offset), (5, 10));
    }

    #[test]
    fn test_blank_wallet_filter_lists_everything() {
        let filter = WalletFilter {
            wallet_id: Some("  ".into()),
        };
        assert_eq!(filter.into_query(), TransactionQuery::default());
        let filter = WalletFilter {
            wallet_id: Some("w1".into()),
        };
        assert_eq!(filter.into_query().wallet_id.as_deref(), Some("w1"));
    }
}
