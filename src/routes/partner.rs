// ABOUTME: Partner-admin pages and JSON actions: account, models, tenants, ledger and tenant keys
// ABOUTME: Tenant edits send only changed fields and skip the backend when nothing changed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{data, or_empty, or_none, render_page, SessionCredentials};
use crate::errors::ActionError;
use crate::forms::partner::{
    CreateTenantForm, EditTenantForm, ProfileForm, TenantKeyForm, TenantTopupForm,
};
use crate::server::ServerResources;
use crate::views::columns::{tenant_table, transaction_table};
use crate::views::dashboard::{ModelCatalog, PartnerAccount};
use crate::views::notifications::ActionOutcome;
use crate::views::table::{TableQuery, TableView};
use xaze_core::models::{PartnerModel, PartnerProfile, TransactionQuery};

type Resources = State<Arc<ServerResources>>;

/// Partner ledger filter; the backend names the parameter `wallet`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerFilter {
    /// Restrict to one wallet
    #[serde(default)]
    pub wallet: Option<String>,
}

impl LedgerFilter {
    fn into_query(self) -> TransactionQuery {
        self.wallet
            .filter(|w| !w.trim().is_empty())
            .map_or_else(TransactionQuery::default, TransactionQuery::for_wallet)
    }
}

#[derive(Serialize)]
struct TenantsPage {
    tenants: TableView,
    models: Vec<PartnerModel>,
}

#[derive(Serialize)]
struct InfoPage {
    title: &'static str,
}

/// Partner admin routes
pub struct PartnerRoutes;

impl PartnerRoutes {
    /// Create all partner admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            // Pages
            .route("/partner", get(Self::handle_account_page))
            .route("/partner/models", get(Self::handle_models_page))
            .route("/partner/tenants", get(Self::handle_tenants_page))
            .route("/partner/transactions", get(Self::handle_transactions_page))
            .route("/partner/settings", get(Self::handle_settings_page))
            .route("/partner/terms", get(Self::handle_terms_page))
            .route("/partner/contact", get(Self::handle_contact_page))
            // Account
            .route(
                "/api/partner/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .route("/api/partner/models", get(Self::handle_list_models))
            .route("/api/partner/transactions", get(Self::handle_list_transactions))
            // Tenants
            .route(
                "/api/partner/tenants",
                get(Self::handle_list_tenants).post(Self::handle_create_tenant),
            )
            .route("/api/partner/tenants/:id", put(Self::handle_update_tenant))
            .route("/api/partner/tenants/:id/topup", post(Self::handle_topup))
            .route(
                "/api/partner/tenants/:id/keys",
                get(Self::handle_list_keys).post(Self::handle_create_key),
            )
            .route("/api/partner/tenants/:id/keys/:key_id", delete(Self::handle_revoke_key))
            .with_state(resources)
    }

    // ========================================================================
    // Pages
    // ========================================================================

    async fn handle_account_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let profile = or_none(
            resources.client.partner_profile(credentials.get()).await,
            "profile",
        )
        .unwrap_or_default();
        let account = PartnerAccount::build(&profile);
        render_page(&resources, "/partner", credentials.get(), account).await
    }

    async fn handle_models_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let models = or_empty(resources.client.partner_models(credentials.get()).await, "models");
        let catalog = ModelCatalog::build(&models);
        render_page(&resources, "/partner/models", credentials.get(), catalog).await
    }

    async fn handle_tenants_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
    ) -> Response {
        let client = &resources.client;
        let (tenants, models) = tokio::join!(
            client.partner_tenants(credentials.get()),
            client.partner_models(credentials.get()),
        );
        let page = TenantsPage {
            tenants: tenant_table().view(&or_empty(tenants, "tenants"), &table),
            models: or_empty(models, "models"),
        };
        render_page(&resources, "/partner/tenants", credentials.get(), page).await
    }

    async fn handle_transactions_page(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(table): Query<TableQuery>,
        Query(filter): Query<LedgerFilter>,
    ) -> Response {
        let rows = resources
            .client
            .partner_transactions(credentials.get(), &filter.into_query())
            .await;
        let view = transaction_table().view(&or_empty(rows, "transactions"), &table);
        render_page(&resources, "/partner/transactions", credentials.get(), view).await
    }

    async fn handle_settings_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let profile: PartnerProfile = or_none(
            resources.client.partner_profile(credentials.get()).await,
            "profile",
        )
        .unwrap_or_default();
        render_page(&resources, "/partner/settings", credentials.get(), profile).await
    }

    async fn handle_terms_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let page = InfoPage {
            title: "Terms & Conditions",
        };
        render_page(&resources, "/partner/terms", credentials.get(), page).await
    }

    async fn handle_contact_page(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Response {
        let page = InfoPage { title: "Contact Us" };
        render_page(&resources, "/partner/contact", credentials.get(), page).await
    }

    // ========================================================================
    // Account
    // ========================================================================

    async fn handle_get_profile(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.partner_profile(credentials.get()).await?))
    }

    async fn handle_update_profile(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<ProfileForm>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .update_partner_profile(credentials.get(), form)
            .await?;
        Ok(ActionOutcome::done("Profile updated successfully"))
    }

    async fn handle_list_models(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.partner_models(credentials.get()).await?))
    }

    async fn handle_list_transactions(
        State(resources): Resources,
        credentials: SessionCredentials,
        Query(filter): Query<LedgerFilter>,
    ) -> Result<Response, ActionError> {
        let rows = resources
            .client
            .partner_transactions(credentials.get(), &filter.into_query())
            .await?;
        Ok(data(&rows))
    }

    // ========================================================================
    // Tenants
    // ========================================================================

    async fn handle_list_tenants(
        State(resources): Resources,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        Ok(data(&resources.client.partner_tenants(credentials.get()).await?))
    }

    async fn handle_create_tenant(
        State(resources): Resources,
        credentials: SessionCredentials,
        Json(form): Json<CreateTenantForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let created = resources.client.create_tenant(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Tenant created successfully").with_data(created))
    }

    async fn handle_update_tenant(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(tenant_id): Path<String>,
        Json(form): Json<EditTenantForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let edit = form.validate()?;
        let tenants = resources.client.partner_tenants(credentials.get()).await?;
        let current = tenants
            .iter()
            .find(|t| t.data.id == tenant_id)
            .ok_or_else(|| ActionError::backend(404, "Tenant not found"))?;

        let update = edit.changes(current);
        if update.is_empty() {
            return Ok(ActionOutcome::unchanged("No changes to save"));
        }
        resources
            .client
            .update_tenant(credentials.get(), &tenant_id, &update)
            .await?;
        Ok(ActionOutcome::done("Tenant updated successfully"))
    }

    async fn handle_topup(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(tenant_id): Path<String>,
        Json(form): Json<TenantTopupForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = TenantTopupForm { tenant_id, ..form };
        resources.client.topup_tenant(credentials.get(), form).await?;
        Ok(ActionOutcome::done("Tenant topped up successfully"))
    }

    async fn handle_list_keys(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(tenant_id): Path<String>,
    ) -> Result<Response, ActionError> {
        let keys = resources
            .client
            .tenant_keys(credentials.get(), &tenant_id)
            .await?;
        Ok(data(&keys))
    }

    async fn handle_create_key(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path(tenant_id): Path<String>,
        Json(form): Json<TenantKeyForm>,
    ) -> Result<ActionOutcome, ActionError> {
        let form = TenantKeyForm { tenant_id, ..form };
        let created = resources.client.create_tenant_key(credentials.get(), form).await?;
        Ok(ActionOutcome::done("API Key generated successfully").with(&created))
    }

    async fn handle_revoke_key(
        State(resources): Resources,
        credentials: SessionCredentials,
        Path((tenant_id, key_id)): Path<(String, String)>,
    ) -> Result<ActionOutcome, ActionError> {
        resources
            .client
            .revoke_tenant_key(credentials.get(), &tenant_id, &key_id)
            .await?;
        Ok(ActionOutcome::done("Key revoked successfully"))
    }
}
