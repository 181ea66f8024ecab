//! Tenant API endpoints

use api_types::tenant::{TenantNew, TenantView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for registering a new tenant
pub async fn crear(
    State(state): State<ServerState>,
    Json(payload): Json<TenantNew>,
) -> Result<Json<TenantView>, ServerError> {
    let tenant = state
        .engine
        .crear_tenant(&payload.nombre, payload.vigencia)
        .await?;

    Ok(Json(TenantView {
        id: tenant.id,
        nombre: tenant.nombre,
    }))
}
