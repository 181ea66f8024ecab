//! Budget modification API endpoints

use api_types::modificacion::{
    AdicionNew, CreditoNew, EquilibrioGet, EquilibrioView, ModificacionAnular, ModificacionView,
    ReduccionNew,
};
use axum::{Json, extract::State};
use engine::{AdicionCmd, CreditoCmd, Money, ReduccionCmd};

use crate::{ServerError, documentos::estado_api, server::ServerState};

fn tipo_api(tipo: engine::TipoModificacion) -> api_types::TipoModificacion {
    match tipo {
        engine::TipoModificacion::Adicion => api_types::TipoModificacion::Adicion,
        engine::TipoModificacion::Reduccion => api_types::TipoModificacion::Reduccion,
        engine::TipoModificacion::CreditoContracredito => {
            api_types::TipoModificacion::CreditoContracredito
        }
    }
}

fn vista(modificacion: engine::Modificacion) -> ModificacionView {
    ModificacionView {
        numero: modificacion.numero,
        tipo: tipo_api(modificacion.tipo),
        acto: modificacion.acto,
        fecha: modificacion.fecha,
        valor_centavos: modificacion.valor.centavos(),
        rubro_gasto: modificacion.rubro_gasto.as_str().to_string(),
        rubro_contrapartida: modificacion.rubro_contrapartida.as_str().to_string(),
        estado: estado_api(modificacion.estado),
        fecha_anulacion: modificacion.fecha_anulacion,
    }
}

/// Handle requests for applying an adición
pub async fn adicion(
    State(state): State<ServerState>,
    Json(payload): Json<AdicionNew>,
) -> Result<Json<ModificacionView>, ServerError> {
    let modificacion = state
        .engine
        .aplicar_adicion(AdicionCmd::new(
            &payload.tenant_id,
            &payload.acto,
            &payload.rubro_gasto,
            &payload.rubro_ingreso,
            Money::new(payload.valor_centavos),
            payload.fecha,
        ))
        .await?;

    Ok(Json(vista(modificacion)))
}

/// Handle requests for applying a reducción
pub async fn reduccion(
    State(state): State<ServerState>,
    Json(payload): Json<ReduccionNew>,
) -> Result<Json<ModificacionView>, ServerError> {
    let modificacion = state
        .engine
        .aplicar_reduccion(ReduccionCmd::new(
            &payload.tenant_id,
            &payload.acto,
            &payload.rubro_gasto,
            &payload.rubro_ingreso,
            Money::new(payload.valor_centavos),
            payload.fecha,
        ))
        .await?;

    Ok(Json(vista(modificacion)))
}

/// Handle requests for applying a crédito/contracrédito
pub async fn credito(
    State(state): State<ServerState>,
    Json(payload): Json<CreditoNew>,
) -> Result<Json<ModificacionView>, ServerError> {
    let modificacion = state
        .engine
        .aplicar_credito_contracredito(CreditoCmd::new(
            &payload.tenant_id,
            &payload.acto,
            &payload.rubro_credito,
            &payload.rubro_contracredito,
            Money::new(payload.valor_centavos),
            payload.fecha,
        ))
        .await?;

    Ok(Json(vista(modificacion)))
}

/// Handle requests for voiding a modification
pub async fn anular(
    State(state): State<ServerState>,
    Json(payload): Json<ModificacionAnular>,
) -> Result<Json<ModificacionView>, ServerError> {
    let modificacion = state
        .engine
        .anular_modificacion(&payload.tenant_id, payload.numero, payload.fecha)
        .await?;

    Ok(Json(vista(modificacion)))
}

/// Handle requests for the two-side totals check
pub async fn equilibrio(
    State(state): State<ServerState>,
    Json(payload): Json<EquilibrioGet>,
) -> Result<Json<EquilibrioView>, ServerError> {
    let equilibrio = state.engine.verificar_equilibrio(&payload.tenant_id).await?;

    Ok(Json(EquilibrioView {
        total_gastos_centavos: equilibrio.total_gastos.centavos(),
        total_ingresos_centavos: equilibrio.total_ingresos.centavos(),
        equilibrado: equilibrio.equilibrado(),
    }))
}
