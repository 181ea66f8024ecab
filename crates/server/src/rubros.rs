//! Catalog API endpoints

use api_types::rubro::{
    ArbolSincronizado, CatalogoImport, CatalogoImportado, RubroList, RubroNew, RubroView,
    RubrosResponse, SaldoGet, SaldoView, Sincronizar,
};
use axum::{Json, extract::State};
use engine::{Money, NuevoRubro, RubroCmd};

use crate::{ServerError, server::ServerState};

pub(crate) fn tipo_engine(tipo: api_types::TipoRubro) -> engine::TipoRubro {
    match tipo {
        api_types::TipoRubro::Gasto => engine::TipoRubro::Gasto,
        api_types::TipoRubro::Ingreso => engine::TipoRubro::Ingreso,
    }
}

pub(crate) fn tipo_api(tipo: engine::TipoRubro) -> api_types::TipoRubro {
    match tipo {
        engine::TipoRubro::Gasto => api_types::TipoRubro::Gasto,
        engine::TipoRubro::Ingreso => api_types::TipoRubro::Ingreso,
    }
}

fn vista(rubro: engine::Rubro) -> RubroView {
    let definitiva = rubro.definitiva();
    RubroView {
        codigo: rubro.codigo.as_str().to_string(),
        cuenta: rubro.cuenta,
        tipo: tipo_api(rubro.tipo),
        es_hoja: rubro.es_hoja,
        inicial_centavos: rubro.apropiacion.inicial.centavos(),
        adiciones_centavos: rubro.apropiacion.adiciones.centavos(),
        reducciones_centavos: rubro.apropiacion.reducciones.centavos(),
        creditos_centavos: rubro.apropiacion.creditos.centavos(),
        contracreditos_centavos: rubro.apropiacion.contracreditos.centavos(),
        definitiva_centavos: definitiva.centavos(),
    }
}

/// Handle requests for adding one rubro to the catalog
pub async fn crear(
    State(state): State<ServerState>,
    Json(payload): Json<RubroNew>,
) -> Result<Json<RubroView>, ServerError> {
    let mut cmd = RubroCmd::new(
        &payload.tenant_id,
        &payload.codigo,
        &payload.cuenta,
        tipo_engine(payload.tipo),
        payload.es_hoja,
    );
    if let Some(centavos) = payload.inicial_centavos {
        cmd = cmd.inicial(Money::new(centavos));
    }
    let rubro = state.engine.crear_rubro(cmd).await?;

    Ok(Json(vista(rubro)))
}

/// Handle requests for bulk-loading a catalog
pub async fn importar(
    State(state): State<ServerState>,
    Json(payload): Json<CatalogoImport>,
) -> Result<Json<CatalogoImportado>, ServerError> {
    let nuevos: Vec<NuevoRubro> = payload
        .rubros
        .into_iter()
        .map(|item| NuevoRubro {
            codigo: item.codigo,
            cuenta: item.cuenta,
            tipo: tipo_engine(item.tipo),
            es_hoja: item.es_hoja,
            inicial: Money::new(item.inicial_centavos.unwrap_or(0)),
        })
        .collect();
    let importados = state
        .engine
        .importar_catalogo(&payload.tenant_id, &nuevos)
        .await?;

    Ok(Json(CatalogoImportado { importados }))
}

/// Handle requests for recomputing the aggregator rollup
pub async fn sincronizar(
    State(state): State<ServerState>,
    Json(payload): Json<Sincronizar>,
) -> Result<Json<ArbolSincronizado>, ServerError> {
    let reescritos = state.engine.sincronizar_arbol(&payload.tenant_id).await?;

    Ok(Json(ArbolSincronizado { reescritos }))
}

/// Handle requests for the availability picture of one rubro
pub async fn saldo(
    State(state): State<ServerState>,
    Json(payload): Json<SaldoGet>,
) -> Result<Json<SaldoView>, ServerError> {
    let saldo = state
        .engine
        .saldo_rubro(&payload.tenant_id, &payload.codigo)
        .await?;

    Ok(Json(SaldoView {
        definitiva_centavos: saldo.definitiva.centavos(),
        afectado_centavos: saldo.afectado.centavos(),
        disponible_centavos: saldo.disponible.centavos(),
    }))
}

/// Handle requests for listing one side of the catalog
pub async fn listar(
    State(state): State<ServerState>,
    Json(payload): Json<RubroList>,
) -> Result<Json<RubrosResponse>, ServerError> {
    let rubros = state
        .engine
        .listar_rubros(&payload.tenant_id, tipo_engine(payload.tipo))
        .await?;

    Ok(Json(RubrosResponse {
        rubros: rubros.into_iter().map(vista).collect(),
    }))
}
