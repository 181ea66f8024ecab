//! Consolidation and period cursor API endpoints

use api_types::consolidacion::{Consolidar, ConsolidacionView, RubroConsolidadoView};
use api_types::periodo::{CierreView, PeriodoGet, PeriodoView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn vista_rubro(rubro: engine::RubroConsolidado) -> RubroConsolidadoView {
    RubroConsolidadoView {
        codigo: rubro.codigo.as_str().to_string(),
        cdp_centavos: rubro.cdp.centavos(),
        rp_centavos: rubro.rp.centavos(),
        obligaciones_centavos: rubro.obligaciones.centavos(),
        pagos_centavos: rubro.pagos.centavos(),
        reconocimientos_centavos: rubro.reconocimientos.centavos(),
        recaudos_centavos: rubro.recaudos.centavos(),
    }
}

/// Handle requests for consolidating the open month
pub async fn consolidar(
    State(state): State<ServerState>,
    Json(payload): Json<Consolidar>,
) -> Result<Json<ConsolidacionView>, ServerError> {
    let snapshot = state.engine.consolidar_mes(&payload.tenant_id).await?;

    Ok(Json(ConsolidacionView {
        vigencia: snapshot.vigencia,
        mes: snapshot.mes,
        rubros: snapshot.rubros.into_iter().map(vista_rubro).collect(),
    }))
}

/// Handle requests for closing the open month
pub async fn cierre(
    State(state): State<ServerState>,
    Json(payload): Json<PeriodoGet>,
) -> Result<Json<CierreView>, ServerError> {
    let cierre = state.engine.cierre_mes(&payload.tenant_id).await?;

    Ok(Json(CierreView {
        vigencia: cierre.vigencia,
        mes_cerrado: cierre.mes_cerrado,
        mes_actual: cierre.mes_actual,
    }))
}

/// Handle requests for rolling into the next fiscal year
pub async fn abrir_vigencia(
    State(state): State<ServerState>,
    Json(payload): Json<PeriodoGet>,
) -> Result<Json<PeriodoView>, ServerError> {
    let periodo = state.engine.abrir_vigencia(&payload.tenant_id).await?;

    Ok(Json(PeriodoView {
        vigencia: periodo.vigencia,
        mes_actual: periodo.mes_actual,
    }))
}

/// Handle requests for the fiscal cursor
pub async fn periodo(
    State(state): State<ServerState>,
    Json(payload): Json<PeriodoGet>,
) -> Result<Json<PeriodoView>, ServerError> {
    let periodo = state.engine.periodo(&payload.tenant_id).await?;

    Ok(Json(PeriodoView {
        vigencia: periodo.vigencia,
        mes_actual: periodo.mes_actual,
    }))
}
