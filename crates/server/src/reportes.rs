//! Execution report API endpoints

use api_types::reporte::{
    FilaGastoView, FilaIngresoView, ReporteGastos, ReporteGet, ReporteIngresos, TripleteView,
};
use axum::{Json, extract::State};
use engine::Triplete;

use crate::{ServerError, server::ServerState};

fn vista_triplete(triplete: Triplete) -> TripleteView {
    TripleteView {
        anterior_centavos: triplete.anterior.centavos(),
        mes_centavos: triplete.mes.centavos(),
        acumulado_centavos: triplete.acumulado().centavos(),
    }
}

fn vista_gasto(fila: engine::FilaGasto) -> FilaGastoView {
    FilaGastoView {
        ppto_definitivo_centavos: fila.definitiva().centavos(),
        saldo_disponible_centavos: fila.saldo_disponible().centavos(),
        saldo_por_obligar_centavos: fila.saldo_por_obligar().centavos(),
        saldo_por_pagar_centavos: fila.saldo_por_pagar().centavos(),
        codigo: fila.codigo.as_str().to_string(),
        cuenta: fila.cuenta,
        es_hoja: fila.es_hoja,
        ppto_inicial_centavos: fila.apropiacion.inicial.centavos(),
        adiciones_centavos: fila.apropiacion.adiciones.centavos(),
        reducciones_centavos: fila.apropiacion.reducciones.centavos(),
        creditos_centavos: fila.apropiacion.creditos.centavos(),
        contracreditos_centavos: fila.apropiacion.contracreditos.centavos(),
        cdp: vista_triplete(fila.cdp),
        rp: vista_triplete(fila.rp),
        obligaciones: vista_triplete(fila.obligaciones),
        pagos: vista_triplete(fila.pagos),
    }
}

fn vista_ingreso(fila: engine::FilaIngreso) -> FilaIngresoView {
    FilaIngresoView {
        ppto_definitivo_centavos: fila.definitiva().centavos(),
        saldo_por_recaudar_centavos: fila.saldo_por_recaudar().centavos(),
        codigo: fila.codigo.as_str().to_string(),
        cuenta: fila.cuenta,
        es_hoja: fila.es_hoja,
        ppto_inicial_centavos: fila.apropiacion.inicial.centavos(),
        adiciones_centavos: fila.apropiacion.adiciones.centavos(),
        reducciones_centavos: fila.apropiacion.reducciones.centavos(),
        reconocimientos: vista_triplete(fila.reconocimientos),
        recaudos: vista_triplete(fila.recaudos),
    }
}

/// Handle requests for the expense execution report
pub async fn gastos(
    State(state): State<ServerState>,
    Json(payload): Json<ReporteGet>,
) -> Result<Json<ReporteGastos>, ServerError> {
    let filas = state
        .engine
        .reporte_ejecucion_gastos(&payload.tenant_id, payload.mes)
        .await?;

    Ok(Json(ReporteGastos {
        filas: filas.into_iter().map(vista_gasto).collect(),
    }))
}

/// Handle requests for the revenue execution report
pub async fn ingresos(
    State(state): State<ServerState>,
    Json(payload): Json<ReporteGet>,
) -> Result<Json<ReporteIngresos>, ServerError> {
    let filas = state
        .engine
        .reporte_ejecucion_ingresos(&payload.tenant_id, payload.mes)
        .await?;

    Ok(Json(ReporteIngresos {
        filas: filas.into_iter().map(vista_ingreso).collect(),
    }))
}
