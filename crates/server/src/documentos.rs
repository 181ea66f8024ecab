//! Execution document API endpoints

use api_types::documento::{
    CdpNew, DocumentoAnular, DocumentoDetalle, DocumentoGet, DocumentoView, ObligacionNew, PagoNew,
    RecaudoNew, ReconocimientoNew, RpNew, SaldoDocumentoView,
};
use axum::{Json, extract::State};
use engine::{CdpCmd, Money, ObligacionCmd, PagoCmd, RecaudoCmd, ReconocimientoCmd, RpCmd};

use crate::{ServerError, server::ServerState};

pub(crate) fn tipo_engine(tipo: api_types::TipoDocumento) -> engine::TipoDocumento {
    match tipo {
        api_types::TipoDocumento::Cdp => engine::TipoDocumento::Cdp,
        api_types::TipoDocumento::Rp => engine::TipoDocumento::Rp,
        api_types::TipoDocumento::Obligacion => engine::TipoDocumento::Obligacion,
        api_types::TipoDocumento::Pago => engine::TipoDocumento::Pago,
        api_types::TipoDocumento::Reconocimiento => engine::TipoDocumento::Reconocimiento,
        api_types::TipoDocumento::Recaudo => engine::TipoDocumento::Recaudo,
    }
}

fn tipo_api(tipo: engine::TipoDocumento) -> api_types::TipoDocumento {
    match tipo {
        engine::TipoDocumento::Cdp => api_types::TipoDocumento::Cdp,
        engine::TipoDocumento::Rp => api_types::TipoDocumento::Rp,
        engine::TipoDocumento::Obligacion => api_types::TipoDocumento::Obligacion,
        engine::TipoDocumento::Pago => api_types::TipoDocumento::Pago,
        engine::TipoDocumento::Reconocimiento => api_types::TipoDocumento::Reconocimiento,
        engine::TipoDocumento::Recaudo => api_types::TipoDocumento::Recaudo,
    }
}

pub(crate) fn estado_api(estado: engine::Estado) -> api_types::Estado {
    match estado {
        engine::Estado::Activo => api_types::Estado::Activo,
        engine::Estado::Anulado => api_types::Estado::Anulado,
    }
}

fn vista(documento: engine::Documento) -> DocumentoView {
    DocumentoView {
        tipo: tipo_api(documento.tipo),
        numero: documento.numero,
        fecha: documento.fecha,
        valor_centavos: documento.valor.centavos(),
        estado: estado_api(documento.estado),
        codigo_rubro: documento.codigo_rubro.as_str().to_string(),
        padre_numero: documento.padre_numero,
        objeto: documento.objeto,
        tercero: documento.tercero,
        medio_pago: documento.medio_pago,
        fecha_anulacion: documento.fecha_anulacion,
    }
}

/// Handle requests for issuing a CDP
pub async fn cdp(
    State(state): State<ServerState>,
    Json(payload): Json<CdpNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = CdpCmd::new(
        &payload.tenant_id,
        &payload.codigo_rubro,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(tercero) = payload.tercero {
        cmd = cmd.tercero(tercero);
    }
    let documento = state.engine.crear_cdp(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for committing part of a CDP
pub async fn rp(
    State(state): State<ServerState>,
    Json(payload): Json<RpNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = RpCmd::new(
        &payload.tenant_id,
        payload.cdp_numero,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(tercero) = payload.tercero {
        cmd = cmd.tercero(tercero);
    }
    let documento = state.engine.crear_rp(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for recognizing a delivered good or service
pub async fn obligacion(
    State(state): State<ServerState>,
    Json(payload): Json<ObligacionNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = ObligacionCmd::new(
        &payload.tenant_id,
        payload.rp_numero,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(tercero) = payload.tercero {
        cmd = cmd.tercero(tercero);
    }
    let documento = state.engine.crear_obligacion(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for paying an obligación
pub async fn pago(
    State(state): State<ServerState>,
    Json(payload): Json<PagoNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = PagoCmd::new(
        &payload.tenant_id,
        payload.obligacion_numero,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(tercero) = payload.tercero {
        cmd = cmd.tercero(tercero);
    }
    if let Some(medio_pago) = payload.medio_pago {
        cmd = cmd.medio_pago(medio_pago);
    }
    let documento = state.engine.crear_pago(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for recognizing revenue
pub async fn reconocimiento(
    State(state): State<ServerState>,
    Json(payload): Json<ReconocimientoNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = ReconocimientoCmd::new(
        &payload.tenant_id,
        &payload.codigo_rubro,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(tercero) = payload.tercero {
        cmd = cmd.tercero(tercero);
    }
    let documento = state.engine.crear_reconocimiento(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for collecting against a reconocimiento
pub async fn recaudo(
    State(state): State<ServerState>,
    Json(payload): Json<RecaudoNew>,
) -> Result<Json<DocumentoView>, ServerError> {
    let mut cmd = RecaudoCmd::new(
        &payload.tenant_id,
        payload.reconocimiento_numero,
        Money::new(payload.valor_centavos),
        payload.fecha,
    )
    .objeto(payload.objeto);
    if let Some(medio_pago) = payload.medio_pago {
        cmd = cmd.medio_pago(medio_pago);
    }
    let documento = state.engine.crear_recaudo(cmd).await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for voiding a document
pub async fn anular(
    State(state): State<ServerState>,
    Json(payload): Json<DocumentoAnular>,
) -> Result<Json<DocumentoView>, ServerError> {
    let documento = state
        .engine
        .anular_documento(
            &payload.tenant_id,
            tipo_engine(payload.tipo),
            payload.numero,
            payload.fecha,
        )
        .await?;

    Ok(Json(vista(documento)))
}

/// Handle requests for one document and its remaining balance
pub async fn consultar(
    State(state): State<ServerState>,
    Json(payload): Json<DocumentoGet>,
) -> Result<Json<DocumentoDetalle>, ServerError> {
    let tipo = tipo_engine(payload.tipo);
    let documento = state
        .engine
        .documento(&payload.tenant_id, tipo, payload.numero)
        .await?;
    let saldo = state
        .engine
        .saldo_documento(&payload.tenant_id, tipo, payload.numero)
        .await?;

    Ok(Json(DocumentoDetalle {
        documento: vista(documento),
        saldo: SaldoDocumentoView {
            valor_centavos: saldo.valor.centavos(),
            consumido_centavos: saldo.consumido.centavos(),
            saldo_centavos: saldo.saldo.centavos(),
        },
    }))
}
