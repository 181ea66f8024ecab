use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod consolidacion;
mod documentos;
mod modificaciones;
mod reportes;
mod rubros;
mod server;
mod tenants;

pub mod types {
    pub mod tenant {
        pub use api_types::tenant::{TenantNew, TenantView};
    }

    pub mod rubro {
        pub use api_types::rubro::{
            ArbolSincronizado, CatalogoImport, CatalogoImportado, RubroItem, RubroList, RubroNew,
            RubroView, RubrosResponse, SaldoGet, SaldoView, Sincronizar,
        };
    }

    pub mod documento {
        pub use api_types::documento::{
            CdpNew, DocumentoAnular, DocumentoDetalle, DocumentoGet, DocumentoView, ObligacionNew,
            PagoNew, RecaudoNew, ReconocimientoNew, RpNew, SaldoDocumentoView,
        };
    }

    pub mod modificacion {
        pub use api_types::modificacion::{
            AdicionNew, CreditoNew, EquilibrioGet, EquilibrioView, ModificacionAnular,
            ModificacionView, ReduccionNew,
        };
    }

    pub mod periodo {
        pub use api_types::periodo::{CierreView, PeriodoGet, PeriodoView};
    }

    pub mod consolidacion {
        pub use api_types::consolidacion::{Consolidar, ConsolidacionView, RubroConsolidadoView};
    }

    pub mod reporte {
        pub use api_types::reporte::{
            FilaGastoView, FilaIngresoView, ReporteGastos, ReporteGet, ReporteIngresos,
            TripleteView,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::ConcurrencyConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::RubroNoImputable(_)
        | EngineError::InvalidState(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InsufficientBalance { .. }
        | EngineError::BelowConsumed { .. }
        | EngineError::EquilibriumViolation(_)
        | EngineError::AlreadyAtYearEnd { .. }
        | EngineError::Corruption(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
