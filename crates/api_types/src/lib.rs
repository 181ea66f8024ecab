use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of the budget a rubro belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoRubro {
    Gasto,
    Ingreso,
}

/// Execution document stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoDocumento {
    Cdp,
    Rp,
    Obligacion,
    Pago,
    Reconocimiento,
    Recaudo,
}

/// Lifecycle state of a document or modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Estado {
    Activo,
    Anulado,
}

/// Kind of budget modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoModificacion {
    Adicion,
    Reduccion,
    CreditoContracredito,
}

pub mod tenant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TenantNew {
        pub nombre: String,
        /// Fiscal year the tenant opens in.
        pub vigencia: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TenantView {
        pub id: String,
        pub nombre: String,
    }
}

pub mod rubro {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubroNew {
        pub tenant_id: String,
        /// Dotted classifier code, e.g. "2.1.3".
        pub codigo: String,
        pub cuenta: String,
        pub tipo: TipoRubro,
        pub es_hoja: bool,
        pub inicial_centavos: Option<i64>,
    }

    /// One row of a bulk catalog load.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubroItem {
        pub codigo: String,
        pub cuenta: String,
        pub tipo: TipoRubro,
        pub es_hoja: bool,
        pub inicial_centavos: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogoImport {
        pub tenant_id: String,
        pub rubros: Vec<RubroItem>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogoImportado {
        pub importados: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Sincronizar {
        pub tenant_id: String,
    }

    /// How many aggregator rows the rollup rewrote.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArbolSincronizado {
        pub reescritos: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaldoGet {
        pub tenant_id: String,
        pub codigo: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaldoView {
        pub definitiva_centavos: i64,
        pub afectado_centavos: i64,
        pub disponible_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubroList {
        pub tenant_id: String,
        pub tipo: TipoRubro,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubroView {
        pub codigo: String,
        pub cuenta: String,
        pub tipo: TipoRubro,
        pub es_hoja: bool,
        pub inicial_centavos: i64,
        pub adiciones_centavos: i64,
        pub reducciones_centavos: i64,
        pub creditos_centavos: i64,
        pub contracreditos_centavos: i64,
        pub definitiva_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubrosResponse {
        pub rubros: Vec<RubroView>,
    }
}

pub mod documento {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CdpNew {
        pub tenant_id: String,
        pub codigo_rubro: String,
        /// Must be > 0.
        pub valor_centavos: i64,
        /// ISO date (YYYY-MM-DD) inside the tenant's open vigencia.
        pub fecha: NaiveDate,
        pub objeto: String,
        pub tercero: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RpNew {
        pub tenant_id: String,
        pub cdp_numero: i64,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
        pub objeto: String,
        pub tercero: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ObligacionNew {
        pub tenant_id: String,
        pub rp_numero: i64,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
        pub objeto: String,
        pub tercero: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PagoNew {
        pub tenant_id: String,
        pub obligacion_numero: i64,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
        pub objeto: String,
        pub tercero: Option<String>,
        pub medio_pago: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReconocimientoNew {
        pub tenant_id: String,
        pub codigo_rubro: String,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
        pub objeto: String,
        pub tercero: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecaudoNew {
        pub tenant_id: String,
        pub reconocimiento_numero: i64,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
        pub objeto: String,
        pub medio_pago: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentoAnular {
        pub tenant_id: String,
        pub tipo: TipoDocumento,
        pub numero: i64,
        /// Date the void takes effect, inside the open vigencia.
        pub fecha: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentoGet {
        pub tenant_id: String,
        pub tipo: TipoDocumento,
        pub numero: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentoView {
        pub tipo: TipoDocumento,
        pub numero: i64,
        pub fecha: NaiveDate,
        pub valor_centavos: i64,
        pub estado: Estado,
        pub codigo_rubro: String,
        /// Numero of the backing document one stage up, absent on chain heads.
        pub padre_numero: Option<i64>,
        pub objeto: String,
        pub tercero: Option<String>,
        pub medio_pago: Option<String>,
        pub fecha_anulacion: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaldoDocumentoView {
        pub valor_centavos: i64,
        pub consumido_centavos: i64,
        pub saldo_centavos: i64,
    }

    /// Document plus its remaining balance against the next stage.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentoDetalle {
        pub documento: DocumentoView,
        pub saldo: SaldoDocumentoView,
    }
}

pub mod modificacion {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdicionNew {
        pub tenant_id: String,
        /// Administrative act backing the modification.
        pub acto: String,
        pub rubro_gasto: String,
        pub rubro_ingreso: String,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReduccionNew {
        pub tenant_id: String,
        pub acto: String,
        pub rubro_gasto: String,
        pub rubro_ingreso: String,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditoNew {
        pub tenant_id: String,
        pub acto: String,
        /// Gasto rubro receiving appropriation.
        pub rubro_credito: String,
        /// Gasto rubro giving it up.
        pub rubro_contracredito: String,
        pub valor_centavos: i64,
        pub fecha: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ModificacionAnular {
        pub tenant_id: String,
        pub numero: i64,
        pub fecha: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ModificacionView {
        pub numero: i64,
        pub tipo: TipoModificacion,
        pub acto: String,
        pub fecha: NaiveDate,
        pub valor_centavos: i64,
        pub rubro_gasto: String,
        pub rubro_contrapartida: String,
        pub estado: Estado,
        pub fecha_anulacion: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EquilibrioGet {
        pub tenant_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EquilibrioView {
        pub total_gastos_centavos: i64,
        pub total_ingresos_centavos: i64,
        pub equilibrado: bool,
    }
}

pub mod periodo {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodoGet {
        pub tenant_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodoView {
        pub vigencia: i32,
        pub mes_actual: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CierreView {
        pub vigencia: i32,
        pub mes_cerrado: i32,
        pub mes_actual: i32,
    }
}

pub mod consolidacion {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Consolidar {
        pub tenant_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RubroConsolidadoView {
        pub codigo: String,
        pub cdp_centavos: i64,
        pub rp_centavos: i64,
        pub obligaciones_centavos: i64,
        pub pagos_centavos: i64,
        pub reconocimientos_centavos: i64,
        pub recaudos_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConsolidacionView {
        pub vigencia: i32,
        pub mes: i32,
        pub rubros: Vec<RubroConsolidadoView>,
    }
}

pub mod reporte {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReporteGet {
        pub tenant_id: String,
        /// Cutoff month 1..=12; absent means the tenant's open month.
        pub mes: Option<i32>,
    }

    /// Stage movement before the cutoff month, inside it, and in total.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripleteView {
        pub anterior_centavos: i64,
        pub mes_centavos: i64,
        pub acumulado_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FilaGastoView {
        pub codigo: String,
        pub cuenta: String,
        pub es_hoja: bool,
        pub ppto_inicial_centavos: i64,
        pub adiciones_centavos: i64,
        pub reducciones_centavos: i64,
        pub creditos_centavos: i64,
        pub contracreditos_centavos: i64,
        pub ppto_definitivo_centavos: i64,
        pub cdp: TripleteView,
        pub rp: TripleteView,
        pub obligaciones: TripleteView,
        pub pagos: TripleteView,
        pub saldo_disponible_centavos: i64,
        pub saldo_por_obligar_centavos: i64,
        pub saldo_por_pagar_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FilaIngresoView {
        pub codigo: String,
        pub cuenta: String,
        pub es_hoja: bool,
        pub ppto_inicial_centavos: i64,
        pub adiciones_centavos: i64,
        pub reducciones_centavos: i64,
        pub ppto_definitivo_centavos: i64,
        pub reconocimientos: TripleteView,
        pub recaudos: TripleteView,
        pub saldo_por_recaudar_centavos: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReporteGastos {
        pub filas: Vec<FilaGastoView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReporteIngresos {
        pub filas: Vec<FilaIngresoView>,
    }
}
