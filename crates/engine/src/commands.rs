//! Command structs for engine operations.
//!
//! These types group parameters for write operations (document creation,
//! budget modifications, metadata updates), keeping call sites readable and
//! avoiding long argument lists.

use chrono::NaiveDate;

use crate::{Money, documentos::TipoDocumento, rubros::TipoRubro};

/// Create one rubro in the classifier.
#[derive(Clone, Debug)]
pub struct RubroCmd {
    pub tenant_id: String,
    pub codigo: String,
    pub cuenta: String,
    pub tipo: TipoRubro,
    pub es_hoja: bool,
    pub inicial: Money,
}

impl RubroCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        codigo: impl Into<String>,
        cuenta: impl Into<String>,
        tipo: TipoRubro,
        es_hoja: bool,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            codigo: codigo.into(),
            cuenta: cuenta.into(),
            tipo,
            es_hoja,
            inicial: Money::ZERO,
        }
    }

    #[must_use]
    pub fn inicial(mut self, inicial: Money) -> Self {
        self.inicial = inicial;
        self
    }
}

/// One catalog row for bulk import.
#[derive(Clone, Debug)]
pub struct NuevoRubro {
    pub codigo: String,
    pub cuenta: String,
    pub tipo: TipoRubro,
    pub es_hoja: bool,
    pub inicial: Money,
}

/// Create a CDP against a leaf gasto rubro.
#[derive(Clone, Debug)]
pub struct CdpCmd {
    pub tenant_id: String,
    pub codigo_rubro: String,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub tercero: Option<String>,
}

impl CdpCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        codigo_rubro: impl Into<String>,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            codigo_rubro: codigo_rubro.into(),
            valor,
            fecha,
            objeto: String::new(),
            tercero: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }
}

/// Create an RP against an active CDP.
#[derive(Clone, Debug)]
pub struct RpCmd {
    pub tenant_id: String,
    pub cdp_numero: i64,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub tercero: Option<String>,
}

impl RpCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        cdp_numero: i64,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            cdp_numero,
            valor,
            fecha,
            objeto: String::new(),
            tercero: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }
}

/// Create an obligación against an active RP.
#[derive(Clone, Debug)]
pub struct ObligacionCmd {
    pub tenant_id: String,
    pub rp_numero: i64,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub tercero: Option<String>,
}

impl ObligacionCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        rp_numero: i64,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            rp_numero,
            valor,
            fecha,
            objeto: String::new(),
            tercero: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }
}

/// Create a pago against an active obligación.
#[derive(Clone, Debug)]
pub struct PagoCmd {
    pub tenant_id: String,
    pub obligacion_numero: i64,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub tercero: Option<String>,
    pub medio_pago: Option<String>,
}

impl PagoCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        obligacion_numero: i64,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            obligacion_numero,
            valor,
            fecha,
            objeto: String::new(),
            tercero: None,
            medio_pago: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }

    #[must_use]
    pub fn medio_pago(mut self, medio_pago: impl Into<String>) -> Self {
        self.medio_pago = Some(medio_pago.into());
        self
    }
}

/// Create a reconocimiento against a leaf ingreso rubro.
#[derive(Clone, Debug)]
pub struct ReconocimientoCmd {
    pub tenant_id: String,
    pub codigo_rubro: String,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub tercero: Option<String>,
}

impl ReconocimientoCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        codigo_rubro: impl Into<String>,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            codigo_rubro: codigo_rubro.into(),
            valor,
            fecha,
            objeto: String::new(),
            tercero: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }
}

/// Create a recaudo against an active reconocimiento.
#[derive(Clone, Debug)]
pub struct RecaudoCmd {
    pub tenant_id: String,
    pub reconocimiento_numero: i64,
    pub valor: Money,
    pub fecha: NaiveDate,
    pub objeto: String,
    pub medio_pago: Option<String>,
}

impl RecaudoCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        reconocimiento_numero: i64,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            reconocimiento_numero,
            valor,
            fecha,
            objeto: String::new(),
            medio_pago: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = objeto.into();
        self
    }

    #[must_use]
    pub fn medio_pago(mut self, medio_pago: impl Into<String>) -> Self {
        self.medio_pago = Some(medio_pago.into());
        self
    }
}

/// Apply an adición: raises one leaf gasto rubro and one leaf ingreso rubro
/// by the same amount.
#[derive(Clone, Debug)]
pub struct AdicionCmd {
    pub tenant_id: String,
    pub acto: String,
    pub rubro_gasto: String,
    pub rubro_ingreso: String,
    pub valor: Money,
    pub fecha: NaiveDate,
}

impl AdicionCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        acto: impl Into<String>,
        rubro_gasto: impl Into<String>,
        rubro_ingreso: impl Into<String>,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            acto: acto.into(),
            rubro_gasto: rubro_gasto.into(),
            rubro_ingreso: rubro_ingreso.into(),
            valor,
            fecha,
        }
    }
}

/// Apply a reducción: lowers one leaf gasto rubro and one leaf ingreso rubro
/// by the same amount.
#[derive(Clone, Debug)]
pub struct ReduccionCmd {
    pub tenant_id: String,
    pub acto: String,
    pub rubro_gasto: String,
    pub rubro_ingreso: String,
    pub valor: Money,
    pub fecha: NaiveDate,
}

impl ReduccionCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        acto: impl Into<String>,
        rubro_gasto: impl Into<String>,
        rubro_ingreso: impl Into<String>,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            acto: acto.into(),
            rubro_gasto: rubro_gasto.into(),
            rubro_ingreso: rubro_ingreso.into(),
            valor,
            fecha,
        }
    }
}

/// Apply a crédito/contracrédito: moves appropriation between two leaf gasto
/// rubros without changing the budget total.
#[derive(Clone, Debug)]
pub struct CreditoCmd {
    pub tenant_id: String,
    pub acto: String,
    pub rubro_credito: String,
    pub rubro_contracredito: String,
    pub valor: Money,
    pub fecha: NaiveDate,
}

impl CreditoCmd {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        acto: impl Into<String>,
        rubro_credito: impl Into<String>,
        rubro_contracredito: impl Into<String>,
        valor: Money,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            acto: acto.into(),
            rubro_credito: rubro_credito.into(),
            rubro_contracredito: rubro_contracredito.into(),
            valor,
            fecha,
        }
    }
}

/// Update the descriptive fields of an existing document.
///
/// Monetary and structural fields never change after creation; correcting
/// those means voiding and recreating the document.
#[derive(Clone, Debug)]
pub struct ActualizarDocumentoCmd {
    pub tenant_id: String,
    pub tipo: TipoDocumento,
    pub numero: i64,
    pub objeto: Option<String>,
    pub tercero: Option<String>,
    pub medio_pago: Option<String>,
}

impl ActualizarDocumentoCmd {
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, tipo: TipoDocumento, numero: i64) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            tipo,
            numero,
            objeto: None,
            tercero: None,
            medio_pago: None,
        }
    }

    #[must_use]
    pub fn objeto(mut self, objeto: impl Into<String>) -> Self {
        self.objeto = Some(objeto.into());
        self
    }

    #[must_use]
    pub fn tercero(mut self, tercero: impl Into<String>) -> Self {
        self.tercero = Some(tercero.into());
        self
    }

    #[must_use]
    pub fn medio_pago(mut self, medio_pago: impl Into<String>) -> Self {
        self.medio_pago = Some(medio_pago.into());
        self
    }
}
