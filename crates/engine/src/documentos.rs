//! Execution documents: the CDP chain on the gasto side and the
//! reconocimiento chain on the ingreso side.
//!
//! Expense execution: CDP -> RP -> obligación -> pago.
//! Revenue execution: reconocimiento -> recaudo.
//!
//! Chain heads consume rubro appropriation; every later stage consumes the
//! remaining balance of its parent document.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Codigo, EngineError, Money, rubros::TipoRubro};

/// Stage of an execution document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoDocumento {
    Cdp,
    Rp,
    Obligacion,
    Pago,
    Reconocimiento,
    Recaudo,
}

impl TipoDocumento {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cdp => "cdp",
            Self::Rp => "rp",
            Self::Obligacion => "obligacion",
            Self::Pago => "pago",
            Self::Reconocimiento => "reconocimiento",
            Self::Recaudo => "recaudo",
        }
    }

    /// Stage this one is cut from, `None` for chain heads.
    pub fn padre(self) -> Option<TipoDocumento> {
        match self {
            Self::Cdp | Self::Reconocimiento => None,
            Self::Rp => Some(Self::Cdp),
            Self::Obligacion => Some(Self::Rp),
            Self::Pago => Some(Self::Obligacion),
            Self::Recaudo => Some(Self::Reconocimiento),
        }
    }

    /// Next stage down the chain, `None` for chain tails.
    pub fn hijo(self) -> Option<TipoDocumento> {
        match self {
            Self::Cdp => Some(Self::Rp),
            Self::Rp => Some(Self::Obligacion),
            Self::Obligacion => Some(Self::Pago),
            Self::Reconocimiento => Some(Self::Recaudo),
            Self::Pago | Self::Recaudo => None,
        }
    }

    /// Budget side the document affects.
    pub fn lado(self) -> TipoRubro {
        match self {
            Self::Cdp | Self::Rp | Self::Obligacion | Self::Pago => TipoRubro::Gasto,
            Self::Reconocimiento | Self::Recaudo => TipoRubro::Ingreso,
        }
    }

    /// Chain heads consume rubro appropriation directly.
    pub fn es_inicial(self) -> bool {
        self.padre().is_none()
    }
}

impl TryFrom<&str> for TipoDocumento {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cdp" => Ok(Self::Cdp),
            "rp" => Ok(Self::Rp),
            "obligacion" => Ok(Self::Obligacion),
            "pago" => Ok(Self::Pago),
            "reconocimiento" => Ok(Self::Reconocimiento),
            "recaudo" => Ok(Self::Recaudo),
            other => Err(EngineError::InvalidState(format!(
                "invalid document tipo: {other}"
            ))),
        }
    }
}

/// Lifecycle state shared by documents and budget modifications.
///
/// Rows are never deleted; voiding flips the state and excludes the row
/// from every balance and report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Estado {
    Activo,
    Anulado,
}

impl Estado {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "ACTIVO",
            Self::Anulado => "ANULADO",
        }
    }
}

impl TryFrom<&str> for Estado {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ACTIVO" => Ok(Self::Activo),
            "ANULADO" => Ok(Self::Anulado),
            other => Err(EngineError::InvalidState(format!(
                "invalid estado: {other}"
            ))),
        }
    }
}

/// An execution document.
///
/// Numbering restarts at 1 per tenant and tipo, so "CDP 5" and "RP 5" are
/// unrelated documents. `codigo_rubro` is carried on every stage even though
/// only chain heads choose it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Documento {
    pub tenant_id: String,
    pub tipo: TipoDocumento,
    pub numero: i64,
    pub fecha: NaiveDate,
    pub valor: Money,
    pub estado: Estado,
    pub codigo_rubro: Codigo,
    pub padre_numero: Option<i64>,
    pub objeto: String,
    pub tercero: Option<String>,
    pub medio_pago: Option<String>,
    pub fecha_anulacion: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Remaining balance of a document against its child stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SaldoDocumento {
    pub valor: Money,
    pub consumido: Money,
    pub saldo: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documentos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tipo: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub numero: i64,
    pub fecha: Date,
    pub valor: i64,
    pub estado: String,
    pub codigo_rubro: String,
    pub padre_numero: Option<i64>,
    pub objeto: String,
    pub tercero: Option<String>,
    pub medio_pago: Option<String>,
    pub fecha_anulacion: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tenants,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Documento> for ActiveModel {
    fn from(documento: &Documento) -> Self {
        Self {
            tenant_id: ActiveValue::Set(documento.tenant_id.clone()),
            tipo: ActiveValue::Set(documento.tipo.as_str().to_string()),
            numero: ActiveValue::Set(documento.numero),
            fecha: ActiveValue::Set(documento.fecha),
            valor: ActiveValue::Set(documento.valor.centavos()),
            estado: ActiveValue::Set(documento.estado.as_str().to_string()),
            codigo_rubro: ActiveValue::Set(documento.codigo_rubro.as_str().to_string()),
            padre_numero: ActiveValue::Set(documento.padre_numero),
            objeto: ActiveValue::Set(documento.objeto.clone()),
            tercero: ActiveValue::Set(documento.tercero.clone()),
            medio_pago: ActiveValue::Set(documento.medio_pago.clone()),
            fecha_anulacion: ActiveValue::Set(documento.fecha_anulacion),
            created_at: ActiveValue::Set(documento.created_at),
        }
    }
}

impl TryFrom<Model> for Documento {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tipo = TipoDocumento::try_from(model.tipo.as_str()).map_err(|_| {
            EngineError::Corruption(format!("document row with unknown tipo \"{}\"", model.tipo))
        })?;
        let estado = Estado::try_from(model.estado.as_str()).map_err(|_| {
            EngineError::Corruption(format!(
                "{} {} with unknown estado \"{}\"",
                model.tipo, model.numero, model.estado
            ))
        })?;
        let codigo_rubro = Codigo::nuevo(&model.codigo_rubro).map_err(|_| {
            EngineError::Corruption(format!(
                "{} {} with malformed rubro code \"{}\"",
                model.tipo, model.numero, model.codigo_rubro
            ))
        })?;
        Ok(Self {
            tenant_id: model.tenant_id,
            tipo,
            numero: model.numero,
            fecha: model.fecha,
            valor: Money::new(model.valor),
            estado,
            codigo_rubro,
            padre_numero: model.padre_numero,
            objeto: model.objeto,
            tercero: model.tercero,
            medio_pago: model.medio_pago,
            fecha_anulacion: model.fecha_anulacion,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_topology_is_consistent() {
        for tipo in [
            TipoDocumento::Cdp,
            TipoDocumento::Rp,
            TipoDocumento::Obligacion,
            TipoDocumento::Pago,
            TipoDocumento::Reconocimiento,
            TipoDocumento::Recaudo,
        ] {
            if let Some(padre) = tipo.padre() {
                assert_eq!(padre.hijo(), Some(tipo));
                assert_eq!(padre.lado(), tipo.lado());
            }
            if let Some(hijo) = tipo.hijo() {
                assert_eq!(hijo.padre(), Some(tipo));
            }
        }
    }

    #[test]
    fn chain_heads_are_initial() {
        assert!(TipoDocumento::Cdp.es_inicial());
        assert!(TipoDocumento::Reconocimiento.es_inicial());
        assert!(!TipoDocumento::Rp.es_inicial());
        assert!(!TipoDocumento::Recaudo.es_inicial());
    }

    #[test]
    fn tipo_round_trips_through_str() {
        for tipo in [
            TipoDocumento::Cdp,
            TipoDocumento::Rp,
            TipoDocumento::Obligacion,
            TipoDocumento::Pago,
            TipoDocumento::Reconocimiento,
            TipoDocumento::Recaudo,
        ] {
            assert_eq!(TipoDocumento::try_from(tipo.as_str()).unwrap(), tipo);
        }
        assert!(TipoDocumento::try_from("factura").is_err());
    }
}
