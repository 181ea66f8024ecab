//! Rubros: the hierarchical budget classifier.
//!
//! A rubro is one dotted code of the classifier with its appropriation
//! columns. Leaf rubros receive documents; aggregator rubros mirror the sum
//! of their leaf descendants and are refreshed by the tree synchronization.

use std::ops::Add;

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Codigo, EngineError, Money, documentos::TipoDocumento};

/// Side of the budget a rubro belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoRubro {
    Gasto,
    Ingreso,
}

impl TipoRubro {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gasto => "gasto",
            Self::Ingreso => "ingreso",
        }
    }

    /// Document stage that consumes appropriation on this side.
    pub fn etapa_inicial(self) -> TipoDocumento {
        match self {
            Self::Gasto => TipoDocumento::Cdp,
            Self::Ingreso => TipoDocumento::Reconocimiento,
        }
    }
}

impl TryFrom<&str> for TipoRubro {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "gasto" => Ok(Self::Gasto),
            "ingreso" => Ok(Self::Ingreso),
            other => Err(EngineError::InvalidState(format!(
                "invalid rubro tipo: {other}"
            ))),
        }
    }
}

/// The five stored appropriation columns of a rubro.
///
/// `definitiva` is never stored; it is always derived from these fields.
/// Ingreso rubros keep `creditos`/`contracreditos` at zero, so the single
/// formula holds on both sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Apropiacion {
    pub inicial: Money,
    pub adiciones: Money,
    pub reducciones: Money,
    pub creditos: Money,
    pub contracreditos: Money,
}

impl Apropiacion {
    #[must_use]
    pub fn con_inicial(valor: Money) -> Self {
        Self {
            inicial: valor,
            ..Self::default()
        }
    }

    /// Current appropriation:
    /// `inicial + adiciones - reducciones + creditos - contracreditos`.
    #[must_use]
    pub fn definitiva(&self) -> Money {
        self.inicial + self.adiciones - self.reducciones + self.creditos - self.contracreditos
    }
}

impl Add for Apropiacion {
    type Output = Apropiacion;

    fn add(self, rhs: Apropiacion) -> Self::Output {
        Apropiacion {
            inicial: self.inicial + rhs.inicial,
            adiciones: self.adiciones + rhs.adiciones,
            reducciones: self.reducciones + rhs.reducciones,
            creditos: self.creditos + rhs.creditos,
            contracreditos: self.contracreditos + rhs.contracreditos,
        }
    }
}

/// One code of the classifier with its appropriation columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rubro {
    pub tenant_id: String,
    pub codigo: Codigo,
    pub cuenta: String,
    pub tipo: TipoRubro,
    pub es_hoja: bool,
    pub apropiacion: Apropiacion,
}

impl Rubro {
    #[must_use]
    pub fn definitiva(&self) -> Money {
        self.apropiacion.definitiva()
    }
}

/// Availability picture of a rubro at the moment of the query.
///
/// `afectado` is the sum of active chain-head documents (CDPs for gasto,
/// reconocimientos for ingreso) posted to the rubro or its descendants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Saldo {
    pub definitiva: Money,
    pub afectado: Money,
    pub disponible: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rubros")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub codigo: String,
    pub cuenta: String,
    pub tipo: String,
    pub es_hoja: bool,
    pub inicial: i64,
    pub adiciones: i64,
    pub reducciones: i64,
    pub creditos: i64,
    pub contracreditos: i64,
}

impl Model {
    pub(crate) fn apropiacion(&self) -> Apropiacion {
        Apropiacion {
            inicial: Money::new(self.inicial),
            adiciones: Money::new(self.adiciones),
            reducciones: Money::new(self.reducciones),
            creditos: Money::new(self.creditos),
            contracreditos: Money::new(self.contracreditos),
        }
    }
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

impl From<&Rubro> for ActiveModel {
    fn from(rubro: &Rubro) -> Self {
        Self {
            tenant_id: ActiveValue::Set(rubro.tenant_id.clone()),
            codigo: ActiveValue::Set(rubro.codigo.as_str().to_string()),
            cuenta: ActiveValue::Set(rubro.cuenta.clone()),
            tipo: ActiveValue::Set(rubro.tipo.as_str().to_string()),
            es_hoja: ActiveValue::Set(rubro.es_hoja),
            inicial: ActiveValue::Set(rubro.apropiacion.inicial.centavos()),
            adiciones: ActiveValue::Set(rubro.apropiacion.adiciones.centavos()),
            reducciones: ActiveValue::Set(rubro.apropiacion.reducciones.centavos()),
            creditos: ActiveValue::Set(rubro.apropiacion.creditos.centavos()),
            contracreditos: ActiveValue::Set(rubro.apropiacion.contracreditos.centavos()),
        }
    }
}

impl TryFrom<Model> for Rubro {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let codigo = Codigo::nuevo(&model.codigo).map_err(|_| {
            EngineError::Corruption(format!("rubro row with malformed code \"{}\"", model.codigo))
        })?;
        let tipo = TipoRubro::try_from(model.tipo.as_str()).map_err(|_| {
            EngineError::Corruption(format!(
                "rubro \"{}\" with unknown tipo \"{}\"",
                model.codigo, model.tipo
            ))
        })?;
        let apropiacion = model.apropiacion();
        Ok(Self {
            tenant_id: model.tenant_id,
            codigo,
            cuenta: model.cuenta,
            tipo,
            es_hoja: model.es_hoja,
            apropiacion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitiva_folds_all_five_columns() {
        let apropiacion = Apropiacion {
            inicial: Money::new(1_000),
            adiciones: Money::new(300),
            reducciones: Money::new(100),
            creditos: Money::new(50),
            contracreditos: Money::new(20),
        };
        assert_eq!(apropiacion.definitiva(), Money::new(1_230));
    }

    #[test]
    fn add_is_fieldwise() {
        let a = Apropiacion::con_inicial(Money::new(100));
        let b = Apropiacion {
            adiciones: Money::new(40),
            ..Apropiacion::con_inicial(Money::new(10))
        };
        let suma = a + b;
        assert_eq!(suma.inicial, Money::new(110));
        assert_eq!(suma.adiciones, Money::new(40));
        assert_eq!(suma.definitiva(), Money::new(150));
    }
}
