//! Monthly consolidation and the period cursor.

use std::collections::BTreeMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, Statement, TransactionTrait, prelude::*,
};

use crate::{
    CierreMes, Codigo, ConsolidacionMes, Documento, EngineError, Periodo, ResultEngine,
    RubroConsolidado,
    documentos::{self, Estado},
    ops::{Engine, with_tx},
    periodos, util,
};

impl Engine {
    /// Snapshot the open month: per-rubro totals of ACTIVO documents dated in
    /// it, replacing whatever was consolidated for that month before.
    ///
    /// Reruns land on the same rows, so consolidating is idempotent and does
    /// not move the cursor.
    pub async fn consolidar_mes(&self, tenant_id: &str) -> ResultEngine<ConsolidacionMes> {
        with_tx!(self, |tx| self.consolidar_mes_tx(&tx, tenant_id).await)
    }

    async fn consolidar_mes_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<ConsolidacionMes> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        let desde = util::primer_dia(periodo.vigencia, periodo.mes_actual)?;
        let hasta = util::primer_dia_siguiente(periodo.vigencia, periodo.mes_actual)?;

        let filas = documentos::Entity::find()
            .filter(documentos::Column::TenantId.eq(tenant_id))
            .filter(documentos::Column::Estado.eq(Estado::Activo.as_str()))
            .filter(documentos::Column::Fecha.gte(desde))
            .filter(documentos::Column::Fecha.lt(hasta))
            .all(tx)
            .await?;

        let mut totales: BTreeMap<Codigo, RubroConsolidado> = BTreeMap::new();
        for fila in filas {
            let documento = Documento::try_from(fila)?;
            let codigo = documento.codigo_rubro.clone();
            totales
                .entry(codigo.clone())
                .or_insert_with(|| RubroConsolidado::vacio(codigo))
                .registrar(documento.tipo, documento.valor);
        }

        let borrado = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "DELETE FROM consolidados WHERE tenant_id = ? AND vigencia = ? AND mes = ?;",
            vec![
                tenant_id.into(),
                periodo.vigencia.into(),
                periodo.mes_actual.into(),
            ],
        );
        tx.execute(borrado).await?;

        let rubros: Vec<RubroConsolidado> = totales.into_values().collect();
        for rubro in &rubros {
            rubro
                .modelo(tenant_id, periodo.vigencia, periodo.mes_actual)
                .insert(tx)
                .await?;
        }

        Ok(ConsolidacionMes {
            vigencia: periodo.vigencia,
            mes: periodo.mes_actual,
            rubros,
        })
    }

    /// Close the open month and advance the cursor. Irreversible.
    pub async fn cierre_mes(&self, tenant_id: &str) -> ResultEngine<CierreMes> {
        with_tx!(self, |tx| self.cierre_mes_tx(&tx, tenant_id).await)
    }

    async fn cierre_mes_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<CierreMes> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        if periodo.mes_actual >= 12 {
            return Err(EngineError::AlreadyAtYearEnd {
                vigencia: periodo.vigencia,
            });
        }

        let cierre = CierreMes {
            vigencia: periodo.vigencia,
            mes_cerrado: periodo.mes_actual,
            mes_actual: periodo.mes_actual + 1,
        };
        periodos::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            mes_actual: ActiveValue::Set(cierre.mes_actual),
            ..Default::default()
        }
        .update(tx)
        .await?;
        Ok(cierre)
    }

    /// Roll the cursor into the next fiscal year. December must be the open
    /// month; the new vigencia starts at month 1.
    pub async fn abrir_vigencia(&self, tenant_id: &str) -> ResultEngine<Periodo> {
        with_tx!(self, |tx| self.abrir_vigencia_tx(&tx, tenant_id).await)
    }

    async fn abrir_vigencia_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<Periodo> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        if periodo.mes_actual != 12 {
            return Err(EngineError::InvalidState(format!(
                "vigencia {} is at month {}; the year rolls over only from month 12",
                periodo.vigencia, periodo.mes_actual
            )));
        }

        let nuevo = Periodo {
            tenant_id: tenant_id.to_string(),
            vigencia: periodo.vigencia + 1,
            mes_actual: 1,
        };
        periodos::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            vigencia: ActiveValue::Set(nuevo.vigencia),
            mes_actual: ActiveValue::Set(nuevo.mes_actual),
            ..Default::default()
        }
        .update(tx)
        .await?;
        Ok(nuevo)
    }

    /// Read the fiscal cursor.
    pub async fn periodo(&self, tenant_id: &str) -> ResultEngine<Periodo> {
        let model = periodos::Entity::find_by_id(tenant_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tenant {tenant_id}")))?;
        Ok(Periodo::from(model))
    }
}
