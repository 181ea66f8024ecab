//! Execution reports: classifier-wide rows at a cutoff month.

use std::collections::BTreeMap;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Codigo, Documento, EngineError, FilaGasto, FilaIngreso, Periodo, ResultEngine, Rubro,
    TipoRubro, Triplete,
    arbol::Arbol,
    documentos::{self, Estado, TipoDocumento},
    ops::{Engine, with_tx},
    rubros, util,
};

fn mes_de_corte(periodo: &Periodo, mes: Option<i32>) -> ResultEngine<i32> {
    let corte = mes.unwrap_or(periodo.mes_actual);
    if !(1..=12).contains(&corte) {
        return Err(EngineError::InvalidAmount(format!("invalid month {corte}")));
    }
    Ok(corte)
}

fn arbol_del_lado(lado: &[Rubro]) -> ResultEngine<Arbol> {
    let catalogo: Vec<(Codigo, bool)> = lado
        .iter()
        .map(|rubro| (rubro.codigo.clone(), rubro.es_hoja))
        .collect();
    Arbol::construir(&catalogo)
}

impl Engine {
    /// Expense execution at a cutoff month: one row per gasto rubro in
    /// classifier order, each stage split into before-the-month, in-the-month
    /// and the running total. `mes` defaults to the open month.
    pub async fn reporte_ejecucion_gastos(
        &self,
        tenant_id: &str,
        mes: Option<i32>,
    ) -> ResultEngine<Vec<FilaGasto>> {
        with_tx!(self, |tx| self.reporte_gastos_tx(&tx, tenant_id, mes).await)
    }

    async fn reporte_gastos_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        mes: Option<i32>,
    ) -> ResultEngine<Vec<FilaGasto>> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        let corte = mes_de_corte(&periodo, mes)?;

        let lado = self.rubros_del_lado(tx, tenant_id, TipoRubro::Gasto).await?;
        let arbol = arbol_del_lado(&lado)?;

        let mut filas: BTreeMap<Codigo, FilaGasto> = lado
            .into_iter()
            .map(|rubro| {
                (
                    rubro.codigo.clone(),
                    FilaGasto {
                        codigo: rubro.codigo,
                        cuenta: rubro.cuenta,
                        es_hoja: rubro.es_hoja,
                        apropiacion: rubro.apropiacion,
                        cdp: Triplete::default(),
                        rp: Triplete::default(),
                        obligaciones: Triplete::default(),
                        pagos: Triplete::default(),
                    },
                )
            })
            .collect();

        let etapas = [
            TipoDocumento::Cdp,
            TipoDocumento::Rp,
            TipoDocumento::Obligacion,
            TipoDocumento::Pago,
        ];
        for documento in self
            .documentos_hasta(tx, tenant_id, &etapas, periodo.vigencia, corte)
            .await?
        {
            let Some(fila) = filas.get_mut(&documento.codigo_rubro) else {
                return Err(EngineError::Corruption(format!(
                    "documents posted to unknown rubro {}",
                    documento.codigo_rubro
                )));
            };
            let en_mes = util::mes_de(documento.fecha) == corte;
            match documento.tipo {
                TipoDocumento::Cdp => fila.cdp.sumar(documento.valor, en_mes),
                TipoDocumento::Rp => fila.rp.sumar(documento.valor, en_mes),
                TipoDocumento::Obligacion => fila.obligaciones.sumar(documento.valor, en_mes),
                TipoDocumento::Pago => fila.pagos.sumar(documento.valor, en_mes),
                TipoDocumento::Reconocimiento | TipoDocumento::Recaudo => {}
            }
        }

        // Documents only post to leaves; aggregator rows show the sum of
        // their already-folded children.
        for codigo in arbol.post_orden() {
            let hijos = arbol.hijos(codigo);
            if hijos.is_empty() {
                continue;
            }
            let mut cdp = Triplete::default();
            let mut rp = Triplete::default();
            let mut obligaciones = Triplete::default();
            let mut pagos = Triplete::default();
            for hijo in hijos {
                if let Some(fila) = filas.get(hijo) {
                    cdp = cdp + fila.cdp;
                    rp = rp + fila.rp;
                    obligaciones = obligaciones + fila.obligaciones;
                    pagos = pagos + fila.pagos;
                }
            }
            if let Some(fila) = filas.get_mut(codigo) {
                fila.cdp = cdp;
                fila.rp = rp;
                fila.obligaciones = obligaciones;
                fila.pagos = pagos;
            }
        }

        Ok(filas.into_values().collect())
    }

    /// Revenue execution at a cutoff month, shaped like the expense report
    /// with the reconocimiento and recaudo stages.
    pub async fn reporte_ejecucion_ingresos(
        &self,
        tenant_id: &str,
        mes: Option<i32>,
    ) -> ResultEngine<Vec<FilaIngreso>> {
        with_tx!(self, |tx| {
            self.reporte_ingresos_tx(&tx, tenant_id, mes).await
        })
    }

    async fn reporte_ingresos_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        mes: Option<i32>,
    ) -> ResultEngine<Vec<FilaIngreso>> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        let corte = mes_de_corte(&periodo, mes)?;

        let lado = self
            .rubros_del_lado(tx, tenant_id, TipoRubro::Ingreso)
            .await?;
        let arbol = arbol_del_lado(&lado)?;

        let mut filas: BTreeMap<Codigo, FilaIngreso> = lado
            .into_iter()
            .map(|rubro| {
                (
                    rubro.codigo.clone(),
                    FilaIngreso {
                        codigo: rubro.codigo,
                        cuenta: rubro.cuenta,
                        es_hoja: rubro.es_hoja,
                        apropiacion: rubro.apropiacion,
                        reconocimientos: Triplete::default(),
                        recaudos: Triplete::default(),
                    },
                )
            })
            .collect();

        let etapas = [TipoDocumento::Reconocimiento, TipoDocumento::Recaudo];
        for documento in self
            .documentos_hasta(tx, tenant_id, &etapas, periodo.vigencia, corte)
            .await?
        {
            let Some(fila) = filas.get_mut(&documento.codigo_rubro) else {
                return Err(EngineError::Corruption(format!(
                    "documents posted to unknown rubro {}",
                    documento.codigo_rubro
                )));
            };
            let en_mes = util::mes_de(documento.fecha) == corte;
            match documento.tipo {
                TipoDocumento::Reconocimiento => {
                    fila.reconocimientos.sumar(documento.valor, en_mes);
                }
                TipoDocumento::Recaudo => fila.recaudos.sumar(documento.valor, en_mes),
                TipoDocumento::Cdp
                | TipoDocumento::Rp
                | TipoDocumento::Obligacion
                | TipoDocumento::Pago => {}
            }
        }

        for codigo in arbol.post_orden() {
            let hijos = arbol.hijos(codigo);
            if hijos.is_empty() {
                continue;
            }
            let mut reconocimientos = Triplete::default();
            let mut recaudos = Triplete::default();
            for hijo in hijos {
                if let Some(fila) = filas.get(hijo) {
                    reconocimientos = reconocimientos + fila.reconocimientos;
                    recaudos = recaudos + fila.recaudos;
                }
            }
            if let Some(fila) = filas.get_mut(codigo) {
                fila.reconocimientos = reconocimientos;
                fila.recaudos = recaudos;
            }
        }

        Ok(filas.into_values().collect())
    }

    async fn rubros_del_lado(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoRubro,
    ) -> ResultEngine<Vec<Rubro>> {
        let filas = rubros::Entity::find()
            .filter(rubros::Column::TenantId.eq(tenant_id))
            .filter(rubros::Column::Tipo.eq(tipo.as_str()))
            .all(tx)
            .await?;
        filas.into_iter().map(Rubro::try_from).collect()
    }

    /// ACTIVO documents of the given stages dated from January up to the end
    /// of the cutoff month.
    async fn documentos_hasta(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        etapas: &[TipoDocumento],
        vigencia: i32,
        corte: i32,
    ) -> ResultEngine<Vec<Documento>> {
        let desde = util::primer_dia(vigencia, 1)?;
        let hasta = util::primer_dia_siguiente(vigencia, corte)?;
        let filas = documentos::Entity::find()
            .filter(documentos::Column::TenantId.eq(tenant_id))
            .filter(documentos::Column::Tipo.is_in(etapas.iter().map(|etapa| etapa.as_str())))
            .filter(documentos::Column::Estado.eq(Estado::Activo.as_str()))
            .filter(documentos::Column::Fecha.gte(desde))
            .filter(documentos::Column::Fecha.lt(hasta))
            .all(tx)
            .await?;
        filas.into_iter().map(Documento::try_from).collect()
    }
}
