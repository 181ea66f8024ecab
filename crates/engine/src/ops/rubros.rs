//! Catalog maintenance: rubro rows and the on-demand tree rollup.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, Statement, TransactionTrait, prelude::*,
};

use crate::{
    Apropiacion, Codigo, EngineError, Money, NuevoRubro, ResultEngine, Rubro, RubroCmd, Saldo,
    TipoRubro,
    arbol::Arbol,
    documentos::{Estado, TipoDocumento},
    ops::{Engine, with_tx},
    rubros, util,
};

fn validar_rubro(tenant_id: &str, nuevo: &NuevoRubro) -> ResultEngine<Rubro> {
    let codigo = Codigo::nuevo(&nuevo.codigo)?;
    let cuenta = util::texto_requerido(&nuevo.cuenta, "cuenta")?;
    if nuevo.inicial.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "apropiación inicial of rubro {codigo} must be >= 0, got {}",
            nuevo.inicial
        )));
    }
    Ok(Rubro {
        tenant_id: tenant_id.to_string(),
        codigo,
        cuenta,
        tipo: nuevo.tipo,
        es_hoja: nuevo.es_hoja,
        apropiacion: Apropiacion::con_inicial(nuevo.inicial),
    })
}

impl Engine {
    /// Add one rubro to a tenant's catalog.
    ///
    /// Parent linkage is not checked here: bulk loads insert codes in file
    /// order, children often before their parents. The next
    /// [`Engine::sincronizar_arbol`] call reports any code left without a
    /// parent.
    pub async fn crear_rubro(&self, cmd: RubroCmd) -> ResultEngine<Rubro> {
        let rubro = validar_rubro(
            &cmd.tenant_id,
            &NuevoRubro {
                codigo: cmd.codigo,
                cuenta: cmd.cuenta,
                tipo: cmd.tipo,
                es_hoja: cmd.es_hoja,
                inicial: cmd.inicial,
            },
        )?;
        with_tx!(self, |tx| self.crear_rubro_tx(&tx, &rubro).await)
    }

    async fn crear_rubro_tx(&self, tx: &DatabaseTransaction, rubro: &Rubro) -> ResultEngine<Rubro> {
        self.require_tenant(tx, &rubro.tenant_id).await?;
        self.insertar_rubro(tx, rubro).await?;
        Ok(rubro.clone())
    }

    /// Bulk-load a catalog in one transaction. Duplicate codes, inside the
    /// batch or against stored rows, abort the whole load.
    pub async fn importar_catalogo(
        &self,
        tenant_id: &str,
        nuevos: &[NuevoRubro],
    ) -> ResultEngine<usize> {
        let mut rubros = Vec::with_capacity(nuevos.len());
        let mut vistos = HashSet::new();
        for nuevo in nuevos {
            let rubro = validar_rubro(tenant_id, nuevo)?;
            if !vistos.insert(rubro.codigo.clone()) {
                return Err(EngineError::ExistingKey(format!("rubro {}", rubro.codigo)));
            }
            rubros.push(rubro);
        }
        with_tx!(self, |tx| self.importar_catalogo_tx(&tx, tenant_id, &rubros).await)
    }

    async fn importar_catalogo_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        rubros: &[Rubro],
    ) -> ResultEngine<usize> {
        self.require_tenant(tx, tenant_id).await?;
        for rubro in rubros {
            self.insertar_rubro(tx, rubro).await?;
        }
        Ok(rubros.len())
    }

    async fn insertar_rubro(&self, tx: &DatabaseTransaction, rubro: &Rubro) -> ResultEngine<()> {
        let clave = (rubro.tenant_id.clone(), rubro.codigo.as_str().to_string());
        if rubros::Entity::find_by_id(clave).one(tx).await?.is_some() {
            return Err(EngineError::ExistingKey(format!("rubro {}", rubro.codigo)));
        }
        rubros::ActiveModel::from(rubro).insert(tx).await?;
        Ok(())
    }

    /// Recompute every aggregator's appropriation columns as the sum of its
    /// children, deepest codes first, writing only the rows whose values
    /// changed. Returns how many rows were rewritten. Idempotent.
    pub async fn sincronizar_arbol(&self, tenant_id: &str) -> ResultEngine<usize> {
        with_tx!(self, |tx| self.sincronizar_arbol_tx(&tx, tenant_id).await)
    }

    async fn sincronizar_arbol_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<usize> {
        self.require_tenant(tx, tenant_id).await?;
        let mut reescritos = 0;
        for tipo in [TipoRubro::Gasto, TipoRubro::Ingreso] {
            reescritos += self.sincronizar_lado(tx, tenant_id, tipo).await?;
        }
        Ok(reescritos)
    }

    async fn sincronizar_lado(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoRubro,
    ) -> ResultEngine<usize> {
        let filas = rubros::Entity::find()
            .filter(rubros::Column::TenantId.eq(tenant_id))
            .filter(rubros::Column::Tipo.eq(tipo.as_str()))
            .all(tx)
            .await?;

        let mut actuales: HashMap<Codigo, (bool, Apropiacion)> = HashMap::new();
        for fila in filas {
            let rubro = Rubro::try_from(fila)?;
            actuales.insert(rubro.codigo, (rubro.es_hoja, rubro.apropiacion));
        }

        let catalogo: Vec<(Codigo, bool)> = actuales
            .iter()
            .map(|(codigo, (es_hoja, _))| (codigo.clone(), *es_hoja))
            .collect();
        let arbol = Arbol::construir(&catalogo)?;

        // Children come out of the post-order before their parents, so each
        // aggregator folds already-final values.
        let mut finales: HashMap<Codigo, Apropiacion> = HashMap::new();
        let mut cambios: Vec<(Codigo, Apropiacion)> = Vec::new();
        for codigo in arbol.post_orden() {
            let Some((es_hoja, actual)) = actuales.get(codigo) else {
                continue;
            };
            let definitivo = if *es_hoja {
                *actual
            } else {
                arbol
                    .hijos(codigo)
                    .iter()
                    .fold(Apropiacion::default(), |suma, hijo| {
                        suma + finales.get(hijo).copied().unwrap_or_default()
                    })
            };
            if !es_hoja && definitivo != *actual {
                cambios.push((codigo.clone(), definitivo));
            }
            finales.insert(codigo.clone(), definitivo);
        }

        for (codigo, apropiacion) in &cambios {
            self.guardar_apropiacion(tx, tenant_id, codigo, *apropiacion)
                .await?;
        }

        Ok(cambios.len())
    }

    /// Rewrite the five stored appropriation columns of one rubro row.
    pub(in crate::ops) async fn guardar_apropiacion(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        codigo: &Codigo,
        apropiacion: Apropiacion,
    ) -> ResultEngine<()> {
        rubros::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            codigo: ActiveValue::Set(codigo.as_str().to_string()),
            inicial: ActiveValue::Set(apropiacion.inicial.centavos()),
            adiciones: ActiveValue::Set(apropiacion.adiciones.centavos()),
            reducciones: ActiveValue::Set(apropiacion.reducciones.centavos()),
            creditos: ActiveValue::Set(apropiacion.creditos.centavos()),
            contracreditos: ActiveValue::Set(apropiacion.contracreditos.centavos()),
            ..Default::default()
        }
        .update(tx)
        .await?;
        Ok(())
    }

    /// Availability picture of a rubro: stored appropriation minus the
    /// ACTIVO chain heads posted to it or its descendants.
    pub async fn saldo_rubro(&self, tenant_id: &str, codigo: &str) -> ResultEngine<Saldo> {
        let codigo = Codigo::nuevo(codigo)?;
        with_tx!(self, |tx| self.saldo_rubro_tx(&tx, tenant_id, &codigo).await)
    }

    async fn saldo_rubro_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        codigo: &Codigo,
    ) -> ResultEngine<Saldo> {
        let rubro = self.require_rubro(tx, tenant_id, codigo).await?;
        let definitiva = rubro.definitiva();
        let afectado = self
            .suma_afectacion(tx, tenant_id, rubro.tipo.etapa_inicial(), codigo)
            .await?;
        Ok(Saldo {
            definitiva,
            afectado,
            disponible: definitiva - afectado,
        })
    }

    /// All rubros of one side of a tenant's budget, in classifier order.
    pub async fn listar_rubros(
        &self,
        tenant_id: &str,
        tipo: TipoRubro,
    ) -> ResultEngine<Vec<Rubro>> {
        self.tenant(tenant_id).await?;
        let filas = rubros::Entity::find()
            .filter(rubros::Column::TenantId.eq(tenant_id))
            .filter(rubros::Column::Tipo.eq(tipo.as_str()))
            .all(&self.database)
            .await?;
        let mut rubros = filas
            .into_iter()
            .map(Rubro::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        rubros.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        Ok(rubros)
    }

    pub(in crate::ops) async fn require_rubro(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        codigo: &Codigo,
    ) -> ResultEngine<Rubro> {
        let clave = (tenant_id.to_string(), codigo.as_str().to_string());
        let model = rubros::Entity::find_by_id(clave)
            .one(tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("rubro {codigo}")))?;
        Rubro::try_from(model)
    }

    /// Σ valor of ACTIVO documents of one stage over the rubro itself and
    /// every descendant code.
    pub(in crate::ops) async fn suma_afectacion(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoDocumento,
        codigo: &Codigo,
    ) -> ResultEngine<Money> {
        let stmt = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "SELECT COALESCE(SUM(valor), 0) AS suma FROM documentos \
             WHERE tenant_id = ? AND tipo = ? AND estado = ? \
             AND (codigo_rubro = ? OR codigo_rubro LIKE ?);",
            vec![
                tenant_id.into(),
                tipo.as_str().into(),
                Estado::Activo.as_str().into(),
                codigo.as_str().into(),
                format!("{codigo}.%").into(),
            ],
        );
        let row = tx.query_one(stmt).await?;
        Ok(Money::new(
            row.and_then(|r| r.try_get("", "suma").ok()).unwrap_or(0),
        ))
    }
}
