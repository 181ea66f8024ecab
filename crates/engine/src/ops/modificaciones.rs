//! Budget modifications: paired additions and reductions, credit transfers
//! between gasto rubros, voiding, and the equilibrium check.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, Statement, TransactionTrait,
    prelude::*,
};

use crate::{
    AdicionCmd, Apropiacion, Codigo, CreditoCmd, EngineError, Equilibrio, Modificacion, Money,
    ReduccionCmd, ResultEngine, Rubro, TipoModificacion, TipoRubro,
    documentos::Estado,
    modificaciones,
    ops::{Engine, with_tx},
    util,
};

impl Engine {
    /// Add the same valor to one gasto leaf and one ingreso leaf.
    pub async fn aplicar_adicion(&self, cmd: AdicionCmd) -> ResultEngine<Modificacion> {
        with_tx!(self, |tx| self.aplicar_adicion_tx(&tx, &cmd).await)
    }

    async fn aplicar_adicion_tx(
        &self,
        tx: &DatabaseTransaction,
        cmd: &AdicionCmd,
    ) -> ResultEngine<Modificacion> {
        util::valor_positivo(cmd.valor, TipoModificacion::Adicion.as_str())?;
        let acto = util::texto_requerido(&cmd.acto, "acto")?;
        let periodo = self.require_periodo(tx, &cmd.tenant_id).await?;
        util::fecha_en_vigencia(cmd.fecha, periodo.vigencia)?;

        let gasto = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_gasto, TipoRubro::Gasto)
            .await?;
        let ingreso = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_ingreso, TipoRubro::Ingreso)
            .await?;

        let mut apropiacion_gasto = gasto.apropiacion;
        apropiacion_gasto.adiciones += cmd.valor;
        let mut apropiacion_ingreso = ingreso.apropiacion;
        apropiacion_ingreso.adiciones += cmd.valor;

        self.guardar_apropiacion(tx, &cmd.tenant_id, &gasto.codigo, apropiacion_gasto)
            .await?;
        self.guardar_apropiacion(tx, &cmd.tenant_id, &ingreso.codigo, apropiacion_ingreso)
            .await?;

        self.insertar_modificacion(
            tx,
            Modificacion {
                tenant_id: cmd.tenant_id.clone(),
                numero: 0,
                tipo: TipoModificacion::Adicion,
                acto,
                fecha: cmd.fecha,
                valor: cmd.valor,
                rubro_gasto: gasto.codigo,
                rubro_contrapartida: ingreso.codigo,
                estado: Estado::Activo,
                fecha_anulacion: None,
                created_at: Utc::now(),
            },
        )
        .await
    }

    /// Remove the same valor from one gasto leaf and one ingreso leaf.
    pub async fn aplicar_reduccion(&self, cmd: ReduccionCmd) -> ResultEngine<Modificacion> {
        with_tx!(self, |tx| self.aplicar_reduccion_tx(&tx, &cmd).await)
    }

    async fn aplicar_reduccion_tx(
        &self,
        tx: &DatabaseTransaction,
        cmd: &ReduccionCmd,
    ) -> ResultEngine<Modificacion> {
        util::valor_positivo(cmd.valor, TipoModificacion::Reduccion.as_str())?;
        let acto = util::texto_requerido(&cmd.acto, "acto")?;
        let periodo = self.require_periodo(tx, &cmd.tenant_id).await?;
        util::fecha_en_vigencia(cmd.fecha, periodo.vigencia)?;

        let gasto = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_gasto, TipoRubro::Gasto)
            .await?;
        let ingreso = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_ingreso, TipoRubro::Ingreso)
            .await?;

        let mut apropiacion_gasto = gasto.apropiacion;
        apropiacion_gasto.reducciones += cmd.valor;
        self.verificar_consumo(tx, &gasto, apropiacion_gasto).await?;
        let mut apropiacion_ingreso = ingreso.apropiacion;
        apropiacion_ingreso.reducciones += cmd.valor;
        self.verificar_consumo(tx, &ingreso, apropiacion_ingreso)
            .await?;

        self.guardar_apropiacion(tx, &cmd.tenant_id, &gasto.codigo, apropiacion_gasto)
            .await?;
        self.guardar_apropiacion(tx, &cmd.tenant_id, &ingreso.codigo, apropiacion_ingreso)
            .await?;

        self.insertar_modificacion(
            tx,
            Modificacion {
                tenant_id: cmd.tenant_id.clone(),
                numero: 0,
                tipo: TipoModificacion::Reduccion,
                acto,
                fecha: cmd.fecha,
                valor: cmd.valor,
                rubro_gasto: gasto.codigo,
                rubro_contrapartida: ingreso.codigo,
                estado: Estado::Activo,
                fecha_anulacion: None,
                created_at: Utc::now(),
            },
        )
        .await
    }

    /// Move appropriation between two gasto leaves without touching the
    /// totals of either side.
    pub async fn aplicar_credito_contracredito(
        &self,
        cmd: CreditoCmd,
    ) -> ResultEngine<Modificacion> {
        with_tx!(self, |tx| self.aplicar_credito_tx(&tx, &cmd).await)
    }

    async fn aplicar_credito_tx(
        &self,
        tx: &DatabaseTransaction,
        cmd: &CreditoCmd,
    ) -> ResultEngine<Modificacion> {
        util::valor_positivo(cmd.valor, TipoModificacion::CreditoContracredito.as_str())?;
        let acto = util::texto_requerido(&cmd.acto, "acto")?;
        let periodo = self.require_periodo(tx, &cmd.tenant_id).await?;
        util::fecha_en_vigencia(cmd.fecha, periodo.vigencia)?;

        let credito = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_credito, TipoRubro::Gasto)
            .await?;
        let contracredito = self
            .require_lado(tx, &cmd.tenant_id, &cmd.rubro_contracredito, TipoRubro::Gasto)
            .await?;
        if credito.codigo == contracredito.codigo {
            return Err(EngineError::InvalidState(format!(
                "crédito and contracrédito both target rubro {}; the two must differ",
                credito.codigo
            )));
        }

        let mut apropiacion_credito = credito.apropiacion;
        apropiacion_credito.creditos += cmd.valor;
        let mut apropiacion_contracredito = contracredito.apropiacion;
        apropiacion_contracredito.contracreditos += cmd.valor;
        self.verificar_consumo(tx, &contracredito, apropiacion_contracredito)
            .await?;

        self.guardar_apropiacion(tx, &cmd.tenant_id, &credito.codigo, apropiacion_credito)
            .await?;
        self.guardar_apropiacion(
            tx,
            &cmd.tenant_id,
            &contracredito.codigo,
            apropiacion_contracredito,
        )
        .await?;

        self.insertar_modificacion(
            tx,
            Modificacion {
                tenant_id: cmd.tenant_id.clone(),
                numero: 0,
                tipo: TipoModificacion::CreditoContracredito,
                acto,
                fecha: cmd.fecha,
                valor: cmd.valor,
                rubro_gasto: credito.codigo,
                rubro_contrapartida: contracredito.codigo,
                estado: Estado::Activo,
                fecha_anulacion: None,
                created_at: Utc::now(),
            },
        )
        .await
    }

    /// Void a modification and put its appropriation movements back.
    pub async fn anular_modificacion(
        &self,
        tenant_id: &str,
        numero: i64,
        fecha: NaiveDate,
    ) -> ResultEngine<Modificacion> {
        with_tx!(self, |tx| {
            self.anular_modificacion_tx(&tx, tenant_id, numero, fecha)
                .await
        })
    }

    async fn anular_modificacion_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        numero: i64,
        fecha: NaiveDate,
    ) -> ResultEngine<Modificacion> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        util::fecha_en_vigencia(fecha, periodo.vigencia)?;

        let mut modificacion = self.require_modificacion(tx, tenant_id, numero).await?;
        if modificacion.estado == Estado::Anulado {
            return Err(EngineError::InvalidState(format!(
                "modificación {numero} is already ANULADO"
            )));
        }

        let gasto = self
            .rubro_registrado(tx, tenant_id, numero, &modificacion.rubro_gasto)
            .await?;
        let contrapartida = self
            .rubro_registrado(tx, tenant_id, numero, &modificacion.rubro_contrapartida)
            .await?;
        let valor = modificacion.valor;

        // The reversal shrinks definitiva exactly where the modification grew
        // it; only those sides re-run the consumed floor.
        let mut apropiacion_gasto = gasto.apropiacion;
        let mut apropiacion_contrapartida = contrapartida.apropiacion;
        match modificacion.tipo {
            TipoModificacion::Adicion => {
                apropiacion_gasto.adiciones -= valor;
                apropiacion_contrapartida.adiciones -= valor;
                self.verificar_consumo(tx, &gasto, apropiacion_gasto).await?;
                self.verificar_consumo(tx, &contrapartida, apropiacion_contrapartida)
                    .await?;
            }
            TipoModificacion::Reduccion => {
                apropiacion_gasto.reducciones -= valor;
                apropiacion_contrapartida.reducciones -= valor;
            }
            TipoModificacion::CreditoContracredito => {
                apropiacion_gasto.creditos -= valor;
                apropiacion_contrapartida.contracreditos -= valor;
                self.verificar_consumo(tx, &gasto, apropiacion_gasto).await?;
            }
        }

        self.guardar_apropiacion(tx, tenant_id, &gasto.codigo, apropiacion_gasto)
            .await?;
        self.guardar_apropiacion(
            tx,
            tenant_id,
            &contrapartida.codigo,
            apropiacion_contrapartida,
        )
        .await?;

        modificaciones::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            numero: ActiveValue::Set(numero),
            estado: ActiveValue::Set(Estado::Anulado.as_str().to_string()),
            fecha_anulacion: ActiveValue::Set(Some(fecha)),
            ..Default::default()
        }
        .update(tx)
        .await?;

        modificacion.estado = Estado::Anulado;
        modificacion.fecha_anulacion = Some(fecha);
        Ok(modificacion)
    }

    /// Modifications in issue order.
    pub async fn listar_modificaciones(
        &self,
        tenant_id: &str,
        incluir_anuladas: bool,
    ) -> ResultEngine<Vec<Modificacion>> {
        self.tenant(tenant_id).await?;
        let mut consulta =
            modificaciones::Entity::find().filter(modificaciones::Column::TenantId.eq(tenant_id));
        if !incluir_anuladas {
            consulta =
                consulta.filter(modificaciones::Column::Estado.eq(Estado::Activo.as_str()));
        }
        let filas = consulta
            .order_by_asc(modificaciones::Column::Numero)
            .all(&self.database)
            .await?;
        filas.into_iter().map(Modificacion::try_from).collect()
    }

    /// Compare the total definitiva of both sides over their leaf rubros.
    pub async fn verificar_equilibrio(&self, tenant_id: &str) -> ResultEngine<Equilibrio> {
        with_tx!(self, |tx| self.verificar_equilibrio_tx(&tx, tenant_id).await)
    }

    async fn verificar_equilibrio_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<Equilibrio> {
        self.require_tenant(tx, tenant_id).await?;
        let total_gastos = self.suma_definitiva(tx, tenant_id, TipoRubro::Gasto).await?;
        let total_ingresos = self
            .suma_definitiva(tx, tenant_id, TipoRubro::Ingreso)
            .await?;
        Ok(Equilibrio {
            total_gastos,
            total_ingresos,
        })
    }

    /// A modification target must exist as a leaf on the named side.
    async fn require_lado(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        codigo: &str,
        lado: TipoRubro,
    ) -> ResultEngine<Rubro> {
        let codigo = Codigo::nuevo(codigo)?;
        let rubro = self.require_rubro(tx, tenant_id, &codigo).await?;
        if rubro.tipo != lado {
            return Err(EngineError::EquilibriumViolation(format!(
                "rubro {codigo} is {} and this side of the modification must be {}",
                rubro.tipo.as_str(),
                lado.as_str()
            )));
        }
        if !rubro.es_hoja {
            return Err(EngineError::RubroNoImputable(codigo.as_str().to_string()));
        }
        Ok(rubro)
    }

    /// The new definitiva may not drop below what active chain heads already
    /// consumed on the rubro.
    async fn verificar_consumo(
        &self,
        tx: &DatabaseTransaction,
        rubro: &Rubro,
        nueva: Apropiacion,
    ) -> ResultEngine<()> {
        let definitiva = nueva.definitiva();
        let consumido = self
            .suma_afectacion(
                tx,
                &rubro.tenant_id,
                rubro.tipo.etapa_inicial(),
                &rubro.codigo,
            )
            .await?;
        if definitiva < consumido {
            return Err(EngineError::BelowConsumed {
                codigo: rubro.codigo.as_str().to_string(),
                definitiva,
                consumido,
            });
        }
        Ok(())
    }

    /// Rubros referenced by a recorded modification are never deleted, so a
    /// miss here is data damage rather than a user error.
    async fn rubro_registrado(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        numero: i64,
        codigo: &Codigo,
    ) -> ResultEngine<Rubro> {
        match self.require_rubro(tx, tenant_id, codigo).await {
            Err(EngineError::NotFound(_)) => Err(EngineError::Corruption(format!(
                "modificación {numero} references missing rubro {codigo}"
            ))),
            otro => otro,
        }
    }

    async fn insertar_modificacion(
        &self,
        tx: &DatabaseTransaction,
        mut modificacion: Modificacion,
    ) -> ResultEngine<Modificacion> {
        modificacion.numero = self
            .siguiente_numero_modificacion(tx, &modificacion.tenant_id)
            .await?;
        modificaciones::ActiveModel::from(&modificacion)
            .insert(tx)
            .await?;
        Ok(modificacion)
    }

    async fn require_modificacion(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        numero: i64,
    ) -> ResultEngine<Modificacion> {
        let clave = (tenant_id.to_string(), numero);
        let model = modificaciones::Entity::find_by_id(clave)
            .one(tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("modificación {numero}")))?;
        Modificacion::try_from(model)
    }

    /// Σ definitiva over the leaf rubros of one side.
    async fn suma_definitiva(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoRubro,
    ) -> ResultEngine<Money> {
        let stmt = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "SELECT COALESCE(SUM(inicial + adiciones - reducciones + creditos - contracreditos), 0) \
             AS suma FROM rubros WHERE tenant_id = ? AND tipo = ? AND es_hoja = ?;",
            vec![tenant_id.into(), tipo.as_str().into(), true.into()],
        );
        let row = tx.query_one(stmt).await?;
        Ok(Money::new(
            row.and_then(|r| r.try_get("", "suma").ok()).unwrap_or(0),
        ))
    }

    /// Per-tenant sequence over all modification kinds.
    async fn siguiente_numero_modificacion(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<i64> {
        let stmt = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "SELECT COALESCE(MAX(numero), 0) AS maximo FROM modificaciones \
             WHERE tenant_id = ?;",
            vec![tenant_id.into()],
        );
        let row = tx.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "maximo").ok()).unwrap_or(0) + 1)
    }
}
