//! Execution chains: document creation under balance ceilings, voiding,
//! balance reads and the bounded non-balance edits.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, Statement,
    TransactionTrait, prelude::*,
};

use crate::{
    ActualizarDocumentoCmd, CdpCmd, Codigo, Documento, EngineError, Money, ObligacionCmd, PagoCmd,
    RecaudoCmd, ReconocimientoCmd, ResultEngine, RpCmd, SaldoDocumento,
    documentos::{self, Estado, TipoDocumento},
    ops::{Engine, with_tx},
    util,
};

impl Engine {
    /// Issue a CDP against a leaf gasto rubro.
    pub async fn crear_cdp(&self, cmd: CdpCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_cabeza(
                &tx,
                TipoDocumento::Cdp,
                &cmd.tenant_id,
                &cmd.codigo_rubro,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                cmd.tercero.as_deref(),
            )
            .await
        })
    }

    /// Commit part of a CDP's remaining balance to a third party.
    pub async fn crear_rp(&self, cmd: RpCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_derivado(
                &tx,
                TipoDocumento::Rp,
                &cmd.tenant_id,
                cmd.cdp_numero,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                cmd.tercero.as_deref(),
                None,
            )
            .await
        })
    }

    /// Recognize a delivered good or service against an RP.
    pub async fn crear_obligacion(&self, cmd: ObligacionCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_derivado(
                &tx,
                TipoDocumento::Obligacion,
                &cmd.tenant_id,
                cmd.rp_numero,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                cmd.tercero.as_deref(),
                None,
            )
            .await
        })
    }

    /// Pay an obligación, fully or in part.
    pub async fn crear_pago(&self, cmd: PagoCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_derivado(
                &tx,
                TipoDocumento::Pago,
                &cmd.tenant_id,
                cmd.obligacion_numero,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                cmd.tercero.as_deref(),
                cmd.medio_pago.as_deref(),
            )
            .await
        })
    }

    /// Recognize revenue against a leaf ingreso rubro.
    pub async fn crear_reconocimiento(&self, cmd: ReconocimientoCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_cabeza(
                &tx,
                TipoDocumento::Reconocimiento,
                &cmd.tenant_id,
                &cmd.codigo_rubro,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                cmd.tercero.as_deref(),
            )
            .await
        })
    }

    /// Collect part of a reconocimiento's remaining balance.
    pub async fn crear_recaudo(&self, cmd: RecaudoCmd) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.crear_derivado(
                &tx,
                TipoDocumento::Recaudo,
                &cmd.tenant_id,
                cmd.reconocimiento_numero,
                cmd.valor,
                cmd.fecha,
                &cmd.objeto,
                None,
                cmd.medio_pago.as_deref(),
            )
            .await
        })
    }

    /// Chain heads consume the rubro's available appropriation directly.
    async fn crear_cabeza(
        &self,
        tx: &DatabaseTransaction,
        tipo: TipoDocumento,
        tenant_id: &str,
        codigo_rubro: &str,
        valor: Money,
        fecha: NaiveDate,
        objeto: &str,
        tercero: Option<&str>,
    ) -> ResultEngine<Documento> {
        util::valor_positivo(valor, tipo.as_str())?;
        let objeto = util::texto_requerido(objeto, "objeto")?;
        let codigo = Codigo::nuevo(codigo_rubro)?;

        let periodo = self.require_periodo(tx, tenant_id).await?;
        util::fecha_en_vigencia(fecha, periodo.vigencia)?;

        let rubro = self.require_rubro(tx, tenant_id, &codigo).await?;
        if rubro.tipo != tipo.lado() {
            return Err(EngineError::InvalidState(format!(
                "rubro {codigo} is {}, a {} posts to {} rubros",
                rubro.tipo.as_str(),
                tipo.as_str(),
                tipo.lado().as_str()
            )));
        }
        if !rubro.es_hoja {
            return Err(EngineError::RubroNoImputable(codigo.as_str().to_string()));
        }

        let definitiva = rubro.definitiva();
        let afectado = self.suma_afectacion(tx, tenant_id, tipo, &codigo).await?;
        let disponible = definitiva - afectado;
        if valor > disponible {
            return Err(EngineError::InsufficientBalance {
                disponible,
                solicitado: valor,
            });
        }

        self.insertar_documento(
            tx,
            Documento {
                tenant_id: tenant_id.to_string(),
                tipo,
                numero: 0,
                fecha,
                valor,
                estado: Estado::Activo,
                codigo_rubro: codigo,
                padre_numero: None,
                objeto,
                tercero: util::texto_opcional(tercero),
                medio_pago: None,
                fecha_anulacion: None,
                created_at: Utc::now(),
            },
        )
        .await
    }

    /// Later stages consume the remaining balance of their parent document
    /// and inherit its rubro.
    async fn crear_derivado(
        &self,
        tx: &DatabaseTransaction,
        tipo: TipoDocumento,
        tenant_id: &str,
        padre_numero: i64,
        valor: Money,
        fecha: NaiveDate,
        objeto: &str,
        tercero: Option<&str>,
        medio_pago: Option<&str>,
    ) -> ResultEngine<Documento> {
        util::valor_positivo(valor, tipo.as_str())?;
        let objeto = util::texto_requerido(objeto, "objeto")?;
        let tipo_padre = tipo.padre().ok_or_else(|| {
            EngineError::InvalidState(format!("{} documents have no parent stage", tipo.as_str()))
        })?;

        let periodo = self.require_periodo(tx, tenant_id).await?;
        util::fecha_en_vigencia(fecha, periodo.vigencia)?;

        let padre = self
            .require_documento(tx, tenant_id, tipo_padre, padre_numero)
            .await?;
        if padre.estado == Estado::Anulado {
            return Err(EngineError::InvalidState(format!(
                "{} {padre_numero} is ANULADO and cannot back a new {}",
                tipo_padre.as_str(),
                tipo.as_str()
            )));
        }

        let consumido = self.suma_consumo(tx, tenant_id, tipo, padre_numero).await?;
        let saldo = padre.valor - consumido;
        if valor > saldo {
            return Err(EngineError::InsufficientBalance {
                disponible: saldo,
                solicitado: valor,
            });
        }

        self.insertar_documento(
            tx,
            Documento {
                tenant_id: tenant_id.to_string(),
                tipo,
                numero: 0,
                fecha,
                valor,
                estado: Estado::Activo,
                codigo_rubro: padre.codigo_rubro,
                padre_numero: Some(padre_numero),
                objeto,
                tercero: util::texto_opcional(tercero),
                medio_pago: util::texto_opcional(medio_pago),
                fecha_anulacion: None,
                created_at: Utc::now(),
            },
        )
        .await
    }

    async fn insertar_documento(
        &self,
        tx: &DatabaseTransaction,
        mut documento: Documento,
    ) -> ResultEngine<Documento> {
        documento.numero = self
            .siguiente_numero(tx, &documento.tenant_id, documento.tipo)
            .await?;
        documentos::ActiveModel::from(&documento).insert(tx).await?;
        Ok(documento)
    }

    /// Void a document: the row stays, `estado` flips and every balance and
    /// report stops counting it. Documents still backing ACTIVO children
    /// cannot be voided.
    pub async fn anular_documento(
        &self,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
        fecha: NaiveDate,
    ) -> ResultEngine<Documento> {
        with_tx!(self, |tx| {
            self.anular_documento_tx(&tx, tenant_id, tipo, numero, fecha)
                .await
        })
    }

    async fn anular_documento_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
        fecha: NaiveDate,
    ) -> ResultEngine<Documento> {
        let periodo = self.require_periodo(tx, tenant_id).await?;
        util::fecha_en_vigencia(fecha, periodo.vigencia)?;

        let mut documento = self.require_documento(tx, tenant_id, tipo, numero).await?;
        if documento.estado == Estado::Anulado {
            return Err(EngineError::InvalidState(format!(
                "{} {numero} is already ANULADO",
                tipo.as_str()
            )));
        }
        if let Some(tipo_hijo) = tipo.hijo() {
            let activos = documentos::Entity::find()
                .filter(documentos::Column::TenantId.eq(tenant_id))
                .filter(documentos::Column::Tipo.eq(tipo_hijo.as_str()))
                .filter(documentos::Column::PadreNumero.eq(numero))
                .filter(documentos::Column::Estado.eq(Estado::Activo.as_str()))
                .count(tx)
                .await?;
            if activos > 0 {
                return Err(EngineError::InvalidState(format!(
                    "{} {numero} has ACTIVO {} documents; void them first",
                    tipo.as_str(),
                    tipo_hijo.as_str()
                )));
            }
        }

        documentos::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            tipo: ActiveValue::Set(tipo.as_str().to_string()),
            numero: ActiveValue::Set(numero),
            estado: ActiveValue::Set(Estado::Anulado.as_str().to_string()),
            fecha_anulacion: ActiveValue::Set(Some(fecha)),
            ..Default::default()
        }
        .update(tx)
        .await?;

        documento.estado = Estado::Anulado;
        documento.fecha_anulacion = Some(fecha);
        Ok(documento)
    }

    /// Look up one document.
    pub async fn documento(
        &self,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
    ) -> ResultEngine<Documento> {
        let clave = (tenant_id.to_string(), tipo.as_str().to_string(), numero);
        let model = documentos::Entity::find_by_id(clave)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("{} {numero}", tipo.as_str())))?;
        Documento::try_from(model)
    }

    /// Documents of one stage in issue order.
    pub async fn listar_documentos(
        &self,
        tenant_id: &str,
        tipo: TipoDocumento,
        incluir_anulados: bool,
    ) -> ResultEngine<Vec<Documento>> {
        self.tenant(tenant_id).await?;
        let mut consulta = documentos::Entity::find()
            .filter(documentos::Column::TenantId.eq(tenant_id))
            .filter(documentos::Column::Tipo.eq(tipo.as_str()));
        if !incluir_anulados {
            consulta = consulta.filter(documentos::Column::Estado.eq(Estado::Activo.as_str()));
        }
        let filas = consulta
            .order_by_asc(documentos::Column::Numero)
            .all(&self.database)
            .await?;
        filas.into_iter().map(Documento::try_from).collect()
    }

    /// Remaining balance of a document against its child stage.
    pub async fn saldo_documento(
        &self,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
    ) -> ResultEngine<SaldoDocumento> {
        with_tx!(self, |tx| {
            self.saldo_documento_tx(&tx, tenant_id, tipo, numero).await
        })
    }

    async fn saldo_documento_tx(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
    ) -> ResultEngine<SaldoDocumento> {
        let documento = self.require_documento(tx, tenant_id, tipo, numero).await?;
        let consumido = match tipo.hijo() {
            Some(tipo_hijo) => self.suma_consumo(tx, tenant_id, tipo_hijo, numero).await?,
            None => Money::ZERO,
        };
        Ok(SaldoDocumento {
            valor: documento.valor,
            consumido,
            saldo: documento.valor - consumido,
        })
    }

    /// Update the editable non-balance fields of an ACTIVO document.
    /// `valor`, `fecha` and chain references never change once posted.
    pub async fn actualizar_documento(
        &self,
        cmd: ActualizarDocumentoCmd,
    ) -> ResultEngine<Documento> {
        with_tx!(self, |tx| self.actualizar_documento_tx(&tx, &cmd).await)
    }

    async fn actualizar_documento_tx(
        &self,
        tx: &DatabaseTransaction,
        cmd: &ActualizarDocumentoCmd,
    ) -> ResultEngine<Documento> {
        if cmd.objeto.is_none() && cmd.tercero.is_none() && cmd.medio_pago.is_none() {
            return Err(EngineError::InvalidState(
                "no editable fields in the request".to_string(),
            ));
        }
        if cmd.medio_pago.is_some()
            && !matches!(cmd.tipo, TipoDocumento::Pago | TipoDocumento::Recaudo)
        {
            return Err(EngineError::InvalidState(format!(
                "medio_pago applies to pagos and recaudos, not to {}",
                cmd.tipo.as_str()
            )));
        }

        let mut documento = self
            .require_documento(tx, &cmd.tenant_id, cmd.tipo, cmd.numero)
            .await?;
        if documento.estado == Estado::Anulado {
            return Err(EngineError::InvalidState(format!(
                "{} {} is ANULADO and cannot be edited",
                cmd.tipo.as_str(),
                cmd.numero
            )));
        }

        let mut cambios = documentos::ActiveModel {
            tenant_id: ActiveValue::Set(cmd.tenant_id.clone()),
            tipo: ActiveValue::Set(cmd.tipo.as_str().to_string()),
            numero: ActiveValue::Set(cmd.numero),
            ..Default::default()
        };
        if let Some(objeto) = cmd.objeto.as_deref() {
            documento.objeto = util::texto_requerido(objeto, "objeto")?;
            cambios.objeto = ActiveValue::Set(documento.objeto.clone());
        }
        if let Some(tercero) = cmd.tercero.as_deref() {
            documento.tercero = util::texto_opcional(Some(tercero));
            cambios.tercero = ActiveValue::Set(documento.tercero.clone());
        }
        if let Some(medio_pago) = cmd.medio_pago.as_deref() {
            documento.medio_pago = util::texto_opcional(Some(medio_pago));
            cambios.medio_pago = ActiveValue::Set(documento.medio_pago.clone());
        }
        cambios.update(tx).await?;

        Ok(documento)
    }

    pub(in crate::ops) async fn require_documento(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoDocumento,
        numero: i64,
    ) -> ResultEngine<Documento> {
        let clave = (tenant_id.to_string(), tipo.as_str().to_string(), numero);
        let model = documentos::Entity::find_by_id(clave)
            .one(tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("{} {numero}", tipo.as_str())))?;
        Documento::try_from(model)
    }

    /// Σ valor of ACTIVO children of one document at the given child stage.
    async fn suma_consumo(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo_hijo: TipoDocumento,
        padre_numero: i64,
    ) -> ResultEngine<Money> {
        let stmt = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "SELECT COALESCE(SUM(valor), 0) AS suma FROM documentos \
             WHERE tenant_id = ? AND tipo = ? AND padre_numero = ? AND estado = ?;",
            vec![
                tenant_id.into(),
                tipo_hijo.as_str().into(),
                padre_numero.into(),
                Estado::Activo.as_str().into(),
            ],
        );
        let row = tx.query_one(stmt).await?;
        Ok(Money::new(
            row.and_then(|r| r.try_get("", "suma").ok()).unwrap_or(0),
        ))
    }

    /// Per-tenant, per-stage sequence: MAX(numero) + 1, read inside the same
    /// transaction as the insert.
    async fn siguiente_numero(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
        tipo: TipoDocumento,
    ) -> ResultEngine<i64> {
        let stmt = Statement::from_sql_and_values(
            tx.get_database_backend(),
            "SELECT COALESCE(MAX(numero), 0) AS maximo FROM documentos \
             WHERE tenant_id = ? AND tipo = ?;",
            vec![tenant_id.into(), tipo.as_str().into()],
        );
        let row = tx.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "maximo").ok()).unwrap_or(0) + 1)
    }
}
