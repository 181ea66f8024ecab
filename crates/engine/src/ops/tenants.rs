//! Tenant registration and the shared lookups every operation starts from.

use chrono::Utc;
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Periodo, ResultEngine, Tenant,
    ops::{Engine, with_tx},
    periodos, tenants, util,
};

impl Engine {
    /// Register a tenant and open its first fiscal period at month 1.
    pub async fn crear_tenant(&self, nombre: &str, vigencia: i32) -> ResultEngine<Tenant> {
        let nombre = util::texto_requerido(nombre, "tenant")?;
        with_tx!(self, |tx| self.crear_tenant_tx(&tx, &nombre, vigencia).await)
    }

    async fn crear_tenant_tx(
        &self,
        tx: &DatabaseTransaction,
        nombre: &str,
        vigencia: i32,
    ) -> ResultEngine<Tenant> {
        let clave = util::clave_nombre(nombre);
        let existentes = tenants::Entity::find().all(tx).await?;
        if existentes
            .iter()
            .any(|tenant| util::clave_nombre(&tenant.nombre) == clave)
        {
            return Err(EngineError::ExistingKey(format!("tenant {nombre}")));
        }

        let tenant = Tenant {
            id: Uuid::new_v4().to_string(),
            nombre: nombre.to_string(),
            created_at: Utc::now(),
        };
        tenants::ActiveModel::from(&tenant).insert(tx).await?;

        let periodo = Periodo {
            tenant_id: tenant.id.clone(),
            vigencia,
            mes_actual: 1,
        };
        periodos::ActiveModel::from(&periodo).insert(tx).await?;

        Ok(tenant)
    }

    /// Look up a tenant by id.
    pub async fn tenant(&self, tenant_id: &str) -> ResultEngine<Tenant> {
        let model = tenants::Entity::find_by_id(tenant_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tenant {tenant_id}")))?;
        Ok(Tenant::from(model))
    }

    pub(in crate::ops) async fn require_tenant(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<Tenant> {
        let model = tenants::Entity::find_by_id(tenant_id.to_string())
            .one(tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tenant {tenant_id}")))?;
        Ok(Tenant::from(model))
    }

    /// The fiscal cursor of a tenant. A missing row means the tenant itself
    /// is unknown, since both are created together.
    pub(in crate::ops) async fn require_periodo(
        &self,
        tx: &DatabaseTransaction,
        tenant_id: &str,
    ) -> ResultEngine<Periodo> {
        let model = periodos::Entity::find_by_id(tenant_id.to_string())
            .one(tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tenant {tenant_id}")))?;
        Ok(Periodo::from(model))
    }
}
