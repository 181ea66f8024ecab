//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema of the budget execution ledger:
//!
//! - `tenants`: public entities executing a budget
//! - `periodos`: fiscal cursor (vigencia and open month) per tenant
//! - `rubros`: classifier codes with their appropriation columns
//! - `documentos`: execution chain documents of both budget sides
//! - `modificaciones`: mid-year appropriation changes
//! - `consolidados`: per-month consolidated stage totals

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Tenants {
    Table,
    Id,
    Nombre,
    CreatedAt,
}

#[derive(Iden)]
enum Periodos {
    Table,
    TenantId,
    Vigencia,
    MesActual,
}

#[derive(Iden)]
enum Rubros {
    Table,
    TenantId,
    Codigo,
    Cuenta,
    Tipo,
    EsHoja,
    Inicial,
    Adiciones,
    Reducciones,
    Creditos,
    Contracreditos,
}

#[derive(Iden)]
enum Documentos {
    Table,
    TenantId,
    Tipo,
    Numero,
    Fecha,
    Valor,
    Estado,
    CodigoRubro,
    PadreNumero,
    Objeto,
    Tercero,
    MedioPago,
    FechaAnulacion,
    CreatedAt,
}

#[derive(Iden)]
enum Modificaciones {
    Table,
    TenantId,
    Numero,
    Tipo,
    Acto,
    Fecha,
    Valor,
    RubroGasto,
    RubroContrapartida,
    Estado,
    FechaAnulacion,
    CreatedAt,
}

#[derive(Iden)]
enum Consolidados {
    Table,
    TenantId,
    Vigencia,
    Mes,
    Codigo,
    Cdp,
    Rp,
    Obligaciones,
    Pagos,
    Reconocimientos,
    Recaudos,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Tenants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tenants::Nombre).string().not_null())
                    .col(ColumnDef::new(Tenants::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Periodos
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Periodos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Periodos::TenantId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Periodos::Vigencia).integer().not_null())
                    .col(ColumnDef::new(Periodos::MesActual).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-periodos-tenant_id")
                            .from(Periodos::Table, Periodos::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Rubros
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Rubros::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rubros::TenantId).string().not_null())
                    .col(ColumnDef::new(Rubros::Codigo).string().not_null())
                    .col(ColumnDef::new(Rubros::Cuenta).string().not_null())
                    .col(ColumnDef::new(Rubros::Tipo).string().not_null())
                    .col(ColumnDef::new(Rubros::EsHoja).boolean().not_null())
                    .col(ColumnDef::new(Rubros::Inicial).big_integer().not_null())
                    .col(ColumnDef::new(Rubros::Adiciones).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rubros::Reducciones)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rubros::Creditos).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rubros::Contracreditos)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(Index::create().col(Rubros::TenantId).col(Rubros::Codigo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-rubros-tenant_id")
                            .from(Rubros::Table, Rubros::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-rubros-tenant_id-tipo")
                    .table(Rubros::Table)
                    .col(Rubros::TenantId)
                    .col(Rubros::Tipo)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Documentos
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Documentos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documentos::TenantId).string().not_null())
                    .col(ColumnDef::new(Documentos::Tipo).string().not_null())
                    .col(ColumnDef::new(Documentos::Numero).big_integer().not_null())
                    .col(ColumnDef::new(Documentos::Fecha).date().not_null())
                    .col(ColumnDef::new(Documentos::Valor).big_integer().not_null())
                    .col(ColumnDef::new(Documentos::Estado).string().not_null())
                    .col(ColumnDef::new(Documentos::CodigoRubro).string().not_null())
                    .col(ColumnDef::new(Documentos::PadreNumero).big_integer())
                    .col(ColumnDef::new(Documentos::Objeto).string().not_null())
                    .col(ColumnDef::new(Documentos::Tercero).string())
                    .col(ColumnDef::new(Documentos::MedioPago).string())
                    .col(ColumnDef::new(Documentos::FechaAnulacion).date())
                    .col(
                        ColumnDef::new(Documentos::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Documentos::TenantId)
                            .col(Documentos::Tipo)
                            .col(Documentos::Numero),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-documentos-tenant_id")
                            .from(Documentos::Table, Documentos::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-documentos-tenant_id-tipo-codigo_rubro")
                    .table(Documentos::Table)
                    .col(Documentos::TenantId)
                    .col(Documentos::Tipo)
                    .col(Documentos::CodigoRubro)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-documentos-tenant_id-tipo-padre_numero")
                    .table(Documentos::Table)
                    .col(Documentos::TenantId)
                    .col(Documentos::Tipo)
                    .col(Documentos::PadreNumero)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-documentos-tenant_id-fecha")
                    .table(Documentos::Table)
                    .col(Documentos::TenantId)
                    .col(Documentos::Fecha)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Modificaciones
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Modificaciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Modificaciones::TenantId).string().not_null())
                    .col(
                        ColumnDef::new(Modificaciones::Numero)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Modificaciones::Tipo).string().not_null())
                    .col(ColumnDef::new(Modificaciones::Acto).string().not_null())
                    .col(ColumnDef::new(Modificaciones::Fecha).date().not_null())
                    .col(
                        ColumnDef::new(Modificaciones::Valor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Modificaciones::RubroGasto)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Modificaciones::RubroContrapartida)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Modificaciones::Estado).string().not_null())
                    .col(ColumnDef::new(Modificaciones::FechaAnulacion).date())
                    .col(
                        ColumnDef::new(Modificaciones::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Modificaciones::TenantId)
                            .col(Modificaciones::Numero),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-modificaciones-tenant_id")
                            .from(Modificaciones::Table, Modificaciones::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Consolidados
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Consolidados::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Consolidados::TenantId).string().not_null())
                    .col(ColumnDef::new(Consolidados::Vigencia).integer().not_null())
                    .col(ColumnDef::new(Consolidados::Mes).integer().not_null())
                    .col(ColumnDef::new(Consolidados::Codigo).string().not_null())
                    .col(ColumnDef::new(Consolidados::Cdp).big_integer().not_null())
                    .col(ColumnDef::new(Consolidados::Rp).big_integer().not_null())
                    .col(
                        ColumnDef::new(Consolidados::Obligaciones)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Consolidados::Pagos).big_integer().not_null())
                    .col(
                        ColumnDef::new(Consolidados::Reconocimientos)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Consolidados::Recaudos)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Consolidados::TenantId)
                            .col(Consolidados::Vigencia)
                            .col(Consolidados::Mes)
                            .col(Consolidados::Codigo),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-consolidados-tenant_id")
                            .from(Consolidados::Table, Consolidados::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Consolidados::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modificaciones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documentos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rubros::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Periodos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        Ok(())
    }
}
