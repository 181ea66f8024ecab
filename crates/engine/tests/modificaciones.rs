use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AdicionCmd, CdpCmd, CreditoCmd, Engine, EngineError, Estado, Money, NuevoRubro, ReduccionCmd,
    TipoRubro,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn rubro(codigo: &str, cuenta: &str, tipo: TipoRubro, es_hoja: bool, inicial: i64) -> NuevoRubro {
    NuevoRubro {
        codigo: codigo.to_string(),
        cuenta: cuenta.to_string(),
        tipo,
        es_hoja,
        inicial: Money::new(inicial),
    }
}

async fn tenant_con_catalogo(engine: &Engine) -> String {
    let tenant = engine
        .crear_tenant("Alcaldía de Prueba", 2026)
        .await
        .unwrap();
    engine
        .importar_catalogo(
            &tenant.id,
            &[
                rubro("2", "Gastos", TipoRubro::Gasto, false, 0),
                rubro("2.1", "Funcionamiento", TipoRubro::Gasto, false, 0),
                rubro(
                    "2.1.1",
                    "Gastos de personal",
                    TipoRubro::Gasto,
                    true,
                    1_000_000,
                ),
                rubro("2.1.2", "Gastos generales", TipoRubro::Gasto, true, 500_000),
                rubro("3", "Ingresos", TipoRubro::Ingreso, false, 0),
                rubro(
                    "3.1",
                    "Ingresos tributarios",
                    TipoRubro::Ingreso,
                    true,
                    1_500_000,
                ),
            ],
        )
        .await
        .unwrap();
    engine.sincronizar_arbol(&tenant.id).await.unwrap();
    tenant.id
}

fn fecha(mes: u32, dia: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, mes, dia).unwrap()
}

#[tokio::test]
async fn adicion_raises_both_sides_equally() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let antes = engine.verificar_equilibrio(&tenant).await.unwrap();
    assert_eq!(antes.total_gastos, Money::new(1_500_000));
    assert!(antes.equilibrado());

    let modificacion = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 100 de 2026",
            "2.1.2",
            "3.1",
            Money::new(200_000),
            fecha(3, 1),
        ))
        .await
        .unwrap();
    assert_eq!(modificacion.numero, 1);
    assert_eq!(modificacion.estado, Estado::Activo);

    let gasto = engine.saldo_rubro(&tenant, "2.1.2").await.unwrap();
    assert_eq!(gasto.definitiva, Money::new(700_000));
    let ingreso = engine.saldo_rubro(&tenant, "3.1").await.unwrap();
    assert_eq!(ingreso.definitiva, Money::new(1_700_000));

    let despues = engine.verificar_equilibrio(&tenant).await.unwrap();
    assert_eq!(despues.total_gastos, Money::new(1_700_000));
    assert_eq!(despues.total_ingresos, Money::new(1_700_000));
    assert!(despues.equilibrado());
}

#[tokio::test]
async fn modification_targets_must_be_leaves_of_their_side() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    // Gasto slot pointed at an ingreso rubro.
    let err = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 101",
            "3.1",
            "3.1",
            Money::new(100_000),
            fecha(3, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EquilibriumViolation(_)), "got {err:?}");

    let err = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 101",
            "2.1",
            "3.1",
            Money::new(100_000),
            fecha(3, 1),
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::RubroNoImputable("2.1".to_string()));

    let err = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "   ",
            "2.1.2",
            "3.1",
            Money::new(100_000),
            fecha(3, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn reduccion_lowers_both_sides_equally() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .aplicar_reduccion(ReduccionCmd::new(
            &tenant,
            "Decreto 102 de 2026",
            "2.1.2",
            "3.1",
            Money::new(300_000),
            fecha(4, 1),
        ))
        .await
        .unwrap();

    let gasto = engine.saldo_rubro(&tenant, "2.1.2").await.unwrap();
    assert_eq!(gasto.definitiva, Money::new(200_000));
    let equilibrio = engine.verificar_equilibrio(&tenant).await.unwrap();
    assert_eq!(equilibrio.total_gastos, Money::new(1_200_000));
    assert!(equilibrio.equilibrado());
}

#[tokio::test]
async fn reduccion_cannot_drop_below_consumption() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .crear_cdp(
            CdpCmd::new(&tenant, "2.1.1", Money::new(900_000), fecha(1, 20)).objeto("Nómina"),
        )
        .await
        .unwrap();

    let err = engine
        .aplicar_reduccion(ReduccionCmd::new(
            &tenant,
            "Decreto 103",
            "2.1.1",
            "3.1",
            Money::new(200_000),
            fecha(2, 1),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BelowConsumed {
            codigo: "2.1.1".to_string(),
            definitiva: Money::new(800_000),
            consumido: Money::new(900_000),
        }
    );

    // Down to exactly the consumed amount is still allowed.
    engine
        .aplicar_reduccion(ReduccionCmd::new(
            &tenant,
            "Decreto 103",
            "2.1.1",
            "3.1",
            Money::new(100_000),
            fecha(2, 1),
        ))
        .await
        .unwrap();
    let saldo = engine.saldo_rubro(&tenant, "2.1.1").await.unwrap();
    assert_eq!(saldo.disponible, Money::ZERO);
}

#[tokio::test]
async fn credito_moves_appropriation_without_changing_totals() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .aplicar_credito_contracredito(CreditoCmd::new(
            &tenant,
            "Resolución 7 de 2026",
            "2.1.1",
            "2.1.2",
            Money::new(200_000),
            fecha(5, 10),
        ))
        .await
        .unwrap();

    let credito = engine.saldo_rubro(&tenant, "2.1.1").await.unwrap();
    assert_eq!(credito.definitiva, Money::new(1_200_000));
    let contracredito = engine.saldo_rubro(&tenant, "2.1.2").await.unwrap();
    assert_eq!(contracredito.definitiva, Money::new(300_000));

    let equilibrio = engine.verificar_equilibrio(&tenant).await.unwrap();
    assert_eq!(equilibrio.total_gastos, Money::new(1_500_000));
    assert!(equilibrio.equilibrado());

    let err = engine
        .aplicar_credito_contracredito(CreditoCmd::new(
            &tenant,
            "Resolución 8",
            "2.1.1",
            "2.1.1",
            Money::new(50_000),
            fecha(5, 11),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn contracredito_respects_consumption_floor() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .crear_cdp(
            CdpCmd::new(&tenant, "2.1.2", Money::new(400_000), fecha(1, 20)).objeto("Papelería"),
        )
        .await
        .unwrap();

    let err = engine
        .aplicar_credito_contracredito(CreditoCmd::new(
            &tenant,
            "Resolución 9",
            "2.1.1",
            "2.1.2",
            Money::new(200_000),
            fecha(2, 1),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BelowConsumed {
            codigo: "2.1.2".to_string(),
            definitiva: Money::new(300_000),
            consumido: Money::new(400_000),
        }
    );
}

#[tokio::test]
async fn anular_reverses_the_movement() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let adicion = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 104",
            "2.1.2",
            "3.1",
            Money::new(200_000),
            fecha(3, 1),
        ))
        .await
        .unwrap();
    let credito = engine
        .aplicar_credito_contracredito(CreditoCmd::new(
            &tenant,
            "Resolución 10",
            "2.1.1",
            "2.1.2",
            Money::new(50_000),
            fecha(3, 2),
        ))
        .await
        .unwrap();
    // One sequence across all modification kinds.
    assert_eq!(adicion.numero, 1);
    assert_eq!(credito.numero, 2);

    let anulada = engine
        .anular_modificacion(&tenant, adicion.numero, fecha(3, 15))
        .await
        .unwrap();
    assert_eq!(anulada.estado, Estado::Anulado);
    assert_eq!(anulada.fecha_anulacion, Some(fecha(3, 15)));

    let gasto = engine.saldo_rubro(&tenant, "2.1.2").await.unwrap();
    assert_eq!(gasto.definitiva, Money::new(450_000));
    let ingreso = engine.saldo_rubro(&tenant, "3.1").await.unwrap();
    assert_eq!(ingreso.definitiva, Money::new(1_500_000));
    let equilibrio = engine.verificar_equilibrio(&tenant).await.unwrap();
    assert!(equilibrio.equilibrado());

    let vigentes = engine.listar_modificaciones(&tenant, false).await.unwrap();
    assert_eq!(vigentes.len(), 1);
    assert_eq!(vigentes[0].numero, 2);
    let todas = engine.listar_modificaciones(&tenant, true).await.unwrap();
    assert_eq!(todas.len(), 2);

    let err = engine
        .anular_modificacion(&tenant, adicion.numero, fecha(3, 16))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn anular_cannot_strand_consumed_balance() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let adicion = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 105",
            "2.1.1",
            "3.1",
            Money::new(200_000),
            fecha(2, 1),
        ))
        .await
        .unwrap();
    engine
        .crear_cdp(
            CdpCmd::new(&tenant, "2.1.1", Money::new(1_100_000), fecha(2, 10))
                .objeto("Compromiso grande"),
        )
        .await
        .unwrap();

    let err = engine
        .anular_modificacion(&tenant, adicion.numero, fecha(2, 20))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BelowConsumed {
            codigo: "2.1.1".to_string(),
            definitiva: Money::new(1_000_000),
            consumido: Money::new(1_100_000),
        }
    );

    // The rejected void leaves the modification in force.
    let vigentes = engine.listar_modificaciones(&tenant, false).await.unwrap();
    assert_eq!(vigentes.len(), 1);
    let saldo = engine.saldo_rubro(&tenant, "2.1.1").await.unwrap();
    assert_eq!(saldo.definitiva, Money::new(1_200_000));
}

#[tokio::test]
async fn anular_fecha_outside_vigencia_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let adicion = engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 106",
            "2.1.1",
            "3.1",
            Money::new(200_000),
            fecha(2, 1),
        ))
        .await
        .unwrap();

    let fuera = NaiveDate::from_ymd_opt(2027, 1, 2).unwrap();
    let err = engine
        .anular_modificacion(&tenant, adicion.numero, fuera)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");

    let vigentes = engine.listar_modificaciones(&tenant, false).await.unwrap();
    assert_eq!(vigentes.len(), 1);
    assert_eq!(vigentes[0].estado, Estado::Activo);
    let saldo = engine.saldo_rubro(&tenant, "2.1.1").await.unwrap();
    assert_eq!(saldo.definitiva, Money::new(1_200_000));
}
