use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{AdicionCmd, CdpCmd, Engine, EngineError, Money, NuevoRubro, TipoRubro};
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

/// Three levels on the gasto side, leaves adding up to the single ingreso
/// leaf.
async fn tenant_con_arbol(engine: &Engine) -> String {
    let tenant = engine
        .crear_tenant("Gobernación de Prueba", 2026)
        .await
        .unwrap();
    engine
        .importar_catalogo(
            &tenant.id,
            &[
                rubro("2", "Gastos", TipoRubro::Gasto, false, 0),
                rubro("2.1", "Funcionamiento", TipoRubro::Gasto, false, 0),
                rubro("2.1.1", "Gastos de personal", TipoRubro::Gasto, true, 300_000),
                rubro("2.1.2", "Gastos generales", TipoRubro::Gasto, true, 200_000),
                rubro("2.2", "Inversión", TipoRubro::Gasto, false, 0),
                rubro("2.2.1", "Infraestructura vial", TipoRubro::Gasto, true, 500_000),
                rubro("3", "Ingresos", TipoRubro::Ingreso, false, 0),
                rubro(
                    "3.1",
                    "Ingresos corrientes",
                    TipoRubro::Ingreso,
                    true,
                    1_000_000,
                ),
            ],
        )
        .await
        .unwrap();
    tenant.id
}

fn fecha(mes: u32, dia: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, mes, dia).unwrap()
}

#[tokio::test]
async fn sincronizar_rolls_up_three_levels() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_arbol(&engine).await;

    let reescritos = engine.sincronizar_arbol(&tenant).await.unwrap();
    assert_eq!(reescritos, 4);

    let nivel_medio = engine.saldo_rubro(&tenant, "2.1").await.unwrap();
    assert_eq!(nivel_medio.definitiva, Money::new(500_000));
    let raiz = engine.saldo_rubro(&tenant, "2").await.unwrap();
    assert_eq!(raiz.definitiva, Money::new(1_000_000));
    let ingresos = engine.saldo_rubro(&tenant, "3").await.unwrap();
    assert_eq!(ingresos.definitiva, Money::new(1_000_000));
}

#[tokio::test]
async fn sincronizar_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_arbol(&engine).await;

    engine.sincronizar_arbol(&tenant).await.unwrap();
    let antes = engine.listar_rubros(&tenant, TipoRubro::Gasto).await.unwrap();

    let reescritos = engine.sincronizar_arbol(&tenant).await.unwrap();
    assert_eq!(reescritos, 0);
    let despues = engine.listar_rubros(&tenant, TipoRubro::Gasto).await.unwrap();
    assert_eq!(antes, despues);
}

#[tokio::test]
async fn sincronizar_refreshes_aggregators_after_modifications() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_arbol(&engine).await;
    engine.sincronizar_arbol(&tenant).await.unwrap();

    engine
        .aplicar_adicion(AdicionCmd::new(
            &tenant,
            "Decreto 200 de 2026",
            "2.1.1",
            "3.1",
            Money::new(100_000),
            fecha(4, 1),
        ))
        .await
        .unwrap();

    // Modifications touch leaves; aggregator rows hold the old values until
    // the next rollup.
    let estancado = engine.saldo_rubro(&tenant, "2.1").await.unwrap();
    assert_eq!(estancado.definitiva, Money::new(500_000));

    let reescritos = engine.sincronizar_arbol(&tenant).await.unwrap();
    assert_eq!(reescritos, 3);
    let fresco = engine.saldo_rubro(&tenant, "2.1").await.unwrap();
    assert_eq!(fresco.definitiva, Money::new(600_000));
    let raiz = engine.saldo_rubro(&tenant, "2").await.unwrap();
    assert_eq!(raiz.definitiva, Money::new(1_100_000));
}

#[tokio::test]
async fn orphan_code_fails_the_rollup() {
    let (engine, _db) = engine_with_db().await;
    let tenant = engine.crear_tenant("Municipio Huérfano", 2026).await.unwrap();
    engine
        .importar_catalogo(
            &tenant.id,
            &[
                rubro("2", "Gastos", TipoRubro::Gasto, false, 0),
                rubro("2.1.1", "Sin padre", TipoRubro::Gasto, true, 100_000),
            ],
        )
        .await
        .unwrap();

    let err = engine.sincronizar_arbol(&tenant.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Corruption(_)), "got {err:?}");
}

#[tokio::test]
async fn report_parent_rows_fold_their_children() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_arbol(&engine).await;
    engine.sincronizar_arbol(&tenant).await.unwrap();

    engine
        .crear_cdp(
            CdpCmd::new(&tenant, "2.1.1", Money::new(100_000), fecha(1, 10)).objeto("Nómina"),
        )
        .await
        .unwrap();
    engine
        .crear_cdp(
            CdpCmd::new(&tenant, "2.2.1", Money::new(40_000), fecha(2, 10)).objeto("Placa huella"),
        )
        .await
        .unwrap();

    let filas = engine
        .reporte_ejecucion_gastos(&tenant, Some(2))
        .await
        .unwrap();
    let codigos: Vec<&str> = filas.iter().map(|fila| fila.codigo.as_str()).collect();
    assert_eq!(codigos, ["2", "2.1", "2.1.1", "2.1.2", "2.2", "2.2.1"]);

    let raiz = &filas[0];
    assert!(!raiz.es_hoja);
    assert_eq!(raiz.cdp.anterior, Money::new(100_000));
    assert_eq!(raiz.cdp.mes, Money::new(40_000));
    assert_eq!(raiz.cdp.acumulado(), Money::new(140_000));

    let medio = &filas[1];
    assert_eq!(medio.cdp.anterior, Money::new(100_000));
    assert_eq!(medio.cdp.mes, Money::ZERO);

    let hoja_quieta = &filas[3];
    assert_eq!(hoja_quieta.codigo.as_str(), "2.1.2");
    assert_eq!(hoja_quieta.cdp.acumulado(), Money::ZERO);
    assert_eq!(hoja_quieta.saldo_disponible(), Money::new(200_000));
}
