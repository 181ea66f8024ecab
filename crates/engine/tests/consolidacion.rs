use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CdpCmd, Engine, EngineError, Money, NuevoRubro, RecaudoCmd, ReconocimientoCmd, RpCmd,
    TipoDocumento, TipoRubro,
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
async fn consolidar_snapshots_only_the_open_month() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let cdp = engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(100_000), fecha(1, 10)).objeto("Uno"))
        .await
        .unwrap();
    engine
        .crear_rp(RpCmd::new(&tenant, cdp.numero, Money::new(50_000), fecha(1, 12)).objeto("RP"))
        .await
        .unwrap();
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.2", Money::new(200_000), fecha(1, 20)).objeto("Dos"))
        .await
        .unwrap();
    engine
        .crear_reconocimiento(
            ReconocimientoCmd::new(&tenant, "3.1", Money::new(300_000), fecha(1, 15))
                .objeto("Predial"),
        )
        .await
        .unwrap();
    // Dated past the open month, left out of this snapshot.
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(400_000), fecha(2, 5)).objeto("Tres"))
        .await
        .unwrap();
    // Voided documents stop counting.
    let anulado = engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.2", Money::new(9_000), fecha(1, 25)).objeto("Error"))
        .await
        .unwrap();
    engine
        .anular_documento(&tenant, TipoDocumento::Cdp, anulado.numero, fecha(1, 26))
        .await
        .unwrap();

    let snapshot = engine.consolidar_mes(&tenant).await.unwrap();
    assert_eq!(snapshot.vigencia, 2026);
    assert_eq!(snapshot.mes, 1);
    assert_eq!(snapshot.rubros.len(), 3);

    assert_eq!(snapshot.rubros[0].codigo.as_str(), "2.1.1");
    assert_eq!(snapshot.rubros[0].cdp, Money::new(100_000));
    assert_eq!(snapshot.rubros[0].rp, Money::new(50_000));
    assert_eq!(snapshot.rubros[1].codigo.as_str(), "2.1.2");
    assert_eq!(snapshot.rubros[1].cdp, Money::new(200_000));
    assert_eq!(snapshot.rubros[2].codigo.as_str(), "3.1");
    assert_eq!(snapshot.rubros[2].reconocimientos, Money::new(300_000));
}

#[tokio::test]
async fn consolidar_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(100_000), fecha(1, 10)).objeto("Uno"))
        .await
        .unwrap();

    let primera = engine.consolidar_mes(&tenant).await.unwrap();
    let segunda = engine.consolidar_mes(&tenant).await.unwrap();
    assert_eq!(primera, segunda);

    // A correction between runs lands on the same rows.
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(30_000), fecha(1, 11)).objeto("Dos"))
        .await
        .unwrap();
    let tercera = engine.consolidar_mes(&tenant).await.unwrap();
    assert_eq!(tercera.rubros.len(), 1);
    assert_eq!(tercera.rubros[0].cdp, Money::new(130_000));
}

#[tokio::test]
async fn cierre_advances_and_stops_at_december() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let cierre = engine.cierre_mes(&tenant).await.unwrap();
    assert_eq!(cierre.vigencia, 2026);
    assert_eq!(cierre.mes_cerrado, 1);
    assert_eq!(cierre.mes_actual, 2);

    for _ in 2..12 {
        engine.cierre_mes(&tenant).await.unwrap();
    }
    let periodo = engine.periodo(&tenant).await.unwrap();
    assert_eq!(periodo.mes_actual, 12);

    let err = engine.cierre_mes(&tenant).await.unwrap_err();
    assert_eq!(err, EngineError::AlreadyAtYearEnd { vigencia: 2026 });
    let periodo = engine.periodo(&tenant).await.unwrap();
    assert_eq!(periodo.mes_actual, 12);
}

#[tokio::test]
async fn abrir_vigencia_rolls_from_december_only() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    let err = engine.abrir_vigencia(&tenant).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");

    for _ in 1..12 {
        engine.cierre_mes(&tenant).await.unwrap();
    }
    let nuevo = engine.abrir_vigencia(&tenant).await.unwrap();
    assert_eq!(nuevo.vigencia, 2027);
    assert_eq!(nuevo.mes_actual, 1);

    // Documents now date into the new vigencia.
    let tarde = NaiveDate::from_ymd_opt(2027, 1, 10).unwrap();
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(50_000), tarde).objeto("Nuevo año"))
        .await
        .unwrap();
    let err = engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(50_000), fecha(6, 1)).objeto("Viejo"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn consolidation_follows_the_cursor() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(100_000), fecha(1, 10)).objeto("Uno"))
        .await
        .unwrap();
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(200_000), fecha(2, 10)).objeto("Dos"))
        .await
        .unwrap();

    let enero = engine.consolidar_mes(&tenant).await.unwrap();
    assert_eq!(enero.mes, 1);
    assert_eq!(enero.rubros[0].cdp, Money::new(100_000));

    engine.cierre_mes(&tenant).await.unwrap();
    let febrero = engine.consolidar_mes(&tenant).await.unwrap();
    assert_eq!(febrero.mes, 2);
    assert_eq!(febrero.rubros[0].cdp, Money::new(200_000));
}

#[tokio::test]
async fn reports_split_movement_around_the_cutoff() {
    let (engine, _db) = engine_with_db().await;
    let tenant = tenant_con_catalogo(&engine).await;

    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(100_000), fecha(1, 10)).objeto("Uno"))
        .await
        .unwrap();
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(200_000), fecha(2, 10)).objeto("Dos"))
        .await
        .unwrap();
    engine
        .crear_cdp(CdpCmd::new(&tenant, "2.1.1", Money::new(300_000), fecha(3, 10)).objeto("Tres"))
        .await
        .unwrap();

    let filas = engine
        .reporte_ejecucion_gastos(&tenant, Some(2))
        .await
        .unwrap();
    let fila = filas
        .iter()
        .find(|fila| fila.codigo.as_str() == "2.1.1")
        .unwrap();
    assert_eq!(fila.cdp.anterior, Money::new(100_000));
    assert_eq!(fila.cdp.mes, Money::new(200_000));
    assert_eq!(fila.cdp.acumulado(), Money::new(300_000));
    assert_eq!(fila.saldo_disponible(), Money::new(700_000));

    let reconocimiento = engine
        .crear_reconocimiento(
            ReconocimientoCmd::new(&tenant, "3.1", Money::new(500_000), fecha(1, 5))
                .objeto("Predial"),
        )
        .await
        .unwrap();
    engine
        .crear_recaudo(
            RecaudoCmd::new(&tenant, reconocimiento.numero, Money::new(120_000), fecha(2, 20))
                .objeto("Caja"),
        )
        .await
        .unwrap();

    let filas = engine
        .reporte_ejecucion_ingresos(&tenant, Some(2))
        .await
        .unwrap();
    let fila = filas
        .iter()
        .find(|fila| fila.codigo.as_str() == "3.1")
        .unwrap();
    assert_eq!(fila.reconocimientos.anterior, Money::new(500_000));
    assert_eq!(fila.recaudos.mes, Money::new(120_000));
    assert_eq!(fila.saldo_por_recaudar(), Money::new(1_380_000));

    let err = engine
        .reporte_ejecucion_gastos(&tenant, Some(13))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)), "got {err:?}");
}
