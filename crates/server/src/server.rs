use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{consolidacion, documentos, modificaciones, reportes, rubros, tenants};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/tenants", post(tenants::crear))
        .route("/rubros", post(rubros::crear))
        .route("/rubros/importar", post(rubros::importar))
        .route("/rubros/sincronizar", post(rubros::sincronizar))
        .route("/rubros/saldo", post(rubros::saldo))
        .route("/rubros/listar", get(rubros::listar).post(rubros::listar))
        .route("/cdp", post(documentos::cdp))
        .route("/rp", post(documentos::rp))
        .route("/obligaciones", post(documentos::obligacion))
        .route("/pagos", post(documentos::pago))
        .route("/reconocimientos", post(documentos::reconocimiento))
        .route("/recaudos", post(documentos::recaudo))
        .route("/documentos/anular", post(documentos::anular))
        .route("/documentos/consultar", post(documentos::consultar))
        .route("/modificaciones/adicion", post(modificaciones::adicion))
        .route("/modificaciones/reduccion", post(modificaciones::reduccion))
        .route("/modificaciones/credito", post(modificaciones::credito))
        .route("/modificaciones/anular", post(modificaciones::anular))
        .route("/equilibrio", post(modificaciones::equilibrio))
        .route("/consolidar", post(consolidacion::consolidar))
        .route("/cierre", post(consolidacion::cierre))
        .route("/vigencia/abrir", post(consolidacion::abrir_vigencia))
        .route("/periodo", post(consolidacion::periodo))
        .route("/reportes/gastos", post(reportes::gastos))
        .route("/reportes/ingresos", post(reportes::ingresos))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn tenant_con_catalogo(app: &Router) -> String {
        let (status, tenant) = post_json(
            app,
            "/tenants",
            json!({ "nombre": "Alcaldía de Prueba", "vigencia": 2026 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let tenant_id = tenant["id"].as_str().unwrap().to_string();

        let (status, importado) = post_json(
            app,
            "/rubros/importar",
            json!({
                "tenant_id": tenant_id,
                "rubros": [
                    { "codigo": "2", "cuenta": "Gastos", "tipo": "gasto", "es_hoja": false, "inicial_centavos": null },
                    { "codigo": "2.1", "cuenta": "Funcionamiento", "tipo": "gasto", "es_hoja": false, "inicial_centavos": null },
                    { "codigo": "2.1.1", "cuenta": "Gastos de personal", "tipo": "gasto", "es_hoja": true, "inicial_centavos": 1_000_000 },
                    { "codigo": "3", "cuenta": "Ingresos", "tipo": "ingreso", "es_hoja": false, "inicial_centavos": null },
                    { "codigo": "3.1", "cuenta": "Ingresos tributarios", "tipo": "ingreso", "es_hoja": true, "inicial_centavos": 1_000_000 }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(importado["importados"], 5);

        let (status, _) = post_json(
            app,
            "/rubros/sincronizar",
            json!({ "tenant_id": tenant_id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        tenant_id
    }

    #[tokio::test]
    async fn expense_chain_over_http() {
        let app = app().await;
        let tenant_id = tenant_con_catalogo(&app).await;

        let (status, cdp) = post_json(
            &app,
            "/cdp",
            json!({
                "tenant_id": tenant_id,
                "codigo_rubro": "2.1.1",
                "valor_centavos": 600_000,
                "fecha": "2026-02-10",
                "objeto": "Prestación de servicios",
                "tercero": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cdp["numero"], 1);
        assert_eq!(cdp["estado"], "ACTIVO");

        let (status, error) = post_json(
            &app,
            "/cdp",
            json!({
                "tenant_id": tenant_id,
                "codigo_rubro": "2.1.1",
                "valor_centavos": 500_000,
                "fecha": "2026-02-11",
                "objeto": "Compra de equipos",
                "tercero": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error["error"].as_str().unwrap().contains("insufficient"));

        let (status, saldo) = post_json(
            &app,
            "/rubros/saldo",
            json!({ "tenant_id": tenant_id, "codigo": "2.1.1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saldo["disponible_centavos"], 400_000);

        let (status, rp) = post_json(
            &app,
            "/rp",
            json!({
                "tenant_id": tenant_id,
                "cdp_numero": 1,
                "valor_centavos": 250_000,
                "fecha": "2026-02-15",
                "objeto": "Contrato 001",
                "tercero": "NIT 900123456"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rp["codigo_rubro"], "2.1.1");
        assert_eq!(rp["padre_numero"], 1);

        let (status, detalle) = post_json(
            &app,
            "/documentos/consultar",
            json!({ "tenant_id": tenant_id, "tipo": "cdp", "numero": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detalle["saldo"]["consumido_centavos"], 250_000);
        assert_eq!(detalle["saldo"]["saldo_centavos"], 350_000);
    }

    #[tokio::test]
    async fn error_statuses_over_http() {
        let app = app().await;
        let tenant_id = tenant_con_catalogo(&app).await;

        let (status, _) = post_json(
            &app,
            "/rubros/saldo",
            json!({ "tenant_id": "no-such-tenant", "codigo": "2.1.1" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post_json(
            &app,
            "/rubros",
            json!({
                "tenant_id": tenant_id,
                "codigo": "2.1.1",
                "cuenta": "Duplicado",
                "tipo": "gasto",
                "es_hoja": true,
                "inicial_centavos": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post_json(
            &app,
            "/cdp",
            json!({
                "tenant_id": tenant_id,
                "codigo_rubro": "2.1",
                "valor_centavos": 1_000,
                "fecha": "2026-02-10",
                "objeto": "Agregador",
                "tercero": null
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reports_and_period_over_http() {
        let app = app().await;
        let tenant_id = tenant_con_catalogo(&app).await;

        let (status, periodo) =
            post_json(&app, "/periodo", json!({ "tenant_id": tenant_id })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(periodo["vigencia"], 2026);
        assert_eq!(periodo["mes_actual"], 1);

        let (status, reporte) = post_json(
            &app,
            "/reportes/gastos",
            json!({ "tenant_id": tenant_id, "mes": null }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let filas = reporte["filas"].as_array().unwrap();
        assert_eq!(filas.len(), 3);
        assert_eq!(filas[0]["codigo"], "2");
        assert_eq!(filas[0]["ppto_definitivo_centavos"], 1_000_000);

        let (status, equilibrio) =
            post_json(&app, "/equilibrio", json!({ "tenant_id": tenant_id })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(equilibrio["equilibrado"], true);
    }
}
