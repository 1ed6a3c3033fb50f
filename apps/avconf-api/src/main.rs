//! AV 配置库 HTTP API
//!
//! 启动流程：加载 .env → 读取配置 → 初始化日志 → 建立连接池 → 注入存储 → 启动 axum。

mod handlers;
mod middleware;
mod routes;
mod utils;

use avconf_config::AppConfig;
use avconf_storage::{
    BuildingStore, DefinitionStore, DeviceStore, PgBuildingStore, PgDefinitionStore,
    PgDeviceStore, PgPortConfigurationStore, PgRoomStore, PortConfigurationStore, RoomStore,
    connect_pool,
};
use avconf_telemetry::init_tracing;
use axum::{Router, middleware::from_fn};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 应用状态：各存储接口的共享实例
#[derive(Clone)]
pub struct AppState {
    pub building_store: Arc<dyn BuildingStore>,
    pub room_store: Arc<dyn RoomStore>,
    pub device_store: Arc<dyn DeviceStore>,
    pub port_store: Arc<dyn PortConfigurationStore>,
    pub definition_store: Arc<dyn DefinitionStore>,
}

impl AppState {
    /// 所有 Postgres 存储共用同一个连接池
    fn postgres(pool: PgPool) -> Self {
        Self {
            building_store: Arc::new(PgBuildingStore::new(pool.clone())),
            room_store: Arc::new(PgRoomStore::new(pool.clone())),
            device_store: Arc::new(PgDeviceStore::new(pool.clone())),
            port_store: Arc::new(PgPortConfigurationStore::new(pool.clone())),
            definition_store: Arc::new(PgDefinitionStore::new(pool)),
        }
    }
}

/// 组装路由与中间件
fn build_app(state: AppState) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(from_fn(middleware::request_context))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let pool = connect_pool(&config.database_url, config.database_max_connections).await?;
    let app = build_app(AppState::postgres(pool));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "avconf-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use avconf_storage::InMemoryConfigDb;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    impl AppState {
        fn in_memory(db: Arc<InMemoryConfigDb>) -> Self {
            Self {
                building_store: db.clone(),
                room_store: db.clone(),
                device_store: db.clone(),
                port_store: db.clone(),
                definition_store: db,
            }
        }
    }

    fn test_app() -> Router {
        let db = Arc::new(InMemoryConfigDb::with_default_definitions());
        build_app(AppState::in_memory(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("encode")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        (status, bytes)
    }

    fn json_body(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).expect("json body")
    }

    fn text_body(bytes: &Bytes) -> String {
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    /// 楼宇 JKB、房间 101、设备 D1（AudioOut / on）
    async fn seeded_app() -> Router {
        let app = test_app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/buildings",
            Some(json!({"name": "Joseph Knight Building", "shortname": "JKB"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            Method::POST,
            "/rooms",
            Some(json!({"name": "101", "building": "JKB", "vlan": 210})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(
            &app,
            Method::POST,
            "/buildings/JKB/rooms/101/devices/D1",
            Some(device_body("D1", &["AudioOut"])),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", text_body(&body));
        app
    }

    fn device_body(name: &str, roles: &[&str]) -> Value {
        json!({
            "name": name,
            "address": "10.0.0.1",
            "output": true,
            "building": "JKB",
            "room": "101",
            "type": "dsp",
            "class": "audio",
            "roles": roles,
            "powerStates": ["on"]
        })
    }

    #[tokio::test]
    async fn health_sets_request_ids() {
        let app = test_app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("x-trace-id"));
    }

    #[tokio::test]
    async fn make_room_returns_aggregate() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/buildings/JKB/rooms/101", None).await;
        assert_eq!(status, StatusCode::OK);
        let room = json_body(&body);
        assert_eq!(room["building"]["shortname"], "JKB");
        assert_eq!(room["vlan"], 210);
        assert_eq!(room["devices"].as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, Method::GET, "/rooms", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)[0]["devices"], json!([]));
    }

    #[tokio::test]
    async fn make_room_in_unknown_building_fails() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/rooms",
            Some(json!({"name": "101", "building": "ZZZ", "vlan": 210})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            text_body(&body),
            "could not find a building with the \"ZZZ\" shortname"
        );
        let (status, body) = send(&app, Method::GET, "/buildings/ZZZ/rooms/101", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "no room found for ZZZ-101");
    }

    #[tokio::test]
    async fn building_lookup_by_id_shortname_and_name() {
        let app = seeded_app().await;
        for uri in ["/buildings/1", "/buildings/JKB", "/buildings/Joseph%20Knight%20Building"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json_body(&body)["shortname"], "JKB");
        }
        let (status, body) = send(&app, Method::GET, "/buildings/99", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "no building found for 99");
    }

    #[tokio::test]
    async fn device_lookups() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/buildings/JKB/rooms/101/devices/D1", None).await;
        assert_eq!(status, StatusCode::OK);
        let device = json_body(&body);
        assert_eq!(device["type"], "dsp");
        assert_eq!(device["roles"], json!(["AudioOut"]));
        assert_eq!(device["powerStates"], json!(["on"]));
        assert!(device["room"].get("devices").is_none());

        let (status, _) = send(&app, Method::GET, "/devices/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, Method::GET, "/devices/999", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "no devices found for id 999");
        let (status, _) = send(&app, Method::GET, "/devices/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn role_filters() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/rooms/1/roles/2/devices", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body).as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, Method::GET, "/rooms/1/roles/1/devices", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!([]));

        let (status, body) = send(&app, Method::GET, "/buildings/JKB/rooms/101/role/AudioOut", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)[0]["name"], "D1");

        let (status, _) = send(&app, Method::GET, "/rooms/one/roles/2/devices", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn set_attribute_validates_value() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::PUT,
            "/devices/1/attribute",
            Some(json!({"attributeName": "muted", "attributeValue": "frobnicate"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "invalid value for a boolean column: frobnicate");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/devices/1/attribute",
            Some(json!({"attributeName": "muted", "attributeValue": "true"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["muted"], true);

        let (_, body) = send(&app, Method::GET, "/devices/1", None).await;
        assert_eq!(json_body(&body)["muted"], true);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/devices/1/attribute",
            Some(json!({"attributeName": "bogus", "attributeValue": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "invalid column name: bogus");
    }

    #[tokio::test]
    async fn set_attribute_by_location() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::PUT,
            "/buildings/JKB/rooms/101/devices/D1/attributes/displayName/Mixer",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["displayName"], "Mixer");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/buildings/JKB/rooms/101/devices/D9/attributes/displayName/Mixer",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "no device found at JKB-101-D9");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/buildings/JKB/rooms/101/devices/D1/attributes/volume/loud",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "invalid value for an integer column: loud");
    }

    #[tokio::test]
    async fn create_device_checks_path_and_roles() {
        let app = seeded_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/buildings/JKB/rooms/101/devices/D2",
            Some(device_body("D3", &[])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/buildings/JKB/rooms/101/devices/D2",
            Some(device_body("D2", &["Cooler"])),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(&body), "device role definition: Cooler does not exist");
        let (status, _) = send(&app, Method::GET, "/buildings/JKB/rooms/101/devices/D2", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = send(
            &app,
            Method::POST,
            "/buildings/JKB/rooms/101/devices/D1",
            Some(device_body("D1", &[])),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            text_body(&body),
            "device already exists in room, please choose a different name"
        );
    }

    #[tokio::test]
    async fn port_configuration_id_must_match() {
        let app = seeded_app().await;
        let config = json!({
            "id": 4,
            "portID": 1,
            "sourceDeviceID": 1,
            "destinationDeviceID": 1,
            "hostDeviceID": 1
        });
        let (status, _) = send(&app, Method::POST, "/portconfigurations/5", Some(config)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = send(&app, Method::GET, "/portconfigurations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!([]));
    }

    #[tokio::test]
    async fn definitions_are_listed() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/definitions/powerstates", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<Value> = json_body(&body)
            .as_array()
            .expect("array")
            .iter()
            .map(|item| item["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("on"), json!("standby"), json!("off")]);
        for uri in ["/definitions/roles", "/definitions/types", "/definitions/classes"] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }
}
