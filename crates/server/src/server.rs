use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{calendar, group, memberships, shift, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Resolves Basic credentials against the users table and injects the user
/// model as a request extension, so every handler receives an explicit
/// authenticated requester.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = if let Some(user) = user {
        user
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/me", get(user::me))
        .route("/user", patch(user::update))
        .route("/user/find", get(user::find))
        .route("/group", post(group::create))
        .route("/groups", get(group::list_for_user))
        .route("/group/{group_id}", get(group::get))
        .route("/group/{group_id}/permission", get(memberships::permission))
        .route(
            "/group/{group_id}/members",
            get(memberships::list).post(memberships::add),
        )
        .route(
            "/group/{group_id}/shifts",
            get(shift::list).post(shift::create),
        )
        .route(
            "/group/{group_id}/shifts/{shift_id}/assignees",
            post(shift::assign),
        )
        .route("/group/{group_id}/calendar", get(calendar::month))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        for (username, email) in [
            ("alice", "alice@example.com"),
            ("bob", "bob@example.com"),
        ] {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO users (username, password, email) VALUES (?, ?, ?)",
                vec![username.into(), "password".into(), email.into()],
            ))
            .await
            .unwrap();
        }
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth(username: &str) -> String {
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:password"));
        format!("Basic {token}")
    }

    async fn request(
        router: &Router,
        method: &str,
        uri: &str,
        username: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(username) = username {
            builder = builder.header(header::AUTHORIZATION, basic_auth(username));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_group(router: &Router, username: &str) -> String {
        let (status, body) = request(
            router,
            "POST",
            "/group",
            Some(username),
            Some(json!({"name": "Nightshift", "email": "ns@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn missing_credentials_are_unauthorized() {
        let router = test_router().await;
        let (status, _) = request(&router, "GET", "/groups", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_group_grants_admin_permission() {
        let router = test_router().await;
        let group_id = create_group(&router, "alice").await;

        let (status, body) = request(
            &router,
            "GET",
            &format!("/group/{group_id}/permission"),
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!("ADMIN"));

        let (status, body) = request(
            &router,
            "GET",
            &format!("/group/{group_id}/permission"),
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!(null));
    }

    #[tokio::test]
    async fn only_admins_can_add_members() {
        let router = test_router().await;
        let group_id = create_group(&router, "alice").await;
        let members_uri = format!("/group/{group_id}/members");

        let (status, _) = request(
            &router,
            "POST",
            &members_uri,
            Some("bob"),
            Some(json!({"username": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = request(
            &router,
            "POST",
            &members_uri,
            Some("alice"),
            Some(json!({"username": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // Second add of the same member conflicts.
        let (status, _) = request(
            &router,
            "POST",
            &members_uri,
            Some("alice"),
            Some(json!({"username": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = request(
            &router,
            "GET",
            &format!("/group/{group_id}/permission"),
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(body["role"], json!("USER"));
    }

    #[tokio::test]
    async fn shift_dates_must_be_ordered() {
        let router = test_router().await;
        let group_id = create_group(&router, "alice").await;

        let (status, _) = request(
            &router,
            "POST",
            &format!("/group/{group_id}/shifts"),
            Some("alice"),
            Some(json!({
                "start_at": "2024-03-05T16:00:00Z",
                "end_at": "2024-03-05T08:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn shift_assignment_round_trip() {
        let router = test_router().await;
        let group_id = create_group(&router, "alice").await;
        request(
            &router,
            "POST",
            &format!("/group/{group_id}/members"),
            Some("alice"),
            Some(json!({"username": "bob"})),
        )
        .await;

        let (status, body) = request(
            &router,
            "POST",
            &format!("/group/{group_id}/shifts"),
            Some("alice"),
            Some(json!({
                "start_at": "2024-03-05T08:00:00Z",
                "end_at": "2024-03-05T16:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let shift_id = body["id"].as_str().unwrap().to_string();

        // Assigning twice stays idempotent.
        for _ in 0..2 {
            let (status, _) = request(
                &router,
                "POST",
                &format!("/group/{group_id}/shifts/{shift_id}/assignees"),
                Some("alice"),
                Some(json!({"username": "bob"})),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, body) = request(
            &router,
            "GET",
            &format!("/group/{group_id}/shifts"),
            Some("bob"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shifts"].as_array().unwrap().len(), 1);
        assert_eq!(body["shifts"][0]["assignees"], json!(["bob"]));

        let (status, body) = request(&router, "GET", "/me", Some("bob"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shifts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn calendar_clips_shift_to_start_day() {
        let router = test_router().await;
        let group_id = create_group(&router, "alice").await;

        // Spans March 5th to 7th; only the start day gets the shift.
        request(
            &router,
            "POST",
            &format!("/group/{group_id}/shifts"),
            Some("alice"),
            Some(json!({
                "start_at": "2024-03-05T22:00:00Z",
                "end_at": "2024-03-07T06:00:00Z",
            })),
        )
        .await;

        let (status, body) = request(
            &router,
            "GET",
            &format!("/group/{group_id}/calendar?year=2024&month=3"),
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let cells = body["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 31);
        // March 2024 starts on a Friday.
        assert_eq!(cells[0]["weekday"], json!(5));
        assert_eq!(cells[4]["date"], json!("2024-03-05"));
        assert_eq!(cells[4]["shifts"].as_array().unwrap().len(), 1);
        assert!(cells[5]["shifts"].as_array().unwrap().is_empty());
        assert!(cells[6]["shifts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_email_lookup_is_not_found() {
        let router = test_router().await;

        let (status, body) = request(
            &router,
            "GET",
            "/user/find?email=nobody@example.com",
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, body) = request(
            &router,
            "GET",
            "/user/find?email=bob@example.com",
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], json!("bob"));
    }
}
