use crate::{
    controller::{health_check_controller, message_controller, room_controller},
    params, response,
    subscribe::handler as subscribe_handler,
    AppState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "AMA Rooms API"
        ),
        paths(
            health_check_controller::health_check,
            room_controller::create,
            room_controller::index,
            room_controller::read,
            message_controller::create,
            message_controller::index,
            message_controller::read,
            message_controller::react,
            message_controller::remove_reaction,
            message_controller::mark_as_answered,
            subscribe_handler::subscribe,
        ),
        components(
            schemas(
                domain::rooms::Model,
                domain::messages::Model,
                params::room::CreateParams,
                params::message::CreateParams,
                response::message::ReactionCount,
            )
        ),
        tags(
            (name = "ama_rooms", description = "Ask Me Anything rooms with live updates")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(room_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(subscribe_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn room_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/rooms",
            post(room_controller::create).get(room_controller::index),
        )
        .route("/rooms/{room_id}", get(room_controller::read))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/rooms/{room_id}/messages",
            post(message_controller::create).get(message_controller::index),
        )
        .route(
            "/rooms/{room_id}/messages/{message_id}",
            get(message_controller::read),
        )
        .route(
            "/rooms/{room_id}/messages/{message_id}/react",
            patch(message_controller::react).delete(message_controller::remove_reaction),
        )
        .route(
            "/rooms/{room_id}/messages/{message_id}/answer",
            patch(message_controller::mark_as_answered),
        )
        .with_state(app_state)
}

fn subscribe_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe/{room_id}", get(subscribe_handler::subscribe))
        .with_state(app_state)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use domain::{messages, rooms, Id};
    use events::DomainEvent;
    use fanout::error::ChannelError;
    use fanout::PeerChannel;
    use futures_util::StreamExt;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    const WAIT: Duration = Duration::from_secs(2);

    /// Collects pushed payloads; never closes on its own.
    struct RecordingChannel {
        pushed: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl PeerChannel for RecordingChannel {
        async fn push(&mut self, payload: &str) -> Result<(), ChannelError> {
            self.pushed
                .send(payload.to_owned())
                .map_err(ChannelError::new)
        }

        async fn closed(&mut self) {
            std::future::pending::<()>().await
        }
    }

    fn app_state(db: DatabaseConnection) -> AppState {
        let config = Config::parse_from(["ama_rooms"]);
        AppState::new(config, &Arc::new(db), CancellationToken::new())
    }

    fn room() -> rooms::Model {
        rooms::Model {
            id: Id::new_v4(),
            theme: "Rust".to_owned(),
        }
    }

    /// Serves the routes on an ephemeral local port.
    async fn serve(state: AppState) -> std::net::SocketAddr {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = define_routes(state);
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        timeout(WAIT, async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = define_routes(app_state(db));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn subscribing_to_unknown_room_is_rejected_without_registering() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<rooms::Model>::new()])
            .into_connection();
        let state = app_state(db);
        let app = define_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/subscribe/{}", Id::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Room not found!");
        assert_eq!(state.fanout_manager.room_count(), 0);
    }

    #[tokio::test]
    async fn subscribing_without_upgrade_is_rejected_without_registering() {
        let room = room();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![room.clone()]])
            .into_connection();
        let state = app_state(db);
        let app = define_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/subscribe/{}", room.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.fanout_manager.room_count(), 0);
    }

    #[tokio::test]
    async fn subscribing_with_malformed_room_id_is_bad_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = define_routes(app_state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/subscribe/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn posting_a_message_notifies_room_subscribers() {
        let room = room();
        let message = messages::Model {
            id: Id::new_v4(),
            room_id: room.id,
            message: "How do lifetimes work?".to_owned(),
            reaction_count: 0,
            answered: false,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![room.clone()]])
            .append_query_results(vec![vec![message.clone()]])
            .into_connection();
        let state = app_state(db);

        let (pushed, mut received) = mpsc::unbounded_channel();
        let subscription = state.fanout_manager.subscribe(room.id);
        tokio::spawn(subscription.run(RecordingChannel { pushed }));

        let response = define_routes(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/rooms/{}/messages", room.id))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"message": message.message}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let payload = timeout(WAIT, received.recv())
            .await
            .expect("subscriber should be notified")
            .expect("channel should be open");
        let payload: Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(
            payload,
            json!({
                "kind": "message_created",
                "value": {"id": message.id, "message": message.message}
            })
        );
    }

    #[tokio::test]
    async fn removing_a_reaction_at_zero_is_unprocessable() {
        let room = room();
        let message = messages::Model {
            id: Id::new_v4(),
            room_id: room.id,
            message: "Is async hard?".to_owned(),
            reaction_count: 0,
            answered: false,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![message.clone()],
                Vec::new(),
                vec![message.clone()],
            ])
            .into_connection();
        let app = define_routes(app_state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/rooms/{}/messages/{}/react", room.id, message.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn websocket_subscriber_receives_text_frames_and_unregisters_on_close() {
        let room = room();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![room.clone()]])
            .into_connection();
        let state = app_state(db);
        let addr = serve(state.clone()).await;
        let manager = Arc::clone(&state.fanout_manager);

        let (mut socket, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}/subscribe/{}", room.id))
                .await
                .unwrap();
        wait_until(|| manager.subscriber_count(&room.id) == 1).await;

        let message_id = Id::new_v4();
        state
            .event_publisher
            .publish(DomainEvent::message_created(
                room.id,
                message_id,
                "Does this arrive as text?",
            ))
            .await;

        let frame = timeout(WAIT, socket.next())
            .await
            .expect("frame should arrive")
            .expect("socket should be open")
            .unwrap();
        assert!(frame.is_text());
        let payload: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
        assert_eq!(
            payload,
            json!({
                "kind": "message_created",
                "value": {"id": message_id, "message": "Does this arrive as text?"}
            })
        );

        socket.close(None).await.unwrap();

        wait_until(|| manager.room_count() == 0).await;
    }

    #[tokio::test]
    async fn dropped_websocket_unregisters_subscriber() {
        let room = room();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![room.clone()]])
            .into_connection();
        let state = app_state(db);
        let addr = serve(state.clone()).await;
        let manager = Arc::clone(&state.fanout_manager);

        let (socket, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}/subscribe/{}", room.id))
                .await
                .unwrap();
        wait_until(|| manager.subscriber_count(&room.id) == 1).await;

        drop(socket);

        wait_until(|| manager.room_count() == 0).await;
    }
}
