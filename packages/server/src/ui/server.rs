//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    Collaborators, CreateRoomUseCase, GameCoordinator, GameSettings, GetRoomDetailUseCase,
    GetRoomsUseCase,
};

use super::{
    handler::{create_room, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Goji game server
///
/// # Example
///
/// ```ignore
/// let server = Server::with_collaborators(collaborators, GameSettings::default());
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// GameCoordinator（Room とラウンドのライフサイクル）
    coordinator: Arc<GameCoordinator>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    pub fn new(
        coordinator: Arc<GameCoordinator>,
        create_room_usecase: Arc<CreateRoomUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            coordinator,
            create_room_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Build the coordinator and the HTTP use cases on top of the same collaborators
    pub fn with_collaborators(collaborators: Collaborators, settings: GameSettings) -> Self {
        let repository = collaborators.repository.clone();
        let user_directory = collaborators.user_directory.clone();
        let coordinator = GameCoordinator::new(collaborators, settings);

        Self::new(
            coordinator.clone(),
            Arc::new(CreateRoomUseCase::new(repository.clone(), user_directory)),
            Arc::new(GetRoomsUseCase::new(repository.clone(), coordinator.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository, coordinator)),
        )
    }

    /// Router with every endpoint
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator,
            create_room_usecase: self.create_room_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", post(create_room).get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the game server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Goji server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?player_id=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
