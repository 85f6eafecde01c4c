use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::Request,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    actions::DocumentActions,
    auth::auth_middleware,
    configuration::Settings,
    room_api::{HttpRoomApi, RoomApi},
    routes,
};

pub struct Application {
    listener: TcpListener,
    router: Router,
    port: u16,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let room_api = HttpRoomApi::new(&settings.room_api)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        Self::build_with_room_api(settings, Arc::new(room_api)).await
    }

    /// Builds the application around an already constructed room service
    /// client. The client lives as long as the application.
    pub async fn build_with_room_api(
        settings: Settings,
        room_api: Arc<dyn RoomApi>,
    ) -> Result<Self, std::io::Error> {
        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );

        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();

        let actions = Arc::new(DocumentActions::new(room_api));

        let router = Router::new()
            .route(
                "/documents",
                post(routes::create_document).get(routes::list_documents),
            )
            .route(
                "/documents/:room_id",
                get(routes::get_document).delete(routes::delete_document),
            )
            .route("/documents/:room_id/title", patch(routes::update_title))
            .route("/documents/:room_id/share", post(routes::share_document))
            .route_layer(middleware::from_fn_with_state(
                settings.application.signing_key,
                auth_middleware,
            ))
            .route("/health_check", get(routes::health_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http().make_span_with(
                |request: &Request| {
                    tracing::info_span!(
                        "http request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            )))
            .with_state(actions);

        Ok(Self {
            listener,
            router,
            port,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", self.listener.local_addr()?);
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
