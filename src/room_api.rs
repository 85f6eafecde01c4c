use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::RoomApiSettings,
    room::{AccessMap, Permission, Room, RoomMetadata},
};

const MAX_ROOM_PAGES: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum RoomApiError {
    #[error("room {0} does not exist")]
    NotFound(String),
    #[error("room api rejected the credentials ({0})")]
    Unauthorized(StatusCode),
    #[error("room api responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("room api request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected room api payload: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    pub id: String,
    pub metadata: RoomMetadata,
    pub users_accesses: AccessMap,
    pub default_accesses: Vec<Permission>,
}

/// Partial update of a room. Access entries are merged into the existing map
/// by the hosted service.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_accesses: Option<AccessMap>,
}

#[derive(Debug, Default, Serialize)]
pub struct MetadataPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomPage {
    data: Vec<Room>,
    next_cursor: Option<String>,
}

/// Operations offered by the hosted room service.
#[async_trait]
pub trait RoomApi: Send + Sync {
    async fn create_room(&self, room: CreateRoom) -> Result<Room, RoomApiError>;
    async fn get_room(&self, room_id: &str) -> Result<Room, RoomApiError>;
    async fn get_rooms(&self, user_id: &str) -> Result<Vec<Room>, RoomApiError>;
    async fn update_room(&self, room_id: &str, patch: UpdateRoom) -> Result<Room, RoomApiError>;
    async fn delete_room(&self, room_id: &str) -> Result<(), RoomApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpRoomApi {
    client: Client,
    base_url: String,
    secret_key: Secret<String>,
}

impl HttpRoomApi {
    pub fn new(settings: &RoomApiSettings) -> Result<Self, RoomApiError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_milliseconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            secret_key: settings.secret_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/rooms{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.secret_key.expose_secret())
    }

    async fn check(
        &self,
        response: Response,
        room_id: Option<&str>,
    ) -> Result<Response, RoomApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match (status, room_id) {
            (StatusCode::NOT_FOUND, Some(room_id)) => {
                Err(RoomApiError::NotFound(room_id.to_string()))
            }
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
                Err(RoomApiError::Unauthorized(status))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(RoomApiError::Status { status, body })
            }
        }
    }

    async fn room_from(response: Response) -> Result<Room, RoomApiError> {
        response
            .json::<Room>()
            .await
            .map_err(|e| RoomApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RoomApi for HttpRoomApi {
    #[tracing::instrument(name = "create room", skip(self, room), fields(room_id = %room.id))]
    async fn create_room(&self, room: CreateRoom) -> Result<Room, RoomApiError> {
        let response = self
            .authorized(self.client.post(self.url("")))
            .json(&room)
            .send()
            .await?;
        let response = self.check(response, None).await?;
        Self::room_from(response).await
    }

    #[tracing::instrument(name = "get room", skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Room, RoomApiError> {
        let response = self
            .authorized(self.client.get(self.url(&format!("/{room_id}"))))
            .send()
            .await?;
        let response = self.check(response, Some(room_id)).await?;
        Self::room_from(response).await
    }

    #[tracing::instrument(name = "get rooms", skip(self))]
    async fn get_rooms(&self, user_id: &str) -> Result<Vec<Room>, RoomApiError> {
        let mut rooms = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_ROOM_PAGES {
            let mut query = vec![("userId", user_id.to_string())];
            if let Some(cursor) = &cursor {
                query.push(("startingAfter", cursor.clone()));
            }

            let response = self
                .authorized(self.client.get(self.url("")))
                .query(&query)
                .send()
                .await?;
            let page = self
                .check(response, None)
                .await?
                .json::<RoomPage>()
                .await
                .map_err(|e| RoomApiError::Decode(e.to_string()))?;

            rooms.extend(page.data);
            match page.next_cursor {
                Some(next) if cursor.as_ref() == Some(&next) => {
                    tracing::warn!(cursor = %next, "room api repeated its cursor, stopping");
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = rooms.len(), "fetched rooms");
        Ok(rooms)
    }

    #[tracing::instrument(name = "update room", skip(self, patch))]
    async fn update_room(&self, room_id: &str, patch: UpdateRoom) -> Result<Room, RoomApiError> {
        let response = self
            .authorized(self.client.post(self.url(&format!("/{room_id}"))))
            .json(&patch)
            .send()
            .await?;
        let response = self.check(response, Some(room_id)).await?;
        Self::room_from(response).await
    }

    #[tracing::instrument(name = "delete room", skip(self))]
    async fn delete_room(&self, room_id: &str) -> Result<(), RoomApiError> {
        let response = self
            .authorized(self.client.delete(self.url(&format!("/{room_id}"))))
            .send()
            .await?;
        self.check(response, Some(room_id)).await?;
        Ok(())
    }
}
