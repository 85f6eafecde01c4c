use std::sync::Arc;

use rand::Rng;

use crate::{
    room::{AccessMap, Permission, Room, RoomMetadata, UserType, DEFAULT_TITLE},
    room_api::{CreateRoom, MetadataPatch, RoomApi, RoomApiError, UpdateRoom},
    view_cache::{document_path, ViewCache, ROOT_PATH},
};

const ROOM_ID_LENGTH: usize = 21;
const ROOM_ID_ALPHABET: &[u8] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("document {0} was not found")]
    NotFound(String),
    #[error("permission denied")]
    PermissionDenied,
    #[error("room service unavailable: {0}")]
    Transient(String),
    #[error("invalid room service response: {0}")]
    InvalidResponse(String),
}

impl From<RoomApiError> for ActionError {
    fn from(error: RoomApiError) -> Self {
        match error {
            RoomApiError::NotFound(room_id) => Self::NotFound(room_id),
            RoomApiError::Unauthorized(_) => Self::PermissionDenied,
            RoomApiError::Decode(reason) => Self::InvalidResponse(reason),
            error @ (RoomApiError::Status { .. } | RoomApiError::Transport(_)) => {
                Self::Transient(error.to_string())
            }
        }
    }
}

/// Outcome of a delete. The caller is sent back to `redirect_to` whether or
/// not the hosted service accepted the delete.
#[derive(Debug)]
pub struct Deletion {
    pub redirect_to: &'static str,
    pub result: Result<(), ActionError>,
}

/// The document operations available to the frontend, each one a single call
/// against the hosted room service.
pub struct DocumentActions {
    rooms: Arc<dyn RoomApi>,
    cache: ViewCache,
}

impl DocumentActions {
    pub fn new(rooms: Arc<dyn RoomApi>) -> Self {
        Self {
            rooms,
            cache: ViewCache::new(),
        }
    }

    #[tracing::instrument(name = "create document", skip(self))]
    pub async fn create_document(
        &self,
        creator_id: &str,
        email: &str,
    ) -> Result<Room, ActionError> {
        let room_id = generate_room_id();

        let request = CreateRoom {
            id: room_id,
            metadata: RoomMetadata {
                creator_id: creator_id.to_string(),
                email: email.to_string(),
                title: DEFAULT_TITLE.to_string(),
            },
            users_accesses: AccessMap::from([(email.to_string(), [Permission::Write].into())]),
            default_accesses: vec![],
        };

        let room = self.rooms.create_room(request).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while creating a room");
            ActionError::from(error)
        })?;

        self.cache.revalidate(ROOT_PATH);
        tracing::info!(room_id = %room.id, "document created");
        Ok(room)
    }

    #[tracing::instrument(name = "get document", skip(self))]
    pub async fn get_document(&self, room_id: &str) -> Result<Room, ActionError> {
        self.rooms.get_room(room_id).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while retrieving a room");
            ActionError::from(error)
        })
    }

    #[tracing::instrument(name = "list documents", skip(self))]
    pub async fn list_documents(&self, email: &str) -> Result<Vec<Room>, ActionError> {
        if let Some(rooms) = self.cache.list(email) {
            return Ok(rooms);
        }

        let generation = self.cache.generation();
        let rooms = self.rooms.get_rooms(email).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while retrieving rooms");
            ActionError::from(error)
        })?;

        self.cache.store_list(email, &rooms, generation);
        Ok(rooms)
    }

    /// Fetches a document on behalf of `email` and classifies them as editor
    /// or viewer. Users absent from the access map of a private room are
    /// refused.
    #[tracing::instrument(name = "document access", skip(self))]
    pub async fn document_access(
        &self,
        room_id: &str,
        email: &str,
    ) -> Result<(Room, UserType), ActionError> {
        let room = self.get_document(room_id).await?;

        if !room.is_accessible_by(email) {
            tracing::warn!("user does not have access to document");
            return Err(ActionError::PermissionDenied);
        }

        let user_type = room.user_type(email);
        Ok((room, user_type))
    }

    #[tracing::instrument(name = "update title", skip(self))]
    pub async fn update_title(&self, room_id: &str, title: &str) -> Result<Room, ActionError> {
        let patch = UpdateRoom {
            metadata: Some(MetadataPatch {
                title: Some(title.to_string()),
            }),
            ..Default::default()
        };

        let room = self.rooms.update_room(room_id, patch).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while updating the document title");
            ActionError::from(error)
        })?;

        self.cache.revalidate(&document_path(room_id));
        self.cache.revalidate(ROOT_PATH);
        Ok(room)
    }

    #[tracing::instrument(name = "delete document", skip(self))]
    pub async fn delete_document(&self, room_id: &str) -> Deletion {
        let result = self.rooms.delete_room(room_id).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while deleting a room");
            ActionError::from(error)
        });

        self.cache.revalidate(&document_path(room_id));
        self.cache.revalidate(ROOT_PATH);

        Deletion {
            redirect_to: ROOT_PATH,
            result,
        }
    }

    #[tracing::instrument(name = "share access", skip(self))]
    pub async fn share_access(
        &self,
        room_id: &str,
        email: &str,
        user_type: UserType,
    ) -> Result<Room, ActionError> {
        let patch = UpdateRoom {
            users_accesses: Some(AccessMap::from([(
                email.to_string(),
                user_type.permissions(),
            )])),
            ..Default::default()
        };

        let room = self.rooms.update_room(room_id, patch).await.map_err(|error| {
            tracing::error!(?error, "an error occurred while sharing the document");
            ActionError::from(error)
        })?;

        self.cache.revalidate(&document_path(room_id));
        self.cache.revalidate(ROOT_PATH);
        Ok(room)
    }
}

fn generate_room_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_ID_LENGTH)
        .map(|_| char::from(ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())]))
        .collect()
}
