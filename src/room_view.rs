use serde::{Deserialize, Serialize};

use crate::{
    room::{Room, UserType},
    title_edit::{TitleEditor, TitleState},
};

/// Connection status reported by the real-time provider in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    NotLoaded,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Loading,
    Live,
    Error,
}

impl From<ConnectionStatus> for Surface {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::NotLoaded | ConnectionStatus::Loading => Surface::Loading,
            ConnectionStatus::Loaded => Surface::Live,
            ConnectionStatus::Error => Surface::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorPlugin {
    RichText,
    History,
    AutoFocus,
    Toolbar,
    FloatingToolbar,
    FloatingComposer,
    Comments,
    DeleteDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorConfig {
    pub namespace: &'static str,
    pub editable: bool,
    pub plugins: Vec<EditorPlugin>,
}

impl EditorConfig {
    pub fn for_user(user_type: UserType) -> Self {
        let editor = user_type == UserType::Editor;

        let mut plugins = vec![EditorPlugin::Toolbar];
        if editor {
            plugins.push(EditorPlugin::DeleteDocument);
        }
        plugins.push(EditorPlugin::RichText);
        if editor {
            plugins.push(EditorPlugin::FloatingToolbar);
        }
        plugins.extend([
            EditorPlugin::History,
            EditorPlugin::AutoFocus,
            EditorPlugin::FloatingComposer,
            EditorPlugin::Comments,
        ]);

        Self {
            namespace: "Editor",
            editable: editor,
            plugins,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleView {
    pub text: String,
    pub state: TitleState,
    pub edit_affordance: bool,
    pub view_only_badge: bool,
    pub saving: bool,
}

impl From<&TitleEditor> for TitleView {
    fn from(editor: &TitleEditor) -> Self {
        let text = match editor.state() {
            TitleState::Viewing => editor.persisted(),
            TitleState::Editing | TitleState::Saving => editor.draft(),
        };

        Self {
            text: text.to_string(),
            state: editor.state(),
            edit_affordance: editor.shows_edit_affordance(),
            view_only_badge: editor.shows_view_only_badge(),
            saving: editor.is_saving(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Collaborator {
    pub email: String,
    pub user_type: UserType,
    pub creator: bool,
}

/// Everything the room screen needs to render one document for one user.
#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub room_id: String,
    pub creator_id: String,
    pub user_type: UserType,
    pub title: TitleView,
    pub editor: EditorConfig,
    pub collaborators: Vec<Collaborator>,
    pub surface: Surface,
}

impl RoomView {
    pub fn new(room: &Room, user_type: UserType, status: ConnectionStatus) -> Self {
        let title = TitleEditor::new(room.title(), user_type);

        let collaborators = room
            .collaborators()
            .into_iter()
            .map(|email| Collaborator {
                user_type: room.user_type(&email),
                creator: email == room.metadata.email,
                email,
            })
            .collect();

        Self {
            room_id: room.id.clone(),
            creator_id: room.metadata.creator_id.clone(),
            user_type,
            title: TitleView::from(&title),
            editor: EditorConfig::for_user(user_type),
            collaborators,
            surface: status.into(),
        }
    }
}
