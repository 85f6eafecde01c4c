use serde::Serialize;

use crate::{
    actions::{ActionError, DocumentActions},
    room::{Room, UserType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleState {
    Viewing,
    Editing,
    Saving,
}

/// What the caller has to do after a confirm keystroke.
#[derive(Debug, PartialEq, Eq)]
pub enum Confirm {
    Unchanged,
    Persist(String),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TitleEditor {
    state: TitleState,
    user_type: UserType,
    persisted: String,
    draft: String,
}

impl TitleEditor {
    pub fn new(title: impl Into<String>, user_type: UserType) -> Self {
        let persisted = title.into();
        Self {
            state: TitleState::Viewing,
            user_type,
            draft: persisted.clone(),
            persisted,
        }
    }

    pub fn state(&self) -> TitleState {
        self.state
    }

    pub fn persisted(&self) -> &str {
        &self.persisted
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_saving(&self) -> bool {
        self.state == TitleState::Saving
    }

    pub fn shows_edit_affordance(&self) -> bool {
        self.user_type == UserType::Editor && self.state == TitleState::Viewing
    }

    pub fn shows_view_only_badge(&self) -> bool {
        self.user_type != UserType::Editor && self.state == TitleState::Viewing
    }

    pub fn begin_edit(&mut self) -> bool {
        if self.user_type != UserType::Editor || self.state != TitleState::Viewing {
            return false;
        }
        self.state = TitleState::Editing;
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.state == TitleState::Editing {
            self.draft = text.into();
        }
    }

    pub fn confirm(&mut self) -> Confirm {
        if self.state != TitleState::Editing {
            return Confirm::Ignored;
        }

        if self.draft == self.persisted {
            self.state = TitleState::Viewing;
            return Confirm::Unchanged;
        }

        self.state = TitleState::Saving;
        Confirm::Persist(self.draft.clone())
    }

    // A failed save goes back to editing with the draft kept.
    pub fn finish_save(&mut self, result: Result<&Room, &ActionError>) {
        if self.state != TitleState::Saving {
            return;
        }

        match result {
            Ok(room) => {
                self.persisted = room.title().to_string();
                self.draft = self.persisted.clone();
                self.state = TitleState::Viewing;
            }
            Err(error) => {
                tracing::warn!(%error, "title was not saved");
                self.state = TitleState::Editing;
            }
        }
    }

    pub fn click_outside(&mut self) {
        if self.state == TitleState::Editing {
            self.draft = self.persisted.clone();
            self.state = TitleState::Viewing;
        }
    }

    pub async fn commit(
        &mut self,
        actions: &DocumentActions,
        room_id: &str,
    ) -> Result<(), ActionError> {
        let title = match self.confirm() {
            Confirm::Persist(title) => title,
            Confirm::Unchanged | Confirm::Ignored => return Ok(()),
        };

        match actions.update_title(room_id, &title).await {
            Ok(room) => {
                self.finish_save(Ok(&room));
                Ok(())
            }
            Err(error) => {
                self.finish_save(Err(&error));
                Err(error)
            }
        }
    }
}
