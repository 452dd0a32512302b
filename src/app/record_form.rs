//! Create and edit forms for a single user record.
use crate::api::{ApiClient, UserId};
use crate::app::form::{FormState, RECORD_FIELDS};
use crate::error::ClientError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

#[derive(Clone, Debug)]
pub struct RecordForm {
    pub mode: FormMode,
    pub form: FormState,
    /// Set while an edit form waits for its record.
    pub loading: bool,
}

/// Look up one record for editing.
///
/// The backend has no by-id read, so this fetches the whole collection and
/// searches it linearly.
pub async fn load_for_edit(api: &ApiClient, id: UserId) -> Result<FormState, ClientError> {
    let users = api.list_users("Could not load user").await?;
    match users.iter().find(|u| u.id == id) {
        Some(record) => Ok(FormState::from_record(record)),
        None => {
            tracing::warn!(%id, "user not in collection");
            Err(ClientError::NotFound("User not found".into()))
        }
    }
}

impl RecordForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            form: FormState::new(RECORD_FIELDS),
            loading: false,
        }
    }

    pub fn edit(id: UserId) -> Self {
        Self {
            mode: FormMode::Edit(id),
            form: FormState::new(RECORD_FIELDS),
            loading: true,
        }
    }

    /// Fill the form from the backend. Only meaningful in edit mode.
    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let FormMode::Edit(id) = self.mode else {
            return Ok(());
        };
        let res = load_for_edit(api, id).await;
        self.loading = false;
        match res {
            Ok(state) => {
                self.form = state;
                Ok(())
            }
            Err(e) => {
                self.form.fail(&e);
                Err(e)
            }
        }
    }

    /// POST the fields as entered; no local validation.
    pub async fn submit_create(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        self.form.begin_submit();
        let res = api.create_user(&self.form.payload()).await;
        self.finish(res, "user created")
    }

    /// PUT the full field set. An empty password is sent as-is.
    pub async fn submit_edit(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let FormMode::Edit(id) = self.mode else {
            return Err(ClientError::validation("No record selected"));
        };
        self.form.begin_submit();
        let res = api.update_user(id, &self.form.payload()).await;
        self.finish(res, "user updated")
    }

    pub async fn submit(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        match self.mode {
            FormMode::Create => self.submit_create(api).await,
            FormMode::Edit(_) => self.submit_edit(api).await,
        }
    }

    fn finish(&mut self, res: Result<(), ClientError>, what: &str) -> Result<(), ClientError> {
        match &res {
            Ok(()) => {
                tracing::info!(mode = ?self.mode, "{what}");
                self.form.succeed();
            }
            Err(e) => self.form.fail(e),
        }
        res
    }

    pub fn success_message(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "User created successfully",
            FormMode::Edit(_) => "User updated successfully",
        }
    }
}
