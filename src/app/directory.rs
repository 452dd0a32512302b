//! Paged user directory for administrators.
//!
//! Holds a transient copy of `GET /admin/users`, reversed so the most
//! recently created records come first. Nothing here outlives the screen.
use crate::api::{ApiClient, UserId, UserRecord};
use crate::error::ClientError;

pub const PAGE_SIZE: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}

/// Answer to the delete prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Cancel,
    Confirm,
}

#[derive(Clone, Debug)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
    /// 1-based.
    page: usize,
    expanded: Option<UserId>,
    /// Row under the cursor, relative to the visible page.
    cursor: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            page: 1,
            expanded: None,
            cursor: 0,
            loading: false,
            error: None,
        }
    }

    /// Replace the list with `users` (server order) and go back to page 1.
    pub fn replace(&mut self, mut users: Vec<UserRecord>) {
        users.reverse();
        self.users = users;
        self.page = 1;
        self.cursor = 0;
        if let Some(id) = self.expanded
            && !self.users.iter().any(|u| u.id == id)
        {
            self.expanded = None;
        }
    }

    /// Fetch the whole collection. Repeated calls replace, never append.
    /// On failure the current list is kept and the error shown.
    pub async fn fetch_all(&mut self, api: &ApiClient) -> Result<&[UserRecord], ClientError> {
        self.loading = true;
        let res = api.list_users("Could not load users").await;
        self.loading = false;
        match res {
            Ok(users) => {
                tracing::info!(count = users.len(), "users loaded");
                self.error = None;
                self.replace(users);
                Ok(&self.users)
            }
            Err(e) => {
                self.error = Some(e.message().to_string());
                Err(e)
            }
        }
    }

    /// Delete after an explicit confirmation, then refetch.
    ///
    /// `Cancel` issues no request. A failed DELETE leaves the list,
    /// page and expansion untouched.
    pub async fn remove(
        &mut self,
        api: &ApiClient,
        id: UserId,
        display_name: &str,
        confirmation: Confirmation,
    ) -> Result<bool, ClientError> {
        if confirmation == Confirmation::Cancel {
            tracing::debug!(%id, "delete cancelled");
            return Ok(false);
        }
        if let Err(e) = api.delete_user(id).await {
            self.error = Some(e.message().to_string());
            return Err(e);
        }
        tracing::info!(%id, name = display_name, "user deleted");
        self.expanded = None;
        self.fetch_all(api).await?;
        Ok(true)
    }

    /// At most one record is expanded; selecting it again collapses it.
    pub fn toggle_expand(&mut self, id: UserId) {
        self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
    }

    pub fn expanded(&self) -> Option<UserId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: UserId) -> bool {
        self.expanded == Some(id)
    }

    /// Move one page, staying within `[1, total_pages]`.
    pub fn paginate(&mut self, direction: PageDirection) {
        let last = self.total_pages().max(1);
        let next = match direction {
            PageDirection::Prev if self.page > 1 => self.page - 1,
            PageDirection::Next if self.page < last => self.page + 1,
            _ => return,
        };
        self.page = next;
        self.cursor = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.users.len().div_ceil(PAGE_SIZE)
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn visible(&self) -> &[UserRecord] {
        let start = ((self.page - 1) * PAGE_SIZE).min(self.users.len());
        let end = (self.page * PAGE_SIZE).min(self.users.len());
        &self.users[start..end]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, up: bool) {
        let len = self.visible().len();
        if up {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn selected(&self) -> Option<&UserRecord> {
        self.visible().get(self.cursor)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
