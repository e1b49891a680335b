use crate::protocol::UserId;

/// The authenticated user for one run of the client.
///
/// Created by the controller when a login succeeds and dropped on logout.
/// Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    username: String,
}

impl Session {
    pub fn new(user_id: UserId, username: String) -> Self {
        Self { user_id, username }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
