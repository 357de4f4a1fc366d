use super::db::MemoryDb;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

pub struct MemoryUserRepo {
    db: Arc<MemoryDb>,
}

impl MemoryUserRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryUserRepo { db }
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        username: &str,
    ) -> Result<UserId, AuthError> {
        // The entry claim is the uniqueness check; losers of a race see
        // Occupied, same as a dup-key insert.
        match self.db.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AuthError::UsernameTaken),
            Entry::Vacant(slot) => {
                let user_id = self.db.allocate_user_id();
                slot.insert(user_id);
                self.db.users.insert(
                    user_id,
                    UserRecord {
                        user_id,
                        username: username.to_string(),
                        first_name: None,
                        last_name: None,
                        city: None,
                        state: None,
                        country: None,
                        profile_picture_url: None,
                        birth_date: None,
                        is_active: true,
                        created_at: Utc::now(),
                    },
                );
                Ok(user_id)
            }
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let Some(user_id) = self.db.usernames.get(username).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self
            .db
            .users
            .get(&user_id)
            .filter(|u| u.is_active)
            .map(|u| u.clone()))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.db.usernames.contains_key(username))
    }

    async fn id_exists(&self, user_id: UserId) -> Result<bool, AuthError> {
        Ok(self
            .db
            .users
            .get(&user_id)
            .map(|u| u.is_active)
            .unwrap_or(false))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileUpdate,
    ) -> Result<(), AuthError> {
        let Some(mut user) = self.db.users.get_mut(&user_id) else {
            return Err(AuthError::UserNotFound);
        };
        if !user.is_active {
            return Err(AuthError::UserNotFound);
        }

        if let Some(v) = &changes.first_name {
            user.first_name = Some(v.clone());
        }
        if let Some(v) = &changes.last_name {
            user.last_name = Some(v.clone());
        }
        if let Some(v) = &changes.city {
            user.city = Some(v.clone());
        }
        if let Some(v) = &changes.state {
            user.state = Some(v.clone());
        }
        if let Some(v) = &changes.country {
            user.country = Some(v.clone());
        }
        if let Some(v) = &changes.profile_picture_url {
            user.profile_picture_url = Some(v.clone());
        }
        if let Some(v) = changes.birth_date {
            user.birth_date = Some(v);
        }

        Ok(())
    }
}
