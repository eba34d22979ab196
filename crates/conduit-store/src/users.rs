use async_trait::async_trait;
use conduit_core::model::{UpdateUser, UpdateUserViaTags, User, UserQuery};
use conduit_core::{ManagerError, UserManager};
use dashmap::DashMap;

use crate::keys::validate_limits;
use crate::{new_id, now, page, shares_tag};

/// Users held in memory
#[derive(Default)]
pub struct MemoryUsers {
    users: DashMap<String, User>,
}

fn validate(user: &User) -> Result<(), ManagerError> {
    if user.name.is_empty() {
        return Err(ManagerError::validation("user name is empty"));
    }
    if user.user_id.is_empty() {
        return Err(ManagerError::validation("user id is empty"));
    }
    validate_limits(&user.limits)
}

fn apply(user: &mut User, update: UpdateUser) {
    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(tags) = update.tags {
        user.tags = tags;
    }
    if let Some(key_ids) = update.key_ids {
        user.key_ids = key_ids;
    }
    if let Some(revoked) = update.revoked {
        user.revoked = revoked;
    }
    if let Some(reason) = update.revoked_reason {
        user.revoked_reason = reason;
    }
    if let Some(paths) = update.allowed_paths {
        user.allowed_paths = paths;
    }
    if let Some(models) = update.allowed_models {
        user.allowed_models = models;
    }
    if let Some(limit) = update.cost_limit_in_usd {
        user.limits.cost_limit_in_usd = limit;
    }
    if let Some(limit) = update.rate_limit_over_time {
        user.limits.rate_limit_over_time = limit;
    }
}

impl MemoryUsers {
    fn store(&self, id: &str, update: UpdateUser) -> Result<User, ManagerError> {
        let mut stored = self
            .users
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(format!("user {id} is not found")))?;

        let mut user = stored.clone();
        apply(&mut user, update);
        validate(&user)?;

        user.updated_at = now();
        *stored = user.clone();
        Ok(user)
    }
}

#[async_trait]
impl UserManager for MemoryUsers {
    async fn create_user(&self, mut user: User) -> Result<User, ManagerError> {
        validate(&user)?;

        if self
            .users
            .iter()
            .any(|entry| entry.user_id == user.user_id && shares_tag(&entry.tags, &user.tags))
        {
            return Err(ManagerError::validation(format!(
                "user {} already exists for these tags",
                user.user_id
            )));
        }

        user.id = new_id();
        user.created_at = now();
        user.updated_at = user.created_at;
        self.users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn update_user(&self, id: &str, update: UpdateUser) -> Result<User, ManagerError> {
        self.store(id, update)
    }

    async fn update_user_via_tags_and_user_id(&self, update: UpdateUserViaTags) -> Result<User, ManagerError> {
        if update.user_id.is_empty() {
            return Err(ManagerError::validation("user id is empty"));
        }
        if update.tags.is_empty() {
            return Err(ManagerError::validation("tags are empty"));
        }

        let id = self
            .users
            .iter()
            .find(|entry| entry.user_id == update.user_id && update.tags.iter().all(|tag| entry.tags.contains(tag)))
            .map(|entry| entry.key().clone())
            .ok_or_else(|| ManagerError::not_found(format!("user {} is not found", update.user_id)))?;

        self.store(&id, update.update)
    }

    async fn get_users(&self, query: UserQuery) -> Result<Vec<User>, ManagerError> {
        if query.offset < 0 || query.limit < 0 {
            return Err(ManagerError::validation("limit and offset can not be negative"));
        }

        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| {
                shares_tag(&entry.tags, &query.tags)
                    || shares_tag(&entry.key_ids, &query.key_ids)
                    || query.user_ids.contains(&entry.user_id)
            })
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.user_id.cmp(&b.user_id)));

        Ok(page(users, query.offset, query.limit))
    }
}

#[cfg(test)]
mod tests {
    use conduit_core::ErrorKind;

    use super::*;

    fn user(user_id: &str, tags: &[&str]) -> User {
        User {
            name: format!("user {user_id}"),
            user_id: user_id.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn name_and_user_id_are_required() {
        let users = MemoryUsers::default();

        let mut unnamed = user("u-1", &[]);
        unnamed.name.clear();
        assert_eq!(users.create_user(unnamed).await.unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(users.create_user(user("", &[])).await.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn update_via_tags_finds_user() {
        let users = MemoryUsers::default();
        let created = users.create_user(user("u-1", &["org-1", "team"])).await.unwrap();

        let updated = users
            .update_user_via_tags_and_user_id(UpdateUserViaTags {
                tags: vec!["org-1".to_owned()],
                user_id: "u-1".to_owned(),
                update: UpdateUser {
                    revoked: Some(true),
                    ..UpdateUser::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert!(updated.revoked);

        let err = users
            .update_user_via_tags_and_user_id(UpdateUserViaTags {
                tags: vec!["org-2".to_owned()],
                user_id: "u-1".to_owned(),
                update: UpdateUser::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn listing_matches_any_filter_and_pages() {
        let users = MemoryUsers::default();
        users.create_user(user("u-1", &["a"])).await.unwrap();
        users.create_user(user("u-2", &["b"])).await.unwrap();
        users.create_user(user("u-3", &["c"])).await.unwrap();

        let found = users
            .get_users(UserQuery {
                tags: vec!["a".to_owned()],
                user_ids: vec!["u-3".to_owned()],
                ..UserQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let paged = users
            .get_users(UserQuery {
                tags: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
                offset: 1,
                limit: 1,
                ..UserQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(paged.len(), 1);
    }

    #[tokio::test]
    async fn update_of_absent_user_is_not_found() {
        let users = MemoryUsers::default();
        let err = users.update_user("missing", UpdateUser::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
