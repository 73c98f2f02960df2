use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permissions,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PermissionData>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    fn has_id(&self) -> bool {
        match &self.id {
            None | Some(Value::Null) => false,
            Some(Value::String(value)) => !value.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: User,
    pub logged_in: bool,
    pub loading: bool,
}

/// Per-request session container. Rebuilt on every request cycle from a fresh
/// user fetch and never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_loading(&mut self) {
        self.state.loading = true;
    }

    pub fn set_user(&mut self, user: User) {
        self.state.logged_in = true;
        self.state.loading = false;
        self.state.user = user;
    }

    pub fn logged_in(&self) -> bool {
        self.state.logged_in && self.state.user.has_id()
    }

    pub fn user_permissions(&self) -> Option<&Value> {
        self.state
            .user
            .permissions
            .data
            .as_ref()
            .and_then(|data| data.projects.as_ref())
    }

    pub fn user(&self) -> &User {
        &self.state.user
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(value: Value) -> User {
        serde_json::from_value(value).expect("user")
    }

    #[test]
    fn fresh_store_is_logged_out() {
        let store = SessionStore::new();
        assert!(!store.logged_in());
        assert!(!store.state().loading);
        assert_eq!(store.user_permissions(), None);
    }

    #[test]
    fn set_user_commits_state() {
        let mut store = SessionStore::new();
        store.begin_loading();
        assert!(store.state().loading);

        store.set_user(user(json!({
            "id": 42,
            "email": "ada@example.com",
            "permissions": { "data": { "projects": { "7": ["read"] } } }
        })));

        assert!(store.logged_in());
        assert!(!store.state().loading);
        assert_eq!(store.user_permissions(), Some(&json!({ "7": ["read"] })));
        assert_eq!(
            store.user().attributes.get("email"),
            Some(&json!("ada@example.com"))
        );
    }

    #[test]
    fn user_without_id_is_not_logged_in() {
        let mut store = SessionStore::new();
        store.set_user(user(json!({ "name": "anonymous" })));
        assert!(store.state().logged_in);
        assert!(!store.logged_in());

        store.set_user(user(json!({ "id": "" })));
        assert!(!store.logged_in());
    }

    #[test]
    fn permissions_without_data_yield_none() {
        let mut store = SessionStore::new();
        store.set_user(user(json!({ "id": 1, "permissions": {} })));
        assert_eq!(store.user_permissions(), None);

        store.set_user(user(json!({ "id": 1, "permissions": { "data": {} } })));
        assert_eq!(store.user_permissions(), None);

        store.set_user(user(json!({ "id": 1, "permissions": null })));
        assert_eq!(store.user_permissions(), None);
    }
}
