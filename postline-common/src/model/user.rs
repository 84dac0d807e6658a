use serde::{Deserialize, Serialize};

/// The author embedded in every post. It has no identity of its own.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub full_name: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) {
        let UserPatch {
            full_name,
            username,
            email,
        } = patch;

        if let Some(full_name) = full_name {
            self.full_name = full_name;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(email) = email {
            self.email = email;
        }
    }
}
