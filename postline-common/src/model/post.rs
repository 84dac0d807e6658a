use crate::model::user::{User, UserPatch};
use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub author: User,
}

/// A partial post as sent with `PATCH`. Absent and `null` fields leave the
/// stored value untouched; a present `author` is merged field by field.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<UserPatch>,
}

impl Post {
    pub fn apply(&mut self, patch: PostPatch) {
        let PostPatch {
            title,
            body,
            author,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(author) = author {
            self.author.apply(author);
        }
    }
}
