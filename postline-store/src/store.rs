//! The process-wide post collection.
//!
//! Every operation holds the lock for its whole duration, so a structural
//! change (append or remove) can never interleave with an index lookup.

use postline_common::model::{Post, PostIndex, PostPatch};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum StoreError {
    #[error("No post found with specified Index")]
    IndexOutOfRange(PostIndex),
}

#[derive(Debug, Default)]
pub struct PostStore {
    posts: RwLock<Vec<Post>>,
}

impl PostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    pub async fn fetch_posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn fetch_post(&self, index: PostIndex) -> Option<Post> {
        let posts = self.posts.read().await;

        index
            .position(posts.len())
            .map(|position| posts[position].clone())
    }

    /// Appends `post` and returns the index it was stored at.
    pub async fn create_post(&self, post: Post) -> usize {
        let mut posts = self.posts.write().await;
        posts.push(post);

        let index = posts.len() - 1;
        debug!(index, "Created post");
        index
    }

    /// Overwrites the post at `index`, returning the previous value.
    pub async fn replace_post(&self, index: PostIndex, post: Post) -> Result<Post> {
        self.replace_post_with(index, || Ok(post)).await
    }

    /// Like [`PostStore::replace_post`], but the replacement is only built
    /// once `index` is known to be in range, with the lock already held.
    pub async fn replace_post_with<F, E>(&self, index: PostIndex, make_post: F) -> Result<Post, E>
    where
        F: FnOnce() -> Result<Post, E>,
        E: From<StoreError>,
    {
        let mut posts = self.posts.write().await;
        let position = index
            .position(posts.len())
            .ok_or(StoreError::IndexOutOfRange(index))?;
        let post = make_post()?;

        debug!(%index, "Replaced post");
        Ok(std::mem::replace(&mut posts[position], post))
    }

    pub async fn patch_post(&self, index: PostIndex, patch: PostPatch) -> Result<Post> {
        self.patch_post_with(index, || Ok(patch)).await
    }

    /// Like [`PostStore::patch_post`], but the patch is only built once
    /// `index` is known to be in range, with the lock already held.
    pub async fn patch_post_with<F, E>(&self, index: PostIndex, make_patch: F) -> Result<Post, E>
    where
        F: FnOnce() -> Result<PostPatch, E>,
        E: From<StoreError>,
    {
        let mut posts = self.posts.write().await;
        let position = index
            .position(posts.len())
            .ok_or(StoreError::IndexOutOfRange(index))?;
        let patch = make_patch()?;

        let post = &mut posts[position];
        post.apply(patch);

        debug!(%index, "Patched post");
        Ok(post.clone())
    }

    /// Removes the post at `index`. Every later post moves down one position.
    pub async fn delete_post(&self, index: PostIndex) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let position = index
            .position(posts.len())
            .ok_or(StoreError::IndexOutOfRange(index))?;

        debug!(%index, "Deleted post");
        Ok(posts.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{PostStore, StoreError};
    use postline_common::model::{Post, PostIndex, PostPatch, User, UserPatch};
    use std::sync::Arc;

    fn post(title: &str) -> Post {
        Post {
            title: title.to_owned(),
            body: format!("{title} body"),
            author: User {
                full_name: "Full Name".to_owned(),
                username: "user".to_owned(),
                email: "user@example.com".to_owned(),
            },
        }
    }

    async fn store_with(titles: &[&str]) -> PostStore {
        let store = PostStore::new();
        for title in titles {
            store.create_post(post(title)).await;
        }
        store
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = PostStore::new();

        assert!(store.is_empty().await);
        assert_eq!(store.len().await, 0);
        assert!(store.fetch_posts().await.is_empty());
        assert_eq!(store.fetch_post(PostIndex::new(0)).await, None);
    }

    #[tokio::test]
    async fn create_appends_in_order() {
        let store = PostStore::new();

        assert_eq!(store.create_post(post("a")).await, 0);
        assert_eq!(store.create_post(post("b")).await, 1);
        assert_eq!(store.create_post(post("a")).await, 2);

        assert_eq!(
            store.fetch_posts().await,
            vec![post("a"), post("b"), post("a")]
        );
        assert_eq!(store.fetch_post(PostIndex::new(1)).await, Some(post("b")));
    }

    #[tokio::test]
    async fn fetch_out_of_range() {
        let store = store_with(&["a", "b"]).await;

        assert_eq!(store.fetch_post(PostIndex::new(2)).await, None);
        assert_eq!(store.fetch_post(PostIndex::new(-1)).await, None);
    }

    #[tokio::test]
    async fn replace() {
        let store = store_with(&["a", "b"]).await;

        let previous = store
            .replace_post(PostIndex::new(1), post("c"))
            .await
            .unwrap();

        assert_eq!(previous, post("b"));
        assert_eq!(store.fetch_posts().await, vec![post("a"), post("c")]);
        assert_eq!(
            store.replace_post(PostIndex::new(2), post("d")).await,
            Err(StoreError::IndexOutOfRange(PostIndex::new(2)))
        );
    }

    #[tokio::test]
    async fn patch_merges_fields() {
        let store = store_with(&["a"]).await;

        let patch = PostPatch {
            title: Some("patched".to_owned()),
            body: None,
            author: Some(UserPatch {
                email: Some("new@example.com".to_owned()),
                ..UserPatch::default()
            }),
        };
        let patched = store.patch_post(PostIndex::new(0), patch).await.unwrap();

        let mut expected = post("a");
        expected.title = "patched".to_owned();
        expected.author.email = "new@example.com".to_owned();

        assert_eq!(patched, expected);
        assert_eq!(store.fetch_post(PostIndex::new(0)).await, Some(expected));
    }

    #[tokio::test]
    async fn patch_out_of_range() {
        let store = store_with(&["a"]).await;

        assert_eq!(
            store
                .patch_post(PostIndex::new(-3), PostPatch::default())
                .await,
            Err(StoreError::IndexOutOfRange(PostIndex::new(-3)))
        );
        assert_eq!(store.fetch_posts().await, vec![post("a")]);
    }

    #[tokio::test]
    async fn delete_shifts_later_posts() {
        let store = store_with(&["a", "b", "c", "d"]).await;

        let removed = store.delete_post(PostIndex::new(1)).await.unwrap();

        assert_eq!(removed, post("b"));
        assert_eq!(
            store.fetch_posts().await,
            vec![post("a"), post("c"), post("d")]
        );
        assert_eq!(store.fetch_post(PostIndex::new(1)).await, Some(post("c")));
        assert_eq!(store.fetch_post(PostIndex::new(3)).await, None);
    }

    #[tokio::test]
    async fn delete_out_of_range() {
        let store = store_with(&["a"]).await;

        assert_eq!(
            store.delete_post(PostIndex::new(1)).await,
            Err(StoreError::IndexOutOfRange(PostIndex::new(1)))
        );
        assert_eq!(
            store.delete_post(PostIndex::new(-1)).await,
            Err(StoreError::IndexOutOfRange(PostIndex::new(-1)))
        );
        assert_eq!(store.len().await, 1);

        store.delete_post(PostIndex::new(0)).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[test]
    fn error_message() {
        assert_eq!(
            StoreError::IndexOutOfRange(PostIndex::new(7)).to_string(),
            "No post found with specified Index"
        );
    }

    #[tokio::test]
    async fn builders_run_only_in_range() {
        let store = store_with(&["a"]).await;

        let replaced = store
            .replace_post_with(PostIndex::new(1), || -> Result<Post, StoreError> {
                panic!("replacement built for an out of range index")
            })
            .await;
        assert_eq!(
            replaced,
            Err(StoreError::IndexOutOfRange(PostIndex::new(1)))
        );

        let patched = store
            .patch_post_with(PostIndex::new(-1), || -> Result<PostPatch, StoreError> {
                panic!("patch built for an out of range index")
            })
            .await;
        assert_eq!(
            patched,
            Err(StoreError::IndexOutOfRange(PostIndex::new(-1)))
        );
    }

    #[derive(Debug, PartialEq)]
    enum BuildError {
        Store(StoreError),
        Decode,
    }

    impl From<StoreError> for BuildError {
        fn from(value: StoreError) -> Self {
            Self::Store(value)
        }
    }

    #[tokio::test]
    async fn failed_builders_leave_post_untouched() {
        let store = store_with(&["a"]).await;

        assert_eq!(
            store
                .replace_post_with(PostIndex::new(0), || Err(BuildError::Decode))
                .await,
            Err(BuildError::Decode)
        );
        assert_eq!(
            store
                .patch_post_with(PostIndex::new(0), || Err(BuildError::Decode))
                .await,
            Err(BuildError::Decode)
        );
        assert_eq!(
            store
                .replace_post_with(PostIndex::new(4), || Err(BuildError::Decode))
                .await,
            Err(BuildError::Store(StoreError::IndexOutOfRange(PostIndex::new(4))))
        );

        assert_eq!(store.fetch_posts().await, vec![post("a")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_and_deletes() {
        const SEEDED: usize = 100;
        const CREATES: usize = 200;

        let store = Arc::new(PostStore::new());
        for _ in 0..SEEDED {
            store.create_post(post("seed")).await;
        }

        let mut tasks = Vec::new();
        for i in 0..CREATES {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.create_post(post("new")).await;

                if i % 2 == 0 {
                    // At most SEEDED deletes run, so index 0 always exists.
                    store.delete_post(PostIndex::new(0)).await.unwrap();
                }

                let len = store.len().await;
                let last = i64::try_from(len).unwrap() - 1;
                let _ = store.fetch_post(PostIndex::new(last)).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let posts = store.fetch_posts().await;
        assert_eq!(store.len().await, SEEDED + CREATES - CREATES / 2);
        assert_eq!(posts.len(), SEEDED + CREATES - CREATES / 2);
        // Deletes always hit the front, which holds the seeded posts.
        assert!(posts.iter().all(|post| post.title == "new"));
    }
}
