// In-memory BlogApi used by state tests.
// Serves deterministic pages and counts every call per key.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{BlogApi, Comment, POSTS_PER_PAGE, Post};
use crate::error::{BlogError, Result};

#[derive(Default)]
struct Inner {
    post_calls: Mutex<HashMap<u32, usize>>,
    comment_calls: Mutex<HashMap<u64, usize>>,
    failing_pages: Mutex<HashSet<u32>>,
    failing_comments: Mutex<HashSet<u64>>,
    fail_mutations: AtomicBool,
    revision: AtomicU32,
    deleted: Mutex<Vec<u64>>,
    updated: Mutex<Vec<(u64, String)>>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Inner>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_calls(&self, page: u32) -> usize {
        let calls = self.inner.post_calls.lock().unwrap();
        calls.get(&page).copied().unwrap_or(0)
    }

    pub fn comment_calls(&self, post_id: u64) -> usize {
        let calls = self.inner.comment_calls.lock().unwrap();
        calls.get(&post_id).copied().unwrap_or(0)
    }

    pub fn fail_page(&self, page: u32) {
        self.inner.failing_pages.lock().unwrap().insert(page);
    }

    pub fn heal_page(&self, page: u32) {
        self.inner.failing_pages.lock().unwrap().remove(&page);
    }

    pub fn fail_comments(&self, post_id: u64) {
        self.inner.failing_comments.lock().unwrap().insert(post_id);
    }

    pub fn fail_mutations(&self) {
        self.inner.fail_mutations.store(true, Ordering::SeqCst);
    }

    /// Change the server-side titles so refetched pages differ.
    pub fn bump_revision(&self) {
        self.inner.revision.fetch_add(1, Ordering::SeqCst);
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.inner.deleted.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(u64, String)> {
        self.inner.updated.lock().unwrap().clone()
    }

    pub fn post(id: u64, revision: u32) -> Post {
        Post {
            id,
            title: format!("post {} r{}", id, revision),
            body: format!("body of post {}", id),
            user_id: Some(1),
        }
    }

    fn mutation_result(&self) -> Result<()> {
        if self.inner.fail_mutations.load(Ordering::SeqCst) {
            Err(BlogError::Http {
                status: 500,
                body: "mutation rejected".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl BlogApi for FakeApi {
    async fn fetch_posts(&self, page: u32) -> Result<Vec<Post>> {
        *self.inner.post_calls.lock().unwrap().entry(page).or_default() += 1;

        if self.inner.failing_pages.lock().unwrap().contains(&page) {
            return Err(BlogError::Http {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        let revision = self.inner.revision.load(Ordering::SeqCst);
        let first = u64::from((page - 1) * POSTS_PER_PAGE) + 1;
        let last = u64::from(page * POSTS_PER_PAGE);
        Ok((first..=last).map(|id| Self::post(id, revision)).collect())
    }

    async fn fetch_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        *self
            .inner
            .comment_calls
            .lock()
            .unwrap()
            .entry(post_id)
            .or_default() += 1;

        if self.inner.failing_comments.lock().unwrap().contains(&post_id) {
            return Err(BlogError::Http {
                status: 503,
                body: "comments unavailable".to_string(),
            });
        }

        Ok((1..=3)
            .map(|n| Comment {
                id: post_id * 10 + n,
                email: format!("reader{}@example.com", n),
                body: format!("comment {} on post {}", n, post_id),
                post_id: Some(post_id),
                name: None,
            })
            .collect())
    }

    async fn update_post(&self, post_id: u64, title: &str) -> Result<Post> {
        self.mutation_result()?;
        self.inner
            .updated
            .lock()
            .unwrap()
            .push((post_id, title.to_string()));
        let mut post = Self::post(post_id, 0);
        post.title = title.to_string();
        Ok(post)
    }

    async fn delete_post(&self, post_id: u64) -> Result<()> {
        self.mutation_result()?;
        self.inner.deleted.lock().unwrap().push(post_id);
        Ok(())
    }
}
