// Blog API endpoint functions.
// Typed operations over posts and comments, behind the BlogApi trait.

use std::future::Future;

use crate::error::Result;

use super::client::ApiClient;
use super::types::{Comment, Post, TitlePatch};

/// Posts requested per page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Operations the views need from the blog backend.
pub trait BlogApi: Clone + Send + Sync + 'static {
    /// Fetch one page of posts (1-based).
    fn fetch_posts(&self, page: u32) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// Fetch all comments on a post.
    fn fetch_comments(&self, post_id: u64) -> impl Future<Output = Result<Vec<Comment>>> + Send;

    /// Change a post's title.
    fn update_post(&self, post_id: u64, title: &str) -> impl Future<Output = Result<Post>> + Send;

    /// Delete a post.
    fn delete_post(&self, post_id: u64) -> impl Future<Output = Result<()>> + Send;
}

impl BlogApi for ApiClient {
    async fn fetch_posts(&self, page: u32) -> Result<Vec<Post>> {
        let params = [
            ("_limit", POSTS_PER_PAGE.to_string()),
            ("_page", page.to_string()),
        ];
        let response = self.get_with_params("/posts", &params).await?;
        let posts: Vec<Post> = response.json().await?;
        Ok(posts)
    }

    async fn fetch_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let params = [("postId", post_id.to_string())];
        let response = self.get_with_params("/comments", &params).await?;
        let comments: Vec<Comment> = response.json().await?;
        Ok(comments)
    }

    async fn update_post(&self, post_id: u64, title: &str) -> Result<Post> {
        let response = self
            .patch(&format!("/posts/{}", post_id), &TitlePatch { title })
            .await?;
        let post: Post = response.json().await?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: u64) -> Result<()> {
        self.delete(&format!("/posts/{}", post_id)).await?;
        Ok(())
    }
}
