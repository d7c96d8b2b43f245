// Blog API response types.
// Defines structs for deserializing posts and comments.

use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub user_id: Option<u64>,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub email: String,
    pub body: String,
    #[serde(default)]
    pub post_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of a title update request.
#[derive(Debug, Clone, Serialize)]
pub struct TitlePatch<'a> {
    pub title: &'a str,
}
