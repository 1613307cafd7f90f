use serde::{Deserialize, Serialize};

/// Summary view shown in bestseller lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub pub_date: String,
    pub summary: String,
    pub isbn: String,
    pub cover_url: String,
}
