use crate::error::BookError;
use crate::models::books::{BookCard, BookDetail};
use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;

#[async_trait]
pub trait BookCatalog {
    /// The first `size` bestsellers, in rank order.
    async fn bestsellers(&self, size: i32) -> Result<Arc<Vec<BookCard>>, BookError>;
    async fn book_detail(&self, id: &str) -> Result<BookDetail, BookError>;
}

pub type Catalog = Arc<dyn BookCatalog + Send + Sync>;

/// Catalog serving generated placeholder data.
#[derive(Debug, Default, Clone)]
pub struct MockCatalog;

impl MockCatalog {
    pub fn new() -> Self {
        Self
    }
}

pub fn mock_card(index: i32) -> BookCard {
    BookCard {
        id: format!("MOCK-{}", index),
        title: format!("목업 베스트셀러 {}", index),
        authors: vec![format!("저자{}", index)],
        cover_url: format!("https://picsum.photos/seed/{}/200/300", index),
    }
}

/// Cards for indices `0..size`. A non-positive size yields no cards.
pub fn mock_cards(size: i32) -> Vec<BookCard> {
    (0..size.max(0)).map(mock_card).collect()
}

pub fn mock_detail(id: &str) -> BookDetail {
    BookDetail {
        id: id.to_string(),
        title: "목업 상세 제목".to_string(),
        authors: vec!["홍길동".to_string()],
        publisher: "가나출판사".to_string(),
        pub_date: Local::now().date_naive().to_string(),
        summary: "줄거리 요약...".to_string(),
        isbn: "9781234567890".to_string(),
        cover_url: "https://picsum.photos/seed/detail/400/600".to_string(),
    }
}

#[async_trait]
impl BookCatalog for MockCatalog {
    async fn bestsellers(&self, size: i32) -> Result<Arc<Vec<BookCard>>, BookError> {
        Ok(Arc::new(mock_cards(size)))
    }

    async fn book_detail(&self, id: &str) -> Result<BookDetail, BookError> {
        Ok(mock_detail(id))
    }
}
