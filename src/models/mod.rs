pub mod books;
pub mod responses;
