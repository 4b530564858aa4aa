pub mod model;
pub mod repository;

pub use model::QuoteRecordDB;
pub use repository::QuoteRepository;
