pub mod article_repository;
pub mod category_repository;
pub mod source_repository;
pub mod system_repository;

pub use article_repository::ArticleRepository;
pub use category_repository::CategoryRepository;
pub use source_repository::SourceRepository;
pub use system_repository::SystemRepository;
