pub mod data_persistance;
pub mod deep_scraper;
pub mod extraction_cache;
pub mod openai_client;
pub mod supplier_ranker;
pub mod supplier_search;
pub mod webpage_scraper;

pub use data_persistance::*;
pub use deep_scraper::*;
pub use extraction_cache::*;
pub use openai_client::*;
pub use supplier_ranker::*;
pub use supplier_search::*;
pub use webpage_scraper::*;
