pub mod collaborative_based;
pub mod content_based;
pub mod ranking;
pub mod recommender;
pub mod title_search;

pub use collaborative_based::collab_model;
pub use content_based::content_model;
pub use recommender::recommend;
