pub mod recommendation;
pub mod sentiment;

pub use recommendation::RecommendationService;
pub use sentiment::SentimentService;
