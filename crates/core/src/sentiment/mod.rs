pub mod lexicon;
pub mod scorer;

pub use lexicon::SentimentLexicon;
pub use scorer::SentimentScorer;
