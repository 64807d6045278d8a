pub mod analytics;
pub mod ranker;
pub mod recommendations;
pub mod tfidf;

pub use ranker::{cosine_similarity, rank, ScoredCandidate};
pub use recommendations::RecommendationService;
pub use tfidf::{TermWeightIndex, TermWeightVector, Tokenizer, Vocabulary};
