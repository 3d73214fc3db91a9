pub mod date;
pub mod enhance;
pub mod keywords;
pub mod ranking;
pub mod service;

pub use date::DateInterpreter;
pub use enhance::QueryEnhancer;
pub use keywords::KeywordExtractor;
pub use ranking::{
    check_permissions, combine_scores, order_by_score, ranking_criteria, SCORE_EPSILON,
};
pub use service::{SearchDeps, SearchService};
