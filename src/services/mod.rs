pub mod recommendations;

pub use recommendations::{EngineSettings, RecommendationEngine};
