pub mod fact_check;
pub mod llm;
pub mod pipeline;
pub mod reputation;
pub mod scoring;
pub mod semantic;

pub use fact_check::ClaimVerifier;
pub use llm::{LlmClient, TextGenerator};
pub use pipeline::{CredibilityPipeline, PipelineError, PipelineTimeouts};
pub use reputation::ReputationResolver;
pub use semantic::{SemanticError, SemanticRiskAnalyzer};
