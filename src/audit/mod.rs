//! Audit data model and the normalization pipeline.
//!
//! Raw model text flows through [`extract::extract_json`] and
//! [`assemble::assemble`]; records read back from storage go through
//! [`normalize::upgrade_result`].

pub mod assemble;
pub mod demo;
pub mod extract;
pub mod filter;
pub mod normalize;
pub mod prompt;
pub mod pxl;
pub mod types;

pub use assemble::{assemble, DEFAULT_INTRODUCTION};
pub use extract::extract_json;
pub use filter::RecommendationFilter;
pub use normalize::{derive_effort_from_cost, normalize_level, upgrade_result};
pub use types::{
    AbTest, AuditMode, AuditRecommendation, AuditRequest, AuditResult, Ease, HeuristicCategory,
    HeuristicItem, Level, PxlItem, QuickWin, WebsiteType,
};
