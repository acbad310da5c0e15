//! A rewriting engine for the solo calculus, a process calculus in which communication fuses
//! names instead of substituting them.
//!
//! ```
//! # use solo_calculus::{Agent, alpha_eq};
//! let agent = Agent::parse("(x)(u x | ^u y | p x y)")?;
//! assert!(alpha_eq(&agent.reduce(), &Agent::parse("p y y")?));
//! # Ok::<(), anyhow::Error>(())
//! ```
mod agent;
mod canonical;
mod evaluation;
mod graph;
mod name;
mod parser;
mod reduction;
mod sigma;
mod substitution;
mod utils;

pub use agent::{Agent, Parity, Solo};
pub use canonical::{CanonicalAgent, alpha_eq};
pub use evaluation::{ConfigError, Evaluation, ReductionConfig, ReductionError, evaluate};
pub use graph::PartitionGraph;
pub use name::{Name, NameSet, fresh};
pub use parser::ParseError;
pub use sigma::{Fusion, SigmaBuilder};
pub use substitution::Substitution;
pub use utils::Multiset;
