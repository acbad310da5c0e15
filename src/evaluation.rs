//! Reducing a term until it stops changing.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{Agent, alpha_eq};

///Settings of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    ///How many reduction steps may be taken before giving up.
    pub max_steps: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        ReductionConfig { max_steps: 64 }
    }
}

///Unable to read a [`ReductionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid reduction config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ReductionError {
    #[error("No fixpoint was reached after {steps} steps")]
    StepBudgetExhausted { steps: usize },
}

impl ReductionConfig {
    #[must_use]
    pub fn new(max_steps: usize) -> Self {
        ReductionConfig { max_steps }
    }

    ///Reads a config from JSON. Missing fields take their default value.
    ///
    ///```
    ///# use solo_calculus::ReductionConfig;
    ///let config = ReductionConfig::from_json(r#"{"max_steps": 10}"#)?;
    ///assert_eq!(config.max_steps, 10);
    ///assert_eq!(ReductionConfig::from_json("{}")?, ReductionConfig::default());
    ///# Ok::<(), anyhow::Error>(())
    ///```
    ///
    ///# Errors
    ///Returns a [`ConfigError`] if `s` is not a valid config.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

///Every term visited while reducing, ending with the first term equivalent to an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    trace: Vec<Agent>,
    revisits: usize,
}

impl Evaluation {
    #[must_use]
    pub fn trace(&self) -> &[Agent] {
        &self.trace
    }

    ///The last term reached.
    #[must_use]
    pub fn result(&self) -> &Agent {
        // a trace always holds the starting term and at least one reduct
        &self.trace[self.trace.len() - 1]
    }

    ///The number of reduction steps taken.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.trace.len() - 1
    }

    ///The index of the earlier term that [`Evaluation::result`] is equivalent to.
    #[must_use]
    pub fn revisits(&self) -> usize {
        self.revisits
    }

    ///Whether the evaluation ended on a term that reduces to itself, rather than on a longer
    ///cycle.
    #[must_use]
    pub fn is_fixpoint(&self) -> bool {
        self.revisits + 2 == self.trace.len()
    }
}

///Reduces `agent` step by step until a term equivalent to an earlier one comes up.
///
///```
///# use solo_calculus::{Agent, ReductionConfig, evaluate, alpha_eq};
///let agent = Agent::parse("(x)(u x | ^u y | p x y)")?;
///let evaluation = evaluate(&agent, &ReductionConfig::default())?;
///assert!(evaluation.is_fixpoint());
///assert!(alpha_eq(evaluation.result(), &Agent::parse("p y y")?));
///# Ok::<(), anyhow::Error>(())
///```
///
///# Errors
///Returns [`ReductionError::StepBudgetExhausted`] if no term repeats within
///[`ReductionConfig::max_steps`] steps. Some terms never do.
pub fn evaluate(agent: &Agent, config: &ReductionConfig) -> Result<Evaluation, ReductionError> {
    let mut trace = vec![agent.clone()];
    for step in 1..=config.max_steps {
        let reduct = trace[trace.len() - 1].reduce();
        debug!(step, reduct = %reduct, "evaluation step");
        let revisits = trace.iter().position(|x| alpha_eq(x, &reduct));
        trace.push(reduct);
        if let Some(revisits) = revisits {
            return Ok(Evaluation { trace, revisits });
        }
    }
    debug!(steps = config.max_steps, "step budget exhausted");
    Err(ReductionError::StepBudgetExhausted {
        steps: config.max_steps,
    })
}

impl Agent {
    ///See [`evaluate`].
    ///
    ///# Errors
    ///Returns [`ReductionError::StepBudgetExhausted`] if no term repeats in time.
    pub fn evaluate(&self, config: &ReductionConfig) -> Result<Evaluation, ReductionError> {
        evaluate(self, config)
    }
}
