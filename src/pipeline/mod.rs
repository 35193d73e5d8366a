//! Explicit pre-save transformation steps. Each entity that needs
//! enrichment before persistence gets a fixed-order pipeline of named steps;
//! the first failing step aborts the save. This replaces implicit lifecycle
//! hooks on the entity types.

pub mod steps;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("step '{step}' failed: {message}")]
    Step { step: &'static str, message: String },
}

/// One named transformation applied to a draft before it is written.
#[async_trait]
pub trait SaveStep<T: Send>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, draft: &mut T) -> Result<(), PipelineError>;
}

/// Runs registered steps in registration order.
pub struct SavePipeline<T: Send> {
    steps: Vec<Box<dyn SaveStep<T>>>,
}

impl<T: Send> SavePipeline<T> {
    pub fn new() -> Self {
        Self { steps: vec![] }
    }

    pub fn register(mut self, step: Box<dyn SaveStep<T>>) -> Self {
        tracing::debug!("registered save step '{}'", step.name());
        self.steps.push(step);
        self
    }

    pub async fn run(&self, draft: &mut T) -> Result<(), PipelineError> {
        for step in &self.steps {
            tracing::debug!("running save step '{}'", step.name());
            step.apply(draft).await?;
        }
        Ok(())
    }
}

impl<T: Send> Default for SavePipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Push(&'static str);

    #[async_trait]
    impl SaveStep<Vec<&'static str>> for Push {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn apply(&self, draft: &mut Vec<&'static str>) -> Result<(), PipelineError> {
            draft.push(self.0);
            Ok(())
        }
    }

    struct Fail;

    #[async_trait]
    impl SaveStep<Vec<&'static str>> for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        async fn apply(&self, _draft: &mut Vec<&'static str>) -> Result<(), PipelineError> {
            Err(PipelineError::Validation("nope".into()))
        }
    }

    #[tokio::test]
    async fn steps_run_in_registration_order() {
        let pipeline = SavePipeline::new()
            .register(Box::new(Push("first")))
            .register(Box::new(Push("second")));
        let mut draft = vec![];
        pipeline.run(&mut draft).await.unwrap();
        assert_eq!(draft, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn first_error_aborts_later_steps() {
        let pipeline = SavePipeline::new()
            .register(Box::new(Push("first")))
            .register(Box::new(Fail))
            .register(Box::new(Push("after")));
        let mut draft = vec![];
        let err = pipeline.run(&mut draft).await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(draft, vec!["first"]);
    }
}
