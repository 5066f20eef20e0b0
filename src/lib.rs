//! toolwright: LLM tool-calling pipeline
//!
//! A language model plans tool calls for a user query, a second model call
//! checks that every proposed argument is actually supported by the query,
//! the tools run, and the model answers from the results.
//!
//! # Quick Start
//!
//! ```no_run
//! use toolwright::prelude::*;
//!
//! # async fn example() -> toolwright::error::Result<()> {
//! let config = ToolwrightConfig::from_env()?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let outcome = pipeline.run("What is 2 multiplied by 3?").await?;
//! println!("{}", outcome.answer);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
