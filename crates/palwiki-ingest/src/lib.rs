//! Update ingestion for palwiki.
//!
//! Takes candidate news updates, drops the ones already stored, persists the
//! rest, and asks a [`ContentSynthesizer`] to write a guide for each. The
//! storage and synthesis backends sit behind traits so the pipeline runs the
//! same against Postgres + Gemini in production and in-memory fakes in tests.

pub mod error;
pub mod memory;
pub mod pipeline;
pub mod postgres;
pub mod prompt;
pub mod service;
pub mod shutdown;
pub mod store;
pub mod synth;

pub use error::{IngestError, StoreError, SynthesisError};
pub use memory::MemoryStore;
pub use pipeline::{IngestionPipeline, PipelineReport};
pub use postgres::PgStore;
pub use prompt::{build_guide_prompt, build_question_prompt, topic_candidate};
pub use service::{CycleOutcome, IngestService};
pub use shutdown::ShutdownSignal;
pub use store::{Guide, NewUserQuery, UpdateStore};
pub use synth::ContentSynthesizer;
