//! Lending Reputation
//!
//! Trust scores and badges for borrowers and lenders on a peer-to-peer
//! item-lending platform.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs         - Crate root with re-exports
//! ├── main.rs        - Event replay entrypoint
//! ├── config.rs      - Configuration management
//! ├── error.rs       - Reputation error types
//! ├── replay.rs      - NDJSON event replay
//! ├── reputation/    - Trust score system
//! │   ├── score.rs   - Score formula & badges
//! │   ├── record.rs  - Per-user counters
//! │   └── engine.rs  - Store-backed orchestrator
//! └── store/         - Record storage
//!     └── memory.rs  - In-memory store
//! ```

pub mod config;
pub mod error;
pub mod replay;
pub mod reputation;
pub mod store;

// Re-export main types for convenience
pub use config::AppConfig;
pub use error::{ReputationError, ReputationResult};
pub use replay::{ReplayEvent, ReplayStats};
pub use store::{InMemoryStore, ReputationStore};

// Re-export reputation types
pub use reputation::{
    classify, recompute_score, Badge, ReputationCounters, ReputationEngine, ReputationEvent,
    ReputationRecord, ReputationSummary,
};
