pub mod engine;

pub use engine::{CompiledQuery, Engine, EngineOptions, Vars};

pub use tessera_core::{schema, stmt, Error, Result};
