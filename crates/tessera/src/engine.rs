mod compile;
pub use compile::{compile, CompiledQuery};

pub mod eval;
pub mod rewrite;
pub mod shape;

use indexmap::IndexMap;
use tessera_core::{
    schema::Schema,
    stmt::{QueryAnnotation, SourceGen, Value},
    Result,
};

/// Caller-bound variables: name → value. Names may be dotted access
/// paths into the caller's environment.
pub type Vars = IndexMap<String, Value>;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// When false, literal values are redacted from diagnostics and
    /// error messages.
    pub log_sensitive_data: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            log_sensitive_data: false,
        }
    }
}

/// The query compilation engine: owns the metadata model and options,
/// and turns caller query models into provider-ready compiled queries.
#[derive(Debug)]
pub struct Engine {
    pub schema: Schema,
    options: EngineOptions,
}

impl Engine {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(schema: Schema, options: EngineOptions) -> Self {
        Self { schema, options }
    }

    pub fn compile(
        &self,
        query: tessera_core::stmt::Query,
        vars: &Vars,
    ) -> Result<CompiledQuery> {
        compile(&self.schema, &self.options, vars, query)
    }
}

/// Shared state threaded through the rewrite passes of one compilation.
///
/// Passes receive this context explicitly instead of sharing mutable
/// visitor fields through parent back-references, so each pass can be
/// exercised in isolation.
pub(crate) struct CompileContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) options: &'a EngineOptions,
    pub(crate) vars: &'a Vars,

    /// Values extracted out of the tree, keyed by generated name.
    pub(crate) params: IndexMap<String, Value>,

    /// Counter backing parameter-name uniqueness; strictly increasing
    /// within this compilation.
    next_param: u32,

    /// Allocator for sources synthesized by the rewrites.
    pub(crate) sources: SourceGen,

    /// Directives lifted out of the tree.
    pub(crate) annotations: Vec<QueryAnnotation>,
}

impl<'a> CompileContext<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        options: &'a EngineOptions,
        vars: &'a Vars,
        sources: SourceGen,
    ) -> Self {
        Self {
            schema,
            options,
            vars,
            params: IndexMap::new(),
            next_param: 0,
            sources,
            annotations: vec![],
        }
    }

    /// Register an extracted value under `base` and return the generated
    /// name. The numeric suffix is strictly increasing, so no two
    /// parameters of one compilation share a name even when their base
    /// names collide.
    pub(crate) fn register_param(&mut self, base: &str, value: Value) -> String {
        let name = format!("{base}_{}", self.next_param);
        self.next_param += 1;
        self.params.insert(name.clone(), value);
        name
    }
}
