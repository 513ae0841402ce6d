//! A fixed-schema entity/component manager for high-frequency simulation
//! loops.
//!
//! Every component kind and every signature is declared up front through a
//! [`schema::SchemaBuilder`]; the resulting [`schema::Schema`] assigns each a
//! stable integer id. Entities are rows in a dense table, components live in
//! one dense column per kind, and queries compare per-entity bit masks
//! against precomputed signature masks. Destruction is deferred: `kill` only
//! flips a flag, and [`manager::Manager::refresh`] compacts the live entities
//! to the front of the table in a single pass.
//!
//! Handles returned by `create_index` are table positions and stay valid only
//! until the next `refresh`. Callers that need persistent identity must layer
//! their own indirection on top.

pub mod component;
pub mod dump;
pub mod entity;
pub mod manager;
mod mask;
pub mod schema;
pub mod signature;
mod storage;
