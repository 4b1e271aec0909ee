//! Noise graph document library.
//!
//! This crate provides types, validation, and hashing for noise graph
//! documents. A graph document is a JSON description of a noise pipeline: a
//! DAG of named generator, modifier, transformer and module nodes with one
//! root. The `noisegraph-engine` crate compiles documents into evaluable
//! pipelines.
//!
//! # Example
//!
//! ```
//! use noisegraph_spec::{FadeKind, FractalKind, GraphSpec, InterpolationKind, NodeOp};
//! use noisegraph_spec::validation::validate_graph;
//! use noisegraph_spec::hash::canonical_graph_hash;
//!
//! let graph = GraphSpec::builder("terrain", 2)
//!     .seed(42)
//!     .node(
//!         "base",
//!         NodeOp::Perlin {
//!             seed: None,
//!             fade: FadeKind::Quintic,
//!             interpolation: InterpolationKind::Linear,
//!         },
//!     )
//!     .node(
//!         "fbm",
//!         NodeOp::Fractal {
//!             source: "base".to_string(),
//!             octaves: 5,
//!             lacunarity: 2.0,
//!             persistence: 0.5,
//!             function: FractalKind::Fbm,
//!             increment_seed: false,
//!         },
//!     )
//!     .build();
//!
//! assert!(validate_graph(&graph).is_ok());
//! let hash = canonical_graph_hash(&graph).unwrap();
//! println!("Graph hash: {}", hash);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`graph`]: Graph document types and builder
//! - [`validation`]: Structural validation
//! - [`hash`]: Canonical hashing

pub mod error;
pub mod graph;
pub mod hash;
pub mod validation;

pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use graph::{
    DistanceSpec, FadeKind, FractalKind, GraphSpec, GraphSpecBuilder, InterpolationKind, NodeOp,
    NodeSpec, SimplexVariantKind, WorleyReturnKind, SPEC_VERSION,
};
pub use hash::{canonical_graph_hash, canonical_value_hash};
pub use validation::{is_valid_node_id, reachable_nodes, validate_graph};
