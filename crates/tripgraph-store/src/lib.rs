//! tripgraph-store — in-memory location graph and named projections.
//!
//! The [`GraphStore`] is populated once from a loader snapshot and is
//! read-only afterwards. Algorithms never see the store directly: they run
//! over a [`Projection`], an immutable adjacency view built for one weight
//! property and registered by name in a [`ProjectionCatalog`].

pub mod catalog;
pub mod error;
pub mod projection;
pub mod store;

pub use catalog::{ProjectionCatalog, ProjectionGuard};
pub use error::{Result, StoreError};
pub use projection::{ProjectedEdge, ProjectedNode, Projection, ProjectionSpec};
pub use store::GraphStore;
