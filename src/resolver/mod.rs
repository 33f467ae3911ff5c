/// Single-row resolvers for store-backed GraphQL fields
///
/// `ResolverFactory` turns field metadata into a `RowResolver` once at startup.
/// At request time the resolver picks its key from the parent entity or the
/// field arguments, reads one row, and projects the requested cells.

mod factory;
mod projector;

pub use factory::{KeySource, ResolutionContext, ResolverFactory, RowResolver};
pub use projector::{project_row, ResultEntity};
