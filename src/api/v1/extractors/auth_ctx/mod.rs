/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - hand the middleware-built RequestContext to handlers
 * - axum-specific code stays in core, the extractor types live in types
 *
 * Public API:
 * - CurrentContext (anonymous allowed)
 * - AuthedPrincipal (401 when anonymous)
 */

mod core;
mod types;

pub use types::{AuthedPrincipal, CurrentContext};
