//! Key resolution, default fallback and parameter handling.
//!
//! Everything here is pure and synchronous; the bindings call into it.

mod defaults;
mod equality;
mod exchange;
mod key;
mod normalize;
mod params;

pub use defaults::resolve_default;
pub use equality::{
    EqualityCache,
    unchanged,
};
pub use exchange::exchange_params;
pub use key::resolve_key;
pub use normalize::normalize_relaxed_json;
pub use params::parse_params;
