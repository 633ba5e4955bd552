//! Localized routing: which locale a request is for, and which page a
//! localized path names.
//!
//! - `pathnames`: the route key × locale alias table with forward and reverse lookup
//! - `resolver`: leading-segment locale extraction and preference negotiation

mod pathnames;
mod resolver;

pub use pathnames::{decode_path, encode_path, normalize_path, PathTable, RouteKey, RoutingError};
pub use resolver::{
    match_accept_language, negotiate, parse_accept_language, resolve_path, ResolvedPath,
};
