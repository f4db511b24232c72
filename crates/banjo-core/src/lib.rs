//! Shared primitives for the banjo front end: arena-allocated IDs, string
//! interning, and source spans.
//!
//! Every other crate in the workspace (`banjo-syntax`, `banjo-sema`) builds
//! its node categories (names, types, expressions, ...) on top of the
//! `Arena`/`Id` pair defined here instead of graph-of-pointers nodes, per the
//! arena-allocation design note in the front end's specification: nodes are
//! never freed individually, and back-references are indices rather than
//! raw pointers or `Rc` cycles.

pub mod arena;
pub mod interner;
pub mod keyword;
pub mod span;

pub use arena::{Arena, Id};
pub use interner::{Interner, Symbol};
pub use keyword::KeywordTable;
pub use span::{SourceId, Span};
