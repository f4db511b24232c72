//! The code-generator collaborator contract (spec.md §6).
//!
//! The core exposes the elaborated translation unit to a code generator
//! that visits every AST category: types (lowered with structural-identity
//! reuse), declarations (definitions), statements (control flow),
//! expressions (values), and conversion wrappers (each a lowering rule).
//! Code generation itself is out of scope (spec.md Non-goals) — this trait
//! is the seam the driver's `-emit llvm` path calls into, and `NullBackend`
//! is the only implementation this crate ships.

use banjo_syntax::ast::decl::DeclId;
use banjo_syntax::ast::Context;

/// A visitor over the elaborated translation unit, implemented by an
/// external code generator. One method per AST category the driver hands
/// off, mirroring spec.md §6's "code-generator interface" list.
pub trait CodegenVisitor {
    /// Lowers one top-level declaration of the translation unit.
    fn visit_decl(&mut self, ctx: &Context, decl: DeclId) -> Result<(), CodegenError>;

    /// Called once the whole translation unit has been visited, giving the
    /// backend a chance to finalize (write output, link, etc.).
    fn finish(&mut self) -> Result<(), CodegenError>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct CodegenError(pub String);

/// The stand-in backend this crate ships: accepts every declaration, does
/// nothing with it, and reports that real code generation is unavailable.
/// Keeps the `-emit llvm` driver path honest about what this crate
/// actually produces instead of silently no-op-succeeding.
#[derive(Debug, Default)]
pub struct NullBackend;

impl CodegenVisitor for NullBackend {
    fn visit_decl(&mut self, _ctx: &Context, _decl: DeclId) -> Result<(), CodegenError> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CodegenError> {
        Err(CodegenError("code generation is not implemented in this build".into()))
    }
}
