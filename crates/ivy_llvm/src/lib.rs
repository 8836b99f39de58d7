//! Typed, memory-safe wrappers over the LLVM C API.
//!
//! This crate wraps the raw `llvm-sys` handles (contexts, modules, types,
//! values, basic blocks, builders, target machines) in typed objects so
//! that call sites get compile-time shape-checking instead of untyped
//! `LLVM*Ref` pointers.
//!
//! # Design
//!
//! - Every wrapper holds exactly one opaque handle. Owning wrappers
//!   (`Context`, `Module`, `Builder`, `TargetMachine`, `TargetData`)
//!   implement `Drop` and invoke the matching dispose call exactly once;
//!   everything else is a `Copy` view whose lifetime is tied to the
//!   owning [`Context`].
//! - The native type and value lattices are flattened into one newtype
//!   per tag (`IntType`, `StructType`, `FunctionValue`, ...) plus a
//!   generic [`Type`]/[`Value`] for slots that accept any member.
//! - All `unsafe` is confined to this crate. Disposing a module destroys
//!   the functions and blocks it owns, so wrappers handed out by module
//!   methods borrow the module and cannot outlive it. The public surface
//!   is safe except where the native API itself invalidates aliased
//!   handles: [`FunctionValue::delete`] is `unsafe`, and a [`Builder`]
//!   does not borrow the module it emits into, so a cursor positioned in
//!   a block of a since-dropped module dangles and must not be used.
//!
//! Wrapper types hold raw pointers and are therefore `!Send + !Sync`;
//! a context and everything created from it belong to one thread at a
//! time, matching LLVM's own threading rules.
//!
//! # Example
//!
//! ```ignore
//! use ivy_llvm::Context;
//!
//! let context = Context::create();
//! let module = context.create_module("demo");
//! let builder = context.create_builder();
//!
//! let i32_ty = context.i32_type();
//! let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
//! let func = module.add_function("answer", fn_ty);
//! let entry = func.append_basic_block("entry");
//!
//! builder.position_at_end(entry);
//! let sum = builder.build_add(
//!     func.get_param(0).unwrap(),
//!     i32_ty.const_int(41, false),
//!     "sum",
//! )?;
//! builder.build_return(Some(sum))?;
//! ```

pub mod basic_block;
pub mod builder;
pub mod context;
pub mod error;
pub mod module;
pub mod support;
pub mod targets;
pub mod types;
pub mod values;

pub use basic_block::BasicBlock;
pub use builder::Builder;
pub use context::Context;
pub use error::{BuilderError, LlvmError, LlvmResult};
pub use module::Module;
pub use support::LlvmString;
pub use targets::{CodeModel, FileType, RelocMode, Target, TargetData, TargetMachine};
pub use types::{
    ArrayType, FloatType, FunctionType, IntType, PointerType, StructType, Type, TypeKind,
};
pub use values::{FunctionValue, InstructionValue, Value};

use llvm_sys::{LLVMIntPredicate, LLVMRealPredicate};

/// An LLVM address space qualifier for pointer types.
///
/// Address space 0 (the default) is the generic address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressSpace(u32);

impl AddressSpace {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for AddressSpace {
    fn from(value: u32) -> Self {
        AddressSpace(value)
    }
}

/// Integer comparison predicates for `icmp` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntPredicate {
    EQ,
    NE,
    UGT,
    UGE,
    ULT,
    ULE,
    SGT,
    SGE,
    SLT,
    SLE,
}

impl IntPredicate {
    pub(crate) fn as_llvm(self) -> LLVMIntPredicate {
        use LLVMIntPredicate::*;
        match self {
            IntPredicate::EQ => LLVMIntEQ,
            IntPredicate::NE => LLVMIntNE,
            IntPredicate::UGT => LLVMIntUGT,
            IntPredicate::UGE => LLVMIntUGE,
            IntPredicate::ULT => LLVMIntULT,
            IntPredicate::ULE => LLVMIntULE,
            IntPredicate::SGT => LLVMIntSGT,
            IntPredicate::SGE => LLVMIntSGE,
            IntPredicate::SLT => LLVMIntSLT,
            IntPredicate::SLE => LLVMIntSLE,
        }
    }
}

/// Floating-point comparison predicates for `fcmp` instructions.
///
/// `O*` predicates are ordered (false if either operand is NaN), `U*`
/// predicates are unordered (true if either operand is NaN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatPredicate {
    OEQ,
    OGT,
    OGE,
    OLT,
    OLE,
    ONE,
    ORD,
    UNO,
    UEQ,
    UGT,
    UGE,
    ULT,
    ULE,
    UNE,
    /// Always false.
    PredicateFalse,
    /// Always true.
    PredicateTrue,
}

impl FloatPredicate {
    pub(crate) fn as_llvm(self) -> LLVMRealPredicate {
        use LLVMRealPredicate::*;
        match self {
            FloatPredicate::OEQ => LLVMRealOEQ,
            FloatPredicate::OGT => LLVMRealOGT,
            FloatPredicate::OGE => LLVMRealOGE,
            FloatPredicate::OLT => LLVMRealOLT,
            FloatPredicate::OLE => LLVMRealOLE,
            FloatPredicate::ONE => LLVMRealONE,
            FloatPredicate::ORD => LLVMRealORD,
            FloatPredicate::UNO => LLVMRealUNO,
            FloatPredicate::UEQ => LLVMRealUEQ,
            FloatPredicate::UGT => LLVMRealUGT,
            FloatPredicate::UGE => LLVMRealUGE,
            FloatPredicate::ULT => LLVMRealULT,
            FloatPredicate::ULE => LLVMRealULE,
            FloatPredicate::UNE => LLVMRealUNE,
            FloatPredicate::PredicateFalse => LLVMRealPredicateFalse,
            FloatPredicate::PredicateTrue => LLVMRealPredicateTrue,
        }
    }
}

/// Code generation optimization levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationLevel {
    None,
    Less,
    #[default]
    Default,
    Aggressive,
}
