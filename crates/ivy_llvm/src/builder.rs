//! The instruction builder: a cursor-based emission facility.
//!
//! A builder is either unpositioned (freshly created) or positioned at
//! an insertion point inside some basic block. Every `build_*` call
//! appends exactly one instruction at the cursor, advances the cursor
//! past it, and returns the instruction as a [`Value`]. Calls on an
//! unpositioned builder fail with [`BuilderError::UnsetPosition`]
//! instead of faulting natively.
//!
//! The signed/unsigned and int/float variants map one-to-one onto the
//! native instructions; picking the wrong variant changes program
//! semantics without any error, so no variant is ever substituted here.

use std::marker::PhantomData;

use llvm_sys::core::*;
use llvm_sys::prelude::{LLVMBuilderRef, LLVMValueRef};

use crate::basic_block::BasicBlock;
use crate::context::Context;
use crate::error::BuilderError;
use crate::support::to_c_string;
use crate::types::{FunctionType, PointerType, StructType, Type};
use crate::values::{FunctionValue, InstructionValue, Value};
use crate::{FloatPredicate, IntPredicate};

type BuildResult<'ctx> = Result<Value<'ctx>, BuilderError>;

/// A mutable instruction-insertion cursor. Disposal happens exactly
/// once, on drop.
#[derive(Debug)]
pub struct Builder<'ctx> {
    raw: LLVMBuilderRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> Builder<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMBuilderRef) -> Self {
        debug_assert!(!raw.is_null());
        Builder {
            raw,
            _marker: PhantomData,
        }
    }

    /// Position the cursor at the end of `block`.
    pub fn position_at_end(&self, block: BasicBlock<'ctx>) {
        unsafe { LLVMPositionBuilderAtEnd(self.raw, block.as_bb_ref()) }
    }

    /// Position the cursor immediately before `instruction`.
    pub fn position_before(&self, instruction: &InstructionValue<'ctx>) {
        unsafe { LLVMPositionBuilderBefore(self.raw, instruction.as_value_ref()) }
    }

    /// Position the cursor in `block` immediately after `instruction`.
    ///
    /// The C API only positions before an instruction, so this steps to
    /// the successor, or to the end of the block for the last one.
    pub fn position_after(&self, block: BasicBlock<'ctx>, instruction: &InstructionValue<'ctx>) {
        match instruction.get_next_instruction() {
            Some(next) => unsafe {
                LLVMPositionBuilder(self.raw, block.as_bb_ref(), next.as_value_ref())
            },
            None => self.position_at_end(block),
        }
    }

    /// The block currently holding the cursor, if positioned.
    pub fn get_insert_block(&self) -> Option<BasicBlock<'ctx>> {
        let bb = unsafe { LLVMGetInsertBlock(self.raw) };
        if bb.is_null() {
            None
        } else {
            Some(unsafe { BasicBlock::from_raw(bb) })
        }
    }

    fn require_position(&self) -> Result<(), BuilderError> {
        if unsafe { LLVMGetInsertBlock(self.raw) }.is_null() {
            Err(BuilderError::UnsetPosition)
        } else {
            Ok(())
        }
    }

    /// Emit one instruction at the cursor and wrap the result.
    fn emit(
        &self,
        f: impl FnOnce(LLVMBuilderRef) -> LLVMValueRef,
    ) -> BuildResult<'ctx> {
        self.require_position()?;
        Ok(unsafe { Value::from_raw(f(self.raw)) })
    }

    // Integer arithmetic.

    pub fn build_add(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildAdd(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_sub(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildSub(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_mul(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildMul(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_int_signed_div(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildSDiv(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_int_unsigned_div(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildUDiv(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_int_signed_rem(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildSRem(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_int_unsigned_rem(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildURem(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_int_neg(&self, value: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildNeg(b, value.as_value_ref(), name.as_ptr()) })
    }

    // Floating-point arithmetic.

    pub fn build_float_add(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFAdd(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_float_sub(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFSub(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_float_mul(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFMul(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_float_div(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFDiv(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_float_rem(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFRem(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_float_neg(&self, value: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFNeg(b, value.as_value_ref(), name.as_ptr()) })
    }

    // Bitwise operations.

    pub fn build_and(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildAnd(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_or(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildOr(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_xor(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildXor(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_not(&self, value: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildNot(b, value.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_left_shift(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildShl(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr()) })
    }

    /// Arithmetic (sign-preserving) shift when `sign_extend` is true,
    /// logical shift otherwise.
    pub fn build_right_shift(
        &self,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        sign_extend: bool,
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            if sign_extend {
                LLVMBuildAShr(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr())
            } else {
                LLVMBuildLShr(b, lhs.as_value_ref(), rhs.as_value_ref(), name.as_ptr())
            }
        })
    }

    // Comparisons.

    pub fn build_int_compare(
        &self,
        predicate: IntPredicate,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildICmp(
                b,
                predicate.as_llvm(),
                lhs.as_value_ref(),
                rhs.as_value_ref(),
                name.as_ptr(),
            )
        })
    }

    pub fn build_float_compare(
        &self,
        predicate: FloatPredicate,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildFCmp(
                b,
                predicate.as_llvm(),
                lhs.as_value_ref(),
                rhs.as_value_ref(),
                name.as_ptr(),
            )
        })
    }

    // Casts. Each maps onto exactly one native cast instruction.

    pub fn build_int_truncate(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildTrunc(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_int_z_extend(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildZExt(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_int_s_extend(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildSExt(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_float_trunc(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFPTrunc(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_float_ext(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFPExt(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    /// `sitofp`: signed-integer-to-float. Distinct from the unsigned
    /// conversion below.
    pub fn build_signed_int_to_float(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildSIToFP(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    /// `uitofp`: unsigned-integer-to-float.
    pub fn build_unsigned_int_to_float(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildUIToFP(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_float_to_signed_int(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFPToSI(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_float_to_unsigned_int(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildFPToUI(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_ptr_to_int(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildPtrToInt(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_int_to_ptr(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildIntToPtr(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_bit_cast(&self, value: Value<'ctx>, to: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildBitCast(b, value.as_value_ref(), to.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_pointer_cast(&self, value: Value<'ctx>, to: PointerType<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildPointerCast(b, value.as_value_ref(), to.as_type().as_type_ref(), name.as_ptr())
        })
    }

    // Memory.

    pub fn build_alloca(&self, ty: Type<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildAlloca(b, ty.as_type_ref(), name.as_ptr()) })
    }

    pub fn build_load(&self, ty: Type<'ctx>, ptr: Value<'ctx>, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe { LLVMBuildLoad2(b, ty.as_type_ref(), ptr.as_value_ref(), name.as_ptr()) })
    }

    pub fn build_store(&self, value: Value<'ctx>, ptr: Value<'ctx>) -> BuildResult<'ctx> {
        self.emit(|b| unsafe { LLVMBuildStore(b, value.as_value_ref(), ptr.as_value_ref()) })
    }

    /// Address arithmetic over `pointee_ty` starting at `ptr`.
    pub fn build_gep(
        &self,
        pointee_ty: Type<'ctx>,
        ptr: Value<'ctx>,
        indices: &[Value<'ctx>],
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        let mut indices: Vec<_> = indices.iter().map(|v| v.as_value_ref()).collect();
        self.emit(|b| unsafe {
            LLVMBuildGEP2(
                b,
                pointee_ty.as_type_ref(),
                ptr.as_value_ref(),
                indices.as_mut_ptr(),
                indices.len() as u32,
                name.as_ptr(),
            )
        })
    }

    /// The address of field `index` of the struct pointed to by `ptr`.
    pub fn build_struct_gep(
        &self,
        struct_ty: StructType<'ctx>,
        ptr: Value<'ctx>,
        index: u32,
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildStructGEP2(
                b,
                struct_ty.as_type().as_type_ref(),
                ptr.as_value_ref(),
                index,
                name.as_ptr(),
            )
        })
    }

    // Aggregates.

    pub fn build_extract_value(&self, aggregate: Value<'ctx>, index: u32, name: &str) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildExtractValue(b, aggregate.as_value_ref(), index, name.as_ptr())
        })
    }

    pub fn build_insert_value(
        &self,
        aggregate: Value<'ctx>,
        value: Value<'ctx>,
        index: u32,
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        self.emit(|b| unsafe {
            LLVMBuildInsertValue(
                b,
                aggregate.as_value_ref(),
                value.as_value_ref(),
                index,
                name.as_ptr(),
            )
        })
    }

    // Calls and control flow.

    pub fn build_call(
        &self,
        function: FunctionValue<'ctx>,
        args: &[Value<'ctx>],
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        let fn_ty = function.get_type();
        let mut args: Vec<_> = args.iter().map(|v| v.as_value_ref()).collect();
        self.emit(|b| unsafe {
            LLVMBuildCall2(
                b,
                fn_ty.as_type_ref(),
                function.as_value_ref(),
                args.as_mut_ptr(),
                args.len() as u32,
                name.as_ptr(),
            )
        })
    }

    /// Call through a function pointer with an explicitly supplied
    /// signature.
    pub fn build_indirect_call(
        &self,
        fn_ty: FunctionType<'ctx>,
        ptr: Value<'ctx>,
        args: &[Value<'ctx>],
        name: &str,
    ) -> BuildResult<'ctx> {
        let name = to_c_string(name);
        let mut args: Vec<_> = args.iter().map(|v| v.as_value_ref()).collect();
        self.emit(|b| unsafe {
            LLVMBuildCall2(
                b,
                fn_ty.as_type_ref(),
                ptr.as_value_ref(),
                args.as_mut_ptr(),
                args.len() as u32,
                name.as_ptr(),
            )
        })
    }

    /// `ret` of a value, or `ret void` when `value` is `None`.
    pub fn build_return(&self, value: Option<Value<'ctx>>) -> BuildResult<'ctx> {
        self.emit(|b| unsafe {
            match value {
                Some(v) => LLVMBuildRet(b, v.as_value_ref()),
                None => LLVMBuildRetVoid(b),
            }
        })
    }

    pub fn build_unconditional_branch(&self, destination: BasicBlock<'ctx>) -> BuildResult<'ctx> {
        self.emit(|b| unsafe { LLVMBuildBr(b, destination.as_bb_ref()) })
    }

    pub fn build_conditional_branch(
        &self,
        condition: Value<'ctx>,
        then_block: BasicBlock<'ctx>,
        else_block: BasicBlock<'ctx>,
    ) -> BuildResult<'ctx> {
        self.emit(|b| unsafe {
            LLVMBuildCondBr(
                b,
                condition.as_value_ref(),
                then_block.as_bb_ref(),
                else_block.as_bb_ref(),
            )
        })
    }

    pub fn build_switch(
        &self,
        value: Value<'ctx>,
        else_block: BasicBlock<'ctx>,
        cases: &[(Value<'ctx>, BasicBlock<'ctx>)],
    ) -> BuildResult<'ctx> {
        let switch = self.emit(|b| unsafe {
            LLVMBuildSwitch(
                b,
                value.as_value_ref(),
                else_block.as_bb_ref(),
                cases.len() as u32,
            )
        })?;
        for (case_value, destination) in cases {
            unsafe {
                LLVMAddCase(
                    switch.as_value_ref(),
                    case_value.as_value_ref(),
                    destination.as_bb_ref(),
                );
            }
        }
        Ok(switch)
    }

    pub fn build_unreachable(&self) -> BuildResult<'ctx> {
        self.emit(|b| unsafe { LLVMBuildUnreachable(b) })
    }
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        unsafe { LLVMDisposeBuilder(self.raw) }
    }
}
