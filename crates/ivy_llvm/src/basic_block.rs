//! A labeled instruction sequence within a function.

use std::ffi::CStr;
use std::marker::PhantomData;

use llvm_sys::core::*;
use llvm_sys::prelude::LLVMBasicBlockRef;

use crate::context::Context;
use crate::values::{FunctionValue, InstructionValue};

/// A basic block: an ordered, labeled instruction sequence ending in a
/// control transfer. Blocks are owned by their function; block order is
/// insertion order and is the executable control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicBlock<'ctx> {
    raw: LLVMBasicBlockRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> BasicBlock<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMBasicBlockRef) -> Self {
        debug_assert!(!raw.is_null());
        BasicBlock {
            raw,
            _marker: PhantomData,
        }
    }

    pub(crate) fn as_bb_ref(&self) -> LLVMBasicBlockRef {
        self.raw
    }

    /// The function this block belongs to.
    pub fn get_parent(&self) -> Option<FunctionValue<'ctx>> {
        let func = unsafe { LLVMGetBasicBlockParent(self.raw) };
        if func.is_null() {
            None
        } else {
            Some(unsafe { FunctionValue::from_raw(func) })
        }
    }

    /// The first instruction, or `None` for an empty block.
    pub fn get_first_instruction(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMGetFirstInstruction(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }

    /// The last instruction, or `None` for an empty block.
    pub fn get_last_instruction(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMGetLastInstruction(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }

    /// The terminator, or `None` while the block is still open.
    pub fn get_terminator(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMGetBasicBlockTerminator(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }

    pub fn get_name(&self) -> String {
        unsafe {
            CStr::from_ptr(LLVMGetBasicBlockName(self.raw))
                .to_string_lossy()
                .into_owned()
        }
    }
}
