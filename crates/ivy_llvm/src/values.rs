//! Wrappers for the LLVM value lattice.
//!
//! [`Value`] covers any native value (constants, instructions,
//! parameters); [`FunctionValue`] and [`InstructionValue`] carry the
//! operations only legal for those tags. Two wrappers around the same
//! handle are interchangeable for read-only use.

use std::marker::PhantomData;

use llvm_sys::core::*;
use llvm_sys::prelude::LLVMValueRef;

use crate::basic_block::BasicBlock;
use crate::context::Context;
use crate::support::{to_c_string, LlvmString};
use crate::types::{FunctionType, Type};

/// Any LLVM value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value<'ctx> {
    raw: LLVMValueRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> Value<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMValueRef) -> Self {
        debug_assert!(!raw.is_null());
        Value {
            raw,
            _marker: PhantomData,
        }
    }

    /// The raw handle. Escape hatch for callers mixing in their own FFI.
    pub fn as_value_ref(&self) -> LLVMValueRef {
        self.raw
    }

    /// The value's symbolic name. Affects only the readability of the
    /// textual form, never semantics.
    pub fn get_name(&self) -> String {
        let mut len = 0;
        unsafe {
            let ptr = LLVMGetValueName2(self.raw, &mut len);
            let bytes = std::slice::from_raw_parts(ptr as *const u8, len);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    pub fn set_name(&self, name: &str) {
        unsafe {
            LLVMSetValueName2(self.raw, name.as_ptr() as *const libc::c_char, name.len());
        }
    }

    pub fn type_of(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(LLVMTypeOf(self.raw)) }
    }

    pub fn is_constant(&self) -> bool {
        unsafe { LLVMIsConstant(self.raw) != 0 }
    }

    pub fn is_null(&self) -> bool {
        unsafe { LLVMIsNull(self.raw) != 0 }
    }

    pub fn is_undef(&self) -> bool {
        unsafe { LLVMIsUndef(self.raw) != 0 }
    }

    /// Narrow to an instruction, if the handle carries that tag.
    pub fn as_instruction(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMIsAInstruction(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }

    /// Narrow to a function, if the handle carries that tag.
    pub fn as_function(&self) -> Option<FunctionValue<'ctx>> {
        let func = unsafe { LLVMIsAFunction(self.raw) };
        if func.is_null() {
            None
        } else {
            Some(unsafe { FunctionValue::from_raw(func) })
        }
    }

    /// The textual form of this value.
    pub fn print_to_string(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMPrintValueToString(self.raw)) }
    }
}

/// A named, typed, callable unit owned by its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionValue<'ctx> {
    raw: LLVMValueRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> FunctionValue<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMValueRef) -> Self {
        debug_assert!(!raw.is_null());
        FunctionValue {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_value_ref(&self) -> LLVMValueRef {
        self.raw
    }

    pub fn as_value(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(self.raw) }
    }

    pub fn get_name(&self) -> String {
        self.as_value().get_name()
    }

    /// The function's signature type.
    pub fn get_type(&self) -> FunctionType<'ctx> {
        unsafe { FunctionType::from_raw(LLVMGlobalGetValueType(self.raw)) }
    }

    /// Number of parameters, fixed when the signature was constructed.
    pub fn count_params(&self) -> u32 {
        unsafe { LLVMCountParams(self.raw) }
    }

    /// The parameter at 0-based `index`.
    pub fn get_param(&self, index: u32) -> Option<Value<'ctx>> {
        if index >= self.count_params() {
            return None;
        }
        Some(unsafe { Value::from_raw(LLVMGetParam(self.raw, index)) })
    }

    pub fn get_first_param(&self) -> Option<Value<'ctx>> {
        self.get_param(0)
    }

    /// Iterate over the parameters in positional order.
    pub fn get_param_iter(&self) -> ParamsIter<'ctx> {
        ParamsIter {
            function: *self,
            index: 0,
            count: self.count_params(),
        }
    }

    /// Append a new basic block to the end of this function's block
    /// sequence.
    pub fn append_basic_block(&self, name: &str) -> BasicBlock<'ctx> {
        let name = to_c_string(name);
        unsafe {
            // The context-free C entry point appends into the global
            // context; route through the function's own context instead.
            let ctx = LLVMGetTypeContext(LLVMTypeOf(self.raw));
            BasicBlock::from_raw(LLVMAppendBasicBlockInContext(ctx, self.raw, name.as_ptr()))
        }
    }

    /// The entry block, or `None` for a bodyless declaration.
    pub fn get_entry_basic_block(&self) -> Option<BasicBlock<'ctx>> {
        let bb = unsafe { LLVMGetEntryBasicBlock(self.raw) };
        if bb.is_null() {
            None
        } else {
            Some(unsafe { BasicBlock::from_raw(bb) })
        }
    }

    pub fn get_first_basic_block(&self) -> Option<BasicBlock<'ctx>> {
        let bb = unsafe { LLVMGetFirstBasicBlock(self.raw) };
        if bb.is_null() {
            None
        } else {
            Some(unsafe { BasicBlock::from_raw(bb) })
        }
    }

    pub fn count_basic_blocks(&self) -> u32 {
        unsafe { LLVMCountBasicBlocks(self.raw) }
    }

    /// Delete this function from its owning module.
    ///
    /// # Safety
    ///
    /// The wrapper is `Copy`; any other copy of this handle dangles
    /// after the call and must not be used again.
    pub unsafe fn delete(self) {
        LLVMDeleteFunction(self.raw);
    }
}

impl<'ctx> From<FunctionValue<'ctx>> for Value<'ctx> {
    fn from(func: FunctionValue<'ctx>) -> Value<'ctx> {
        func.as_value()
    }
}

/// Iterator over a function's parameters. See
/// [`FunctionValue::get_param_iter`].
pub struct ParamsIter<'ctx> {
    function: FunctionValue<'ctx>,
    index: u32,
    count: u32,
}

impl<'ctx> Iterator for ParamsIter<'ctx> {
    type Item = Value<'ctx>;

    fn next(&mut self) -> Option<Value<'ctx>> {
        if self.index >= self.count {
            return None;
        }
        let param = self.function.get_param(self.index);
        self.index += 1;
        param
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

/// An instruction inserted in some basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionValue<'ctx> {
    raw: LLVMValueRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> InstructionValue<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMValueRef) -> Self {
        debug_assert!(!raw.is_null());
        InstructionValue {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_value_ref(&self) -> LLVMValueRef {
        self.raw
    }

    pub fn as_value(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(self.raw) }
    }

    /// The block containing this instruction.
    pub fn get_parent(&self) -> Option<BasicBlock<'ctx>> {
        let bb = unsafe { LLVMGetInstructionParent(self.raw) };
        if bb.is_null() {
            None
        } else {
            Some(unsafe { BasicBlock::from_raw(bb) })
        }
    }

    pub fn get_next_instruction(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMGetNextInstruction(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }

    pub fn get_previous_instruction(&self) -> Option<InstructionValue<'ctx>> {
        let inst = unsafe { LLVMGetPreviousInstruction(self.raw) };
        if inst.is_null() {
            None
        } else {
            Some(unsafe { InstructionValue::from_raw(inst) })
        }
    }
}

impl<'ctx> From<InstructionValue<'ctx>> for Value<'ctx> {
    fn from(inst: InstructionValue<'ctx>) -> Value<'ctx> {
        inst.as_value()
    }
}
