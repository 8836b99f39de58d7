//! The LLVM context: an isolated namespace for types and constants.

use llvm_sys::core::*;
use llvm_sys::prelude::LLVMContextRef;

use crate::basic_block::BasicBlock;
use crate::builder::Builder;
use crate::module::Module;
use crate::support::to_c_string;
use crate::types::{FloatType, IntType, PointerType, StructType, Type};
use crate::values::{FunctionValue, Value};
use crate::AddressSpace;

/// An isolated LLVM context.
///
/// Types, constants and modules created from one context must not be
/// mixed with those of another; the `'ctx` lifetime on every derived
/// wrapper enforces that nothing created here outlives the context.
/// Disposal happens exactly once, on drop.
#[derive(Debug)]
pub struct Context {
    raw: LLVMContextRef,
}

impl Context {
    /// Create a fresh context.
    pub fn create() -> Self {
        Context {
            raw: unsafe { LLVMContextCreate() },
        }
    }

    /// Create a module scoped to this context.
    pub fn create_module(&self, name: &str) -> Module<'_> {
        let name = to_c_string(name);
        unsafe { Module::from_raw(LLVMModuleCreateWithNameInContext(name.as_ptr(), self.raw)) }
    }

    /// Create an instruction builder scoped to this context.
    ///
    /// The builder starts unpositioned; every `build_*` call fails with
    /// [`BuilderError::UnsetPosition`](crate::BuilderError) until a
    /// positioning call has been made.
    pub fn create_builder(&self) -> Builder<'_> {
        unsafe { Builder::from_raw(LLVMCreateBuilderInContext(self.raw)) }
    }

    /// Append a new basic block to the end of `function`. The block
    /// shares the function's borrow of its module.
    pub fn append_basic_block<'f>(&self, function: FunctionValue<'f>, name: &str) -> BasicBlock<'f> {
        let name = to_c_string(name);
        unsafe {
            BasicBlock::from_raw(LLVMAppendBasicBlockInContext(
                self.raw,
                function.as_value_ref(),
                name.as_ptr(),
            ))
        }
    }

    // Primitive type factories. The native library interns these per
    // context, so repeated calls return the same handle.

    pub fn void_type(&self) -> Type<'_> {
        unsafe { Type::from_raw(LLVMVoidTypeInContext(self.raw)) }
    }

    pub fn bool_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt1TypeInContext(self.raw)) }
    }

    pub fn i8_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt8TypeInContext(self.raw)) }
    }

    pub fn i16_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt16TypeInContext(self.raw)) }
    }

    pub fn i32_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt32TypeInContext(self.raw)) }
    }

    pub fn i64_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt64TypeInContext(self.raw)) }
    }

    pub fn i128_type(&self) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMInt128TypeInContext(self.raw)) }
    }

    /// An integer type of arbitrary bit width.
    pub fn custom_width_int_type(&self, bits: u32) -> IntType<'_> {
        unsafe { IntType::from_raw(LLVMIntTypeInContext(self.raw, bits)) }
    }

    pub fn f32_type(&self) -> FloatType<'_> {
        unsafe { FloatType::from_raw(LLVMFloatTypeInContext(self.raw)) }
    }

    pub fn f64_type(&self) -> FloatType<'_> {
        unsafe { FloatType::from_raw(LLVMDoubleTypeInContext(self.raw)) }
    }

    /// An opaque pointer type in the given address space.
    pub fn ptr_type(&self, address_space: AddressSpace) -> PointerType<'_> {
        unsafe { PointerType::from_raw(LLVMPointerTypeInContext(self.raw, address_space.as_u32())) }
    }

    /// An anonymous struct type with the given field types, in order.
    pub fn struct_type(&self, field_types: &[Type<'_>], packed: bool) -> StructType<'_> {
        let mut fields: Vec<_> = field_types.iter().map(|t| t.as_type_ref()).collect();
        unsafe {
            StructType::from_raw(LLVMStructTypeInContext(
                self.raw,
                fields.as_mut_ptr(),
                fields.len() as u32,
                packed as i32,
            ))
        }
    }

    /// A named struct type with no body yet; see
    /// [`StructType::set_body`](crate::StructType::set_body).
    pub fn opaque_struct_type(&self, name: &str) -> StructType<'_> {
        let name = to_c_string(name);
        unsafe { StructType::from_raw(LLVMStructCreateNamed(self.raw, name.as_ptr())) }
    }

    /// A constant byte string, optionally NUL-terminated.
    pub fn const_string(&self, value: &str, null_terminated: bool) -> Value<'_> {
        unsafe {
            Value::from_raw(LLVMConstStringInContext(
                self.raw,
                value.as_ptr() as *const libc::c_char,
                value.len() as u32,
                !null_terminated as i32,
            ))
        }
    }

    /// An anonymous constant struct. Field count and types must agree
    /// with how the value is ultimately used; the native library, not
    /// this layer, enforces that.
    pub fn const_struct(&self, values: &[Value<'_>], packed: bool) -> Value<'_> {
        let mut values: Vec<_> = values.iter().map(|v| v.as_value_ref()).collect();
        unsafe {
            Value::from_raw(LLVMConstStructInContext(
                self.raw,
                values.as_mut_ptr(),
                values.len() as u32,
                packed as i32,
            ))
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { LLVMContextDispose(self.raw) }
    }
}
