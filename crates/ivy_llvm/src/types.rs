//! Wrappers for the LLVM type lattice.
//!
//! One flat `Copy` newtype per native tag, plus a generic [`Type`] for
//! slots where any member of the lattice is acceptable. Types are
//! immutable value objects owned by their [`Context`]; they are never
//! disposed individually.

use std::marker::PhantomData;

use llvm_sys::core::*;
use llvm_sys::prelude::LLVMTypeRef;
use llvm_sys::LLVMTypeKind;

use crate::context::Context;
use crate::support::LlvmString;
use crate::values::Value;
use crate::AddressSpace;

/// The tag of a native type handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Half,
    Float,
    Double,
    Integer,
    Function,
    Struct,
    Array,
    Pointer,
    Vector,
    Label,
    Metadata,
    Token,
    /// A tag this layer attaches no operations to.
    Other,
}

impl TypeKind {
    fn from_llvm(kind: LLVMTypeKind) -> Self {
        match kind {
            LLVMTypeKind::LLVMVoidTypeKind => TypeKind::Void,
            LLVMTypeKind::LLVMHalfTypeKind => TypeKind::Half,
            LLVMTypeKind::LLVMFloatTypeKind => TypeKind::Float,
            LLVMTypeKind::LLVMDoubleTypeKind => TypeKind::Double,
            LLVMTypeKind::LLVMIntegerTypeKind => TypeKind::Integer,
            LLVMTypeKind::LLVMFunctionTypeKind => TypeKind::Function,
            LLVMTypeKind::LLVMStructTypeKind => TypeKind::Struct,
            LLVMTypeKind::LLVMArrayTypeKind => TypeKind::Array,
            LLVMTypeKind::LLVMPointerTypeKind => TypeKind::Pointer,
            LLVMTypeKind::LLVMVectorTypeKind => TypeKind::Vector,
            LLVMTypeKind::LLVMLabelTypeKind => TypeKind::Label,
            LLVMTypeKind::LLVMMetadataTypeKind => TypeKind::Metadata,
            LLVMTypeKind::LLVMTokenTypeKind => TypeKind::Token,
            _ => TypeKind::Other,
        }
    }
}

/// Any LLVM type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Type<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> Type<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        Type {
            raw,
            _marker: PhantomData,
        }
    }

    /// The raw handle. Escape hatch for callers mixing in their own FFI.
    pub fn as_type_ref(&self) -> LLVMTypeRef {
        self.raw
    }

    pub fn kind(&self) -> TypeKind {
        TypeKind::from_llvm(unsafe { LLVMGetTypeKind(self.raw) })
    }

    pub fn is_void(&self) -> bool {
        self.kind() == TypeKind::Void
    }

    pub fn is_int(&self) -> bool {
        self.kind() == TypeKind::Integer
    }

    pub fn is_float(&self) -> bool {
        matches!(self.kind(), TypeKind::Half | TypeKind::Float | TypeKind::Double)
    }

    pub fn is_struct(&self) -> bool {
        self.kind() == TypeKind::Struct
    }

    pub fn is_array(&self) -> bool {
        self.kind() == TypeKind::Array
    }

    pub fn is_pointer(&self) -> bool {
        self.kind() == TypeKind::Pointer
    }

    pub fn is_function(&self) -> bool {
        self.kind() == TypeKind::Function
    }

    /// A function type returning this type.
    pub fn fn_type(&self, param_types: &[Type<'ctx>], is_var_args: bool) -> FunctionType<'ctx> {
        let mut params: Vec<_> = param_types.iter().map(|t| t.raw).collect();
        unsafe {
            FunctionType::from_raw(LLVMFunctionType(
                self.raw,
                params.as_mut_ptr(),
                params.len() as u32,
                is_var_args as i32,
            ))
        }
    }

    /// An array type with this element type.
    pub fn array_type(&self, len: u64) -> ArrayType<'ctx> {
        unsafe { ArrayType::from_raw(LLVMArrayType2(self.raw, len)) }
    }

    /// A pointer type in the given address space.
    pub fn ptr_type(&self, address_space: AddressSpace) -> PointerType<'ctx> {
        unsafe { PointerType::from_raw(LLVMPointerType(self.raw, address_space.as_u32())) }
    }

    /// The all-zeros constant of this type.
    pub fn const_null(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMConstNull(self.raw)) }
    }

    /// The undefined value of this type.
    pub fn get_undef(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMGetUndef(self.raw)) }
    }

    /// A constant array with this element type. The constituents must
    /// all be of this type; that arity/type agreement is the caller's
    /// contract with the native library.
    pub fn const_array(&self, values: &[Value<'ctx>]) -> Value<'ctx> {
        let mut values: Vec<_> = values.iter().map(|v| v.as_value_ref()).collect();
        unsafe {
            Value::from_raw(LLVMConstArray2(
                self.raw,
                values.as_mut_ptr(),
                values.len() as u64,
            ))
        }
    }

    /// The size of this type as a target-dependent constant expression,
    /// or `None` for unsized types (void, functions, opaque structs).
    pub fn size_of(&self) -> Option<Value<'ctx>> {
        if unsafe { LLVMTypeIsSized(self.raw) } == 0 {
            return None;
        }
        Some(unsafe { Value::from_raw(LLVMSizeOf(self.raw)) })
    }

    /// The textual form of this type.
    pub fn print_to_string(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMPrintTypeToString(self.raw)) }
    }
}

/// An integer type of some fixed bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> IntType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        IntType {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    pub fn width(&self) -> u32 {
        unsafe { LLVMGetIntTypeWidth(self.raw) }
    }

    /// An integer constant of this type. `sign_extend` controls how the
    /// `u64` is widened when the type is wider than 64 bits.
    pub fn const_int(&self, value: u64, sign_extend: bool) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMConstInt(self.raw, value, sign_extend as i32)) }
    }

    pub fn const_all_ones(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMConstAllOnes(self.raw)) }
    }

    pub fn fn_type(&self, param_types: &[Type<'ctx>], is_var_args: bool) -> FunctionType<'ctx> {
        self.as_type().fn_type(param_types, is_var_args)
    }
}

/// A floating-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> FloatType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        FloatType {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    pub fn const_float(&self, value: f64) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMConstReal(self.raw, value)) }
    }

    pub fn fn_type(&self, param_types: &[Type<'ctx>], is_var_args: bool) -> FunctionType<'ctx> {
        self.as_type().fn_type(param_types, is_var_args)
    }
}

/// A function signature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> FunctionType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        FunctionType {
            raw,
            _marker: PhantomData,
        }
    }

    pub(crate) fn as_type_ref(&self) -> LLVMTypeRef {
        self.raw
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    pub fn get_return_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(LLVMGetReturnType(self.raw)) }
    }

    pub fn count_param_types(&self) -> u32 {
        unsafe { LLVMCountParamTypes(self.raw) }
    }

    /// The parameter types, in declaration order.
    pub fn get_param_types(&self) -> Vec<Type<'ctx>> {
        let count = self.count_param_types() as usize;
        let mut raw = vec![std::ptr::null_mut(); count];
        unsafe {
            LLVMGetParamTypes(self.raw, raw.as_mut_ptr());
            raw.into_iter().map(|t| Type::from_raw(t)).collect()
        }
    }

    pub fn is_var_arg(&self) -> bool {
        unsafe { LLVMIsFunctionVarArg(self.raw) != 0 }
    }
}

/// A struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> StructType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        StructType {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    pub fn count_fields(&self) -> u32 {
        unsafe { LLVMCountStructElementTypes(self.raw) }
    }

    pub fn get_field_type_at_index(&self, index: u32) -> Option<Type<'ctx>> {
        if index >= self.count_fields() {
            return None;
        }
        Some(unsafe { Type::from_raw(LLVMStructGetTypeAtIndex(self.raw, index)) })
    }

    /// Iterate over the field types in order. Each call produces a
    /// fresh iterator that re-reads the struct, so the sequence is
    /// restartable by calling again.
    pub fn field_types_iter(&self) -> FieldTypes<'ctx> {
        FieldTypes {
            struct_type: *self,
            index: 0,
            count: self.count_fields(),
        }
    }

    /// Fill in the body of an opaque named struct.
    pub fn set_body(&self, field_types: &[Type<'ctx>], packed: bool) {
        let mut fields: Vec<_> = field_types.iter().map(|t| t.as_type_ref()).collect();
        unsafe {
            LLVMStructSetBody(
                self.raw,
                fields.as_mut_ptr(),
                fields.len() as u32,
                packed as i32,
            );
        }
    }

    pub fn is_opaque(&self) -> bool {
        unsafe { LLVMIsOpaqueStruct(self.raw) != 0 }
    }

    /// A constant of this named struct type. Field count and order must
    /// match the struct body; violations are a native-level caller error.
    pub fn const_named_struct(&self, values: &[Value<'ctx>]) -> Value<'ctx> {
        let mut values: Vec<_> = values.iter().map(|v| v.as_value_ref()).collect();
        unsafe {
            Value::from_raw(LLVMConstNamedStruct(
                self.raw,
                values.as_mut_ptr(),
                values.len() as u32,
            ))
        }
    }
}

/// Iterator over a struct's field types. See
/// [`StructType::field_types_iter`].
pub struct FieldTypes<'ctx> {
    struct_type: StructType<'ctx>,
    index: u32,
    count: u32,
}

impl<'ctx> Iterator for FieldTypes<'ctx> {
    type Item = Type<'ctx>;

    fn next(&mut self) -> Option<Type<'ctx>> {
        if self.index >= self.count {
            return None;
        }
        let ty = self.struct_type.get_field_type_at_index(self.index);
        self.index += 1;
        ty
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

/// An array type of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> ArrayType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        ArrayType {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    pub fn len(&self) -> u64 {
        unsafe { LLVMGetArrayLength2(self.raw) }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(LLVMGetElementType(self.raw)) }
    }
}

/// An opaque pointer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerType<'ctx> {
    raw: LLVMTypeRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> PointerType<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        debug_assert!(!raw.is_null());
        PointerType {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_type(&self) -> Type<'ctx> {
        unsafe { Type::from_raw(self.raw) }
    }

    /// The null pointer constant of this type.
    pub fn const_null(&self) -> Value<'ctx> {
        unsafe { Value::from_raw(LLVMConstPointerNull(self.raw)) }
    }
}

macro_rules! impl_into_type {
    ($($name:ident),*) => {
        $(impl<'ctx> From<$name<'ctx>> for Type<'ctx> {
            fn from(ty: $name<'ctx>) -> Type<'ctx> {
                ty.as_type()
            }
        })*
    };
}

impl_into_type!(IntType, FloatType, FunctionType, StructType, ArrayType, PointerType);
