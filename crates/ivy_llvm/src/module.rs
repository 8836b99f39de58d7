//! Modules: named containers of functions and globals.
//!
//! A module is created from a [`Context`](crate::context::Context) and
//! cannot outlive it. Serialization (textual IR, bitcode, verification)
//! lives here; machine-code emission lives on
//! [`TargetMachine`](crate::targets::TargetMachine).

use std::ffi::c_char;
use std::marker::PhantomData;
use std::path::Path;
use std::ptr;

use llvm_sys::analysis::{LLVMVerifierFailureAction, LLVMVerifyModule};
use llvm_sys::bit_writer::LLVMWriteBitcodeToFile;
use llvm_sys::core::*;
use llvm_sys::prelude::{LLVMModuleRef, LLVMValueRef};
use llvm_sys::target::LLVMSetModuleDataLayout;

use crate::context::Context;
use crate::error::{LlvmError, LlvmResult};
use crate::support::{to_c_string, LlvmString};
use crate::targets::TargetData;
use crate::types::FunctionType;
use crate::values::FunctionValue;

/// An owned module handle. Disposed on drop.
///
/// Disposing a module destroys every function and block it owns, so
/// wrappers handed out by module methods borrow the module; the borrow
/// checker rejects dropping it out from under them:
///
/// ```compile_fail
/// use ivy_llvm::Context;
///
/// let ctx = Context::create();
/// let module = ctx.create_module("m");
/// let func = module.add_function("f", ctx.i32_type().fn_type(&[], false));
/// drop(module);
/// func.get_name(); // `func` still borrows `module`
/// ```
#[derive(Debug)]
pub struct Module<'ctx> {
    raw: LLVMModuleRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> Module<'ctx> {
    pub(crate) unsafe fn from_raw(raw: LLVMModuleRef) -> Self {
        debug_assert!(!raw.is_null());
        Module {
            raw,
            _marker: PhantomData,
        }
    }

    pub(crate) fn as_module_ref(&self) -> LLVMModuleRef {
        self.raw
    }

    /// Declare a function named `name` with signature `ty`. The body,
    /// if any, is added through
    /// [`Context::append_basic_block`](crate::context::Context::append_basic_block).
    pub fn add_function(&self, name: &str, ty: FunctionType<'ctx>) -> FunctionValue<'_> {
        let name = to_c_string(name);
        unsafe {
            FunctionValue::from_raw(LLVMAddFunction(self.raw, name.as_ptr(), ty.as_type_ref()))
        }
    }

    /// Look up a function by name.
    pub fn get_function(&self, name: &str) -> Option<FunctionValue<'_>> {
        let name = to_c_string(name);
        let raw = unsafe { LLVMGetNamedFunction(self.raw, name.as_ptr()) };
        if raw.is_null() {
            None
        } else {
            Some(unsafe { FunctionValue::from_raw(raw) })
        }
    }

    /// Return the existing function named `name`, or declare it if
    /// absent. An existing function whose signature differs from `ty`
    /// is an error; no renamed shadow declaration is ever created.
    pub fn get_or_insert_function(
        &self,
        name: &str,
        ty: FunctionType<'ctx>,
    ) -> LlvmResult<FunctionValue<'_>> {
        match self.get_function(name) {
            Some(existing) => {
                let found = existing.get_type();
                if found.as_type_ref() == ty.as_type_ref() {
                    Ok(existing)
                } else {
                    Err(LlvmError::FunctionTypeMismatch {
                        name: name.to_string(),
                        found: found.as_type().print_to_string().to_string_lossy(),
                        requested: ty.as_type().print_to_string().to_string_lossy(),
                    })
                }
            }
            None => Ok(self.add_function(name, ty)),
        }
    }

    /// Iterate the module's functions in declaration order.
    pub fn functions(&self) -> FunctionIter<'_> {
        FunctionIter {
            next: unsafe { LLVMGetFirstFunction(self.raw) },
            _marker: PhantomData,
        }
    }

    pub fn set_target_triple(&self, triple: &str) {
        let triple = to_c_string(triple);
        unsafe { LLVMSetTarget(self.raw, triple.as_ptr()) }
    }

    pub fn set_data_layout_str(&self, layout: &str) {
        let layout = to_c_string(layout);
        unsafe { LLVMSetDataLayout(self.raw, layout.as_ptr()) }
    }

    pub fn set_data_layout(&self, layout: &TargetData) {
        unsafe { LLVMSetModuleDataLayout(self.raw, layout.as_target_data_ref()) }
    }

    /// Render the module as textual IR.
    pub fn print_to_string(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMPrintModuleToString(self.raw)) }
    }

    /// Write the module as textual IR to `path`.
    pub fn print_to_file(&self, path: &Path) -> LlvmResult<()> {
        // llvm-sys has carried both mutabilities for the filename
        // parameter; a *mut pointer coerces to either.
        let mut filename = to_c_string(&path.to_string_lossy()).into_bytes_with_nul();
        let mut message: *mut c_char = ptr::null_mut();
        let failed = unsafe {
            LLVMPrintModuleToFile(
                self.raw,
                filename.as_mut_ptr() as *mut c_char,
                &mut message,
            )
        };
        if failed != 0 {
            let message = unsafe { LlvmString::new(message) };
            return Err(LlvmError::ModuleWrite {
                path: path.display().to_string(),
                message: message.to_string_lossy(),
            });
        }
        log::debug!("wrote textual IR to {}", path.display());
        Ok(())
    }

    /// Write the module as bitcode to `path`.
    pub fn write_bitcode_to_path(&self, path: &Path) -> LlvmResult<()> {
        let filename = to_c_string(&path.to_string_lossy());
        let failed = unsafe { LLVMWriteBitcodeToFile(self.raw, filename.as_ptr()) };
        if failed != 0 {
            return Err(LlvmError::ModuleWrite {
                path: path.display().to_string(),
                message: "bitcode writer failed".to_string(),
            });
        }
        log::debug!("wrote bitcode to {}", path.display());
        Ok(())
    }

    /// Check the module's structural invariants (terminator placement,
    /// operand types, dominance). Returns the verifier's diagnostic on
    /// failure.
    pub fn verify(&self) -> LlvmResult<()> {
        let mut message: *mut c_char = ptr::null_mut();
        let broken = unsafe {
            LLVMVerifyModule(
                self.raw,
                LLVMVerifierFailureAction::LLVMReturnStatusAction,
                &mut message,
            )
        };
        let message = if message.is_null() {
            String::new()
        } else {
            unsafe { LlvmString::new(message) }.to_string_lossy()
        };
        if broken != 0 {
            log::debug!("module verification failed: {message}");
            return Err(LlvmError::InvalidModule(message));
        }
        Ok(())
    }
}

impl Drop for Module<'_> {
    fn drop(&mut self) {
        unsafe { LLVMDisposeModule(self.raw) }
    }
}

/// Iterator over a module's functions.
#[derive(Debug)]
pub struct FunctionIter<'ctx> {
    next: LLVMValueRef,
    _marker: PhantomData<&'ctx Context>,
}

impl<'ctx> Iterator for FunctionIter<'ctx> {
    type Item = FunctionValue<'ctx>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        let current = self.next;
        self.next = unsafe { LLVMGetNextFunction(current) };
        Some(unsafe { FunctionValue::from_raw(current) })
    }
}
