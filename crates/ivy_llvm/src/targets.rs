//! Target discovery and machine-code emission.
//!
//! Backends must be registered before any triple lookup succeeds:
//! [`initialize_all`] for every compiled-in backend, or
//! [`initialize_native`] for just the host. Lookup goes triple →
//! [`Target`] → [`TargetMachine`], and the machine emits assembly or
//! object code for a [`Module`].

use std::ffi::c_char;
use std::path::Path;
use std::ptr;

use llvm_sys::core::LLVMDisposeMessage;
use llvm_sys::prelude::LLVMBool;
use llvm_sys::target::{
    LLVMCopyStringRepOfTargetData, LLVMDisposeTargetData, LLVM_InitializeAllAsmParsers,
    LLVM_InitializeAllAsmPrinters, LLVM_InitializeAllTargetInfos, LLVM_InitializeAllTargetMCs,
    LLVM_InitializeAllTargets, LLVM_InitializeNativeAsmPrinter, LLVM_InitializeNativeTarget,
    LLVMTargetDataRef,
};
use llvm_sys::target_machine::{
    LLVMCodeGenFileType, LLVMCodeGenOptLevel, LLVMCodeModel, LLVMCreateTargetDataLayout,
    LLVMCreateTargetMachine, LLVMDisposeTargetMachine, LLVMGetDefaultTargetTriple,
    LLVMGetTargetDescription, LLVMGetTargetFromTriple, LLVMGetTargetMachineCPU,
    LLVMGetTargetMachineFeatureString, LLVMGetTargetMachineTriple, LLVMGetTargetName,
    LLVMRelocMode, LLVMTargetMachineEmitToFile, LLVMTargetMachineRef, LLVMTargetRef,
};

use crate::error::{LlvmError, LlvmResult};
use crate::module::Module;
use crate::support::{to_c_string, LlvmString};
use crate::OptimizationLevel;

/// Relocation model for emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelocMode {
    #[default]
    Default,
    Static,
    PIC,
    DynamicNoPic,
}

impl RelocMode {
    fn as_llvm(self) -> LLVMRelocMode {
        match self {
            RelocMode::Default => LLVMRelocMode::LLVMRelocDefault,
            RelocMode::Static => LLVMRelocMode::LLVMRelocStatic,
            RelocMode::PIC => LLVMRelocMode::LLVMRelocPIC,
            RelocMode::DynamicNoPic => LLVMRelocMode::LLVMRelocDynamicNoPic,
        }
    }
}

/// Code model for emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeModel {
    #[default]
    Default,
    JITDefault,
    Small,
    Kernel,
    Medium,
    Large,
}

impl CodeModel {
    fn as_llvm(self) -> LLVMCodeModel {
        match self {
            CodeModel::Default => LLVMCodeModel::LLVMCodeModelDefault,
            CodeModel::JITDefault => LLVMCodeModel::LLVMCodeModelJITDefault,
            CodeModel::Small => LLVMCodeModel::LLVMCodeModelSmall,
            CodeModel::Kernel => LLVMCodeModel::LLVMCodeModelKernel,
            CodeModel::Medium => LLVMCodeModel::LLVMCodeModelMedium,
            CodeModel::Large => LLVMCodeModel::LLVMCodeModelLarge,
        }
    }
}

/// Output flavor for [`TargetMachine::write_to_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Assembly,
    Object,
}

impl FileType {
    fn as_llvm(self) -> LLVMCodeGenFileType {
        match self {
            FileType::Assembly => LLVMCodeGenFileType::LLVMAssemblyFile,
            FileType::Object => LLVMCodeGenFileType::LLVMObjectFile,
        }
    }
}

impl OptimizationLevel {
    fn as_codegen_level(self) -> LLVMCodeGenOptLevel {
        match self {
            OptimizationLevel::None => LLVMCodeGenOptLevel::LLVMCodeGenLevelNone,
            OptimizationLevel::Less => LLVMCodeGenOptLevel::LLVMCodeGenLevelLess,
            OptimizationLevel::Default => LLVMCodeGenOptLevel::LLVMCodeGenLevelDefault,
            OptimizationLevel::Aggressive => LLVMCodeGenOptLevel::LLVMCodeGenLevelAggressive,
        }
    }
}

/// Register every compiled-in backend. Idempotent.
pub fn initialize_all() {
    unsafe {
        LLVM_InitializeAllTargetInfos();
        LLVM_InitializeAllTargets();
        LLVM_InitializeAllTargetMCs();
        LLVM_InitializeAllAsmParsers();
        LLVM_InitializeAllAsmPrinters();
    }
}

/// Register the host backend only. Idempotent.
pub fn initialize_native() -> LlvmResult<()> {
    let failed: LLVMBool = unsafe { LLVM_InitializeNativeTarget() | LLVM_InitializeNativeAsmPrinter() };
    if failed != 0 {
        return Err(LlvmError::NativeTargetInit);
    }
    Ok(())
}

/// The triple LLVM computes for the host.
pub fn default_triple() -> LlvmString {
    unsafe { LlvmString::new(LLVMGetDefaultTargetTriple()) }
}

/// A registered backend. Not an owned resource; targets live in global
/// registries and are never disposed.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    raw: LLVMTargetRef,
}

impl Target {
    /// Look up the backend for `triple`. Fails with the registry's own
    /// diagnostic if no registered backend matches.
    pub fn from_triple(triple: &str) -> LlvmResult<Self> {
        let c_triple = to_c_string(triple);
        let mut raw: LLVMTargetRef = ptr::null_mut();
        let mut message: *mut c_char = ptr::null_mut();
        let failed = unsafe { LLVMGetTargetFromTriple(c_triple.as_ptr(), &mut raw, &mut message) };
        if failed != 0 {
            let message = if message.is_null() {
                String::new()
            } else {
                unsafe { LlvmString::new(message) }.to_string_lossy()
            };
            return Err(LlvmError::TargetLookup {
                triple: triple.to_string(),
                message,
            });
        }
        if !message.is_null() {
            unsafe { LLVMDisposeMessage(message) };
        }
        Ok(Target { raw })
    }

    pub fn name(&self) -> String {
        let ptr = unsafe { LLVMGetTargetName(self.raw) };
        if ptr.is_null() {
            return String::new();
        }
        unsafe { std::ffi::CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    pub fn description(&self) -> String {
        let ptr = unsafe { LLVMGetTargetDescription(self.raw) };
        if ptr.is_null() {
            return String::new();
        }
        unsafe { std::ffi::CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    /// Configure a machine for this backend. `cpu` and `features` may
    /// be empty; `"generic"` is a reasonable portable CPU.
    pub fn create_target_machine(
        &self,
        triple: &str,
        cpu: &str,
        features: &str,
        level: OptimizationLevel,
        reloc_mode: RelocMode,
        code_model: CodeModel,
    ) -> LlvmResult<TargetMachine> {
        let c_triple = to_c_string(triple);
        let cpu = to_c_string(cpu);
        let features = to_c_string(features);
        let raw = unsafe {
            LLVMCreateTargetMachine(
                self.raw,
                c_triple.as_ptr(),
                cpu.as_ptr(),
                features.as_ptr(),
                level.as_codegen_level(),
                reloc_mode.as_llvm(),
                code_model.as_llvm(),
            )
        };
        if raw.is_null() {
            return Err(LlvmError::TargetMachineCreation {
                triple: triple.to_string(),
            });
        }
        log::debug!("created target machine for {triple}");
        Ok(TargetMachine { raw })
    }
}

/// A fully configured code generator. Disposed on drop.
#[derive(Debug)]
pub struct TargetMachine {
    raw: LLVMTargetMachineRef,
}

impl TargetMachine {
    pub fn get_triple(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMGetTargetMachineTriple(self.raw)) }
    }

    pub fn get_cpu(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMGetTargetMachineCPU(self.raw)) }
    }

    pub fn get_feature_string(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMGetTargetMachineFeatureString(self.raw)) }
    }

    /// The data layout this machine implies for modules it compiles.
    pub fn create_data_layout(&self) -> TargetData {
        TargetData {
            raw: unsafe { LLVMCreateTargetDataLayout(self.raw) },
        }
    }

    /// Compile `module` to assembly or an object file at `path`.
    pub fn write_to_file(
        &self,
        module: &Module<'_>,
        file_type: FileType,
        path: &Path,
    ) -> LlvmResult<()> {
        // llvm-sys has carried both mutabilities for the filename
        // parameter; a *mut pointer coerces to either.
        let mut filename = to_c_string(&path.to_string_lossy()).into_bytes_with_nul();
        let mut message: *mut c_char = ptr::null_mut();
        let failed = unsafe {
            LLVMTargetMachineEmitToFile(
                self.raw,
                module.as_module_ref(),
                filename.as_mut_ptr() as *mut c_char,
                file_type.as_llvm(),
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
        log::debug!("emitted {file_type:?} output to {}", path.display());
        Ok(())
    }
}

impl Drop for TargetMachine {
    fn drop(&mut self) {
        unsafe { LLVMDisposeTargetMachine(self.raw) }
    }
}

/// Pointer sizes, alignments, and struct layout rules for a target.
/// Disposed on drop.
#[derive(Debug)]
pub struct TargetData {
    raw: LLVMTargetDataRef,
}

impl TargetData {
    pub(crate) fn as_target_data_ref(&self) -> LLVMTargetDataRef {
        self.raw
    }

    /// The layout as a data-layout string, suitable for
    /// [`Module::set_data_layout_str`].
    pub fn as_string(&self) -> LlvmString {
        unsafe { LlvmString::new(LLVMCopyStringRepOfTargetData(self.raw)) }
    }
}

impl Drop for TargetData {
    fn drop(&mut self) {
        unsafe { LLVMDisposeTargetData(self.raw) }
    }
}
