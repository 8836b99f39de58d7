//! Helpers for strings crossing the C boundary.

use std::ffi::{CStr, CString};
use std::fmt;

use libc::c_char;
use llvm_sys::core::LLVMDisposeMessage;

/// An owned message string allocated by LLVM.
///
/// LLVM hands out `char*` buffers that must be released with
/// `LLVMDisposeMessage`; this type owns one such buffer and disposes it
/// exactly once on drop.
pub struct LlvmString {
    ptr: *mut c_char,
}

impl LlvmString {
    /// Take ownership of a message pointer returned by LLVM.
    ///
    /// # Safety
    ///
    /// `ptr` must be a non-null buffer that LLVM expects to be freed
    /// with `LLVMDisposeMessage`, and must not be freed elsewhere.
    pub(crate) unsafe fn new(ptr: *mut c_char) -> Self {
        debug_assert!(!ptr.is_null());
        LlvmString { ptr }
    }

    /// View the message as a `CStr`.
    pub fn as_c_str(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.ptr) }
    }

    /// Convert to an owned `String`, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        self.as_c_str().to_string_lossy().into_owned()
    }
}

impl fmt::Display for LlvmString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_c_str().to_string_lossy())
    }
}

impl fmt::Debug for LlvmString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_c_str())
    }
}

impl Drop for LlvmString {
    fn drop(&mut self) {
        unsafe { LLVMDisposeMessage(self.ptr) }
    }
}

/// Convert a Rust string to a NUL-terminated C string.
///
/// Interior NUL bytes cannot be represented across the boundary. Debug
/// builds assert on them; release builds degrade the name to an empty
/// string rather than panicking mid-emission.
pub(crate) fn to_c_string(s: &str) -> CString {
    debug_assert!(
        !s.contains('\0'),
        "interior NUL byte in a name crossing the C boundary"
    );
    CString::new(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::to_c_string;

    #[test]
    #[should_panic(expected = "interior NUL")]
    fn interior_nul_names_fail_fast() {
        let _ = to_c_string("bad\0name");
    }
}
