//! FFI bindings for Stride
//!
//! This module provides C-compatible functions for calling Stride from other languages.
//! All functions take and return JSON as C strings (null-terminated). Returned strings
//! are allocated by Rust and must be freed by the caller using `stride_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::error::PlanError;
use crate::pipeline::{
    apply_injury_recovery_json, cancel_injury_recovery_json, generate_plan_json,
    validate_plan_json,
};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Convert a C string argument, recording an error naming it on failure
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    if ptr.is_null() {
        set_last_error(&format!("Null {name} pointer"));
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            set_last_error(&format!("Invalid UTF-8 in {name}"));
            None
        }
    }
}

/// Hand a pipeline result to the caller (caller must free)
fn into_c_result(result: Result<String, PlanError>) -> *mut c_char {
    match result {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => cstr.into_raw(),
            Err(_) => {
                set_last_error("Result contained an interior NUL byte");
                ptr::null_mut()
            }
        },
        Err(e) => {
            set_last_error(&format!("{}: {e}", e.code()));
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Planning API
// ============================================================================

/// Compute a plan skeleton from a JSON plan request.
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stride_free_string`.
/// - Returns NULL on error; call `stride_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stride_generate_plan(request_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(request) = required_arg(request_json, "request_json") else {
        return ptr::null_mut();
    };
    into_c_result(generate_plan_json(&request))
}

/// Activate injury recovery on a JSON plan.
///
/// # Safety
/// - `plan_json` and `request_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `stride_free_string`.
/// - Returns NULL on error; call `stride_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stride_apply_injury_recovery(
    plan_json: *const c_char,
    request_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(plan) = required_arg(plan_json, "plan_json") else {
        return ptr::null_mut();
    };
    let Some(request) = required_arg(request_json, "request_json") else {
        return ptr::null_mut();
    };
    into_c_result(apply_injury_recovery_json(&plan, &request))
}

/// Restore the pre-injury version of a JSON plan.
///
/// # Safety
/// - `plan_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stride_free_string`.
/// - Returns NULL on error; call `stride_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stride_cancel_injury_recovery(plan_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(plan) = required_arg(plan_json, "plan_json") else {
        return ptr::null_mut();
    };
    into_c_result(cancel_injury_recovery_json(&plan))
}

/// Validate a JSON plan against a JSON user profile and return the report.
///
/// # Safety
/// - `plan_json` and `profile_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `stride_free_string`.
/// - Returns NULL only for malformed input; plan problems are in the report.
#[no_mangle]
pub unsafe extern "C" fn stride_validate_plan(
    plan_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(plan) = required_arg(plan_json, "plan_json") else {
        return ptr::null_mut();
    };
    let Some(profile) = required_arg(profile_json, "profile_json") else {
        return ptr::null_mut();
    };
    into_c_result(validate_plan_json(&plan, &profile))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Stride functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Stride function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stride_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message, prefixed with its error code.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Stride function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn stride_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Stride library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn stride_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
