use std::ffi::CString;
use std::os::raw::{c_char, c_int};

use crate::severity::NativePriority;
use crate::sink::LogSink;

#[link(name = "log")]
extern "C" {
    fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
}

/// Writes lines to the device log buffer through `liblog`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AndroidLogSink;

impl LogSink for AndroidLogSink {
    fn write(&self, priority: NativePriority, tag: &str, text: &str) -> i32 {
        let tag = to_c_string(tag);
        let text = to_c_string(text);
        // SAFETY: both pointers come from live `CString`s and are
        // NUL-terminated for the duration of the call.
        unsafe { __android_log_write(priority.as_raw(), tag.as_ptr(), text.as_ptr()) }
    }
}

/// Interior NUL bytes would truncate the line on the native side and make
/// `CString::new` fail, so they are dropped.
fn to_c_string(s: &str) -> CString {
    match CString::new(s) {
        Ok(c) => c,
        Err(err) => {
            let mut bytes = err.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_interior_nul() {
        assert_eq!(to_c_string("a\0b").as_bytes(), b"ab");
        assert_eq!(to_c_string("plain").as_bytes(), b"plain");
    }
}
