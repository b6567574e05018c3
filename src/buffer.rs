//! Output-buffer plumbing shared by the wrappers: zeroing, the two-call
//! (probe-then-fill) idiom, and C string conversion.

use crate::Result;
use std::ffi::{c_char, CStr, CString};

/// Reset an output record to all zeroes before native code sees it.
pub(crate) fn clear<T: Default>(out: &mut T) {
    *out = T::default();
}

pub(crate) fn clear_slice<T: Default>(out: &mut [T]) {
    out.iter_mut().for_each(clear);
}

/// Two-call query for a typed array.
///
/// `fill(buffer, &mut count)` is called once with a null buffer to learn the
/// count, then again with a zeroed buffer of that many elements. The count
/// reported by the second call is final; it can only shrink the result. If it
/// grew instead, native code rejected the buffer and the result is empty.
/// Returns the second call's status (the probe's status when the count is 0).
pub(crate) fn query_array<T, F>(mut fill: F) -> (bool, Vec<T>)
where
    T: Default + Clone,
    F: FnMut(*mut T, &mut u32) -> bool,
{
    let mut count = 0u32;
    let probed = fill(std::ptr::null_mut(), &mut count);
    log::trace!("two-call probe reported {} element(s)", count);
    if count == 0 {
        return (probed, Vec::new());
    }

    let mut buf = vec![T::default(); count as usize];
    let allocated = count;
    let ok = fill(buf.as_mut_ptr(), &mut count);
    if count > allocated {
        log::debug!("two-call fill wants {} element(s), buffer holds {}", count, allocated);
        return (ok, Vec::new());
    }
    buf.truncate(count as usize);
    (ok, buf)
}

/// Two-call query for a native byte buffer whose size (including any
/// terminator) is the function's return value. A fill that reports more than
/// the probed size wrote nothing, so the result is empty.
pub(crate) fn query_bytes<F>(mut fill: F) -> Vec<u8>
where
    F: FnMut(*mut c_char, u32) -> u32,
{
    let required = fill(std::ptr::null_mut(), 0);
    log::trace!("two-call probe requires {} byte(s)", required);
    if required == 0 {
        return Vec::new();
    }

    let mut buf = vec![0u8; required as usize];
    let written = fill(buf.as_mut_ptr() as *mut c_char, required);
    if written > required {
        log::debug!("two-call fill wants {} byte(s), buffer holds {}", written, required);
        return Vec::new();
    }
    buf.truncate(written as usize);
    buf
}

/// Two-call query for a NUL-terminated native string.
pub(crate) fn query_string<F>(fill: F) -> String
where
    F: FnMut(*mut c_char, u32) -> u32,
{
    bytes_to_string(&query_bytes(fill))
}

/// Text up to the first NUL, with invalid UTF-8 replaced.
pub(crate) fn bytes_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Copy a native `const char*` into a `String`. Null becomes empty.
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn string_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Borrowed Rust text as a NUL-terminated argument.
pub(crate) fn c_string(s: &str) -> Result<CString> {
    Ok(CString::new(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VrError;

    #[test]
    fn test_query_array_probes_then_fills() {
        let mut calls = Vec::new();
        let (ok, values) = query_array(|buf: *mut u32, count: &mut u32| {
            calls.push(buf.is_null());
            if !buf.is_null() {
                for i in 0..*count {
                    unsafe { *buf.add(i as usize) = i * 10 };
                }
            }
            *count = 3;
            !buf.is_null()
        });
        assert!(ok);
        assert_eq!(values, vec![0, 10, 20]);
        assert_eq!(calls, vec![true, false]);
    }

    #[test]
    fn test_query_array_trusts_shrinking_second_count() {
        let (ok, values) = query_array(|buf: *mut u8, count: &mut u32| {
            *count = if buf.is_null() { 4 } else { 2 };
            true
        });
        assert!(ok);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_query_array_growing_second_count_is_empty() {
        let (ok, values) = query_array(|buf: *mut u8, count: &mut u32| {
            *count = if buf.is_null() { 2 } else { 5 };
            false
        });
        assert!(!ok);
        assert!(values.is_empty());
    }

    #[test]
    fn test_query_bytes_growing_size_is_empty() {
        let mut sizes = vec![4u32, 6].into_iter();
        let bytes = query_bytes(|_buf, _len| sizes.next().unwrap_or(0));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_query_array_empty_skips_fill() {
        let mut calls = 0;
        let (ok, values) = query_array(|_buf: *mut u8, count: &mut u32| {
            calls += 1;
            *count = 0;
            false
        });
        assert!(!ok);
        assert!(values.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_query_string_stops_at_nul() {
        let text = b"Lighthouse\0";
        let s = query_string(|buf, len| {
            if !buf.is_null() {
                let n = (len as usize).min(text.len());
                unsafe { std::ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, buf, n) };
            }
            text.len() as u32
        });
        assert_eq!(s, "Lighthouse");
    }

    #[test]
    fn test_string_from_null_ptr() {
        assert_eq!(unsafe { string_from_ptr(std::ptr::null()) }, "");
        let owned = CString::new("TrackedProp_Success").unwrap();
        assert_eq!(unsafe { string_from_ptr(owned.as_ptr()) }, "TrackedProp_Success");
    }

    #[test]
    fn test_c_string_rejects_interior_nul() {
        assert!(matches!(c_string("a\0b"), Err(VrError::InteriorNul(_))));
        assert_eq!(c_string("lighthouse").unwrap().as_bytes(), b"lighthouse");
    }

    #[test]
    fn test_clear_slice_zeroes() {
        let mut values = [7u32; 4];
        clear_slice(&mut values);
        assert_eq!(values, [0; 4]);
    }
}
