pub(crate) use ash::extensions::{ext::DebugUtils, khr::Surface};
pub(crate) use ash::vk;
pub(crate) use ash::vk::*;
pub(crate) use ash::{Device, Entry, Instance};

pub(crate) use log::{error, info, trace, warn};
pub(crate) use raw_window_handle::RawDisplayHandle;
pub(crate) use raw_window_handle::RawWindowHandle;
pub(crate) use std::{
    borrow::Cow,
    ffi::{CStr, CString},
    os::raw::{c_char, c_void},
    result::Result,
    sync::Arc,
};

pub(crate) fn c_chars_to_string(chars: &[c_char]) -> Result<String, Error> {
    let string_raw = unsafe { CStr::from_ptr(chars.as_ptr()) };
    let string = string_raw.to_str()?;
    Ok(string.to_string())
}
pub(crate) use crate::error::*;
