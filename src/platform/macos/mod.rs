#![allow(unexpected_cfgs)]
//! macOS focus tracking via NSWorkspace / NSRunningApplication.

use cocoa::base::{id, nil, BOOL, NO};
use objc::{class, msg_send, sel, sel_impl};

use crate::platform::{FocusTracker, FrontmostApp};

const NS_APPLICATION_ACTIVATE_IGNORING_OTHER_APPS: u64 = 1 << 1;

pub struct MacosFocusTracker;

impl MacosFocusTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosFocusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTracker for MacosFocusTracker {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        unsafe {
            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let front: id = msg_send![workspace, frontmostApplication];
            if front == nil {
                return None;
            }
            let pid: i32 = msg_send![front, processIdentifier];
            let name: id = msg_send![front, localizedName];
            Some(FrontmostApp {
                name: nsstring_to_string(name),
                pid,
            })
        }
    }

    fn restore_focus(&self, app: &FrontmostApp) -> bool {
        unsafe {
            let running: id = msg_send![
                class!(NSRunningApplication),
                runningApplicationWithProcessIdentifier: app.pid
            ];
            if running == nil {
                return false;
            }
            let activated: BOOL = msg_send![
                running,
                activateWithOptions: NS_APPLICATION_ACTIVATE_IGNORING_OTHER_APPS
            ];
            activated != NO
        }
    }
}

unsafe fn nsstring_to_string(ns_string: id) -> String {
    if ns_string == nil {
        return String::new();
    }
    let utf8: *const libc::c_char = msg_send![ns_string, UTF8String];
    if utf8.is_null() {
        return String::new();
    }
    std::ffi::CStr::from_ptr(utf8)
        .to_string_lossy()
        .into_owned()
}
