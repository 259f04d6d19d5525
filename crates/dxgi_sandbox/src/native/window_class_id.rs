use std::sync::OnceLock;

use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::GetModuleHandleExW;
use windows::Win32::UI::WindowsAndMessaging::RegisterClassExW;
use windows::Win32::UI::WindowsAndMessaging::WNDCLASSEXW;
use windows::core::PCWSTR;
use windows::core::Param;
use windows::core::ParamValue;

use super::last_error;
use super::window_class::SandboxWindowClass;
use super::window_class::create_window_class_struct;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::status::Status;

/// Equivalent to the MAKEINTATOM macro in C/C++.
/// Converts a class atom into a PCWSTR that can be used
/// for window creation functions.
///
/// https://learn.microsoft.com/en-us/windows/win32/api/winbase/nf-winbase-makeintatom
#[allow(non_snake_case)]
pub fn MAKEINTOATOM(atom: u16) -> PCWSTR {
    PCWSTR(atom as *const u16)
}

#[derive(Clone, Copy, Debug)]
pub struct ClassIdAtom(u16);

impl Param<PCWSTR> for &ClassIdAtom {
    unsafe fn param(self) -> ParamValue<PCWSTR> {
        ParamValue::Owned(MAKEINTOATOM(self.0))
    }
}

pub fn register_window_class(class: &WNDCLASSEXW) -> Result<ClassIdAtom, Status> {
    let atom = unsafe { RegisterClassExW(class) };
    if atom == 0 {
        return Err(last_error());
    }
    Ok(ClassIdAtom(atom))
}

pub(crate) fn current_module() -> DxgiResult<HMODULE> {
    let mut out = Default::default();
    unsafe { GetModuleHandleExW(Default::default(), None, &mut out) }.call("GetModuleHandleExW")?;
    Ok(out)
}

/// Registers the sandbox window class on first use. Later calls reuse the
/// atom, or the failure, of the first registration.
pub(crate) fn sandbox_window_class() -> DxgiResult<ClassIdAtom> {
    static CLASS: OnceLock<Result<ClassIdAtom, Status>> = OnceLock::new();
    if let Some(registered) = CLASS.get() {
        return (*registered).call("RegisterClassExW");
    }
    let class = create_window_class_struct::<SandboxWindowClass>(current_module()?)?;
    (*CLASS.get_or_init(|| register_window_class(&class))).call("RegisterClassExW")
}
