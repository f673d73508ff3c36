//! COM apartment RAII guard.
//!
//! Every UIA entry point initialises (or joins) the thread's MTA apartment
//! through [`ComGuard`] and tears it down on drop, including on early
//! return.  The `PhantomData<*const ()>` field keeps the guard `!Send` +
//! `!Sync`, so it cannot outlive its thread's apartment.

use std::marker::PhantomData;

use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_MULTITHREADED};

use crate::errors::WinaimError;

/// RAII wrapper that calls `CoUninitialize` on `Drop` when a balancing
/// call is owed.
///
/// Instantiate once per thread via [`ComGuard::init`] and keep it alive
/// across all COM calls.
#[must_use = "the COM apartment is torn down when the guard drops"]
pub struct ComGuard {
    should_uninit: bool,
    _not_send: PhantomData<*const ()>,
}

impl ComGuard {
    /// Initialise (or join) the thread's MTA COM apartment.
    ///
    /// `S_OK` and `S_FALSE` both owe a balancing `CoUninitialize`.
    /// `RPC_E_CHANGED_MODE` means the thread already runs an STA; COM is
    /// usable, but the apartment is not ours to tear down.
    pub fn init() -> Result<Self, WinaimError> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };

        match hr.0 as u32 {
            // S_OK | S_FALSE
            0x0 | 0x1 => Ok(Self {
                should_uninit: true,
                _not_send: PhantomData,
            }),
            // RPC_E_CHANGED_MODE
            0x8001_0106 => {
                tracing::warn!(
                    "CoInitializeEx: thread already has an STA apartment, using it instead of MTA"
                );
                Ok(Self {
                    should_uninit: false,
                    _not_send: PhantomData,
                })
            }
            value => Err(WinaimError::ComError(format!(
                "CoInitializeEx failed: HRESULT 0x{value:08X}"
            ))),
        }
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.should_uninit {
            unsafe { CoUninitialize() };
        }
    }
}
