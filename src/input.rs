//! Mouse input injection.
//!
//! The click loop talks to a [`MouseInjector`]. [`SystemInjector`] sends real
//! events through `SendInput` on Windows and refuses to construct anywhere else.

use crate::config::MouseButton;
use crate::error::{ClickerError, Result};

/// Emits button press and release events.
pub trait MouseInjector {
    fn press(&mut self, button: MouseButton) -> Result<()>;

    fn release(&mut self, button: MouseButton) -> Result<()>;

    /// One press followed by one release.
    fn click(&mut self, button: MouseButton) -> Result<()> {
        self.press(button)?;
        self.release(button)
    }
}

/// Injects clicks at the current cursor position through the OS input API.
#[derive(Debug, Clone)]
pub struct SystemInjector {
    _private: (),
}

impl SystemInjector {
    #[cfg(windows)]
    pub fn new() -> Result<Self> {
        Ok(Self { _private: () })
    }

    #[cfg(not(windows))]
    pub fn new() -> Result<Self> {
        Err(ClickerError::unsupported_platform(
            "mouse input injection is only available on Windows",
        ))
    }

    #[cfg(windows)]
    fn send(&self, flags: u32) -> Result<()> {
        use std::mem;
        use winapi::um::winuser::{SendInput, INPUT, INPUT_MOUSE, MOUSEINPUT};

        // SAFETY: INPUT is a plain C struct; zeroed is a valid starting value
        // and the mouse variant is the one selected by `type_`.
        let sent = unsafe {
            let mut input: INPUT = mem::zeroed();
            input.type_ = INPUT_MOUSE;
            *input.u.mi_mut() = MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            };
            SendInput(1, &mut input, mem::size_of::<INPUT>() as i32)
        };

        if sent != 1 {
            return Err(ClickerError::input_injection(format!(
                "SendInput rejected event 0x{:04x}: {}",
                flags,
                std::io::Error::last_os_error()
            )));
        }

        Ok(())
    }

    #[cfg(not(windows))]
    fn send(&self, flags: u32) -> Result<()> {
        Err(ClickerError::unsupported_platform(format!(
            "cannot inject mouse event 0x{:04x} on this platform",
            flags
        )))
    }
}

impl MouseInjector for SystemInjector {
    fn press(&mut self, button: MouseButton) -> Result<()> {
        let (down, _) = button.event_flags();
        self.send(down)
    }

    fn release(&mut self, button: MouseButton) -> Result<()> {
        let (_, up) = button.event_flags();
        self.send(up)
    }
}
