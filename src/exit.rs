// src/exit.rs
//! Process exit codes for `docwright`.
//!
//! Provides a stable contract for scripts and pre-commit hooks.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DocwrightExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (IO, network, config).
    Error = 1,
    /// Bad arguments or a missing target path.
    InvalidInput = 2,
    /// At least one file failed to process.
    ProcessingFailed = 3,
    /// `check` found functions missing or needing docstrings.
    Undocumented = 4,
}

impl DocwrightExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for DocwrightExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<()>> for DocwrightExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                Self::Error
            }
        }
    }
}
