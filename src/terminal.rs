//! Raw terminal input
//!
//! While a [`RawMode`] is alive, stdin delivers bytes as they are typed,
//! without line buffering or echo. Dropping it restores the saved settings.
//! SIGINT and SIGTERM restore them too before the process dies, since `Drop`
//! never runs in that case.

use std::io::{self, IsTerminal};
use tracing::{debug, warn};

/// Scoped raw-mode setting for stdin
pub struct RawMode {
    #[cfg(unix)]
    saved: libc::termios,
    #[cfg(unix)]
    previous_handlers: [libc::sighandler_t; 2],
}

impl RawMode {
    /// Switch stdin to raw mode when it is a terminal and `wanted` is set.
    ///
    /// Returns `None` when nothing was changed, including when the terminal
    /// refuses the new settings.
    pub fn enable_if(wanted: bool) -> Option<Self> {
        if !wanted || !io::stdin().is_terminal() {
            return None;
        }

        match Self::enable() {
            Ok(mode) => {
                debug!("stdin switched to raw mode");
                Some(mode)
            }
            Err(err) => {
                warn!(error = %err, "could not switch stdin to raw mode");
                None
            }
        }
    }

    #[cfg(unix)]
    fn enable() -> io::Result<Self> {
        let fd = libc::STDIN_FILENO;
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut saved) } == -1 {
            return Err(io::Error::last_os_error());
        }

        // Settings from before the first switch are the ones to go back to
        let _ = signals::SAVED.set(saved);
        let previous_handlers = signals::install();

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } == -1 {
            signals::uninstall(previous_handlers);
            return Err(io::Error::last_os_error());
        }

        Ok(RawMode {
            saved,
            previous_handlers,
        })
    }

    #[cfg(not(unix))]
    fn enable() -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode is only available on unix terminals",
        ))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &self.saved);
            signals::uninstall(self.previous_handlers);
        }
    }
}

#[cfg(unix)]
mod signals {
    use std::sync::OnceLock;

    const SIGNALS: [libc::c_int; 2] = [libc::SIGINT, libc::SIGTERM];

    pub(super) static SAVED: OnceLock<libc::termios> = OnceLock::new();

    /// Put the terminal back, then die from the same signal.
    pub(super) extern "C" fn restore_and_reraise(signal: libc::c_int) {
        unsafe {
            if let Some(saved) = SAVED.get() {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
            }
            libc::signal(signal, libc::SIG_DFL);
            libc::raise(signal);
        }
    }

    pub(super) fn handler() -> libc::sighandler_t {
        restore_and_reraise as extern "C" fn(libc::c_int) as libc::sighandler_t
    }

    /// Returns the handlers that were replaced.
    pub(super) fn install() -> [libc::sighandler_t; 2] {
        SIGNALS.map(|signal| unsafe { libc::signal(signal, handler()) })
    }

    pub(super) fn uninstall(previous: [libc::sighandler_t; 2]) {
        for (signal, handler) in SIGNALS.into_iter().zip(previous) {
            unsafe {
                libc::signal(signal, handler);
            }
        }
    }
}
