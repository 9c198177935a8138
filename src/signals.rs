//! Shutdown on SIGINT, SIGTERM and SIGHUP.
//!
//! Handlers are installed without `SA_RESTART`. The handler raises a flag and points
//! stdin at `/dev/null`, so the prompt read (which std retries after `EINTR`) comes
//! back with end of input instead of blocking. The shell loop sees the flag and
//! unwinds normally, which lets the session finalizer run. Any confirmation asked
//! after that point reads end of input and is declined.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::SHUTDOWN;

    /// Descriptor of `/dev/null`, opened before any handler is installed.
    static DEV_NULL: AtomicI32 = AtomicI32::new(-1);

    extern "C" fn on_signal(_signal: libc::c_int) {
        SHUTDOWN.store(true, Ordering::SeqCst);
        let fd = DEV_NULL.load(Ordering::SeqCst);
        if fd >= 0 {
            // dup2(2) is async-signal-safe and never frees descriptor 0.
            unsafe {
                libc::dup2(fd, libc::STDIN_FILENO);
            }
        }
    }

    fn open_dev_null() -> io::Result<libc::c_int> {
        let fd = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(fd)
    }

    fn set_handler(signal: libc::c_int) -> io::Result<()> {
        let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
        action.sa_sigaction = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = 0;
        let result = unsafe {
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signal, &action, std::ptr::null_mut())
        };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn install() {
        if DEV_NULL.load(Ordering::SeqCst) < 0 {
            match open_dev_null() {
                Ok(fd) => DEV_NULL.store(fd, Ordering::SeqCst),
                Err(error) => tracing::warn!(%error, "cannot open /dev/null for shutdown"),
            }
        }
        for signal in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
            if let Err(error) = set_handler(signal) {
                tracing::warn!(signal, %error, "failed to install signal handler");
            }
        }
    }
}

#[cfg(unix)]
pub use imp::install;

#[cfg(not(unix))]
pub fn install() {}
