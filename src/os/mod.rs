//! Operating system abstraction layer
//!
//! The only service the core asks of the operating system is a best-effort
//! source of entropy for [`crate::rng::pseudo_seed`].  Each platform
//! module exposes the same function; on platforms without a wired-up
//! source the fallback reports failure and the caller degrades to its
//! fixed seed, as the seeding contract requires.

#[cfg(target_os = "linux")]
pub(crate) mod linux;

#[cfg(target_os = "linux")]
pub(crate) use linux::*;

#[cfg(target_os = "macos")]
pub(crate) mod macos;

#[cfg(target_os = "macos")]
pub(crate) use macos::*;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub(crate) mod fallback;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub(crate) use fallback::*;
