//! Workspace placeholder crate.
//!
//! Exposes feature flags that map onto the workspace crates. Hosts that want
//! the wired-up service with the reqwest transport enable `desktop-shims`;
//! hosts that bring their own `HttpClient` and only need the resolution
//! engine enable `engine-only`.

#[cfg(feature = "desktop-shims")]
pub use core_service;

#[cfg(feature = "engine-only")]
pub use core_lyrics;
