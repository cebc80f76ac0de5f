//! Pre-built voices.
//!
//! Each voice is a ready-to-use node graph. `keys` is the strummed
//! electric-piano tone every chord is played with; `KeysPatch` exposes its
//! sound-design parameters.
//!
//! # Example
//!
//! ```
//! use strumkit::voices::{self, KeysPatch};
//!
//! let default = voices::keys();
//! let damped = voices::keys_with(&KeysPatch {
//!     release: 0.4,
//!     ..KeysPatch::default()
//! });
//! # let _ = (default, damped);
//! ```

mod keys;

pub use keys::{keys, keys_with, KeysPatch};
