// Purpose - external interfaces: the sound card and audio files

#[cfg(feature = "rtrb")]
pub mod backend;
pub mod wav;

#[cfg(feature = "rtrb")]
pub use backend::{BackendError, BackendSink, BackendState};
pub use wav::write_wav;
