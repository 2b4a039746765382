/// Cloud sync
///
/// - `backend.rs` - the auth / document / blob seam a provider implements
/// - `memory.rs` - in-process backend
/// - `sync.rs` - upload and download of serialized drawings

pub mod backend;
pub mod memory;
pub mod sync;

pub use backend::{CloudBackend, Document, UserSession};
pub use memory::MemoryBackend;
pub use sync::{CloudDrawing, CloudSync};
