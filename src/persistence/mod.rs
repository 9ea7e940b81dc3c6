pub mod blob;
pub mod files;
pub mod settings;
pub mod snapshot;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use files::{
    atomic_write, ensure_data_dir, get_data_dir, init_local_data_dir, log_file, read_file,
    settings_file,
};
pub use settings::{load_settings, save_settings, Settings};
pub use snapshot::{export_tasks, import_tasks, load_snapshot, save_snapshot, Snapshot};
