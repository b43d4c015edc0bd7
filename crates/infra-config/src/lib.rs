// Queue Daemon Infrastructure - Configuration Adapter
// Implements: QueueSource over the daemon's config file

mod file_source;

pub use file_source::{executable_dir, FileQueueSource, CONFIG_FILE_STEM, CONFIG_EXTENSIONS};
