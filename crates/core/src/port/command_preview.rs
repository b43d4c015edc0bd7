// Command Preview Port
// Receives the rendered command lines of a dry run instead of executing them

/// Sink for dry-run output
pub trait CommandPreview: Send + Sync {
    /// Emit one rendered command line
    fn emit(&self, line: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records every emitted line
    #[derive(Default)]
    pub struct RecordingPreview {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingPreview {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl CommandPreview for RecordingPreview {
        fn emit(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }
}
