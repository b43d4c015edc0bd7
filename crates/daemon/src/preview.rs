// Dry-run output to stdout

use queue_daemon_core::port::CommandPreview;

pub struct StdoutPreview;

impl CommandPreview for StdoutPreview {
    fn emit(&self, line: &str) {
        println!("{}", line);
    }
}
