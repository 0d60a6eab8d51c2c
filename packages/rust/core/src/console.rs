//! The operator terminal seam.

use wonderchat_shared::Result;

/// Line-oriented operator I/O.
///
/// The binary implements this over stdin/stdout; tests drive flows with a
/// scripted implementation.
pub trait Console {
    /// Show `prompt` (no newline appended) and read one line without its
    /// line terminator. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of output.
    fn say(&mut self, line: &str);

    /// A network call is starting.
    fn busy(&mut self, _label: &str) {}

    /// The network call finished.
    fn idle(&mut self) {}
}
