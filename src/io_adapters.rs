use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{self, BufRead, Result as IoResult, Write};
use std::rc::Rc;

/// Source of input lines for the shell.
///
/// `read_line` shows the prompt, blocks until a line is available and returns
/// it without the line terminator. `Ok(None)` means the input is exhausted.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> IoResult<Option<String>>;
}

/// Interactive terminal input with line editing and history.
pub struct EditorReader {
    editor: DefaultEditor,
    history: bool,
}

impl EditorReader {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            history: true,
        })
    }

    /// Keep or drop entered lines from the editor history.
    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> IoResult<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if self.history && !line.trim().is_empty() {
                        self.editor
                            .add_history_entry(line.as_str())
                            .map_err(into_io_error)?;
                    }
                    return Ok(Some(line));
                }
                // Ctrl-C drops the current line only.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(into_io_error(err)),
            }
        }
    }
}

fn into_io_error(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(err) => err,
        other => io::Error::other(other),
    }
}

/// Lines from any buffered reader, e.g. piped stdin or a test buffer.
///
/// The prompt is written to the shell output before each read. Bytes that are
/// not valid UTF-8 are replaced with U+FFFD, so a garbled line reaches the
/// parser instead of ending the input.
pub struct BufReadLines<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> BufReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> LineReader for BufReadLines<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> IoResult<Option<String>> {
        write!(out, "{prompt}")?;
        out.flush()?;

        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&self.buffer);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Shell output kept in memory.
///
/// [`crate::Interpreter::with_output`] takes ownership of its writer, so the
/// captured bytes are read back through a shared handle: prompts, command
/// output and error reports all end up in the same buffer.
#[derive(Default)]
pub struct MemWriter {
    captured: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer this writer appends to.
    pub fn into_inner(self) -> Rc<RefCell<Vec<u8>>> {
        self.captured
    }

    /// A writer to hand to the interpreter plus a handle to inspect what the
    /// shell printed.
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let writer = MemWriter::new();
        let handle = Rc::clone(&writer.captured);
        (writer, handle)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.captured.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_buf_read_lines_strips_terminators() {
        let mut reader = BufReadLines::new(Cursor::new("one\r\ntwo\nthree"));
        let mut out = Vec::new();

        assert_eq!(reader.read_line("> ", &mut out).unwrap().as_deref(), Some("one"));
        assert_eq!(reader.read_line("> ", &mut out).unwrap().as_deref(), Some("two"));
        assert_eq!(reader.read_line("> ", &mut out).unwrap().as_deref(), Some("three"));
        assert_eq!(reader.read_line("> ", &mut out).unwrap(), None);

        assert_eq!(String::from_utf8(out).unwrap(), "> > > > ");
    }

    #[test]
    fn test_buf_read_lines_keeps_blank_lines() {
        let mut reader = BufReadLines::new(Cursor::new("\n\nx\n"));
        let mut out = Vec::new();

        assert_eq!(reader.read_line("", &mut out).unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line("", &mut out).unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line("", &mut out).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_buf_read_lines_replaces_invalid_utf8() {
        let mut reader = BufReadLines::new(Cursor::new(b"ok\n\xff\xfe\nnext\n".to_vec()));
        let mut out = Vec::new();

        assert_eq!(reader.read_line("", &mut out).unwrap().as_deref(), Some("ok"));
        assert_eq!(
            reader.read_line("", &mut out).unwrap().as_deref(),
            Some("\u{FFFD}\u{FFFD}")
        );
        assert_eq!(reader.read_line("", &mut out).unwrap().as_deref(), Some("next"));
        assert_eq!(reader.read_line("", &mut out).unwrap(), None);
    }

    #[test]
    fn test_mem_writer_shares_buffer() {
        let (mut writer, handle) = MemWriter::with_handle();
        write!(writer, "hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(handle.borrow().as_slice(), b"hello");
        assert_eq!(writer.into_inner().borrow().len(), 5);
    }
}
