//! # Console
//! Line-based input and output shared by the players of a game.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use super::commands::Message;

/// Where players read messages and type their answers.
pub trait Terminal {
    /// Reads one line of input, or `None` once the input is closed.
    fn read_line(&mut self) -> std::io::Result<Option<String>>;

    /// Shows a message.
    fn send_message(&mut self, message: Message<'_>) -> std::io::Result<()>;
}

/// A terminal over any pair of byte streams, usually standard input and output.
pub struct Console<I: Read, O: Write> {
    reader: BufReader<I>,
    writer: BufWriter<O>,
}
impl<I: Read, O: Write> Console<I, O> {
    /// Creates a new console over the given input and output streams.
    pub fn new(input: I, output: O) -> Self {
        Self {
            reader: BufReader::new(input),
            writer: BufWriter::new(output),
        }
    }

    /// Gives back the output stream, flushing anything still buffered.
    pub fn into_output(self) -> std::io::Result<O> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
impl<I: Read, O: Write> Terminal for Console<I, O> {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end().to_string()))
    }

    fn send_message(&mut self, message: Message<'_>) -> std::io::Result<()> {
        write!(self.writer, "{message}")?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::colour::Colour;

    #[test]
    fn reads_lines_until_closed() {
        let mut console = Console::new("e2e4\r\nsave\n".as_bytes(), Vec::new());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("e2e4"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("save"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn writes_messages() {
        let mut console = Console::new("".as_bytes(), Vec::new());
        console.send_message(Message::Check(Colour::Black)).unwrap();
        let output = String::from_utf8(console.into_output().unwrap()).unwrap();
        assert_eq!(output, "Black is in check!\n");
    }
}
