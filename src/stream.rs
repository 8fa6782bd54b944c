use crate::config::Config;
use crate::renderer::TerminalRenderer;
use crate::terminal::{FrameWriter, Spinner, supports_color};
use crate::theme::{ThemeElement, create_style};
use crate::utils::strip_leading_bom;
use anyhow::Result;
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

/// Text received so far. It only ever grows.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    text: String,
    chunks_received: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        self.chunks_received += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chunks_received(&self) -> usize {
        self.chunks_received
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Iterator over `size`-byte slices of a text, each widened to the next
/// char boundary.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut end = self.size.min(self.rest.len());
        while !self.rest.is_char_boundary(end) {
            end += 1;
        }

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

/// Split `text` into chunks of roughly `size` bytes without cutting a
/// UTF-8 sequence. A size of zero is treated as one.
pub fn chunks(text: &str, size: usize) -> Chunks<'_> {
    Chunks {
        rest: text,
        size: size.max(1),
    }
}

/// Text chunks read from a byte stream as soon as they arrive. Incomplete
/// UTF-8 sequences are held back until the rest of their bytes are read;
/// invalid bytes become U+FFFD. A leading BOM is dropped.
pub struct ReaderChunks<R: Read> {
    reader: R,
    buf: Vec<u8>,
    pending: Vec<u8>,
    started: bool,
}

impl<R: Read> ReaderChunks<R> {
    pub fn new(reader: R, read_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; read_size.max(4)],
            pending: Vec::new(),
            started: false,
        }
    }

    /// Length of the prefix of `pending` that can be decoded now. An invalid
    /// byte counts as complete; a split sequence at the end does not.
    fn complete_len(&self) -> usize {
        match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) => match e.error_len() {
                Some(invalid) => e.valid_up_to() + invalid,
                None => e.valid_up_to(),
            },
        }
    }

    fn decode(&mut self, cut: usize) -> Option<String> {
        let rest = self.pending.split_off(cut);
        let bytes = std::mem::replace(&mut self.pending, rest);
        let mut text = String::from_utf8_lossy(&bytes).into_owned();

        if !self.started {
            strip_leading_bom(&mut text);
            self.started = !text.is_empty();
        }

        (!text.is_empty()).then_some(text)
    }
}

impl<R: Read> Iterator for ReaderChunks<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cut = self.complete_len();
            if cut > 0 {
                match self.decode(cut) {
                    Some(text) => return Some(Ok(text)),
                    None => continue,
                }
            }

            let read = match self.reader.read(&mut self.buf) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };

            if read == 0 {
                if self.pending.is_empty() {
                    return None;
                }
                let cut = self.pending.len();
                return self.decode(cut).map(Ok);
            }

            self.pending.extend_from_slice(&self.buf[..read]);
        }
    }
}

/// Drives a sequence of chunks to the terminal in one of three modes:
/// live frames (default), raw passthrough or a single buffered render.
pub struct StreamPlayer<W: Write> {
    config: Config,
    out: W,
    status: Box<dyn Write>,
}

impl<W: Write> StreamPlayer<W> {
    pub fn new(config: &Config, out: W) -> Self {
        Self {
            config: config.clone(),
            out,
            status: Box::new(io::stderr()),
        }
    }

    /// Send the buffered-mode spinner somewhere other than stderr.
    pub fn with_status(mut self, status: Box<dyn Write>) -> Self {
        self.status = status;
        self
    }

    /// Consume every chunk and return the complete text received.
    pub fn play<I, S>(self, chunks: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.config.raw {
            log::info!("Streaming raw Markdown");
            self.play_raw(chunks)
        } else if self.config.no_stream {
            log::info!("Buffering until the stream completes");
            self.play_buffered(chunks)
        } else {
            log::info!("Streaming live frames");
            self.play_live(chunks)
        }
    }

    fn pause(&self) {
        if self.config.delay_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.delay_ms));
        }
    }

    fn play_raw<I, S>(mut self, chunks: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = StreamBuffer::new();
        for chunk in chunks {
            let chunk = chunk.as_ref();
            buffer.push_str(chunk);
            self.out.write_all(chunk.as_bytes())?;
            self.out.flush()?;
            log::debug!("chunk {}: {} bytes", buffer.chunks_received(), chunk.len());
            self.pause();
        }

        if !buffer.is_empty() && !buffer.as_str().ends_with('\n') {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(buffer.into_string())
    }

    fn play_buffered<I, S>(mut self, chunks: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let renderer = TerminalRenderer::new(&self.config)?;
        let mut spinner = Spinner::default();
        let mut buffer = StreamBuffer::new();

        for chunk in chunks {
            let chunk = chunk.as_ref();
            buffer.push_str(chunk);
            write!(self.status, "\r{}", spinner.next_frame())?;
            self.status.flush()?;
            self.pause();
        }
        write!(self.status, "\r \r")?;
        self.status.flush()?;

        let output = renderer.render(buffer.as_str())?;
        log::debug!(
            "rendered {} bytes from {} chunks",
            output.len(),
            buffer.chunks_received()
        );
        self.out.write_all(output.as_bytes())?;
        self.out.flush()?;
        Ok(buffer.into_string())
    }

    fn play_live<I, S>(self, chunks: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let renderer = TerminalRenderer::new(&self.config)?;
        let no_colors = self.config.no_colors || !supports_color();
        let spinner_style = create_style(renderer.theme(), ThemeElement::Spinner);
        let delay = self.config.delay_ms;

        let mut frames = FrameWriter::new(self.out, self.config.get_terminal_width());
        let mut spinner = Spinner::default();
        let mut buffer = StreamBuffer::new();

        for chunk in chunks {
            let chunk = chunk.as_ref();
            buffer.push_str(chunk);
            let frame = renderer.render(buffer.as_str())?;
            let glyph = spinner.next_frame().to_string();
            frames.draw(&format!("{}{}", frame, spinner_style.apply(&glyph, no_colors)))?;
            log::debug!(
                "frame {}: {} rows",
                buffer.chunks_received(),
                frames.prev_lines()
            );
            if delay > 0 {
                thread::sleep(Duration::from_millis(delay));
            }
        }

        let frame = renderer.render(buffer.as_str())?;
        frames.draw(&frame)?;
        frames.finish()?;
        Ok(buffer.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ThemeMode;

    fn test_config() -> Config {
        Config {
            no_colors: true,
            cols: Some(60),
            cols_from_cli: true,
            theme: ThemeMode::Dark,
            delay_ms: 0,
            ..Config::default()
        }
    }

    #[derive(Clone, Default)]
    struct SharedSink(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn buffer_accumulates_chunks() {
        let mut buffer = StreamBuffer::new();
        assert!(buffer.is_empty());
        buffer.push_str("Hello ");
        buffer.push_str("**world");
        assert_eq!(buffer.as_str(), "Hello **world");
        assert_eq!(buffer.chunks_received(), 2);
    }

    #[test]
    fn chunks_respect_char_boundaries() {
        let text = "añb日本語c";
        let parts: Vec<&str> = chunks(text, 2).collect();
        assert_eq!(parts.concat(), text);
        assert_eq!(parts, vec!["añ", "b日", "本", "語", "c"]);
    }

    #[test]
    fn zero_chunk_size_still_advances() {
        let parts: Vec<&str> = chunks("abc", 0).collect();
        assert_eq!(parts, vec!["a", "b", "c"]);
        assert_eq!(chunks("", 4).count(), 0);
    }

    struct Drip(std::collections::VecDeque<Vec<u8>>);

    impl Read for Drip {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(piece) => {
                    buf[..piece.len()].copy_from_slice(&piece);
                    Ok(piece.len())
                }
                None => Ok(0),
            }
        }
    }

    fn drip(pieces: &[&[u8]]) -> Drip {
        Drip(pieces.iter().map(|piece| piece.to_vec()).collect())
    }

    #[test]
    fn reader_chunks_hold_back_split_sequences() {
        let bytes = "a日b".as_bytes();
        let source = drip(&[&bytes[..2], &bytes[2..4], &bytes[4..]]);
        let parts: Vec<String> = ReaderChunks::new(source, 16)
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(parts, vec!["a", "日", "b"]);
    }

    #[test]
    fn reader_chunks_drop_bom_and_replace_invalid_bytes() {
        let source = drip(&["\u{feff}".as_bytes(), b"# T", b"\xffx"]);
        let parts: Vec<String> = ReaderChunks::new(source, 16)
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(parts, vec!["# T", "\u{fffd}", "x"]);
    }

    #[test]
    fn text_after_an_invalid_byte_needs_no_further_read() {
        let mut chunks = ReaderChunks::new(drip(&[b"\xffx", b"y"]), 16);
        assert_eq!(chunks.next().unwrap().unwrap(), "\u{fffd}");
        assert_eq!(chunks.next().unwrap().unwrap(), "x");
        assert_eq!(chunks.reader.0.len(), 1, "\"y\" is still unread");
        assert_eq!(chunks.next().unwrap().unwrap(), "y");
        assert!(chunks.next().is_none());
    }

    #[test]
    fn raw_mode_writes_chunks_verbatim() {
        let config = Config {
            raw: true,
            ..test_config()
        };
        let mut out = Vec::new();
        let text = StreamPlayer::new(&config, &mut out)
            .play(chunks("Some **bold", 4))
            .unwrap();

        assert_eq!(text, "Some **bold");
        assert_eq!(String::from_utf8(out).unwrap(), "Some **bold\n");
    }

    #[test]
    fn buffered_mode_renders_once_and_clears_spinner() {
        let config = Config {
            no_stream: true,
            ..test_config()
        };
        let status = SharedSink::default();
        let mut out = Vec::new();
        StreamPlayer::new(&config, &mut out)
            .with_status(Box::new(status.clone()))
            .play(chunks("# Hi\n\nSome **bold", 3))
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "# Hi\n\nSome bold\n");
        let status = String::from_utf8(status.0.borrow().clone()).unwrap();
        assert!(status.starts_with("\r|"));
        assert!(status.ends_with("\r \r"));
    }

    #[test]
    fn live_mode_ends_with_final_frame_without_spinner() {
        let mut out = Vec::new();
        let text = StreamPlayer::new(&test_config(), &mut out)
            .play(["Some **bo", "ld text"])
            .unwrap();

        assert_eq!(text, "Some **bold text");
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("Some bo\n|"));
        assert!(written.contains("Some bold text\n/"));
        assert!(written.ends_with("Some bold text\n"));
    }

    #[test]
    fn every_prefix_of_a_stream_renders_live() {
        let document = "## Notes\n\n```python\nprint('hi')\n```\n\n| k | v |\n|---|---|\n| x | *y* |\n";
        let mut out = Vec::new();
        let text = StreamPlayer::new(&test_config(), &mut out)
            .play(chunks(document, 1))
            .unwrap();
        assert_eq!(text, document);
    }
}
