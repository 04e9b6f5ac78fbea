//! Pull-based reader over a JSON array of examples
//!
//! Elements are scanned one at a time: the raw bytes of a single element are
//! buffered, decoded, and handed out before the next one is read, so memory
//! stays bounded by the largest element rather than the array.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::iter::FusedIterator;

use crate::error::{Result, TeachError};
use crate::models::Example;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// After '[', before any element
    First,
    /// After at least one element
    Subsequent,
    /// Closing ']' consumed
    Finished,
    /// Source ended before ']'
    Truncated,
    /// An error has already been yielded
    Failed,
}

/// Lazy, forward-only sequence of examples read from a byte source
///
/// The stream owns the source; it is released when the stream is closed or
/// dropped. Starting over means opening a fresh stream on a fresh source.
pub struct ExampleStream<R> {
    inner: BufReader<R>,
    offset: u64,
    position: usize,
    state: State,
}

impl<R: Read> ExampleStream<R> {
    /// Take ownership of `reader` and consume the opening '['
    pub fn open(reader: R) -> Result<Self> {
        Self::open_named(reader, "reader")
    }

    /// Like [`open`](Self::open); `name` identifies the source in errors
    ///
    /// A read failure before the opening '[' is `SourceUnavailable`.
    pub fn open_named(reader: R, name: &str) -> Result<Self> {
        let mut stream = Self {
            inner: BufReader::new(reader),
            offset: 0,
            position: 0,
            state: State::First,
        };

        let unavailable = |err: TeachError| match err {
            TeachError::Read { source, .. } => TeachError::SourceUnavailable {
                path: name.to_string(),
                source,
            },
            other => other,
        };

        stream.skip_whitespace().map_err(unavailable)?;
        match stream.peek().map_err(unavailable)? {
            Some(b'[') => {
                stream.bump();
                Ok(stream)
            }
            Some(other) => Err(stream.malformed(format!(
                "expected '[' at start of source, found {:?}",
                other as char
            ))),
            None => Err(stream.malformed("source is empty, expected '['")),
        }
    }

    /// Number of examples decoded so far, i.e. the ordinal of the next one
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check the container was properly terminated and release the source
    ///
    /// Succeeds when the closing ']' was reached with only whitespace after
    /// it, or when the stream already yielded an error (which the caller is
    /// reporting instead).
    pub fn close(mut self) -> Result<()> {
        match self.state {
            State::Finished => {
                self.skip_whitespace()?;
                match self.peek()? {
                    None => Ok(()),
                    Some(other) => Err(self.malformed(format!(
                        "unexpected {:?} after closing ']'",
                        other as char
                    ))),
                }
            }
            State::Truncated => Err(self.malformed("source ended before closing ']'")),
            State::First | State::Subsequent => {
                Err(self.malformed("stream closed before reaching ']'"))
            }
            State::Failed => Ok(()),
        }
    }

    fn advance(&mut self) -> Result<Option<Example>> {
        match self.state {
            State::Finished | State::Truncated | State::Failed => return Ok(None),
            State::First | State::Subsequent => {}
        }

        self.skip_whitespace()?;
        match (self.state, self.peek()?) {
            (_, None) => {
                self.state = State::Truncated;
                return Ok(None);
            }
            (_, Some(b']')) => {
                self.bump();
                self.state = State::Finished;
                return Ok(None);
            }
            (State::First, Some(b',')) => {
                return Err(self.malformed("unexpected ',' before first example"));
            }
            (State::Subsequent, Some(b',')) => {
                self.bump();
                self.skip_whitespace()?;
                match self.peek()? {
                    None => {
                        self.state = State::Truncated;
                        return Ok(None);
                    }
                    Some(b']') => return Err(self.malformed("trailing ',' before ']'")),
                    Some(b',') => return Err(self.malformed("empty element between ','")),
                    Some(_) => {}
                }
            }
            (State::Subsequent, Some(other)) => {
                return Err(self.malformed(format!(
                    "expected ',' or ']' after example {}, found {:?}",
                    self.position - 1,
                    other as char
                )));
            }
            (_, Some(_)) => {}
        }

        let Some(raw) = self.scan_element()? else {
            self.state = State::Truncated;
            return Ok(None);
        };

        let example = serde_json::from_slice(&raw).map_err(|source| TeachError::Decode {
            position: self.position,
            source,
        })?;
        self.position += 1;
        self.state = State::Subsequent;
        Ok(Some(example))
    }

    /// Collect the raw bytes of one element; `None` if the source ends inside it
    fn scan_element(&mut self) -> Result<Option<Vec<u8>>> {
        let mut raw = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        while let Some(byte) = self.peek()? {
            if in_string {
                self.bump();
                raw.push(byte);
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                    if depth == 0 {
                        return Ok(Some(raw));
                    }
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' if depth == 0 => return Ok(Some(raw)),
                b'}' | b']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        raw.push(byte);
                        return Ok(Some(raw));
                    }
                }
                b',' if depth == 0 => return Ok(Some(raw)),
                b if depth == 0 && b.is_ascii_whitespace() => return Ok(Some(raw)),
                _ => {}
            }

            self.bump();
            raw.push(byte);
        }

        Ok(None)
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.bump();
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TeachError::Read {
                        position: self.position,
                        source,
                    })
                }
            }
        }
    }

    fn bump(&mut self) {
        self.inner.consume(1);
        self.offset += 1;
    }

    fn malformed(&self, reason: impl Into<String>) -> TeachError {
        TeachError::MalformedContainer {
            offset: self.offset,
            reason: reason.into(),
        }
    }
}

impl<R: Read> Iterator for ExampleStream<R> {
    type Item = Result<Example>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(example)) => Some(Ok(example)),
            Ok(None) => None,
            Err(e) => {
                self.state = State::Failed;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for ExampleStream<R> {}
