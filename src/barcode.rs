// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Barcode capture from line-oriented scanner input.
//!
//! Handheld scanners in keyboard mode emit the code followed by a newline.
//! The reader accepts any buffered async source; production uses stdin.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented code source.
pub struct CodeReader<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> CodeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Next scanned code, skipping blank reads. `None` at end of input.
    pub async fn next_code(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(code) = normalize(&line) {
                return Ok(Some(code));
            }
        }
        Ok(None)
    }
}

/// Reader over standard input.
pub fn stdin_reader() -> CodeReader<BufReader<Stdin>> {
    CodeReader::new(BufReader::new(tokio::io::stdin()))
}

/// Trim scanner framing; empty reads are discarded.
fn normalize(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_framing() {
        assert_eq!(
            normalize("  8901030895559\r"),
            Some("8901030895559".to_string())
        );
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
    }

    #[tokio::test]
    async fn test_reads_codes_skipping_blank_lines() -> Result<()> {
        let input: &[u8] = b"123456\n\n  789\r\n\n";
        let mut reader = CodeReader::new(input);

        assert_eq!(reader.next_code().await?.as_deref(), Some("123456"));
        assert_eq!(reader.next_code().await?.as_deref(), Some("789"));
        assert_eq!(reader.next_code().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_input_ends_immediately() -> Result<()> {
        let mut reader = CodeReader::new(&b""[..]);
        assert_eq!(reader.next_code().await?, None);
        Ok(())
    }
}
