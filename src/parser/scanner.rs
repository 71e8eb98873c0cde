use memchr::memchr;

#[inline(always)]
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// Iterator over the `\n`-separated lines of a buffer. Both parse passes
/// walk the input through it.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
    number: usize,
}

impl<'a> Lines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            number: 0,
        }
    }

    /// Number of lines yielded so far, i.e. the 1-based number of the
    /// most recent line.
    pub fn line_number(&self) -> usize {
        self.number
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.pos >= self.data.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.data[start..];
        let end = memchr(b'\n', rest).unwrap_or(rest.len());
        self.pos += end + 1;
        self.number += 1;
        Some(Line::new(self.number, start, &rest[..end]))
    }
}

/// One source line with leading blanks trimmed, doubling as a token cursor.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub number: usize,
    rest: &'a [u8],
    /// Byte offset of `rest` in the whole buffer.
    offset: usize,
}

impl<'a> Line<'a> {
    /// `text` starts `offset` bytes into the buffer being scanned.
    pub fn new(number: usize, offset: usize, text: &'a [u8]) -> Self {
        let start = text
            .iter()
            .position(|&b| b != b' ' && b != b'\t')
            .unwrap_or(text.len());
        Self {
            number,
            rest: &text[start..],
            offset: offset + start,
        }
    }

    /// Next maximal run of non-whitespace bytes, or `None` at end of line.
    ///
    /// A token starting with `#` ends the line, which makes whole-line and
    /// trailing comments produce no tokens.
    pub fn next_token(&mut self) -> Option<&'a [u8]> {
        self.next_token_at().map(|(_, token)| token)
    }

    /// Like [`next_token`](Self::next_token), also returning the token's
    /// byte offset in the whole buffer.
    pub fn next_token_at(&mut self) -> Option<(usize, &'a [u8])> {
        let start = self.rest.iter().position(|&b| !is_space(b))?;
        let rest = &self.rest[start..];
        if rest[0] == b'#' {
            self.offset += self.rest.len();
            self.rest = &[];
            return None;
        }
        let len = rest.iter().position(|&b| is_space(b)).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(len);
        let at = self.offset + start;
        self.rest = tail;
        self.offset = at + len;
        Some((at, token))
    }
}
