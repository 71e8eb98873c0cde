use crate::error::ParseErrorKind;
use crate::types::IndexedVert;

/// Lengths of the vertex lists accumulated so far in the current pass.
///
/// Relative (negative) face indices count backward from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListLengths {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

/// Decode a decimal literal: optional leading `-`, digits, optional
/// fraction. Exponents are not accepted.
pub fn parse_float(token: &[u8]) -> Result<f32, ParseErrorKind> {
    let digits = token.strip_prefix(b"-").unwrap_or(token);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for &b in digits {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            b'.' => return Err(ParseErrorKind::MalformedFloat("repeated decimal point")),
            b'-' => return Err(ParseErrorKind::MalformedFloat("misplaced sign")),
            _ => return Err(ParseErrorKind::MalformedFloat("could not parse float")),
        }
    }
    if !seen_digit {
        return Err(ParseErrorKind::MalformedFloat("no digits"));
    }
    fast_float2::parse::<f32, _>(token)
        .map_err(|_| ParseErrorKind::MalformedFloat("could not parse float"))
}

/// Like [`parse_float`], but a missing token is also an error.
pub fn expect_float(token: Option<&[u8]>) -> Result<f32, ParseErrorKind> {
    match token {
        Some(token) => parse_float(token),
        None => Err(ParseErrorKind::MalformedFloat("expected float")),
    }
}

/// Parse one signed integer sub-field. An empty field is absent.
fn parse_index(field: &[u8]) -> Result<Option<i64>, ParseErrorKind> {
    if field.is_empty() {
        return Ok(None);
    }
    let (negative, digits) = match field.strip_prefix(b"-") {
        Some(rest) => (true, rest),
        None => (false, field),
    };
    if digits.is_empty() {
        return Err(ParseErrorKind::MalformedFaceIndex("sign without digits"));
    }
    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(ParseErrorKind::MalformedFaceIndex("unexpected character"));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(b - b'0')))
            .ok_or(ParseErrorKind::MalformedFaceIndex("index overflow"))?;
    }
    Ok(Some(if negative { -value } else { value }))
}

/// Map a 1-based or relative file index onto a 0-based list slot.
fn resolve(value: i64, len: usize) -> Result<u32, ParseErrorKind> {
    let slot = if value > 0 {
        usize::try_from(value - 1).ok()
    } else {
        usize::try_from(value.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    };
    let slot = slot.ok_or(ParseErrorKind::MalformedFaceIndex(
        "relative index before start of list",
    ))?;
    u32::try_from(slot).map_err(|_| ParseErrorKind::MalformedFaceIndex("index overflow"))
}

/// Resolve an optional texcoord/normal field; absent or zero means slot 0.
fn resolve_optional(value: Option<i64>, len: usize) -> Result<u32, ParseErrorKind> {
    match value {
        None | Some(0) => Ok(0),
        Some(v) => resolve(v, len),
    }
}

/// Decode a `pos`, `pos/tex`, `pos/tex/norm` or `pos//norm` record.
pub fn parse_face_index_group(
    token: &[u8],
    lengths: &ListLengths,
) -> Result<IndexedVert, ParseErrorKind> {
    let mut fields = token.split(|&b| b == b'/');
    let pos = fields.next().map(parse_index).transpose()?.flatten();
    let texcoord = fields.next().map(parse_index).transpose()?.flatten();
    let normal = fields.next().map(parse_index).transpose()?.flatten();
    if fields.next().is_some() {
        return Err(ParseErrorKind::MalformedFaceIndex("too many slashes"));
    }

    let pos = match pos {
        None => return Err(ParseErrorKind::MalformedFaceIndex("missing position index")),
        Some(0) => return Err(ParseErrorKind::MalformedFaceIndex("position index 0")),
        Some(v) => resolve(v, lengths.positions)?,
    };

    Ok(IndexedVert {
        pos,
        texcoord: resolve_optional(texcoord, lengths.texcoords)?,
        normal: resolve_optional(normal, lengths.normals)?,
    })
}
