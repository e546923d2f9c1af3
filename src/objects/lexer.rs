use crate::objects::error::FormatError;

/// Directives that are part of the format but carry nothing this loader keeps.
const IGNORED_DIRECTIVES: &[&str] = &[
    "s", "vp", "p", "l", "cstype", "deg", "bmat", "step", "curv", "curv2", "surf", "parm",
    "trim", "hole", "scrv", "sp", "end", "con", "mg", "bevel", "c_interp", "d_interp", "lod",
    "shadow_obj", "trace_obj", "ctech", "stech", "maplib", "usemap",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Vertex,
    Texture,
    Normal,
    Face,
    Group,
    Object,
    UseMaterial,
    MaterialLibrary,
    Ignored,
    Unknown,
}

impl Directive {
    pub fn classify(keyword: &str) -> Directive {
        let known = [
            ("v", Directive::Vertex),
            ("vt", Directive::Texture),
            ("vn", Directive::Normal),
            ("f", Directive::Face),
            ("g", Directive::Group),
            ("o", Directive::Object),
            ("usemtl", Directive::UseMaterial),
            ("mtllib", Directive::MaterialLibrary),
        ];

        for (name, directive) in known {
            if keyword_eq(keyword, name) {
                return directive;
            }
        }

        if IGNORED_DIRECTIVES.iter().any(|name| keyword_eq(keyword, name)) {
            return Directive::Ignored;
        }

        return Directive::Unknown;
    }
}

/// Ordinal, ASCII case-insensitive comparison of format keywords.
pub fn keyword_eq(a: &str, b: &str) -> bool {
    return a.eq_ignore_ascii_case(b);
}

pub fn is_blank(token: &str) -> bool {
    return token.trim().is_empty();
}

/// Parses a float using `.` as the only decimal separator, whatever the host locale.
///
/// Accepts an optional sign, digits with an optional fractional part and an
/// optional exponent. Special values (`inf`, `nan`) and anything that overflows
/// to infinity are rejected.
pub fn parse_float(token: &str) -> Result<f32, FormatError> {
    let invalid = || FormatError::InvalidNumber {
        token: token.to_string(),
    };

    if !is_decimal(token) {
        return Err(invalid());
    }

    let value = token.parse::<f32>().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    return Ok(value);
}

/// Parses a signed face index. No fractional part or exponent is allowed.
pub fn parse_index(token: &str) -> Result<i64, FormatError> {
    let digits = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidNumber {
            token: token.to_string(),
        });
    }

    return token.parse::<i64>().map_err(|_| FormatError::InvalidNumber {
        token: token.to_string(),
    });
}

fn is_decimal(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;

    let skip_digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let integer_end = skip_digits(i);
    let mut digits = integer_end - i;
    i = integer_end;

    if bytes.get(i) == Some(&b'.') {
        let fraction_end = skip_digits(i + 1);
        digits += fraction_end - (i + 1);
        i = fraction_end;
    }

    if digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }

        let exponent_end = skip_digits(i);
        if exponent_end == i {
            return false;
        }
        i = exponent_end;
    }

    return i == bytes.len();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// 1-based, counted in characters.
    pub column: usize,
    offset: usize,
}

/// Cuts off a comment: a `#` at the start of the line or right after whitespace.
///
/// A `#` inside a token, as in `g part#1`, is kept.
pub fn strip_comment(line: &str) -> &str {
    let mut previous = None;

    for (offset, c) in line.char_indices() {
        if c == '#' && previous.map_or(true, char::is_whitespace) {
            return &line[..offset];
        }
        previous = Some(c);
    }

    return line;
}

/// Splits a single source line into whitespace separated tokens.
///
/// Comments, as found by [`strip_comment`], never produce tokens.
pub struct Lexer<'a> {
    line: &'a str,
    position: usize,
    col: usize,
    peeked_token: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        return Lexer {
            line: strip_comment(line),
            position: 0,
            col: 1,
            peeked_token: None,
        };
    }

    fn char(&self) -> Option<char> {
        return self.line[self.position..].chars().next();
    }

    fn advance(&mut self) {
        if let Some(c) = self.char() {
            self.position += c.len_utf8();
            self.col += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.char() {
            match c {
                c if c.is_whitespace() => self.advance(),
                _ => break,
            }
        }
    }

    pub fn peek_token(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.peeked_token {
            return Some(token);
        }

        let token = self.next_token()?;
        self.peeked_token = Some(token);

        return Some(token);
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.peeked_token.take() {
            return Some(token);
        }

        self.skip_whitespace();

        let start = self.position;
        let column = self.col;
        while let Some(c) = self.char() {
            if c.is_whitespace() {
                break;
            }
            self.advance();
        }

        if start == self.position {
            return None;
        }

        return Some(Token {
            text: &self.line[start..self.position],
            column,
            offset: start,
        });
    }

    /// Everything not consumed yet, trimmed.
    pub fn rest(&self) -> &'a str {
        let start = match self.peeked_token {
            Some(token) => token.offset,
            None => self.position,
        };

        return self.line[start..].trim();
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        return self.next_token();
    }
}
