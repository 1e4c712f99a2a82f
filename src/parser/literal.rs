//! Go string literal handling for struct tags.
//!
//! Tags are read from either raw (`` `...` ``) or interpreted (`"..."`)
//! literals and always written back as raw literals when the contents allow
//! it.

/// Which Go string literal form a tag was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Raw,
    Interpreted,
}

/// Strip the delimiters of a Go string literal and resolve its escapes
pub fn unquote(literal: &str) -> Option<(String, Quoting)> {
    if let Some(inner) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        // Carriage returns are discarded from raw literals
        return Some((inner.replace('\r', ""), Quoting::Raw));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    Some((unescape(inner)?, Quoting::Interpreted))
}

/// Render tag contents as a Go string literal
pub fn quote(value: &str) -> String {
    let needs_interpreted = value.contains('`') || value.chars().any(|c| c.is_control());
    if !needs_interpreted {
        return format!("`{}`", value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unescape(inner: &str) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => out.push(hex_char(&mut chars, 2)?),
            'u' => out.push(hex_char(&mut chars, 4)?),
            'U' => out.push(hex_char(&mut chars, 8)?),
            d @ '0'..='7' => {
                let mut code = d.to_digit(8)?;
                for _ in 0..2 {
                    code = code * 8 + chars.next()?.to_digit(8)?;
                }
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }

    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
