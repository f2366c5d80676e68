//! Line scanner for dataset reference sites in block-style YAML
//!
//! Walks the document line by line, tracking the indentation-scoped key path,
//! and offers each scalar found at a reference site to a rewrite callback.
//! Everything else, comments and formatting included, is copied through
//! byte for byte.
//!
//! Reference sites:
//! - items of a `dataset_ids` sequence, block or flow style (a flow
//!   sequence may span several lines)
//! - the value of a `dataset_id` key
//! - the value of an `id` key directly under a `dataset` key
//!
//! Block scalars (`|`, `>`) and multi-line plain or quoted scalars are
//! skipped so that prompt text can never be mistaken for structure.

use std::borrow::Cow;

const DATASET_IDS_KEY: &str = "dataset_ids";
const DATASET_ID_KEY: &str = "dataset_id";
const DATASET_KEY: &str = "dataset";
const ID_KEY: &str = "id";

/// Output of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Rewritten document text
    pub text: String,
    /// Number of scalars that were replaced
    pub replacements: usize,
}

#[derive(Debug)]
struct Frame {
    indent: usize,
    key: String,
}

#[derive(Debug, Clone, Copy)]
enum Skip {
    None,
    BlockScalar { parent_indent: usize },
    Plain { parent_indent: usize },
    Quoted { quote: char },
    Flow { depth: i32 },
    FlowIds { depth: i32 },
}

/// A scalar token inside a line: byte span (quotes included) and its value
struct Token<'a> {
    start: usize,
    end: usize,
    value: Cow<'a, str>,
}

/// Rewrite every scalar at a reference site for which `rewrite` returns a
/// replacement token
///
/// `rewrite` receives the unquoted scalar value and returns the exact text
/// (quoting included) to put in its place.
pub fn rewrite_reference_sites<F>(text: &str, mut rewrite: F) -> Rewritten
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<Frame> = Vec::new();
    let mut skip = Skip::None;
    let mut replacements = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw_line);
        let indent = line.len() - line.trim_start_matches(' ').len();
        let content = &line[indent..];

        match skip {
            Skip::BlockScalar { parent_indent } | Skip::Plain { parent_indent } => {
                if content.trim().is_empty() || indent > parent_indent {
                    out.push_str(raw_line);
                    continue;
                }
                skip = Skip::None;
            }
            Skip::Quoted { quote } => {
                if closing_quote(line, 0, quote).is_some() {
                    skip = Skip::None;
                }
                out.push_str(raw_line);
                continue;
            }
            Skip::Flow { depth } => {
                let depth = depth + bracket_balance(line);
                skip = if depth > 0 {
                    Skip::Flow { depth }
                } else {
                    Skip::None
                };
                out.push_str(raw_line);
                continue;
            }
            Skip::FlowIds { depth } => {
                let mut depth = depth;
                let mut edits = Vec::new();
                for token in flow_id_tokens(line, 0, &mut depth) {
                    push_edit(&mut edits, 0, token, &mut rewrite);
                }
                skip = if depth > 0 {
                    Skip::FlowIds { depth }
                } else {
                    Skip::None
                };
                replacements += edits.len();
                out.push_str(&apply_edits(line, edits));
                out.push_str(ending);
                continue;
            }
            Skip::None => {}
        }

        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            out.push_str(raw_line);
            continue;
        }
        if indent == 0 && (content.starts_with("---") || content.starts_with("...")) {
            stack.clear();
            out.push_str(raw_line);
            continue;
        }

        // Strip sequence indicators, possibly nested ("- - x")
        let mut body = content;
        let mut body_offset = indent;
        let mut is_item = false;
        while body == "-" || body.starts_with("- ") {
            is_item = true;
            let rest = &body[1..];
            let ws = rest.len() - rest.trim_start_matches(' ').len();
            body_offset += 1 + ws;
            body = &body[1 + ws..];
        }

        if is_item {
            // Items may sit at the same indent as their parent key
            while stack.last().is_some_and(|f| f.indent > indent) {
                stack.pop();
            }
        } else {
            while stack.last().is_some_and(|f| f.indent >= indent) {
                stack.pop();
            }
        }

        let parent = stack.last().map(|f| f.key.as_str());
        let mut edits: Vec<(usize, usize, String)> = Vec::new();

        if let Some((key, value_start)) = parse_key(body) {
            let key_indent = body_offset;
            let value = strip_comment(&body[value_start..]);
            let value_offset = body_offset + value_start;

            if value.is_empty() || is_node_properties(value) {
                stack.push(Frame {
                    indent: key_indent,
                    key,
                });
            } else if is_block_scalar_indicator(value) {
                skip = Skip::BlockScalar {
                    parent_indent: key_indent,
                };
            } else if key == DATASET_IDS_KEY && value.starts_with('[') {
                let mut depth = 0;
                for token in flow_id_tokens(line, value_offset, &mut depth) {
                    push_edit(&mut edits, 0, token, &mut rewrite);
                }
                if depth > 0 {
                    skip = Skip::FlowIds { depth };
                }
            } else {
                if key == DATASET_ID_KEY || (key == ID_KEY && parent == Some(DATASET_KEY)) {
                    if let Some(token) = scalar_token(value) {
                        push_edit(&mut edits, value_offset, token, &mut rewrite);
                    }
                }
                skip = continuation_skip(value, key_indent);
            }
        } else if is_item && !body.is_empty() {
            let value = strip_comment(body);
            if is_block_scalar_indicator(value) {
                skip = Skip::BlockScalar {
                    parent_indent: indent,
                };
            } else {
                if parent == Some(DATASET_IDS_KEY) {
                    if let Some(token) = scalar_token(value) {
                        push_edit(&mut edits, body_offset, token, &mut rewrite);
                    }
                }
                skip = continuation_skip(value, indent);
            }
        }

        if edits.is_empty() {
            out.push_str(raw_line);
            continue;
        }

        replacements += edits.len();
        out.push_str(&apply_edits(line, edits));
        out.push_str(ending);
    }

    Rewritten {
        text: out,
        replacements,
    }
}

fn push_edit<F>(
    edits: &mut Vec<(usize, usize, String)>,
    offset: usize,
    token: Token<'_>,
    rewrite: &mut F,
) where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(replacement) = rewrite(&token.value) {
        edits.push((offset + token.start, offset + token.end, replacement));
    }
}

fn apply_edits(line: &str, edits: Vec<(usize, usize, String)>) -> Cow<'_, str> {
    if edits.is_empty() {
        return Cow::Borrowed(line);
    }
    let mut rewritten = line.to_string();
    for (start, end, replacement) in edits.into_iter().rev() {
        rewritten.replace_range(start..end, &replacement);
    }
    Cow::Owned(rewritten)
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

/// Parse a mapping key at the start of `body`
///
/// Returns the unquoted key and the byte offset where its value starts.
fn parse_key(body: &str) -> Option<(String, usize)> {
    let first = body.chars().next()?;
    let (key, colon) = match first {
        '\'' | '"' => {
            let close = closing_quote(body, 1, first)?;
            if !body[close + 1..].starts_with(':') {
                return None;
            }
            let inner = &body[1..close];
            let key = if first == '\'' {
                inner.replace("''", "'")
            } else {
                inner.to_string()
            };
            (key, close + 1)
        }
        '[' | '{' | '#' | '&' | '*' | '!' | '|' | '>' | '%' | '@' | '`' | '?' => return None,
        _ => {
            let colon = find_mapping_colon(body)?;
            (body[..colon].trim_end().to_string(), colon)
        }
    };

    let after = &body[colon + 1..];
    if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
        return None;
    }
    let ws = after.len() - after.trim_start().len();
    Some((key, colon + 1 + ws))
}

fn find_mapping_colon(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b':' => {
                let next = bytes.get(i + 1);
                if next.is_none() || next == Some(&b' ') || next == Some(&b'\t') {
                    return Some(i);
                }
            }
            b'#' if i > 0 && bytes[i - 1] == b' ' => return None,
            _ => {}
        }
    }
    None
}

/// Byte index of the quote closing a scalar, scanning from `from`
fn closing_quote(s: &str, from: usize, quote: char) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        if quote == '\'' && b == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        if quote == '"' {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == b'"' {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Drop a trailing comment and surrounding whitespace from a value
fn strip_comment(value: &str) -> &str {
    let value = value.trim();
    if value.starts_with('#') {
        return "";
    }
    match value.chars().next() {
        Some(q @ ('\'' | '"')) => match closing_quote(value, 1, q) {
            Some(close) => &value[..=close],
            None => value,
        },
        _ => match value.find(" #") {
            Some(pos) => value[..pos].trim_end(),
            None => value,
        },
    }
}

/// Whether a value is only an anchor and/or tag, with the node on later lines
fn is_node_properties(value: &str) -> bool {
    value
        .split_whitespace()
        .all(|part| part.starts_with('&') || part.starts_with('!'))
}

fn is_block_scalar_indicator(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c.is_ascii_digit() || c == '+' || c == '-')
}

/// Parse a complete single-line scalar
fn scalar_token(value: &str) -> Option<Token<'_>> {
    let first = value.chars().next()?;
    match first {
        '\'' => {
            let close = closing_quote(value, 1, '\'')?;
            let inner = &value[1..close];
            let value = if inner.contains("''") {
                Cow::Owned(inner.replace("''", "'"))
            } else {
                Cow::Borrowed(inner)
            };
            Some(Token {
                start: 0,
                end: close + 1,
                value,
            })
        }
        '"' => {
            let close = closing_quote(value, 1, '"')?;
            let inner = &value[1..close];
            // Escape sequences never occur in identifiers or placeholders
            if inner.contains('\\') {
                return None;
            }
            Some(Token {
                start: 0,
                end: close + 1,
                value: Cow::Borrowed(inner),
            })
        }
        '[' | '{' | '&' | '*' | '!' | '|' | '>' | '%' | '@' | '`' => None,
        _ => Some(Token {
            start: 0,
            end: value.len(),
            value: Cow::Borrowed(value),
        }),
    }
}

/// Collect the items of a `dataset_ids` flow sequence found on one line
///
/// Scanning starts at byte `from` with the nesting `depth` left by the
/// previous line and stops where the outer sequence closes. Only scalars
/// directly inside the outer sequence are returned, with spans relative to
/// the start of `line`.
fn flow_id_tokens<'a>(line: &'a str, from: usize, depth: &mut i32) -> Vec<Token<'a>> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b',' => i += 1,
            b'#' if i == 0 || matches!(bytes[i - 1], b' ' | b'\t') => break,
            b'[' | b'{' => {
                *depth += 1;
                i += 1;
            }
            b']' | b'}' => {
                *depth -= 1;
                i += 1;
                if *depth <= 0 {
                    *depth = 0;
                    break;
                }
            }
            q @ (b'\'' | b'"') => {
                let Some(close) = closing_quote(line, i + 1, q as char) else {
                    break;
                };
                if *depth == 1 {
                    if let Some(token) = scalar_token(&line[i..=close]) {
                        tokens.push(Token {
                            start: i + token.start,
                            end: i + token.end,
                            value: token.value,
                        });
                    }
                }
                i = close + 1;
            }
            _ => {
                let rest = &line[i..];
                let mut len = rest
                    .find(|c| matches!(c, ',' | '[' | ']' | '{' | '}'))
                    .unwrap_or(rest.len());
                if let Some(comment) = rest[..len].find(" #") {
                    len = comment;
                }
                let item = rest[..len].trim_end();
                if *depth == 1 && !item.is_empty() {
                    if let Some(token) = scalar_token(item) {
                        tokens.push(Token {
                            start: i + token.start,
                            end: i + token.end,
                            value: token.value,
                        });
                    }
                }
                i += len.max(1);
            }
        }
    }
    tokens
}

/// Skip mode for a value that may continue on following lines
///
/// `parent_indent` is the indent a continuation line has to exceed.
fn continuation_skip(value: &str, parent_indent: usize) -> Skip {
    match value.chars().next() {
        Some(q @ ('\'' | '"')) => {
            if closing_quote(value, 1, q).is_none() {
                Skip::Quoted { quote: q }
            } else {
                Skip::None
            }
        }
        Some('[' | '{') => {
            let depth = bracket_balance(value);
            if depth > 0 {
                Skip::Flow { depth }
            } else {
                Skip::None
            }
        }
        Some(_) => Skip::Plain { parent_indent },
        None => Skip::None,
    }
}

fn bracket_balance(s: &str) -> i32 {
    s.chars().fold(0, |depth, c| match c {
        '[' | '{' => depth + 1,
        ']' | '}' => depth - 1,
        _ => depth,
    })
}
