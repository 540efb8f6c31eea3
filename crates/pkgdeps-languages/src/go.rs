//! Go import-header support.

use crate::{DecodeError, ImportParser, ParseError, RawImport};
use std::str::Chars;
use tree_sitter::{Node, Parser};

/// Go import parsing via `tree-sitter-go`.
pub struct GoImports;

impl ImportParser for GoImports {
    fn name(&self) -> &'static str {
        "Go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse_imports(&self, source: &[u8]) -> Result<Vec<RawImport>, ParseError> {
        let mut parser = Self::parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Grammar {
                language: "Go",
                reason: "parser produced no tree".to_string(),
            })?;
        Self::header_imports(tree.root_node(), source)
    }

    fn decode_literal(&self, literal: &str) -> Result<String, DecodeError> {
        unquote(literal)
    }
}

impl GoImports {
    fn parser() -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar {
                language: "Go",
                reason: e.to_string(),
            })?;
        Ok(parser)
    }

    /// Walk the top level of the file: comments, then `package`, then any
    /// number of import declarations. The first other declaration ends the
    /// header and nothing past it is inspected.
    ///
    /// Each header declaration must be followed by `;` or a line break before
    /// the next token. Error recovery does not enforce this, so it is checked
    /// here from the source bytes between siblings.
    fn header_imports(root: Node, source: &[u8]) -> Result<Vec<RawImport>, ParseError> {
        if root.is_error() {
            return Err(expected_package(root, source));
        }

        let mut imports = Vec::new();
        let mut seen_package = false;
        // End of the last header declaration while it still lacks a terminator.
        let mut open_at: Option<usize> = None;

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.is_missing() {
                return Err(syntax_error(child, source));
            }

            if let Some(end) = open_at {
                let gap = source.get(end..child.start_byte()).unwrap_or_default();
                if gap.iter().any(|&b| is_terminator(b)) || opens_with_terminator(child, source) {
                    open_at = None;
                } else if child.kind() == "comment" {
                    // A line comment or a multi-line block comment ends the line.
                    let text = source.get(child.byte_range()).unwrap_or_default();
                    if text.starts_with(b"//") || text.contains(&b'\n') {
                        open_at = None;
                    } else {
                        open_at = Some(child.end_byte());
                    }
                    continue;
                } else if source.get(child.start_byte()) == Some(&b')') {
                    // A stray `)` stands in for the terminator and ends the header.
                    break;
                } else {
                    return Err(expected_terminator(child, source));
                }
            }

            if !child.is_named() {
                continue;
            }

            match child.kind() {
                "comment" => {}
                "package_clause" if !seen_package => {
                    if child.has_error() {
                        return Err(syntax_error(child, source));
                    }
                    seen_package = true;
                    open_at = Some(child.end_byte());
                }
                _ if !seen_package => return Err(expected_package(child, source)),
                "import_declaration" => {
                    if child.has_error() {
                        return Err(syntax_error(child, source));
                    }
                    Self::collect_declaration(child, source, &mut imports)?;
                    open_at = Some(child.end_byte());
                }
                // Error recovery that swallowed an `import` keyword is a broken
                // header; any other error belongs to the body.
                "ERROR" if starts_with_keyword(child, source, "import") => {
                    return Err(syntax_error(child, source));
                }
                _ => break,
            }
        }

        if !seen_package {
            return Err(ParseError::Syntax {
                line: 1,
                column: 1,
                message: "expected 'package', found end of file".to_string(),
            });
        }

        log::trace!("go header: {} import(s)", imports.len());
        Ok(imports)
    }

    fn collect_declaration(
        node: Node,
        source: &[u8],
        imports: &mut Vec<RawImport>,
    ) -> Result<(), ParseError> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                // import "path" or import alias "path"
                "import_spec" => imports.push(Self::parse_import_spec(child, source)?),
                // Grouped imports
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            imports.push(Self::parse_import_spec(spec, source)?);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_import_spec(node: Node, source: &[u8]) -> Result<RawImport, ParseError> {
        let path = node
            .child_by_field_name("path")
            .ok_or_else(|| syntax_error(node, source))?;
        let literal = path.utf8_text(source).map_err(|_| ParseError::Syntax {
            line: path.start_position().row + 1,
            column: path.start_position().column + 1,
            message: "import path is not valid UTF-8".to_string(),
        })?;
        let alias = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .map(str::to_string);

        Ok(RawImport {
            literal: literal.to_string(),
            alias,
            line: path.start_position().row + 1,
        })
    }
}

fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\n' | b';' | b'\0')
}

/// Error recovery can fold the terminator token into the next node.
fn opens_with_terminator(node: Node, source: &[u8]) -> bool {
    source.get(node.start_byte()).is_none_or(|&b| is_terminator(b))
}

fn starts_with_keyword(node: Node, source: &[u8], keyword: &str) -> bool {
    let text = node.utf8_text(source).unwrap_or("");
    text.strip_prefix(keyword).is_some_and(|rest| {
        !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_')
    })
}

/// First ERROR or MISSING node under `node` in document order.
fn first_error<'a>(node: Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

fn snippet(node: Node, source: &[u8]) -> String {
    node.utf8_text(source)
        .unwrap_or("")
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .chars()
        .take(40)
        .collect()
}

fn syntax_error(node: Node, source: &[u8]) -> ParseError {
    let at = first_error(node).unwrap_or(node);
    let message = if at.is_missing() {
        format!("missing {}", at.kind())
    } else {
        match snippet(at, source) {
            text if text.is_empty() => "unexpected end of import header".to_string(),
            text => format!("unexpected `{text}`"),
        }
    };
    let pos = at.start_position();
    ParseError::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        message,
    }
}

fn expected_terminator(node: Node, source: &[u8]) -> ParseError {
    let pos = node.start_position();
    ParseError::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        message: format!("expected ';', found `{}`", snippet(node, source)),
    }
}

fn expected_package(node: Node, source: &[u8]) -> ParseError {
    let pos = node.start_position();
    ParseError::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        message: format!("expected 'package', found `{}`", snippet(node, source)),
    }
}

/// Decode a Go string literal, interpreted (`"..."`) or raw (`` `...` ``).
///
/// Octal and `\x` escapes produce single bytes, so the decoded bytes are
/// checked for UTF-8 at the end rather than per escape.
pub fn unquote(literal: &str) -> Result<String, DecodeError> {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 {
        return Err(DecodeError::NotQuoted);
    }
    let quotes = (bytes[0], bytes[bytes.len() - 1]);
    if !matches!(quotes, (b'`', b'`') | (b'"', b'"')) {
        return Err(DecodeError::NotQuoted);
    }

    let body = &literal[1..literal.len() - 1];
    match quotes {
        (b'`', _) => {
            if body.contains('`') {
                return Err(DecodeError::UnescapedChar('`'));
            }
            // Carriage returns are discarded from raw strings.
            Ok(body.replace('\r', ""))
        }
        _ => unescape(body),
    }
}

fn unescape(body: &str) -> Result<String, DecodeError> {
    if !body.contains(['\\', '"', '\n']) {
        return Ok(body.to_string());
    }

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return Err(DecodeError::UnescapedChar(c)),
            '\\' => unescape_one(&mut chars, &mut out)?,
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

fn unescape_one(chars: &mut Chars<'_>, out: &mut Vec<u8>) -> Result<(), DecodeError> {
    let Some(c) = chars.next() else {
        return Err(DecodeError::InvalidEscape("\\".to_string()));
    };

    let byte = match c {
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => b'\n',
        'r' => b'\r',
        't' => b'\t',
        'v' => 0x0b,
        '\\' => b'\\',
        '"' => b'"',
        '0'..='7' => {
            let value = read_digits(chars, "", Some(c), 3, 8)?;
            u8::try_from(value).map_err(|_| DecodeError::InvalidEscape(format!("\\{value:o}")))?
        }
        'x' => read_digits(chars, "x", None, 2, 16)? as u8,
        'u' => return push_code_point(read_digits(chars, "u", None, 4, 16)?, out),
        'U' => return push_code_point(read_digits(chars, "U", None, 8, 16)?, out),
        _ => return Err(DecodeError::InvalidEscape(format!("\\{c}"))),
    };
    out.push(byte);
    Ok(())
}

/// Read exactly `len` digits of `radix` (including `first`, when given).
fn read_digits(
    chars: &mut Chars<'_>,
    prefix: &str,
    first: Option<char>,
    len: usize,
    radix: u32,
) -> Result<u32, DecodeError> {
    let mut digits: String = first.into_iter().collect();
    let remaining = len - digits.chars().count();
    digits.extend(chars.by_ref().take(remaining));

    let escape = format!("\\{prefix}{digits}");
    if digits.chars().count() != len || !digits.chars().all(|d| d.is_digit(radix)) {
        return Err(DecodeError::InvalidEscape(escape));
    }
    u32::from_str_radix(&digits, radix).map_err(|_| DecodeError::InvalidEscape(escape))
}

fn push_code_point(value: u32, out: &mut Vec<u8>) -> Result<(), DecodeError> {
    let c = char::from_u32(value)
        .ok_or_else(|| DecodeError::InvalidCodePoint(format!("U+{value:04X}")))?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Ok(())
}
