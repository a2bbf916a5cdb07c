//! CSS reader producing the [`crate::ast`] tree.
//!
//! Tokens come from `cssparser`. On top of them the reader recognizes just
//! enough structure for the pruning passes: comments, at-rules with their
//! prelude text, style rules with their selector text, and tokenized
//! declaration values. Anything else is preserved as [`Node::Raw`] so it
//! survives a round trip.
//!
//! `cssparser` closes unterminated blocks, strings and comments at the end
//! of input. This reader reports them instead, at the location where they
//! were opened.

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourceLocation, Token};

use crate::ast::{Atrule, Block, Declaration, Node, Rule, Stylesheet, Value, ValueNode};
use crate::error::{CriticalError, CriticalResult};

/// Parses CSS source text into a [`Stylesheet`].
pub fn parse_stylesheet(input: &str) -> CriticalResult<Stylesheet> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let children = read_nodes(&mut parser)?;
    Ok(Stylesheet { children })
}

/// Tokenizes a standalone declaration value, e.g. `"Foo", serif`.
pub fn parse_value(input: &str) -> CriticalResult<Value> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let children = read_value_list(&mut parser)?;
    Ok(Value { children })
}

/// How a scanned chunk of text ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Block,
    End,
}

/// Source text up to a terminator, comments removed.
struct Scanned {
    text: String,
    /// Byte offset of the first top-level `:` in `text`
    colon: Option<usize>,
    terminator: Terminator,
    /// Where the terminator starts
    location: SourceLocation,
}

fn error_at(message: impl Into<String>, location: SourceLocation) -> CriticalError {
    CriticalError::parse_at(message, location.line as usize + 1, location.column as usize)
}

fn into_critical_error(err: ParseError<'_, CriticalError>) -> CriticalError {
    match err.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(kind) => error_at(format!("unexpected input: {:?}", kind), err.location),
    }
}

/// Reads the contents of the block whose opening token was just consumed.
///
/// The flag is false when the block ran to the end of input unclosed.
fn read_nested<'i, T, F>(parser: &mut Parser<'i, '_>, read: F) -> CriticalResult<(T, bool)>
where
    F: for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> CriticalResult<T>,
{
    let (contents, end) = parser
        .parse_nested_block(|nested| match read(nested) {
            Ok(contents) => Ok((contents, nested.position())),
            Err(err) => Err(ParseError {
                kind: ParseErrorKind::Custom(err),
                location: nested.current_source_location(),
            }),
        })
        .map_err(into_critical_error)?;
    Ok((contents, parser.position() != end))
}

fn skip_nested(parser: &mut Parser<'_, '_>) -> CriticalResult<bool> {
    let ((), closed) = read_nested(parser, |nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    })?;
    Ok(closed)
}

fn comment_is_closed(source: &str) -> bool {
    source.len() >= 4 && source.ends_with("*/")
}

fn string_is_closed(source: &str) -> bool {
    source.len() >= 2 && source.chars().next() == source.chars().next_back()
}

/// Reads nodes until the end of the current block or of the input.
fn read_nodes(parser: &mut Parser<'_, '_>) -> CriticalResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        let start = parser.state();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(nodes),
        };
        match token {
            Token::WhiteSpace(_) | Token::Semicolon | Token::CloseCurlyBracket => {}
            Token::Comment(text) => {
                if !comment_is_closed(parser.slice_from(start.position())) {
                    return Err(error_at("unclosed comment", start.source_location()));
                }
                nodes.push(Node::Comment(text.to_string()));
            }
            Token::AtKeyword(name) => nodes.push(read_atrule(parser, name.to_string())?),
            _ => {
                parser.reset(&start);
                if let Some(node) = read_rule_or_declaration(parser, start.source_location())? {
                    nodes.push(node);
                }
            }
        }
    }
}

fn read_atrule(parser: &mut Parser<'_, '_>, name: String) -> CriticalResult<Node> {
    let scanned = scan_until_terminator(parser)?;
    let prelude = scanned.text.trim();
    let block = match scanned.terminator {
        Terminator::Block => Some(read_block(parser, scanned.location)?),
        Terminator::Semicolon | Terminator::End => None,
    };
    Ok(Node::Atrule(Atrule {
        name,
        prelude: (!prelude.is_empty()).then(|| prelude.to_string()),
        block,
    }))
}

fn read_block(parser: &mut Parser<'_, '_>, open: SourceLocation) -> CriticalResult<Block> {
    let (children, closed) = read_nested(parser, read_nodes)?;
    if !closed {
        return Err(error_at("unclosed block", open));
    }
    Ok(Block::new(children))
}

fn read_rule_or_declaration(
    parser: &mut Parser<'_, '_>,
    start: SourceLocation,
) -> CriticalResult<Option<Node>> {
    let scanned = scan_until_terminator(parser)?;
    if scanned.terminator == Terminator::Block {
        let block = read_block(parser, scanned.location)?;
        return Ok(Some(Node::Rule(Rule {
            prelude: scanned.text.trim().to_string(),
            block,
        })));
    }

    let text = scanned.text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match scanned.colon {
        Some(colon) if !scanned.text[..colon].trim().is_empty() => {
            let property = &scanned.text[..colon];
            let value = &scanned.text[colon + 1..];
            Ok(Some(Node::Declaration(read_declaration(property, value, start)?)))
        }
        _ => Ok(Some(Node::Raw(text.to_string()))),
    }
}

fn read_declaration(
    property: &str,
    value: &str,
    location: SourceLocation,
) -> CriticalResult<Declaration> {
    let mut value = parse_value(value).map_err(|err| match err {
        CriticalError::Parse { message, .. } => error_at(message, location),
        other => other,
    })?;
    let important = strip_important(&mut value.children);
    Ok(Declaration {
        property: property.trim().to_string(),
        value,
        important,
    })
}

/// Removes a trailing `! important` and reports whether it was there.
fn strip_important(children: &mut Vec<ValueNode>) -> bool {
    let Some(ValueNode::Identifier(last)) = children.last() else {
        return false;
    };
    if !last.eq_ignore_ascii_case("important") {
        return false;
    }
    let bang = children[..children.len() - 1]
        .iter()
        .rposition(|node| *node != ValueNode::WhiteSpace);
    match bang {
        Some(idx) if matches!(&children[idx], ValueNode::Raw(raw) if raw == "!") => {
            children.truncate(idx);
            while matches!(children.last(), Some(ValueNode::WhiteSpace)) {
                children.pop();
            }
            true
        }
        _ => false,
    }
}

/// Collects source text up to `;`, `{` or the end of the current block.
///
/// Nested parentheses and brackets are copied whole, so a `;` inside
/// `url(...)` or `[title=";"]` does not end the chunk.
fn scan_until_terminator(parser: &mut Parser<'_, '_>) -> CriticalResult<Scanned> {
    let mut text = String::new();
    let mut colon = None;
    loop {
        let start = parser.state();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(Scanned::new(text, colon, Terminator::End, start.source_location())),
        };
        match token {
            Token::Semicolon => {
                return Ok(Scanned::new(text, colon, Terminator::Semicolon, start.source_location()))
            }
            Token::CurlyBracketBlock => {
                return Ok(Scanned::new(text, colon, Terminator::Block, start.source_location()))
            }
            // stray closing brace
            Token::CloseCurlyBracket => {}
            Token::Comment(_) => {
                if !comment_is_closed(parser.slice_from(start.position())) {
                    return Err(error_at("unclosed comment", start.source_location()));
                }
            }
            Token::BadString(_) => return Err(error_at("unclosed string", start.source_location())),
            Token::QuotedString(_) if !string_is_closed(parser.slice_from(start.position())) => {
                return Err(error_at("unclosed string", start.source_location()));
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                if !skip_nested(parser)? {
                    return Err(error_at("unclosed parenthesis", start.source_location()));
                }
                text.push_str(parser.slice_from(start.position()));
            }
            Token::Colon => {
                colon.get_or_insert(text.len());
                text.push(':');
            }
            _ => text.push_str(parser.slice_from(start.position())),
        }
    }
}

impl Scanned {
    fn new(
        text: String,
        colon: Option<usize>,
        terminator: Terminator,
        location: SourceLocation,
    ) -> Self {
        Self {
            text,
            colon,
            terminator,
            location,
        }
    }
}

/// Converts tokens up to the end of the current block into value nodes,
/// without leading or trailing whitespace.
fn read_value_list(parser: &mut Parser<'_, '_>) -> CriticalResult<Vec<ValueNode>> {
    let mut nodes = Vec::new();
    loop {
        let start = parser.state();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let source = parser.slice_from(start.position());
        let location = start.source_location();
        let node = match token {
            Token::WhiteSpace(_) => ValueNode::WhiteSpace,
            Token::Comment(_) if !comment_is_closed(source) => {
                return Err(error_at("unclosed comment in value", location));
            }
            Token::Comment(_) => continue,
            Token::Ident(name) => ValueNode::Identifier(name.to_string()),
            Token::QuotedString(value) if string_is_closed(source) => {
                ValueNode::String(value.to_string())
            }
            Token::QuotedString(_) | Token::BadString(_) => {
                return Err(error_at("unclosed string in value", location));
            }
            Token::Number { .. } => ValueNode::Number(source.to_string()),
            Token::Percentage { .. } => ValueNode::Percentage(source.trim_end_matches('%').to_string()),
            Token::Dimension { unit, .. } => ValueNode::Dimension {
                value: source.strip_suffix(&*unit).unwrap_or(source).to_string(),
                unit: unit.to_string(),
            },
            Token::Hash(name) | Token::IDHash(name) => ValueNode::Hash(name.to_string()),
            Token::UnquotedUrl(url) => ValueNode::Url(url.to_string()),
            Token::BadUrl(_) => return Err(error_at("malformed url()", location)),
            Token::Function(name) => read_function(parser, name.to_string(), location)?,
            Token::ParenthesisBlock => ValueNode::Parentheses {
                children: read_parenthesized(parser, location)?,
            },
            Token::Comma => ValueNode::comma(),
            Token::Colon => ValueNode::Operator(":".to_string()),
            Token::Delim(op @ ('/' | '*' | '+' | '-' | '=' | '>' | '<')) => {
                ValueNode::Operator(op.to_string())
            }
            Token::SquareBracketBlock | Token::CurlyBracketBlock => {
                skip_nested(parser)?;
                ValueNode::Raw(parser.slice_from(start.position()).to_string())
            }
            _ => ValueNode::Raw(source.to_string()),
        };
        nodes.push(node);
    }
    Ok(trim_whitespace(nodes))
}

fn read_parenthesized(
    parser: &mut Parser<'_, '_>,
    open: SourceLocation,
) -> CriticalResult<Vec<ValueNode>> {
    let (children, closed) = read_nested(parser, read_value_list)?;
    if !closed {
        return Err(error_at("unclosed parenthesis in value", open));
    }
    Ok(children)
}

/// `url("...")` tokenizes as a function holding one string; it is folded
/// into [`ValueNode::Url`] like the unquoted form.
fn read_function(
    parser: &mut Parser<'_, '_>,
    name: String,
    open: SourceLocation,
) -> CriticalResult<ValueNode> {
    let children = read_parenthesized(parser, open)?;
    if name.eq_ignore_ascii_case("url") {
        if let [ValueNode::String(url)] = children.as_slice() {
            return Ok(ValueNode::Url(url.clone()));
        }
    }
    Ok(ValueNode::Function { name, children })
}

fn trim_whitespace(mut nodes: Vec<ValueNode>) -> Vec<ValueNode> {
    while matches!(nodes.last(), Some(ValueNode::WhiteSpace)) {
        nodes.pop();
    }
    if matches!(nodes.first(), Some(ValueNode::WhiteSpace)) {
        nodes.remove(0);
    }
    nodes
}
