use crate::model::source::Language;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::iter::Peekable;
use std::str::Chars;

/// JavaScript / TypeScript keywords that should be highlighted
const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
    "delete", "do", "else", "export", "extends", "finally", "for", "from", "function", "if",
    "import", "in", "instanceof", "let", "new", "of", "return", "static", "super", "switch",
    "this", "throw", "try", "typeof", "var", "void", "while", "yield",
];

/// Extra keywords only meaningful in TypeScript
const TS_KEYWORDS: &[&str] = &[
    "abstract", "as", "declare", "enum", "implements", "interface", "keyof", "namespace",
    "private", "protected", "public", "readonly", "type",
];

const LITERALS: &[&str] = &["true", "false", "null", "undefined", "NaN"];

/// Token types for source code
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Keyword(String),
    Literal(String),
    String(String),
    Number(String),
    Comment(String),
    Identifier(String),
    Whitespace(String),
    Punctuation(String),
}

/// Consume characters up to and including `terminator`, honouring backslash escapes
fn take_quoted(chars: &mut Peekable<Chars<'_>>, quote: char, out: &mut String) {
    out.push(quote);
    let mut escaped = false;
    for ch in chars.by_ref() {
        out.push(ch);
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            break;
        }
    }
}

fn flush_word(current: &mut String, tokens: &mut Vec<Token>, language: Language) {
    if !current.is_empty() {
        tokens.push(classify_word(current, language));
        current.clear();
    }
}

/// Simple tokenizer covering strings, comments, words and punctuation
fn tokenize(code: &str, language: Language) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = code.chars().peekable();
    let mut current = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' | '`' => {
                flush_word(&mut current, &mut tokens, language);
                let mut literal = String::new();
                take_quoted(&mut chars, ch, &mut literal);
                tokens.push(Token::String(literal));
            }
            '/' if chars.peek() == Some(&'/') => {
                flush_word(&mut current, &mut tokens, language);
                let mut comment = String::from("/");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    comment.push(next);
                    chars.next();
                }
                tokens.push(Token::Comment(comment));
            }
            '/' if chars.peek() == Some(&'*') => {
                flush_word(&mut current, &mut tokens, language);
                let mut comment = String::from("/");
                let mut prev = '/';
                for next in chars.by_ref() {
                    comment.push(next);
                    if prev == '*' && next == '/' && comment.len() > 3 {
                        break;
                    }
                    prev = next;
                }
                tokens.push(Token::Comment(comment));
            }
            c if c.is_whitespace() => {
                flush_word(&mut current, &mut tokens, language);
                let mut space = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_whitespace() {
                        break;
                    }
                    space.push(next);
                    chars.next();
                }
                tokens.push(Token::Whitespace(space));
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => current.push(c),
            '.' if !current.is_empty() && current.chars().all(|d| d.is_ascii_digit()) => {
                current.push('.')
            }
            c => {
                flush_word(&mut current, &mut tokens, language);
                tokens.push(Token::Punctuation(c.to_string()));
            }
        }
    }

    flush_word(&mut current, &mut tokens, language);
    tokens
}

/// Classify a word as keyword, literal, number, or identifier
fn classify_word(word: &str, language: Language) -> Token {
    if LITERALS.contains(&word) {
        return Token::Literal(word.to_string());
    }
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Token::Number(word.to_string());
    }

    let is_keyword = match language {
        Language::Json => false,
        Language::TypeScript => JS_KEYWORDS.contains(&word) || TS_KEYWORDS.contains(&word),
        _ => JS_KEYWORDS.contains(&word),
    };

    if is_keyword {
        Token::Keyword(word.to_string())
    } else {
        Token::Identifier(word.to_string())
    }
}

fn token_style(token: Token) -> (Style, String) {
    match token {
        Token::Keyword(s) => (
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            s,
        ),
        Token::Literal(s) => (Style::default().fg(Color::Yellow), s),
        Token::String(s) => (Style::default().fg(Color::Green), s),
        Token::Number(s) => (Style::default().fg(Color::Magenta), s),
        Token::Comment(s) => (Style::default().fg(Color::DarkGray), s),
        Token::Identifier(s) => (Style::default().fg(Color::White), s),
        Token::Whitespace(s) => (Style::default(), s),
        Token::Punctuation(s) => (Style::default().fg(Color::Gray), s),
    }
}

/// Convert source text into highlighted ratatui Lines
pub fn highlight_code(code: &str, language: Language) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for token in tokenize(code, language) {
        let (style, text) = token_style(token);
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    if !spans.is_empty() || code.ends_with('\n') || lines.is_empty() {
        lines.push(Line::from(spans));
    }

    lines
}
