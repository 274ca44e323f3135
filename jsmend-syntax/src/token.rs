use crate::text::Span;

/// Which piece of a template literal a template token covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    /// `` `text` ``
    Full,
    /// `` `text${ ``
    Head,
    /// `` }text${ ``
    Middle,
    /// `` }text` ``
    Tail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword; keywords are distinguished by text.
    Ident,
    /// `#name`
    PrivateName,
    Number,
    String,
    Template(TemplatePart),
    Regex,
    Punct,
    JsxText,
    /// Unterminated literal or a character that starts no token.
    Invalid,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    pub nl_before: bool,
    /// The identifier contained a unicode escape (so it is never a keyword).
    pub escaped: bool,
}

impl Token {
    pub fn eof(at: u32, nl_before: bool) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::empty_at(at),
            nl_before,
            escaped: false,
        }
    }

    pub fn is_template_start(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Template(TemplatePart::Full) | TokenKind::Template(TemplatePart::Head)
        )
    }
}

/// Punctuators, longest first so the scanner can take the first prefix match.
pub(crate) const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

/// Reserved words that can never be an identifier reference.
pub fn is_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
    )
}

pub(crate) fn is_assignment_operator(p: &str) -> bool {
    matches!(
        p,
        "=" | "+="
            | "-="
            | "*="
            | "/="
            | "%="
            | "**="
            | "<<="
            | ">>="
            | ">>>="
            | "&="
            | "|="
            | "^="
            | "&&="
            | "||="
            | "??="
    )
}

/// Binary operator precedence; higher binds tighter. `None` for non-binary tokens.
pub(crate) fn binary_precedence(op: &str) -> Option<u8> {
    Some(match op {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" | "===" | "!==" => 7,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        "**" => 12,
        _ => return None,
    })
}

/// Relational precedence, shared by TypeScript's `as` and `satisfies`.
pub(crate) const RELATIONAL_PRECEDENCE: u8 = 8;
