//! Recursive descent parser for Elm
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Layout is resolved by column: every layout block (the top level, the
//! declarations of a `let`, the branches of a `case`) records the column of
//! its items as the parser's `floor`, and any token at or left of the floor
//! ends the expression being parsed.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Elm source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(input, &tokens);
    parser.parse_file();
    parser.finish()
}

/// The parser state
pub(super) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    /// Column (in characters) of every token, parallel to `tokens`.
    columns: Vec<u32>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    /// Tokens at or left of this column end the current layout block.
    pub(super) floor: u32,
}

impl<'a> Parser<'a> {
    fn new(input: &str, tokens: &'a [Token<'a>]) -> Self {
        let mut columns = Vec::with_capacity(tokens.len());
        let mut line_start = 0usize;
        for token in tokens {
            let offset = usize::from(token.offset);
            columns.push(input[line_start..offset].chars().count() as u32);
            if let Some(newline) = token.text.rfind('\n') {
                line_start = offset + newline + 1;
            }
        }
        Self {
            tokens,
            columns,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            floor: 0,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    /// Kind of the raw token at the cursor, trivia included.
    pub(super) fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    /// Index of the n-th significant (non-trivia) token from the cursor.
    fn significant_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        for (idx, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if !token.kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    /// Look ahead, skipping trivia
    pub(super) fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.significant_index(n).map(|idx| self.tokens[idx].kind)
    }

    pub(super) fn nth_text(&self, n: usize) -> &'a str {
        self.significant_index(n)
            .map(|idx| self.tokens[idx].text)
            .unwrap_or("")
    }

    pub(super) fn nth_column(&self, n: usize) -> Option<u32> {
        self.significant_index(n).map(|idx| self.columns[idx])
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.nth(0) == Some(kind)
    }

    pub(super) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.nth(0).is_some_and(|k| kinds.contains(&k))
    }

    pub(super) fn at_eof(&self) -> bool {
        self.nth(0).is_none()
    }

    /// True when the next significant token cannot continue the current
    /// layout block: end of input, or a token at or left of the floor.
    pub(super) fn at_layout_end(&self) -> bool {
        match self.nth_column(0) {
            Some(column) => column <= self.floor,
            None => true,
        }
    }

    /// True when the raw token at the cursor is `kind`, with no trivia in
    /// between (`Foo.bar`, `model.field`).
    pub(super) fn at_adjacent(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Kind of the raw token `n` positions after the cursor, trivia included.
    pub(super) fn raw_nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the next significant token, along with the trivia before it.
    pub(super) fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    pub(super) fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            let token = &self.tokens[self.pos];
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(super) fn error(&mut self, message: impl Into<String>) {
        let range = self
            .significant_index(0)
            .map(|idx| {
                let t = &self.tokens[idx];
                TextRange::at(t.offset, TextSize::of(t.text))
            })
            .unwrap_or_else(|| {
                let end = self.tokens.last().map(|t| t.end()).unwrap_or_default();
                TextRange::empty(end)
            });
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Wrap tokens into an ERROR node until the next top-level item
    /// (a token in column 0) or the end of input.
    fn error_recover_to_top_level(&mut self, message: impl Into<String>) {
        self.error(message);
        self.skip_trivia();
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        self.bump();
        while self.nth_column(0).is_some_and(|column| column > 0) {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Checkpoint at the next significant token, so a wrapping node does not
    /// swallow leading trivia.
    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Run `f` with the layout floor set to `floor`, restoring it afterwards.
    pub(super) fn with_floor<T>(&mut self, floor: u32, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.floor, floor);
        let result = f(self);
        self.floor = saved;
        result
    }

    // =========================================================================
    // Grammar rules: module structure
    // =========================================================================

    /// File = ModuleDeclaration? Import* TopLevelDeclaration*
    fn parse_file(&mut self) {
        self.start_node(SyntaxKind::FILE);

        while !self.at_eof() {
            let pos_before = self.pos;
            if self.nth_column(0) != Some(0) {
                self.error_recover_to_top_level("declarations must start in the first column");
                continue;
            }
            self.parse_top_level_item();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_recover_to_top_level(format!("stuck on token: {:?}", self.nth(0)));
            }
        }
        self.skip_trivia();

        self.finish_node();
    }

    fn parse_top_level_item(&mut self) {
        match self.nth(0) {
            Some(SyntaxKind::MODULE_KW) => self.parse_module_declaration(),
            Some(SyntaxKind::PORT_KW) if self.nth(1) == Some(SyntaxKind::MODULE_KW) => {
                self.parse_module_declaration()
            }
            Some(SyntaxKind::PORT_KW) => self.parse_port_annotation(),
            Some(SyntaxKind::IMPORT_KW) => self.parse_import(),
            Some(SyntaxKind::TYPE_KW) if self.nth(1) == Some(SyntaxKind::ALIAS_KW) => {
                self.parse_type_alias_declaration()
            }
            Some(SyntaxKind::TYPE_KW) => self.parse_type_declaration(),
            Some(SyntaxKind::LOWER_IDENT) if self.nth(1) == Some(SyntaxKind::COLON) => {
                self.parse_type_annotation()
            }
            Some(SyntaxKind::LOWER_IDENT) => self.with_floor(0, |p| p.parse_value_declaration()),
            other => {
                self.error_recover_to_top_level(format!("unexpected token: {:?}", other));
            }
        }
    }

    /// ModuleDeclaration = 'port'? 'module' UpperCaseQid 'exposing' ExposingList
    fn parse_module_declaration(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::MODULE_DECLARATION);

        self.eat(SyntaxKind::PORT_KW);
        self.expect(SyntaxKind::MODULE_KW);
        self.parse_upper_case_qid();
        if self.expect(SyntaxKind::EXPOSING_KW) {
            self.parse_exposing_list();
        }

        self.finish_node();
    }

    /// Import = 'import' UpperCaseQid AsClause? ('exposing' ExposingList)?
    fn parse_import(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::IMPORT_CLAUSE);

        self.expect(SyntaxKind::IMPORT_KW);
        self.parse_upper_case_qid();

        if self.at(SyntaxKind::AS_KW) {
            self.skip_trivia();
            self.start_node(SyntaxKind::AS_CLAUSE);
            self.bump();
            self.expect(SyntaxKind::UPPER_IDENT);
            self.finish_node();
        }

        if self.eat(SyntaxKind::EXPOSING_KW) {
            self.parse_exposing_list();
        }

        self.finish_node();
    }

    /// ExposingList = '(' ('..' | ExposedItem (',' ExposedItem)*) ')'
    fn parse_exposing_list(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::EXPOSING_LIST);

        if self.expect(SyntaxKind::L_PAREN) {
            if !self.eat(SyntaxKind::DOT_DOT) {
                loop {
                    let pos_before = self.pos;
                    self.parse_exposed_item();
                    if self.pos == pos_before || !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }

        self.finish_node();
    }

    /// ExposedItem = lower | Upper ('(' '..' ')')? | '(' operator ')'
    fn parse_exposed_item(&mut self) {
        self.skip_trivia();
        match self.nth(0) {
            Some(SyntaxKind::LOWER_IDENT) => {
                self.start_node(SyntaxKind::EXPOSED_VALUE);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::UPPER_IDENT) => {
                self.start_node(SyntaxKind::EXPOSED_TYPE);
                self.bump();
                if self.at(SyntaxKind::L_PAREN) && self.nth(1) == Some(SyntaxKind::DOT_DOT) {
                    self.skip_trivia();
                    self.start_node(SyntaxKind::EXPOSED_UNION_CONSTRUCTORS);
                    self.bump();
                    self.bump();
                    self.expect(SyntaxKind::R_PAREN);
                    self.finish_node();
                }
                self.finish_node();
            }
            Some(SyntaxKind::L_PAREN) => {
                self.start_node(SyntaxKind::EXPOSED_OPERATOR);
                self.bump();
                self.expect(SyntaxKind::OPERATOR_IDENT);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            _ => self.error("expected an exposed value, type, or operator"),
        }
    }

    /// UpperCaseQid = Upper ('.' Upper)*   (no whitespace around the dots)
    pub(super) fn parse_upper_case_qid(&mut self) {
        if !self.at(SyntaxKind::UPPER_IDENT) {
            self.error("expected a module or type name");
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::UPPER_CASE_QID);
        self.bump();
        while self.at_adjacent(SyntaxKind::DOT) && self.raw_nth(1) == Some(SyntaxKind::UPPER_IDENT)
        {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// Scan a qualified name starting at the next significant token without
    /// consuming it: `Foo.Bar.baz` is a value, `Foo.Bar` a constructor/type.
    pub(super) fn qid_ends_lower(&self) -> bool {
        let Some(mut idx) = self.significant_index(0) else {
            return false;
        };
        if self.tokens[idx].kind == SyntaxKind::LOWER_IDENT {
            return true;
        }
        while self.tokens.get(idx + 1).map(|t| t.kind) == Some(SyntaxKind::DOT) {
            match self.tokens.get(idx + 2).map(|t| t.kind) {
                Some(SyntaxKind::UPPER_IDENT) => idx += 2,
                Some(SyntaxKind::LOWER_IDENT) => return true,
                _ => return false,
            }
        }
        false
    }

    // =========================================================================
    // Grammar rules: declarations
    // =========================================================================

    /// TypeAnnotation = lower ':' TypeExpression
    pub(super) fn parse_type_annotation(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TYPE_ANNOTATION);
        self.bump();
        self.expect(SyntaxKind::COLON);
        self.parse_type();
        self.finish_node();
    }

    /// PortAnnotation = 'port' lower ':' TypeExpression
    fn parse_port_annotation(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::PORT_ANNOTATION);
        self.bump();
        self.expect(SyntaxKind::LOWER_IDENT);
        self.expect(SyntaxKind::COLON);
        self.parse_type();
        self.finish_node();
    }

    /// TypeDeclaration = 'type' Upper lower* '=' UnionVariant ('|' UnionVariant)*
    fn parse_type_declaration(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TYPE_DECLARATION);
        self.bump();
        self.expect(SyntaxKind::UPPER_IDENT);
        while self.at(SyntaxKind::LOWER_IDENT) {
            self.bump();
        }
        if self.expect(SyntaxKind::EQ) {
            loop {
                self.parse_union_variant();
                if self.at_layout_end() || !self.eat(SyntaxKind::PIPE) {
                    break;
                }
            }
        }
        self.finish_node();
    }

    /// UnionVariant = Upper TypeArgument*
    fn parse_union_variant(&mut self) {
        if !self.at(SyntaxKind::UPPER_IDENT) {
            self.error("expected a constructor name");
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::UNION_VARIANT);
        self.bump();
        while self.at_type_argument_start() && !self.at_layout_end() {
            self.parse_type_argument();
        }
        self.finish_node();
    }

    /// TypeAliasDeclaration = 'type' 'alias' Upper lower* '=' TypeExpression
    fn parse_type_alias_declaration(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TYPE_ALIAS_DECLARATION);
        self.bump();
        self.bump();
        self.expect(SyntaxKind::UPPER_IDENT);
        while self.at(SyntaxKind::LOWER_IDENT) {
            self.bump();
        }
        if self.expect(SyntaxKind::EQ) {
            self.parse_type();
        }
        self.finish_node();
    }

    /// ValueDeclaration = (FunctionDeclarationLeft | Pattern) '=' Expression
    ///
    /// The body belongs to the layout block whose floor is already set.
    pub(super) fn parse_value_declaration(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::VALUE_DECLARATION);

        if self.at(SyntaxKind::LOWER_IDENT) {
            self.start_node(SyntaxKind::FUNCTION_DECLARATION_LEFT);
            self.bump();
            while self.at_pattern_start() && !self.at_layout_end() {
                self.parse_atomic_pattern();
            }
            self.finish_node();
        } else {
            self.parse_pattern();
        }

        if self.expect(SyntaxKind::EQ) {
            self.parse_expr();
        }

        self.finish_node();
    }
}
