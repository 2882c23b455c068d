//! Pattern grammar

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

impl Parser<'_> {
    pub(super) fn at_pattern_start(&self) -> bool {
        self.at_any(&[
            SyntaxKind::LOWER_IDENT,
            SyntaxKind::UPPER_IDENT,
            SyntaxKind::UNDERSCORE,
            SyntaxKind::L_PAREN,
            SyntaxKind::L_BRACKET,
            SyntaxKind::L_BRACE,
            SyntaxKind::NUMBER,
            SyntaxKind::STRING,
            SyntaxKind::CHAR,
        ]) || (self.at(SyntaxKind::OPERATOR_IDENT)
            && self.nth_text(0) == "-"
            && self.nth(1) == Some(SyntaxKind::NUMBER))
    }

    fn at_cons(&self) -> bool {
        self.at(SyntaxKind::OPERATOR_IDENT) && self.nth_text(0) == "::" && !self.at_layout_end()
    }

    /// Pattern = ConsPattern ('as' lower)?
    pub(super) fn parse_pattern(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_cons_pattern();

        if self.at(SyntaxKind::AS_KW) {
            self.start_node_at(checkpoint, SyntaxKind::AS_PATTERN);
            self.bump();
            if self.at(SyntaxKind::LOWER_IDENT) {
                self.skip_trivia();
                self.start_node(SyntaxKind::LOWER_PATTERN);
                self.bump();
                self.finish_node();
            } else {
                self.error("expected a name after `as`");
            }
            self.finish_node();
        }
    }

    /// ConsPattern = ConstructorPattern ('::' ConsPattern)?
    fn parse_cons_pattern(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_constructor_pattern();

        if self.at_cons() {
            self.start_node_at(checkpoint, SyntaxKind::CONS_PATTERN);
            self.bump();
            if self.at_pattern_start() {
                self.parse_cons_pattern();
            } else {
                self.error("expected a pattern after `::`");
            }
            self.finish_node();
        }
    }

    /// ConstructorPattern = UpperCaseQid AtomicPattern* | AtomicPattern
    fn parse_constructor_pattern(&mut self) {
        if !self.at(SyntaxKind::UPPER_IDENT) {
            self.parse_atomic_pattern();
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::UNION_PATTERN);
        self.parse_upper_case_qid();
        while self.at_pattern_start() && !self.at_layout_end() {
            self.parse_atomic_pattern();
        }
        self.finish_node();
    }

    /// AtomicPattern: a pattern that needs no parentheses as an argument
    pub(super) fn parse_atomic_pattern(&mut self) {
        self.skip_trivia();
        match self.nth(0) {
            Some(SyntaxKind::LOWER_IDENT) => {
                self.start_node(SyntaxKind::LOWER_PATTERN);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::UNDERSCORE) => {
                self.start_node(SyntaxKind::ANYTHING_PATTERN);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::UPPER_IDENT) => {
                self.start_node(SyntaxKind::UNION_PATTERN);
                self.parse_upper_case_qid();
                self.finish_node();
            }
            Some(SyntaxKind::NUMBER | SyntaxKind::STRING | SyntaxKind::CHAR) => {
                self.start_node(SyntaxKind::LITERAL_PATTERN);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::OPERATOR_IDENT) if self.nth_text(0) == "-" => {
                self.start_node(SyntaxKind::LITERAL_PATTERN);
                self.bump();
                self.expect(SyntaxKind::NUMBER);
                self.finish_node();
            }
            Some(SyntaxKind::L_PAREN) => self.parse_paren_pattern(),
            Some(SyntaxKind::L_BRACKET) => self.parse_list_pattern(),
            Some(SyntaxKind::L_BRACE) => self.parse_record_pattern(),
            _ => self.error("expected a pattern"),
        }
    }

    /// '(' ')' | '(' Pattern ')' | '(' Pattern (',' Pattern)+ ')'
    fn parse_paren_pattern(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();

        if self.at(SyntaxKind::R_PAREN) {
            self.start_node_at(checkpoint, SyntaxKind::UNIT_EXPR);
            self.bump();
            self.finish_node();
            return;
        }

        self.parse_pattern();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_PATTERN);
            while self.eat(SyntaxKind::COMMA) {
                self.parse_pattern();
            }
        } else {
            self.start_node_at(checkpoint, SyntaxKind::PARENTHESIZED_PATTERN);
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// '[' (Pattern (',' Pattern)*)? ']'
    fn parse_list_pattern(&mut self) {
        self.start_node(SyntaxKind::LIST_PATTERN);
        self.bump();
        if !self.at(SyntaxKind::R_BRACKET) {
            self.parse_pattern();
            while self.eat(SyntaxKind::COMMA) {
                self.parse_pattern();
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// '{' lower (',' lower)* '}'
    fn parse_record_pattern(&mut self) {
        self.start_node(SyntaxKind::RECORD_PATTERN);
        self.bump();
        loop {
            if !self.at(SyntaxKind::LOWER_IDENT) {
                self.error("expected a field name");
                break;
            }
            self.skip_trivia();
            self.start_node(SyntaxKind::LOWER_PATTERN);
            self.bump();
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }
}
