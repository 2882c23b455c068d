//! Type expression grammar

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

impl Parser<'_> {
    pub(super) fn at_type_argument_start(&self) -> bool {
        self.at_any(&[
            SyntaxKind::LOWER_IDENT,
            SyntaxKind::UPPER_IDENT,
            SyntaxKind::L_PAREN,
            SyntaxKind::L_BRACE,
        ])
    }

    /// TypeExpression = TypeApplication ('->' TypeApplication)*
    ///
    /// A single application is left unwrapped; function types get a
    /// TYPE_EXPRESSION node around the whole arrow chain.
    pub(super) fn parse_type(&mut self) {
        if !self.at_type_argument_start() {
            self.error("expected a type");
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_type_application();

        if self.at(SyntaxKind::ARROW) && !self.at_layout_end() {
            self.start_node_at(checkpoint, SyntaxKind::TYPE_EXPRESSION);
            while self.at(SyntaxKind::ARROW) && !self.at_layout_end() {
                self.bump();
                if self.at_type_argument_start() {
                    self.parse_type_application();
                } else {
                    self.error("expected a type after `->`");
                    break;
                }
            }
            self.finish_node();
        }
    }

    /// TypeApplication = UpperCaseQid TypeArgument* | TypeArgument
    fn parse_type_application(&mut self) {
        if !self.at(SyntaxKind::UPPER_IDENT) {
            self.parse_type_argument();
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::TYPE_REF);
        self.parse_upper_case_qid();
        while self.at_type_argument_start() && !self.at_layout_end() {
            self.parse_type_argument();
        }
        self.finish_node();
    }

    /// TypeArgument = lower | UpperCaseQid | '(' ... ')' | RecordType
    pub(super) fn parse_type_argument(&mut self) {
        self.skip_trivia();
        match self.nth(0) {
            Some(SyntaxKind::LOWER_IDENT) => {
                self.start_node(SyntaxKind::TYPE_VARIABLE);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::UPPER_IDENT) => {
                self.start_node(SyntaxKind::TYPE_REF);
                self.parse_upper_case_qid();
                self.finish_node();
            }
            Some(SyntaxKind::L_PAREN) => self.parse_paren_type(),
            Some(SyntaxKind::L_BRACE) => self.parse_record_type(),
            _ => self.error("expected a type"),
        }
    }

    /// '(' ')' | '(' Type ')' | '(' Type (',' Type)+ ')'
    fn parse_paren_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();

        if self.at(SyntaxKind::R_PAREN) {
            self.start_node_at(checkpoint, SyntaxKind::UNIT_EXPR);
            self.bump();
            self.finish_node();
            return;
        }

        self.parse_type();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_TYPE);
            while self.eat(SyntaxKind::COMMA) {
                self.parse_type();
            }
        } else {
            self.start_node_at(checkpoint, SyntaxKind::TYPE_EXPRESSION);
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// RecordType = '{' (lower '|')? (FieldType (',' FieldType)*)? '}'
    fn parse_record_type(&mut self) {
        self.start_node(SyntaxKind::RECORD_TYPE);
        self.bump();

        if self.at(SyntaxKind::LOWER_IDENT) && self.nth(1) == Some(SyntaxKind::PIPE) {
            self.skip_trivia();
            self.start_node(SyntaxKind::RECORD_BASE_IDENTIFIER);
            self.bump();
            self.finish_node();
            self.bump();
        }

        if !self.at(SyntaxKind::R_BRACE) {
            loop {
                self.parse_field_type();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// FieldType = lower ':' Type
    fn parse_field_type(&mut self) {
        if !self.at(SyntaxKind::LOWER_IDENT) {
            self.error("expected a field name");
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::FIELD_TYPE);
        self.bump();
        if self.expect(SyntaxKind::COLON) {
            self.parse_type();
        }
        self.finish_node();
    }
}
