//! Expression grammar
//!
//! Binary expressions are kept flat, as a sequence of operands and
//! `OPERATOR` nodes, without resolving precedence. Lints that look at
//! `a ++ b` only need the shape of the chain.

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

impl Parser<'_> {
    /// Expression = Operand (Operator Operand)*
    pub(super) fn parse_expr(&mut self) {
        if !self.at_operand_start() || self.at_layout_end() {
            self.error("expected an expression");
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_operand();

        if self.at_binary_operator() {
            self.start_node_at(checkpoint, SyntaxKind::BIN_OP_EXPR);
            while self.at_binary_operator() {
                self.skip_trivia();
                self.start_node(SyntaxKind::OPERATOR);
                self.bump();
                self.finish_node();
                if !self.at_operand_start() || self.at_layout_end() {
                    self.error("expected an expression after the operator");
                    break;
                }
                self.parse_operand();
            }
            self.finish_node();
        }
    }

    fn at_binary_operator(&self) -> bool {
        self.at(SyntaxKind::OPERATOR_IDENT) && !self.at_layout_end()
    }

    fn at_operand_start(&self) -> bool {
        self.at_atom_start()
            || self.at_any(&[
                SyntaxKind::BACKSLASH,
                SyntaxKind::IF_KW,
                SyntaxKind::CASE_KW,
                SyntaxKind::LET_KW,
            ])
            || self.at_negation()
    }

    fn at_negation(&self) -> bool {
        self.at(SyntaxKind::OPERATOR_IDENT) && self.nth_text(0) == "-"
    }

    pub(super) fn at_atom_start(&self) -> bool {
        match self.nth(0) {
            Some(
                SyntaxKind::LOWER_IDENT
                | SyntaxKind::UPPER_IDENT
                | SyntaxKind::NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::CHAR
                | SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACKET
                | SyntaxKind::L_BRACE,
            ) => true,
            Some(SyntaxKind::DOT) => self.nth(1) == Some(SyntaxKind::LOWER_IDENT),
            _ => false,
        }
    }

    /// Operand = Lambda | IfElse | CaseOf | LetIn | Negate | Application
    fn parse_operand(&mut self) {
        match self.nth(0) {
            Some(SyntaxKind::BACKSLASH) => self.parse_lambda(),
            Some(SyntaxKind::IF_KW) => self.parse_if_else(),
            Some(SyntaxKind::CASE_KW) => self.parse_case_of(),
            Some(SyntaxKind::LET_KW) => self.parse_let_in(),
            _ if self.at_negation() => self.parse_negate(),
            _ => self.parse_application(),
        }
    }

    /// Negate = '-' Atom
    fn parse_negate(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::NEGATE_EXPR);
        self.bump();
        if self.at_atom_start() {
            self.parse_atom_with_access();
        } else {
            self.error("expected an expression after `-`");
        }
        self.finish_node();
    }

    /// Application = Atom Atom*
    fn parse_application(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atom_with_access();

        if self.at_atom_start() && !self.at_layout_end() {
            self.start_node_at(checkpoint, SyntaxKind::FUNCTION_CALL_EXPR);
            while self.at_atom_start() && !self.at_layout_end() {
                self.parse_atom_with_access();
            }
            self.finish_node();
        }
    }

    /// Atom ('.' lower)*   with the dots attached to the preceding atom
    fn parse_atom_with_access(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atom();

        while self.at_adjacent(SyntaxKind::DOT) && self.raw_nth(1) == Some(SyntaxKind::LOWER_IDENT)
        {
            self.start_node_at(checkpoint, SyntaxKind::FIELD_ACCESS_EXPR);
            self.bump();
            self.bump();
            self.finish_node();
        }
    }

    fn parse_atom(&mut self) {
        self.skip_trivia();
        match self.nth(0) {
            Some(SyntaxKind::LOWER_IDENT) => {
                self.start_node(SyntaxKind::VALUE_EXPR);
                self.start_node(SyntaxKind::VALUE_QID);
                self.bump();
                self.finish_node();
                self.finish_node();
            }
            Some(SyntaxKind::UPPER_IDENT) => self.parse_qualified_value(),
            Some(SyntaxKind::NUMBER | SyntaxKind::STRING | SyntaxKind::CHAR) => {
                self.start_node(SyntaxKind::LITERAL_EXPR);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::DOT) => {
                self.start_node(SyntaxKind::FIELD_ACCESSOR_FUNCTION_EXPR);
                self.bump();
                self.expect(SyntaxKind::LOWER_IDENT);
                self.finish_node();
            }
            Some(SyntaxKind::L_PAREN) => self.parse_paren_expr(),
            Some(SyntaxKind::L_BRACKET) => self.parse_list_expr(),
            Some(SyntaxKind::L_BRACE) => self.parse_record_expr(),
            _ => self.error("expected an expression"),
        }
    }

    /// `Foo.Bar.baz` is a VALUE_EXPR over a VALUE_QID, `Foo.Bar` over an
    /// UPPER_CASE_QID (a constructor reference).
    fn parse_qualified_value(&mut self) {
        let qid_kind = if self.qid_ends_lower() {
            SyntaxKind::VALUE_QID
        } else {
            SyntaxKind::UPPER_CASE_QID
        };
        self.start_node(SyntaxKind::VALUE_EXPR);
        self.start_node(qid_kind);
        self.bump();
        while self.at_adjacent(SyntaxKind::DOT) {
            match self.raw_nth(1) {
                Some(SyntaxKind::UPPER_IDENT) => {
                    self.bump();
                    self.bump();
                }
                Some(SyntaxKind::LOWER_IDENT) if qid_kind == SyntaxKind::VALUE_QID => {
                    self.bump();
                    self.bump();
                    break;
                }
                _ => break,
            }
        }
        self.finish_node();
        self.finish_node();
    }

    /// '(' ')' | '(' op ')' | '(' Expr ')' | '(' Expr (',' Expr)+ ')'
    fn parse_paren_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();

        if self.at(SyntaxKind::R_PAREN) {
            self.start_node_at(checkpoint, SyntaxKind::UNIT_EXPR);
            self.bump();
            self.finish_node();
            return;
        }

        if self.at(SyntaxKind::OPERATOR_IDENT) && self.nth(1) == Some(SyntaxKind::R_PAREN) {
            self.start_node_at(checkpoint, SyntaxKind::OPERATOR_AS_FUNCTION_EXPR);
            self.bump();
            self.bump();
            self.finish_node();
            return;
        }

        self.parse_expr();
        if self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
            while self.eat(SyntaxKind::COMMA) {
                self.parse_expr();
            }
        } else {
            self.start_node_at(checkpoint, SyntaxKind::PARENTHESIZED_EXPR);
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// '[' (Expr (',' Expr)*)? ']'
    fn parse_list_expr(&mut self) {
        self.start_node(SyntaxKind::LIST_EXPR);
        self.bump();
        if !self.at(SyntaxKind::R_BRACKET) {
            self.parse_expr();
            while self.eat(SyntaxKind::COMMA) {
                self.parse_expr();
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// '{' (RecordBase '|')? (Field (',' Field)*)? '}'
    fn parse_record_expr(&mut self) {
        self.start_node(SyntaxKind::RECORD_EXPR);
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
                self.parse_field();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Field = lower '=' Expr
    fn parse_field(&mut self) {
        if !self.at(SyntaxKind::LOWER_IDENT) {
            self.error("expected a field name");
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::FIELD);
        self.bump();
        if self.expect(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// Lambda = '\' Pattern+ '->' Expr
    fn parse_lambda(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::ANONYMOUS_FUNCTION_EXPR);
        self.bump();
        if !self.at_pattern_start() {
            self.error("expected a lambda parameter");
        }
        while self.at_pattern_start() {
            self.parse_atomic_pattern();
        }
        if self.expect(SyntaxKind::ARROW) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// IfElse = 'if' Expr 'then' Expr 'else' Expr
    fn parse_if_else(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::IF_ELSE_EXPR);
        self.bump();
        self.parse_expr();
        if self.expect(SyntaxKind::THEN_KW) {
            self.parse_expr();
        }
        if self.expect(SyntaxKind::ELSE_KW) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// CaseOf = 'case' Expr 'of' CaseOfBranch+
    ///
    /// Every branch starts in the column of the first one.
    fn parse_case_of(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::CASE_OF_EXPR);
        self.bump();
        self.parse_expr();

        if self.expect(SyntaxKind::OF_KW) {
            match self.nth_column(0) {
                Some(column) if column > self.floor && self.at_pattern_start() => {
                    while self.nth_column(0) == Some(column) && self.at_pattern_start() {
                        self.with_floor(column, |p| p.parse_case_branch());
                    }
                }
                _ => self.error("expected a case branch"),
            }
        }

        self.finish_node();
    }

    /// CaseOfBranch = Pattern '->' Expr
    fn parse_case_branch(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::CASE_OF_BRANCH);
        self.parse_pattern();
        if self.expect(SyntaxKind::ARROW) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// LetIn = 'let' (TypeAnnotation | ValueDeclaration)+ 'in' Expr
    ///
    /// Every declaration starts in the column of the first one.
    fn parse_let_in(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::LET_IN_EXPR);
        self.bump();

        match self.nth_column(0) {
            Some(column) if column > self.floor && !self.at(SyntaxKind::IN_KW) => {
                while self.nth_column(0) == Some(column) && !self.at(SyntaxKind::IN_KW) {
                    let pos_before = self.position();
                    self.with_floor(column, |p| {
                        if p.at(SyntaxKind::LOWER_IDENT) && p.nth(1) == Some(SyntaxKind::COLON) {
                            p.parse_type_annotation();
                        } else if p.at_pattern_start() {
                            p.parse_value_declaration();
                        } else {
                            p.error("expected a declaration");
                        }
                    });
                    if self.position() == pos_before {
                        break;
                    }
                }
            }
            _ => self.error("expected a declaration"),
        }

        if self.expect(SyntaxKind::IN_KW) {
            self.parse_expr();
        }
        self.finish_node();
    }
}
