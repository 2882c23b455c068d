//! Structural style checks, each expressed as a tree shape.

use super::pattern::{Shape, find_matches};
use super::{LintCode, LintContext};
use crate::parser::ast::{first_token, significant_text};
use crate::parser::{SyntaxKind, SyntaxNode};

fn concat_operator() -> Shape {
    Shape::node(SyntaxKind::OPERATOR).text("++")
}

/// `Nothing -> Nothing` in a case expression.
pub(super) fn map_nothing_to_nothing(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::CASE_OF_BRANCH).exact_children(vec![
        Shape::node(SyntaxKind::UNION_PATTERN).text("Nothing"),
        Shape::node(SyntaxKind::VALUE_EXPR).text("Nothing"),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        ctx.report_node(
            LintCode::MapNothingToNothing,
            "`Nothing` mapped to `Nothing` in case expression, use Maybe.map or Maybe.andThen instead",
            &m.node,
        );
    }
}

/// A case expression over `True`/`False`.
pub(super) fn boolean_case_expr(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::CASE_OF_EXPR).first_children(vec![
        Shape::any(),
        Shape::node(SyntaxKind::CASE_OF_BRANCH).first_children(vec![
            Shape::node(SyntaxKind::UNION_PATTERN).text_in(&["True", "False"]),
        ]),
        Shape::node(SyntaxKind::CASE_OF_BRANCH)
            .first_children(vec![Shape::any().text_in(&["True", "False", "_"])]),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        ctx.report_node(
            LintCode::BooleanCaseExpr,
            "Use an if expression instead of a case expression on a Bool",
            &m.node,
        );
    }
}

/// `[ a ] ++ [ b ]` can be written `[ a, b ]`.
pub(super) fn drop_concat_of_lists(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::BIN_OP_EXPR).children(vec![
        Shape::node(SyntaxKind::LIST_EXPR).capture("left"),
        concat_operator(),
        Shape::node(SyntaxKind::LIST_EXPR).capture("right"),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        let (Some(left), Some(right)) = (m.captures.get("left"), m.captures.get("right")) else {
            continue;
        };
        ctx.report_between(
            LintCode::DropConcatOfLists,
            "Concatenating two list literals, merge them into one list",
            left,
            right,
        );
    }
}

const CONS_PRECEDENCE: u8 = 5;

/// Elm's fixity for the core infix operators.
fn precedence(operator: &str) -> Option<u8> {
    Some(match operator {
        "<|" | "|>" => 0,
        "||" => 2,
        "&&" => 3,
        "==" | "/=" | "<" | ">" | "<=" | ">=" => 4,
        "++" | "::" | "|=" => 5,
        "+" | "-" | "|." => 6,
        "*" | "/" | "//" | "</>" => 7,
        "^" | "<?>" => 8,
        "<<" | ">>" => 9,
        _ => return None,
    })
}

/// First operand of the run ending at `item` that binds tighter than `::`.
///
/// Binary chains are flat, so in `a + b :: [ c ]` the operand before `::`
/// is `b` while the consed item is `a + b`.
fn cons_item_start(item: &SyntaxNode) -> SyntaxNode {
    let mut start = item.clone();
    while let Some(operator) = start
        .prev_sibling()
        .filter(|n| n.kind() == SyntaxKind::OPERATOR)
    {
        let tighter = precedence(&significant_text(&operator)).is_some_and(|p| p > CONS_PRECEDENCE);
        let Some(operand) = operator.prev_sibling().filter(|_| tighter) else {
            break;
        };
        start = operand;
    }
    start
}

/// `a :: [ b ]` can be written `[ a, b ]`.
pub(super) fn drop_cons_of_item_and_list(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::BIN_OP_EXPR).children(vec![
        Shape::any().capture("item"),
        Shape::node(SyntaxKind::OPERATOR).text("::"),
        Shape::node(SyntaxKind::LIST_EXPR).capture("list"),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        let (Some(item), Some(list)) = (m.captures.get("item"), m.captures.get("list")) else {
            continue;
        };
        ctx.report_between(
            LintCode::DropConsOfItemAndList,
            "Consing an item onto a list literal, add it to the literal instead",
            &cons_item_start(item),
            list,
        );
    }
}

/// `[ a ] ++ rest` can be written `a :: rest`.
pub(super) fn use_cons_over_concat(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::BIN_OP_EXPR).children(vec![
        Shape::node(SyntaxKind::LIST_EXPR)
            .exact_children(vec![Shape::any()])
            .capture("single"),
        concat_operator(),
        Shape::any().not(SyntaxKind::LIST_EXPR).capture("rest"),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        let (Some(single), Some(rest)) = (m.captures.get("single"), m.captures.get("rest")) else {
            continue;
        };
        ctx.report_between(
            LintCode::UseConsOverConcat,
            "Use `::` to prepend a single element instead of `++`",
            single,
            rest,
        );
    }
}

/// A record type with a single field.
///
/// Inside a type alias, the alias is looked up first: if it resolves to a
/// larger record that includes the field, the literal is left alone.
pub(super) fn single_field_record(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::RECORD_TYPE)
        .exact_children(vec![Shape::node(SyntaxKind::FIELD_TYPE).capture("field")]);
    for m in find_matches(&ctx.root, &shape) {
        let Some(field) = m
            .captures
            .get("field")
            .and_then(|f| first_token(f, SyntaxKind::LOWER_IDENT))
        else {
            continue;
        };
        let owner = m
            .node
            .ancestors()
            .find(|n| n.kind() == SyntaxKind::TYPE_ALIAS_DECLARATION)
            .and_then(|alias| first_token(&alias, SyntaxKind::UPPER_IDENT));
        if let Some(owner) = owner {
            let wider = ctx
                .lookup
                .record_fields(ctx.tree, owner.text())
                .is_some_and(|fields| {
                    fields.len() > 1 && fields.iter().any(|f| f.as_str() == field.text())
                });
            if wider {
                continue;
            }
        }
        ctx.report_node(
            LintCode::SingleFieldRecord,
            "Record has only one field, use the field's type or a custom type instead",
            &m.node,
        );
    }
}

/// `List.concat [ [ a ], [ b ] ]` can be written as one list.
pub(super) fn unnecessary_list_concat(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::FUNCTION_CALL_EXPR).exact_children(vec![
        Shape::node(SyntaxKind::VALUE_EXPR).text("List.concat"),
        Shape::node(SyntaxKind::LIST_EXPR).each_child(Shape::node(SyntaxKind::LIST_EXPR)),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        ctx.report_node(
            LintCode::UnnecessaryListConcat,
            "`List.concat` on list literals, merge them into one list",
            &m.node,
        );
    }
}

/// `(+) a b` should be written `a + b`.
pub(super) fn no_uncurried_prefix(ctx: &mut LintContext<'_>) {
    let shape = Shape::node(SyntaxKind::FUNCTION_CALL_EXPR).exact_children(vec![
        Shape::node(SyntaxKind::OPERATOR_AS_FUNCTION_EXPR).capture("operator"),
        Shape::any(),
        Shape::any(),
    ]);
    for m in find_matches(&ctx.root, &shape) {
        let operator = m
            .captures
            .get("operator")
            .and_then(|op| first_token(op, SyntaxKind::OPERATOR_IDENT))
            .map(|t| t.text().to_string())
            .unwrap_or_else(|| significant_text(&m.node));
        ctx.report_node(
            LintCode::NoUncurriedPrefix,
            format!("Operator `{operator}` used as a prefix function with two arguments, use it infix"),
            &m.node,
        );
    }
}
