use pretty_assertions::assert_eq;

use super::*;
use crate::{AstBuilder, StringInterner};

#[test]
fn for_loop_dump() {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(&interner);
    let start = b.int(0);
    let end = b.int(3);
    let range = b.range(start, end);
    let i = b.ident("i");
    let print = b.apply("PRINT", vec![i]);
    let print = b.expr_stmt(print);
    let body = b.block(vec![print]);
    let for_ = b.for_("i", range, body);
    let program = b.finish(vec![for_]);

    let expected = "\
FOR
|  i
|  RANGE
|  |  0
|  |  3
|  BODY
|  |  PRINT
|  |  |  ARGUMENTS
|  |  |  |  i
";
    assert_eq!(print_program(&program, &interner), expected);
}

#[test]
fn if_else_and_assign_dump() {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(&interner);
    let x = b.ident("x");
    let one = b.int(1);
    let cond = b.binary("<", x, one);
    let row = b.int(0);
    let col = b.int(1);
    let target = b.matrix_ref("A", row, col);
    let value = b.float(2.5);
    let assign = b.assign(target, value);
    let then_branch = b.block(vec![assign]);
    let brk = b.break_();
    let else_branch = b.block(vec![brk]);
    let if_ = b.if_(cond, then_branch, Some(else_branch));
    let program = b.finish(vec![if_]);

    let expected = "\
IF
|  <
|  |  ARGUMENTS
|  |  |  x
|  |  |  1
THEN
|  =
|  |  MATRIXREF
|  |  |  ARGUMENTS
|  |  |  |  A
|  |  |  |  0
|  |  |  |  1
|  |  2.5
ELSE
|  BREAK
";
    assert_eq!(print_program(&program, &interner), expected);
}

#[test]
fn while_and_return_dump() {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(&interner);
    let cond = b.bool(true);
    let text = b.string("done");
    let ret = b.return_(Some(text));
    let body = b.block(vec![ret]);
    let while_ = b.while_(cond, body);
    let program = b.finish(vec![while_]);

    let expected = "\
WHILE
|  CONDITION
|  |  true
|  BODY
|  |  RETURN
|  |  |  done
";
    assert_eq!(print_program(&program, &interner), expected);
}
