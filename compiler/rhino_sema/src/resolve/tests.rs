use pretty_assertions::assert_eq;

use rhino_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode};
use rhino_ir::{
    BinaryOp, EnumValueId, ExprId, ExprKind, FunctionId, Program, ProgramBuilder, Sort, Span,
    VariableId,
};

use super::*;

fn run_resolve(b: ProgramBuilder) -> (Program, Vec<Diagnostic>) {
    let (mut program, source) = b.finish();
    let mut compiler = Compiler::new(&source);
    resolve(&mut compiler, &mut program).unwrap();
    let diagnostics = compiler.finish();
    (program, diagnostics)
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn main_is_found() {
    let mut b = ProgramBuilder::new();
    b.function("helper", &[], None, |_| {});
    let main = b.function("main", &[], None, |_| {});
    let (program, diagnostics) = run_resolve(b);
    assert_eq!(program.main, Some(main));
    assert!(diagnostics.is_empty());
}

#[test]
fn nested_main_counts() {
    let mut b = ProgramBuilder::new();
    let mut nested = None;
    b.function("outer", &[], None, |b| {
        nested = Some(b.function("main", &[], None, |_| {}));
    });
    let (program, diagnostics) = run_resolve(b);
    assert_eq!(program.main, nested);
    assert!(diagnostics.is_empty());
}

#[test]
fn missing_main_reports_once() {
    let mut b = ProgramBuilder::new();
    b.function("start", &[], None, |_| {});
    let (program, diagnostics) = run_resolve(b);
    assert_eq!(program.main, None);
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E1001]);
    assert_eq!(diagnostics[0].span, Span::DUMMY);
    assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 1));
}

#[test]
fn inner_scope_shadows_outer() {
    let mut b = ProgramBuilder::new();
    let (mut outer, mut inner) = (None, None);
    let (mut inner_use, mut outer_use) = (None, None);
    b.function("main", &[], None, |b| {
        let one = b.int(1);
        outer = Some(b.variable("x", None, Some(one)));
        b.code_block(|b| {
            let text = b.string("s");
            inner = Some(b.variable("x", None, Some(text)));
            let x = b.ident("x");
            inner_use = Some(x);
            b.output(x);
        });
        let x = b.ident("x");
        outer_use = Some(x);
        b.output(x);
    });
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    assert_eq!(
        program.expr(inner_use.unwrap()).kind,
        ExprKind::VariableRef(inner.unwrap())
    );
    assert_eq!(
        program.expr(outer_use.unwrap()).kind,
        ExprKind::VariableRef(outer.unwrap())
    );
    assert_eq!(program.variable(inner.unwrap()).sort, Sort::Str);
    assert_eq!(program.variable(outer.unwrap()).sort, Sort::Int);
}

#[test]
fn functions_refer_forward_and_to_each_other() {
    let mut b = ProgramBuilder::new();
    let mut calls: Vec<ExprId> = Vec::new();
    b.function("main", &[], None, |b| {
        let callee = b.ident("even");
        let call = b.call(callee, &[]);
        calls.push(callee);
        b.expression(call);
    });
    let int = b.ident("int");
    let even = b.function("even", &[], Some(int), |b| {
        let callee = b.ident("odd");
        let call = b.call(callee, &[]);
        calls.push(callee);
        b.return_stmt(Some(call));
    });
    let int = b.ident("int");
    let odd = b.function("odd", &[], Some(int), |b| {
        let callee = b.ident("even");
        let call = b.call(callee, &[]);
        calls.push(callee);
        b.return_stmt(Some(call));
    });
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    let kinds: Vec<ExprKind> = calls.iter().map(|&id| program.expr(id).kind).collect();
    assert_eq!(
        kinds,
        vec![
            ExprKind::FunctionRef(even),
            ExprKind::FunctionRef(odd),
            ExprKind::FunctionRef(even),
        ]
    );
    assert_eq!(program.function(even).return_sort, Sort::Int);
}

#[test]
fn builtin_type_names_cannot_be_shadowed() {
    let mut b = ProgramBuilder::new();
    let mut use_site = None;
    b.function("main", &[], None, |b| {
        let one = b.int(1);
        b.variable("int", None, Some(one));
        let int = b.ident("int");
        use_site = Some(int);
        b.output(int);
    });
    let (program, _) = run_resolve(b);
    assert_eq!(
        program.expr(use_site.unwrap()).kind,
        ExprKind::TypeRef(Sort::Int)
    );
}

#[test]
fn bool_is_a_builtin_type() {
    let mut b = ProgramBuilder::new();
    let mut flag = None;
    b.function("main", &[], None, |b| {
        let bool_type = b.ident("bool");
        let yes = b.boolean(true);
        flag = Some(b.variable("flag", Some(bool_type), Some(yes)));
    });
    let (program, diagnostics) = run_resolve(b);
    assert!(diagnostics.is_empty());
    assert_eq!(program.variable(flag.unwrap()).sort, Sort::Bool);
}

#[test]
fn initializer_cannot_see_its_own_variable() {
    let mut b = ProgramBuilder::new();
    let mut init = None;
    b.function("main", &[], None, |b| {
        let x = b.ident("x");
        init = Some(x);
        b.variable("x", None, Some(x));
    });
    let (program, _) = run_resolve(b);
    assert_eq!(program.expr(init.unwrap()).kind, ExprKind::Identifier);
}

#[test]
fn parameters_are_scoped_to_the_body() {
    let mut b = ProgramBuilder::new();
    let (mut inside, mut outside) = (None, None);
    let int = b.ident("int");
    let f = b.function("f", &[("a", Some(int))], None, |b| {
        let a = b.ident("a");
        inside = Some(a);
        b.output(a);
    });
    b.function("main", &[], None, |b| {
        let a = b.ident("a");
        outside = Some(a);
        b.output(a);
    });
    let (program, _) = run_resolve(b);

    let param = program.function(f).parameters.first().unwrap();
    assert_eq!(program.expr(inside.unwrap()).kind, ExprKind::ParameterRef(param));
    assert_eq!(program.expr(outside.unwrap()).kind, ExprKind::Identifier);
    assert_eq!(program.parameter(param).sort, Sort::Int);
    assert_eq!(program.expr(inside.unwrap()).sort, Sort::Int);
    assert_eq!(program.function(f).return_sort, Sort::None);
}

#[test]
fn for_iterator_is_scoped_to_the_loop() {
    let mut b = ProgramBuilder::new();
    let (mut iterator, mut inside, mut after) = (None, None, None);
    b.function("main", &[], None, |b| {
        let first = b.int(0);
        let last = b.int(9);
        let range = b.range(first, last);
        iterator = Some(b.for_loop("i", range, |b| {
            let i = b.ident("i");
            inside = Some(i);
            b.output(i);
        }));
        let i = b.ident("i");
        after = Some(i);
        b.output(i);
    });
    let (program, _) = run_resolve(b);
    let iterator = iterator.unwrap();
    assert_eq!(program.expr(inside.unwrap()).kind, ExprKind::VariableRef(iterator));
    assert_eq!(program.expr(after.unwrap()).kind, ExprKind::Identifier);
    assert_eq!(program.variable(iterator).sort, Sort::Int);
}

#[test]
fn enum_values_become_literals() {
    let mut b = ProgramBuilder::new();
    let colour = b.enum_type("Colour", &["Red", "Green", "Blue"]);
    let (mut green, mut missing, mut c, mut iterator) = (None, None, None, None);
    b.function("main", &[], None, |b| {
        let ty = b.ident("Colour");
        let value = b.field(ty, "Green");
        green = Some(value);
        c = Some(b.variable("c", None, Some(value)));

        let ty = b.ident("Colour");
        let value = b.field(ty, "Purple");
        missing = Some(value);
        b.output(value);

        let ty = b.ident("Colour");
        iterator = Some(b.for_loop("each", ty, |_| {}));
    });
    let (program, diagnostics) = run_resolve(b);

    assert_eq!(
        program.expr(green.unwrap()).kind,
        ExprKind::EnumValue(EnumValueId::new(1))
    );
    assert_eq!(program.variable(c.unwrap()).sort, Sort::Enum(colour));
    assert_eq!(program.variable(iterator.unwrap()).sort, Sort::Enum(colour));
    assert!(program.expr(missing.unwrap()).given_error);
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E1007]);
}

#[test]
fn variable_sorts_are_inferred() {
    let mut b = ProgramBuilder::new();
    let mut vars: Vec<VariableId> = Vec::new();
    let str_type = b.ident("str");
    let greet = b.function("greet", &[], Some(str_type), |b| {
        let text = b.string("hi");
        b.return_stmt(Some(text));
    });
    b.function("main", &[], None, |b| {
        let three = b.int(3);
        vars.push(b.variable("a", None, Some(three)));

        let num_type = b.ident("num");
        let three = b.int(3);
        vars.push(b.variable("b", Some(num_type), Some(three)));

        let one = b.int(1);
        let two = b.int(2);
        let quotient = b.binary(BinaryOp::Div, one, two);
        vars.push(b.variable("c", None, Some(quotient)));

        let callee = b.ident("greet");
        let call = b.call(callee, &[]);
        vars.push(b.variable("d", None, Some(call)));

        let a = b.ident("a");
        let half = b.float(0.5);
        let sum = b.binary(BinaryOp::Add, a, half);
        vars.push(b.variable("e", None, Some(sum)));

        let a = b.ident("a");
        let zero = b.int(0);
        let compare = b.binary(BinaryOp::GtEq, a, zero);
        vars.push(b.variable("f", None, Some(compare)));

        vars.push(b.variable("g", None, None));
    });
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    assert_eq!(program.function(greet).return_sort, Sort::Str);
    let sorts: Vec<Sort> = vars.iter().map(|&v| program.variable(v).sort).collect();
    assert_eq!(
        sorts,
        vec![
            Sort::Int,
            Sort::Num,
            Sort::Num,
            Sort::Str,
            Sort::Num,
            Sort::Bool,
            Sort::Error,
        ]
    );
}

#[test]
fn bad_type_expressions_report_once() {
    let mut b = ProgramBuilder::new();
    let (mut unknown, mut invalid) = (None, None);
    b.function("main", &[], None, |b| {
        let ty = b.ident("Missing");
        let one = b.int(1);
        unknown = Some(b.variable("a", Some(ty), Some(one)));

        let ty = b.int(7);
        let one = b.int(1);
        invalid = Some(b.variable("b", Some(ty), Some(one)));
    });
    let (mut program, source) = b.finish();
    let mut compiler = Compiler::new(&source);
    resolve(&mut compiler, &mut program).unwrap();
    resolve(&mut compiler, &mut program).unwrap();
    let diagnostics = compiler.finish();

    assert_eq!(codes(&diagnostics), vec![ErrorCode::E1005, ErrorCode::E1006]);
    assert_eq!(program.variable(unknown.unwrap()).sort, Sort::Error);
    assert_eq!(program.variable(invalid.unwrap()).sort, Sort::Error);
}

#[test]
fn many_declarations_overflow_one_scope() {
    let mut b = ProgramBuilder::new();
    let mut uses: Vec<(ExprId, VariableId)> = Vec::new();
    b.function("main", &[], None, |b| {
        let mut declared = Vec::new();
        for i in 0..40 {
            let value = b.int(i);
            declared.push(b.variable(&format!("v{i}"), None, Some(value)));
        }
        for (i, &variable) in declared.iter().enumerate() {
            let name = b.ident(&format!("v{i}"));
            b.output(name);
            uses.push((name, variable));
        }
    });
    let (program, diagnostics) = run_resolve(b);
    assert!(diagnostics.is_empty());
    for (expr, variable) in uses {
        assert_eq!(program.expr(expr).kind, ExprKind::VariableRef(variable));
    }
}

#[test]
fn resolving_twice_changes_nothing() {
    let mut b = ProgramBuilder::new();
    b.enum_type("Axis", &["X", "Y"]);
    b.function("main", &[], None, |b| {
        let ty = b.ident("Axis");
        let y = b.field(ty, "Y");
        b.variable("a", None, Some(y));
        let callee = b.ident("helper");
        let call = b.call(callee, &[]);
        b.output(call);
        let unknown = b.ident("nowhere");
        b.output(unknown);
    });
    b.function("helper", &[], None, |_| {});
    let ty = b.ident("Axis");
    let x = b.ident("X");
    b.variable("first", Some(ty), Some(x));
    let later = b.ident("later");
    b.variable("copy", None, Some(later));
    let one = b.int(1);
    b.variable("later", None, Some(one));
    let cycle = b.ident("cycle");
    b.variable("cycle", None, Some(cycle));
    let (mut program, source) = b.finish();
    let mut compiler = Compiler::with_config(&source, DiagnosticConfig::unlimited());

    resolve(&mut compiler, &mut program).unwrap();
    let kinds: Vec<ExprKind> = program.exprs().iter().map(|e| e.kind).collect();
    let sorts: Vec<Sort> = program.exprs().iter().map(|e| e.sort).collect();
    let variables: Vec<(Sort, u32)> = program.variables().iter().map(|v| (v.sort, v.order)).collect();
    let reported = compiler.diagnostics().len();
    assert_eq!(reported, 1);

    resolve(&mut compiler, &mut program).unwrap();
    let kinds_again: Vec<ExprKind> = program.exprs().iter().map(|e| e.kind).collect();
    let sorts_again: Vec<Sort> = program.exprs().iter().map(|e| e.sort).collect();
    let variables_again: Vec<(Sort, u32)> =
        program.variables().iter().map(|v| (v.sort, v.order)).collect();
    assert_eq!(kinds, kinds_again);
    assert_eq!(sorts, sorts_again);
    assert_eq!(variables, variables_again);
    assert_eq!(compiler.diagnostics().len(), reported);
}

#[test]
fn missing_main_is_reported_by_the_first_resolution_only() {
    let mut b = ProgramBuilder::new();
    b.function("helper", &[], None, |_| {});
    let (mut program, source) = b.finish();
    let mut compiler = Compiler::with_config(&source, DiagnosticConfig::unlimited());

    resolve(&mut compiler, &mut program).unwrap();
    assert_eq!(compiler.diagnostics().count(ErrorCode::E1001), 1);
    resolve(&mut compiler, &mut program).unwrap();
    assert_eq!(compiler.diagnostics().count(ErrorCode::E1001), 1);
    assert!(program.main_searched);
    assert_eq!(program.main, None);
}

#[test]
fn bare_enum_values_resolve_where_an_enum_is_expected() {
    let mut b = ProgramBuilder::new();
    let colour = b.enum_type("Colour", &["Red", "Green"]);
    let (mut red, mut green, mut unhinted) = (None, None, None);
    b.function("main", &[], None, |b| {
        let ty = b.ident("Colour");
        let value = b.ident("Red");
        red = Some(value);
        b.variable("c", Some(ty), Some(value));

        let c = b.ident("c");
        let value = b.ident("Green");
        green = Some(value);
        b.assign(c, value);

        let value = b.ident("Red");
        unhinted = Some(value);
        b.variable("plain", None, Some(value));
    });
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    assert_eq!(
        program.expr(red.unwrap()).kind,
        ExprKind::EnumValue(EnumValueId::new(0))
    );
    assert_eq!(program.expr(red.unwrap()).sort, Sort::Enum(colour));
    assert_eq!(
        program.expr(green.unwrap()).kind,
        ExprKind::EnumValue(EnumValueId::new(1))
    );
    assert_eq!(program.expr(unhinted.unwrap()).kind, ExprKind::Identifier);
}

#[test]
fn functions_see_globals_declared_later() {
    let mut b = ProgramBuilder::new();
    let mut usage = None;
    b.function("main", &[], None, |b| {
        let g = b.ident("g");
        usage = Some(g);
        b.output(g);
    });
    let one = b.int(1);
    let g = b.variable("g", None, Some(one));
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    assert_eq!(program.expr(usage.unwrap()).kind, ExprKind::VariableRef(g));
    assert_eq!(program.expr(usage.unwrap()).sort, Sort::Int);
}

#[test]
fn global_sorts_and_order_follow_their_initializers() {
    let mut b = ProgramBuilder::new();
    b.function("main", &[], None, |_| {});
    let later = b.ident("later");
    let half = b.float(0.5);
    let sum = b.binary(BinaryOp::Add, later, half);
    let first = b.variable("first", None, Some(sum));
    let base = b.ident("base");
    let later = b.variable("later", None, Some(base));
    let two = b.int(2);
    let base = b.variable("base", None, Some(two));
    let num_type = b.ident("num");
    let base_ref = b.ident("base");
    let widened = b.variable("widened", Some(num_type), Some(base_ref));
    let (program, diagnostics) = run_resolve(b);

    assert!(diagnostics.is_empty());
    let settled: Vec<(Sort, u32)> = [first, later, base, widened]
        .iter()
        .map(|&v| (program.variable(v).sort, program.variable(v).order))
        .collect();
    assert_eq!(
        settled,
        vec![(Sort::Num, 3), (Sort::Int, 2), (Sort::Int, 1), (Sort::Num, 2)]
    );
}

#[test]
fn cyclic_globals_are_reported() {
    let mut b = ProgramBuilder::new();
    b.function("main", &[], None, |_| {});
    let q = b.ident("q");
    let p = b.variable("p", None, Some(q));
    let p_ref = b.ident("p");
    let q = b.variable("q", None, Some(p_ref));
    let one = b.int(1);
    let r = b.variable("r", None, Some(one));
    let (program, diagnostics) = run_resolve(b);

    assert_eq!(codes(&diagnostics), vec![ErrorCode::E1008, ErrorCode::E1008]);
    assert_eq!(program.variable(p).sort, Sort::Error);
    assert_eq!(program.variable(q).sort, Sort::Error);
    assert_eq!(program.variable(p).order, 0);
    assert_eq!(program.variable(r).order, 1);
}

#[test]
fn malformed_program_is_an_internal_error() {
    let mut b = ProgramBuilder::new();
    let main = b.function("main", &[], None, |b| {
        b.break_stmt();
    });
    let (mut program, source) = b.finish();
    program.function_mut(main).body.statements.start = 0;
    let mut compiler = Compiler::new(&source);

    let err = resolve(&mut compiler, &mut program).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E9001);
    assert!(err.to_string().contains("not a problem with the program"));
}

#[test]
fn function_ids_follow_declaration_order() {
    let mut b = ProgramBuilder::new();
    b.function("a", &[], None, |_| {});
    b.function("main", &[], None, |_| {});
    let (program, _) = run_resolve(b);
    assert_eq!(program.main, Some(FunctionId::new(1)));
}
