//! End-to-end lowering tests
//!
//! Each test hand-builds a small module the way the parser would and runs
//! it through a fresh [`Pipeline`].

use au_ast as ast;
use au_ast::{BinOp, ExprKind, LitValue, PatternKind, StmtKind, TypeExprKind};
use au_diag::{Event, MemorySink};
use au_intern::Symbol;
use au_sir as sir;
use au_sir_lower::{Pipeline, RuleEngine, Services};
use std::rc::Rc;

fn expr(kind: ExprKind) -> ast::Expr {
    ast::Expr::new(kind)
}

fn int(value: i64) -> ast::Expr {
    expr(ExprKind::Literal {
        value: LitValue::Int(value),
    })
}

fn str_lit(value: &str) -> ast::Expr {
    expr(ExprKind::Literal {
        value: LitValue::Str(value.to_string()),
    })
}

fn var(services: &Services, name: &str) -> ast::Expr {
    expr(ExprKind::Var {
        name: services.intern(name),
    })
}

fn name_ty(services: &Services, name: &str) -> ast::TypeExpr {
    ast::TypeExpr {
        kind: TypeExprKind::Name {
            name: services.intern(name),
        },
        origin: None,
    }
}

fn param(services: &Services, name: &str, ty: &str) -> ast::Param {
    ast::Param {
        name: services.intern(name),
        ty: name_ty(services, ty),
        origin: None,
    }
}

fn func(services: &Services, name: &str, params: Vec<ast::Param>, ret: &str, body: ast::Expr) -> ast::FuncDecl {
    ast::FuncDecl {
        name: services.intern(name),
        type_params: vec![],
        params,
        ret_type: name_ty(services, ret),
        body: Some(body),
        external: false,
        exported: false,
        origin: None,
    }
}

fn module(decls: Vec<ast::Decl>) -> ast::Module {
    ast::Module {
        name: None,
        imports: vec![],
        decls,
        origin: None,
    }
}

/// A three-variant sum type declaration: `Shape = Circle(f32) | Square(f32) | Dot`
fn shape_decl(services: &Services) -> ast::TypeDecl {
    let variant = |name: &str, fields: Vec<(&str, &str)>| ast::VariantDef {
        name: services.intern(name),
        fields: fields
            .into_iter()
            .map(|(field, ty)| (services.intern(field), name_ty(services, ty)))
            .collect(),
        origin: None,
    };
    ast::TypeDecl {
        name: services.intern("Shape"),
        type_params: vec![],
        ty: ast::TypeExpr {
            kind: TypeExprKind::Sum {
                variants: vec![
                    variant("Circle", vec![("radius", "f32")]),
                    variant("Square", vec![("side", "f32")]),
                    variant("Dot", vec![]),
                ],
            },
            origin: None,
        },
        exported: false,
        origin: None,
    }
}

fn ctor_pattern(services: &Services, name: &str, bindings: Vec<&str>) -> ast::Pattern {
    ast::Pattern::new(PatternKind::Constructor {
        name: services.intern(name),
        fields: bindings
            .into_iter()
            .map(|binding| ast::PatternField::Binding(services.intern(binding)))
            .collect(),
    })
}

fn arm(pattern: ast::Pattern, body: ast::Expr) -> ast::MatchArm {
    ast::MatchArm {
        pattern,
        guard: None,
        body,
    }
}

fn unit_block() -> ast::Expr {
    expr(ExprKind::Block {
        statements: vec![],
        result: None,
    })
}

fn value_block(value: ast::Expr) -> ast::Expr {
    expr(ExprKind::Block {
        statements: vec![],
        result: Some(Box::new(value)),
    })
}

fn find_func<'m>(lowered: &'m sir::Module, services: &Services, name: &str) -> &'m sir::Func {
    let wanted = services.intern(name);
    lowered
        .items
        .iter()
        .find_map(|item| match item {
            sir::Item::Func(func) if func.name == wanted => Some(func),
            _ => None,
        })
        .unwrap_or_else(|| panic!("function {name} not in lowered module"))
}

/// Collect every lambda in an expression tree, outermost first
fn collect_lambdas(expr: &sir::Expr, out: &mut Vec<(Vec<Symbol>, Vec<Symbol>)>) {
    if let sir::ExprKind::Lambda {
        captures,
        params,
        body,
    } = &expr.kind
    {
        out.push((
            captures.iter().map(|capture| capture.name).collect(),
            params.iter().map(|param| param.name).collect(),
        ));
        collect_lambdas(body, out);
        return;
    }
    match &expr.kind {
        sir::ExprKind::Block { statements, result } => {
            for stmt in statements {
                if let sir::Stmt::VarDecl { value, .. } = stmt {
                    collect_lambdas(value, out);
                }
                if let sir::Stmt::Expr { expr } = stmt {
                    collect_lambdas(expr, out);
                }
            }
            collect_lambdas(result, out);
        }
        sir::ExprKind::Call { callee, args } => {
            collect_lambdas(callee, out);
            for arg in args {
                collect_lambdas(arg, out);
            }
        }
        sir::ExprKind::Binary { left, right, .. } => {
            collect_lambdas(left, out);
            collect_lambdas(right, out);
        }
        _ => {}
    }
}

#[test]
fn generic_identity_call_instantiates_from_argument() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();
    let t = services.intern("T");

    let identity = ast::FuncDecl {
        name: services.intern("identity"),
        type_params: vec![ast::TypeParam {
            name: t,
            constraint: None,
            origin: None,
        }],
        params: vec![param(services, "x", "T")],
        ret_type: name_ty(services, "T"),
        body: Some(var(services, "x")),
        external: false,
        exported: false,
        origin: None,
    };
    let main = func(
        services,
        "main",
        vec![],
        "i32",
        expr(ExprKind::Call {
            callee: Box::new(var(services, "identity")),
            args: vec![int(7)],
        }),
    );

    let lowered = pipeline
        .lower_module(&module(vec![
            ast::Decl::Func(identity),
            ast::Decl::Func(main),
        ]))
        .expect("module lowers");

    let services = pipeline.services();
    let main_ir = find_func(&lowered, services, "main");
    let body = main_ir.body.as_ref().expect("main has a body");
    assert_eq!(body.ty, services.names.i32_ty());
}

#[test]
fn return_only_type_param_resolves_from_expected_type() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();
    let t = services.intern("T");

    // external fn parse<T>(s: string) -> T
    let parse = ast::FuncDecl {
        name: services.intern("parse"),
        type_params: vec![ast::TypeParam {
            name: t,
            constraint: None,
            origin: None,
        }],
        params: vec![param(services, "s", "string")],
        ret_type: name_ty(services, "T"),
        body: None,
        external: true,
        exported: false,
        origin: None,
    };

    // fn main() -> string { let x: string = parse("42"); x }
    let x = services.intern("x");
    let body = expr(ExprKind::Let {
        name: x,
        ty: Some(name_ty(services, "string")),
        mutable: false,
        value: Box::new(expr(ExprKind::Call {
            callee: Box::new(var(services, "parse")),
            args: vec![str_lit("42")],
        })),
        body: Some(Box::new(var(services, "x"))),
    });
    let main = func(services, "main", vec![], "string", body);

    let lowered = pipeline
        .lower_module(&module(vec![ast::Decl::Func(parse), ast::Decl::Func(main)]))
        .expect("module lowers");

    let services = pipeline.services();
    let main_ir = find_func(&lowered, services, "main");
    let body = main_ir.body.as_ref().expect("main has a body");
    let sir::ExprKind::Block { statements, .. } = &body.kind else {
        panic!("let should desugar to a block");
    };
    let sir::Stmt::VarDecl { value, .. } = &statements[0] else {
        panic!("first statement should be the binding");
    };
    assert_eq!(value.ty, services.names.string_ty());
}

#[test]
fn non_exhaustive_match_names_missing_variants_sorted() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let classify = func(
        services,
        "classify",
        vec![param(services, "s", "Shape")],
        "i32",
        expr(ExprKind::Match {
            scrutinee: Box::new(var(services, "s")),
            arms: vec![arm(ctor_pattern(services, "Circle", vec!["r"]), int(1))],
        }),
    );

    let error = pipeline
        .lower_module(&module(vec![
            ast::Decl::Type(shape_decl(services)),
            ast::Decl::Func(classify),
        ]))
        .expect_err("match misses variants");
    assert_eq!(
        error.to_string(),
        "Non-exhaustive match: missing patterns for Dot, Square"
    );
}

#[test]
fn wildcard_arm_restores_exhaustiveness() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let classify = func(
        services,
        "classify",
        vec![param(services, "s", "Shape")],
        "i32",
        expr(ExprKind::Match {
            scrutinee: Box::new(var(services, "s")),
            arms: vec![
                arm(ctor_pattern(services, "Circle", vec!["r"]), int(1)),
                arm(ast::Pattern::new(PatternKind::Wildcard), int(0)),
            ],
        }),
    );

    pipeline
        .lower_module(&module(vec![
            ast::Decl::Type(shape_decl(services)),
            ast::Decl::Func(classify),
        ]))
        .expect("wildcard covers the rest");
}

#[test]
fn all_unit_guard_free_match_lowers_to_statement_form() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let handle = func(
        services,
        "handle",
        vec![param(services, "s", "Shape")],
        "unit",
        expr(ExprKind::Match {
            scrutinee: Box::new(var(services, "s")),
            arms: vec![
                arm(ctor_pattern(services, "Circle", vec!["r"]), unit_block()),
                arm(ctor_pattern(services, "Square", vec!["x"]), unit_block()),
                arm(ctor_pattern(services, "Dot", vec![]), unit_block()),
            ],
        }),
    );

    let lowered = pipeline
        .lower_module(&module(vec![
            ast::Decl::Type(shape_decl(services)),
            ast::Decl::Func(handle),
        ]))
        .expect("module lowers");

    let services = pipeline.services();
    let handle_ir = find_func(&lowered, services, "handle");
    let body = handle_ir.body.as_ref().expect("handle has a body");
    assert!(body.ty.is_unit());
    let sir::ExprKind::Block { statements, result } = &body.kind else {
        panic!("statement-form match should be wrapped in a block");
    };
    assert!(matches!(statements[0], sir::Stmt::Match { .. }));
    assert!(matches!(result.kind, sir::ExprKind::Unit));
}

#[test]
fn value_producing_arms_switch_to_expression_form() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let measure = func(
        services,
        "measure",
        vec![param(services, "s", "Shape")],
        "i32",
        expr(ExprKind::Match {
            scrutinee: Box::new(var(services, "s")),
            arms: vec![
                arm(ctor_pattern(services, "Circle", vec!["r"]), value_block(int(1))),
                arm(ctor_pattern(services, "Square", vec!["x"]), value_block(int(2))),
                arm(ctor_pattern(services, "Dot", vec![]), value_block(int(3))),
            ],
        }),
    );

    let lowered = pipeline
        .lower_module(&module(vec![
            ast::Decl::Type(shape_decl(services)),
            ast::Decl::Func(measure),
        ]))
        .expect("module lowers");

    let services = pipeline.services();
    let measure_ir = find_func(&lowered, services, "measure");
    let body = measure_ir.body.as_ref().expect("measure has a body");
    assert!(matches!(body.kind, sir::ExprKind::Match { .. }));
    assert_eq!(body.ty, services.names.i32_ty());
}

#[test]
fn lambda_captures_outer_variable_but_not_its_parameter() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();
    let total = services.intern("total");
    let g = services.intern("g");

    // fn sum(total: i32) -> i32 { let g = |x| x + total; g(1) }
    let lambda = expr(ExprKind::Lambda {
        params: vec![ast::LambdaParam {
            name: services.intern("x"),
            ty: None,
            origin: None,
        }],
        ret_type: None,
        body: Box::new(expr(ExprKind::Binary {
            op: BinOp::Add,
            left: Box::new(var(services, "x")),
            right: Box::new(var(services, "total")),
        })),
    });
    let body = expr(ExprKind::Let {
        name: g,
        ty: None,
        mutable: false,
        value: Box::new(lambda),
        body: Some(Box::new(expr(ExprKind::Call {
            callee: Box::new(var(services, "g")),
            args: vec![int(1)],
        }))),
    });
    let sum = func(services, "sum", vec![param(services, "total", "i32")], "i32", body);

    let lowered = pipeline
        .lower_module(&module(vec![ast::Decl::Func(sum)]))
        .expect("module lowers");

    let services = pipeline.services();
    let sum_ir = find_func(&lowered, services, "sum");
    let mut lambdas = Vec::new();
    collect_lambdas(sum_ir.body.as_ref().expect("sum has a body"), &mut lambdas);
    assert_eq!(lambdas.len(), 1);
    let (captures, params) = &lambdas[0];
    assert_eq!(captures, &vec![total]);
    assert!(!captures.contains(&params[0]));
}

#[test]
fn nested_lambda_params_stay_out_of_outer_captures() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();
    let total = services.intern("total");
    let x = services.intern("x");
    let y = services.intern("y");

    // fn sum(total: i32) -> i32 { (|x| (|y| y + total)(x))(5) }
    let inner = expr(ExprKind::Lambda {
        params: vec![ast::LambdaParam {
            name: y,
            ty: None,
            origin: None,
        }],
        ret_type: None,
        body: Box::new(expr(ExprKind::Binary {
            op: BinOp::Add,
            left: Box::new(var(services, "y")),
            right: Box::new(var(services, "total")),
        })),
    });
    let outer = expr(ExprKind::Lambda {
        params: vec![ast::LambdaParam {
            name: x,
            ty: None,
            origin: None,
        }],
        ret_type: None,
        body: Box::new(expr(ExprKind::Call {
            callee: Box::new(inner),
            args: vec![var(services, "x")],
        })),
    });
    let body = expr(ExprKind::Call {
        callee: Box::new(outer),
        args: vec![int(5)],
    });
    let sum = func(services, "sum", vec![param(services, "total", "i32")], "i32", body);

    let lowered = pipeline
        .lower_module(&module(vec![ast::Decl::Func(sum)]))
        .expect("module lowers");

    let services = pipeline.services();
    let sum_ir = find_func(&lowered, services, "sum");
    let mut lambdas = Vec::new();
    collect_lambdas(sum_ir.body.as_ref().expect("sum has a body"), &mut lambdas);
    assert_eq!(lambdas.len(), 2);
    for (captures, _) in &lambdas {
        assert_eq!(captures, &vec![total]);
        assert!(!captures.contains(&x));
        assert!(!captures.contains(&y));
    }
}

#[test]
fn scope_is_clean_after_successful_lowering() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let body = expr(ExprKind::Block {
        statements: vec![ast::Stmt::new(StmtKind::VarDecl {
            name: services.intern("local"),
            ty: None,
            value: int(1),
            mutable: false,
        })],
        result: Some(Box::new(var(services, "local"))),
    });
    let main = func(services, "main", vec![], "i32", body);

    pipeline
        .lower_module(&module(vec![ast::Decl::Func(main)]))
        .expect("module lowers");
    assert!(pipeline.services().vars.is_empty());
}

#[test]
fn scope_is_clean_after_failed_lowering() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    // The body binds a local, then references an unknown name.
    let body = expr(ExprKind::Block {
        statements: vec![ast::Stmt::new(StmtKind::VarDecl {
            name: services.intern("local"),
            ty: None,
            value: int(1),
            mutable: false,
        })],
        result: Some(Box::new(var(services, "ghost"))),
    });
    let main = func(services, "main", vec![], "i32", body);

    let error = pipeline
        .lower_module(&module(vec![ast::Decl::Func(main)]))
        .expect_err("unknown identifier");
    assert!(error.to_string().contains("Unknown identifier 'ghost'"));
    assert!(!error.is_internal());
    assert!(pipeline.services().vars.is_empty());
}

#[test]
fn events_never_affect_lowering_results() {
    let build = |services: &Services| {
        let double = func(
            services,
            "double",
            vec![param(services, "x", "i32")],
            "i32",
            expr(ExprKind::Binary {
                op: BinOp::Mul,
                left: Box::new(var(services, "x")),
                right: Box::new(int(2)),
            }),
        );
        module(vec![ast::Decl::Func(double)])
    };

    let mut silent = Pipeline::new();
    let silent_module = build(silent.services());
    let silent_ir = silent.lower_module(&silent_module).expect("lowers");

    let sink = Rc::new(MemorySink::new());
    let mut observed = Pipeline::with_services(Services::with_events(sink.clone()));
    let observed_module = build(observed.services());
    let observed_ir = observed.lower_module(&observed_module).expect("lowers");

    assert_eq!(silent_ir, observed_ir);
    assert!(sink
        .events()
        .iter()
        .any(|event| matches!(event, Event::FunctionLowered { name, .. } if name == "double")));
}

#[test]
fn pure_functions_earn_the_comptime_effect() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();

    let double = func(
        services,
        "double",
        vec![param(services, "x", "i32")],
        "i32",
        expr(ExprKind::Binary {
            op: BinOp::Mul,
            left: Box::new(var(services, "x")),
            right: Box::new(int(2)),
        }),
    );
    let noisy = func(
        services,
        "noisy",
        vec![],
        "unit",
        expr(ExprKind::Call {
            callee: Box::new(var(services, "println")),
            args: vec![str_lit("hi")],
        }),
    );

    let lowered = pipeline
        .lower_module(&module(vec![ast::Decl::Func(double), ast::Decl::Func(noisy)]))
        .expect("module lowers");

    let services = pipeline.services();
    assert_eq!(
        find_func(&lowered, services, "double").effects,
        vec![sir::Effect::Comptime]
    );
    assert!(find_func(&lowered, services, "noisy").effects.is_empty());
}

#[test]
fn module_functions_resolve_through_member_calls() {
    let mut pipeline = Pipeline::new();
    let services = pipeline.services();
    let math = services.intern("Math");

    let sqrt = ast::FuncDecl {
        name: services.intern("sqrt"),
        type_params: vec![],
        params: vec![param(services, "x", "f32")],
        ret_type: name_ty(services, "f32"),
        body: None,
        external: true,
        exported: true,
        origin: None,
    };
    let use_it = func(
        services,
        "use_it",
        vec![param(services, "x", "f32")],
        "f32",
        expr(ExprKind::Call {
            callee: Box::new(expr(ExprKind::Member {
                object: Box::new(var(services, "Math")),
                member: services.intern("sqrt"),
            })),
            args: vec![var(services, "x")],
        }),
    );

    let mut source = module(vec![ast::Decl::Func(sqrt), ast::Decl::Func(use_it)]);
    source.name = Some(math);

    let lowered = pipeline.lower_module(&source).expect("module lowers");
    let services = pipeline.services();
    let use_ir = find_func(&lowered, services, "use_it");
    assert_eq!(
        use_ir.body.as_ref().expect("use_it has a body").ty,
        services.names.f32_ty()
    );
}

#[test]
fn empty_rule_engine_reports_an_internal_defect() {
    use au_sir_lower::Lowerer;

    let services = Services::new();
    let node = ast::Expr::new(ExprKind::Literal {
        value: LitValue::Int(1),
    });
    let engine = Rc::new(RuleEngine::with_rules(vec![], vec![], vec![]));
    let mut lw = Lowerer::new(services, engine);

    let error = lw.visit_expr(&node, None).expect_err("nothing matches");
    assert!(error.is_internal());
    assert!(error.to_string().contains("no expression rule matched"));
}
