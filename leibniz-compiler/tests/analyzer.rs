use leibniz_compiler::typed::{Callee, ExpressionKind, Literal, Program, Statement};
use leibniz_compiler::{analyze, AnalysisError, ErrorKind, Lexer, Parser, SourceFile, Type};

fn analyze_source(source: &str) -> Result<Program, AnalysisError> {
    let file = SourceFile::from_string(source);
    let tokens = Lexer::new(&file).tokenize().expect("source should lex");
    let syntax = Parser::new(&file, tokens)
        .parse()
        .expect("source should parse");
    analyze(&syntax)
}

fn accepts(source: &str) -> Program {
    match analyze_source(source) {
        Ok(program) => program,
        Err(err) => panic!("expected program to analyze, got {err}\n{source}"),
    }
}

fn rejects(source: &str) -> AnalysisError {
    match analyze_source(source) {
        Ok(_) => panic!("expected analysis to fail for:\n{source}"),
        Err(err) => err,
    }
}

fn assert_error(source: &str, kind: ErrorKind, message: &str) {
    let err = rejects(source);
    assert_eq!(err.kind, kind, "unexpected kind for {err}");
    assert_eq!(err.message, message);
}

fn declared_type(program: &Program, index: usize) -> Type {
    match &program.statements[index] {
        Statement::VariableDeclaration { variable, .. } => variable.ty.clone(),
        other => panic!("expected a declaration, found {other:?}"),
    }
}

fn printed_type(program: &Program, index: usize) -> Type {
    match &program.statements[index] {
        Statement::Print { argument } => argument.ty.clone(),
        other => panic!("expected a print statement, found {other:?}"),
    }
}

#[test]
fn rejects_float_into_integer_binding() {
    let err = rejects("let x: integer = 3.14;");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.to_string(), "TypeError: Cannot assign float to integer");
    let span = err.span.expect("errors carry a source span");
    assert_eq!(span.line, 1);
}

#[test]
fn subscript_of_integer_array_is_integer() {
    let program = accepts("let a: integer[] = [1, 2, 3]; print(a[0]);");
    assert_eq!(printed_type(&program, 1), Type::Integer);
}

#[test]
fn rejects_break_outside_loop() {
    assert_error(
        "break;",
        ErrorKind::ControlFlow,
        "break can only appear inside a loop",
    );
}

#[test]
fn rejects_boolean_argument_for_integer_parameter() {
    assert_error(
        "fnc f(x: integer, y: integer): integer = { return x + y; } print(f(1, true));",
        ErrorKind::Type,
        "Argument 2 of f: cannot pass boolean as integer",
    );
}

#[test]
fn rejects_unknown_method_for_class() {
    assert_error(
        "obj c = Circle(5); print(c.perimeter());",
        ErrorKind::Name,
        "perimeter is not a valid method for Circle",
    );
}

#[test]
fn infers_types_from_initializers() {
    let program = accepts(
        r#"
        let i = 1;
        let f = 2.5;
        let s = "text";
        let b = 1 < 2;
        let mixed = [1, 2.5];
        let empty = [];
        let m = [[1, 2], [3, 4]];
        let q = 7 / 2;
        "#,
    );
    assert_eq!(declared_type(&program, 0), Type::Integer);
    assert_eq!(declared_type(&program, 1), Type::Float);
    assert_eq!(declared_type(&program, 2), Type::String);
    assert_eq!(declared_type(&program, 3), Type::Boolean);
    assert_eq!(declared_type(&program, 4), Type::array_of(Type::Float));
    assert_eq!(declared_type(&program, 5), Type::array_of(Type::Unknown));
    assert_eq!(declared_type(&program, 6), Type::Matrix);
    assert_eq!(declared_type(&program, 7), Type::Float);
}

#[test]
fn widens_numeric_values_along_the_lattice() {
    let program = accepts(
        r#"
        let n: number = 1;
        let f: float = 2;
        let xs: number[] = [1, 2, 3];
        n = 2.5;
        "#,
    );
    assert_eq!(declared_type(&program, 0), Type::Number);
    assert_eq!(declared_type(&program, 1), Type::Float);
    assert_eq!(declared_type(&program, 2), Type::array_of(Type::Number));
}

#[test]
fn rejects_mixed_array_elements() {
    assert_error(
        r#"let xs = [1, "two"];"#,
        ErrorKind::Type,
        "Array elements must share a type: expected integer, but got string",
    );
}

#[test]
fn matrix_literal_can_fill_nested_array_binding() {
    let program = accepts("let grid: integer[][] = [[1, 2], [3, 4]]; print(grid[1][0]);");
    assert_eq!(
        declared_type(&program, 0),
        Type::array_of(Type::array_of(Type::Integer))
    );
    assert_eq!(printed_type(&program, 1), Type::Integer);
}

#[test]
fn indexes_matrices_by_row_then_cell() {
    let program = accepts(
        r#"
        let m: matrix = [[1, 0], [0, 1]];
        print(m[0]);
        print(m[0][1]);
        m[1][1] = 5;
        print(#m);
        "#,
    );
    assert_eq!(printed_type(&program, 1), Type::array_of(Type::Number));
    assert_eq!(printed_type(&program, 2), Type::Number);
    assert_eq!(printed_type(&program, 4), Type::Integer);
}

#[test]
fn rejects_ragged_and_non_numeric_matrices() {
    let err = rejects("let m = [[1, 2], [3]];");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.starts_with("Matrix rows must have equal length"));

    let err = rejects(r#"let m = [["a"], ["b"]];"#);
    assert_eq!(
        err.message,
        "Matrix elements must be numeric, but got string"
    );
}

#[test]
fn nests_arrays_beyond_two_dimensions() {
    let program = accepts(
        r#"
        let a: integer[][][] = [[[1, 2]], [[3, 4]]];
        let b = [[[1.5]], [[2]]];
        let c: integer[][][][] = [[[[1]]]];
        print(a[1][0][1]);
        "#,
    );
    let cube = |element| Type::array_of(Type::array_of(Type::array_of(element)));
    assert_eq!(declared_type(&program, 0), cube(Type::Integer));
    assert_eq!(declared_type(&program, 1), cube(Type::Float));
    assert_eq!(
        declared_type(&program, 2),
        Type::array_of(cube(Type::Integer))
    );
    assert_eq!(printed_type(&program, 3), Type::Integer);
}

#[test]
fn rows_of_empty_arrays_are_nested_arrays() {
    let program = accepts("let m: integer[][] = [[], []]; let e = [[]];");
    assert_eq!(
        declared_type(&program, 0),
        Type::array_of(Type::array_of(Type::Integer))
    );
    assert_eq!(
        declared_type(&program, 1),
        Type::array_of(Type::array_of(Type::Unknown))
    );

    let err = rejects("let m = [[1, 2], []];");
    assert!(err.message.starts_with("Matrix rows must have equal length"));
}

#[test]
fn empty_array_elements_never_become_values() {
    assert_error(
        r#"let e = []; let x = e[0]; x = "s"; let n: integer = x;"#,
        ErrorKind::Type,
        "Cannot index into an empty array of unknown element type",
    );
    assert_error(
        "fnc twice(n: integer): integer = { return n * 2; } let e = []; print(e.map(twice));",
        ErrorKind::Type,
        "map over an empty array needs a typed lambda such as x: number => twice",
    );

    let program = accepts(
        r#"
        let e = [];
        let xs: integer[] = e;
        print(e.map(x: integer => x * 2));
        print(max([]));
        print(arandom([]));
        "#,
    );
    assert_eq!(printed_type(&program, 2), Type::array_of(Type::Integer));
    assert_eq!(printed_type(&program, 3), Type::Number);
    assert_eq!(printed_type(&program, 4), Type::Number);
}

#[test]
fn resolves_constants_to_float_literals() {
    let program = accepts("print(pi); print(e); print(π * 2);");
    match &program.statements[0] {
        Statement::Print { argument } => match &argument.kind {
            ExpressionKind::Literal(Literal::Float(value)) => {
                assert_eq!(*value, std::f64::consts::PI)
            }
            other => panic!("expected a float literal, found {other:?}"),
        },
        other => panic!("expected a print statement, found {other:?}"),
    }
    assert_eq!(printed_type(&program, 2), Type::Float);
}

#[test]
fn user_bindings_shadow_constants() {
    let program = accepts(r#"let e = "euler"; print(e);"#);
    assert_eq!(printed_type(&program, 1), Type::String);
}

#[test]
fn types_builtin_calls_from_the_registry() {
    let program = accepts(
        r#"
        let xs: integer[] = [3, 1, 2];
        print(sqrt(16));
        print(floor(2.7));
        print(abs(-3));
        print(min(1, 2.5));
        print(max(xs));
        print(sort(xs));
        print(count("abc"));
        print(mean(xs));
        print(identity(3));
        print(diag([1, 2, 3]));
        print(diag([[1, 2], [3, 4]]));
        print(arandom(xs));
        print(str(42));
        print(derivative("x^2", "x", 5));
        "#,
    );
    assert_eq!(printed_type(&program, 1), Type::Float);
    assert_eq!(printed_type(&program, 2), Type::Integer);
    assert_eq!(printed_type(&program, 3), Type::Integer);
    assert_eq!(printed_type(&program, 4), Type::Float);
    assert_eq!(printed_type(&program, 5), Type::Integer);
    assert_eq!(printed_type(&program, 6), Type::array_of(Type::Integer));
    assert_eq!(printed_type(&program, 7), Type::Integer);
    assert_eq!(printed_type(&program, 8), Type::Float);
    assert_eq!(printed_type(&program, 9), Type::Matrix);
    assert_eq!(printed_type(&program, 10), Type::array_of(Type::Number));
    assert_eq!(printed_type(&program, 11), Type::Integer);
    assert_eq!(printed_type(&program, 12), Type::Integer);
    assert_eq!(printed_type(&program, 13), Type::String);
    assert_eq!(printed_type(&program, 14), Type::Float);
}

#[test]
fn rejects_bad_builtin_calls() {
    assert_error(
        "print(sqrt(1, 2));",
        ErrorKind::Arity,
        "Function sqrt expects 1 argument(s), but received 2",
    );
    assert_error(
        r#"print(sqrt("four"));"#,
        ErrorKind::Type,
        "Argument 1 of sqrt: cannot pass string as number",
    );
    assert_error(
        "print(det([1, 2]));",
        ErrorKind::Type,
        "Argument 1 of det: cannot pass integer[] as matrix",
    );
    assert_error(
        "print(nope(1));",
        ErrorKind::Name,
        "Function nope not declared",
    );
}

#[test]
fn user_functions_shadow_builtins() {
    let program = accepts(
        r#"
        fnc sqrt(s: string): string = { return s; }
        print(sqrt("x"));
        "#,
    );
    assert_eq!(printed_type(&program, 1), Type::String);
    match &program.statements[1] {
        Statement::Print { argument } => match &argument.kind {
            ExpressionKind::Call { callee, .. } => {
                assert!(matches!(callee, Callee::User(_)))
            }
            other => panic!("expected a call, found {other:?}"),
        },
        other => panic!("expected a print statement, found {other:?}"),
    }
}

#[test]
fn rejects_calls_to_non_functions() {
    assert_error(
        "let f = 1; print(f(2));",
        ErrorKind::Type,
        "f is not a function",
    );
}

#[test]
fn rejects_wrong_user_function_arity() {
    assert_error(
        "fnc g(a: integer): integer = { return a; } print(g());",
        ErrorKind::Arity,
        "Function g expects 1 argument(s), but received 0",
    );
}

#[test]
fn rejects_functions_used_as_values() {
    let err = rejects("fnc g(a: integer): integer = { return a; } let h = g;");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.message, "Function g cannot be used as a value");
}

#[test]
fn analyzes_objects_and_methods() {
    let program = accepts(
        r#"
        obj c = Circle(2);
        obj r = Rectangle(3, 4.5);
        obj t = Triangle(3, 4, 5);
        print(c.area());
        print(r.perimeter());
        print(t.area());
        "#,
    );
    assert_eq!(printed_type(&program, 3), Type::Float);
    assert_eq!(printed_type(&program, 4), Type::Float);
    assert_eq!(printed_type(&program, 5), Type::Float);
}

#[test]
fn rejects_bad_object_construction() {
    assert_error(
        "obj s = Square(2);",
        ErrorKind::Name,
        "Unknown class Square; expected Circle, Rectangle, or Triangle",
    );
    assert_error(
        "obj r = Rectangle(2);",
        ErrorKind::Arity,
        "Rectangle requires exactly 2 argument(s) (base, height), but got 1",
    );
    assert_error(
        r#"obj c = Circle("big");"#,
        ErrorKind::Type,
        "Argument 1 of Circle: cannot pass string as number",
    );
    assert_error(
        "print(ghost.area());",
        ErrorKind::Name,
        "Object ghost not found",
    );
    assert_error(
        "obj c = Circle(1); c = 3;",
        ErrorKind::Type,
        "Cannot assign to constant c",
    );
}

#[test]
fn object_types_flow_into_function_parameters() {
    let program = accepts(
        r#"
        fnc size(shape: Circle): float = { return shape.area(); }
        obj c = Circle(1);
        print(size(c));
        "#,
    );
    assert_eq!(printed_type(&program, 2), Type::Float);
}

#[test]
fn analyzes_map_and_filter_forms() {
    let program = accepts(
        r#"
        fnc big(i: integer): boolean = { return i > 2; }
        fnc twice(i: integer): integer = { return i * 2; }
        let xs: integer[] = [1, 2, 3, 4];
        let a = xs.map(x: integer => x * 1.5);
        let b = xs.filter(x: integer => big);
        let c = xs.map(twice);
        let d = xs.filter(x: number => x > 1);
        "#,
    );
    assert_eq!(declared_type(&program, 3), Type::array_of(Type::Float));
    assert_eq!(declared_type(&program, 4), Type::array_of(Type::Integer));
    assert_eq!(declared_type(&program, 5), Type::array_of(Type::Integer));
    assert_eq!(declared_type(&program, 6), Type::array_of(Type::Integer));
    for index in 3..=6 {
        match &program.statements[index] {
            Statement::VariableDeclaration { initializer, .. } => {
                assert!(matches!(initializer.kind, ExpressionKind::MapOrFilter { .. }))
            }
            other => panic!("expected a declaration, found {other:?}"),
        }
    }
}

#[test]
fn rejects_bad_map_and_filter_calls() {
    assert_error(
        "let xs = [1, 2]; let ys = xs.filter(x: integer => x * 2);",
        ErrorKind::Type,
        "filter callback must return boolean, but got integer",
    );
    assert_error(
        "let xs = [1.5]; let ys = xs.map(x: integer => x);",
        ErrorKind::Type,
        "Lambda parameter x: cannot accept elements of type float as integer",
    );
    assert_error(
        "let n = 3; let ys = n.map(x: integer => x);",
        ErrorKind::Type,
        "map expects an array receiver, but got integer",
    );
    assert_error(
        "let xs = [1]; let ys = xs.map();",
        ErrorKind::Arity,
        "map expects 1 argument(s), but received 0",
    );
}

#[test]
fn rejects_lambdas_outside_map_and_filter() {
    let err = rejects("print(sqrt(x: integer => x));");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn checks_operator_operands() {
    assert_error(
        r#"print(1 + "a");"#,
        ErrorKind::Type,
        "Operator + expects two numbers or two strings, but got integer and string",
    );
    assert_error(
        "print(1 && true);",
        ErrorKind::Type,
        "Operator && expects booleans, but got integer and boolean",
    );
    assert_error(
        r#"print(1 == "1");"#,
        ErrorKind::Type,
        "Cannot compare integer with string",
    );
    assert_error(
        "print(#5);",
        ErrorKind::Type,
        "Operator # expects a string, array or matrix, but got integer",
    );
    assert_error(
        "print(!1);",
        ErrorKind::Type,
        "Operator ! expects a boolean, but got integer",
    );
    let program = accepts(r#"print("a" + "b"); print(2 ** 0.5); print(7 % 2);"#);
    assert_eq!(printed_type(&program, 0), Type::String);
    assert_eq!(printed_type(&program, 1), Type::Float);
    assert_eq!(printed_type(&program, 2), Type::Integer);
}

#[test]
fn requires_boolean_conditions() {
    assert_error(
        "if 1 { print(1); }",
        ErrorKind::Type,
        "Expected a boolean condition, but got integer",
    );
    assert_error(
        r#"while "yes" { print(1); }"#,
        ErrorKind::Type,
        "Expected a boolean condition, but got string",
    );
}

#[test]
fn checks_domain_arguments() {
    assert_error(
        "for i in domain() { print(i); }",
        ErrorKind::Arity,
        "domain() expects 1 to 3 arguments, but got 0",
    );
    assert_error(
        "for i in domain(1, 2, 3, 4) { print(i); }",
        ErrorKind::Arity,
        "domain() expects 1 to 3 arguments, but got 4",
    );
    assert_error(
        "for i in domain(2.5) { print(i); }",
        ErrorKind::Type,
        "domain() argument 1 must be integer, but got float",
    );
    assert_error(
        "for i in domain(0, 5, true) { print(i); }",
        ErrorKind::Type,
        "domain() argument 3 must be integer, but got boolean",
    );
    assert_error(
        "for i in domain(0, 5, 0) { print(i); }",
        ErrorKind::Type,
        "domain() step cannot be zero",
    );
    assert_error(
        "for i in domain(0, 5, -0) { print(i); }",
        ErrorKind::Type,
        "domain() step cannot be zero",
    );
    accepts("for i in domain(5, 0, -1) { print(i); }");
}

#[test]
fn fills_domain_defaults() {
    let program = accepts("for i in domain(5) { print(i); }");
    match &program.statements[0] {
        Statement::ForLoop {
            start, stop, step, ..
        } => {
            assert!(matches!(start.kind, ExpressionKind::Literal(Literal::Integer(0))));
            assert!(matches!(stop.kind, ExpressionKind::Literal(Literal::Integer(5))));
            assert!(matches!(step.kind, ExpressionKind::Literal(Literal::Integer(1))));
        }
        other => panic!("expected a for loop, found {other:?}"),
    }
}

#[test]
fn loop_variable_is_immutable() {
    assert_error(
        "for i in domain(3) { i = 2; }",
        ErrorKind::Type,
        "Cannot assign to constant i",
    );
}

#[test]
fn rejects_updates_of_non_numbers() {
    assert_error(
        r#"let s = "a"; s++;"#,
        ErrorKind::Type,
        "Cannot increment a value of type string",
    );
}

#[test]
fn rejects_writes_into_strings() {
    assert_error(
        r#"let s = "abc"; s[0] = "z";"#,
        ErrorKind::Type,
        "Cannot assign to a character of a string",
    );
}

#[test]
fn rejects_void_values() {
    assert_error(
        "fnc noop() { print(1); } let x = noop();",
        ErrorKind::Type,
        "Cannot assign void to x",
    );
    assert_error(
        "fnc noop() { print(1); } print(noop());",
        ErrorKind::Type,
        "Cannot print a void value",
    );
    let program = accepts("fnc noop() { print(1); } noop();");
    assert!(matches!(program.statements[1], Statement::Call { .. }));
}

#[test]
fn rejects_unknown_type_names() {
    assert_error(
        "let x: complex = 1;",
        ErrorKind::Name,
        "Unknown type complex",
    );
}

#[test]
fn typed_program_serializes_to_json() {
    let program = accepts("let x: integer = 1; print(x + 2);");
    let json = program.to_json().expect("typed AST serializes");
    assert!(json.contains("\"kind\": \"VariableDeclaration\""), "{json}");
    assert!(json.contains("\"kind\": \"Print\""), "{json}");
    assert!(json.contains("\"type\": \"Integer\""), "{json}");
}
