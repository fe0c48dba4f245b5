use leibniz_compiler::{CompileOptions, Compiler, SourceFile, Type};

fn compiler() -> Compiler {
    Compiler::new(CompileOptions::default())
}

#[test]
fn compiles_a_complete_program() {
    let source = SourceFile::from_string(
        r#"
        // Sum the squares below a bound.
        fnc square(n: integer): integer = { return n ** 2; }
        let total = 0;
        for i in domain(1, 4) {
            total = total + square(i);
        }
        obj t = Triangle(3, 4, 5);
        let readings: float[] = [1.5, 2.5, 3.5];
        print(total);
        print(t.area());
        print(mean(readings.filter(r: float => r > 2)));
        "#,
    );
    let mut compiler = compiler();
    let compilation = compiler.compile(&source).expect("program should compile");

    assert!(compiler.diagnostics().is_empty());
    assert_eq!(compilation.syntax.statements.len(), 8);
    assert_eq!(compilation.program.statements.len(), 8);
    assert!(compilation
        .javascript
        .starts_with("const math = require('mathjs');\nfunction square_1(n_2) {"));
    assert!(compilation
        .javascript
        .contains("console.log(math.mean(readings_6.filter(r_7 => r_7 > 2)));"));
    assert!(!compilation.javascript.ends_with('\n'));
}

#[test]
fn typed_program_reflects_declared_types() {
    let source = SourceFile::from_string("let xs: number[] = [1, 2];");
    let compilation = compiler().compile(&source).expect("program should compile");
    let json = compilation.program.to_json().expect("typed AST serializes");
    assert!(json.contains("\"name\": \"xs\""), "{json}");
    match &compilation.program.statements[0] {
        leibniz_compiler::typed::Statement::VariableDeclaration { variable, .. } => {
            assert_eq!(variable.ty, Type::array_of(Type::Number));
        }
        other => panic!("expected a declaration, found {other:?}"),
    }
}

#[test]
fn lexer_failures_become_positioned_diagnostics() {
    let source = SourceFile::from_string("let a = 1;\nlet b = $;");
    let mut compiler = compiler();
    let err = compiler
        .compile(&source)
        .err()
        .expect("'$' is not a token");
    assert_eq!(err.to_string(), "Lexing failed");

    let diagnostics = compiler.diagnostics().entries();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("Unexpected character '$'"));
    let span = diagnostics[0].span.expect("lexer diagnostics carry a position");
    assert_eq!((span.line, span.column), (2, 9));
}

#[test]
fn parser_failures_are_reported() {
    let source = SourceFile::from_string("let a = ;");
    let mut compiler = compiler();
    assert!(compiler.compile(&source).is_err());
    assert!(!compiler.diagnostics().is_empty());
}

#[test]
fn analysis_failures_report_kind_message_and_span() {
    let source = SourceFile::from_string("let ok = 1;\nlet bad: integer = 2.5;");
    let mut compiler = compiler();
    let err = compiler
        .compile(&source)
        .err()
        .expect("float does not fit integer");
    assert_eq!(err.to_string(), "Semantic analysis failed");

    let diagnostics = compiler.diagnostics().entries();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "TypeError: Cannot assign float to integer"
    );
    let span = diagnostics[0].span.expect("analysis errors carry a span");
    assert_eq!(span.line, 2);
}

#[test]
fn only_the_first_analysis_error_is_reported() {
    let source = SourceFile::from_string("print(missing); break;");
    let mut compiler = compiler();
    assert!(compiler.compile(&source).is_err());
    let diagnostics = compiler.diagnostics().entries();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "NameError: Identifier missing not declared"
    );
}

#[test]
fn optimization_can_be_disabled() {
    let source = SourceFile::from_string("print(1 + 2);");
    let folded = compiler().compile(&source).expect("compiles");
    let mut plain = Compiler::new(CompileOptions {
        optimize: false,
        ..CompileOptions::default()
    });
    let unfolded = plain.compile(&source).expect("compiles");

    assert!(folded.javascript.ends_with("console.log(3);"));
    assert!(unfolded.javascript.ends_with("console.log(1 + 2);"));
}
