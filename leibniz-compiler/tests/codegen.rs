use leibniz_compiler::{CompileOptions, Compiler, SourceFile, PRELUDE};

fn compile_with(source: &str, optimize: bool) -> String {
    let file = SourceFile::from_string(source);
    let mut compiler = Compiler::new(CompileOptions {
        optimize,
        ..CompileOptions::default()
    });
    match compiler.compile(&file) {
        Ok(compilation) => compilation.javascript,
        Err(err) => panic!(
            "expected program to compile, got {err}: {:?}",
            compiler.diagnostics().entries()
        ),
    }
}

fn compile(source: &str) -> String {
    compile_with(source, false)
}

fn js(lines: &[&str]) -> String {
    std::iter::once(PRELUDE)
        .chain(lines.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn empty_program_is_just_the_prelude() {
    assert_eq!(compile(""), "const math = require('mathjs');");
}

#[test]
fn renders_declarations_and_prints() {
    assert_eq!(
        compile(r#"let x = 1; const s: string = "hi"; print(x); print(s);"#),
        js(&[
            "let x_1 = 1;",
            "let s_2 = \"hi\";",
            "console.log(x_1);",
            "console.log(s_2);",
        ])
    );
}

#[test]
fn numbers_names_in_order_of_first_appearance() {
    assert_eq!(
        compile(
            r#"
            let x = 1;
            if x > 0 {
                let x = 2;
                print(x);
            }
            print(x);
            "#
        ),
        js(&[
            "let x_1 = 1;",
            "if (x_1 > 0) {",
            "  let x_2 = 2;",
            "  console.log(x_2);",
            "}",
            "console.log(x_1);",
        ])
    );
}

#[test]
fn renders_functions_with_indented_bodies() {
    assert_eq!(
        compile("fnc twice(n: integer): integer = { return n * 2; } print(twice(3));"),
        js(&[
            "function twice_1(n_2) {",
            "  return n_2 * 2;",
            "}",
            "console.log(twice_1(3));",
        ])
    );
}

#[test]
fn renders_void_functions_and_call_statements() {
    assert_eq!(
        compile(r#"fnc greet(name: string) { print("hi " + name); return; } greet("ada");"#),
        js(&[
            "function greet_1(name_2) {",
            "  console.log(\"hi \" + name_2);",
            "  return;",
            "}",
            "greet_1(\"ada\");",
        ])
    );
}

#[test]
fn renders_else_if_chains() {
    assert_eq!(
        compile(
            "let x = 3; if x > 2 { print(1); } else if x < 0 { print(2); } else { print(3); }"
        ),
        js(&[
            "let x_1 = 3;",
            "if (x_1 > 2) {",
            "  console.log(1);",
            "} else",
            "if (x_1 < 0) {",
            "  console.log(2);",
            "} else {",
            "  console.log(3);",
            "}",
        ])
    );
}

#[test]
fn renders_loops() {
    assert_eq!(
        compile(
            r#"
            let i = 0;
            while i < 3 {
                i++;
                if i == 2 { break; }
            }
            for j in domain(1, 10, 2) { print(j); }
            for k in domain(4) { --i; }
            "#
        ),
        js(&[
            "let i_1 = 0;",
            "while (i_1 < 3) {",
            "  i_1++;",
            "  if (i_1 === 2) {",
            "    break;",
            "  }",
            "}",
            "for (let j_2 = 1; j_2 < 10; j_2 += 2) {",
            "  console.log(j_2);",
            "}",
            "for (let k_3 = 0; k_3 < 4; k_3 += 1) {",
            "  i_1--;",
            "}",
        ])
    );
}

#[test]
fn loop_tests_follow_the_step_direction() {
    assert_eq!(
        compile(
            r#"
            for i in domain(10, 0, -2) { print(i); }
            let s = 3;
            for j in domain(0, 9, s) { print(j); }
            "#
        ),
        js(&[
            "for (let i_1 = 10; i_1 > 0; i_1 += -(2)) {",
            "  console.log(i_1);",
            "}",
            "let s_2 = 3;",
            "for (let j_3 = 0; s_2 > 0 ? j_3 < 9 : j_3 > 9; j_3 += s_2) {",
            "  console.log(j_3);",
            "}",
        ])
    );
}

#[test]
fn renders_arrays_matrices_and_subscripts() {
    assert_eq!(
        compile("let m = [[1, 2], [3, 4]]; m[0][1] = 5; print(m[1]); print(#m);"),
        js(&[
            "let m_1 = [[1, 2], [3, 4]];",
            "m_1[0][1] = 5;",
            "console.log(m_1[1]);",
            "console.log(m_1.length);",
        ])
    );
}

#[test]
fn parenthesizes_by_precedence() {
    assert_eq!(
        compile(
            r#"
            let a = 1;
            let b = 2;
            print((a + b) * 2);
            print(a - (b - 1));
            print(a - b - 1);
            print(2 ** 3 ** 2);
            print((2 ** 3) ** 2);
            print(-a);
            print(!(a < b) || a == b);
            print(a != b && true);
            "#
        ),
        js(&[
            "let a_1 = 1;",
            "let b_2 = 2;",
            "console.log((a_1 + b_2) * 2);",
            "console.log(a_1 - (b_2 - 1));",
            "console.log(a_1 - b_2 - 1);",
            "console.log(2 ** 3 ** 2);",
            "console.log((2 ** 3) ** 2);",
            "console.log(-(a_1));",
            "console.log(!(a_1 < b_2) || a_1 === b_2);",
            "console.log(a_1 !== b_2 && true);",
        ])
    );
}

#[test]
fn escapes_strings_and_inlines_constants() {
    assert_eq!(
        compile(r#"print("say \"hi\"\n"); print(pi); print(e);"#),
        js(&[
            r#"console.log("say \"hi\"\n");"#,
            "console.log(3.141592653589793);",
            "console.log(2.718281828459045);",
        ])
    );
}

#[test]
fn renders_builtins_through_their_runtime_paths() {
    assert_eq!(
        compile(
            r#"
            print(sqrt(16));
            print(mean([1, 2]));
            print(identity(2));
            print(mode([1, 1, 2]));
            print(str(5));
            print(derivative("x^2", "x", 3));
            "#
        ),
        js(&[
            "console.log(Math.sqrt(16));",
            "console.log(math.mean([1, 2]));",
            "console.log(math.identity(2)._data);",
            "console.log(math.mode([1, 1, 2])[0]);",
            "console.log(String(5));",
            "console.log(math.derivative(\"x^2\", \"x\").evaluate({x: 3}));",
        ])
    );
}

#[test]
fn derivative_with_a_computed_variable_uses_a_computed_key() {
    assert_eq!(
        compile(r#"let v = "t"; print(derivative("t^3", v, 2));"#),
        js(&[
            "let v_1 = \"t\";",
            "console.log(math.derivative(\"t^3\", v_1).evaluate({[v_1]: 2}));",
        ])
    );
}

#[test]
fn renders_objects_with_their_methods() {
    assert_eq!(
        compile("obj r = Rectangle(2, 3); print(r.area());"),
        js(&[
            "let r_1 = {base: 2, height: 3, area: function() {return this.base * this.height;}, \
             perimeter: function() {return 2 * (this.base + this.height);}};",
            "console.log(r_1.area());",
        ])
    );
    assert_eq!(
        compile("obj c = Circle(1.5); print(c.circumference());"),
        js(&[
            "let c_1 = {radius: 1.5, area: function() {return Math.PI * this.radius ** 2;}, \
             circumference: function() {return 2 * Math.PI * this.radius;}};",
            "console.log(c_1.circumference());",
        ])
    );
}

#[test]
fn renders_map_and_filter_as_arrow_functions() {
    assert_eq!(
        compile(
            r#"
            fnc twice(n: integer): integer = { return n * 2; }
            let xs = [1, 2, 3];
            print(xs.map(x: integer => x * 2));
            print(xs.filter(x: integer => x > 1));
            print(xs.map(twice));
            "#
        ),
        js(&[
            "function twice_1(n_2) {",
            "  return n_2 * 2;",
            "}",
            "let xs_3 = [1, 2, 3];",
            "console.log(xs_3.map(x_4 => x_4 * 2));",
            "console.log(xs_3.filter(x_5 => x_5 > 1));",
            "console.log(xs_3.map(x_6 => twice_1(x_6)));",
        ])
    );
}

#[test]
fn optimized_output_folds_and_prunes() {
    assert_eq!(
        compile_with(
            r#"
            let x = 2 + 3 * 4;
            if true { print(x); } else { print(0); }
            while false { print(1); }
            x = x;
            print(x * 1);
            "#,
            true
        ),
        js(&["let x_1 = 14;", "console.log(x_1);", "console.log(x_1);"])
    );
}
