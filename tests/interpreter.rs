mod common;

#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use super::common::{output_of, run, runner_with_input, runtime_error_of};

    // ───────────────────────────── values ─────────────────────────────

    #[test]
    fn test_arithmetic_and_number_formatting() {
        assert_eq!(output_of("print 6 / 3;"), "2\n");
        assert_eq!(output_of("print 10 / 4;"), "2.5\n");
        assert_eq!(output_of("print 1.5 + 1;"), "2.5\n");
        assert_eq!(output_of("print -3;"), "-3\n");
        assert_eq!(output_of("print 2 * (3 + 4) - 1;"), "13\n");
        assert_eq!(output_of("print 1000000;"), "1000000\n");
    }

    #[test]
    fn test_number_exponent_form() {
        assert_eq!(output_of("print 1234567890123456;"), "1234567890123456\n");
        assert_eq!(output_of("print 10000000000000000;"), "1e+16\n");
        assert_eq!(
            output_of("print 123456789012345678901234567890;"),
            "1.2345678901234568e+29\n"
        );
        assert_eq!(output_of("print 0.0001;"), "0.0001\n");
        assert_eq!(output_of("print 0.00001;"), "1e-05\n");
        assert_eq!(output_of("print -0.000025;"), "-2.5e-05\n");
    }

    #[test]
    fn test_modulo() {
        assert_eq!(output_of("print 7 % 3;"), "1\n");
        assert_eq!(output_of("print 7.5 % 2;"), "1.5\n");
        assert_eq!(output_of("print 1 + 6 % 4;"), "3\n");
    }

    #[test]
    fn test_division_by_zero_faults() {
        let (output, message) = runtime_error_of("print 1;\nprint 6 / 0;\nprint 2;");

        assert_eq!(output, "1\n");
        assert_eq!(message, "[line 2] Division by zero.");
    }

    #[test]
    fn test_modulo_by_zero_faults() {
        let (_, message) = runtime_error_of("print 6 % 0;");
        assert_eq!(message, "[line 1] Modulo by zero.");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(output_of("print \"foo\" + \"bar\";"), "foobar\n");

        let (_, message) = runtime_error_of("print \"1\" + 1;");
        assert_eq!(message, "[line 1] Operands must be two numbers or two strings.");
    }

    #[test]
    fn test_comparison_requires_numbers() {
        assert_eq!(output_of("print 1 < 2; print 2 <= 1; print 3 >= 3;"), "true\nfalse\ntrue\n");

        let (_, message) = runtime_error_of("print \"a\" < \"b\";");
        assert_eq!(message, "[line 1] Operands must be numbers.");
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(output_of("print !true; print !nil; print !0; print !1;"), "false\ntrue\ntrue\nfalse\n");

        let (_, message) = runtime_error_of("print -\"a\";");
        assert_eq!(message, "[line 1] Operand must be a number.");
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(output_of("if (0) print \"yes\"; else print \"no\";"), "no\n");
        assert_eq!(output_of("if (\"0\") print \"yes\"; else print \"no\";"), "yes\n");
        assert_eq!(output_of("if (\"\") print \"yes\"; else print \"no\";"), "yes\n");
        assert_eq!(output_of("if (nil) print \"yes\"; else print \"no\";"), "no\n");
        assert_eq!(output_of("if (-1) print \"yes\"; else print \"no\";"), "yes\n");
    }

    #[test]
    fn test_equality() {
        assert_eq!(output_of("print nil == nil;"), "true\n");
        assert_eq!(output_of("print 1 == 1; print 1 != 2; print 0.5 == 1;"), "true\ntrue\nfalse\n");

        let (_, message) = runtime_error_of("print 1 == \"1\";");
        assert_eq!(message, "[line 1] Operands must be numbers.");

        let (_, message) = runtime_error_of("print true == true;");
        assert_eq!(message, "[line 1] Operands must be numbers.");

        let (_, message) = runtime_error_of("print nil != 1;");
        assert_eq!(message, "[line 1] Operands must be numbers.");
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(output_of("print nil or \"x\";"), "x\n");
        assert_eq!(output_of("print 0 and 1;"), "0\n");
        assert_eq!(output_of("print 2 and 3;"), "3\n");
        assert_eq!(output_of("print \"a\" or undefined;"), "a\n");
    }

    #[test]
    fn test_value_display() {
        let source = "
            fun f() {}
            class A {}
            print f;
            print clock;
            print A;
            print A();
            print f();
            print true;
        ";

        assert_eq!(
            output_of(source),
            "<fn f>\n<native fn clock>\nA\nA instance\nnil\ntrue\n"
        );
    }

    // ───────────────────────────── variables ─────────────────────────────

    #[test]
    fn test_undefined_variable() {
        let (_, message) = runtime_error_of("print x;");
        assert_eq!(message, "[line 1] Undefined variable 'x'.");

        let (_, message) = runtime_error_of("\n\ny = 1;");
        assert_eq!(message, "[line 3] Undefined variable 'y'.");
    }

    #[test]
    fn test_block_scoping_and_shadowing() {
        let source = "
            var a = \"outer\";
            {
                var a = \"inner\";
                print a;
            }
            print a;
        ";

        assert_eq!(output_of(source), "inner\nouter\n");
    }

    #[test]
    fn test_uninitialized_variable_is_nil() {
        assert_eq!(output_of("var a; print a;"), "nil\n");
    }

    #[test]
    fn test_static_scope_ignores_later_shadowing() {
        let source = "
            var a = \"global\";
            {
                fun showA() { print a; }
                showA();
                var a = \"block\";
                showA();
            }
        ";

        assert_eq!(output_of(source), "global\nglobal\n");
    }

    // ───────────────────────────── control flow ─────────────────────────────

    #[test]
    fn test_while_loop_counts_down_to_zero() {
        assert_eq!(
            output_of("var n = 3; while (n) { print n; n = n - 1; }"),
            "3\n2\n1\n"
        );
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(
            output_of("for (var i = 0; i < 3; i = i + 1) print i;"),
            "0\n1\n2\n"
        );
    }

    #[test]
    fn test_for_loop_variable_is_scoped() {
        let (_, message) = runtime_error_of("for (var i = 0; i < 1; i = i + 1) {} print i;");
        assert_eq!(message, "[line 1] Undefined variable 'i'.");
    }

    // ───────────────────────────── functions ─────────────────────────────

    #[test]
    fn test_recursion() {
        let source = "
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(10);
        ";

        assert_eq!(output_of(source), "55\n");
    }

    #[test]
    fn test_closure_counter() {
        let source = "
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    print i;
                }
                return count;
            }
            var counter = makeCounter();
            counter();
            counter();
        ";

        assert_eq!(output_of(source), "1\n2\n");
    }

    #[test]
    fn test_independent_closures() {
        let source = "
            fun make() {
                var n = 0;
                fun inc() { n = n + 1; return n; }
                return inc;
            }
            var a = make();
            var b = make();
            a(); a();
            print a();
            print b();
        ";

        assert_eq!(output_of(source), "3\n1\n");
    }

    #[test]
    fn test_return_unwinds_loops_and_blocks() {
        let source = "
            fun f() {
                var i = 0;
                while (true) {
                    i = i + 1;
                    if (i == 3) { return i; }
                }
            }
            print f();
        ";

        assert_eq!(output_of(source), "3\n");
    }

    #[test]
    fn test_return_restores_caller_scope() {
        let source = "
            var x = \"outer\";
            fun f() { { var x = \"inner\"; return x; } }
            print f();
            print x;
        ";

        assert_eq!(output_of(source), "inner\nouter\n");
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(output_of("fun f() { 1; } print f();"), "nil\n");
        assert_eq!(output_of("fun f() { return; } print f();"), "nil\n");
    }

    #[test]
    fn test_deep_recursion_completes() {
        let source = "
            fun depth(n) {
                if (n == 0) return 0;
                return 1 + depth(n - 1);
            }
            print depth(1000);
        ";

        assert_eq!(output_of(source), "1000\n");
    }

    #[test]
    fn test_unbounded_recursion_faults() {
        let (output, message) =
            runtime_error_of("print 1;\nfun forever(n) { return forever(n + 1); }\nforever(0);");

        assert_eq!(output, "1\n");
        assert_eq!(message, "[line 2] Stack overflow.");
    }

    #[test]
    fn test_arity_mismatch() {
        let (_, message) = runtime_error_of("fun f(a) {}\nf();");
        assert_eq!(message, "[line 2] Expected 1 arguments but got 0.");

        let (_, message) = runtime_error_of("clock(1);");
        assert_eq!(message, "[line 1] Expected 0 arguments but got 1.");
    }

    #[test]
    fn test_calling_a_non_callable() {
        let (_, message) = runtime_error_of("\"x\"();");
        assert_eq!(message, "[line 1] Can only call functions and classes.");

        let (_, message) = runtime_error_of("var a = 1; a(2);");
        assert_eq!(message, "[line 1] Can only call functions and classes.");
    }

    #[test]
    fn test_every_argument_is_evaluated_in_its_scope() {
        let source = "
            fun sum3(a, b, c) { return a + b + c; }
            {
                var x = 1;
                var y = 2;
                var z = 3;
                print sum3(x, y, z);
            }
        ";

        assert_eq!(output_of(source), "6\n");
    }

    #[test]
    fn test_clock_returns_seconds() {
        assert_eq!(output_of("print clock() > 1000000000;"), "true\n");
    }

    #[test]
    fn test_input_native() {
        let (mut runner, output) = runner_with_input("Ada\r\nLovelace\n");

        runner
            .run("var first = input(\"first? \"); var last = input(\"last? \"); print first + \" \" + last; print input(\"\");")
            .expect("program runs");

        assert_eq!(output.contents(), "first? last? Ada Lovelace\nnil\n");
    }

    // ───────────────────────────── classes ─────────────────────────────

    #[test]
    fn test_fields_and_methods() {
        let source = "
            class Point {
                init(x, y) { this.x = x; this.y = y; }
                sum() { return this.x + this.y; }
            }
            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            print p.sum();
            print p;
        ";

        assert_eq!(output_of(source), "3\n12\nPoint instance\n");
    }

    #[test]
    fn test_fields_shadow_methods() {
        let source = "
            class A { m() { return 1; } }
            var a = A();
            a.m = \"field\";
            print a.m;
        ";

        assert_eq!(output_of(source), "field\n");
    }

    #[test]
    fn test_bound_method_keeps_receiver() {
        let source = "
            class Person {
                init(name) { this.name = name; }
                greet() { print \"hi \" + this.name; }
            }
            var greet = Person(\"ada\").greet;
            greet();
        ";

        assert_eq!(output_of(source), "hi ada\n");
    }

    #[test]
    fn test_initializer_returns_instance() {
        let source = "
            class A {
                init() { this.v = 1; return; }
            }
            var a = A();
            print a.v;
            print a.init();
            class B { init() { return; } }
            print B();
        ";

        assert_eq!(output_of(source), "1\nA instance\nB instance\n");
    }

    #[test]
    fn test_class_arity_follows_init() {
        assert_eq!(output_of("class A {} print A();"), "A instance\n");

        let (_, message) = runtime_error_of("class A { init(a, b) {} } A(1);");
        assert_eq!(message, "[line 1] Expected 2 arguments but got 1.");
    }

    #[test]
    fn test_undefined_property() {
        let (_, message) = runtime_error_of("class A {} A().missing;");
        assert_eq!(message, "[line 1] Undefined property 'missing'.");
    }

    #[test]
    fn test_properties_on_non_instances() {
        let (_, message) = runtime_error_of("var s = \"x\"; print s.len;");
        assert_eq!(message, "[line 1] Only instances have properties.");

        let (_, message) = runtime_error_of("var n = 1; n.x = 2;");
        assert_eq!(message, "[line 1] Only instances have fields.");
    }

    #[test]
    fn test_inherited_methods() {
        let source = "
            class A { hello() { print \"hello from A\"; } }
            class B < A {}
            B().hello();
        ";

        assert_eq!(output_of(source), "hello from A\n");
    }

    #[test]
    fn test_super_resolves_from_defining_class() {
        let source = "
            class A { method() { print \"A method\"; } }
            class B < A {
                method() { print \"B method\"; }
                test() { super.method(); }
            }
            class C < B {}
            C().test();
        ";

        assert_eq!(output_of(source), "A method\n");
    }

    #[test]
    fn test_super_chain() {
        let source = "
            class A { say() { print \"A\"; } }
            class B < A { say() { print \"B\"; super.say(); } }
            class C < B { say() { print \"C\"; super.say(); } }
            C().say();
        ";

        assert_eq!(output_of(source), "C\nB\nA\n");
    }

    #[test]
    fn test_super_init() {
        let source = "
            class Base { init(n) { this.n = n; } }
            class Derived < Base {
                init() { super.init(42); this.extra = 1; }
            }
            var d = Derived();
            print d.n + d.extra;
        ";

        assert_eq!(output_of(source), "43\n");
    }

    #[test]
    fn test_superclass_must_be_a_class() {
        let (_, message) = runtime_error_of("var NotAClass = \"x\";\nclass B < NotAClass {}");
        assert_eq!(message, "[line 2] Superclass must be a class.");
    }

    #[test]
    fn test_undefined_super_method() {
        let (_, message) = runtime_error_of("class A {} class B < A { m() { super.nope(); } } B().m();");
        assert_eq!(message, "[line 1] Undefined property 'nope'.");
    }

    #[test]
    fn test_static_errors_suppress_execution() {
        let (output, result) = run("print 1;\nvar a = a;");

        assert_eq!(output, "");
        assert!(result.is_err());
    }
}
