use wmoc::analyzer::{SymbolKind, Usage};
use wmoc::codegen::Codegen;
use wmoc::error::*;
use wmoc::lexer::TokenKind;
use wmoc::{compile, compile_with, translate, Options};

fn compile_ok(src: &str) -> String {
    match compile(src.as_bytes()) {
        Ok(translation) => translation.code,
        Err(err) => panic!("{src:?} failed: {err}"),
    }
}

fn compile_err(src: &str) -> CompileError {
    match compile(src.as_bytes()) {
        Ok(translation) => panic!("{src:?} compiled:\n{}", translation.code),
        Err(err) => err,
    }
}

fn semantic_err(src: &str) -> SemanticError {
    match compile_err(src) {
        CompileError::Semantic(err) => err,
        err => panic!("expected a semantic error, got {err:?}"),
    }
}

fn syntax_err(src: &str) -> SyntaxError {
    match compile_err(src) {
        CompileError::Syntax(err) => err,
        err => panic!("expected a syntax error, got {err:?}"),
    }
}

#[test]
fn const_var_print_program() {
    let code = compile_ok("const a = 5; var b; begin b := a + 1; printInt b end.");
    assert_eq!(
        code,
        "/* Generated by wmoc. Do not edit. */\n\
         \n\
         #include <stdio.h>\n\
         const long c_a = 5;\n\
         long v_b = 0;\n\
         \n\
         int\n\
         main(void)\n\
         {\n\
         \t{\n\
         \t\tv_b = c_a + 1;\n\
         \t\t(void) printf(\"%ld\\n\", (long) (v_b));\n\
         \t}\n\
         \treturn 0;\n\
         }\n"
    );
}

#[test]
fn procedures_become_functions() {
    let code = compile_ok("var x; procedure inc; x := x + 1; begin call inc; printInt x end.");
    assert_eq!(
        code,
        "/* Generated by wmoc. Do not edit. */\n\
         \n\
         #include <stdio.h>\n\
         long v_x = 0;\n\
         \n\
         void\n\
         p_inc(void)\n\
         {\n\
         \tv_x = v_x + 1;\n\
         }\n\
         \n\
         int\n\
         main(void)\n\
         {\n\
         \t{\n\
         \t\tp_inc();\n\
         \t\t(void) printf(\"%ld\\n\", (long) (v_x));\n\
         \t}\n\
         \treturn 0;\n\
         }\n"
    );
}

#[test]
fn procedure_locals_stay_inside_the_function() {
    let code = compile_ok("procedure p; const k = 3; var t; t := k; call p.");
    assert!(code.contains("p_p(void)\n{\n\tconst long c_k = 3;\n\tlong v_t = 0;\n\tv_t = c_k;\n}\n"));
    assert!(code.contains("\tp_p();\n\treturn 0;\n"));
}

#[test]
fn recursive_call() {
    let code = compile_ok("var n; procedure down; if n > 0 then begin n := n - 1; call down end; begin n := 3; call down end.");
    assert!(code.contains("\tif (v_n > 0)\n\t\t{\n\t\t\tv_n = v_n - 1;\n\t\t\tp_down();\n\t\t}\n"));
}

#[test]
fn conditions_translate() {
    let code = compile_ok("var x; while odd x do x := x - 1.");
    assert!(code.contains("\twhile (((v_x) & 1))\n\t\tv_x = v_x - 1;\n"));

    let code = compile_ok("var x; if x # 1 then x := -x.");
    assert!(code.contains("\tif (v_x != 1)\n\t\tv_x = -v_x;\n"));

    let code = compile_ok("var x; if x = 1 then x := 2.");
    assert!(code.contains("\tif (v_x == 1)\n"));
}

#[test]
fn expression_structure_is_preserved() {
    let code = compile_ok("var x; x := -(1 + 2) * 3 / x.");
    assert!(code.contains("\tv_x = -(1 + 2) * 3 / v_x;\n"));
}

#[test]
fn console_io() {
    let code = compile_ok(
        "var c; begin readChar into c; printChar c; readInt into c; printInt 10 end.",
    );
    assert!(code.contains("\t\tv_c = getchar();\n"));
    assert!(code.contains("\t\t(void) putchar((int) (v_c));\n"));
    assert!(code.contains("\t\tif (scanf(\"%ld\", &v_c) != 1) v_c = 0;\n"));
    assert!(code.contains("\t\t(void) printf(\"%ld\\n\", (long) (10));\n"));
}

#[test]
fn number_separators_do_not_reach_the_output() {
    let code = compile_ok("const big = 1_000_000; printInt big.");
    assert!(code.contains("const long c_big = 1000000;\n"));
}

#[test]
fn numbers_are_written_in_decimal() {
    let code = compile_ok("const a = 010; var x; x := 0_7 + 09.");
    assert!(code.contains("const long c_a = 10;\n"));
    assert!(code.contains("\tv_x = 7 + 9;\n"));
}

#[test]
fn names_cannot_clash_with_c() {
    let code = compile_ok(
        "var long, printf, main, return; begin long := 1; printf := long; main := printf; printInt main end.",
    );
    assert!(code.contains("long v_long = 0;\nlong v_printf = 0;\nlong v_main = 0;\nlong v_return = 0;\n"));
    assert!(code.contains("\t\tv_printf = v_long;\n"));
    assert!(code.contains("(long) (v_main)"));
    assert!(code.contains("\nint\nmain(void)\n"));
}

#[test]
fn same_name_different_kind_gets_distinct_c_names() {
    let code = compile_ok("const a = 1; var a; begin a := 2 end.");
    assert!(code.contains("const long c_a = 1;\nlong v_a = 0;\n"));
    assert!(code.contains("\t\tv_a = 2;\n"));

    let code = compile_ok("procedure p; var p; p := 1; call p.");
    assert!(code.contains("\nvoid\np_p(void)\n{\n\tlong v_p = 0;\n\tv_p = 1;\n}\n"));
    assert!(code.contains("\tp_p();\n"));
}

#[test]
fn empty_statements() {
    let code = compile_ok(".");
    assert!(code.contains("main(void)\n{\n\t;\n\treturn 0;\n}\n"));

    let code = compile_ok("var x; begin x := 1; end.");
    assert!(code.contains("\t\tv_x = 1;\n\t\t;\n\t}\n"));
}

#[test]
fn duplicate_variable() {
    let err = semantic_err("var a, a; begin a := 1 end.");
    assert_eq!(
        err,
        SemanticError::DuplicateSymbol {
            line: 1,
            name: "a".to_string(),
            kind: SymbolKind::Variable
        }
    );
    assert_eq!(err.to_string(), "error on line 1: duplicate symbol: variable a");
}

#[test]
fn duplicate_is_reported_on_its_own_line() {
    let err = semantic_err("const a = 1,\n  b = 2,\n  a = 3;\n.");
    assert_eq!(err.line(), 3);
}

#[test]
fn duplicate_procedures() {
    let err = semantic_err("procedure p; ; procedure p; ; .");
    assert!(matches!(
        err,
        SemanticError::DuplicateSymbol {
            kind: SymbolKind::Procedure,
            ..
        }
    ));
    let err = semantic_err("procedure main; ; .");
    assert!(matches!(err, SemanticError::DuplicateSymbol { .. }));
}

#[test]
fn same_name_different_kind_or_depth() {
    compile_ok("const a = 1; var a; begin a := 2 end.");
    compile_ok("var a; procedure p; var a; a := 1; begin a := 2; call p end.");
}

#[test]
fn undeclared_identifiers() {
    let err = semantic_err("begin call missing end.");
    assert_eq!(
        err,
        SemanticError::UndeclaredIdentifier {
            line: 1,
            name: "missing".to_string()
        }
    );

    for src in [
        "y := 1.",
        "var x; x := y.",
        "var x; if y = x then x := 1.",
        "var x; while odd (x + y) do x := 1.",
        "printInt y.",
        "printChar y.",
        "readInt into y.",
        "readChar into y.",
    ] {
        assert!(
            matches!(semantic_err(src), SemanticError::UndeclaredIdentifier { ref name, .. } if name == "y"),
            "{src}"
        );
    }
}

#[test]
fn locals_die_with_their_block() {
    let err = semantic_err("procedure p;\nvar x;\nx := 1;\nbegin\nx := 2\nend.");
    assert_eq!(
        err,
        SemanticError::UndeclaredIdentifier {
            line: 5,
            name: "x".to_string()
        }
    );
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    compile_ok("var x; procedure p; const x = 7; printInt x; begin x := 1; call p end.");
    let err = semantic_err("var x; procedure p; const x = 7; x := 1; .");
    assert!(matches!(
        err,
        SemanticError::KindMismatch {
            found: SymbolKind::Constant,
            ..
        }
    ));
}

#[test]
fn assignment_target_must_be_a_variable() {
    let err = semantic_err("const c = 1; begin c := 2 end.");
    assert_eq!(
        err,
        SemanticError::KindMismatch {
            line: 1,
            name: "c".to_string(),
            found: SymbolKind::Constant,
            usage: Usage::Assign
        }
    );

    let err = semantic_err("procedure p; ; begin p := 1 end.");
    assert!(matches!(
        err,
        SemanticError::KindMismatch {
            found: SymbolKind::Procedure,
            usage: Usage::Assign,
            ..
        }
    ));

    let err = semantic_err("const c = 1; readInt into c.");
    assert!(matches!(err, SemanticError::KindMismatch { usage: Usage::Assign, .. }));

    compile_ok("var v; begin v := 2 end.");
}

#[test]
fn procedures_are_not_values() {
    let err = semantic_err("var x; procedure p; ; x := p + 1.");
    assert!(matches!(
        err,
        SemanticError::KindMismatch {
            usage: Usage::Value,
            ..
        }
    ));
    let err = semantic_err("procedure p; ; printInt p.");
    assert!(matches!(err, SemanticError::KindMismatch { usage: Usage::Value, .. }));
}

#[test]
fn only_procedures_are_callable() {
    let err = semantic_err("var x; call x.");
    assert_eq!(
        err,
        SemanticError::KindMismatch {
            line: 1,
            name: "x".to_string(),
            found: SymbolKind::Variable,
            usage: Usage::Call
        }
    );
}

const TOO_DEEP: &str = "procedure p;
  procedure q;
    var x;
    begin x := 1 end;
;
.";

#[test]
fn nesting_depth_exceeded() {
    let err = semantic_err(TOO_DEEP);
    assert_eq!(err, SemanticError::NestingTooDeep { line: 3, max: 2 });

    let err = semantic_err("procedure p; procedure q; ; ; .");
    assert!(matches!(err, SemanticError::NestingTooDeep { max: 2, .. }));
}

#[test]
fn nesting_within_the_limit() {
    let options = Options { max_depth: 3 };
    let translation = compile_with(TOO_DEEP.as_bytes(), &options).unwrap();
    assert!(translation.code.contains("\tvoid\n\tp_q(void)\n"));

    let options = Options { max_depth: 1 };
    assert!(matches!(
        compile_with(b"var x; x := 1.", &options),
        Ok(_)
    ));
    assert!(matches!(
        compile_with(b"procedure p; ; .", &options),
        Err(CompileError::Semantic(SemanticError::NestingTooDeep { max: 1, .. }))
    ));
}

#[test]
fn nested_procedure_called_from_outside() {
    let options = Options { max_depth: 3 };
    let src = "procedure p;\n  procedure q; ;\n  call q;\ncall q.";
    let translation = compile_with(src.as_bytes(), &options).unwrap();
    assert_eq!(
        translation.warnings,
        vec![Warning::HiddenProcedure {
            line: 4,
            name: "q".to_string()
        }]
    );
    assert!(translation.code.contains("\tp_q();\n\treturn 0;\n"));

    let translation = compile_with(b"procedure p; procedure q; ; call q; call p.", &options).unwrap();
    assert!(translation.warnings.is_empty());
}

#[test]
fn unterminated_comment() {
    let err = compile_err("{ this never closes");
    assert!(matches!(
        err,
        CompileError::Lex(LexError::UnterminatedComment { line: 1 })
    ));
}

#[test]
fn lexical_errors_abort() {
    assert!(matches!(
        compile_err("var x; x = 1."),
        CompileError::Syntax(SyntaxError {
            expected: Expected::Token(TokenKind::Assign),
            found: TokenKind::Equal,
            ..
        })
    ));
    assert!(matches!(
        compile_err("var x; x :- 1."),
        CompileError::Lex(LexError::MalformedAssignment { .. })
    ));
    assert!(matches!(
        compile_err("var x;\nx := 1 ! 2."),
        CompileError::Lex(LexError::UnexpectedCharacter { line: 2, found: '!' })
    ));
}

#[test]
fn syntax_errors() {
    assert_eq!(
        syntax_err("var x; x := 1"),
        SyntaxError {
            line: 1,
            expected: Expected::Token(TokenKind::Dot),
            found: TokenKind::Eof
        }
    );
    assert_eq!(
        syntax_err("var x; begin x := 1 x := 2 end.").expected,
        Expected::Token(TokenKind::End)
    );
    assert_eq!(
        syntax_err("var x; if x then x := 1.").expected,
        Expected::Relation
    );
    assert_eq!(syntax_err("var x; x := *.").expected, Expected::Factor);
    assert_eq!(syntax_err("printInt (1).").expected, Expected::Operand);
    assert_eq!(
        syntax_err("var x; readInt x.").expected,
        Expected::Token(TokenKind::Into)
    );
    assert_eq!(
        syntax_err("const c := 1; .").expected,
        Expected::Token(TokenKind::Equal)
    );
    assert_eq!(
        syntax_err("procedure p; ; procedure q; .").found,
        TokenKind::Dot
    );
}

#[test]
fn trailing_input_is_only_a_warning() {
    let translation = compile(b"begin end. garbage").unwrap();
    assert_eq!(translation.warnings, vec![Warning::TrailingInput { line: 1 }]);

    let translation = compile(b"begin end.\n\n%").unwrap();
    assert_eq!(translation.warnings, vec![Warning::TrailingInput { line: 3 }]);

    let translation = compile(b"begin end.\n{ done }\n").unwrap();
    assert!(translation.warnings.is_empty());
}

#[test]
fn streaming_output_keeps_what_was_emitted() {
    let mut out = vec![];
    let failed = translate(
        b"var a; begin a := 1; call a end.",
        &Options::default(),
        Codegen::new(&mut out),
    )
    .is_err();
    assert!(failed);

    let partial = String::from_utf8(out).unwrap();
    assert!(partial.contains("long v_a = 0;"));
    assert!(partial.contains("\t\tv_a = 1;\n"));
    assert!(!partial.contains("return 0;"));
}

#[test]
fn independent_compilations() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let src = format!("const k = {i}; printInt k.");
                compile(src.as_bytes()).map(|t| t.code)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let code = handle.join().unwrap().unwrap();
        assert!(code.contains(&format!("const long c_k = {i};")));
    }
}
