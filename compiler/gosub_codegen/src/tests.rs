use super::*;
use gosub_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

const PREAMBLE: &str = "#include <stdio.h>\n#include \"runt.h\"\n";

fn options() -> Options {
    Options::new().with_skip_builtin(true)
}

fn compile_with(source: &str, loader: MemoryLoader) -> Result<String, CompileError> {
    compile_with_loader(source, &options(), Box::new(loader))
}

/// Output after the preamble.
fn compile(source: &str) -> String {
    match compile_with(source, MemoryLoader::new()) {
        Ok(out) => match out.strip_prefix(PREAMBLE) {
            Some(rest) => rest.to_owned(),
            None => panic!("missing preamble in:\n{out}"),
        },
        Err(err) => panic!("compile failed: {err} ({})", err.code()),
    }
}

fn compile_err(source: &str) -> CompileError {
    match compile_with(source, MemoryLoader::new()) {
        Ok(out) => panic!("expected an error, got:\n{out}"),
        Err(err) => err,
    }
}

/// Drops preprocessor lines, `//` comments and all whitespace.
fn normalize(c: &str) -> String {
    c.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|line| line.split("//").next().unwrap_or(""))
        .flat_map(str::chars)
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

fn assert_c_eq(source: &str, expected: &str) {
    match compile_with(source, MemoryLoader::new()) {
        Ok(out) => assert_eq!(normalize(&out), normalize(expected)),
        Err(err) => panic!("compile failed: {err} ({})", err.code()),
    }
}

fn assert_lines(out: &str, expected: &[&str]) {
    let lines: Vec<&str> = out.lines().collect();
    let Some(start) = lines.iter().position(|l| *l == expected[0]) else {
        panic!("`{}` not found in:\n{out}", expected[0]);
    };
    let found = &lines[start..(start + expected.len()).min(lines.len())];
    assert_eq!(found, expected);
}

// Globals

#[test]
fn test_global_var() {
    assert_c_eq("package main\nvar foo int\n", "P_int main__foo;");
    assert_eq!(compile("package main\nvar foo int\n"), "P_int main__foo;\n");
}

#[test]
fn test_struct_and_interface_typedefs() {
    assert_c_eq(
        "package main\ntype Apple struct { Worm int }\n",
        "typedef Struct main__Apple;",
    );
    assert_c_eq(
        "package main\ntype Frobber interface { Frob() string }\n",
        "typedef Interface main__Frobber;",
    );
}

#[test]
fn test_const_emits_nothing() {
    assert_eq!(compile("package main\nconst foo = 123\n"), "");
}

#[test]
fn test_var_initializers_make_init_routine() {
    let out = compile("package main\nvar limit = 10\nvar name string = \"gosub\"\n");
    assert_eq!(
        out,
        "P_int main__limit;\n\
         P_string main__name;\n\
         void main__INIT(void) {\n\
         main__limit = (P_int)((P_int)(10));\n\
         main__name = (P_string)(MakeStringFromC(\"gosub\"));\n\
         }\n"
    );
}

#[test]
fn test_declaration_order_does_not_matter() {
    let out = compile(
        "package main\nvar head *Node\ntype Node struct {\n  Next *Node\n  Val int\n}\n",
    );
    assert_eq!(out, "typedef Struct main__Node;\nPointer main__head;\n");
}

#[test]
fn test_const_used_in_function() {
    let out = compile("package main\nconst limit = 3\nfunc f() int {\n  return limit\n}\n");
    assert_lines(&out, &["P_int main__f() {", "return (P_int)(3);", "}"]);
}

// Functions

#[test]
fn test_function_with_one_result() {
    let out = compile("package main\nfunc add(a int, b int) int {\n  return a + b\n}\n");
    assert_eq!(
        out,
        "extern P_int main__add(P_int in_a, P_int in_b);\n\
         P_int main__add(P_int in_a, P_int in_b) {\n\
         return (in_a + in_b);\n\
         }\n"
    );
}

#[test]
fn test_native_function() {
    assert_c_eq(
        "package main\nfunc puts(s string)\n",
        "extern void main__puts(P_string in_s);\nvoid main__puts(P_string in_s);",
    );
}

#[test]
fn test_multiple_results() {
    let out = compile(
        r#"package main
func pair() (int, string) {
  return 1, "x"
}
func use() {
  a, b := pair()
  a = a + 1
}
"#,
    );
    assert_lines(
        &out,
        &[
            "void main__pair(P_int *out__0, P_string *out__1) {",
            "*out__0 = (P_int)(1);",
            "*out__1 = MakeStringFromC(\"x\");",
            "return;",
            "}",
        ],
    );
    assert_lines(
        &out,
        &[
            "void main__use() {",
            "P_int _multi_1_0 = 0;",
            "P_string _multi_1_1 = {0, 0, 0};",
            "P_int v_a = 0;",
            "P_string v_b = {0, 0, 0};",
            "main__pair(&_multi_1_0, &_multi_1_1);",
            "v_a = (P_int)(_multi_1_0);",
            "v_b = (P_string)(_multi_1_1);",
            "v_a = (P_int)((v_a + 1));",
            "}",
        ],
    );
}

#[test]
fn test_named_result() {
    let out = compile("package main\nfunc f() (n int) {\n  n = 4\n  return\n}\n");
    assert_lines(
        &out,
        &[
            "P_int main__f() {",
            "P_int v_n = 0;",
            "v_n = (P_int)((P_int)(4));",
            "return v_n;",
            "}",
        ],
    );
}

#[test]
fn test_named_results_through_pointers() {
    let out = compile("package main\nfunc f() (q int, r int) {\n  q = 1\n  return\n}\n");
    assert_lines(
        &out,
        &[
            "void main__f(P_int *out_q, P_int *out_r) {",
            "(*out_q) = (P_int)((P_int)(1));",
            "return;",
            "}",
        ],
    );
}

#[test]
fn test_multi_assign_count_mismatch() {
    let err = compile_err(
        "package main\nfunc pair() (int, int)\nfunc f() {\n  a, b, c := pair()\n}\n",
    );
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(err.to_string(), "expected call with 3 results, but got 2");
}

#[test]
fn test_variadic_call() {
    let out = compile(
        "package main\nfunc log(parts ...string)\nfunc f() {\n  log()\n  log(\"a\")\n}\n",
    );
    assert_lines(
        &out,
        &[
            "void main__f() {",
            "Slice _tmp_1 = {0, 0, 0};",
            "Slice _tmp_2 = {0, 0, 0};",
            "P_string _tmp_3 = {0, 0, 0};",
            "_tmp_1 = NilSlice;",
            "main__log(_tmp_1);",
            "_tmp_2 = NilSlice;",
            "_tmp_3 = MakeStringFromC(\"a\");",
            "_tmp_2 = SliceAppend(_tmp_2, &_tmp_3, sizeof(_tmp_3), 1);",
            "main__log(_tmp_2);",
            "}",
        ],
    );
}

#[test]
fn test_spread_passes_slice_through() {
    let out = compile(
        "package main\nfunc log(parts ...string)\nfunc f(xs []string) {\n  log(xs...)\n}\n",
    );
    assert_lines(&out, &["void main__f(Slice in_xs) {", "main__log(in_xs);", "}"]);
}

#[test]
fn test_argument_count() {
    let err = compile_err("package main\nfunc g(a int)\nfunc f() {\n  g()\n}\n");
    assert_eq!(err.code(), ErrorCode::E2004);
    assert_eq!(err.to_string(), "got 0 args for func call, wanted 1 args");

    let err =
        compile_err("package main\nfunc g(a int, rest ...int)\nfunc f() {\n  g()\n}\n");
    assert_eq!(
        err.to_string(),
        "got 0 args for func call, wanted at least 1 args"
    );
}

#[test]
fn test_argument_type_mismatch() {
    let err = compile_err("package main\nfunc g(s string)\nfunc f() {\n  g(1)\n}\n");
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_return_count() {
    let err = compile_err("package main\nfunc f() int {\n  return 1, 2\n}\n");
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(err.to_string(), "Got 2 return values, but needs 1");
}

// Structs and methods

#[test]
fn test_methods_and_constructor() {
    let out = compile(
        r"package main
type Apple struct { Worm int }
func (a *Apple) Eat(n int) int {
  return a.Worm + n
}
func main() {
  p := &Apple{Worm: 3}
  p.Eat(2)
}
",
    );
    assert_lines(
        &out,
        &[
            "typedef Struct main__Apple;",
            "extern void main__main();",
            "extern P_int main__Apple__Eat(Pointer in_a, P_int in_n);",
        ],
    );
    assert_lines(
        &out,
        &[
            "void main__main() {",
            "Pointer _tmp_1 = (void*)0;",
            "Pointer v_p = (void*)0;",
            "_tmp_1 = oalloc(sizeof(struct main__Apple), CLASS_main__Apple);",
            "(_tmp_1).Worm = (P_int)(3);",
            "v_p = (Pointer)(_tmp_1);",
            "main__Apple__Eat(v_p, (P_int)(2));",
            "}",
        ],
    );
    assert_lines(
        &out,
        &[
            "P_int main__Apple__Eat(Pointer in_a, P_int in_n) {",
            "return ((in_a).Worm + in_n);",
            "}",
        ],
    );
}

#[test]
fn test_pointer_to_interface() {
    let out = compile(
        r"package main
type Frobber interface { Frob() int }
type Apple struct { Worm int }
var f Frobber
func set(p *Apple) {
  f = p
}
",
    );
    assert_lines(
        &out,
        &[
            "void main__set(Pointer in_p) {",
            "main__f = (Interface)(HandleToInterface(in_p));",
            "}",
        ],
    );
}

#[test]
fn test_interface_method_call() {
    let out = compile(
        r"package main
type Frobber interface { Frob(n int) int }
func f(x Frobber) int {
  return x.Frob(1)
}
",
    );
    assert_lines(&out, &["return I_Frob(in_x, (P_int)(1));"]);
}

#[test]
fn test_receiver_must_point_to_local_struct() {
    let err = compile_err("package main\ntype T int\nfunc (t *T) M() {}\n");
    assert_eq!(err.code(), ErrorCode::E2010);

    let err = compile_err("package main\ntype S struct { A int }\nfunc (s S) M() {}\n");
    assert_eq!(err.code(), ErrorCode::E2010);
}

#[test]
fn test_duplicate_method() {
    let err = compile_err(
        "package main\ntype S struct { A int }\nfunc (s *S) M() {}\nfunc (s *S) M() {}\n",
    );
    assert_eq!(err.code(), ErrorCode::E2006);
}

#[test]
fn test_method_named_like_field() {
    let out = compile(
        "package main\ntype S struct { A int }\nfunc (s *S) A() int {\n  return 1\n}\nfunc f(s *S) int {\n  return s.A\n}\n",
    );
    assert!(out.contains("P_int main__S__A(Pointer in_s)"), "{out}");
    assert_lines(&out, &["P_int main__f(Pointer in_s) {", "return (in_s).A;", "}"]);
}

#[test]
fn test_unknown_field() {
    let err = compile_err(
        "package main\ntype S struct { A int }\nfunc f(s *S) int {\n  return s.B\n}\n",
    );
    assert_eq!(err.code(), ErrorCode::E2007);
}

// Statements

#[test]
fn test_while_with_break() {
    let out = compile(
        r"package main
func count(n int) int {
  total := 0
  for total < n {
    if total == 5 {
      break
    }
    total += 1
  }
  return total
}
",
    );
    assert_lines(
        &out,
        &[
            "P_int main__count(P_int in_n) {",
            "P_int v_total = 0;",
            "v_total = (P_int)((P_int)(0));",
            "while(1) {",
            "t_bool _while_ = (t_bool)((v_total < in_n));",
            "if (!_while_) break;",
            "{ t_bool _if_ = (v_total == 5);",
            "if( _if_ ) {",
            "goto Break_1;",
            "}}",
            "(v_total) += (1);",
            "Cont_1: {}",
            "}",
            "Break_1: {}",
            "return v_total;",
            "}",
        ],
    );
}

#[test]
fn test_break_outside_loop() {
    let err = compile_err("package main\nfunc f() {\n  break\n}\n");
    assert_eq!(err.code(), ErrorCode::E2011);
    assert_eq!(err.to_string(), "cannot break from here");
}

#[test]
fn test_three_clause_for() {
    let out = compile(
        r"package main
func sum(n int) int {
  s := 0
  for i := 0; i < n; i++ {
    if i == 3 {
      continue
    }
    s += i
  }
  return s
}
",
    );
    assert_lines(
        &out,
        &[
            "P_int main__sum(P_int in_n) {",
            "P_int v_s = 0;",
            "P_int v_i = 0;",
            "v_s = (P_int)((P_int)(0));",
            "v_i = (P_int)((P_int)(0));",
            "while(1) {",
            "t_bool _while_ = (t_bool)((v_i < in_n));",
            "if (!_while_) break;",
            "{ t_bool _if_ = (v_i == 3);",
            "if( _if_ ) {",
            "goto Cont_1;",
            "}}",
            "(v_s) += (v_i);",
            "Cont_1: {}",
            "(v_i)++;",
            "}",
            "Break_1: {}",
            "return v_s;",
            "}",
        ],
    );
}

#[test]
fn test_for_clauses_may_be_empty() {
    let out = compile("package main\nfunc f() {\n  for ; ; {\n    break\n  }\n}\n");
    assert_lines(
        &out,
        &["while(1) {", "goto Break_1;", "Cont_1: {}", "}", "Break_1: {}"],
    );
}

#[test]
fn test_for_init_is_scoped_to_loop() {
    let err = compile_err(
        "package main\nfunc f() int {\n  for i := 0; i < 3; i++ {\n  }\n  return i\n}\n",
    );
    assert_eq!(err.code(), ErrorCode::E2003);
}

#[test]
fn test_range_over_slice() {
    let out = compile(
        r"package main
func total(xs []int) int {
  t := 0
  for i, x := range xs {
    t += x * i
  }
  return t
}
",
    );
    assert_lines(
        &out,
        &[
            "P_int main__total(Slice in_xs) {",
            "P_int v_t = 0;",
            "Slice _tmp_2 = {0, 0, 0};",
            "P_int _tmp_3 = 0;",
            "P_int _tmp_4 = 0;",
            "P_int v_i = 0;",
            "P_int v_x = 0;",
            "v_t = (P_int)((P_int)(0));",
            "_tmp_2 = in_xs;",
            "_tmp_3 = -1;",
            "_tmp_4 = ((_tmp_2).len / sizeof(P_int));",
            "while(1) { Cont_1: {}",
            "_tmp_3++;",
            "if (_tmp_3 >= _tmp_4) break;",
            "v_i = _tmp_3;",
            "SliceGet(_tmp_2, sizeof(P_int), _tmp_3, &v_x);",
            "(v_t) += ((v_x * v_i));",
            "}",
            "Break_1: {}",
            "return v_t;",
            "}",
        ],
    );
}

#[test]
fn test_range_over_string_bytes() {
    let out = compile(
        r"package main
func count(s string) int {
  n := 0
  for _, c := range s {
    if c == 'a' {
      n++
    }
  }
  return n
}
",
    );
    assert!(out.contains("P_byte v_c = 0;"), "{out}");
    assert!(!out.contains("v__"), "{out}");
    assert_lines(
        &out,
        &[
            "_tmp_2 = in_s;",
            "_tmp_3 = -1;",
            "_tmp_4 = (_tmp_2).len;",
            "while(1) { Cont_1: {}",
            "_tmp_3++;",
            "if (_tmp_3 >= _tmp_4) break;",
            "StringGet(_tmp_2, _tmp_3, &v_c);",
            "{ t_bool _if_ = (v_c == 97);",
        ],
    );
}

#[test]
fn test_range_without_names() {
    let out = compile("package main\nfunc f(xs []int) {\n  for range xs {\n  }\n}\n");
    assert!(!out.contains("SliceGet"), "{out}");
    assert!(out.contains("if (_tmp_3 >= _tmp_4) break;"), "{out}");
}

#[test]
fn test_range_over_int() {
    let err = compile_err("package main\nfunc f(n int) {\n  for i := range n {\n  }\n}\n");
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_sub_slice() {
    let out = compile("package main\nfunc tail(xs []int, n int) []int {\n  return xs[1:n]\n}\n");
    assert_lines(
        &out,
        &[
            "Slice main__tail(Slice in_xs, P_int in_n) {",
            "Slice _tmp_1 = {0, 0, 0};",
            "P_int _tmp_2 = 0;",
            "P_int _tmp_3 = 0;",
            "_tmp_1 = in_xs;",
            "_tmp_2 = (P_int)(1);",
            "_tmp_3 = in_n;",
            "assert(0 <= (_tmp_2 * sizeof(P_int)) && (_tmp_2 * sizeof(P_int)) <= \
             (_tmp_3 * sizeof(P_int)) && (_tmp_3 * sizeof(P_int)) <= (_tmp_1).len);",
            "(_tmp_1).offset += (_tmp_2 * sizeof(P_int));",
            "(_tmp_1).len = (_tmp_3 * sizeof(P_int)) - (_tmp_2 * sizeof(P_int));",
            "return _tmp_1;",
            "}",
        ],
    );
}

#[test]
fn test_string_prefix_and_suffix() {
    let out = compile("package main\nfunc f(s string) string {\n  return s[:2]\n}\n");
    assert_lines(
        &out,
        &[
            "_tmp_1 = in_s;",
            "_tmp_2 = (P_int)(2);",
            "assert(0 <= 0 && 0 <= _tmp_2 && _tmp_2 <= (_tmp_1).len);",
            "(_tmp_1).len = _tmp_2;",
            "return _tmp_1;",
        ],
    );

    let out = compile("package main\nfunc f(s string) string {\n  return s[3:]\n}\n");
    assert_lines(
        &out,
        &[
            "_tmp_2 = (P_int)(3);",
            "assert(0 <= _tmp_2 && _tmp_2 <= (_tmp_1).len && (_tmp_1).len <= (_tmp_1).len);",
            "(_tmp_1).offset += _tmp_2;",
            "(_tmp_1).len = (_tmp_1).len - _tmp_2;",
        ],
    );
}

#[test]
fn test_sub_slice_errors() {
    let err = compile_err("package main\nfunc f(n int) int {\n  return n[1:2]\n}\n");
    assert_eq!(err.code(), ErrorCode::E2001);

    let err = compile_err("package main\nfunc f(s string) string {\n  return s[\"a\":]\n}\n");
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_append_and_len() {
    let out = compile(
        "package main\nfunc grow(xs []int) int {\n  ys := append(xs, 4)\n  return len(ys)\n}\n",
    );
    assert_lines(
        &out,
        &[
            "P_int main__grow(Slice in_xs) {",
            "Slice _tmp_1 = {0, 0, 0};",
            "P_int _tmp_2 = 0;",
            "Slice v_ys = {0, 0, 0};",
            "_tmp_1 = in_xs;",
            "_tmp_2 = (P_int)(4);",
            "_tmp_1 = SliceAppend(_tmp_1, &_tmp_2, sizeof(_tmp_2), 1);",
            "v_ys = (Slice)(_tmp_1);",
            "return ((v_ys).len / sizeof(P_int));",
            "}",
        ],
    );
}

#[test]
fn test_len_of_string() {
    let out = compile("package main\nfunc f(s string) int {\n  return len(s)\n}\n");
    assert_lines(&out, &["return (in_s).len;"]);
}

#[test]
fn test_append_spread() {
    let out = compile(
        "package main\nfunc f(xs []byte, zs []byte) []byte {\n  return append(xs, zs...)\n}\n",
    );
    assert_lines(
        &out,
        &[
            "_tmp_1 = in_xs;",
            "_tmp_2 = in_zs;",
            "{ P_int _n_ = ((_tmp_2).len / sizeof(P_byte));",
            "for (P_int _i_ = 0; _i_ < _n_; _i_++) {",
            "SliceGet(_tmp_2, sizeof(_tmp_3), _i_, &_tmp_3);",
            "_tmp_1 = SliceAppend(_tmp_1, &_tmp_3, sizeof(_tmp_3), 1);",
            "}}",
            "return _tmp_1;",
        ],
    );
}

#[test]
fn test_intrinsic_errors() {
    let cases = [
        ("len(3)", ErrorCode::E2001),
        ("len(xs, xs)", ErrorCode::E2004),
        ("len(xs...)", ErrorCode::E2004),
        ("append(3, 4)", ErrorCode::E2001),
        ("append(xs, \"s\")", ErrorCode::E2001),
        ("append(xs, 1, xs...)", ErrorCode::E2004),
        ("append()", ErrorCode::E2004),
    ];
    for (call, code) in cases {
        let err = compile_err(&format!(
            "package main\nfunc f(xs []int) {{\n  _ = {call}\n}}\n"
        ));
        assert_eq!(err.code(), code, "{call}");
    }
}

#[test]
fn test_module_function_shadows_intrinsic() {
    let out = compile("package main\nfunc len(x int) int\nfunc f() int {\n  return len(3)\n}\n");
    assert_lines(&out, &["return main__len((P_int)(3));"]);
}

#[test]
fn test_switch() {
    let out = compile(
        r"package main
func pick(n int) int {
  switch n {
  case 1, 2:
    return 10
  default:
    return 0
  }
  return 1
}
",
    );
    assert_lines(
        &out,
        &[
            "{ t_int _switch_ = in_n;",
            "if (",
            "_switch_ == 1 ||",
            "_switch_ == 2 ||",
            "0 ) {",
            "return (P_int)(10);",
            "} else ",
            "{",
            "return (P_int)(0);",
            "}",
            "}",
            "return (P_int)(1);",
        ],
    );
}

#[test]
fn test_if_else() {
    let out = compile(
        "package main\nfunc f(b bool) int {\n  if b {\n    return 1\n  } else {\n    return 2\n  }\n  return 3\n}\n",
    );
    assert_lines(
        &out,
        &[
            "{ t_bool _if_ = in_b;",
            "if( _if_ ) {",
            "return (P_int)(1);",
            "} else {",
            "return (P_int)(2);",
            "}}",
        ],
    );
}

#[test]
fn test_shadowing_gets_fresh_c_name() {
    let out = compile(
        "package main\nfunc f() {\n  x := 1\n  {\n    x := \"s\"\n    x = \"t\"\n  }\n  x++\n}\n",
    );
    assert_lines(
        &out,
        &[
            "void main__f() {",
            "P_int v_x = 0;",
            "P_string v_x_1 = {0, 0, 0};",
            "v_x = (P_int)((P_int)(1));",
            "{",
            "v_x_1 = (P_string)(MakeStringFromC(\"s\"));",
            "v_x_1 = (P_string)(MakeStringFromC(\"t\"));",
            "}",
            "(v_x)++;",
            "}",
        ],
    );
}

#[test]
fn test_lone_expression_must_be_call() {
    let err = compile_err("package main\nfunc f(x int) {\n  x\n}\n");
    assert_eq!(err.code(), ErrorCode::E2011);
    assert_eq!(err.to_string(), "Lone expr is not a function call");
}

#[test]
fn test_assign_count_mismatch() {
    let err = compile_err("package main\nfunc f() {\n  a, b := 1, 2, 3\n}\n");
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(
        err.to_string(),
        "wrong number of values in assign: left has 2, right has 3"
    );
}

#[test]
fn test_interface_to_interface_assignment() {
    let decls = "package main\ntype Frobber interface { Frob() string }\n\
                 type Closer interface { Close() int }\nvar f Frobber\nvar c Closer\n\
                 var e interface{}\n";

    let err = compile_err(&format!("{decls}func g() {{\n  f = c\n}}\n"));
    assert_eq!(err.code(), ErrorCode::E2001);

    let out = compile(&format!("{decls}func g() {{\n  e = c\n}}\n"));
    assert!(out.contains("main__e = (Interface)(main__c);"), "{out}");
}

#[test]
fn test_cannot_assign_to_function() {
    let err = compile_err("package main\nfunc g()\nfunc f() {\n  g = g\n}\n");
    assert_eq!(err.code(), ErrorCode::E2013);
}

#[test]
fn test_define_untyped_nil() {
    let err = compile_err("package main\nfunc f() {\n  x := nil\n}\n");
    assert_eq!(err.code(), ErrorCode::E2011);
}

#[test]
fn test_subscript_and_conversion() {
    let out = compile(
        "package main\nfunc f(s string, xs []int) int {\n  b := byte(s[0])\n  return xs[1] + int(b)\n}\n",
    );
    assert_lines(
        &out,
        &[
            "P_int main__f(P_string in_s, Slice in_xs) {",
            "P_byte v_b = 0;",
            "v_b = (P_byte)((in_s)[(0)]);",
            "return ((in_xs)[(1)] + (P_int)(v_b));",
            "}",
        ],
    );
}

#[test]
fn test_function_typed_var() {
    let out = compile("package main\nfunc g(n int) bool\nvar hook = g\n");
    assert_eq!(
        out,
        "typedef P_bool (*funk_1)(P_int in_n);\n\
         funk_1 main__hook;\n\
         extern P_bool main__g(P_int in_n);\n\
         void main__INIT(void) {\n\
         main__hook = (funk_1)(main__g);\n\
         }\n\
         P_bool main__g(P_int in_n); //NATIVE\n"
    );
}

// Errors

#[test]
fn test_redefined_global() {
    let err = compile_err("package main\nvar x int\nfunc x() {}\n");
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(err.to_string(), "redefined global name: x");
    let CompileErrorKind::Redefined { previous, .. } = err.kind else {
        panic!("expected redefinition, got {:?}", err.kind);
    };
    assert!(previous.start < err.span.start);
}

#[test]
fn test_redefinition_of_every_kind() {
    let cases = [
        ("type/type", "type T int\ntype T string\n"),
        ("const/var", "const x = 1\nvar x int\n"),
        ("import/func", "import \"util\"\nfunc util() {}\n"),
        ("func/func", "func f() {}\nfunc f() {}\n"),
        ("type/const", "type T int\nconst T = 2\n"),
    ];
    for (what, decls) in cases {
        let err = compile_err(&format!("package main\n{decls}"));
        assert_eq!(err.code(), ErrorCode::E2006, "{what}");
        assert!(
            matches!(err.kind, CompileErrorKind::Redefined { .. }),
            "{what}: {:?}",
            err.kind
        );
    }
}

#[test]
fn test_unknown_identifier() {
    let err = compile_err("package main\nvar x = y\n");
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.module, "main");
}

#[test]
fn test_typed_const() {
    let err = compile_err("package main\nconst x int = 1\n");
    assert_eq!(err.code(), ErrorCode::E2012);
}

#[test]
fn test_recursive_type() {
    let err = compile_err("package main\ntype A B\ntype B A\n");
    assert_eq!(err.code(), ErrorCode::E2008);
}

#[test]
fn test_parse_error_is_reported() {
    let err = compile_err("package main\nfunc f( {\n");
    assert!(matches!(err.kind, CompileErrorKind::Parse(_)));
}

// Modules

#[test]
fn test_import_and_qualified_access() {
    let loader = MemoryLoader::new().with_module("util", "package util\nvar Count int\n");
    let out = match compile_with(
        "package main\nimport \"util\"\nfunc f() {\n  util.Count = 3\n}\n",
        loader,
    ) {
        Ok(out) => out,
        Err(err) => panic!("compile failed: {err}"),
    };
    assert_eq!(out.matches("P_int util__Count;").count(), 1);
    assert_lines(
        &out,
        &["void main__f() {", "util__Count = (P_int)((P_int)(3));", "}"],
    );
    assert!(out.find("util__Count;") < out.find("main__f"));
}

#[test]
fn test_modules_load_once() {
    let loader = MemoryLoader::new()
        .with_module("a", "package a\nimport \"b\"\nvar X int\n")
        .with_module("b", "package b\nimport \"a\"\nvar Y int\n");
    let mut gen = Generator::new(Box::new(loader));
    let Ok(a) = gen.load_module("a") else {
        panic!("failed to load a");
    };
    let Ok(again) = gen.load_module("a") else {
        panic!("failed to reload a");
    };
    assert_eq!(a, again);

    let Some(b) = gen.find_module("b") else {
        panic!("b was not loaded");
    };
    assert_eq!(gen.modules_in_order(), &[b, a]);
    assert_eq!(gen.output().matches("P_int a__X;").count(), 1);
    assert_eq!(gen.module(a).globals().len(), 2);
}

fn load_cycle(b_source: &str) -> CompileError {
    let loader = MemoryLoader::new()
        .with_module("a", "package a\nimport \"b\"\ntype N int\n")
        .with_module("b", b_source);
    let mut gen = Generator::new(Box::new(loader));
    match gen.load_module("a") {
        Ok(_) => panic!("expected an error:\n{}", gen.output()),
        Err(err) => err,
    }
}

#[test]
fn test_cycle_var_of_unbuilt_type() {
    let err = load_cycle("package b\nimport \"a\"\nvar X a.N\n");
    assert_eq!(err.code(), ErrorCode::E2008);
    assert_eq!(err.module, "b");
    assert_eq!(err.kind, CompileErrorKind::NotYetResolved("N".to_owned()));
}

#[test]
fn test_cycle_signature_of_unbuilt_type() {
    let err = load_cycle("package b\nimport \"a\"\nfunc F(n a.N) {}\n");
    assert_eq!(err.code(), ErrorCode::E2008);
    assert_eq!(err.module, "b");
}

#[test]
fn test_built_foreign_type_is_usable() {
    let loader = MemoryLoader::new().with_module("a", "package a\ntype N int\n");
    let out = match compile_with("package main\nimport \"a\"\nvar X a.N\n", loader) {
        Ok(out) => out,
        Err(err) => panic!("compile failed: {err}"),
    };
    assert!(out.contains("P_int main__X;"), "{out}");
}

#[test]
fn test_missing_module() {
    let err = compile_err("package main\nimport \"nope\"\n");
    assert_eq!(err.code(), ErrorCode::E3001);
}

#[test]
fn test_builtin_names_are_visible() {
    let loader =
        MemoryLoader::new().with_module("builtin", "package builtin\nfunc println(s string)\n");
    let out = match compile_with_loader(
        "package main\nfunc main() {\n  println(\"hi\")\n}\n",
        &Options::new(),
        Box::new(loader),
    ) {
        Ok(out) => out,
        Err(err) => panic!("compile failed: {err}"),
    };
    assert!(out.contains("void builtin__println(P_string in_s); //NATIVE"));
    assert_lines(
        &out,
        &[
            "void main__main() {",
            "builtin__println(MakeStringFromC(\"hi\"));",
            "}",
        ],
    );
}

#[test]
fn test_shipped_prelude() {
    let lib = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../lib");
    let options = Options::new().with_lib_dir(lib);
    let source = "package main\nfunc main() {\n  println(concat(\"n=\", itoa(len(\"abc\"))))\n}\n";
    let out = match compile_to_c(source, &options) {
        Ok(out) => out,
        Err(err) => panic!("compile failed: {err}"),
    };
    assert!(out.contains("void builtin__println(P_string in_s); //NATIVE"), "{out}");
    assert!(out.contains("builtin__itoa((MakeStringFromC(\"abc\")).len)"), "{out}");
    assert!(!out.contains("builtin__len"), "{out}");
}

#[test]
fn test_compile_to_c_reads_lib_dir() {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("no temp dir");
    };
    let path = dir.path().join("builtin.go");
    if let Err(err) = std::fs::write(&path, "package builtin\nvar Version = 1\n") {
        panic!("write failed: {err}");
    }

    let options = Options::new().with_lib_dir(dir.path());
    let out = match compile_to_c("package main\nvar v = Version\n", &options) {
        Ok(out) => out,
        Err(err) => panic!("compile failed: {err}"),
    };
    assert!(out.contains("void builtin__INIT(void) {"));
    assert!(out.contains("main__v = (P_int)(builtin__Version);"));
}
