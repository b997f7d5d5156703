//! End-to-end pipeline tests.
//!
//! Each scenario feeds a complete source program through all four stages
//! and asserts either on the emitted IR or on the diagnostic.

use oinkc_drv::compile;
use oinkc_util::ErrorKind;

#[test]
fn test_basic_arithmetic_and_return() {
    let ir = compile("# 😀 🐷 🐖x🐖 @ 2 ❤️ 3 #\n# ... 🐖x🐖 ... #").unwrap();
    assert!(ir.contains("declare i32 @printf(i8*, ...)"));
    assert!(ir.contains("define i32 @main() {"));
    assert!(ir.contains("  %_temp_0 = add i16 2, 3"));
    assert!(ir.contains("  call void @printResult(i32 %x)"));
    assert!(ir.contains("  ret i32 %x"));
}

#[test]
fn test_mood_line_inversion() {
    let ir = compile("#~ 😀 🐷 🐖x🐖 @ 10 ❤️ 5 ~#\n# ... 🐖x🐖 ... #").unwrap();
    // 10 ❤️ 5 on a mood line computes 10 - 5
    assert!(ir.contains("  %_temp_0 = sub i16 10, 5"));
}

#[test]
fn test_branching() {
    let source = "\
# 😀 🐷 🐖x🐖 @ 7 #
# SAVE 🐖x🐖 > 5 #
# 🐖🐖🐖 #
# 🐖x🐖 @ 100 #
# 🐖🐖🐖 #
# ... 🐖x🐖 ... #";
    let ir = compile(source).unwrap();
    assert!(ir.contains("  br i1 %_temp_1, label %then_0, label %end_0"));
    // the branch result is observable after the merge through a phi
    assert!(ir.contains("  %x.2 = phi i32 [ %x.1, %then_0 ], [ %x, %entry ]"));
    assert!(ir.contains("  ret i32 %x.2"));
}

#[test]
fn test_while_loop() {
    let source = "\
# 😀 🐷 🐖c🐖 @ 0 #
# OINK 🐖c🐖 < 3 #
# 🐖🐖🐖 #
# 🐖c🐖 @ 🐖c🐖 ❤️ 1 #
# 🐖🐖🐖 #
# ... 🐖c🐖 ... #";
    let ir = compile(source).unwrap();
    assert!(ir.contains("while_cond_0:"));
    assert!(ir.contains("  %c.1 = phi i32 [ %c, %entry ], [ %c.2, %while_body_0 ]"));
    assert!(ir.contains("  br i1 %_temp_1, label %while_body_0, label %while_end_0"));
    assert!(ir.contains("  ret i32 %c.1"));
}

#[test]
fn test_immutable_reassignment_rejected() {
    let err = compile("# 😭 🐷 🐖k🐖 @ 1 #\n# 🐖k🐖 @ 2 #\n# ... 🐖k🐖 ... #").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImmutableAssignment);
    assert_eq!(err.line, 2);
}

#[test]
fn test_non_bool_condition_rejected() {
    let source = "\
# 😀 🐷 🐖x🐖 @ 1 #
# SAVE 🐖x🐖 #
# 🐖🐖🐖 #
# 🐖🐖🐖 #
# ... 🐖x🐖 ... #";
    let err = compile(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert!(err.message.contains("condition must be bool"));
}

#[test]
fn test_unknown_glyph_rejected() {
    let err = compile("# 😀 🐷 🐖x🐖 @ 10 $ #\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
    assert_eq!(err.line, 1);
    assert!(err.message.contains('$'));
}

#[test]
fn test_compilation_is_deterministic() {
    let source = "\
# 😀 🐷 🐖x🐖 @ 7 #
# SAVE 🐖x🐖 > 5 #
# 🐖🐖🐖 #
# 🐖x🐖 @ 100 #
# 🐖🐖🐖 #
# OINK 🐖x🐖 > 95 #
# 🐖🐖🐖 #
# 🐖x🐖 @ 🐖x🐖 💔 10 #
# 🐖🐖🐖 #
# ... 🐖x🐖 ... #";
    assert_eq!(compile(source).unwrap(), compile(source).unwrap());
}

#[test]
fn test_lexer_error_wins_over_later_parse_errors() {
    // the 🎉 on line 1 aborts before the structurally broken line 2 is seen
    let err = compile("# 😀 🐷 🐖x🐖 @ 🎉 #\n# HURT 1 #\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
    assert_eq!(err.line, 1);
}

#[test]
fn test_full_feature_program_compiles() {
    let source = "\
👀 pig arithmetic below
# 😭 🐽 🐖base🐖 @ 2 #
# 😀 🐷 🐖value🐖 @ ** 🐖base🐖 ❤️ 3 ** 💞 4 #
# 😀 wow 🐖flag🐖 @ 🐖value🐖 🌸> 20 #
# SAVE 🐖flag🐖 #
# 🐖🐖🐖 #
#~ 🐖value🐖 @ 🐖value🐖 💔 1 ~#
# 🐖🐖🐖 #
# HURT 💩 🐖flag🐖 #
# 🐖🐖🐖 #
# 🐖value🐖 @ 0 #
# 🐖🐖🐖 #
# ... 🐖value🐖 ... #";
    let ir = compile(source).unwrap();
    // mood line: 💔 inverts back to addition
    assert!(ir.contains("add i32"));
    assert!(ir.contains("icmp sge"));
    assert!(ir.contains("xor i1"));
    assert!(ir.contains("then_0:"));
    assert!(ir.contains("elif_0_0:"));
    assert!(ir.ends_with("}\n"));
}
