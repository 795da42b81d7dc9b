//! End-to-end translation of assembly listings.

use asmgen::test_harness::*;
use asmgen::{Error, Processor, TranslateOptions, translate};

const FIB: &str = "\
\t.text
\t.syntax unified
\t.globl\tfib
\t.p2align\t2
\t.type\tfib,%function
\t.code\t32
fib:
\t.fnstart
@ %bb.0:
\tpush\t{r4, r5, r11, lr}
\tcmp\tr0, #2
\tblt\t.LBB0_2
@ %bb.1:
\tsub\tr4, r0, #1
\tldr\tr5, [sp, #4]
\tmov\tr0, r4, lsl #1
\tbl\tfib
.LBB0_2:
\tmovlt\tr0, #1
\tpop\t{r4, r5, r11, pc}
.Lfunc_end0:
\t.size\tfib, .Lfunc_end0-fib
\t.fnend
";

#[test]
fn test_function_listing() {
    let output = translate_lines(FIB).expect("translate");

    assert_eq!(output[0], "Label fib, bb0, bb1, LBB0_2, Lfunc_end0;");
    assert_eq!(
        &output[1..],
        [
            "__ bind(&fib);",
            "__ bind(&bb0);",
            "__ stm(db, sp, ((1 << r4.code())|(1 << r5.code())|(1 << r11.code())|(1 << lr.code())), al);",
            "__ cmp(r0, Operand(2));",
            "__ b(&LBB0_2, lt);",
            "__ bind(&bb1);",
            "__ sub(r4, r0, Operand(1));",
            "__ ldr(r5, MemOperand(sp, 4));",
            "__ mov(r0, Operand(r4, LSL, 1));",
            "__ bl(&fib, al);",
            "__ bind(&LBB0_2);",
            "__ mov(r0, Operand(1), lt);",
            "__ ldm(ia, sp, ((1 << r4.code())|(1 << r5.code())|(1 << r11.code())|(1 << pc.code())), al);",
            "__ bind(&Lfunc_end0);",
        ]
    );
}

#[test]
fn test_branch_and_move_examples() {
    let output = translate_lines("f:\nbeq .Lfoo\nmov r0, r1\n").expect("translate");
    assert_has_line(&output, "__ b(&Lfoo, eq);");
    assert_has_line(&output, "__ mov(r0, Operand(r1));");
    assert_no_line_containing(&output, ", al)");
}

#[test]
fn test_patchpoint_block_replaces_instructions() {
    let options = TranslateOptions {
        temp_symbol_prefix: "myFunc".to_string(),
        ..TranslateOptions::default()
    };
    let source = assembly(
        &[PatchpointSpec::new(42, "myFunc").indirect_sp(8)],
        &["myFunc:", "mov r0, r1"],
    );
    let output = translate_lines_with_options(&source, &options).expect("translate");

    assert_has_sequence(
        &output,
        &[
            "__ bind(&myFunc);",
            "// FIXME: handle patch point myFunc here!",
            "{",
            "\tSafepoint safepoint = safepoint_builder->DefineSafepoint(asm, Safepoint::kSimple, 0, Safepoint::kLazyDeopt /* assume need frame */);",
            "\tsafepoint.DefinePointerSlot(2, zone);",
            "}",
        ],
    );
    assert_no_line_containing(&output, "__ mov(");
}

#[test]
fn test_patchpoint_after_call() {
    let source = assembly(
        &[PatchpointSpec::new(7, ".Ltmp0")
            .indirect_sp(0)
            .indirect_sp(4)
            .indirect_sp(0)],
        &[
            "f:",
            "push {r11, lr}",
            "bl callee",
            ".Ltmp0:",
            "add r0, r0, #1",
            "pop {r11, pc}",
            ".fnend",
        ],
    );
    let output = translate_lines(&source).expect("translate");

    assert_has_sequence(&output, &["__ bl(&callee, al);", "__ bind(&Ltmp0);"]);
    assert_eq!(count_line(&output, "\tsafepoint.DefinePointerSlot(0, zone);"), 1);
    assert_eq!(count_line(&output, "\tsafepoint.DefinePointerSlot(1, zone);"), 1);
    assert_no_line_containing(&output, "__ add(");
    assert_has_line(&output, "__ bind(&__LLVM_StackMaps);");
}

#[test]
fn test_inline_assembly_moves_are_flagged() {
    let output = translate_lines(
        "f:\n@APP\nmov r0, r0\nadd r1, r1, #1\n@NO_APP\nmov r2, r3\n",
    )
    .expect("translate");

    assert_has_sequence(
        &output,
        &[
            "// needs to handle magic : mov r0, r0",
            "__ add(r1, r1, Operand(1));",
            "__ mov(r2, Operand(r3));",
        ],
    );
}

#[test]
fn test_inline_assembly_flag_spans_labels() {
    let output = translate_lines("f:\n@APP\n.LBB0_1:\nmov r0, r0\n@NO_APP\nmov r1, r1\n")
        .expect("translate");
    assert_has_line(&output, "// needs to handle magic : mov r0, r0");
    assert_has_line(&output, "__ mov(r1, Operand(r1));");
}

#[test]
fn test_fnend_stops_block() {
    let output = translate_lines("f:\nmov r0, r1\n.fnend\nthis is not an instruction\n")
        .expect("translate");
    assert_has_line(&output, "__ mov(r0, Operand(r1));");
    assert_eq!(output.len(), 3);
}

#[test]
fn test_lines_before_first_label_are_ignored() {
    let output = translate_lines("not an instruction\nf:\nbx lr\n").expect("translate");
    assert_eq!(output, ["Label f;", "__ bind(&f);", "__ bx(&lr, al);"]);
}

#[test]
fn test_listing_splits_into_blocks() {
    let processor = Processor::new(FIB, TranslateOptions::default());
    let names: Vec<&str> = processor.labels().iter().map(|l| l.name()).collect();
    assert_eq!(names, ["fib", "bb0", "bb1", "LBB0_2", "Lfunc_end0"]);

    let block = &processor.labels()[3];
    assert_eq!(block.lines()[0].number, 18);
    assert_eq!(block.body().len(), 2);
}

#[test]
fn test_malformed_stack_map_value_aborts() {
    let source = assembly(
        &[PatchpointSpec::new(1, ".Ltmp0").indirect_sp(8)],
        &["f:", "bl g", ".Ltmp0:"],
    )
    .replace(".long 8\n", ".long --8\n");
    assert!(matches!(translate(&source), Err(Error::Format { .. })));
}

#[test]
fn test_empty_input() {
    assert_eq!(translate("").expect("translate"), "");
}

#[test]
fn test_unsupported_instruction_aborts() {
    match translate("f:\nmov r0, r1\nnop\n") {
        Err(Error::UnsupportedInstruction { line, number }) => {
            assert_eq!(line, "nop");
            assert_eq!(number, 3);
        }
        other => panic!("expected UnsupportedInstruction, got {other:?}"),
    }
}

#[test]
fn test_bad_operand_aborts() {
    assert!(matches!(
        translate("f:\nmla r0, r1, r2, r3\n"),
        Err(Error::Format { number: 2, .. })
    ));
}

#[test]
fn test_unsupported_addressing_aborts() {
    let source = assembly(
        &[PatchpointSpec::new(1, ".Ltmp0").location(asmgen::LocationKind::Indirect, 4, 11, 8)],
        &["f:", "bl g", ".Ltmp0:"],
    );
    match translate(&source) {
        Err(Error::UnsupportedAddressing { location, label }) => {
            assert_eq!(location.reg_no, 11);
            assert_eq!(label, "Ltmp0");
        }
        other => panic!("expected UnsupportedAddressing, got {other:?}"),
    }
}

#[test]
fn test_custom_stack_pointer_register() {
    let options = TranslateOptions {
        stack_pointer_reg: 11,
        ..TranslateOptions::default()
    };
    let source = assembly(
        &[PatchpointSpec::new(1, ".Ltmp0").location(asmgen::LocationKind::Indirect, 4, 11, 16)],
        &["f:", "bl g", ".Ltmp0:"],
    );
    let output = translate_lines_with_options(&source, &options).expect("translate");
    assert_has_line(&output, "\tsafepoint.DefinePointerSlot(4, zone);");
}
