//! End-to-end IR construction through the builder.

use ivy_llvm::{BasicBlock, BuilderError, Context, IntPredicate};

/// Number of instructions currently in `block`.
fn instruction_count(block: BasicBlock<'_>) -> usize {
    let mut count = 0;
    let mut cursor = block.get_first_instruction();
    while let Some(instruction) = cursor {
        count += 1;
        cursor = instruction.get_next_instruction();
    }
    count
}

#[test]
fn test_add_forty_one() {
    let ctx = Context::create();
    let module = ctx.create_module("demo");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let func = module.add_function("f", fn_ty);
    let entry = func.append_basic_block("entry");

    builder.position_at_end(entry);
    let param = func.get_param(0).unwrap();
    let sum = builder
        .build_add(param, i32_ty.const_int(41, false), "sum")
        .unwrap();
    builder.build_return(Some(sum)).unwrap();

    module.verify().unwrap();

    let ir = module.print_to_string().to_string_lossy();
    assert!(ir.contains("define i32 @f"), "unexpected IR:\n{ir}");
    assert!(ir.contains("add"), "unexpected IR:\n{ir}");
    assert!(ir.contains("ret i32"), "unexpected IR:\n{ir}");
}

#[test]
fn test_each_build_call_appends_one_instruction() {
    let ctx = Context::create();
    let module = ctx.create_module("monotonic");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let func = module.add_function("grow", fn_ty);
    let entry = func.append_basic_block("entry");
    builder.position_at_end(entry);

    assert_eq!(instruction_count(entry), 0);

    let p = func.get_param(0).unwrap();
    let one = i32_ty.const_int(1, false);
    let a = builder.build_add(p, one, "a").unwrap();
    assert_eq!(instruction_count(entry), 1);
    let b = builder.build_mul(a, p, "b").unwrap();
    assert_eq!(instruction_count(entry), 2);
    let c = builder.build_xor(b, one, "c").unwrap();
    assert_eq!(instruction_count(entry), 3);
    builder.build_return(Some(c)).unwrap();
    assert_eq!(instruction_count(entry), 4);

    // Emission order matches call order.
    let first = entry.get_first_instruction().unwrap();
    assert_eq!(first.as_value(), a);
    assert_eq!(entry.get_terminator().unwrap().get_previous_instruction().unwrap().as_value(), c);
}

#[test]
fn test_unpositioned_builder_errors() {
    let ctx = Context::create();
    let _module = ctx.create_module("unset");
    let builder = ctx.create_builder();

    assert!(builder.get_insert_block().is_none());

    let one = ctx.i32_type().const_int(1, false);
    let err = builder.build_add(one, one, "sum").unwrap_err();
    assert_eq!(err, BuilderError::UnsetPosition);

    let err = builder.build_return(None).unwrap_err();
    assert_eq!(err, BuilderError::UnsetPosition);
}

#[test]
fn test_builder_positioning() {
    let ctx = Context::create();
    let module = ctx.create_module("cursor");
    let builder = ctx.create_builder();

    let void_ty = ctx.void_type();
    let func = module.add_function("positions", void_ty.fn_type(&[], false));
    let entry = func.append_basic_block("entry");

    builder.position_at_end(entry);
    assert_eq!(builder.get_insert_block(), Some(entry));

    let ret = builder.build_return(None).unwrap();
    let ret = ret.as_instruction().unwrap();

    // Instructions emitted before the terminator land ahead of it.
    builder.position_before(&ret);
    let slot = builder
        .build_alloca(ctx.i32_type().as_type(), "slot")
        .unwrap()
        .as_instruction()
        .unwrap();
    assert_eq!(instruction_count(entry), 2);
    assert!(entry.get_first_instruction().unwrap().get_next_instruction() == Some(ret));

    // Positioning after an instruction inserts between it and its
    // successor.
    builder.position_after(entry, &slot);
    builder.build_alloca(ctx.i8_type().as_type(), "second").unwrap();
    let order: Vec<_> = {
        let mut names = Vec::new();
        let mut cursor = entry.get_first_instruction();
        while let Some(inst) = cursor {
            names.push(inst.as_value().get_name());
            cursor = inst.get_next_instruction();
        }
        names
    };
    assert_eq!(order, vec!["slot", "second", ""]);

    module.verify().unwrap();
}

#[test]
fn test_position_after_last_instruction() {
    let ctx = Context::create();
    let module = ctx.create_module("tail");
    let builder = ctx.create_builder();

    let func = module.add_function("tail", ctx.void_type().fn_type(&[], false));
    let entry = func.append_basic_block("entry");
    builder.position_at_end(entry);
    let slot = builder
        .build_alloca(ctx.i32_type().as_type(), "slot")
        .unwrap()
        .as_instruction()
        .unwrap();

    // `slot` has no successor, so the cursor lands at the block's end
    // and the next emission appends after it.
    builder.position_after(entry, &slot);
    builder.build_return(None).unwrap();

    assert_eq!(slot.get_next_instruction(), entry.get_terminator());
    assert_eq!(entry.get_last_instruction(), entry.get_terminator());
    module.verify().unwrap();
}

#[test]
fn test_branching_and_compare() {
    let ctx = Context::create();
    let module = ctx.create_module("branchy");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let func = module.add_function("is_zero", fn_ty);
    let entry = func.append_basic_block("entry");
    let then_block = func.append_basic_block("then");
    let else_block = func.append_basic_block("else");

    builder.position_at_end(entry);
    let p = func.get_param(0).unwrap();
    let cond = builder
        .build_int_compare(IntPredicate::EQ, p, i32_ty.const_int(0, false), "cond")
        .unwrap();
    builder
        .build_conditional_branch(cond, then_block, else_block)
        .unwrap();

    builder.position_at_end(then_block);
    builder.build_return(Some(i32_ty.const_int(1, false))).unwrap();

    builder.position_at_end(else_block);
    builder.build_return(Some(i32_ty.const_int(0, false))).unwrap();

    assert_eq!(func.count_basic_blocks(), 3);
    assert_eq!(func.get_entry_basic_block(), Some(entry));
    module.verify().unwrap();
}

#[test]
fn test_memory_roundtrip() {
    let ctx = Context::create();
    let module = ctx.create_module("memory");
    let builder = ctx.create_builder();

    let i64_ty = ctx.i64_type();
    let fn_ty = i64_ty.fn_type(&[i64_ty.as_type()], false);
    let func = module.add_function("spill", fn_ty);
    builder.position_at_end(func.append_basic_block("entry"));

    let slot = builder.build_alloca(i64_ty.as_type(), "slot").unwrap();
    builder.build_store(func.get_param(0).unwrap(), slot).unwrap();
    let loaded = builder.build_load(i64_ty.as_type(), slot, "loaded").unwrap();
    builder.build_return(Some(loaded)).unwrap();

    module.verify().unwrap();
    let ir = module.print_to_string().to_string_lossy();
    assert!(ir.contains("alloca i64"), "unexpected IR:\n{ir}");
    assert!(ir.contains("load i64"), "unexpected IR:\n{ir}");
}

#[test]
fn test_switch_and_unreachable() {
    let ctx = Context::create();
    let module = ctx.create_module("dispatch");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let func = module.add_function("select", fn_ty);
    let entry = func.append_basic_block("entry");
    let zero_block = func.append_basic_block("zero");
    let one_block = func.append_basic_block("one");
    let default_block = func.append_basic_block("default");

    builder.position_at_end(entry);
    builder
        .build_switch(
            func.get_param(0).unwrap(),
            default_block,
            &[
                (i32_ty.const_int(0, false), zero_block),
                (i32_ty.const_int(1, false), one_block),
            ],
        )
        .unwrap();

    builder.position_at_end(zero_block);
    builder.build_return(Some(i32_ty.const_int(100, false))).unwrap();
    builder.position_at_end(one_block);
    builder.build_return(Some(i32_ty.const_int(200, false))).unwrap();
    builder.position_at_end(default_block);
    builder.build_unreachable().unwrap();

    module.verify().unwrap();
    let ir = module.print_to_string().to_string_lossy();
    assert!(ir.contains("switch i32"), "unexpected IR:\n{ir}");
    assert!(ir.contains("unreachable"), "unexpected IR:\n{ir}");
}

#[test]
fn test_call_between_functions() {
    let ctx = Context::create();
    let module = ctx.create_module("calls");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let callee = module.add_function("callee", fn_ty);
    let caller = module.add_function("caller", fn_ty);

    builder.position_at_end(callee.append_basic_block("entry"));
    builder.build_return(Some(callee.get_param(0).unwrap())).unwrap();

    builder.position_at_end(caller.append_basic_block("entry"));
    let result = builder
        .build_call(callee, &[caller.get_param(0).unwrap()], "forwarded")
        .unwrap();
    builder.build_return(Some(result)).unwrap();

    module.verify().unwrap();
    let ir = module.print_to_string().to_string_lossy();
    assert!(ir.contains("call i32 @callee"), "unexpected IR:\n{ir}");
}

#[test]
fn test_verify_rejects_missing_terminator() {
    let ctx = Context::create();
    let module = ctx.create_module("broken");
    let builder = ctx.create_builder();

    let func = module.add_function("dangling", ctx.void_type().fn_type(&[], false));
    builder.position_at_end(func.append_basic_block("entry"));
    builder.build_alloca(ctx.i8_type().as_type(), "x").unwrap();
    // No terminator emitted.

    assert!(module.verify().is_err());
}

#[test]
fn test_float_arithmetic_and_casts() {
    let ctx = Context::create();
    let module = ctx.create_module("floats");
    let builder = ctx.create_builder();

    let f64_ty = ctx.f64_type();
    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[f64_ty.as_type()], false);
    let func = module.add_function("round_sum", fn_ty);
    builder.position_at_end(func.append_basic_block("entry"));

    let p = func.get_param(0).unwrap();
    let doubled = builder.build_float_add(p, p, "doubled").unwrap();
    let truncated = builder
        .build_float_to_signed_int(doubled, i32_ty.as_type(), "truncated")
        .unwrap();
    builder.build_return(Some(truncated)).unwrap();

    module.verify().unwrap();
    let ir = module.print_to_string().to_string_lossy();
    assert!(ir.contains("fadd double"), "unexpected IR:\n{ir}");
    assert!(ir.contains("fptosi"), "unexpected IR:\n{ir}");
}
