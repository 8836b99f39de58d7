//! Build a module with one function that adds 41 to its argument,
//! verify it, and print the textual IR.
//!
//! Run with `RUST_LOG=debug` to see the emission log lines.

use ivy_llvm::{Context, LlvmResult};

fn main() -> LlvmResult<()> {
    env_logger::init();

    let ctx = Context::create();
    let module = ctx.create_module("sum_demo");
    let builder = ctx.create_builder();

    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type()], false);
    let func = module.add_function("add_forty_one", fn_ty);
    let entry = func.append_basic_block("entry");

    builder.position_at_end(entry);
    let param = func
        .get_param(0)
        .ok_or_else(|| ivy_llvm::LlvmError::InvalidModule("missing parameter".to_string()))?;
    param.set_name("n");
    let sum = builder.build_add(param, i32_ty.const_int(41, false), "sum")?;
    builder.build_return(Some(sum))?;

    module.verify()?;
    print!("{}", module.print_to_string());
    Ok(())
}
