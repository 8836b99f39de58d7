//! Function declaration, parameter access, and module lookup.

use ivy_llvm::{Context, FunctionType, LlvmError, Module};

fn declare_binop<'ctx>(ctx: &'ctx Context, module: &Module<'ctx>, name: &str) -> FunctionType<'ctx> {
    let i32_ty = ctx.i32_type();
    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type(), i32_ty.as_type()], false);
    module.add_function(name, fn_ty);
    fn_ty
}

#[test]
fn test_function_params() {
    let ctx = Context::create();
    let module = ctx.create_module("params");
    declare_binop(&ctx, &module, "max");

    let func = module.get_function("max").unwrap();
    assert_eq!(func.count_params(), 2);
    assert_eq!(func.get_name(), "max");

    let a = func.get_param(0).unwrap();
    let b = func.get_param(1).unwrap();
    assert_ne!(a, b);
    assert!(a.type_of().is_int());
    assert!(func.get_param(2).is_none());

    a.set_name("lhs");
    assert_eq!(a.get_name(), "lhs");

    assert_eq!(func.get_param_iter().count(), 2);
    assert_eq!(func.get_first_param(), Some(a));
}

#[test]
fn test_get_function_missing() {
    let ctx = Context::create();
    let module = ctx.create_module("lookup");

    assert!(module.get_function("absent").is_none());
}

#[test]
fn test_get_or_insert_is_idempotent() {
    let ctx = Context::create();
    let module = ctx.create_module("idempotent");
    let fn_ty = ctx.i32_type().fn_type(&[], false);

    let first = module.get_or_insert_function("f", fn_ty).unwrap();
    let second = module.get_or_insert_function("f", fn_ty).unwrap();

    assert_eq!(first, second);
    assert_eq!(module.functions().count(), 1);
}

#[test]
fn test_get_or_insert_rejects_mismatched_signature() {
    let ctx = Context::create();
    let module = ctx.create_module("mismatch");

    let int_fn = ctx.i32_type().fn_type(&[], false);
    let float_fn = ctx.f64_type().fn_type(&[], false);

    module.get_or_insert_function("f", int_fn).unwrap();
    let err = module.get_or_insert_function("f", float_fn).unwrap_err();

    match err {
        LlvmError::FunctionTypeMismatch { name, found, requested } => {
            assert_eq!(name, "f");
            assert!(found.contains("i32"));
            assert!(requested.contains("double"));
        }
        other => panic!("expected a signature mismatch, got {other:?}"),
    }
    // No shadow declaration was created.
    assert_eq!(module.functions().count(), 1);
}

#[test]
fn test_function_iteration_order() {
    let ctx = Context::create();
    let module = ctx.create_module("ordering");
    declare_binop(&ctx, &module, "first");
    declare_binop(&ctx, &module, "second");
    declare_binop(&ctx, &module, "third");

    let names: Vec<_> = module.functions().map(|f| f.get_name()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn test_function_type_roundtrip() {
    let ctx = Context::create();
    let module = ctx.create_module("sig");
    let declared = declare_binop(&ctx, &module, "add");

    let func = module.get_function("add").unwrap();
    assert_eq!(func.get_type(), declared);
    assert_eq!(func.get_type().count_param_types(), 2);
}
