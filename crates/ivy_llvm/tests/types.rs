//! Type construction and introspection.

use ivy_llvm::{AddressSpace, Context, TypeKind};
use pretty_assertions::assert_eq;

#[test]
fn test_primitive_types_are_singletons() {
    let ctx = Context::create();

    assert_eq!(ctx.i32_type(), ctx.i32_type());
    assert_eq!(ctx.f64_type(), ctx.f64_type());
    assert_eq!(ctx.custom_width_int_type(32), ctx.i32_type());
    assert_ne!(ctx.i32_type().as_type(), ctx.i64_type().as_type());
}

#[test]
fn test_int_widths() {
    let ctx = Context::create();

    assert_eq!(ctx.bool_type().width(), 1);
    assert_eq!(ctx.i8_type().width(), 8);
    assert_eq!(ctx.i16_type().width(), 16);
    assert_eq!(ctx.i32_type().width(), 32);
    assert_eq!(ctx.i64_type().width(), 64);
    assert_eq!(ctx.i128_type().width(), 128);
    assert_eq!(ctx.custom_width_int_type(37).width(), 37);
}

#[test]
fn test_type_kinds_and_predicates() {
    let ctx = Context::create();

    assert_eq!(ctx.void_type().kind(), TypeKind::Void);
    assert!(ctx.void_type().is_void());
    assert!(ctx.i32_type().as_type().is_int());
    assert!(ctx.f32_type().as_type().is_float());
    assert!(ctx.ptr_type(AddressSpace::default()).as_type().is_pointer());

    let arr = ctx.i8_type().as_type().array_type(4);
    assert!(arr.as_type().is_array());
}

#[test]
fn test_struct_field_introspection() {
    let ctx = Context::create();
    let i32_ty = ctx.i32_type().as_type();
    let f64_ty = ctx.f64_type().as_type();
    let ptr_ty = ctx.ptr_type(AddressSpace::default()).as_type();

    let st = ctx.struct_type(&[i32_ty, f64_ty, ptr_ty], false);

    assert_eq!(st.count_fields(), 3);
    assert_eq!(st.get_field_type_at_index(0), Some(i32_ty));
    assert_eq!(st.get_field_type_at_index(1), Some(f64_ty));
    assert_eq!(st.get_field_type_at_index(2), Some(ptr_ty));
    assert_eq!(st.get_field_type_at_index(3), None);

    // Two independent iterations must both see every field in order.
    let first: Vec<_> = st.field_types_iter().collect();
    let second: Vec<_> = st.field_types_iter().collect();
    assert_eq!(first, vec![i32_ty, f64_ty, ptr_ty]);
    assert_eq!(first, second);
}

#[test]
fn test_opaque_struct_body() {
    let ctx = Context::create();
    let st = ctx.opaque_struct_type("node");

    assert!(st.is_opaque());

    let i64_ty = ctx.i64_type().as_type();
    st.set_body(&[i64_ty, i64_ty], false);
    assert!(!st.is_opaque());
    assert_eq!(st.count_fields(), 2);
}

#[test]
fn test_array_type_introspection() {
    let ctx = Context::create();
    let elem = ctx.i16_type().as_type();
    let arr = elem.array_type(10);

    assert_eq!(arr.len(), 10);
    assert_eq!(arr.element_type(), elem);

    let empty = elem.array_type(0);
    assert!(empty.is_empty());
}

#[test]
fn test_function_type_introspection() {
    let ctx = Context::create();
    let i32_ty = ctx.i32_type();
    let f64_ty = ctx.f64_type().as_type();

    let fn_ty = i32_ty.fn_type(&[i32_ty.as_type(), f64_ty], false);

    assert_eq!(fn_ty.get_return_type(), i32_ty.as_type());
    assert_eq!(fn_ty.count_param_types(), 2);
    assert_eq!(fn_ty.get_param_types(), vec![i32_ty.as_type(), f64_ty]);
    assert!(!fn_ty.is_var_arg());

    let variadic = ctx.void_type().fn_type(&[], true);
    assert!(variadic.is_var_arg());
    assert_eq!(variadic.count_param_types(), 0);
}

#[test]
fn test_type_printing() {
    let ctx = Context::create();

    assert_eq!(ctx.i32_type().as_type().print_to_string().to_string_lossy(), "i32");
    assert_eq!(ctx.f64_type().as_type().print_to_string().to_string_lossy(), "double");
}

#[test]
fn test_size_of() {
    let ctx = Context::create();

    let size = ctx.i64_type().as_type().size_of().unwrap();
    assert!(size.is_constant());
    assert!(ctx.void_type().size_of().is_none());

    let opaque = ctx.opaque_struct_type("unknown");
    assert!(opaque.as_type().size_of().is_none());
}

#[test]
fn test_constants() {
    let ctx = Context::create();
    let i32_ty = ctx.i32_type();

    let forty_two = i32_ty.const_int(42, false);
    assert!(forty_two.is_constant());
    assert!(!forty_two.is_null());

    let zero = i32_ty.as_type().const_null();
    assert!(zero.is_null());

    let undef = i32_ty.as_type().get_undef();
    assert!(undef.is_undef());

    let ones = i32_ty.const_all_ones();
    assert!(ones.is_constant());

    let pi = ctx.f64_type().const_float(3.14);
    assert!(pi.is_constant());

    let null_ptr = ctx.ptr_type(AddressSpace::default()).const_null();
    assert!(null_ptr.is_null());

    let arr = i32_ty.as_type().const_array(&[forty_two, zero]);
    assert!(arr.is_constant());
    assert!(arr.type_of().is_array());
}

#[test]
fn test_const_string_and_struct() {
    let ctx = Context::create();

    let s = ctx.const_string("hi", true);
    assert!(s.is_constant());
    // Two bytes plus the terminator.
    assert_eq!(s.type_of().print_to_string().to_string_lossy(), "[3 x i8]");

    let pair = ctx.const_struct(
        &[ctx.i32_type().const_int(1, false), ctx.i32_type().const_int(2, false)],
        false,
    );
    assert!(pair.is_constant());
    assert!(pair.type_of().is_struct());
}
