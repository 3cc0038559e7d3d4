use pretty_assertions::assert_eq;

use crate::{AttrValue, Attrs, DataType, Expr, ExprKind, Type, TypeKind, TypeVar, Var};

#[test]
fn test_print_let() {
    let x = Var::new("x", None);
    let body = Expr::tuple(vec![
        x.clone().into(),
        Expr::call(
            Expr::op("add"),
            vec![x.clone().into(), Expr::constant(2)],
            Attrs::new(),
            vec![],
        ),
    ]);
    let expr = Expr::let_(x, Expr::constant(1), body);
    assert_eq!(expr.to_string(), "let %x = 1; (%x, add(%x, 2))");
}

#[test]
fn test_print_function() {
    let t = TypeVar::new("T");
    let a = Var::new("a", Some(t.clone().into()));
    let func = Expr::function(
        vec![a.clone()],
        a.into(),
        Some(t.clone().into()),
        vec![t],
        Attrs::new(),
    );
    assert_eq!(func.to_string(), "fn<T>(%a: T) -> T { %a }");
}

#[test]
fn test_print_call_with_type_args_and_attrs() {
    let attrs = Attrs::from_pairs([("axis", AttrValue::Int(1))]);
    let call = Expr::call(
        Expr::global_var("concat"),
        vec![Expr::tuple(vec![Expr::constant(1.5)])],
        attrs,
        vec![Type::tensor(vec![4], DataType::Float(32))],
    );
    assert_eq!(
        call.to_string(),
        "@concat<Tensor[(4), float32]>((1.5f,), axis=1)"
    );
}

#[test]
fn test_print_if_and_projection() {
    let c = Var::new("c", Some(Type::scalar(DataType::Bool)));
    let expr = Expr::if_(
        c.into(),
        Expr::tuple_get_item(Expr::global_var("pair"), 1),
        Expr::constant(false),
    );
    assert_eq!(expr.to_string(), "if (%c) { @pair.1 } else { false }");
}

#[test]
fn test_print_func_type() {
    let t = TypeVar::new("T");
    let ty = Type::func(
        vec![t.clone()],
        vec![t.clone().into(), Type::scalar(DataType::Int(32))],
        Type::tuple(vec![t.into()]),
    );
    assert_eq!(ty.to_string(), "fn<T>(T, Tensor[(), int32]) -> (T)");
}

#[test]
fn test_print_deep_chain() {
    let depth = 100_000;
    let mut expr = Expr::constant(0);
    for _ in 0..depth {
        expr = Expr::tuple_get_item(Expr::tuple(vec![expr]), 0);
    }

    let text = expr.to_string();
    assert!(text.starts_with("((((("));
    assert!(text.contains("(0,).0,).0"));
    assert!(text.ends_with(",).0"));
    // "(" + ",).0" per level around the single "0".
    assert_eq!(text.len(), depth * 5 + 1);

    // Tear down iteratively; dropping the root would recurse once per level.
    loop {
        let next = match expr.kind() {
            ExprKind::TupleGetItem(item) => item.tuple.clone(),
            ExprKind::Tuple(tuple) => match tuple.fields.first() {
                Some(field) => field.clone(),
                None => break,
            },
            _ => break,
        };
        expr = next;
    }
}

#[test]
fn test_print_deep_type() {
    let mut ty = Type::scalar(DataType::Bool);
    for _ in 0..50_000 {
        ty = Type::tuple(vec![ty]);
    }
    let text = ty.to_string();
    assert_eq!(text.len(), 50_000 * 2 + "Tensor[(), bool]".len());

    loop {
        let next = match ty.kind() {
            TypeKind::Tuple(tuple) => match tuple.fields.first() {
                Some(field) => field.clone(),
                None => break,
            },
            _ => break,
        };
        ty = next;
    }
}
