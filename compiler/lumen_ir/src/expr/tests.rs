use super::*;
use crate::{AttrValue, DataType, TypeKindTag};

#[test]
fn test_same_as_is_identity_not_structure() {
    let a = Expr::constant(1);
    let b = Expr::constant(1);
    let a2 = a.clone();

    assert!(a.same_as(&a2));
    assert!(!a.same_as(&b));
    assert_eq!(a.key(), a2.key());
    assert_ne!(a.key(), b.key());
}

#[test]
fn test_rebuilding_with_same_children_is_a_new_node() {
    let c = Expr::constant(2);
    let t1 = Expr::tuple(vec![c.clone(), c.clone()]);
    let t2 = Expr::tuple(vec![c.clone(), c]);
    assert!(!t1.same_as(&t2));
}

#[test]
fn test_tags() {
    let x = Var::new("x", None);
    let cases = [
        (Expr::from(x.clone()), ExprKindTag::Var),
        (Expr::constant(true), ExprKindTag::Constant),
        (Expr::global_var("main"), ExprKindTag::GlobalVar),
        (Expr::op("add"), ExprKindTag::Op),
        (Expr::tuple(vec![]), ExprKindTag::Tuple),
        (
            Expr::function(vec![], Expr::constant(0), None, vec![], Attrs::new()),
            ExprKindTag::Function,
        ),
        (
            Expr::call(Expr::op("neg"), vec![], Attrs::new(), vec![]),
            ExprKindTag::Call,
        ),
        (
            Expr::let_(x.clone(), Expr::constant(1), x.clone().into()),
            ExprKindTag::Let,
        ),
        (
            Expr::if_(Expr::constant(true), Expr::constant(1), Expr::constant(2)),
            ExprKindTag::If,
        ),
        (
            Expr::tuple_get_item(Expr::tuple(vec![]), 0),
            ExprKindTag::TupleGetItem,
        ),
    ];
    for (expr, tag) in cases {
        assert_eq!(expr.tag(), tag);
    }
}

#[test]
fn test_var_shares_identity_with_expr() {
    let x = Var::new("x", None);
    let as_expr: Expr = x.clone().into();
    assert_eq!(x.key(), as_expr.key());
    assert!(x.as_expr().same_as(&as_expr));

    let back = Var::try_from(as_expr).unwrap();
    assert!(back.same_as(&x));
}

#[test]
fn test_var_accessors() {
    let ty = Type::scalar(DataType::Float(32));
    let x = Var::new("x", Some(ty.clone()));
    assert_eq!(x.name_hint().as_str(), "x");
    assert!(x.type_annotation().unwrap().same_as(&ty));
    assert!(Var::new("y", None).type_annotation().is_none());
}

#[test]
fn test_var_try_from_reports_found_kind() {
    let err = Var::try_from(Expr::constant(3)).unwrap_err();
    assert_eq!(
        err,
        KindMismatch::Expr {
            expected: ExprKindTag::Var,
            found: ExprKindTag::Constant,
        }
    );
    assert_eq!(err.to_string(), "expected Var expression, found Constant");
}

#[test]
#[should_panic(expected = "expected Var expression, found Tuple")]
fn test_var_cast_panics_on_mismatch() {
    let _ = Var::cast(&Expr::tuple(vec![]));
}

#[test]
fn test_as_var() {
    let x = Var::new("x", None);
    let expr: Expr = x.clone().into();
    assert!(expr.as_var().unwrap().same_as(&x));
    assert!(Expr::constant(0).as_var().is_none());
}

#[test]
fn test_type_kind_mismatch_display() {
    let err = KindMismatch::Type {
        expected: TypeKindTag::Var,
        found: TypeKindTag::Tensor,
    };
    assert_eq!(err.to_string(), "expected TypeVar type, found TensorType");
}

#[test]
fn test_constant_payload_accessors() {
    let half = Expr::constant(0.5);
    let ExprKind::Constant(half) = half.kind() else {
        panic!("expected constant");
    };
    assert_eq!(half.value.as_f64(), Some(0.5));
    assert_eq!(half.value.as_i64(), None);

    let seven = Expr::constant(7);
    let ExprKind::Constant(seven) = seven.kind() else {
        panic!("expected constant");
    };
    assert_eq!(seven.value.as_i64(), Some(7));
    assert_eq!(seven.value.as_f64(), None);
    assert_eq!(ConstantValue::from(true).as_i64(), None);
}

#[test]
fn test_call_attrs_lookup() {
    let attrs = Attrs::from_pairs([
        ("axis", AttrValue::Int(1)),
        ("layout", AttrValue::Str(Symbol::new("NCHW"))),
    ]);
    let call = Expr::call(Expr::op("concat"), vec![], attrs, vec![]);
    let ExprKind::Call(call) = call.kind() else {
        panic!("expected call");
    };

    assert_eq!(call.attrs.get("axis"), Some(&AttrValue::Int(1)));
    assert_eq!(
        call.attrs.get("layout"),
        Some(&AttrValue::Str(Symbol::new("NCHW")))
    );
    assert_eq!(call.attrs.get("missing"), None);
    assert_eq!(Attrs::new().get("axis"), None);
    assert!(Attrs::from_pairs(Vec::<(&str, AttrValue)>::new()).is_empty());
}

#[test]
fn test_handles_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expr>();
    assert_send_sync::<Var>();
    assert_send_sync::<Type>();
    assert_send_sync::<TypeVar>();
    assert_send_sync::<Symbol>();
    assert_send_sync::<Attrs>();
}
