//! Sharing, ordering, and identity guarantees of the traversal framework,
//! exercised through the public API only.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::cell::RefCell;

use lumen_functor::{init_tracing, ExprMemo, ExprMutator, ExprVisitor, VisitCounter};
use lumen_ir::{Attrs, Constant, ConstantValue, Expr, ExprKind, Var};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Identity {
    memo: ExprMemo,
}

impl ExprMutator for Identity {
    fn memo(&mut self) -> &mut ExprMemo {
        &mut self.memo
    }
}

/// Counts how many times each handler kind runs.
#[derive(Default)]
struct Calls {
    memo: ExprMemo,
    constants: usize,
    order: Vec<String>,
}

impl ExprMutator for Calls {
    fn memo(&mut self) -> &mut ExprMemo {
        &mut self.memo
    }

    fn mutate_constant(&mut self, expr: &Expr, constant: &Constant) -> Expr {
        self.constants += 1;
        self.order.push(constant.value.to_string());
        expr.clone()
    }
}

/// Counts constant handler runs.
#[derive(Default)]
struct ConstCount {
    counter: VisitCounter,
    calls: usize,
}

impl ExprVisitor for ConstCount {
    fn visit_counter(&mut self) -> &mut VisitCounter {
        &mut self.counter
    }

    fn visit_constant(&mut self, _expr: &Expr, _constant: &Constant) {
        self.calls += 1;
    }
}

/// `let %x = 1; (%x, add(%x, 2))`
fn sample() -> Expr {
    let x = Var::new("x", None);
    let add = Expr::call(
        Expr::op("add"),
        vec![x.clone().into(), Expr::constant(2)],
        Attrs::new(),
        vec![],
    );
    let body = Expr::tuple(vec![x.clone().into(), add]);
    Expr::let_(x, Expr::constant(1), body)
}

#[test]
fn identity_pass_is_idempotent() {
    init_tracing();
    let expr = sample();
    let mut pass = Identity::default();

    let once = pass.mutate(&expr);
    assert!(once.same_as(&expr));

    let twice = Identity::default().mutate(&once);
    assert!(twice.same_as(&expr));
    assert_eq!(expr.to_string(), "let %x = 1; (%x, add(%x, 2))");
}

#[test]
fn sharing_survives_identity_pass() {
    let c = Expr::constant(4);
    let tuple = Expr::tuple(vec![c.clone(), c.clone()]);
    let mut pass = Identity::default();

    assert!(pass.mutate(&tuple).same_as(&tuple));
    assert_eq!(pass.memo.len(), 2);
    assert!(pass.memo.get(&c).is_some_and(|r| r.same_as(&c)));
}

/// `(%s.0, %s.0)`: two distinct projections of one shared constant `%s = 1`.
fn fan_in() -> (Expr, Expr) {
    let shared = Expr::constant(1);
    let a = Expr::tuple_get_item(shared.clone(), 0);
    let b = Expr::tuple_get_item(shared.clone(), 0);
    (Expr::tuple(vec![a, b]), shared)
}

#[test]
fn shared_node_rewritten_at_most_once() {
    let (root, _) = fan_in();
    let mut pass = Calls::default();
    assert!(pass.mutate(&root).same_as(&root));

    assert_eq!(pass.constants, 1);
    assert_eq!(pass.memo.len(), 4);
}

#[test]
fn visitor_dedups_fan_in() {
    let (root, shared) = fan_in();
    let mut visitor = ConstCount::default();
    visitor.visit_expr(&root);

    assert_eq!(visitor.calls, 1);
    assert_eq!(visitor.counter.count(&shared), 2);
    assert_eq!(visitor.counter.count(&root), 1);

    // A node with two distinct parents is reached twice as well.
    let constant = Expr::constant(3);
    let root = Expr::if_(Expr::constant(true), constant.clone(), constant.clone());
    let mut visitor = ConstCount::default();
    visitor.visit_expr(&root);

    assert_eq!(visitor.calls, 2);
    let shared_nodes: Vec<_> = visitor.counter.shared().collect();
    assert_eq!(shared_nodes.len(), 1);
    assert!(shared_nodes[0].0.same_as(&constant));
    assert_eq!(shared_nodes[0].1, 2);
}

#[test]
fn targeted_rewrite_rebuilds_only_the_path() {
    /// Replaces the bound value 1 with 42.
    #[derive(Default)]
    struct FortyTwo {
        memo: ExprMemo,
    }

    impl ExprMutator for FortyTwo {
        fn memo(&mut self) -> &mut ExprMemo {
            &mut self.memo
        }

        fn mutate_constant(&mut self, expr: &Expr, constant: &Constant) -> Expr {
            if constant.value == ConstantValue::Int(1) {
                Expr::constant(42)
            } else {
                expr.clone()
            }
        }
    }

    let expr = sample();
    let ExprKind::Let(before) = expr.kind() else {
        panic!("expected let");
    };

    let result = FortyTwo::default().mutate(&expr);
    let ExprKind::Let(after) = result.kind() else {
        panic!("expected let");
    };

    assert!(!result.same_as(&expr));
    assert!(after.var.same_as(&before.var));
    assert!(after.body.same_as(&before.body));
    assert_eq!(result.to_string(), "let %x = 42; (%x, add(%x, 2))");
}

#[test]
fn if_children_rewritten_in_order() {
    let expr = Expr::if_(Expr::constant(1), Expr::constant(2), Expr::constant(3));
    let mut pass = Calls::default();
    pass.mutate(&expr);
    assert_eq!(pass.order, ["1", "2", "3"]);
}

#[test]
fn let_order_differs_between_visitor_and_mutator() {
    thread_local! {
        static SEEN: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn record(label: &'static str) {
        SEEN.with(|seen| seen.borrow_mut().push(label));
    }

    fn take() -> Vec<&'static str> {
        SEEN.with(|seen| std::mem::take(&mut *seen.borrow_mut()))
    }

    #[derive(Default)]
    struct V {
        counter: VisitCounter,
    }

    impl ExprVisitor for V {
        fn visit_counter(&mut self) -> &mut VisitCounter {
            &mut self.counter
        }

        fn visit_var(&mut self, _var: &Var) {
            record("var");
        }

        fn visit_constant(&mut self, _expr: &Expr, _constant: &Constant) {
            record("value");
        }

        fn visit_tuple(&mut self, _expr: &Expr, _tuple: &lumen_ir::Tuple) {
            record("body");
        }
    }

    #[derive(Default)]
    struct M {
        memo: ExprMemo,
    }

    impl ExprMutator for M {
        fn memo(&mut self) -> &mut ExprMemo {
            &mut self.memo
        }

        fn mutate_var(&mut self, var: &Var) -> Expr {
            record("var");
            var.as_expr().clone()
        }

        fn mutate_constant(&mut self, expr: &Expr, _constant: &Constant) -> Expr {
            record("value");
            expr.clone()
        }

        fn mutate_tuple(&mut self, expr: &Expr, _tuple: &lumen_ir::Tuple) -> Expr {
            record("body");
            expr.clone()
        }
    }

    let x = Var::new("x", None);
    let expr = Expr::let_(x, Expr::constant(0), Expr::tuple(vec![]));

    V::default().visit_expr(&expr);
    assert_eq!(take(), ["value", "var", "body"]);

    M::default().mutate(&expr);
    assert_eq!(take(), ["var", "value", "body"]);
}

#[test]
#[should_panic(expected = "function parameter must rewrite to a variable")]
fn function_param_must_stay_var() {
    #[derive(Default)]
    struct Erase {
        memo: ExprMemo,
    }

    impl ExprMutator for Erase {
        fn memo(&mut self) -> &mut ExprMemo {
            &mut self.memo
        }

        fn mutate_var(&mut self, _var: &Var) -> Expr {
            Expr::tuple(vec![])
        }
    }

    let p = Var::new("p", None);
    let f = Expr::function(vec![p.clone()], p.into(), None, vec![], Attrs::new());
    Erase::default().mutate(&f);
}

#[test]
fn concurrent_passes_share_one_graph() {
    let (root, shared) = fan_in();
    let (root, shared) = (&root, &shared);

    let (visited, rewritten) = std::thread::scope(|scope| {
        let visits: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(move || {
                    let mut visitor = ConstCount::default();
                    visitor.visit_expr(root);
                    (visitor.calls, visitor.counter.count(shared))
                })
            })
            .collect();
        let rewrite = scope.spawn(move || {
            let mut pass = Calls::default();
            let same = pass.mutate(root).same_as(root);
            (same, pass.constants, pass.memo.len())
        });

        let visited: Vec<_> = visits
            .into_iter()
            .map(|handle| handle.join().expect("visitor thread panicked"))
            .collect();
        let rewritten = rewrite.join().expect("mutator thread panicked");
        (visited, rewritten)
    });

    assert_eq!(visited, [(1, 2), (1, 2)]);
    assert_eq!(rewritten, (true, 1, 4));
}
