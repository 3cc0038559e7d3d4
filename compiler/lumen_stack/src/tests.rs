use super::*;

/// Linked list of boxed nodes, shaped like a chain of nested expressions.
enum Chain {
    Link(Box<Chain>),
    End,
}

fn build_chain(depth: usize) -> Chain {
    let mut chain = Chain::End;
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn chain_depth(chain: &Chain) -> usize {
    ensure_sufficient_stack(|| match chain {
        Chain::Link(next) => chain_depth(next) + 1,
        Chain::End => 0,
    })
}

fn unlink(chain: Chain) {
    // Iterative drop; the default recursive drop would overflow on its own.
    let mut current = chain;
    while let Chain::Link(next) = current {
        current = *next;
    }
}

#[test]
fn test_shallow_walk() {
    let chain = build_chain(16);
    assert_eq!(chain_depth(&chain), 16);
    unlink(chain);
}

#[test]
fn test_deep_walk() {
    // Would overflow a typical 8MB main-thread stack without growth
    let chain = build_chain(200_000);
    assert_eq!(chain_depth(&chain), 200_000);
    unlink(chain);
}

#[test]
fn test_returns_closure_result() {
    assert_eq!(ensure_sufficient_stack(|| "done"), "done");
}

#[test]
fn test_works_with_result_type() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("contract"));
    assert_eq!(result, Err("contract"));
}
