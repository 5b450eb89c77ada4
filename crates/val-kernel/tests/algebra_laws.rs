//! Laws of the check algebra: the ResultMap monoid, short-circuiting of the
//! combinators, flattening, traversal, and stash visibility.

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use val_kernel::{
    Check, CheckResult, ComposedCheck, ComposedKind, EvalContext, ResultMap, ValError, code,
};

fn result(msg: &str, code: &str) -> CheckResult {
    CheckResult::new(msg, code).expect("valid result")
}

fn map(entries: &[(&str, &[&str])]) -> ResultMap {
    ResultMap::from_map(entries.iter().map(|(key, msgs)| {
        (
            key.to_string(),
            msgs.iter()
                .map(|m| result(m, code::ILLEGAL_VALUE))
                .collect::<Vec<_>>(),
        )
    }))
    .expect("valid map")
}

/// A check returning `output` that counts its invocations.
fn counted(output: ResultMap) -> (Check, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let check = Check::named("counted", move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(output.clone())
    });
    (check, calls)
}

fn failing() -> ResultMap {
    map(&[("f", &["failed"])])
}

// ── ResultMap monoid ──────────────────────────────────────────────────────

#[test]
fn clean_is_the_identity_of_plus() {
    let a = map(&[("x", &["1", "2"]), ("y", &["3"])]);
    assert_eq!(a.clone().plus(ResultMap::clean()), a);
    assert_eq!(ResultMap::clean().plus(a.clone()), a);
    assert!(ResultMap::clean().plus(ResultMap::clean()).is_clean());
}

#[test]
fn plus_is_associative_under_left_to_right_order() {
    let a = map(&[("x", &["a1"]), ("y", &["a2"])]);
    let b = map(&[("y", &["b1"]), ("z", &["b2"])]);
    let c = map(&[("z", &["c1"]), ("x", &["c2"]), ("w", &["c3"])]);

    let left = (a.clone() + b.clone()) + c.clone();
    let right = a + (b + c);
    assert_eq!(left, right);

    // The concrete order rule holds literally, not just as multisets.
    assert_eq!(
        left.keys().collect::<Vec<_>>(),
        right.keys().collect::<Vec<_>>()
    );
    assert_eq!(left.keys().collect::<Vec<_>>(), vec!["x", "y", "z", "w"]);
    let messages = |key: &str| -> Vec<String> {
        left.get(key)
            .unwrap()
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    };
    assert_eq!(messages("x"), vec!["a1", "c2"]);
    assert_eq!(messages("y"), vec!["a2", "b1"]);
    assert_eq!(messages("z"), vec!["b2", "c1"]);
}

#[test]
fn serialized_result_map_keeps_merge_order() {
    let merged = map(&[("b", &["first"])]) + map(&[("a", &["second"]), ("b", &["third"])]);
    insta::assert_json_snapshot!(merged, @r#"
    {
      "b": [
        {
          "message": "first",
          "code": "ILLEGAL_VALUE"
        },
        {
          "message": "third",
          "code": "ILLEGAL_VALUE"
        }
      ],
      "a": [
        {
          "message": "second",
          "code": "ILLEGAL_VALUE"
        }
      ]
    }
    "#);
}

// ── Combinator short-circuiting ──────────────────────────────────────────

#[test]
fn and_skips_other_after_a_failure() {
    let (first, _) = counted(failing());
    let (second, second_calls) = counted(ResultMap::clean());
    let result = first.and(second).evaluate(&json!(1)).unwrap();
    assert_eq!(result, failing());
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn and_returns_other_result_when_first_is_clean() {
    let (first, _) = counted(ResultMap::clean());
    let (second, second_calls) = counted(failing());
    let result = first.and(second).evaluate(&json!(1)).unwrap();
    assert_eq!(result, failing());
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn or_skips_other_after_a_pass() {
    let (first, _) = counted(ResultMap::clean());
    let (second, second_calls) = counted(failing());
    let result = first.or(second).evaluate(&json!(1)).unwrap();
    assert!(result.is_clean());
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn or_discards_first_failure_detail() {
    let (first, _) = counted(map(&[("first", &["no"])]));
    let (second, _) = counted(map(&[("second", &["no"])]));
    let result = first.or(second).evaluate(&json!(1)).unwrap();
    assert_eq!(result, map(&[("second", &["no"])]));
}

#[test]
fn plus_always_evaluates_both() {
    let (first, first_calls) = counted(map(&[("f", &["one"])]));
    let (second, second_calls) = counted(map(&[("f", &["two"])]));
    let result = first.plus(second).evaluate(&json!(1)).unwrap();
    assert_eq!(result, map(&[("f", &["one", "two"])]));
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);

    let (clean_a, a_calls) = counted(ResultMap::clean());
    let (clean_b, b_calls) = counted(ResultMap::clean());
    assert!(clean_a.plus(clean_b).evaluate(&json!(1)).unwrap().is_clean());
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_or_is_clean() {
    let check = Check::Composed(ComposedCheck::new(ComposedKind::Or, Vec::new()));
    assert!(check.evaluate(&json!("anything")).unwrap().is_clean());
}

// ── Flattening ───────────────────────────────────────────────────────────

#[test]
fn same_kind_operands_flatten_one_level() {
    let c: Vec<Check> = (0..4)
        .map(|_| Check::from_fn(|_, _| Ok(ResultMap::clean())))
        .collect();
    let left = Check::Composed(ComposedCheck::new(
        ComposedKind::All,
        [c[0].clone(), c[1].clone()],
    ));
    let right = Check::Composed(ComposedCheck::new(
        ComposedKind::All,
        [c[2].clone(), c[3].clone(), c[0].clone()],
    ));
    let merged = ComposedCheck::merge(ComposedKind::All, left, right);

    let expected = [&c[0], &c[1], &c[2], &c[3], &c[0]];
    assert_eq!(merged.members().len(), expected.len());
    for (member, want) in merged.members().iter().zip(expected) {
        assert!(member.ptr_eq(want));
    }
}

#[test]
fn mixed_kinds_do_not_flatten() {
    let a = Check::from_fn(|_, _| Ok(ResultMap::clean()));
    let b = Check::from_fn(|_, _| Ok(ResultMap::clean()));
    let inner = a.clone().and(b.clone());
    let merged = inner.clone().plus(a.clone());

    let members = merged.members().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members[0].ptr_eq(&inner));
    assert_eq!(members[0].members().unwrap().len(), 2);
    assert!(members[1].ptr_eq(&a));
}

#[test]
fn chained_combinators_stay_flat() {
    let checks: Vec<Check> = (0..3)
        .map(|_| Check::from_fn(|_, _| Ok(ResultMap::clean())))
        .collect();
    let chained = checks[0]
        .clone()
        .or(checks[1].clone())
        .or(checks[2].clone());
    assert_eq!(chained.members().unwrap().len(), 3);
}

// ── Traversal ────────────────────────────────────────────────────────────

#[test]
fn child_traverser_propagates_null() {
    let (nested, calls) = counted(failing());
    let seen_null = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&seen_null);
    let probe = Check::from_fn(move |input, _| {
        if input.is_null() {
            seen.fetch_add(1, Ordering::SeqCst);
        }
        Ok(ResultMap::clean())
    });
    let check = Check::child("x", nested.plus(probe));

    let result = check.call(&Value::Null, &mut EvalContext::new()).unwrap();
    assert_eq!(result, failing());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(seen_null.load(Ordering::SeqCst), 1);
}

#[test]
fn child_traverser_rejects_scalar_input() {
    let check = Check::child("x", Check::from_fn(|_, _| Ok(ResultMap::clean())));
    let err = check.evaluate(&json!(5)).unwrap_err();
    assert_eq!(
        err,
        ValError::ShapeMismatch {
            child: "x".to_string(),
            found: "integer",
        }
    );
}

#[test]
fn nested_children_walk_the_graph() {
    let leaf = Check::from_fn(|input, _| {
        if input == &json!("deep") {
            Ok(ResultMap::clean())
        } else {
            Ok(map(&[("a.b", &["unexpected"])]))
        }
    });
    let check = Check::nop(Check::child("a", Check::child("b", leaf)));
    assert!(check.evaluate(&json!({"a": {"b": "deep"}})).unwrap().is_clean());
    assert!(!check.evaluate(&json!({"a": {}})).unwrap().is_clean());
}

// ── Stash ────────────────────────────────────────────────────────────────

#[test]
fn stash_is_visible_to_later_siblings() {
    let writer = Check::from_fn(|input, ctx| {
        ctx.set_stashed("k", input.clone())?;
        Ok(ResultMap::clean())
    });
    let reader = Check::from_fn(|_, ctx| match ctx.get_stashed("k") {
        Some(v) if v == &json!("v") => Ok(ResultMap::clean()),
        _ => Ok(map(&[("k", &["stash not visible"])])),
    });
    assert!(writer.plus(reader).evaluate(&json!("v")).unwrap().is_clean());
}

#[test]
fn transformer_stash_crosses_branches() {
    let password = val_kernel::TransformerCheck::child(
        "password",
        Check::from_fn(|_, _| Ok(ResultMap::clean())),
    )
    .with_stash("password")
    .unwrap();
    let confirm = Check::child(
        "confirm",
        Check::from_fn(|input, ctx| {
            if ctx.get_stashed("password") == Some(input) {
                Ok(ResultMap::clean())
            } else {
                Ok(map(&[("confirm", &["does not match password"])]))
            }
        }),
    );
    let check = Check::from(password).plus(confirm);

    assert!(
        check
            .evaluate(&json!({"password": "s3cret", "confirm": "s3cret"}))
            .unwrap()
            .is_clean()
    );
    assert_eq!(
        check
            .evaluate(&json!({"password": "s3cret", "confirm": "other"}))
            .unwrap(),
        map(&[("confirm", &["does not match password"])])
    );
}

#[test]
fn fresh_contexts_do_not_share_stash() {
    let unseen = Check::named("unseen", |_, ctx| {
        if ctx.get_stashed("k").is_some() {
            ResultMap::of("k", result("already stashed", code::ILLEGAL_VALUE))
        } else {
            Ok(ResultMap::clean())
        }
    });
    let stasher = val_kernel::TransformerCheck::nop(Check::from_fn(|_, _| Ok(ResultMap::clean())))
        .with_stash("k")
        .unwrap();
    let check = unseen.plus(stasher.into());

    assert!(check.evaluate(&json!(1)).unwrap().is_clean());
    assert!(check.evaluate(&json!(2)).unwrap().is_clean());

    let mut reused = EvalContext::new();
    assert!(check.call(&json!(1), &mut reused).unwrap().is_clean());
    assert_eq!(reused.get_stashed("k"), Some(&json!(1)));
    assert!(!check.call(&json!(2), &mut reused).unwrap().is_clean());
}

// ── Errors and concurrency ───────────────────────────────────────────────

#[test]
fn configuration_errors_abort_evaluation() {
    let (after, after_calls) = counted(ResultMap::clean());
    let broken = Check::from_fn(|_, _| Err(ValError::invalid("mold key must be present")));
    let err = broken.plus(after).evaluate(&json!(1)).unwrap_err();
    assert!(matches!(err, ValError::InvalidArgument(_)));
    assert_eq!(after_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn one_tree_serves_concurrent_evaluations() {
    let check = Check::child(
        "n",
        Check::from_fn(|input, ctx| {
            ctx.set_stashed("n", input.clone())?;
            let n = input.as_i64().unwrap_or(-1);
            if ctx.get_stashed("n").and_then(Value::as_i64) != Some(n) {
                return Ok(map(&[("n", &["stash leaked across evaluations"])]));
            }
            if n % 2 == 0 {
                Ok(ResultMap::clean())
            } else {
                Ok(map(&[("n", &["odd"])]))
            }
        }),
    );

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let check = &check;
                scope.spawn(move || {
                    (0..50)
                        .map(|j| {
                            let n = i * 50 + j;
                            let mut ctx = EvalContext::new();
                            let result = check.call(&json!({ "n": n }), &mut ctx).unwrap();
                            (n, result)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for (n, result) in handle.join().unwrap() {
                assert_eq!(result.is_clean(), n % 2 == 0, "n = {n}");
            }
        }
    });
}
