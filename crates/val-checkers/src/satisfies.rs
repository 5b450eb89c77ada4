//! Building blocks for leaf checks.

use crate::mold::Mold;
use serde_json::Value;
use std::borrow::Cow;
use val_kernel::{Check, EvalContext, ResultMap, ValError};

/// Clean when `test` holds for the input, otherwise the mold's result.
///
/// A mold without a key fails the evaluation with `InvalidArgument` the
/// first time the test does not hold.
pub fn satisfies<T>(mold: Mold, test: T) -> Check
where
    T: Fn(&Value, &EvalContext) -> bool + Send + Sync + 'static,
{
    predicate("satisfies", mold, test)
}

/// Clean when `test` holds, otherwise whatever `on_fail` reports.
pub fn satisfies_with<T, F>(test: T, on_fail: F) -> Check
where
    T: Fn(&Value, &EvalContext) -> bool + Send + Sync + 'static,
    F: Fn(&Value, &EvalContext) -> Result<ResultMap, ValError> + Send + Sync + 'static,
{
    guarded("satisfies", test, on_fail)
}

/// [`satisfies`] under a diagnostic name.
pub(crate) fn predicate<T>(name: impl Into<Cow<'static, str>>, mold: Mold, test: T) -> Check
where
    T: Fn(&Value, &EvalContext) -> bool + Send + Sync + 'static,
{
    guarded(name, test, move |input, _| mold.render(input))
}

pub(crate) fn guarded<T, F>(name: impl Into<Cow<'static, str>>, test: T, on_fail: F) -> Check
where
    T: Fn(&Value, &EvalContext) -> bool + Send + Sync + 'static,
    F: Fn(&Value, &EvalContext) -> Result<ResultMap, ValError> + Send + Sync + 'static,
{
    Check::named(name, move |input, ctx| {
        if test(input, &*ctx) {
            Ok(ResultMap::clean())
        } else {
            on_fail(input, &*ctx)
        }
    })
}
