//! Default-value synthesis for vetoed calls.

use crate::shape::Returnable;

/// Produce the "nothing happened" result for a declared return type.
///
/// Invoked only when the gate vetoes a call. The result is observably
/// equivalent to the call having happened and immediately produced the
/// shape's default: `()` for void, `T::default()` for values, and an
/// already-completed deferred carrying the inner default for the four
/// deferred shapes. None of the hooks run on this path.
pub fn synthesize<R: Returnable>() -> R {
    R::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::{Deferred, LightDeferred};
    use futures::executor::block_on;

    #[test]
    fn value_defaults() {
        assert_eq!(synthesize::<i32>(), 0);
        assert_eq!(synthesize::<String>(), "");
        synthesize::<()>();
    }

    #[test]
    fn deferred_defaults_are_already_completed() {
        assert_eq!(block_on(synthesize::<Deferred<i32>>()).unwrap(), 0);
        block_on(synthesize::<Deferred<()>>()).unwrap();

        let light = synthesize::<LightDeferred<u64>>();
        assert!(light.is_ready());
        assert_eq!(block_on(light).unwrap(), 0);
    }
}
