//! Internal implementation details.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<&'static str>> = RefCell::new(Vec::new());
}

/// Runs a resolution step with `name` pushed on the thread-local resolution
/// stack, turning re-entrant resolution of the same key into
/// `DiError::Circular` with the full path.
pub(crate) fn with_cycle_guard<T>(
    name: &'static str,
    f: impl FnOnce() -> DiResult<T>,
) -> DiResult<T> {
    RESOLUTION_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.iter().any(|entry| *entry == name) {
            let mut path = stack.clone();
            path.push(name);
            return Err(DiError::Circular(path));
        }
        stack.push(name);
        Ok(())
    })?;

    // Pop on drop so a panicking factory unwinds the stack too.
    struct StackGuard;
    impl Drop for StackGuard {
        fn drop(&mut self) {
            RESOLUTION_STACK.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }
    let _guard = StackGuard;

    f()
}
