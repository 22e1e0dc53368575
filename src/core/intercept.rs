//! Pre/post interception of handle invocation.
//!
//! An [`Interceptor`] holds up to two hooks and, once constructed, a single
//! prebuilt closure implementing exactly one of three modes:
//!
//! | hooks     | `invoke()` on the wrapped handle                               |
//! |-----------|----------------------------------------------------------------|
//! | pre only  | pre (failure swallowed), then inner; inner's outcome returned  |
//! | post only | inner, then post on every exit path (failure swallowed)        |
//! | both      | pre, inner, post on every exit path; a failed pre skips post   |
//!
//! A hook fails by returning `Err` or by panicking. Neither ever reaches the
//! caller of `invoke()`; the inner work's `Ok`, `Err` or panic always does.
//! Hook errors are logged at debug level, hook panics at warn level.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use dispatch_timing::core::{Handle, Interceptor, Schedulable};
//!
//! let runs = Rc::new(Cell::new(0));
//! let r = runs.clone();
//! let interceptor = Interceptor::pre(move || {
//!     r.set(r.get() + 1);
//!     Ok(())
//! });
//! let wrapped = interceptor.intercept(Handle::new(|| Ok(())));
//! wrapped.invoke().unwrap();
//! assert_eq!(runs.get(), 1);
//! ```

use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

use super::{AppResult, HandleKind, InstrumentError, Schedulable};
use crate::infra::queue::Mapping;

/// A zero-argument side-effecting hook.
pub type Hook = Rc<dyn Fn() -> AppResult<()>>;

type Around = Rc<dyn Fn(&dyn Fn() -> AppResult<()>) -> AppResult<()>>;

/// Which hooks an [`Interceptor`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptMode {
    /// Only a pre-hook.
    Pre,
    /// Only a post-hook.
    Post,
    /// Both hooks.
    Both,
}

/// A pre/post hook pair installed around handle invocation.
#[derive(Clone)]
pub struct Interceptor {
    around: Around,
    mode: InterceptMode,
}

impl Interceptor {
    /// Build an interceptor from optional hooks.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::MissingHooks`] if both hooks are absent.
    pub fn new(pre: Option<Hook>, post: Option<Hook>) -> Result<Self, InstrumentError> {
        let (around, mode) = match (pre, post) {
            (Some(pre), Some(post)) => (around_both(pre, post), InterceptMode::Both),
            (Some(pre), None) => (around_pre(pre), InterceptMode::Pre),
            (None, Some(post)) => (around_post(post), InterceptMode::Post),
            (None, None) => return Err(InstrumentError::MissingHooks("pre_run", "post_run")),
        };
        Ok(Self { around, mode })
    }

    /// Interceptor with only a pre-hook.
    pub fn pre<F>(pre: F) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        Self::from_hooks(Some(Rc::new(pre)), None)
    }

    /// Interceptor with only a post-hook.
    pub fn post<F>(post: F) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        Self::from_hooks(None, Some(Rc::new(post)))
    }

    /// Interceptor with both hooks.
    pub fn around<F, G>(pre: F, post: G) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
        G: Fn() -> AppResult<()> + 'static,
    {
        Self::from_hooks(Some(Rc::new(pre)), Some(Rc::new(post)))
    }

    fn from_hooks(pre: Option<Hook>, post: Option<Hook>) -> Self {
        match Self::new(pre, post) {
            Ok(interceptor) => interceptor,
            Err(_) => unreachable!("at least one hook is always supplied"),
        }
    }

    /// Hooks this interceptor was built with.
    pub const fn mode(&self) -> InterceptMode {
        self.mode
    }

    /// Wrap `handle` so its invocation runs through this interceptor.
    pub fn intercept<H: Schedulable>(&self, handle: H) -> Intercepted<H> {
        Intercepted {
            handle,
            around: Rc::clone(&self.around),
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<H: Schedulable> Mapping<H, Intercepted<H>> for Interceptor {
    fn apply(&self, handle: H) -> Intercepted<H> {
        self.intercept(handle)
    }
}

/// Wrap `handle` with `interceptor`. The returned handle has the same
/// category as the input.
pub fn intercept<H: Schedulable>(handle: H, interceptor: &Interceptor) -> Intercepted<H> {
    interceptor.intercept(handle)
}

fn around_pre(pre: Hook) -> Around {
    Rc::new(move |inner: &dyn Fn() -> AppResult<()>| {
        run_hook(&*pre, "pre");
        inner()
    })
}

fn around_post(post: Hook) -> Around {
    Rc::new(move |inner: &dyn Fn() -> AppResult<()>| run_then(inner, &*post))
}

fn around_both(pre: Hook, post: Hook) -> Around {
    Rc::new(move |inner: &dyn Fn() -> AppResult<()>| {
        // Post pairs with a successful pre; nothing was started otherwise
        if run_hook(&*pre, "pre") {
            run_then(inner, &*post)
        } else {
            inner()
        }
    })
}

/// Run a hook, discarding its error or panic. Returns whether it succeeded.
fn run_hook(hook: &dyn Fn() -> AppResult<()>, stage: &'static str) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| hook())) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::debug!(stage, error = %err, "dispatch hook failed");
            false
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string panic payload");
            tracing::warn!(stage, reason, "dispatch hook panicked");
            false
        }
    }
}

/// Run `inner`, then `post` whichever way `inner` exits. A panic in `inner`
/// resumes once `post` has run.
fn run_then(inner: &dyn Fn() -> AppResult<()>, post: &dyn Fn() -> AppResult<()>) -> AppResult<()> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| inner()));
    run_hook(post, "post");
    match outcome {
        Ok(result) => result,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// A handle whose `invoke()` runs through an [`Interceptor`].
///
/// Everything else is delegated to the wrapped handle, including inherent
/// methods through `Deref`.
pub struct Intercepted<H> {
    handle: H,
    around: Around,
}

impl<H> Intercepted<H> {
    /// Unwrap, discarding the interception.
    pub fn into_inner(self) -> H {
        self.handle
    }
}

impl<H> Deref for Intercepted<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: Schedulable> Schedulable for Intercepted<H> {
    fn invoke(&self) -> AppResult<()> {
        (self.around)(&|| self.handle.invoke())
    }

    fn cancel(&self) {
        self.handle.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    fn kind(&self) -> HandleKind {
        self.handle.kind()
    }

    fn when(&self) -> Option<Instant> {
        self.handle.when()
    }
}

impl<H: fmt::Debug> fmt::Debug for Intercepted<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Intercepted").field(&self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Handle, TimerHandle};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn logger(log: &Log, entry: &'static str) -> impl Fn() -> AppResult<()> + 'static {
        let log = log.clone();
        move || {
            log.borrow_mut().push(entry);
            Ok(())
        }
    }

    fn failing(log: &Log, entry: &'static str) -> impl Fn() -> AppResult<()> + 'static {
        let log = log.clone();
        move || {
            log.borrow_mut().push(entry);
            Err(anyhow::anyhow!("{entry} failed"))
        }
    }

    #[test]
    fn test_no_hooks_is_error() {
        let err = Interceptor::new(None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "at least one of 'pre_run' or 'post_run' must be specified"
        );
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(Interceptor::pre(|| Ok(())).mode(), InterceptMode::Pre);
        assert_eq!(Interceptor::post(|| Ok(())).mode(), InterceptMode::Post);
        assert_eq!(
            Interceptor::around(|| Ok(()), || Ok(())).mode(),
            InterceptMode::Both
        );
    }

    #[test]
    fn test_order_for_plain_and_timer_handles() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::around(logger(&log, "pre"), logger(&log, "post"));

        interceptor
            .intercept(Handle::new(logger(&log, "run")))
            .invoke()
            .unwrap();
        interceptor
            .intercept(TimerHandle::new(Instant::now(), logger(&log, "run")))
            .invoke()
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["pre", "run", "post", "pre", "run", "post"]
        );
    }

    #[test]
    fn test_failing_pre_still_runs_inner() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::pre(failing(&log, "pre"));
        let wrapped = interceptor.intercept(Handle::new(logger(&log, "run")));
        assert!(wrapped.invoke().is_ok());
        assert_eq!(*log.borrow(), vec!["pre", "run"]);
    }

    #[test]
    fn test_panicking_pre_runs_inner_without_post() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::around(|| panic!("pre exploded"), logger(&log, "post"));
        let wrapped = interceptor.intercept(Handle::new(logger(&log, "run")));
        assert!(wrapped.invoke().is_ok());
        assert_eq!(*log.borrow(), vec!["run"]);
    }

    #[test]
    fn test_failing_pre_skips_post_in_both_mode() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::around(failing(&log, "pre"), logger(&log, "post"));
        let wrapped = interceptor.intercept(Handle::new(failing(&log, "run")));
        let err = wrapped.invoke().unwrap_err();
        assert_eq!(err.to_string(), "run failed");
        assert_eq!(*log.borrow(), vec!["pre", "run"]);
    }

    #[test]
    fn test_inner_error_propagates_after_post() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::post(logger(&log, "post"));
        let wrapped = interceptor.intercept(Handle::new(failing(&log, "run")));
        let err = wrapped.invoke().unwrap_err();
        assert_eq!(err.to_string(), "run failed");
        assert_eq!(*log.borrow(), vec!["run", "post"]);
    }

    #[test]
    fn test_inner_panic_runs_post_and_resumes() {
        let posts = Rc::new(Cell::new(0));
        let p = posts.clone();
        let interceptor = Interceptor::post(move || {
            p.set(p.get() + 1);
            Ok(())
        });
        let wrapped = interceptor.intercept(Handle::new(|| panic!("inner exploded")));
        let caught = panic::catch_unwind(AssertUnwindSafe(|| wrapped.invoke()));
        assert!(caught.is_err());
        assert_eq!(posts.get(), 1);
    }

    #[test]
    fn test_failing_post_never_masks_inner() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::around(logger(&log, "pre"), failing(&log, "post"));

        assert!(interceptor
            .intercept(Handle::new(logger(&log, "run")))
            .invoke()
            .is_ok());

        let err = interceptor
            .intercept(Handle::new(failing(&log, "run")))
            .invoke()
            .unwrap_err();
        assert_eq!(err.to_string(), "run failed");

        let panicking = Interceptor::post(|| panic!("post exploded"));
        assert!(panicking
            .intercept(Handle::new(|| Ok(())))
            .invoke()
            .is_ok());
    }

    #[test]
    fn test_pre_and_inner_failing_reports_inner() {
        let log: Log = Rc::default();
        let interceptor = Interceptor::pre(failing(&log, "pre"));
        let err = interceptor
            .intercept(Handle::new(failing(&log, "run")))
            .invoke()
            .unwrap_err();
        assert_eq!(err.to_string(), "run failed");
        assert_eq!(*log.borrow(), vec!["pre", "run"]);
    }

    #[test]
    fn test_wrapper_delegates_everything_else() {
        let when = Instant::now() + Duration::from_secs(1);
        let timer = TimerHandle::new(when, || Ok(()));
        let wrapped = intercept(timer.clone(), &Interceptor::post(|| Ok(())));

        assert_eq!(wrapped.kind(), HandleKind::Timer);
        assert_eq!(wrapped.when(), Some(when));
        assert_eq!(wrapped.deadline(), when);

        wrapped.cancel();
        assert!(timer.is_cancelled());
        assert!(wrapped.is_cancelled());
        assert_eq!(wrapped.into_inner(), timer);
    }
}
