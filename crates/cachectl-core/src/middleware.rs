//! Middleware trait and pipeline.

use std::cell::Cell;
use std::fmt;

/// Continuation handed to a middleware.
///
/// Calling [`Next::run`] passes control onward. Dropping it without running
/// stops the pipeline at the current middleware.
pub struct Next<'a> {
    f: Box<dyn FnOnce() + 'a>,
}

impl<'a> Next<'a> {
    /// Wrap a continuation callback.
    pub fn new(f: impl FnOnce() + 'a) -> Self {
        Self { f: Box::new(f) }
    }

    /// A continuation that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Pass control onward.
    pub fn run(self) {
        (self.f)()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Response middleware.
///
/// Follows the common `(request, response, next)` convention. `next` takes no
/// arguments: middleware finishes its work on `res` synchronously and then
/// signals completion.
pub trait Middleware<Req: ?Sized, Res: ?Sized> {
    /// Handle one request/response pair.
    fn handle(&self, req: &Req, res: &mut Res, next: Next<'_>);
}

impl<Req: ?Sized, Res: ?Sized, M: Middleware<Req, Res> + ?Sized> Middleware<Req, Res> for Box<M> {
    fn handle(&self, req: &Req, res: &mut Res, next: Next<'_>) {
        (**self).handle(req, res, next)
    }
}

/// Ordered middleware pipeline ending in a terminal handler.
pub struct Chain<Req: ?Sized, Res: ?Sized> {
    layers: Vec<Box<dyn Middleware<Req, Res> + Send + Sync>>,
}

impl<Req: ?Sized, Res: ?Sized> Default for Chain<Req, Res> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<Req: ?Sized, Res: ?Sized> Chain<Req, Res> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware.
    pub fn with(mut self, layer: impl Middleware<Req, Res> + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the chain has no middleware.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run every middleware in order, then `handler`.
    ///
    /// Returns `false` if a middleware did not call `next`, in which case the
    /// remaining middleware and the handler are skipped.
    pub fn run<F>(&self, req: &Req, res: &mut Res, handler: F) -> bool
    where
        F: FnOnce(&Req, &mut Res),
    {
        for (index, layer) in self.layers.iter().enumerate() {
            let proceed = Cell::new(false);
            layer.handle(req, res, Next::new(|| proceed.set(true)));
            if !proceed.get() {
                tracing::debug!(index, "middleware chain stopped before handler");
                return false;
            }
        }

        handler(req, res);
        true
    }
}

impl<Req: ?Sized, Res: ?Sized> fmt::Debug for Chain<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("layers", &self.layers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Response, ResponseHeaders};

    struct SetHeader(&'static str, &'static str);

    impl<Req: ?Sized, Res: ResponseHeaders + ?Sized> Middleware<Req, Res> for SetHeader {
        fn handle(&self, _req: &Req, res: &mut Res, next: Next<'_>) {
            res.set_header(self.0, self.1);
            next.run();
        }
    }

    struct Halt;

    impl<Req: ?Sized, Res: ?Sized> Middleware<Req, Res> for Halt {
        fn handle(&self, _req: &Req, _res: &mut Res, _next: Next<'_>) {}
    }

    // === Next Tests ===

    #[test]
    fn test_next_runs_callback_once() {
        let calls = Cell::new(0);
        let next = Next::new(|| calls.set(calls.get() + 1));
        next.run();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_next_noop() {
        Next::noop().run();
    }

    // === Chain Tests ===

    #[test]
    fn test_chain_runs_in_order() {
        let chain: Chain<(), Response> = Chain::new()
            .with(SetHeader("X-Step", "first"))
            .with(SetHeader("X-Step", "second"));

        let mut res = Response::new(200);
        let mut handled = false;
        assert!(chain.run(&(), &mut res, |_, _| handled = true));

        assert!(handled);
        assert_eq!(res.header("X-Step"), Some("second"));
    }

    #[test]
    fn test_chain_short_circuits() {
        let chain: Chain<(), Response> = Chain::new()
            .with(Halt)
            .with(SetHeader("X-Late", "1"));

        let mut res = Response::new(200);
        let mut handled = false;
        assert!(!chain.run(&(), &mut res, |_, _| handled = true));

        assert!(!handled);
        assert_eq!(res.header("X-Late"), None);
    }

    #[test]
    fn test_empty_chain_calls_handler() {
        let chain: Chain<str, Response> = Chain::new();
        assert!(chain.is_empty());

        let mut res = Response::new(200);
        assert!(chain.run("GET /", &mut res, |req, res| {
            res.set_header("X-Path", req);
        }));
        assert_eq!(res.header("x-path"), Some("GET /"));
    }

    #[test]
    fn test_boxed_middleware() {
        let boxed: Box<dyn Middleware<(), Response>> = Box::new(SetHeader("X-Boxed", "yes"));
        let mut res = Response::new(200);
        boxed.handle(&(), &mut res, Next::noop());
        assert_eq!(res.header("X-Boxed"), Some("yes"));
    }
}
