//! Typed middleware chains for hookable members.
//!
//! Every hookable member owns a [`HookPoint`]: an ordered list of `before`
//! interceptors that see the call arguments and `after` interceptors that see
//! the resolved value. Hooks observe; they cannot veto the call, replace its
//! result, or change its error.
//!
//! Hooks attached later wrap the ones attached earlier, so the newest
//! `before` hook runs first and the newest `after` hook runs last.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::network::{OutboundCommand, RemoteAddress};

type BeforeFn<A> = Arc<dyn Fn(&A) + Send + Sync>;
type AfterFn<R> = Arc<dyn Fn(&R) + Send + Sync>;

/// Registration point for one member taking `A` and resolving to `R`.
pub struct HookPoint<A, R> {
    member: String,
    before: RwLock<Vec<BeforeFn<A>>>,
    after: RwLock<Vec<AfterFn<R>>>,
}

impl<A, R> HookPoint<A, R> {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            before: RwLock::new(Vec::new()),
            after: RwLock::new(Vec::new()),
        }
    }

    /// Name of the wrapped member.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Run `hook` with the arguments of every call, before the member runs.
    pub fn intercept_before<F>(&self, hook: F)
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.before.write().push(Arc::new(hook));
    }

    /// Run `hook` with the result of every successful call.
    pub fn intercept_after<F>(&self, hook: F)
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.after.write().push(Arc::new(hook));
    }

    /// Number of attached hooks, before and after combined.
    pub fn len(&self) -> usize {
        self.before.read().len() + self.after.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the before-chain, newest first.
    pub fn run_before(&self, args: &A) {
        let hooks = self.before.read().clone();
        for hook in hooks.iter().rev() {
            hook(args);
        }
    }

    /// Run the after-chain, oldest first.
    pub fn run_after(&self, result: &R) {
        let hooks = self.after.read().clone();
        for hook in &hooks {
            hook(result);
        }
    }

    /// Drive one call of the member through the chain.
    ///
    /// An error from `body` is returned untouched and skips the after-chain.
    pub async fn call<F, Fut, E>(&self, args: A, body: F) -> Result<R, E>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.run_before(&args);
        let result = body(args).await?;
        self.run_after(&result);
        Ok(result)
    }
}

impl<A, R> std::fmt::Debug for HookPoint<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookPoint")
            .field("member", &self.member)
            .field("before", &self.before.read().len())
            .field("after", &self.after.read().len())
            .finish()
    }
}

/// The client's hook points.
///
/// The core members are fields; plugins that want their own commands to be
/// hookable register named points through [`Hooks::point`].
pub struct Hooks {
    pub connect: HookPoint<RemoteAddress, Option<RemoteAddress>>,
    pub send: HookPoint<OutboundCommand, Option<String>>,
    pub disconnect: HookPoint<(), ()>,
    custom: DashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            connect: HookPoint::new("connect"),
            send: HookPoint::new("send"),
            disconnect: HookPoint::new("disconnect"),
            custom: DashMap::new(),
        }
    }

    /// Get or create the named hook point for a plugin member.
    ///
    /// Returns `None` if `member` was already registered with other types.
    pub fn point<A, R>(&self, member: &str) -> Option<Arc<HookPoint<A, R>>>
    where
        A: Send + Sync + 'static,
        R: Send + Sync + 'static,
    {
        let point = Arc::clone(
            &*self
                .custom
                .entry(member.to_owned())
                .or_insert_with(|| {
                    Arc::new(HookPoint::<A, R>::new(member)) as Arc<dyn Any + Send + Sync>
                }),
        );
        point.downcast::<HookPoint<A, R>>().ok()
    }

    /// Names of plugin-registered hook points.
    pub fn custom_members(&self) -> Vec<String> {
        self.custom.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("connect", &self.connect)
            .field("send", &self.send)
            .field("disconnect", &self.disconnect)
            .field("custom", &self.custom_members())
            .finish()
    }
}
