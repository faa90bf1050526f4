//! Host Integration
//!
//! The boundary between the runtime and whatever displays its output. A host
//! supplies a [`Mount`] point; [`render`] creates one runtime, evaluates the
//! component inside it and appends the resulting root node.
//!
//! The returned [`Runtime`] owns every effect the component registered. The
//! host must keep it for as long as the mounted tree should stay reactive:
//! signals only hold a weak reference, so once the runtime is dropped every
//! later `get`/`set` on them panics.

use tracing::debug;

use crate::config::RuntimeConfig;
use crate::reactive::Runtime;

/// A place in the host's display tree that accepts child nodes.
pub trait Mount {
    /// The host's node type.
    type Node;

    /// Attach `node` as the last child of this mount point.
    fn append_child(&mut self, node: Self::Node);
}

/// Headless mount: children are collected in order.
impl<N> Mount for Vec<N> {
    type Node = N;

    fn append_child(&mut self, node: N) {
        self.push(node);
    }
}

/// Render `component` into `mount` with a fresh, default-configured runtime.
///
/// Keep the returned runtime alive for as long as the output should react.
///
/// # Example
///
/// ```rust
/// use sprout_core::render;
///
/// let mut root: Vec<String> = Vec::new();
/// let rt = render(|rt| format!("count: {}", rt.create_signal(0).get()), &mut root);
///
/// assert_eq!(root, vec!["count: 0".to_string()]);
/// assert_eq!(rt.signal_count(), 1);
/// ```
#[must_use = "dropping the runtime disables every effect the component registered"]
pub fn render<M, C>(component: C, mount: &mut M) -> Runtime
where
    M: Mount + ?Sized,
    C: FnOnce(&Runtime) -> M::Node,
{
    render_with_config(RuntimeConfig::default(), component, mount)
}

/// Render `component` into `mount` with a runtime built from `config`.
///
/// Keep the returned runtime alive for as long as the output should react.
#[must_use = "dropping the runtime disables every effect the component registered"]
pub fn render_with_config<M, C>(config: RuntimeConfig, component: C, mount: &mut M) -> Runtime
where
    M: Mount + ?Sized,
    C: FnOnce(&Runtime) -> M::Node,
{
    let runtime = Runtime::with_config(config);
    let root = component(&runtime);
    mount.append_child(root);

    debug!(
        runtime = %runtime.id(),
        signals = runtime.signal_count(),
        effects = runtime.effect_count(),
        "component mounted"
    );
    runtime
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config::SubscriptionPolicy;
    use crate::error::ReactiveError;
    use crate::reactive::Signal;

    #[test]
    fn render_creates_one_runtime_per_call() {
        let mut root: Vec<u32> = Vec::new();

        let rt1 = render(|_| 1, &mut root);
        let rt2 = render(|_| 2, &mut root);

        assert_eq!(root, vec![1, 2]);
        assert_ne!(rt1.id(), rt2.id());
    }

    #[test]
    fn component_runs_inside_its_runtime() {
        let mut root: Vec<Rc<RefCell<String>>> = Vec::new();

        let rt = render(
            |rt| {
                let count = rt.create_signal(0);
                let text = Rc::new(RefCell::new(String::new()));

                let (count_clone, text_clone) = (count.clone(), text.clone());
                rt.create_effect(move || {
                    *text_clone.borrow_mut() = format!("count: {}", count_clone.get());
                });
                text
            },
            &mut root,
        );

        assert_eq!(*root[0].borrow(), "count: 0");
        assert_eq!(rt.signal_count(), 1);
        assert_eq!(rt.effect_count(), 1);
    }

    #[test]
    fn dropped_runtime_disables_mounted_handlers() {
        let mut root: Vec<Signal<i32>> = Vec::new();

        let rt = render(|rt| rt.create_signal(0), &mut root);
        let count = root[0].clone();

        count.update(|c| c + 1);
        assert_eq!(count.get(), 1);

        let runtime_id = rt.id();
        drop(rt);
        assert_eq!(
            count.try_set(2),
            Err(ReactiveError::RuntimeDropped {
                signal: count.id(),
                runtime: runtime_id,
            })
        );
    }

    #[test]
    fn render_with_config_applies_policy() {
        let mut root: Vec<()> = Vec::new();
        let config =
            RuntimeConfig::default().with_subscription_policy(SubscriptionPolicy::ClearOnRerun);

        let rt = render_with_config(config, |_| (), &mut root);
        assert_eq!(rt.config().subscription_policy, SubscriptionPolicy::ClearOnRerun);
    }
}
