//=========================================================================
// Input Manager
//
// Routes platform input events to the listeners that asked for them.
//
// Responsibilities:
// - Maintain the set of registered listeners (idempotent add / remove)
// - Keep one ordered interest chain per event type (registration order)
// - Hook / unhook an event type as its chain becomes non-empty / empty
// - Preserve application-level handlers and run them after dispatch
// - Gate dispatch on the pointer-lock policy
//
// Architecture:
// ```text
//   Platform ──dispatch(event)──► InputManager
//                                   ├─ hooked?   no ──► global handler only
//                                   ├─ gated?    yes ─► (dropped)
//                                   ├─ chain snapshot ─► listener.on_input()
//                                   └─ global handler (if any)
// ```
//
// Notes:
// Dispatch iterates over a snapshot of the chain and re-checks each
// listener's registration before invoking it, so listeners may add or
// remove registrations (including their own) mid-dispatch.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

//=== External Crates =====================================================

use log::{debug, trace};

//=== Internal Imports ====================================================

use super::event::{InputEvent, InputEventType};
use super::pointer_lock::PointerLock;
use super::InputListener;
use crate::core::globals::GlobalContext;

//=== ListenerId ==========================================================

/// Identity of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

//=== Dispatch ============================================================

/// Outcome of a single [`InputManager::dispatch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No listener chain exists for the event type.
    Unhooked,

    /// Pointer lock is required but not held; no listener ran, only the
    /// global handler.
    Blocked,

    /// Listeners ran; carries how many handlers were invoked.
    Delivered(usize),
}

/// Application-level handler kept alongside the listener chains.
pub type GlobalHandler = Box<dyn FnMut(&InputEvent)>;

//=== InputManager ========================================================

/// Registry and dispatcher for input listeners.
///
/// Generic over the listener object type so the view manager can store
/// `dyn View` listeners while standalone users store any
/// [`InputListener`].
pub struct InputManager<L: ?Sized + InputListener> {
    listeners: HashMap<ListenerId, Rc<RefCell<L>>>,
    chains: HashMap<InputEventType, Vec<ListenerId>>,
    global_handlers: HashMap<InputEventType, GlobalHandler>,
    pointer_lock: PointerLock,
}

impl<L: ?Sized + InputListener> InputManager<L> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            chains: HashMap::new(),
            global_handlers: HashMap::new(),
            pointer_lock: PointerLock::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a listener under `id`.
    ///
    /// The listener's [`input_interests`](InputListener::input_interests)
    /// are read once, here; each interested event type is hooked if it was
    /// not already, and the listener is appended to that type's chain.
    /// Registering an id that is already registered does nothing.
    pub fn add_listener(&mut self, id: ListenerId, listener: Rc<RefCell<L>>) {
        if self.listeners.contains_key(&id) {
            return;
        }

        let interests: Vec<InputEventType> = listener.borrow().input_interests().to_vec();
        for kind in interests {
            let chain = self.chains.entry(kind).or_insert_with(|| {
                debug!(target: "input", "Hooked {}", kind);
                Vec::new()
            });
            if !chain.contains(&id) {
                chain.push(id);
            }
        }

        debug!(target: "input", "Registered {}", id);
        self.listeners.insert(id, listener);
    }

    /// Unregisters a listener from every chain.
    ///
    /// Event types whose chain becomes empty are unhooked; their global
    /// handler, if any, keeps receiving events directly. Removing an id
    /// that was never registered does nothing.
    pub fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_none() {
            return;
        }

        self.chains.retain(|kind, chain| {
            chain.retain(|entry| *entry != id);
            if chain.is_empty() {
                debug!(target: "input", "Unhooked {}", kind);
                false
            } else {
                true
            }
        });

        debug!(target: "input", "Unregistered {}", id);
    }

    /// Returns `true` if `id` is currently registered.
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Returns `true` if at least one listener is interested in `kind`.
    pub fn is_hooked(&self, kind: InputEventType) -> bool {
        self.chains.contains_key(&kind)
    }

    /// Listeners interested in `kind`, in registration order.
    pub fn listeners_for(&self, kind: InputEventType) -> &[ListenerId] {
        self.chains.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    //--- Global Handlers --------------------------------------------------

    /// Installs the application-level handler for `kind`.
    ///
    /// It runs for every event of that kind: after the listener chain
    /// while the type is hooked, and alone while it is not or while the
    /// pointer-lock gate drops the event.
    pub fn set_global_handler<F>(&mut self, kind: InputEventType, handler: F)
    where
        F: FnMut(&InputEvent) + 'static,
    {
        self.global_handlers.insert(kind, Box::new(handler));
    }

    /// Removes the application-level handler for `kind`, returning it.
    pub fn take_global_handler(&mut self, kind: InputEventType) -> Option<GlobalHandler> {
        self.global_handlers.remove(&kind)
    }

    //--- Pointer Lock -----------------------------------------------------

    /// Opts in to pointer-lock gating for all subsequent dispatch.
    pub fn require_pointer_lock(&mut self) {
        debug!(target: "input", "Pointer lock is now required for input");
        self.pointer_lock.require();
    }

    pub fn pointer_lock(&self) -> &PointerLock {
        &self.pointer_lock
    }

    /// Records a lock-state change reported by the platform.
    pub fn pointer_lock_changed(&mut self, held: bool, now: Duration) {
        if self.pointer_lock.set_held(held, now) {
            debug!(target: "input", "Pointer lock {}", if held { "acquired" } else { "released" });
        }
    }

    /// Called by the platform on every pointer-down.
    ///
    /// Returns `true` if the platform should request pointer lock now.
    pub fn on_pointer_down(&self, now: Duration) -> bool {
        self.pointer_lock.should_request(now)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Delivers `event` to every listener interested in its type.
    ///
    /// Listeners run in registration order. A listener unregistered by an
    /// earlier handler of the same dispatch is skipped; one registered
    /// during the dispatch waits for the next event.
    pub fn dispatch(&mut self, event: &InputEvent, ctx: &mut GlobalContext) -> Dispatch {
        let kind = event.kind();

        let Some(chain) = self.chains.get(&kind) else {
            self.run_global_handler(kind, event);
            return Dispatch::Unhooked;
        };

        if !self.pointer_lock.allows_input() {
            trace!(target: "input", "Withheld {} from listeners (pointer lock not held)", kind);
            self.run_global_handler(kind, event);
            return Dispatch::Blocked;
        }

        let snapshot = chain.clone();
        let mut delivered = 0;

        for id in snapshot {
            let Some(listener) = self.listeners.get(&id).cloned() else {
                continue;
            };

            let previous = ctx.enter_listener(Some(id));
            listener.borrow_mut().on_input(event, ctx);
            ctx.enter_listener(previous);
            delivered += 1;

            for stopped in ctx.take_stop_requests() {
                self.remove_listener(stopped);
            }
        }

        trace!(target: "input", "Dispatched {} to {} listener(s)", kind, delivered);

        self.run_global_handler(kind, event);
        Dispatch::Delivered(delivered)
    }

    //--- Internal Helpers -------------------------------------------------

    fn run_global_handler(&mut self, kind: InputEventType, event: &InputEvent) {
        if let Some(handler) = self.global_handlers.get_mut(&kind) {
            handler(event);
        }
    }
}

impl<L: ?Sized + InputListener> Default for InputManager<L> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait ==========================================================
//
// Prints registration state only; listener objects are opaque.
//
impl<L: ?Sized + InputListener> fmt::Debug for InputManager<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooked: Vec<_> = self.chains.keys().copied().collect();
        hooked.sort();

        f.debug_struct("InputManager")
            .field("listeners", &self.listeners.len())
            .field("hooked", &hooked)
            .field("pointer_lock", &self.pointer_lock)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
