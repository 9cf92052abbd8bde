//=========================================================================
// Command Queue
//=========================================================================
//
// Queue for view requests issued from inside hooks.
//
// Hooks run while the view manager is mutably borrowed, so they cannot
// call it directly. They queue commands here instead; the manager drains
// the queue after each update pass, input dispatch and focus change.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{View, ViewId};

//=== ViewCommand =========================================================

/// A deferred view-manager request.
pub enum ViewCommand {
    /// Transition `layer` to a new view that has already been given `id`.
    TransitionTo {
        id: ViewId,
        view: Rc<RefCell<dyn View>>,
        layer: usize,
    },

    /// Exit the given view (must be owned by a layer when executed).
    ExitView(ViewId),

    /// Exit whatever occupies the layer.
    ClearLayer(usize),

    /// Open a popup above the top-most layer.
    OpenPopup {
        id: ViewId,
        view: Rc<RefCell<dyn View>>,
    },

    /// Close the open popup.
    ClosePopup,
}

impl fmt::Debug for ViewCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransitionTo { id, layer, .. } => f
                .debug_struct("TransitionTo")
                .field("id", id)
                .field("layer", layer)
                .finish_non_exhaustive(),
            Self::ExitView(id) => f.debug_tuple("ExitView").field(id).finish(),
            Self::ClearLayer(layer) => f.debug_tuple("ClearLayer").field(layer).finish(),
            Self::OpenPopup { id, .. } => f
                .debug_struct("OpenPopup")
                .field("id", id)
                .finish_non_exhaustive(),
            Self::ClosePopup => f.write_str("ClosePopup"),
        }
    }
}

//=== CommandQueue ========================================================

/// FIFO queue of [`ViewCommand`]s.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<ViewCommand>,
}

impl CommandQueue {
    /// Creates a new empty command queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a command to be processed at the next drain.
    pub fn push(&mut self, command: ViewCommand) {
        self.queue.push(command);
    }

    /// Whether any queued command matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&ViewCommand) -> bool) -> bool {
        self.queue.iter().any(predicate)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all commands from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_fifo_order_and_empties() {
        let mut queue = CommandQueue::new();
        queue.push(ViewCommand::ClearLayer(2));
        queue.push(ViewCommand::ClosePopup);
        assert_eq!(queue.len(), 2);

        let taken = queue.take();
        assert!(queue.is_empty());
        assert!(matches!(taken[0], ViewCommand::ClearLayer(2)));
        assert!(matches!(taken[1], ViewCommand::ClosePopup));
    }

    #[test]
    fn any_matches_queued_commands() {
        let mut queue = CommandQueue::new();
        assert!(!queue.any(|_| true));

        queue.push(ViewCommand::ClearLayer(4));
        assert!(queue.any(|command| matches!(command, ViewCommand::ClearLayer(4))));
        assert!(!queue.any(|command| matches!(command, ViewCommand::ClosePopup)));
    }

    #[test]
    fn debug_omits_view_payload() {
        let rendered = format!("{:?}", ViewCommand::ClearLayer(3));
        assert_eq!(rendered, "ClearLayer(3)");
    }
}
