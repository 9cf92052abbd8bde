//=========================================================================
// Asset Load Signal
//=========================================================================
//
// Completion signal for a view's asset loading.
//
// A view starts its loading however it likes (worker thread, platform
// callback, already cached) and hands back an `AssetLoad`. The owning
// layer polls it once per frame without blocking and keeps the view in
// `Loading` until it resolves.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::trace;

//=== Internal Imports ====================================================

use crate::core::error::AssetError;

//=== LoadStatus ==========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Done,
    Failed(AssetError),
}

//=== AssetLoad ===========================================================

/// Receiving half of an asset load.
#[derive(Debug)]
pub struct AssetLoad {
    receiver: Receiver<Result<(), AssetError>>,
}

impl AssetLoad {
    //--- Construction -----------------------------------------------------

    /// A load that has already completed.
    pub fn ready() -> Self {
        let (signal, load) = Self::pair();
        signal.complete();
        load
    }

    /// A load that has already failed with `error`.
    pub fn failed(error: AssetError) -> Self {
        let (signal, load) = Self::pair();
        signal.fail(error);
        load
    }

    /// A load completed later through the returned [`LoadSignal`].
    ///
    /// Dropping the signal without completing it fails the load with
    /// [`AssetError::Abandoned`].
    pub fn pair() -> (LoadSignal, AssetLoad) {
        let (sender, receiver) = bounded(1);
        (LoadSignal { sender }, AssetLoad { receiver })
    }

    /// Runs `loader` on a worker thread and resolves with its result.
    ///
    /// A loader that panics abandons the load.
    pub fn spawn<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<(), AssetError> + Send + 'static,
    {
        let (signal, load) = Self::pair();
        thread::spawn(move || {
            let result = loader();
            trace!(target: "view", "Asset loader finished: {:?}", result);
            signal.finish(result);
        });
        load
    }

    //--- Polling ----------------------------------------------------------

    /// Checks for completion without blocking.
    pub fn poll(&self) -> LoadStatus {
        match self.receiver.try_recv() {
            Ok(Ok(())) => LoadStatus::Done,
            Ok(Err(error)) => LoadStatus::Failed(error),
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => LoadStatus::Failed(AssetError::Abandoned),
        }
    }
}

//=== LoadSignal ==========================================================

/// Sending half of an asset load. `Send`, so loaders may run anywhere.
#[derive(Debug)]
pub struct LoadSignal {
    sender: Sender<Result<(), AssetError>>,
}

impl LoadSignal {
    pub fn complete(self) {
        self.finish(Ok(()));
    }

    pub fn fail(self, error: AssetError) {
        self.finish(Err(error));
    }

    fn finish(self, result: Result<(), AssetError>) {
        // The receiving layer may already be gone.
        let _ = self.sender.send(result);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(load: &AssetLoad) -> LoadStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let status = load.poll();
            if status != LoadStatus::Pending || Instant::now() > deadline {
                return status;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn ready_resolves_on_first_poll() {
        assert_eq!(AssetLoad::ready().poll(), LoadStatus::Done);
    }

    #[test]
    fn failed_carries_error() {
        let load = AssetLoad::failed(AssetError::Failed("bad font".into()));
        assert_eq!(load.poll(), LoadStatus::Failed(AssetError::Failed("bad font".into())));
    }

    #[test]
    fn pair_stays_pending_until_signalled() {
        let (signal, load) = AssetLoad::pair();
        assert_eq!(load.poll(), LoadStatus::Pending);
        assert_eq!(load.poll(), LoadStatus::Pending);

        signal.complete();
        assert_eq!(load.poll(), LoadStatus::Done);
    }

    #[test]
    fn dropped_signal_abandons_load() {
        let (signal, load) = AssetLoad::pair();
        drop(signal);
        assert_eq!(load.poll(), LoadStatus::Failed(AssetError::Abandoned));
    }

    #[test]
    fn spawned_loader_reports_result() {
        let ok = AssetLoad::spawn(|| Ok(()));
        assert_eq!(wait_for(&ok), LoadStatus::Done);

        let missing = AssetLoad::spawn(|| {
            Err(AssetError::NotFound {
                path: "level.json".into(),
            })
        });
        assert_eq!(
            wait_for(&missing),
            LoadStatus::Failed(AssetError::NotFound {
                path: "level.json".into()
            })
        );
    }
}
