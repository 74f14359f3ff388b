//! Marshaling onto the thread that owns the graphics context.
//!
//! The owner creates a [`RenderThread`] around its graphics state (driver, canvases) and pumps
//! it from its loop. Other threads hold a [`RenderThreadHandle`] and block in
//! [`call`](RenderThreadHandle::call) until the owner has run their job; the job's return value,
//! including any `Err`, comes back to the caller unchanged.

use std::fmt;
use std::marker::PhantomData;
use std::thread::{self, ThreadId};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::CanvasError;

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Graphics-thread state plus the queue of jobs marshaled onto it.
///
/// Pinned to the thread that created it: the owner id recorded here (and by every
/// `ShaderProgramManager` built alongside it) would be wrong anywhere else. Create it on the
/// thread that will pump it; only [`RenderThreadHandle`] crosses threads.
///
/// ```compile_fail
/// use glcanvas_runtime_glow::RenderThread;
///
/// let rt = RenderThread::new(0u32);
/// std::thread::spawn(move || {
///     let mut rt = rt;
///     rt.pump();
/// });
/// ```
pub struct RenderThread<S: 'static> {
    state: S,
    owner: ThreadId,
    tx: Sender<Job<S>>,
    rx: Receiver<Job<S>>,
    _not_send: PhantomData<*const ()>,
}

impl<S: 'static> RenderThread<S> {
    /// Binds `state` to the calling thread.
    pub fn new(state: S) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            state,
            owner: thread::current().id(),
            tx,
            rx,
            _not_send: PhantomData,
        }
    }

    pub fn handle(&self) -> RenderThreadHandle<S> {
        RenderThreadHandle {
            tx: self.tx.clone(),
            owner: self.owner,
        }
    }

    /// Runs `f` inline. Only the owner can reach this, since it holds the `RenderThread`.
    pub fn call<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state)
    }

    pub fn state(&mut self) -> &mut S {
        &mut self.state
    }

    /// Runs every job queued so far. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(&mut self.state);
            ran += 1;
        }
        ran
    }

    /// Waits up to `timeout` for the first job, then drains the queue.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job(&mut self.state);
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    pub fn into_inner(self) -> S {
        self.state
    }
}

impl<S: 'static> fmt::Debug for RenderThread<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderThread")
            .field("owner", &self.owner)
            .field("pending", &self.rx.len())
            .finish_non_exhaustive()
    }
}

/// Sendable handle that runs jobs on the owning [`RenderThread`].
pub struct RenderThreadHandle<S: 'static> {
    tx: Sender<Job<S>>,
    owner: ThreadId,
}

impl<S: 'static> RenderThreadHandle<S> {
    /// Queues `f` on the render thread and blocks until it has run.
    ///
    /// Fails with [`CanvasError::WrongThread`] when called from the owner thread itself (the job
    /// could never run while the owner is blocked here), and with
    /// [`CanvasError::RenderThreadClosed`] if the `RenderThread` is dropped first.
    pub fn call<R, F>(&self, f: F) -> Result<R, CanvasError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        if thread::current().id() == self.owner {
            return Err(CanvasError::WrongThread {
                operation: "RenderThreadHandle::call from the render thread",
            });
        }

        let (reply_tx, reply_rx) = channel::bounded(1);
        let job: Job<S> = Box::new(move |state| {
            let _ = reply_tx.send(f(state));
        });
        self.tx
            .send(job)
            .map_err(|_| CanvasError::RenderThreadClosed)?;
        reply_rx.recv().map_err(|_| CanvasError::RenderThreadClosed)
    }

    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }
}

impl<S: 'static> Clone for RenderThreadHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            owner: self.owner,
        }
    }
}

impl<S: 'static> fmt::Debug for RenderThreadHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderThreadHandle")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDriver;
    use crate::Canvas;

    struct GfxState {
        driver: RecordingDriver,
        canvas: Canvas<RecordingDriver>,
    }

    fn gfx() -> RenderThread<GfxState> {
        let mut driver = RecordingDriver::new();
        let canvas = Canvas::new(&mut driver, [0.0, 0.0, 64.0, 64.0]).expect("canvas");
        RenderThread::new(GfxState { driver, canvas })
    }

    // Pumps until `worker` finishes, so the worker's blocking call can complete.
    fn pump_until_done<T>(rt: &mut RenderThread<GfxState>, worker: thread::JoinHandle<T>) -> T {
        while !worker.is_finished() {
            rt.pump_timeout(Duration::from_millis(5));
        }
        rt.pump();
        worker.join().expect("worker thread")
    }

    #[test]
    fn declare_from_another_thread_runs_on_owner() {
        let mut rt = gfx();
        let handle = rt.handle();
        let owner = thread::current().id();

        let worker = thread::spawn(move || {
            handle.call(move |s: &mut GfxState| {
                assert_eq!(thread::current().id(), owner);
                s.canvas.declare(&mut s.driver, "u_time", 0.5f32)
            })
        });

        pump_until_done(&mut rt, worker)
            .expect("marshaled call")
            .expect("declare succeeds");
        assert_eq!(rt.state().canvas.table().find("u_time"), Some(4));
    }

    #[test]
    fn compile_errors_propagate_to_the_caller() {
        let mut rt = gfx();
        let handle = rt.handle();
        let before = rt.state().canvas.program();

        let worker = thread::spawn(move || {
            handle.call(|s: &mut GfxState| {
                s.canvas.set_fragment_source(&mut s.driver, "#error bad")
            })
        });

        let err = pump_until_done(&mut rt, worker)
            .expect("marshaled call")
            .expect_err("compile error must come back");
        assert!(err.is_shader_compilation());
        assert_eq!(rt.state().canvas.program(), before);
    }

    fn assert_send<T: Send>() {}

    #[test]
    fn handle_crosses_threads_and_state_is_built_where_it_is_pumped() {
        assert_send::<RenderThreadHandle<GfxState>>();

        // The pumping thread builds its own RenderThread and publishes only the handle.
        let (handle_tx, handle_rx) = channel::bounded(1);
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        let pumper = thread::spawn(move || {
            let mut rt = gfx();
            handle_tx.send(rt.handle()).expect("publish handle");
            while done_rx.try_recv().is_err() {
                rt.pump_timeout(Duration::from_millis(5));
            }
            rt.pump();
            rt.state().canvas.table().find("u_time")
        });

        let handle = handle_rx.recv().expect("handle");
        assert!(!handle.is_owner_thread());
        handle
            .call(|s: &mut GfxState| s.canvas.declare(&mut s.driver, "u_time", 1i32))
            .expect("marshaled from the creating thread")
            .expect("declare runs on the pumping thread");
        done_tx.send(()).expect("stop pumping");

        assert_eq!(pumper.join().expect("pumper"), Some(4));
    }

    #[test]
    fn handle_call_on_owner_thread_fails_fast() {
        let rt = gfx();
        let err = rt
            .handle()
            .call(|_s: &mut GfxState| ())
            .expect_err("would deadlock");
        assert!(matches!(err, CanvasError::WrongThread { .. }));
    }

    #[test]
    fn dropped_render_thread_reports_closed() {
        let rt = gfx();
        let handle = rt.handle();
        drop(rt);

        let err = thread::spawn(move || handle.call(|_s: &mut GfxState| ()))
            .join()
            .expect("worker")
            .expect_err("no render thread");
        assert!(matches!(err, CanvasError::RenderThreadClosed));
    }
}
