//! Sharing one engine between threads.
//!
//! The engine holds a single set of global registers, so a setup and the
//! executes that depend on it must run without anyone else setting up in
//! between. [`SharedEngine`] serializes whole sequences. The batch methods
//! prepare once and execute every rectangle under one hold of the lock; the
//! prepared token never leaves it. [`SharedEngine::with_lock`] covers
//! anything else.

use crate::context::Surface;
use crate::engine::Engine;
use crate::error::AccelError;
use crate::prepared::{CopySetup, FillSetup, PatternSetup, Point, Rect};
use log::trace;
use spin::{Mutex, MutexGuard};
use spitfire_regs::RegisterBus;

/// Exclusive access to a [`SharedEngine`]; released on drop.
pub type EngineGuard<'a, B> = MutexGuard<'a, Engine<B>>;

#[derive(Debug)]
pub struct SharedEngine<B> {
    engine: Mutex<Engine<B>>,
}

impl<B> SharedEngine<B> {
    #[must_use]
    pub const fn new(engine: Engine<B>) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Try once; `None` while another sequence is in progress.
    #[must_use]
    pub fn try_lock(&self) -> Option<EngineGuard<'_, B>> {
        self.engine.try_lock()
    }

    /// Spin until no other sequence is in progress.
    #[must_use]
    pub fn lock(&self) -> EngineGuard<'_, B> {
        self.engine.lock()
    }

    /// Run one setup/execute sequence under the lock.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut Engine<B>) -> R) -> R {
        f(&mut self.engine.lock())
    }

    pub fn get_mut(&mut self) -> &mut Engine<B> {
        self.engine.get_mut()
    }

    #[must_use]
    pub fn into_inner(self) -> Engine<B> {
        self.engine.into_inner()
    }
}

impl<B: RegisterBus> SharedEngine<B> {
    /// Fill each of `rects` on `dst` with one setup.
    ///
    /// Returns the number of rectangles drawn.
    ///
    /// # Errors
    /// Whatever the setup or an execute reports; rectangles after a failed
    /// execute are not drawn.
    pub fn solid_fill_rects<I>(
        &self,
        dst: &Surface,
        setup: &FillSetup,
        rects: I,
    ) -> Result<usize, AccelError>
    where
        I: IntoIterator<Item = Rect>,
    {
        self.with_lock(|engine| {
            let op = engine.prepare_solid_fill(dst, setup)?;
            run(rects, |rect| engine.solid_fill(&op, rect))
        })
    }

    /// Copy each `(source, destination)` block from `src` to `dst` with one
    /// setup.
    ///
    /// # Errors
    /// As for [`solid_fill_rects`](Self::solid_fill_rects).
    pub fn copy_rects<I>(
        &self,
        src: &Surface,
        dst: &Surface,
        setup: &CopySetup,
        blocks: I,
    ) -> Result<usize, AccelError>
    where
        I: IntoIterator<Item = (Point, Rect)>,
    {
        self.with_lock(|engine| {
            let op = engine.prepare_copy(src, dst, setup)?;
            run(blocks, |(from, to)| engine.copy(&op, from, to))
        })
    }

    /// Fill each `(pattern offset, rectangle)` on the screen with one mono
    /// pattern setup.
    ///
    /// # Errors
    /// As for [`solid_fill_rects`](Self::solid_fill_rects).
    pub fn pattern_fill_rects<I>(&self, setup: &PatternSetup, rects: I) -> Result<usize, AccelError>
    where
        I: IntoIterator<Item = (Point, Rect)>,
    {
        self.with_lock(|engine| {
            let op = engine.prepare_mono_pattern(setup)?;
            run(rects, |(pattern, rect)| {
                engine.mono_pattern_fill(&op, pattern, rect)
            })
        })
    }
}

fn run<T>(
    items: impl IntoIterator<Item = T>,
    mut execute: impl FnMut(T) -> Result<(), AccelError>,
) -> Result<usize, AccelError> {
    let mut drawn = 0;
    for item in items {
        execute(item)?;
        drawn += 1;
    }
    trace!("{drawn} rectangles in one sequence");
    Ok(drawn)
}
