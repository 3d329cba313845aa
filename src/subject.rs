//! The operation under measurement
//!
//! A subject exposes exactly two capabilities: time one execution at its
//! current input size, and double that size. Implementations report
//! allocation failure as [`Error::OutOfResources`] (for instance by growing
//! buffers with `try_reserve`) so the experiment can stop cleanly.

use std::time::Instant;

use crate::{Error, Result};

/// Capability interface implemented per benchmarked operation.
pub trait Subject {
    /// Run the operation once and return its elapsed time in nanoseconds.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfResources`] ends the experiment with a terminal state;
    /// any other error aborts the run.
    fn measure_once(&mut self) -> Result<f64>;

    /// Double the operation's input size.
    ///
    /// # Errors
    ///
    /// Same contract as [`Subject::measure_once`].
    fn double_input_size(&mut self) -> Result<()>;
}

impl<S: Subject + ?Sized> Subject for &mut S {
    fn measure_once(&mut self) -> Result<f64> {
        (**self).measure_once()
    }

    fn double_input_size(&mut self) -> Result<()> {
        (**self).double_input_size()
    }
}

impl<S: Subject + ?Sized> Subject for Box<S> {
    fn measure_once(&mut self) -> Result<f64> {
        (**self).measure_once()
    }

    fn double_input_size(&mut self) -> Result<()> {
        (**self).double_input_size()
    }
}

/// Time a closure with the monotonic clock, in nanoseconds.
///
/// # Errors
///
/// Propagates the closure's error.
#[allow(clippy::cast_precision_loss)]
pub fn time_ns<F>(op: F) -> Result<f64>
where
    F: FnOnce() -> Result<()>,
{
    let start = Instant::now();
    op()?;
    Ok(start.elapsed().as_nanos() as f64)
}

/// Subject built from a state value and two closures.
///
/// `run` performs one execution against the state and is timed by
/// [`time_ns`]; `double` grows the state.
///
/// ```rust
/// use doubling_experiment::subject::{FnSubject, Subject};
///
/// let mut subject = FnSubject::new(
///     vec![1u64; 1024],
///     |v: &mut Vec<u64>| {
///         std::hint::black_box(v.iter().sum::<u64>());
///         Ok(())
///     },
///     |v: &mut Vec<u64>| {
///         v.try_reserve(v.len())?;
///         v.extend_from_within(..);
///         Ok(())
///     },
/// );
/// subject.double_input_size()?;
/// assert_eq!(subject.state().len(), 2048);
/// assert!(subject.measure_once()? >= 0.0);
/// # Ok::<(), doubling_experiment::Error>(())
/// ```
pub struct FnSubject<T, R, D> {
    state: T,
    run: R,
    double: D,
}

impl<T, R, D> FnSubject<T, R, D>
where
    R: FnMut(&mut T) -> Result<()>,
    D: FnMut(&mut T) -> Result<()>,
{
    /// Create a subject from initial state and its run/double closures.
    pub const fn new(state: T, run: R, double: D) -> Self {
        Self { state, run, double }
    }

    /// Borrow the current state.
    pub const fn state(&self) -> &T {
        &self.state
    }

    /// Consume the subject and return its state.
    pub fn into_state(self) -> T {
        self.state
    }
}

impl<T, R, D> Subject for FnSubject<T, R, D>
where
    R: FnMut(&mut T) -> Result<()>,
    D: FnMut(&mut T) -> Result<()>,
{
    fn measure_once(&mut self) -> Result<f64> {
        let Self { state, run, .. } = self;
        time_ns(|| run(state))
    }

    fn double_input_size(&mut self) -> Result<()> {
        (self.double)(&mut self.state)
    }
}

impl<T: std::fmt::Debug, R, D> std::fmt::Debug for FnSubject<T, R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSubject")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Grow `buf` to twice its length by repeating its contents.
///
/// # Errors
///
/// Returns [`Error::OutOfResources`] if the allocation fails.
pub fn double_vec<T: Clone>(buf: &mut Vec<T>) -> Result<()> {
    if buf.is_empty() {
        return Err(Error::Subject("cannot double an empty input".to_string()));
    }
    buf.try_reserve(buf.len())?;
    buf.extend_from_within(..);
    Ok(())
}
