//! Row-wise work distribution.
//!
//! With the `parallel` feature the rows are handed to rayon; otherwise they
//! run in order on the calling thread. Output order is the row order either
//! way.

/// Evaluate `f` for each row index in `0..rows` and concatenate the results.
pub(crate) fn collect_rows<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        collect_rows_parallel(rows, f)
    }

    #[cfg(not(feature = "parallel"))]
    {
        collect_rows_sequential(rows, f)
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_rows_sequential<T, F>(rows: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> Vec<T>,
{
    (0..rows).flat_map(f).collect()
}

#[cfg(feature = "parallel")]
fn collect_rows_parallel<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    use rayon::prelude::*;

    let chunks: Vec<Vec<T>> = (0..rows).into_par_iter().map(f).collect();
    chunks.into_iter().flatten().collect()
}
