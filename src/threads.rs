//! Fixed worker pool over mpsc channels. Work is `Split` into
//! numbered parts, each worker transforms its part, and the numbered
//! outputs are `Join`ed back in order.

use std::iter::zip;
use std::sync::mpsc;
use std::thread;

/// Inputs that can be divided into `n` parts for the pool.
pub trait Split: Sized {
    fn split_parts(self, n: usize) -> Vec<Self>;

    fn parts(self, n: usize) -> Vec<SplitPart<Self>> {
        self.split_parts(n)
            .into_iter()
            .enumerate()
            .map(|(n, part)| SplitPart::new(part, n))
            .collect()
    }
}

/// Outputs that can be recombined from ordered parts.
pub trait Join: Sized {
    fn join_parts(parts: Vec<Self>) -> Self;
}

/// The first error wins; otherwise join the successes.
impl<T, E> Join for Result<T, E>
where
    T: Join,
{
    fn join_parts(parts: Vec<Self>) -> Self {
        let ok: Result<Vec<T>, E> = parts.into_iter().collect();
        Ok(T::join_parts(ok?))
    }
}

#[derive(Debug, Clone)]
pub struct JoinError;

#[derive(Debug)]
pub struct SplitPart<T> {
    pub n: usize,
    pub part: T,
}

impl<T> SplitPart<T> {
    pub fn new(part: T, n: usize) -> Self {
        Self { part, n }
    }

    /// Reassemble out-of-order parts. Fails on missing or duplicate
    /// part numbers.
    pub fn join(splits: Vec<SplitPart<T>>) -> Result<T, JoinError>
    where
        T: Join,
    {
        let n = splits.len();
        if n == 0 {
            return Err(JoinError);
        }
        let mut parts: Vec<Option<T>> = Vec::new();
        parts.resize_with(n, || None);
        for s in splits {
            if s.n >= n || parts[s.n].is_some() {
                return Err(JoinError);
            }
            parts[s.n] = Some(s.part);
        }
        // By pigeonhole principle, no elements can be None
        let parts: Vec<T> = parts.into_iter().map(|x| x.unwrap()).collect();
        Ok(T::join_parts(parts))
    }
}

pub trait Call<I, O> {
    fn call(&self, input: I) -> O;
}

struct Worker<I> {
    tx: mpsc::Sender<SplitPart<I>>,
}

impl<I> Worker<I>
where
    I: Send + 'static,
{
    fn new<F, O>(f: F, out_tx: mpsc::Sender<SplitPart<O>>) -> Self
    where
        F: Fn(I) -> O + Send + 'static,
        O: Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SplitPart<I>>();
        thread::spawn(move || loop {
            let part = match rx.recv() {
                Ok(p) => p,
                Err(_) => return,
            };
            let out = f(part.part);
            if out_tx.send(SplitPart::new(out, part.n)).is_err() {
                return;
            }
        });
        Self { tx }
    }
}

impl<I> Worker<I> {
    fn send(&self, part: SplitPart<I>) {
        self.tx.send(part).unwrap();
    }
}

pub struct WorkerPool<I, O> {
    workers: Vec<Worker<I>>,
    rx: mpsc::Receiver<SplitPart<O>>,
}

impl<I, O> WorkerPool<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Spawn `n` workers, each owning a function produced by `make`.
    pub fn with<G, F>(n: usize, make: G) -> Self
    where
        G: Fn() -> F,
        F: Fn(I) -> O + Send + 'static,
    {
        assert!(n > 0, "no workers");
        let (tx, rx) = mpsc::channel();
        let workers = (0..n).map(|_| Worker::new(make(), tx.clone())).collect();
        Self { workers, rx }
    }
}

impl<I, O> Call<I, O> for WorkerPool<I, O>
where
    I: Split,
    O: Join,
{
    fn call(&self, input: I) -> O {
        let n = self.workers.len();
        for (worker, part) in zip(&self.workers, input.parts(n)) {
            worker.send(part);
        }
        let mut outputs = Vec::with_capacity(n);
        for _ in 0..n {
            outputs.push(self.rx.recv().unwrap());
        }
        SplitPart::join(outputs).unwrap()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Count(usize);

    impl Split for Count {
        fn split_parts(self, n: usize) -> Vec<Self> {
            let size = self.0 / n;
            let xtra = self.0 % n;
            (0..n)
                .map(|i| Count(if i < xtra { size + 1 } else { size }))
                .collect()
        }
    }

    impl Join for Count {
        fn join_parts(parts: Vec<Self>) -> Self {
            Count(parts.into_iter().map(|c| c.0).sum())
        }
    }

    #[test]
    fn test_split_covers_budget() {
        for (total, n) in [(10, 3), (3, 8), (100, 1), (0, 4)] {
            let parts = Count(total).split_parts(n);
            assert_eq!(parts.len(), n);
            assert_eq!(parts.iter().map(|c| c.0).sum::<usize>(), total);
        }
    }

    #[test]
    fn test_join_out_of_order() {
        let splits = vec![
            SplitPart::new(Count(2), 1),
            SplitPart::new(Count(5), 0),
            SplitPart::new(Count(1), 2),
        ];
        assert_eq!(SplitPart::join(splits).unwrap(), Count(8));
    }

    #[test]
    fn test_join_rejects_duplicates() {
        let splits = vec![SplitPart::new(Count(1), 0), SplitPart::new(Count(2), 0)];
        assert!(SplitPart::join(splits).is_err());
    }

    #[test]
    fn test_pool_roundtrip() {
        let pool: WorkerPool<Count, Count> = WorkerPool::with(4, || |c: Count| Count(c.0 * 2));
        assert_eq!(pool.call(Count(21)), Count(42));
    }

    #[test]
    fn test_result_join_propagates_error() {
        let parts: Vec<Result<Count, &str>> = vec![Ok(Count(1)), Err("boom"), Ok(Count(2))];
        let joined = <Result<Count, &str> as Join>::join_parts(parts);
        assert_eq!(joined, Err("boom"));
    }
}
