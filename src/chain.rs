//! Two-level pass-through used to give worker stacks a recognizable shape.
//!
//! Neither function adds behavior. They are kept out of line so each shows
//! up as its own frame in a backtrace.

#[inline(never)]
pub fn common1<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    common2(f)
}

#[inline(never)]
pub fn common2<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_matches_direct_call() {
        let direct = (|| vec![1, 2, 3])();
        let chained = common1(|| vec![1, 2, 3]);
        assert_eq!(direct, chained);
    }

    #[test]
    fn test_chain_invokes_exactly_once() {
        let mut calls = 0;
        common1(|| calls += 1);
        assert_eq!(calls, 1);
    }
}
