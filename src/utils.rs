use crate::error::{FeedError, Result};

pub(crate) trait LetChain {
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R;
}
impl<T> LetChain for T {
    #[inline]
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

pub(crate) trait AlsoChain {
    fn also_<F, R>(self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R;
}
impl<T> AlsoChain for T {
    #[inline]
    fn also_<F, R>(mut self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R,
    {
        f(&mut self);
        self
    }
}

#[inline]
pub(crate) fn is_blank(s: &str) -> bool { s.trim().is_empty() }

/// rejects whitespace-only text, naming `what` in the error.
pub(crate) fn require_text(what: &str, text: &str) -> Result<()> {
    match is_blank(text) {
        true => Err(FeedError::Validation(format!("{} must not be empty", what))),
        false => Ok(()),
    }
}
