//! Two-variant result wrapper returned by every remote call.
//!
//! [`Outcome`] is the plain tagged union and the preferred way to branch:
//! `match` forces both arms. [`Either`] carries an `Outcome` plus a flag that
//! records whether the caller has asked which side it holds, so the escape
//! hatch [`Either::unsafe_unwrap`] can refuse to hand out an unchecked failure.

use std::cell::Cell;

use serde_json::Value;
use thiserror::Error;

/// Success or failure of an operation, without any bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed with an error.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Convert into a standard [`Result`].
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

/// Raised when a failure payload is read before the disjunction was checked.
///
/// This is a programming error at the call site, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsafe access of an unchecked failure")]
pub struct UnsafeAccessError;

/// Values that count as "absent" for [`Either::unwrap_or_else`].
pub trait Emptiness {
    /// Return `true` when the value is empty, zero, `false` or null.
    fn is_empty_value(&self) -> bool;
}

impl Emptiness for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for &str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl Emptiness for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl Emptiness for () {
    fn is_empty_value(&self) -> bool {
        true
    }
}

macro_rules! impl_numeric_emptiness {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Emptiness for $ty {
                fn is_empty_value(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_numeric_emptiness!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Emptiness for Value {
    fn is_empty_value(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(flag) => !flag,
            Self::Number(number) => number.as_f64() == Some(0.0),
            Self::String(text) => text.is_empty(),
            Self::Array(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
        }
    }
}

/// Result wrapper with a "checked before unsafe read" gate.
///
/// # Examples
///
/// ```
/// use inhouse_client::domain::{Either, Outcome};
///
/// let failed: Either<u32, String> = Either::failure("boom".to_owned());
/// assert!(failed.unsafe_unwrap().is_err());
///
/// let failed: Either<u32, String> = Either::failure("boom".to_owned());
/// assert!(failed.is_failure());
/// assert_eq!(
///     failed.unsafe_unwrap(),
///     Ok(Outcome::Failure("boom".to_owned()))
/// );
/// ```
#[derive(Debug)]
pub struct Either<T, E> {
    outcome: Outcome<T, E>,
    checked: Cell<bool>,
}

impl<T, E> Either<T, E> {
    /// Wrap a successful value.
    pub const fn success(value: T) -> Self {
        Self {
            outcome: Outcome::Success(value),
            checked: Cell::new(false),
        }
    }

    /// Wrap a failure.
    pub const fn failure(error: E) -> Self {
        Self {
            outcome: Outcome::Failure(error),
            checked: Cell::new(false),
        }
    }

    /// Whether this holds a value. Marks the disjunction as checked.
    pub fn is_success(&self) -> bool {
        self.checked.set(true);
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Whether this holds an error. Marks the disjunction as checked.
    pub fn is_failure(&self) -> bool {
        self.checked.set(true);
        matches!(self.outcome, Outcome::Failure(_))
    }

    /// Borrow the failure, if any, without consuming the wrapper.
    pub const fn failure_ref(&self) -> Option<&E> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    /// Return the value, or propagate the error through `?`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when this is a failure.
    pub fn unwrap_or_throw(self) -> Result<T, E> {
        self.outcome.into_result()
    }

    /// Return the value unless it is absent, otherwise `fallback`.
    ///
    /// Empty, zero, `false` and null success values count as absent.
    pub fn unwrap_or_else(self, fallback: T) -> T
    where
        T: Emptiness,
    {
        match self.outcome {
            Outcome::Success(value) if !value.is_empty_value() => value,
            Outcome::Success(_) | Outcome::Failure(_) => fallback,
        }
    }

    /// Hand out either side of the disjunction.
    ///
    /// A success is always returned. A failure is returned only once
    /// [`Self::is_success`] or [`Self::is_failure`] has been called.
    ///
    /// # Errors
    ///
    /// Returns [`UnsafeAccessError`] for a failure that was never checked.
    pub fn unsafe_unwrap(self) -> Result<Outcome<T, E>, UnsafeAccessError> {
        match self.outcome {
            Outcome::Success(value) => Ok(Outcome::Success(value)),
            Outcome::Failure(error) if self.checked.get() => Ok(Outcome::Failure(error)),
            Outcome::Failure(_) => Err(UnsafeAccessError),
        }
    }

    /// Consume into the plain tagged union for exhaustive matching.
    pub fn into_outcome(self) -> Outcome<T, E> {
        self.outcome
    }
}

impl<T, E> From<Result<T, E>> for Either<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Either<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        Self {
            outcome,
            checked: Cell::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the result wrapper contract.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(7_u32)]
    #[case(0_u32)]
    fn success_predicates_and_accessors(#[case] value: u32) {
        let either: Either<u32, String> = Either::success(value);
        assert!(either.is_success());
        assert!(!either.is_failure());
        assert_eq!(either.unwrap_or_throw(), Ok(value));

        let unchecked: Either<u32, String> = Either::success(value);
        assert_eq!(unchecked.unsafe_unwrap(), Ok(Outcome::Success(value)));
    }

    #[test]
    fn unchecked_failure_refuses_unsafe_access() {
        let either: Either<u32, String> = Either::failure("denied".to_owned());
        assert_eq!(either.unsafe_unwrap(), Err(UnsafeAccessError));
    }

    #[rstest]
    #[case::checked_with_is_failure(true)]
    #[case::checked_with_is_success(false)]
    fn checked_failure_hands_out_the_error(#[case] use_is_failure: bool) {
        let either: Either<u32, String> = Either::failure("denied".to_owned());
        if use_is_failure {
            assert!(either.is_failure());
        } else {
            assert!(!either.is_success());
        }
        assert_eq!(
            either.unsafe_unwrap(),
            Ok(Outcome::Failure("denied".to_owned()))
        );
    }

    #[test]
    fn unwrap_or_throw_propagates_the_error() {
        fn call() -> Result<u32, String> {
            let either: Either<u32, String> = Either::failure("denied".to_owned());
            let value = either.unwrap_or_throw()?;
            Ok(value + 1)
        }

        assert_eq!(call(), Err("denied".to_owned()));
    }

    #[rstest]
    #[case(Either::success("value".to_owned()), "value")]
    #[case(Either::success(String::new()), "fallback")]
    #[case(Either::failure(UnsafeAccessError), "fallback")]
    fn unwrap_or_else_treats_empty_success_as_absent(
        #[case] either: Either<String, UnsafeAccessError>,
        #[case] expected: &str,
    ) {
        assert_eq!(either.unwrap_or_else("fallback".to_owned()), expected);
    }

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(false), true)]
    #[case(json!(0), true)]
    #[case(json!(""), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(1), false)]
    #[case(json!({ "id": 1 }), false)]
    fn json_emptiness_follows_falsy_values(#[case] value: Value, #[case] empty: bool) {
        assert_eq!(value.is_empty_value(), empty);
    }

    #[test]
    fn converts_from_standard_results() {
        let either: Either<u32, String> = Ok(3).into();
        assert_eq!(either.into_outcome(), Outcome::Success(3));
    }
}
