use crate::Error;

/// A settled result: either the fulfillment value or the rejection error.
///
/// Every settled promise reports its result as an `Outcome`, and
/// [`all_settled`](crate::all_settled) yields one per input. Asking an
/// outcome for the variant it does not hold is a logic bug and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V> {
    Value(V),
    Error(Error),
}

impl<V> Outcome<V> {
    /// Returns true if this outcome carries an error.
    pub fn has_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Returns true if this outcome carries a fulfillment value.
    pub fn is_value(&self) -> bool {
        !self.has_error()
    }

    /// Returns the fulfillment value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is an error.
    pub fn value(self) -> V {
        match self {
            Outcome::Value(value) => value,
            Outcome::Error(err) => panic!("outcome holds an error, not a value: {err}"),
        }
    }

    /// Returns the rejection error.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a value.
    pub fn error(self) -> Error {
        match self {
            Outcome::Error(err) => err,
            Outcome::Value(_) => panic!("outcome holds a value, not an error"),
        }
    }

    pub fn into_result(self) -> Result<V, Error> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Error(err) => Err(err),
        }
    }
}

impl<V> From<Result<V, Error>> for Outcome<V> {
    fn from(result: Result<V, Error>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_track_the_variant() {
        assert!(Outcome::Value(1).is_value());
        assert!(!Outcome::Value(1).has_error());
        assert!(Outcome::<i32>::Error(Error::NoPromises).has_error());
    }

    #[test]
    fn converts_to_and_from_result() {
        assert_eq!(Outcome::Value(2).into_result(), Ok(2));
        assert_eq!(
            Outcome::<i32>::Error(Error::NoPromises).into_result(),
            Err(Error::NoPromises)
        );
        assert_eq!(Outcome::from(Ok::<_, Error>(3)), Outcome::Value(3));
    }

    #[test]
    #[should_panic(expected = "holds an error")]
    fn value_access_on_an_error_is_loud() {
        Outcome::<i32>::Error(Error::NoPromises).value();
    }

    #[test]
    #[should_panic(expected = "holds a value")]
    fn error_access_on_a_value_is_loud() {
        Outcome::Value(1).error();
    }
}
