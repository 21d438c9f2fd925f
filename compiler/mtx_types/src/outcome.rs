//! Three-way result for tolerant inference.
//!
//! Unlike `Result`, every [`Outcome`] carries a value, including on failure,
//! so the passes can keep annotating the tree after a problem. Messages are
//! plain text; the caller decides which diagnostic code they map to.

/// How an [`Outcome`] went, ordered by severity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum OutcomeKind {
    Success,
    Warning,
    Failure,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// Usable value, with messages about what could not be determined.
    Warning(T, Vec<String>),
    /// Best-effort value, with messages about violated constraints.
    Failure(T, Vec<String>),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    pub fn warning(value: T, message: impl Into<String>) -> Self {
        Outcome::Warning(value, vec![message.into()])
    }

    pub fn failure(value: T, message: impl Into<String>) -> Self {
        Outcome::Failure(value, vec![message.into()])
    }

    /// Build from collected messages: any error makes it a failure, any
    /// warning a warning. A failure keeps only the error messages.
    pub fn from_parts(value: T, warnings: Vec<String>, errors: Vec<String>) -> Self {
        if !errors.is_empty() {
            Outcome::Failure(value, errors)
        } else if !warnings.is_empty() {
            Outcome::Warning(value, warnings)
        } else {
            Outcome::Success(value)
        }
    }

    fn with_kind(kind: OutcomeKind, value: T, messages: Vec<String>) -> Self {
        match kind {
            OutcomeKind::Success => Outcome::Success(value),
            OutcomeKind::Warning => Outcome::Warning(value, messages),
            OutcomeKind::Failure => Outcome::Failure(value, messages),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::Warning(..) => OutcomeKind::Warning,
            Outcome::Failure(..) => OutcomeKind::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Outcome::Warning(..))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(..))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) | Outcome::Warning(value, _) | Outcome::Failure(value, _) => {
                value
            }
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    /// Messages carried; empty on success.
    pub fn messages(&self) -> &[String] {
        match self {
            Outcome::Success(_) => &[],
            Outcome::Warning(_, messages) | Outcome::Failure(_, messages) => messages,
        }
    }

    pub fn into_parts(self) -> (T, OutcomeKind, Vec<String>) {
        match self {
            Outcome::Success(value) => (value, OutcomeKind::Success, Vec::new()),
            Outcome::Warning(value, messages) => (value, OutcomeKind::Warning, messages),
            Outcome::Failure(value, messages) => (value, OutcomeKind::Failure, messages),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        let (value, kind, messages) = self.into_parts();
        Outcome::with_kind(kind, f(value), messages)
    }

    /// Chain a dependent computation.
    ///
    /// The result takes the more severe kind of the two and the messages of
    /// both, in order. A failure is never upgraded.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        let (value, kind, mut messages) = self.into_parts();
        let (next, next_kind, next_messages) = f(value).into_parts();
        messages.extend(next_messages);
        Outcome::with_kind(kind.max(next_kind), next, messages)
    }

    /// Combine two independent outcomes.
    pub fn zip<U>(self, other: Outcome<U>) -> Outcome<(T, U)> {
        self.zip_with(other, |a, b| (a, b))
    }

    pub fn zip_with<U, V>(self, other: Outcome<U>, f: impl FnOnce(T, U) -> V) -> Outcome<V> {
        self.and_then(|a| other.map(|b| f(a, b)))
    }
}
