use crate::error::Error;

/// Value being loaded in the background.  `D` tags the request that was
/// issued, so a response can be matched against the one still expected.
#[derive(Clone, Debug)]
pub enum Promise<T, D = (), E = Error> {
    Empty,
    Deferred(D),
    Resolved(T),
    Rejected(E),
}

#[derive(Eq, PartialEq, Debug)]
pub enum PromiseState {
    Empty,
    Deferred,
    Resolved,
    Rejected,
}

impl<T, D, E> Promise<T, D, E> {
    pub fn state(&self) -> PromiseState {
        match self {
            Self::Empty => PromiseState::Empty,
            Self::Deferred(_) => PromiseState::Deferred,
            Self::Resolved(_) => PromiseState::Resolved,
            Self::Rejected(_) => PromiseState::Rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn is_deferred(&self, def: &D) -> bool
    where
        D: PartialEq,
    {
        matches!(self, Self::Deferred(d) if d == def)
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(val) => Some(val),
            _ => None,
        }
    }

    pub fn resolved_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Resolved(val) => Some(val),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    pub fn defer(&mut self, def: D) {
        *self = Self::Deferred(def);
    }

    pub fn resolve(&mut self, val: T) {
        *self = Self::Resolved(val);
    }

    pub fn resolve_or_reject(&mut self, res: Result<T, E>) {
        *self = match res {
            Ok(ok) => Self::Resolved(ok),
            Err(err) => Self::Rejected(err),
        };
    }

    /// Settle the promise if it is still waiting on `def`.  Returns `false`
    /// when the response belongs to a request that has since been replaced.
    pub fn update(&mut self, (def, res): (D, Result<T, E>)) -> bool
    where
        D: PartialEq,
    {
        if self.is_deferred(&def) {
            self.resolve_or_reject(res);
            true
        } else {
            false
        }
    }
}

impl<T, D, E> Default for Promise<T, D, E> {
    fn default() -> Self {
        Self::Empty
    }
}
