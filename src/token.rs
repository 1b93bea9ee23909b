use alloc::borrow::Cow;
use core::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};

use crate::any::TypeInfo;

/// Key under which descriptors are registered and resolved.
///
/// A token carries no behavior of its own. It is compared by identity:
/// the type id for [`Token::Type`], the string value for [`Token::Name`],
/// the allocation counter for [`Token::Unique`]. Two `Unique` tokens are
/// never equal unless they are clones of the same [`Token::unique`] call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    Type(TypeInfo),
    Name(Cow<'static, str>),
    Unique(UniqueToken),
    /// Reserved token under which the root provider registers itself.
    Provider,
}

impl Token {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self::Type(TypeInfo::of::<T>())
    }

    #[inline]
    #[must_use]
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }

    #[inline]
    #[must_use]
    pub fn unique(label: &'static str) -> Self {
        Self::Unique(UniqueToken::new(label))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(type_info) => f.write_str(type_info.short_name()),
            Self::Name(name) => f.write_str(name),
            Self::Unique(unique) => write!(f, "{}#{}", unique.label, unique.id),
            Self::Provider => f.write_str("ServiceProvider"),
        }
    }
}

/// Symbol-like token. The label is diagnostic only and does not participate
/// in equality, ordering or hashing.
#[derive(Debug, Clone, Copy)]
pub struct UniqueToken {
    id: u64,
    label: &'static str,
}

impl UniqueToken {
    #[must_use]
    fn new(label: &'static str) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        Self {
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            label,
        }
    }
}

impl PartialEq for UniqueToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UniqueToken {}

impl PartialOrd for UniqueToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UniqueToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for UniqueToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::{format, string::String};

    use super::Token;

    struct Config;

    #[test]
    fn test_type_token_identity() {
        assert_eq!(Token::of::<Config>(), Token::of::<Config>());
        assert_ne!(Token::of::<Config>(), Token::of::<String>());
    }

    #[test]
    fn test_name_token_identity() {
        assert_eq!(Token::name("db"), Token::name(String::from("db")));
        assert_ne!(Token::name("db"), Token::name("cache"));
    }

    #[test]
    fn test_unique_token_identity() {
        let first = Token::unique("plugin");
        let second = Token::unique("plugin");

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Token::of::<Config>()), "Config");
        assert_eq!(format!("{}", Token::name("db")), "db");
        assert_eq!(format!("{}", Token::Provider), "ServiceProvider");

        let rendered = format!("{}", Token::unique("plugin"));
        assert!(rendered.starts_with("plugin#"));
    }
}
