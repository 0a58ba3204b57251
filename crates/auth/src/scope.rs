//! Scope vocabulary and the scope-implication rule.
//!
//! Scopes form a small closed set; membership checks and the implication
//! rule (ADMIN grants USER) are pure functions so policy can be tested in
//! isolation from any transport or storage.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named permission level a token carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    Admin,
    User,
}

impl Scope {
    /// Every scope in the vocabulary, in wire order.
    pub const ALL: [Scope; 2] = [Scope::Admin, Scope::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Admin => "ADMIN",
            Scope::User => "USER",
        }
    }

    /// Parse a scope name as it appears on the wire. Returns `None` for
    /// anything outside the vocabulary.
    pub fn parse(s: &str) -> Option<Scope> {
        match s {
            "ADMIN" => Some(Scope::Admin),
            "USER" => Some(Scope::User),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Scope::Admin => 0b10,
            Scope::User => 0b01,
        }
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of scopes, stored as a bitmask over the closed vocabulary.
///
/// Serializes as an array of scope names (the token wire format).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(u8);

impl ScopeSet {
    pub const EMPTY: ScopeSet = ScopeSet(0);

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn insert(&mut self, scope: Scope) {
        self.0 |= scope.bit();
    }

    pub fn with(mut self, scope: Scope) -> Self {
        self.insert(scope);
        self
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.0 & scope.bit() != 0
    }

    /// True when every scope in `required` is present in `self`.
    pub fn contains_all(&self, required: ScopeSet) -> bool {
        self.0 & required.0 == required.0
    }

    /// Scopes in `required` that are absent from `self`.
    pub fn missing(&self, required: ScopeSet) -> ScopeSet {
        ScopeSet(required.0 & !self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Close the set under the implication rule: ADMIN implies USER.
    pub fn expand(self) -> ScopeSet {
        if self.contains(Scope::Admin) {
            self.with(Scope::User)
        } else {
            self
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        Scope::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

impl From<Scope> for ScopeSet {
    fn from(scope: Scope) -> Self {
        ScopeSet::EMPTY.with(scope)
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        let mut set = ScopeSet::EMPTY;
        for scope in iter {
            set.insert(scope);
        }
        set
    }
}

impl core::fmt::Display for ScopeSet {
    /// Space-delimited scope names (the `WWW-Authenticate` challenge form).
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for scope in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(scope.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ScopeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.iter().count()))?;
        for scope in self.iter() {
            seq.serialize_element(&scope)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ScopeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScopeSetVisitor;

        impl<'de> Visitor<'de> for ScopeSetVisitor {
            type Value = ScopeSet;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a sequence of scope names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ScopeSet, A::Error> {
                let mut set = ScopeSet::EMPTY;
                while let Some(scope) = seq.next_element::<Scope>()? {
                    set.insert(scope);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(ScopeSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_implies_user_on_expand() {
        let expanded = ScopeSet::from(Scope::Admin).expand();
        assert!(expanded.contains(Scope::Admin));
        assert!(expanded.contains(Scope::User));
    }

    #[test]
    fn user_expands_to_itself() {
        let expanded = ScopeSet::from(Scope::User).expand();
        assert!(expanded.contains(Scope::User));
        assert!(!expanded.contains(Scope::Admin));
    }

    #[test]
    fn contains_all_and_missing() {
        let granted = ScopeSet::from(Scope::User);
        let required = ScopeSet::from(Scope::Admin).with(Scope::User);

        assert!(!granted.contains_all(required));
        let missing = granted.missing(required);
        assert!(missing.contains(Scope::Admin));
        assert!(!missing.contains(Scope::User));

        let admin = required;
        assert!(admin.contains_all(granted));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Scope::parse("ADMIN"), Some(Scope::Admin));
        assert_eq!(Scope::parse("USER"), Some(Scope::User));
        assert_eq!(Scope::parse("admin"), None);
        assert_eq!(Scope::parse("ROOT"), None);
    }

    #[test]
    fn serializes_as_name_array() {
        let set = ScopeSet::from(Scope::Admin).expand();
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json, serde_json::json!(["ADMIN", "USER"]));

        let back: ScopeSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn deserialize_rejects_unknown_names() {
        let result: Result<ScopeSet, _> = serde_json::from_str(r#"["ROOT"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn display_is_space_delimited() {
        let set = ScopeSet::from(Scope::Admin).expand();
        assert_eq!(set.to_string(), "ADMIN USER");
        assert_eq!(ScopeSet::EMPTY.to_string(), "");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_scope_set() -> impl Strategy<Value = ScopeSet> {
            (0u8..4).prop_map(ScopeSet)
        }

        proptest! {
            #[test]
            fn expand_is_idempotent(set in arb_scope_set()) {
                prop_assert_eq!(set.expand(), set.expand().expand());
            }

            #[test]
            fn expand_is_monotone(set in arb_scope_set()) {
                prop_assert!(set.expand().contains_all(set));
            }
        }
    }
}
