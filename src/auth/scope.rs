//! Scope modeling for the provider's fixed permission set.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::{_prelude::*, error::ValidationError};

/// Named permission the user grants to the application.
///
/// The provider accepts exactly these values; anything else is rejected while parsing, so a
/// [`Scope`] value is always valid on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
	/// Like, follow, and comment on behalf of the user.
	Interact,
	/// Access private member data.
	Private,
	/// Access public member data.
	Public,
	/// Create new resources (albums, channels, groups).
	Create,
	/// Edit existing resources.
	Edit,
	/// Delete existing resources.
	Delete,
	/// Upload videos.
	Upload,
}
impl Scope {
	/// Every scope in canonical order.
	pub const ALL: [Scope; 7] = [
		Scope::Interact,
		Scope::Private,
		Scope::Public,
		Scope::Create,
		Scope::Edit,
		Scope::Delete,
		Scope::Upload,
	];

	/// Returns the wire name of the scope.
	pub const fn as_str(self) -> &'static str {
		match self {
			Scope::Interact => "interact",
			Scope::Private => "private",
			Scope::Public => "public",
			Scope::Create => "create",
			Scope::Edit => "edit",
			Scope::Delete => "delete",
			Scope::Upload => "upload",
		}
	}

	/// Human-readable list of accepted scope names, used in validation messages.
	pub fn allowed() -> String {
		let names =
			Self::ALL.iter().map(|scope| format!("'{}'", scope.as_str())).collect::<Vec<_>>();

		format!("[{}]", names.join(", "))
	}
}
impl Display for Scope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Scope {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|scope| scope.as_str() == s).ok_or_else(|| {
			ValidationError::UnknownScope { scope: s.to_owned(), allowed: Self::allowed() }
		})
	}
}

/// Ordered list of requested scopes.
///
/// Order follows the caller; a repeated scope keeps its first position. Empty lists are
/// allowed and interpreted by each flow (the authorization URL expands them to
/// [`ScopeList::all`], client credentials omit the parameter).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<Scope>);
impl ScopeList {
	/// Builds a list from typed scopes.
	pub fn new<I>(scopes: I) -> Self
	where
		I: IntoIterator<Item = Scope>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			if !list.contains(&scope) {
				list.push(scope);
			}
		}

		Self(list)
	}

	/// Parses untyped scope names, failing on the first unknown entry.
	pub fn parse<I, S>(scopes: I) -> Result<Self, ValidationError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let parsed =
			scopes.into_iter().map(|s| s.as_ref().parse()).collect::<Result<Vec<Scope>, _>>()?;

		Ok(Self::new(parsed))
	}

	/// Every scope the provider offers, in canonical order.
	pub fn all() -> Self {
		Self(Scope::ALL.to_vec())
	}

	/// Returns `self`, or [`ScopeList::all`] when empty.
	pub fn or_all(self) -> Self {
		if self.is_empty() { Self::all() } else { self }
	}

	/// Number of scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are listed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: Scope) -> bool {
		self.0.contains(&scope)
	}

	/// Iterator over the listed scopes.
	pub fn iter(&self) -> Iter<'_, Scope> {
		self.0.iter()
	}

	/// Returns the underlying slice.
	pub fn as_slice(&self) -> &[Scope] {
		&self.0
	}

	/// Joins the scope names with `delimiter`, optionally terminating every entry with it.
	pub fn join(&self, delimiter: char, trailing: bool) -> String {
		let mut buf = String::new();

		for (idx, scope) in self.0.iter().enumerate() {
			if idx > 0 && !trailing {
				buf.push(delimiter);
			}

			buf.push_str(scope.as_str());

			if trailing {
				buf.push(delimiter);
			}
		}

		buf
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(' ', false))
	}
}
impl From<Scope> for ScopeList {
	fn from(value: Scope) -> Self {
		Self(vec![value])
	}
}
impl<const N: usize> From<[Scope; N]> for ScopeList {
	fn from(value: [Scope; N]) -> Self {
		Self::new(value)
	}
}
impl FromIterator<Scope> for ScopeList {
	fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
		Self::new(iter)
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, Scope>;
	type Item = &'a Scope;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl FromStr for ScopeList {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let names = s.split(|c: char| c.is_whitespace() || c == '+' || c == ',');

		Self::parse(names.filter(|name| !name.is_empty()))
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeList::parse(values).map_err(DeError::custom)
	}
}
