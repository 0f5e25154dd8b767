//! Route parameters and typed extraction.
//!
//! ```
//! use reinhardt_navigation::router::{PathMatcher, PathParams};
//!
//! let matcher = PathMatcher::compile("/posts/:year/:slug").unwrap();
//! let params = matcher.extract("/posts/2024/hello").unwrap();
//!
//! let (year, slug): (u32, String) = params.extract().unwrap();
//! assert_eq!((year, slug.as_str()), (2024, "hello"));
//! let PathParams(year) = params.extract_one::<PathParams<u32>>("year").unwrap();
//! assert_eq!(year, 2024);
//! ```

use crate::error::ParamError;
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::Deref;
use std::str::FromStr;

/// Parameters captured from a path, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, String>);

impl Params {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value. An existing key keeps its position and takes the new value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	/// Raw value of a parameter.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Parses a single parameter.
	pub fn parse<T>(&self, name: &str) -> Result<T, ParamError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self
			.get(name)
			.ok_or_else(|| ParamError::Missing(name.to_string()))?;
		raw.parse::<T>().map_err(|e| ParamError::Parse {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.to_string(),
			message: e.to_string(),
		})
	}

	/// Extracts all parameters at once, positionally.
	pub fn extract<T: FromParams>(&self) -> Result<T, ParamError> {
		T::from_params(self)
	}

	/// Extracts one named parameter through [`FromParams`].
	pub fn extract_one<T: FromParams>(&self, name: &str) -> Result<T, ParamError> {
		let raw = self
			.get(name)
			.ok_or_else(|| ParamError::Missing(name.to_string()))?;
		let mut single = Params::new();
		single.insert(name, raw);
		T::from_params(&single)
	}

	/// Parameter names, in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Name/value pairs, in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no parameters were captured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn value_at(&self, index: usize) -> Option<(&str, &str)> {
		self.0
			.get_index(index)
			.map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Params::new();
		for (k, v) in iter {
			params.insert(k, v);
		}
		params
	}
}

/// Typed extraction from [`Params`].
pub trait FromParams: Sized {
	/// Builds `Self` from the captured parameters.
	///
	/// # Errors
	///
	/// Returns [`ParamError::CountMismatch`] if the number of parameters doesn't match.
	/// Returns [`ParamError::Parse`] if parameter parsing fails.
	fn from_params(params: &Params) -> Result<Self, ParamError>;
}

/// Wrapper marking a single typed path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathParams<T>(pub T);

impl<T> PathParams<T> {
	/// Unwraps the inner value.
	pub fn into_inner(self) -> T {
		self.0
	}
}

impl<T> Deref for PathParams<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

fn parse_at<T>(params: &Params, index: usize) -> Result<T, ParamError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	let (name, raw) = params.value_at(index).ok_or(ParamError::CountMismatch {
		expected: index + 1,
		actual: params.len(),
	})?;
	raw.parse::<T>().map_err(|e| ParamError::Parse {
		name: name.to_string(),
		param_type: std::any::type_name::<T>(),
		raw_value: raw.to_string(),
		message: e.to_string(),
	})
}

fn expect_count(params: &Params, expected: usize) -> Result<(), ParamError> {
	if params.len() == expected {
		Ok(())
	} else {
		Err(ParamError::CountMismatch {
			expected,
			actual: params.len(),
		})
	}
}

macro_rules! impl_from_params_for_primitive {
	($($ty:ty),* $(,)?) => {
		$(
			impl FromParams for $ty {
				fn from_params(params: &Params) -> Result<Self, ParamError> {
					expect_count(params, 1)?;
					parse_at(params, 0)
				}
			}
		)*
	};
}

impl_from_params_for_primitive!(i32, i64, u32, u64, usize, bool, String);

impl<T: FromParams> FromParams for PathParams<T> {
	fn from_params(params: &Params) -> Result<Self, ParamError> {
		T::from_params(params).map(PathParams)
	}
}

macro_rules! impl_from_params_for_tuple {
	($($idx:tt => $ty:ident),+ $(,)?) => {
		impl<$($ty),+> FromParams for ($($ty,)+)
		where
			$($ty: FromStr,)+
			$(<$ty as FromStr>::Err: std::fmt::Display,)+
		{
			fn from_params(params: &Params) -> Result<Self, ParamError> {
				expect_count(params, [$($idx),+].len())?;
				Ok(($(parse_at::<$ty>(params, $idx)?,)+))
			}
		}
	};
}

impl_from_params_for_tuple!(0 => A, 1 => B);
impl_from_params_for_tuple!(0 => A, 1 => B, 2 => C);
impl_from_params_for_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
