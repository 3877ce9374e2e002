use url::Url;

use crate::error::{self, Error};

/// A trait to try to convert some type into a `Url`.
///
/// This trait is "sealed", such that only types within this crate can
/// implement it.
pub trait IntoUrl: IntoUrlSealed {}

impl IntoUrl for Url {}
impl IntoUrl for String {}
impl IntoUrl for &str {}
impl IntoUrl for &String {}

pub trait IntoUrlSealed {
    /// Besides parsing as a valid `Url`, the `Url` must use `http` or
    /// `https` and carry a host.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the URL is malformed, has another scheme, or
    /// lacks a host.
    fn into_url(self) -> Result<Url, Error>;

    fn as_str(&self) -> &str;
}

impl IntoUrlSealed for Url {
    fn into_url(self) -> Result<Url, Error> {
        if !matches!(self.scheme(), "http" | "https") {
            return Err(error::url_bad_scheme(self));
        }
        if self.has_host() {
            Ok(self)
        } else {
            Err(error::builder(format!("URL has no host: {self}")))
        }
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl IntoUrlSealed for &str {
    fn into_url(self) -> Result<Url, Error> {
        Url::parse(self).map_err(error::builder)?.into_url()
    }

    fn as_str(&self) -> &str {
        self
    }
}

impl IntoUrlSealed for &String {
    fn into_url(self) -> Result<Url, Error> {
        (&**self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl IntoUrlSealed for String {
    fn into_url(self) -> Result<Url, Error> {
        (&*self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}
