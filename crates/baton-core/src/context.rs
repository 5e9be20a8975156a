//! A ready-made context for request/response style chains.
//!
//! Any type can be the context of a chain. [`Exchange`] covers the common
//! case where handlers inspect a request, eventually produce a response, and
//! pass loose data to each other along the way (an authenticated user, a
//! parsed header, a timer).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A request, an optional response and a type-keyed extension map.
///
/// # Example
///
/// ```
/// use baton_core::Exchange;
///
/// struct User(&'static str);
///
/// let mut exchange: Exchange<String, u16> = Exchange::new("GET /".to_string());
/// exchange.set_extension(User("kim"));
/// exchange.set_response(200);
///
/// assert_eq!(exchange.get_extension::<User>().map(|u| u.0), Some("kim"));
/// assert_eq!(exchange.response(), Some(&200));
/// ```
pub struct Exchange<Req, Res> {
    request: Req,
    response: Option<Res>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl<Req, Res> Exchange<Req, Res> {
    /// Creates an exchange with no response and no extensions.
    #[must_use]
    pub fn new(request: Req) -> Self {
        Self {
            request,
            response: None,
            extensions: HashMap::new(),
        }
    }

    /// Returns the request.
    #[must_use]
    pub fn request(&self) -> &Req {
        &self.request
    }

    /// Returns the request mutably.
    pub fn request_mut(&mut self) -> &mut Req {
        &mut self.request
    }

    /// Returns the response, if one has been set.
    #[must_use]
    pub fn response(&self) -> Option<&Res> {
        self.response.as_ref()
    }

    /// Returns the response mutably, if one has been set.
    pub fn response_mut(&mut self) -> Option<&mut Res> {
        self.response.as_mut()
    }

    /// Sets the response, returning the previous one.
    pub fn set_response(&mut self, response: Res) -> Option<Res> {
        self.response.replace(response)
    }

    /// Takes the response out, leaving none.
    pub fn take_response(&mut self) -> Option<Res> {
        self.response.take()
    }

    /// Stores a typed extension value, replacing any value of the same type.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Retrieves a typed extension value mutably.
    pub fn get_extension_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }

    /// Splits the exchange into its request and response. Extensions are dropped.
    #[must_use]
    pub fn into_parts(self) -> (Req, Option<Res>) {
        (self.request, self.response)
    }
}

impl<Req: fmt::Debug, Res: fmt::Debug> fmt::Debug for Exchange<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
