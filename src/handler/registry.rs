//! Handler registry
//!
//! Maps handler names to handlers. A registry is filled once from an
//! [`Endpoint`] before serving starts and is only read afterwards.

use std::collections::HashMap;

use super::Handler;
use crate::error::{ChateauError, Result};

/// Something that knows which handlers a service exposes
pub trait Endpoint {
    /// Add every handler of this endpoint to `registry`
    fn register(&self, registry: &mut Registry) -> Result<()>;
}

/// Name → handler lookup table
#[derive(Debug, Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the registry from an endpoint description
    pub fn populate(&mut self, endpoint: &dyn Endpoint) -> Result<()> {
        endpoint.register(self)
    }

    /// Add a handler, rejecting duplicate names
    pub fn register(&mut self, handler: Handler) -> Result<()> {
        if self.handlers.contains_key(handler.name()) {
            return Err(ChateauError::DuplicateHandler(handler.name().to_string()));
        }

        tracing::debug!(
            "Registered {:?} handler {} ({})",
            handler.kind(),
            handler.name(),
            handler.request_type().name()
        );
        self.handlers.insert(handler.name().to_string(), handler);
        Ok(())
    }

    /// Look up a handler by name
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

/// A named collection of handlers
#[derive(Debug, Clone, Default)]
pub struct Service {
    name: String,
    handlers: Vec<Handler>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Add a handler (builder style)
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Add a handler in place
    pub fn add(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }
}

impl Endpoint for Service {
    fn register(&self, registry: &mut Registry) -> Result<()> {
        tracing::debug!("Registering service {} ({} handlers)", self.name, self.handlers.len());
        for handler in &self.handlers {
            registry.register(handler.clone())?;
        }
        Ok(())
    }
}
