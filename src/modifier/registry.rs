//! Registries of header contribution plugins.
//!
//! Both registries are populated once at startup from configuration (or
//! whatever registration mechanism the embedding process uses) and are
//! read-only afterwards. Insertion order is significant: it is the
//! precedence order of the merge.

use std::sync::Arc;

use crate::modifier::{ClientRequestFilter, RequestModifier};

/// Ordered set of server-side request modifiers.
#[derive(Default)]
pub struct RequestModifierRegistry {
    modifiers: Vec<Arc<dyn RequestModifier>>,
}

impl RequestModifierRegistry {
    pub fn new(modifiers: Vec<Arc<dyn RequestModifier>>) -> Self {
        Self { modifiers }
    }

    pub fn modifiers(&self) -> &[Arc<dyn RequestModifier>] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

/// Ordered set of outbound client request filters.
#[derive(Default)]
pub struct ClientRequestFilterRegistry {
    filters: Vec<Arc<dyn ClientRequestFilter>>,
}

impl ClientRequestFilterRegistry {
    pub fn new(filters: Vec<Arc<dyn ClientRequestFilter>>) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &[Arc<dyn ClientRequestFilter>] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
